//! Purpose: Name and write the exported bookmark HTML.
//! Exports: `Destination`, `default_output_name`, `resolve_destination`, `write_atomic`.
//! Role: Output collaborator for the CLI; the core hands over a fully rendered string.
//! Invariants: Default name is `arc_bookmarks_YYYY_MM_DD.html` using the UTC date.
//! Invariants: Files are written via a sibling temp file and renamed, never partially.
//! Invariants: New files get the umask-filtered default mode; replaced files keep their mode.

use std::io::Write;
use std::path::{Path, PathBuf};

use arcmark::api::{Error, ErrorKind, io_error_kind};
use tempfile::NamedTempFile;
use time::{Date, OffsetDateTime};

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum Destination {
    Stdout,
    File(PathBuf),
}

pub(crate) fn default_output_name(date: Date) -> String {
    format!(
        "arc_bookmarks_{:04}_{:02}_{:02}.html",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}

pub(crate) fn today_utc() -> Date {
    OffsetDateTime::now_utc().date()
}

pub(crate) fn resolve_destination(
    output: Option<&Path>,
    output_dir: Option<&Path>,
    cwd: &Path,
    date: Date,
) -> Destination {
    match output {
        Some(path) if path == Path::new("-") => Destination::Stdout,
        Some(path) => Destination::File(path.to_path_buf()),
        None => Destination::File(
            output_dir
                .unwrap_or(cwd)
                .join(default_output_name(date)),
        ),
    }
}

pub(crate) fn write_atomic(path: &Path, contents: &str) -> Result<(), Error> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(|err| {
        Error::new(io_error_kind(&err))
            .with_message("failed to create output directory")
            .with_path(dir)
            .with_source(err)
    })?;

    let mut file = sibling_temp_file(dir).map_err(|err| write_error(err, path))?;
    file.write_all(contents.as_bytes())
        .and_then(|()| file.as_file().sync_all())
        .map_err(|err| write_error(err, path))?;
    if let Ok(existing) = std::fs::metadata(path) {
        file.as_file()
            .set_permissions(existing.permissions())
            .map_err(|err| write_error(err, path))?;
    }
    file.persist(path)
        .map_err(|err| write_error(err.error, path))?;
    Ok(())
}

fn sibling_temp_file(dir: &Path) -> std::io::Result<NamedTempFile> {
    let mut builder = tempfile::Builder::new();
    builder.prefix(".arc_bookmarks").suffix(".tmp");
    // Same creation mode as a plain `File::create`; the process umask still applies.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(std::fs::Permissions::from_mode(0o666));
    }
    builder.tempfile_in(dir)
}

fn write_error(err: std::io::Error, path: &Path) -> Error {
    let kind = match io_error_kind(&err) {
        ErrorKind::NotFound => ErrorKind::Io,
        other => other,
    };
    Error::new(kind)
        .with_message("failed to write bookmarks file")
        .with_path(path)
        .with_source(err)
}
