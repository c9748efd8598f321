//! Purpose: Locate and read the Arc `StorableSidebar.json` input document.
//! Exports: `SIDEBAR_FILE`, `SourceLocation`, `InputSource`, `read_input`, `library_path`.
//! Role: Input collaborator for the CLI; keeps platform path rules in one place.
//! Invariants: Candidate order is explicit path, then current directory, then library path.
//! Invariants: Unreadable candidates fall through; only the last failure is fatal.
//! Invariants: On Windows exactly one `TheBrowserCompany.Arc*` package directory must exist.

use std::path::{Path, PathBuf};

use arcmark::api::{Error, ErrorKind, io_error_kind};

pub(crate) const SIDEBAR_FILE: &str = "StorableSidebar.json";
const WINDOWS_PACKAGE_PREFIX: &str = "TheBrowserCompany.Arc";

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum SourceLocation {
    Explicit,
    CurrentDir,
    Library,
}

impl SourceLocation {
    pub(crate) fn label(self) -> &'static str {
        match self {
            SourceLocation::Explicit => "explicit path",
            SourceLocation::CurrentDir => "current directory",
            SourceLocation::Library => "library directory",
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum Platform {
    Windows,
    Unix,
}

impl Platform {
    pub(crate) fn current() -> Self {
        if cfg!(windows) {
            Platform::Windows
        } else {
            Platform::Unix
        }
    }
}

#[derive(Debug)]
pub(crate) struct InputSource {
    pub path: PathBuf,
    pub location: SourceLocation,
    pub contents: String,
}

pub(crate) fn read_input(
    explicit: Option<&Path>,
    cwd: &Path,
    home: Option<&Path>,
    platform: Platform,
) -> Result<InputSource, Error> {
    if let Some(path) = explicit {
        let contents = read_candidate(path).map_err(|err| {
            Error::new(io_error_kind(&err))
                .with_message(format!("cannot read {SIDEBAR_FILE} input"))
                .with_path(path)
                .with_source(err)
        })?;
        return Ok(InputSource {
            path: path.to_path_buf(),
            location: SourceLocation::Explicit,
            contents,
        });
    }

    let local = cwd.join(SIDEBAR_FILE);
    match read_candidate(&local) {
        Ok(contents) => {
            return Ok(InputSource {
                path: local,
                location: SourceLocation::CurrentDir,
                contents,
            });
        }
        Err(err) => {
            tracing::debug!(path = %local.display(), error = %err, "no input in current directory")
        }
    }

    let home = home.ok_or_else(|| {
        not_found_error().with_message(format!(
            "{SIDEBAR_FILE} not found in current directory and home directory is unknown"
        ))
    })?;
    let library = library_path(home, platform)?;
    match read_candidate(&library) {
        Ok(contents) => Ok(InputSource {
            path: library,
            location: SourceLocation::Library,
            contents,
        }),
        Err(err) => Err(not_found_error().with_path(library).with_source(err)),
    }
}

pub(crate) fn library_path(home: &Path, platform: Platform) -> Result<PathBuf, Error> {
    match platform {
        Platform::Unix => Ok(home
            .join("Library")
            .join("Application Support")
            .join("Arc")
            .join(SIDEBAR_FILE)),
        Platform::Windows => {
            let packages = home.join("AppData").join("Local").join("Packages");
            let package = windows_package_dir(&packages)?;
            Ok(package
                .join("LocalCache")
                .join("Local")
                .join("Arc")
                .join(SIDEBAR_FILE))
        }
    }
}

fn windows_package_dir(packages: &Path) -> Result<PathBuf, Error> {
    let entries = std::fs::read_dir(packages).map_err(|err| {
        Error::new(ErrorKind::NotFound)
            .with_message("Arc installation directory not found")
            .with_path(packages)
            .with_source(err)
    })?;
    let mut matches: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .filter(|entry| {
            entry
                .file_name()
                .to_str()
                .is_some_and(|name| name.starts_with(WINDOWS_PACKAGE_PREFIX))
        })
        .map(|entry| entry.path())
        .collect();
    if matches.len() != 1 {
        return Err(Error::new(ErrorKind::NotFound)
            .with_message(format!(
                "Arc installation directory not found ({} candidates)",
                matches.len()
            ))
            .with_path(packages)
            .with_hint("Pass --input with the path to StorableSidebar.json."));
    }
    Ok(matches.remove(0))
}

fn read_candidate(path: &Path) -> std::io::Result<String> {
    std::fs::read_to_string(path)
}

fn not_found_error() -> Error {
    Error::new(ErrorKind::NotFound)
        .with_message(format!("{SIDEBAR_FILE} not found"))
        .with_hint(
            "Look for the \"StorableSidebar.json\" file within the \
             \"~/Library/Application Support/Arc/\" folder, copy it to the current directory, \
             or pass --input.",
        )
}
