//! Purpose: JSON decoding boundary shared by the pipeline and the CLI.
//! Exports: `parse` module with decode helpers and failure categorization.
//! Role: Single seam for parser usage so callsites avoid ad hoc decode logic.
//! Invariants: Runtime JSON decoding of the sidebar document goes through this module.

pub mod parse;
