//! Purpose: Library crate backing the `arcmark` CLI and its tests.
//! Exports: `api` (conversion pipeline surface), `json` (decode boundary).
//! Role: Turns an Arc `StorableSidebar.json` document into Netscape bookmark HTML.
//! Invariants: The core performs no file or console I/O; the binary owns both.
//! Invariants: Core modules prefer explicit inputs/outputs over hidden state.
pub mod api;
mod core;
pub mod json;
