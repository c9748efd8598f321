// Core modules: ingestion, space indexing, tree building, rendering, errors.
pub mod error;
pub mod html;
pub mod pipeline;
pub mod sidebar;
pub mod spaces;
pub mod tree;
