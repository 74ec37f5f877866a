//! Output formatting modules.

pub mod table;

pub use table::format_table;
