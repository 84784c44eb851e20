//! Data module - file loading, schema inference and cleaning

mod cleaner;
mod format;
mod loader;
mod schema;

pub use cleaner::DataCleaner;
pub use format::{base_name, TableFormat};
pub use loader::{FileLoader, LoaderError, UploadedFile};
pub use schema::{cell_text, column_names, numeric_columns};
