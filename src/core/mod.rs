//! Core module - collection, matrix view, export and configuration

pub mod collection;
pub mod config;
pub mod export;
pub mod matrix;

pub use collection::{IngestError, IngestReport, LoadedFile, VariantCollection};
pub use config::Config;
pub use export::{export_file_name, write_summary_csv, ExportError};
pub use matrix::{MatrixFooter, MatrixRow, MatrixView};
