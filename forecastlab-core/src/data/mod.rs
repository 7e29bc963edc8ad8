//! Forecast file ingestion and caching

pub mod cache;
pub mod dates;
pub mod decode;
pub mod loader;
pub mod sample;
pub mod spreadsheet;
pub mod table;

pub use cache::{CachedLoad, DatasetCache};
pub use decode::TextEncoding;
pub use loader::{load_dataset, LoadError, LoadedDataset, SourceFormat};
pub use sample::{generate, write_dataset_csv, SampleSpec};
