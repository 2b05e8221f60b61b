//! I/O module
//!
//! Handles CSV import/export and the storage collaborators.
//!
//! # Components
//!
//! - `csv_format` - CSV format handling (ticket parsing, export serialization)
//! - `storage` - In-memory and directory-backed storage
//! - `background` - Fire-and-forget storage writer on a tokio runtime

pub mod background;
pub mod csv_format;
pub mod storage;

pub use background::BackgroundStorage;
pub use csv_format::{parse_tickets, serialize_tickets, write_tickets_csv, EXPORT_FILE_NAME};
pub use storage::{FileStorage, MemoryStorage};
