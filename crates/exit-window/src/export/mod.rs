//! User-triggered exports: the plain-text evaluation summary, the pre-departure pack,
//! and CSV tables of snapshots and the change log. Nothing here writes to disk.

mod pack;
mod summary;
mod tables;

pub use pack::{escape_html, format_constraints, PreDeparturePack};
pub use summary::evaluation_summary_text;
pub use tables::{changes_csv, snapshots_csv};

/// Error raised while rendering an export.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("csv encoding failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("csv buffer could not be flushed: {0}")]
    Flush(#[from] std::io::Error),
    #[error("export produced invalid utf-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}
