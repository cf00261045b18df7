use crate::seed::SeedStep;
use thiserror::Error;
use wayfarer_scanner::ScanError;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("{0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error("failed to create {step} table")]
    Seed {
        step: SeedStep,
        #[source]
        source: Box<CoreError>,
    },

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;
