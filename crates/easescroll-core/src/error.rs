use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid animation duration: {0} (must be a positive number of seconds)")]
    InvalidDuration(f64),

    #[error("Invalid timing curve: {0}")]
    InvalidCurve(String),

    #[error("Invalid point: {0}")]
    InvalidPoint(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
