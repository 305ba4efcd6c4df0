use std::io;
use thiserror::Error;
/// Why a raw line did not become a sample. Expected outcome, never fatal.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecordError {
    #[error("incomplete record: expected at least 2 fields, got {fields}")]
    IncompleteRecord { fields: usize },
    #[error("malformed {field} field: {text:?} is not a number")]
    MalformedField { field: &'static str, text: String },
}
/// Failures that end an acquisition run.
#[derive(Debug, Error)]
pub enum AcquisitionError {
    #[error("failed to write data log: {0}")]
    LogWrite(#[source] io::Error),
    #[error("transport failure: {0}")]
    Transport(#[source] io::Error),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
impl From<serialport::Error> for AcquisitionError {
    fn from(value: serialport::Error) -> Self {
        AcquisitionError::Transport(value.into())
    }
}
