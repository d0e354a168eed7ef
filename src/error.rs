#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Not enough memory: {0}")]
    OutOfMemory(String),

    #[error("Invalid value: {0}")]
    InvalidArgument(String),

    #[error("Payload too long: {0}")]
    TooLong(String),

    #[error("Error while writing to an output channel: {0}")]
    Write(#[from] std::io::Error),

    #[error("Unimplemented operation: {0}")]
    Unimplemented(String),

    #[error("Checksum mismatch, expected: {expected:02X?}, found: {found:02X?}")]
    ChecksumMismatch { expected: Vec<u8>, found: Vec<u8> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    OutOfMemory,
    InvalidArgument,
    TooLong,
    Write,
    Unimplemented,
    ChecksumMismatch,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::OutOfMemory(_) => ErrorKind::OutOfMemory,
            Error::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Error::TooLong(_) => ErrorKind::TooLong,
            Error::Write(_) => ErrorKind::Write,
            Error::Unimplemented(_) => ErrorKind::Unimplemented,
            Error::ChecksumMismatch { .. } => ErrorKind::ChecksumMismatch,
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
