use std::{fmt::Display, io};

#[derive(Debug)]
pub enum Error {
    ProbeError(endpoint_probe::Error),
    InvalidPattern(regex::Error),
    SerializationError(serde_json::Error),
    IoError(io::Error),
    NoProperties,
}

impl std::error::Error for Error {}

impl From<endpoint_probe::Error> for Error {
    fn from(e: endpoint_probe::Error) -> Self {
        Error::ProbeError(e)
    }
}

impl From<regex::Error> for Error {
    fn from(e: regex::Error) -> Self {
        Error::InvalidPattern(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::SerializationError(e)
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::IoError(e)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::ProbeError(e) => write!(f, "{}", e),
            Error::InvalidPattern(e) => write!(f, "{}", e),
            Error::SerializationError(e) => write!(f, "{}", e),
            Error::IoError(e) => write!(f, "{}", e),
            Error::NoProperties => write!(f, "At least one property id is required"),
        }
    }
}
