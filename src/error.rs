use std::fmt;
use std::path::PathBuf;

#[derive(Debug)]
pub enum Error {
    /// The rendered report surface (or its geometry) could not be located.
    GeometrySourceMissing(String),
    /// An embedded image failed to load. Logged and skipped, never fatal.
    ImageResourceFailure { source: PathBuf, reason: String },
    RasterizationFailure(String),
    InvalidManifest(String),
    InvalidConfig(String),
    InvalidDiagnosis(String),
    Io(std::io::Error),
}

impl Error {
    /// Whether re-running the whole export could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Error::GeometrySourceMissing(_) | Error::RasterizationFailure(_) | Error::Io(_)
        )
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::GeometrySourceMissing(msg) => {
                write!(f, "could not locate the report surface: {msg}")
            }
            Error::ImageResourceFailure { source, reason } => {
                write!(f, "image {} failed to load: {reason}", source.display())
            }
            Error::RasterizationFailure(msg) => {
                write!(f, "failed to rasterize report page, please try again: {msg}")
            }
            Error::InvalidManifest(msg) => write!(f, "invalid geometry manifest: {msg}"),
            Error::InvalidConfig(msg) => write!(f, "invalid export configuration: {msg}"),
            Error::InvalidDiagnosis(msg) => write!(f, "invalid diagnosis result: {msg}"),
            Error::Io(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}
