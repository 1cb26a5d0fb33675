use thiserror::Error;

#[derive(Error, Debug)]
pub enum Ms2PsdError {
    #[error("Input file not found: {0}")]
    FileNotFound(String),

    #[error("Unsupported waveform format: {0}")]
    UnsupportedFormat(String),

    #[error("Failed to parse {source_name}: {message}")]
    ParseError {
        source_name: String,
        message: String,
    },

    #[error("Trace contains no samples: {0}")]
    EmptyTrace(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

impl Ms2PsdError {
    pub(crate) fn parse(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ParseError {
            source_name: source_name.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Ms2PsdError>;
