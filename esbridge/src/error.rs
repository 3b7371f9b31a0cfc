use thiserror::Error;

/// Coarse classification of an [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Precondition or malformed input. Fatal to the call, never retried.
    Usage,
    /// Transport, serialization or engine-side failure of an operation.
    Client,
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("Usage error: {0}")]
    Usage(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Cannot decode {what} response: {source}")]
    Decode {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Unknown field type '{value}' for field '{field}'")]
    UnknownFieldType { field: String, value: String },

    #[error("Unknown index type '{value}' for field '{field}'")]
    UnknownIndexType { field: String, value: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Engine returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{message}")]
    Client {
        message: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Wrap a failure raised inside an operation as a generic client error
    pub fn client(message: impl Into<String>, source: Error) -> Self {
        Error::Client {
            message: message.into(),
            source: Box::new(source),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Usage(_)
            | Error::Config(_)
            | Error::Decode { .. }
            | Error::MissingField(_)
            | Error::UnknownFieldType { .. }
            | Error::UnknownIndexType { .. }
            | Error::InvalidUrl(_)
            | Error::Toml(_)
            | Error::Io(_) => ErrorKind::Usage,
            Error::Http(_) | Error::Status { .. } | Error::Json(_) | Error::Client { .. } => {
                ErrorKind::Client
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
