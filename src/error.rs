use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Bad format: {0}")]
    BadFormat(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Argument is null: {0}")]
    ArgumentNull(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Generates factory methods for [`IngestError`] variants that wrap a `String`.
macro_rules! error_constructors {
    ($(
        $(#[doc = $doc:expr])*
        $method:ident => $variant:ident
    ),* $(,)?) => {
        impl IngestError {
            $(
                $(#[doc = $doc])*
                pub fn $method(msg: impl Into<String>) -> Self {
                    Self::$variant(msg.into())
                }
            )*
        }
    };
}

error_constructors! {
    /// Create a bad-format error.
    bad_format => BadFormat,
    /// Create an invalid-input error.
    invalid_input => InvalidInput,
    /// Create a missing-argument error.
    argument_null => ArgumentNull,
    /// Create a configuration error.
    config => ConfigError,
}

pub type Result<T> = std::result::Result<T, IngestError>;
