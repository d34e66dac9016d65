use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Coarse classification of failures, as reported to the user.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad input: arguments, credentials, addresses, encodings.
    Construction,
    /// The node could not be reached or answered with something unparseable.
    Network,
    /// The node understood the request and refused it.
    Rejection,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid address '{0}': {1}")]
    InvalidAddress(String, &'static str),

    #[error("invalid contract name '{0}'")]
    InvalidContractName(String),

    #[error("invalid function name '{0}'")]
    InvalidFunctionName(String),

    #[error("string-ascii may only contain printable ASCII: {0:?}")]
    InvalidAsciiString(String),

    #[error("invalid private key: {0}")]
    InvalidKey(String),

    #[error("nonce must be a non-negative integer, got '{0}'")]
    InvalidNonce(String),

    #[error("encoding failed: {0}")]
    Encoding(String),

    #[error("decoding failed: {0}")]
    Decoding(String),

    #[error("signing failed: {0}")]
    Signing(#[from] k256::ecdsa::Error),

    #[error("request to node failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected response from node ({status}): {body}")]
    UnexpectedResponse { status: u16, body: String },

    #[error("transaction rejected: {reason}{}", txid.as_deref().map(|t| format!(" (txid {t})")).unwrap_or_default())]
    Rejected {
        reason: String,
        reason_data: Option<serde_json::Value>,
        txid: Option<String>,
    },

    #[error("read-only call failed: {0}")]
    ReadOnlyFailed(String),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Http(_) | Error::UnexpectedResponse { .. } => ErrorKind::Network,
            Error::Rejected { .. } | Error::ReadOnlyFailed(_) => ErrorKind::Rejection,
            _ => ErrorKind::Construction,
        }
    }
}

impl From<hex::FromHexError> for Error {
    fn from(e: hex::FromHexError) -> Self {
        Error::Decoding(format!("hex: {e}"))
    }
}
