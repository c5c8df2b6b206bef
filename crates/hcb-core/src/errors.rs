/// Core error type shared by the host side and the backend adapters.
///
/// Adapter crates map their client-specific failures into [`Error::Client`] so
/// the serve loop can report them uniformly.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("unrecognized identifier: {0}")]
    UnrecognizedIdentifier(String),

    #[error("chat client error: {0}")]
    Client(String),

    #[error("message handler error: {0}")]
    Handler(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
