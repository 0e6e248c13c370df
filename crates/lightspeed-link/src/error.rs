//! Link-layer errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LinkError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed peer message: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("handshake failed: {0}")]
    Handshake(String),

    #[error("peer closed the connection")]
    Closed,
}

pub type LinkResult<T> = Result<T, LinkError>;
