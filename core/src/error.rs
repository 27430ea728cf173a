use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Server responded with status {0}")]
    Status(u16),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Missing page element: {0}")]
    MissingElement(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<ureq::Error> for Error {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::Status(code, _) => Error::Status(code),
            ureq::Error::Transport(transport) => Error::Transport(transport.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
