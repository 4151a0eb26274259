use thiserror::Error;

#[derive(Error, Debug)]
pub enum FormError {
    #[error("A recommendation is already being fetched")]
    Busy,

    #[error("Request to relay failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Relay answered with status code {0}")]
    Status(u16),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
