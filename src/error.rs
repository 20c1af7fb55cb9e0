use thiserror::Error;

pub use crate::services::formatter::FormatError;
pub use crate::services::session::StorageError;
pub use crate::services::store::StoreError;

#[derive(Debug, Error)]
pub enum NewBillError {
    #[error("Seuls les fichiers JPG, JPEG et PNG sont acceptés: {0}")]
    UnsupportedReceipt(String),
    #[error("Invalid amount: {0:?}")]
    InvalidAmount(String),
    #[error("No connected user in session")]
    NoSession,
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Error)]
pub enum LoginError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("Could not serialize payload: {0}")]
    Payload(#[from] serde_json::Error),
}
