use async_trait::async_trait;
use thiserror::Error;

use crate::models::{AuthToken, Bill, CreatedBill, ReceiptUpload};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Store responded {status}: {message}")]
    Status { status: u16, message: String },
    #[error("Invalid store payload: {0}")]
    Payload(#[from] serde_json::Error),
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn status(&self) -> Option<u16> {
        match self {
            StoreError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Remote data-access facade. Payloads travel as serialized JSON strings,
/// the same shape the backend stores them in.
#[async_trait]
pub trait Store: Send + Sync {
    async fn list_bills(&self) -> Result<Vec<Bill>, StoreError>;

    async fn create_bill(&self, upload: ReceiptUpload) -> Result<CreatedBill, StoreError>;

    async fn update_bill(&self, selector: &str, data: &str) -> Result<Bill, StoreError>;

    async fn login(&self, credentials: &str) -> Result<AuthToken, StoreError>;

    async fn create_user(&self, data: &str) -> Result<(), StoreError>;
}
