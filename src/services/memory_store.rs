use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::info;

use crate::models::{AuthToken, Bill, BillStatus, CreatedBill, Credentials, NewUser, ReceiptUpload};
use crate::services::store::{Store, StoreError};
use crate::utils::sha256_bytes;

/// In-process [`Store`] used for demos and tests. Receipt URLs are
/// content-addressed by the sha256 of the uploaded bytes.
#[derive(Default)]
pub struct MemoryStore {
    bills: Mutex<Vec<Bill>>,
    users: Mutex<HashMap<String, NewUser>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bills(bills: Vec<Bill>) -> Self {
        MemoryStore {
            bills: Mutex::new(bills),
            users: Mutex::new(HashMap::new()),
        }
    }

    pub async fn bills(&self) -> Vec<Bill> {
        self.bills.lock().await.clone()
    }

    pub async fn user(&self, email: &str) -> Option<NewUser> {
        self.users.lock().await.get(email).cloned()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn list_bills(&self) -> Result<Vec<Bill>, StoreError> {
        Ok(self.bills.lock().await.clone())
    }

    async fn create_bill(&self, upload: ReceiptUpload) -> Result<CreatedBill, StoreError> {
        let key = uuid::Uuid::new_v4().to_string();
        let file_url = format!("memory://receipts/{}", sha256_bytes(&upload.bytes));
        self.bills.lock().await.push(Bill {
            id: key.clone(),
            email: upload.email,
            expense_type: String::new(),
            name: String::new(),
            amount: 0,
            date: String::new(),
            vat: String::new(),
            pct: crate::models::DEFAULT_PCT,
            commentary: String::new(),
            file_url: Some(file_url.clone()),
            file_name: Some(upload.file_name),
            status: BillStatus::Pending,
            comment_admin: None,
        });
        Ok(CreatedBill { file_url, key })
    }

    async fn update_bill(&self, selector: &str, data: &str) -> Result<Bill, StoreError> {
        let mut bill: Bill = serde_json::from_str(data)?;
        bill.id = selector.to_string();
        let mut bills = self.bills.lock().await;
        match bills.iter_mut().find(|b| b.id == selector) {
            Some(existing) => *existing = bill.clone(),
            None => {
                return Err(StoreError::Status {
                    status: 404,
                    message: format!("Bill {} not found", selector),
                })
            }
        }
        Ok(bill)
    }

    async fn login(&self, credentials: &str) -> Result<AuthToken, StoreError> {
        let credentials: Credentials = serde_json::from_str(credentials)?;
        let users = self.users.lock().await;
        match users.get(&credentials.email) {
            Some(user) if user.password == credentials.password => Ok(AuthToken {
                jwt: format!("memory-{}", sha256_bytes(credentials.email.as_bytes())),
            }),
            _ => Err(StoreError::Status {
                status: 401,
                message: "Invalid credentials".to_string(),
            }),
        }
    }

    async fn create_user(&self, data: &str) -> Result<(), StoreError> {
        let user: NewUser = serde_json::from_str(data)?;
        let mut users = self.users.lock().await;
        if users.contains_key(&user.email) {
            return Err(StoreError::Status {
                status: 409,
                message: format!("User {} already exists", user.email),
            });
        }
        info!("Registered {} in memory store", user.email);
        users.insert(user.email.clone(), user);
        Ok(())
    }
}
