#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use billed::models::{AuthToken, CreatedBill, ReceiptUpload};
use billed::{Bill, BillStatus, History, Store, StoreError};

fn bill(
    id: &str,
    name: &str,
    expense_type: &str,
    amount: i64,
    date: &str,
    vat: &str,
    status: BillStatus,
    comment_admin: &str,
    file_name: &str,
) -> Bill {
    Bill {
        id: id.to_string(),
        email: "a@a".to_string(),
        expense_type: expense_type.to_string(),
        name: name.to_string(),
        amount,
        date: date.to_string(),
        vat: vat.to_string(),
        pct: 20,
        commentary: "séminaire billed".to_string(),
        file_url: Some(format!("https://test.storage.tld/v0/b/billable/o/{}", file_name)),
        file_name: Some(file_name.to_string()),
        status,
        comment_admin: Some(comment_admin.to_string()),
    }
}

/// One pending, one accepted, two refused.
pub fn bills() -> Vec<Bill> {
    vec![
        bill(
            "47qAXb6fIm2zOKkLzMro",
            "encore",
            "Hôtel et logement",
            400,
            "2004-04-04",
            "80",
            BillStatus::Pending,
            "ok",
            "preview-facture-free-201801-pdf-1.jpg",
        ),
        bill(
            "BeKy5Mo4jkmdfPGYpTxZ",
            "test1",
            "Transports",
            100,
            "2001-01-01",
            "",
            BillStatus::Refused,
            "en fait non",
            "1592770761.jpeg",
        ),
        bill(
            "UIUZtnPQvnbFnB0ozvJh",
            "test3",
            "Services en ligne",
            300,
            "2003-03-03",
            "60",
            BillStatus::Accepted,
            "bon bah d'accord",
            "facture-client-php-exportee-dans-document-pdf-enregistre-sur-disque-dur.png",
        ),
        bill(
            "qcCK3SzECmaZAGRrHjaC",
            "test2",
            "Restaurants et bars",
            200,
            "2002-02-02",
            "40",
            BillStatus::Refused,
            "pas la bonne facture",
            "preview-facture-free-201801-pdf-1.jpg",
        ),
    ]
}

/// Scriptable store that records every call it receives.
#[derive(Default)]
pub struct MockStore {
    pub bills: Vec<Bill>,
    pub fail_list: bool,
    pub fail_update: bool,
    pub fail_upload: bool,
    pub fail_create_user: bool,
    pub login_failures: AtomicUsize,
    pub list_calls: AtomicUsize,
    pub login_calls: AtomicUsize,
    pub create_user_calls: AtomicUsize,
    pub updates: Mutex<Vec<(String, String)>>,
    pub uploads: Mutex<Vec<ReceiptUpload>>,
    pub created_users: Mutex<Vec<String>>,
}

impl MockStore {
    pub fn with_bills(bills: Vec<Bill>) -> Self {
        MockStore {
            bills,
            ..MockStore::default()
        }
    }

    pub fn rejecting_logins(count: usize) -> Self {
        MockStore {
            login_failures: AtomicUsize::new(count),
            ..MockStore::default()
        }
    }

    pub fn updates(&self) -> Vec<(String, String)> {
        self.updates.lock().unwrap().clone()
    }
}

#[async_trait]
impl Store for MockStore {
    async fn list_bills(&self) -> Result<Vec<Bill>, StoreError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_list {
            return Err(StoreError::Status {
                status: 500,
                message: "Erreur 500".to_string(),
            });
        }
        Ok(self.bills.clone())
    }

    async fn create_bill(&self, upload: ReceiptUpload) -> Result<CreatedBill, StoreError> {
        if self.fail_upload {
            return Err(StoreError::Unavailable("upload rejected".to_string()));
        }
        self.uploads.lock().unwrap().push(upload);
        Ok(CreatedBill {
            file_url: "https://localhost:3456/images/test.jpg".to_string(),
            key: "1234".to_string(),
        })
    }

    async fn update_bill(&self, selector: &str, data: &str) -> Result<Bill, StoreError> {
        self.updates
            .lock()
            .unwrap()
            .push((selector.to_string(), data.to_string()));
        if self.fail_update {
            return Err(StoreError::Status {
                status: 404,
                message: "Erreur 404".to_string(),
            });
        }
        Ok(serde_json::from_str(data)?)
    }

    async fn login(&self, credentials: &str) -> Result<AuthToken, StoreError> {
        self.login_calls.fetch_add(1, Ordering::SeqCst);
        let remaining = self.login_failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.login_failures.store(remaining - 1, Ordering::SeqCst);
            return Err(StoreError::Status {
                status: 401,
                message: format!("unknown user for {}", credentials),
            });
        }
        Ok(AuthToken {
            jwt: "jwt-token".to_string(),
        })
    }

    async fn create_user(&self, data: &str) -> Result<(), StoreError> {
        self.create_user_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_create_user {
            return Err(StoreError::Status {
                status: 409,
                message: "exists".to_string(),
            });
        }
        self.created_users.lock().unwrap().push(data.to_string());
        Ok(())
    }
}

pub fn history() -> Arc<History> {
    Arc::new(History::new())
}
