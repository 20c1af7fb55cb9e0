use std::sync::Arc;

use tracing::{error, info, warn};

use crate::error::NewBillError;
use crate::models::{Bill, BillStatus, CreatedBill, ReceiptUpload, DEFAULT_PCT};
use crate::services::navigation::{Navigator, Route};
use crate::services::session::Session;
use crate::services::store::Store;
use crate::utils::{file_name_from_path, has_receipt_extension, parse_int};

/// Raw values of the new-bill form fields.
#[derive(Debug, Clone, Default)]
pub struct NewBillForm {
    pub expense_type: String,
    pub name: String,
    pub amount: String,
    pub date: String,
    pub vat: String,
    pub pct: String,
    pub commentary: String,
}

pub struct NewBillController {
    store: Option<Arc<dyn Store>>,
    navigator: Arc<dyn Navigator>,
    session: Session,
    bill_id: Option<String>,
    file_url: Option<String>,
    file_name: Option<String>,
}

impl NewBillController {
    pub fn new(store: Option<Arc<dyn Store>>, navigator: Arc<dyn Navigator>, session: Session) -> Self {
        NewBillController {
            store,
            navigator,
            session,
            bill_id: None,
            file_url: None,
            file_name: None,
        }
    }

    pub fn bill_id(&self) -> Option<&str> {
        self.bill_id.as_deref()
    }

    pub fn file_url(&self) -> Option<&str> {
        self.file_url.as_deref()
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    fn clear_receipt(&mut self) {
        self.bill_id = None;
        self.file_url = None;
        self.file_name = None;
    }

    /// Validates and uploads the picked receipt. `picked_path` is the value
    /// of the file input, possibly a `C:\fakepath\...` path.
    pub async fn handle_change_file(
        &mut self,
        picked_path: &str,
        bytes: Vec<u8>,
    ) -> Result<Option<CreatedBill>, NewBillError> {
        let file_name = file_name_from_path(picked_path);
        if !has_receipt_extension(&file_name) {
            self.clear_receipt();
            return Err(NewBillError::UnsupportedReceipt(file_name));
        }

        let Some(store) = &self.store else {
            return Ok(None);
        };
        let email = self.session.current_email()?.ok_or(NewBillError::NoSession)?;

        let upload = ReceiptUpload {
            file_name: file_name.clone(),
            bytes,
            email,
        };
        let result = store.create_bill(upload).await;
        match result {
            Ok(created) => {
                info!("Receipt {} stored at {}", file_name, created.file_url);
                self.bill_id = Some(created.key.clone());
                self.file_url = Some(created.file_url.clone());
                self.file_name = Some(file_name);
                Ok(Some(created))
            }
            Err(err) => {
                error!("Receipt upload failed: {}", err);
                self.clear_receipt();
                Err(err.into())
            }
        }
    }

    pub async fn handle_submit(&mut self, form: &NewBillForm) -> Result<Bill, NewBillError> {
        let email = self.session.current_email()?.ok_or(NewBillError::NoSession)?;
        let amount = parse_int(&form.amount).ok_or_else(|| NewBillError::InvalidAmount(form.amount.clone()))?;
        let pct = parse_int(&form.pct).filter(|p| *p != 0).unwrap_or(DEFAULT_PCT);

        let bill = Bill {
            id: self.bill_id.clone().unwrap_or_default(),
            email,
            expense_type: form.expense_type.clone(),
            name: form.name.clone(),
            amount,
            date: form.date.clone(),
            vat: form.vat.clone(),
            pct,
            commentary: form.commentary.clone(),
            file_url: self.file_url.clone(),
            file_name: self.file_name.clone(),
            status: BillStatus::Pending,
            comment_admin: None,
        };

        self.update_bill(&bill).await;
        self.navigator.navigate(Route::Bills);
        Ok(bill)
    }

    /// Persists the bill under the key returned by the receipt upload. `None`
    /// when no store is configured or the update did not go through.
    pub async fn update_bill(&self, bill: &Bill) -> Option<Bill> {
        let store = self.store.as_ref()?;
        let Some(selector) = self.bill_id.as_deref() else {
            warn!("No uploaded receipt, bill {} not sent", bill.name);
            return None;
        };

        let data = match serde_json::to_string(bill) {
            Ok(data) => data,
            Err(err) => {
                error!("Could not serialize bill: {}", err);
                return None;
            }
        };

        match store.update_bill(selector, &data).await {
            Ok(updated) => {
                self.navigator.navigate(Route::Bills);
                Some(updated)
            }
            Err(err) => {
                error!("Bill update failed: {}", err);
                None
            }
        }
    }
}
