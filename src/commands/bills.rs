use std::sync::Arc;

use tracing::{debug, warn};

use crate::models::views::{PreviewModal, ReceiptPreview};
use crate::models::BillRow;
use crate::services::formatter::{format_date, format_status};
use crate::services::navigation::{Navigator, Route};
use crate::services::store::{Store, StoreError};

/// Employee bill list page.
pub struct BillsController {
    store: Option<Arc<dyn Store>>,
    navigator: Arc<dyn Navigator>,
}

impl BillsController {
    pub fn new(store: Option<Arc<dyn Store>>, navigator: Arc<dyn Navigator>) -> Self {
        BillsController { store, navigator }
    }

    pub fn handle_click_new_bill(&self) {
        self.navigator.navigate(Route::NewBill);
    }

    pub fn handle_click_icon_eye(&self, bill_url: &str, container_width: f64) -> ReceiptPreview {
        ReceiptPreview::new(PreviewModal::Employee, bill_url, container_width)
    }

    /// Bills with display dates and statuses, most recent first. `None` when
    /// no store is configured.
    pub async fn get_bills(&self) -> Result<Option<Vec<BillRow>>, StoreError> {
        let Some(store) = &self.store else {
            return Ok(None);
        };

        let snapshot = store.list_bills().await?;
        let mut bills: Vec<BillRow> = snapshot
            .into_iter()
            .map(|doc| {
                let status = format_status(doc.status).to_string();
                match format_date(&doc.date) {
                    Ok(date) => BillRow::from_bill(doc, date, status),
                    Err(err) => {
                        // corrupted data keeps its raw date
                        warn!("{} for bill {}", err, doc.id);
                        let date = doc.date.clone();
                        BillRow::from_bill(doc, date, status)
                    }
                }
            })
            .collect();

        bills.sort_by(|a, b| b.date.cmp(&a.date));
        debug!("length {}", bills.len());
        Ok(Some(bills))
    }
}
