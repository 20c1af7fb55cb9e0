use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, error, warn};

use crate::config::{Config, FilterMode};
use crate::models::views::{DetailView, ListState, ListView, PreviewModal, ReceiptPreview};
use crate::models::{Bill, BillStatus};
use crate::services::navigation::{Navigator, Route};
use crate::services::session::Session;
use crate::services::store::{Store, StoreError};

/// Which bills an administrator gets to review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterPolicy {
    StatusOnly,
    Live { excluded: Vec<String> },
}

impl FilterPolicy {
    fn admits(&self, bill: &Bill) -> bool {
        match self {
            FilterPolicy::StatusOnly => true,
            FilterPolicy::Live { excluded } => !excluded.iter().any(|email| *email == bill.email),
        }
    }
}

pub fn get_status(index: u8) -> Option<BillStatus> {
    match index {
        1 => Some(BillStatus::Pending),
        2 => Some(BillStatus::Accepted),
        3 => Some(BillStatus::Refused),
        _ => None,
    }
}

pub fn filtered_bills(bills: &[Bill], status: Option<BillStatus>, policy: &FilterPolicy) -> Vec<Bill> {
    let Some(status) = status else {
        return Vec::new();
    };
    bills
        .iter()
        .filter(|bill| bill.status == status && policy.admits(bill))
        .cloned()
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct SelectedBill {
    id: String,
    expanded: bool,
}

/// Administrator dashboard: three status lists and a detail panel.
pub struct DashboardController {
    store: Option<Arc<dyn Store>>,
    navigator: Arc<dyn Navigator>,
    session: Session,
    filter_mode: FilterMode,
    test_accounts: Vec<String>,
    lists: BTreeMap<u8, ListState>,
    selected: Option<SelectedBill>,
}

impl DashboardController {
    pub fn new(
        store: Option<Arc<dyn Store>>,
        navigator: Arc<dyn Navigator>,
        session: Session,
        config: &Config,
    ) -> Self {
        DashboardController {
            store,
            navigator,
            session,
            filter_mode: config.filter_mode,
            test_accounts: config.test_accounts.clone(),
            lists: BTreeMap::new(),
            selected: None,
        }
    }

    /// Live filtering excludes the test accounts and the connected admin.
    pub fn filter_policy(&self) -> FilterPolicy {
        match self.filter_mode {
            FilterMode::StatusOnly => FilterPolicy::StatusOnly,
            FilterMode::Live => {
                let mut excluded = self.test_accounts.clone();
                match self.session.current_email() {
                    Ok(Some(email)) => excluded.push(email),
                    Ok(None) => {}
                    Err(err) => warn!("Could not read session user: {}", err),
                }
                FilterPolicy::Live { excluded }
            }
        }
    }

    pub fn list_state(&self, index: u8) -> ListState {
        self.lists.get(&index).copied().unwrap_or_default()
    }

    pub fn open_lists(&self) -> Vec<u8> {
        self.lists
            .iter()
            .filter(|(_, state)| **state == ListState::Open)
            .map(|(index, _)| *index)
            .collect()
    }

    pub fn selected_bill(&self) -> Option<&str> {
        self.selected.as_ref().map(|s| s.id.as_str())
    }

    pub fn is_detail_expanded(&self) -> bool {
        self.selected.as_ref().map(|s| s.expanded).unwrap_or(false)
    }

    /// Arrow click on list `index`. Only that list changes state.
    pub fn handle_show_tickets(&mut self, bills: &[Bill], index: u8) -> ListView {
        let state = self.list_state(index).toggled();
        self.lists.insert(index, state);

        let status = get_status(index);
        let cards = match state {
            ListState::Open => {
                let mut cards = filtered_bills(bills, status, &self.filter_policy());
                cards.sort_by(|a, b| b.date.cmp(&a.date));
                cards
            }
            ListState::Closed => Vec::new(),
        };
        debug!("List {} is now {:?} with {} cards", index, state, cards.len());

        ListView {
            index,
            status,
            state,
            cards,
            clickable: bills.iter().map(|b| b.id.clone()).collect(),
        }
    }

    /// Card click. Clicking another bill starts collapsed, so its form shows.
    pub fn handle_edit_ticket(&mut self, bill: &Bill, bills: &[Bill]) -> DetailView {
        let selected = match self.selected.take() {
            Some(current) if current.id == bill.id => current,
            _ => SelectedBill {
                id: bill.id.clone(),
                expanded: false,
            },
        };

        let (view, expanded) = if selected.expanded {
            (
                DetailView::Placeholder {
                    bill_id: bill.id.clone(),
                },
                false,
            )
        } else {
            (
                DetailView::Form {
                    bill: bill.clone(),
                    others: bills.iter().map(|b| b.id.clone()).collect(),
                },
                true,
            )
        };

        self.selected = Some(SelectedBill {
            id: selected.id,
            expanded,
        });
        view
    }

    pub fn handle_click_icon_eye(&self, bill_url: &str, container_width: f64) -> ReceiptPreview {
        ReceiptPreview::new(PreviewModal::Admin, bill_url, container_width)
    }

    pub async fn handle_accept_submit(&self, bill: &Bill, comment: &str) -> Bill {
        self.decide(bill, BillStatus::Accepted, comment).await
    }

    pub async fn handle_refuse_submit(&self, bill: &Bill, comment: &str) -> Bill {
        self.decide(bill, BillStatus::Refused, comment).await
    }

    async fn decide(&self, bill: &Bill, status: BillStatus, comment: &str) -> Bill {
        let decided = Bill {
            status,
            comment_admin: Some(comment.to_string()),
            ..bill.clone()
        };
        self.update_bill(&decided).await;
        self.navigator.navigate(Route::Dashboard);
        decided
    }

    pub async fn get_bills_all_users(&self) -> Result<Option<Vec<Bill>>, StoreError> {
        let Some(store) = &self.store else {
            return Ok(None);
        };
        let bills = store.list_bills().await?;
        Ok(Some(bills))
    }

    /// Best effort: failures are logged and yield `None`.
    pub async fn update_bill(&self, bill: &Bill) -> Option<Bill> {
        let store = self.store.as_ref()?;
        let data = match serde_json::to_string(bill) {
            Ok(data) => data,
            Err(err) => {
                error!("Could not serialize bill {}: {}", bill.id, err);
                return None;
            }
        };
        match store.update_bill(&bill.id, &data).await {
            Ok(updated) => Some(updated),
            Err(err) => {
                error!("Bill {} update failed: {}", bill.id, err);
                None
            }
        }
    }
}
