use serde::Serialize;

use crate::models::{Bill, BillStatus};

pub const CARD_BACKGROUND: &str = "#0D5AE5";
pub const SELECTED_CARD_BACKGROUND: &str = "#2A2B35";
pub const NAVBAR_EXPANDED_HEIGHT: &str = "150vh";
pub const NAVBAR_COLLAPSED_HEIGHT: &str = "120vh";
pub const NEUTRAL_BACKGROUND: &str = "#fff";

/// Overlay that hosts a receipt preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PreviewModal {
    Employee,
    Admin,
}

impl PreviewModal {
    pub fn selector(&self) -> &'static str {
        match self {
            PreviewModal::Employee => "#modaleFile",
            PreviewModal::Admin => "#modaleFileAdmin1",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReceiptPreview {
    pub modal: PreviewModal,
    pub image_width: u32,
    pub bill_url: String,
}

impl ReceiptPreview {
    pub fn new(modal: PreviewModal, bill_url: &str, container_width: f64) -> Self {
        let width = (container_width * 0.5).floor();
        ReceiptPreview {
            modal,
            image_width: if width.is_finite() && width > 0.0 { width as u32 } else { 0 },
            bill_url: bill_url.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum ListState {
    Open,
    #[default]
    Closed,
}

impl ListState {
    pub fn toggled(self) -> Self {
        match self {
            ListState::Open => ListState::Closed,
            ListState::Closed => ListState::Open,
        }
    }

    /// CSS transform of the disclosure arrow.
    pub fn arrow_transform(&self) -> &'static str {
        match self {
            ListState::Open => "rotate(0deg)",
            ListState::Closed => "rotate(90deg)",
        }
    }
}

/// One status-grouped list on the dashboard after an arrow click.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListView {
    pub index: u8,
    pub status: Option<BillStatus>,
    pub state: ListState,
    /// Cards shown in the list container; empty when closed.
    pub cards: Vec<Bill>,
    /// Every bill whose card opens the detail panel when clicked.
    pub clickable: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DetailView {
    Form {
        bill: Bill,
        /// Cards reset to the default background before highlighting.
        others: Vec<String>,
    },
    Placeholder {
        bill_id: String,
    },
}

impl DetailView {
    pub fn navbar_height(&self) -> &'static str {
        match self {
            DetailView::Form { .. } => NAVBAR_EXPANDED_HEIGHT,
            DetailView::Placeholder { .. } => NAVBAR_COLLAPSED_HEIGHT,
        }
    }

    pub fn is_form(&self) -> bool {
        matches!(self, DetailView::Form { .. })
    }
}
