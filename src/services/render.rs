use askama::Template;
use serde::Serialize;
use thiserror::Error;

use crate::models::views::{
    DetailView, ListView, ReceiptPreview, CARD_BACKGROUND, SELECTED_CARD_BACKGROUND,
};
use crate::models::Bill;
use crate::services::formatter::format_date;

const DETAIL_CONTAINER: &str = ".dashboard-right-container div";
const NAVBAR: &str = ".vertical-navbar";

#[derive(Debug, Error)]
#[error("Could not render template: {0}")]
pub struct RenderError(#[from] askama::Error);

/// A single change applied to the page by the view layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DomPatch {
    SetHtml { selector: String, html: String },
    SetCss { selector: String, property: &'static str, value: String },
    ShowModal { selector: String },
}

impl DomPatch {
    fn html(selector: impl Into<String>, html: impl Into<String>) -> Self {
        DomPatch::SetHtml {
            selector: selector.into(),
            html: html.into(),
        }
    }

    fn css(selector: impl Into<String>, property: &'static str, value: impl Into<String>) -> Self {
        DomPatch::SetCss {
            selector: selector.into(),
            property,
            value: value.into(),
        }
    }
}

/// Turns controller view models into page changes.
pub trait Renderer {
    fn receipt_preview(&self, preview: &ReceiptPreview) -> Result<Vec<DomPatch>, RenderError>;
    fn list(&self, view: &ListView) -> Result<Vec<DomPatch>, RenderError>;
    fn detail(&self, view: &DetailView) -> Result<Vec<DomPatch>, RenderError>;
}

/// Renderer producing the fragments the Billed view templates expect.
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlRenderer;

impl Renderer for HtmlRenderer {
    fn receipt_preview(&self, preview: &ReceiptPreview) -> Result<Vec<DomPatch>, RenderError> {
        let selector = preview.modal.selector();
        let body = ReceiptPreviewTemplate {
            width: preview.image_width,
            url: &preview.bill_url,
        }
        .render()?;
        Ok(vec![
            DomPatch::html(format!("{} .modal-body", selector), body),
            DomPatch::ShowModal {
                selector: selector.to_string(),
            },
        ])
    }

    fn list(&self, view: &ListView) -> Result<Vec<DomPatch>, RenderError> {
        Ok(vec![
            DomPatch::css(
                format!("#arrow-icon{}", view.index),
                "transform",
                view.state.arrow_transform(),
            ),
            DomPatch::html(format!("#status-bills-container{}", view.index), cards(&view.cards)?),
        ])
    }

    fn detail(&self, view: &DetailView) -> Result<Vec<DomPatch>, RenderError> {
        let mut patches = Vec::new();
        match view {
            DetailView::Form { bill, others } => {
                for id in others {
                    patches.push(DomPatch::css(format!("#open-bill{}", id), "background", CARD_BACKGROUND));
                }
                patches.push(DomPatch::css(
                    format!("#open-bill{}", bill.id),
                    "background",
                    SELECTED_CARD_BACKGROUND,
                ));
                patches.push(DomPatch::html(DETAIL_CONTAINER, dashboard_form(bill)?));
            }
            DetailView::Placeholder { bill_id } => {
                patches.push(DomPatch::css(format!("#open-bill{}", bill_id), "background", CARD_BACKGROUND));
                patches.push(DomPatch::html(DETAIL_CONTAINER, big_billed_icon()?));
            }
        }
        patches.push(DomPatch::css(NAVBAR, "height", view.navbar_height()));
        Ok(patches)
    }
}

#[derive(Template)]
#[template(path = "receipt_preview.html")]
struct ReceiptPreviewTemplate<'a> {
    width: u32,
    url: &'a str,
}

#[derive(Template)]
#[template(path = "card.html")]
struct CardTemplate<'a> {
    id: &'a str,
    first_name: String,
    last_name: String,
    name: &'a str,
    amount: i64,
    date: String,
    expense_type: &'a str,
}

#[derive(Template)]
#[template(path = "dashboard_form.html")]
struct DashboardFormTemplate<'a> {
    expense_type: &'a str,
    name: &'a str,
    date: String,
    commentary: &'a str,
    amount: i64,
    vat: &'a str,
    pct: i64,
    file_name: &'a str,
    file_url: &'a str,
    comment_admin: &'a str,
}

#[derive(Template)]
#[template(path = "big_billed_icon.html")]
struct BigBilledIconTemplate;

fn display_date(raw: &str) -> String {
    format_date(raw).unwrap_or_else(|_| raw.to_string())
}

/// Splits `first.last@domain` into display names; without a dot the whole
/// local part is the last name.
pub fn card_names(email: &str) -> (String, String) {
    let local = email.split('@').next().unwrap_or_default();
    match local.split_once('.') {
        Some((first, rest)) => {
            let last = rest.split('.').next().unwrap_or_default();
            (first.to_string(), last.to_string())
        }
        None => (String::new(), local.to_string()),
    }
}

pub fn card(bill: &Bill) -> Result<String, RenderError> {
    let (first_name, last_name) = card_names(&bill.email);
    let html = CardTemplate {
        id: &bill.id,
        first_name,
        last_name,
        name: &bill.name,
        amount: bill.amount,
        date: display_date(&bill.date),
        expense_type: &bill.expense_type,
    }
    .render()?;
    Ok(html)
}

pub fn cards(bills: &[Bill]) -> Result<String, RenderError> {
    bills.iter().map(card).collect()
}

pub fn dashboard_form(bill: &Bill) -> Result<String, RenderError> {
    let html = DashboardFormTemplate {
        expense_type: &bill.expense_type,
        name: &bill.name,
        date: display_date(&bill.date),
        commentary: &bill.commentary,
        amount: bill.amount,
        vat: &bill.vat,
        pct: bill.pct,
        file_name: bill.file_name.as_deref().unwrap_or_default(),
        file_url: bill.file_url.as_deref().unwrap_or_default(),
        comment_admin: bill.comment_admin.as_deref().unwrap_or_default(),
    }
    .render()?;
    Ok(html)
}

pub fn big_billed_icon() -> Result<String, RenderError> {
    Ok(BigBilledIconTemplate.render()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::views::{ListState, PreviewModal};
    use crate::models::BillStatus;

    fn bill(id: &str, email: &str, date: &str) -> Bill {
        Bill {
            id: id.to_string(),
            email: email.to_string(),
            expense_type: "Transports".to_string(),
            name: "test".to_string(),
            amount: 100,
            date: date.to_string(),
            vat: "".to_string(),
            pct: 20,
            commentary: "".to_string(),
            file_url: Some("https://test.storage.tld/x.jpg".to_string()),
            file_name: Some("x.jpg".to_string()),
            status: BillStatus::Pending,
            comment_admin: None,
        }
    }

    #[test]
    fn card_names_use_local_part() {
        assert_eq!(card_names("john.doe@company.tld"), ("john".to_string(), "doe".to_string()));
        assert_eq!(card_names("a@a"), (String::new(), "a".to_string()));
    }

    #[test]
    fn card_carries_open_bill_selector_and_formatted_date() {
        let html = card(&bill("b1", "john.doe@company.tld", "2004-04-04")).unwrap();
        assert!(html.contains("id='open-billb1'"));
        assert!(html.contains("data-testid='open-billb1'"));
        assert!(html.contains("4 Avr. 04"));
        assert!(html.contains("john doe"));
    }

    #[test]
    fn card_keeps_raw_date_when_unparseable() {
        let html = card(&bill("b2", "a@a", "someday")).unwrap();
        assert!(html.contains("someday"));
    }

    #[test]
    fn list_patches_arrow_and_container() {
        let view = ListView {
            index: 2,
            status: Some(BillStatus::Accepted),
            state: ListState::Closed,
            cards: vec![],
            clickable: vec![],
        };
        let patches = HtmlRenderer.list(&view).unwrap();
        assert_eq!(
            patches,
            vec![
                DomPatch::css("#arrow-icon2", "transform", "rotate(90deg)"),
                DomPatch::html("#status-bills-container2", ""),
            ]
        );
    }

    #[test]
    fn placeholder_shrinks_navbar() {
        let patches = HtmlRenderer
            .detail(&DetailView::Placeholder {
                bill_id: "b1".to_string(),
            })
            .unwrap();
        assert!(patches.iter().any(|p| matches!(
            p,
            DomPatch::SetHtml { selector, html } if selector == DETAIL_CONTAINER && html.contains("big-billed-icon")
        )));
        assert_eq!(patches.last(), Some(&DomPatch::css(NAVBAR, "height", "120vh")));
    }

    #[test]
    fn preview_fills_modal_body() {
        let preview = ReceiptPreview::new(PreviewModal::Admin, "https://test.jpg", 500.0);
        let patches = HtmlRenderer.receipt_preview(&preview).unwrap();
        match &patches[0] {
            DomPatch::SetHtml { selector, html } => {
                assert_eq!(selector, "#modaleFileAdmin1 .modal-body");
                assert!(html.contains("bill-proof-container"));
                assert!(html.contains("width=250"));
                assert!(html.contains("src=https:"));
            }
            other => panic!("unexpected patch {:?}", other),
        }
    }

    #[test]
    fn bill_text_is_escaped() {
        let mut tagged = bill("b3", "a@a", "2004-04-04");
        tagged.name = "<b>Taxi & co</b>".to_string();
        tagged.commentary = "\"urgent\"".to_string();

        let html = card(&tagged).unwrap();
        assert!(html.contains("&lt;b&gt;Taxi &amp; co&lt;"));
        assert!(!html.contains("<b>"));

        let form = dashboard_form(&tagged).unwrap();
        assert!(form.contains("&quot;urgent&quot;"));
        assert!(form.contains("data-testid=\"btn-accept-bill-d\""));
    }
}
