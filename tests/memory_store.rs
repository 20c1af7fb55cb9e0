mod common;

use std::sync::Arc;

use billed::services::memory_store::MemoryStore;
use billed::{
    BillStatus, BillsController, Config, DashboardController, FilterMode, LoginController,
    LoginForm, NewBillController, NewBillForm, Route, Session, Store,
};
use common::history;

#[tokio::test]
async fn employee_submits_and_admin_accepts() {
    let memory = Arc::new(MemoryStore::new());
    let store: Arc<dyn Store> = memory.clone();
    let nav = history();

    let employee = Session::in_memory();
    let mut login = LoginController::new(Some(store.clone()), nav.clone(), employee.clone());
    login
        .handle_submit_employee(&LoginForm {
            email: "jane.doe@company.tld".to_string(),
            password: "secret".to_string(),
        })
        .await
        .unwrap();
    assert!(memory.user("jane.doe@company.tld").await.is_some());
    assert!(employee.token().unwrap().is_some());

    let mut new_bill = NewBillController::new(Some(store.clone()), nav.clone(), employee.clone());
    let created = new_bill
        .handle_change_file("/home/jane/receipt.jpeg", b"receipt".to_vec())
        .await
        .unwrap()
        .unwrap();
    assert!(created.file_url.starts_with("memory://receipts/"));
    new_bill
        .handle_submit(&NewBillForm {
            expense_type: "Restaurants et bars".to_string(),
            name: "Déjeuner".to_string(),
            amount: "42".to_string(),
            date: "2023-05-17".to_string(),
            vat: "7".to_string(),
            pct: "10".to_string(),
            commentary: String::new(),
        })
        .await
        .unwrap();

    let rows = BillsController::new(Some(store.clone()), nav.clone())
        .get_bills()
        .await
        .unwrap()
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].date, "17 Mai. 23");
    assert_eq!(rows[0].name, "Déjeuner");

    let admin = Session::in_memory();
    let config = Config {
        filter_mode: FilterMode::Live,
        ..Config::default()
    };
    let mut dashboard = DashboardController::new(Some(store.clone()), nav.clone(), admin, &config);
    let bills = dashboard.get_bills_all_users().await.unwrap().unwrap();
    let pending = dashboard.handle_show_tickets(&bills, 1);
    assert_eq!(pending.cards.len(), 1);

    dashboard.handle_accept_submit(&pending.cards[0], "ok").await;
    let stored = memory.bills().await;
    assert_eq!(stored[0].status, BillStatus::Accepted);
    assert_eq!(stored[0].comment_admin.as_deref(), Some("ok"));
    assert_eq!(nav.current(), Some(Route::Dashboard));
}

#[tokio::test]
async fn wrong_password_is_rejected_by_memory_store() {
    let memory = MemoryStore::new();
    memory
        .create_user(r#"{"type":"Admin","name":"admin","email":"admin@company.tld","password":"admin"}"#)
        .await
        .unwrap();
    let err = memory
        .login(r#"{"email":"admin@company.tld","password":"nope"}"#)
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(401));
}
