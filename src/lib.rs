pub mod commands;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;

pub use commands::bills::BillsController;
pub use commands::dashboard::{filtered_bills, get_status, DashboardController, FilterPolicy};
pub use commands::login::{Handoff, LoginController, LoginForm};
pub use commands::new_bill::{NewBillController, NewBillForm};
pub use config::{Config, FilterMode};
pub use models::{Bill, BillRow, BillStatus, SessionUser, UserType};
pub use services::navigation::{History, Navigator, Route};
pub use services::session::{LocalStorage, MemoryStorage, Session};
pub use services::store::{Store, StoreError};
