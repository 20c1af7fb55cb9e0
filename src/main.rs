use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use billed::db::SqliteStorage;
use billed::services::http_store::HttpStore;
use billed::services::render::{HtmlRenderer, Renderer};
use billed::{
    BillsController, Config, DashboardController, History, LoginController, LoginForm,
    NewBillController, NewBillForm, Session, Store,
};

#[derive(Parser)]
#[command(name = "billed")]
#[command(about = "Billed expense reports CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in, registering the account on first use.
    Login {
        #[arg(value_enum)]
        role: Role,
        email: String,
        password: String,
    },
    /// List the connected employee's bills.
    Bills,
    /// Upload a receipt and submit the bill that goes with it.
    NewBill {
        receipt: PathBuf,
        #[arg(value_name = "TYPE")]
        expense_type: String,
        name: String,
        amount: String,
        date: String,
        #[arg(default_value = "")]
        vat: String,
        #[arg(default_value = "")]
        pct: String,
        #[arg(default_value = "")]
        commentary: String,
    },
    /// Render one status list of the admin dashboard.
    Dashboard {
        #[arg(value_parser = clap::value_parser!(u8).range(1..=3))]
        index: Option<u8>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Role {
    Employee,
    Admin,
}

struct App {
    config: Config,
    session: Session,
    store: Arc<dyn Store>,
    history: Arc<History>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load();
    let storage = SqliteStorage::new(&config.storage_path)
        .with_context(|| format!("Open local storage at {}", config.storage_path))?;
    let session = Session::new(Arc::new(storage));
    let store: Arc<dyn Store> = Arc::new(HttpStore::new(&config.api_url, session.clone()));
    let app = App {
        config,
        session,
        store,
        history: Arc::new(History::new()),
    };

    match cli.command {
        Commands::Login { role, email, password } => login(&app, role, email, password).await?,
        Commands::Bills => bills(&app).await?,
        Commands::NewBill {
            receipt,
            expense_type,
            name,
            amount,
            date,
            vat,
            pct,
            commentary,
        } => {
            let form = NewBillForm {
                expense_type,
                name,
                amount,
                date,
                vat,
                pct,
                commentary,
            };
            new_bill(&app, &receipt, &form).await?
        }
        Commands::Dashboard { index } => dashboard(&app, index.unwrap_or(1)).await?,
    }

    if let Some(route) = app.history.current() {
        info!("Navigated to {}", route.path());
    }
    Ok(())
}

async fn login(app: &App, role: Role, email: String, password: String) -> Result<()> {
    let mut controller = LoginController::new(Some(app.store.clone()), app.history.clone(), app.session.clone());
    let form = LoginForm { email, password };
    let handoff = match role {
        Role::Employee => controller.handle_submit_employee(&form).await?,
        Role::Admin => controller.handle_submit_admin(&form).await?,
    };
    println!("{}", serde_json::to_string_pretty(&handoff)?);
    Ok(())
}

async fn bills(app: &App) -> Result<()> {
    let controller = BillsController::new(Some(app.store.clone()), app.history.clone());
    let bills = controller.get_bills().await?.unwrap_or_default();
    println!("{}", serde_json::to_string_pretty(&bills)?);
    Ok(())
}

async fn new_bill(app: &App, receipt: &Path, form: &NewBillForm) -> Result<()> {
    let bytes = std::fs::read(receipt).with_context(|| format!("Read receipt {}", receipt.display()))?;
    let mut controller = NewBillController::new(Some(app.store.clone()), app.history.clone(), app.session.clone());
    controller
        .handle_change_file(&receipt.to_string_lossy(), bytes)
        .await?;
    let bill = controller.handle_submit(form).await?;
    println!("{}", serde_json::to_string_pretty(&bill)?);
    Ok(())
}

async fn dashboard(app: &App, index: u8) -> Result<()> {
    let mut controller = DashboardController::new(
        Some(app.store.clone()),
        app.history.clone(),
        app.session.clone(),
        &app.config,
    );
    let bills = controller.get_bills_all_users().await?.unwrap_or_default();
    let view = controller.handle_show_tickets(&bills, index);
    let patches = HtmlRenderer.list(&view)?;
    println!("{}", serde_json::to_string_pretty(&patches)?);
    Ok(())
}
