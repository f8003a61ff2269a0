//! services/client/src/bin/sysfree.rs
//!
//! Command-line front end: restores or opens a session, then prints the first
//! page of a back-office collection.
//!
//! Usage: `sysfree [collection]` where collection is one of the names in
//! `COLLECTIONS` (default `productos`). `SYSFREE_EMAIL` / `SYSFREE_PASSWORD`
//! log in first, `SYSFREE_SEARCH` filters the list.

use std::sync::Arc;

use sysfree_client::{
    config::Config,
    debounce::Debouncer,
    error::ClientError,
    guard::GuardDecision,
    pagination::ListController,
    services::{Api, Resource},
    state::AppState,
};
use sysfree_core::{
    domain::Record,
    formatters::{format_currency, format_date, truncate_text, DEFAULT_TRUNCATE_LENGTH},
    forms::LoginForm,
    paging::{page_window, DEFAULT_MAX_PAGES},
    query::Filters,
};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const COLLECTIONS: [&str; 9] = [
    "productos",
    "categorias",
    "proveedores",
    "movimientos",
    "clientes",
    "ventas",
    "reparaciones",
    "asientos",
    "cuentas",
];

fn collection(api: &Api, name: &str) -> Option<Resource> {
    let resource = match name {
        "productos" => api.inventory().products(),
        "categorias" => api.inventory().categories(),
        "proveedores" => api.inventory().suppliers(),
        "movimientos" => api.inventory().movements(),
        "clientes" => api.customers().customers(),
        "ventas" => api.sales().sales(),
        "reparaciones" => api.repairs().repairs(),
        "asientos" => api.accounting().journal_entries(),
        "cuentas" => api.accounting().accounts(),
        _ => return None,
    };
    Some(resource)
}

#[tokio::main]
async fn main() -> Result<(), ClientError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Talking to {}", config.api_url);

    // --- 2. Build the Shared AppState ---
    let state = AppState::from_config(config.clone())?;
    let forced_logouts = state.watch_forced_logouts();

    // --- 3. Restore or Open the Session ---
    state.session.initialize().await;
    if let (Ok(email), Ok(password)) = (std::env::var("SYSFREE_EMAIL"), std::env::var("SYSFREE_PASSWORD")) {
        let form = LoginForm { email, password };
        let errors = form.validate();
        if !errors.is_empty() {
            for (field, message) in &errors {
                eprintln!("{field}: {message}");
            }
            return Err(ClientError::Internal("invalid login form".to_string()));
        }
        if state.session.login(&form.email, &form.password).await.is_err() {
            let message = state.session.error().unwrap_or_default();
            eprintln!("{message}");
        }
    }

    let user = match state.guard.resolve(&state.session).await {
        GuardDecision::Allow(user) => user,
        GuardDecision::Redirect { to } => {
            if let Some(message) = state.session.error() {
                eprintln!("{message}");
            }
            warn!("Not logged in, the login screen is at {}", to);
            state.shutdown.cancel();
            return Ok(());
        }
        GuardDecision::Pending => {
            return Err(ClientError::Internal("session never settled".to_string()));
        }
    };
    info!("Signed in as {}", user.display_name());

    // --- 4. List the Requested Collection ---
    let name = std::env::args().nth(1).unwrap_or_else(|| "productos".to_string());
    let Some(resource) = collection(&state.api, &name) else {
        return Err(ClientError::Internal(format!(
            "unknown collection '{}', expected one of: {}",
            name,
            COLLECTIONS.join(", ")
        )));
    };
    let list: ListController<Record> = ListController::new(Arc::new(resource), Filters::new());

    if let Ok(search) = std::env::var("SYSFREE_SEARCH") {
        let debouncer = Debouncer::new(String::new(), config.debounce);
        let mut settled = debouncer.subscribe();
        debouncer.set(search);
        if settled.changed().await.is_ok() {
            let term = settled.borrow_and_update().clone();
            list.apply_filters([("search", term)]);
        }
    }

    list.load().await;
    let page = list.state();
    if let Some(message) = &page.error {
        error!("Listing {} failed", name);
        eprintln!("{message}");
    } else if page.items.is_empty() {
        println!("No records found.");
    } else {
        for item in &page.items {
            println!("{}", render_row(item));
        }
        let total_pages = u32::try_from(page.total_pages).unwrap_or(u32::MAX);
        match page_window(list.current_page(), total_pages, DEFAULT_MAX_PAGES) {
            Some(window) => println!(
                "{} records, page {} of {} (showing pages {}-{})",
                page.total_items, window.current, window.total, window.start, window.end
            ),
            None => println!("{} records", page.total_items),
        }
    }

    // --- 5. Shut Down ---
    state.shutdown.cancel();
    if let Err(e) = forced_logouts.await {
        warn!("Session watcher ended abnormally: {:?}", e);
    }
    Ok(())
}

/// One line per record: id, a label, an amount and a date when present.
fn render_row(item: &Record) -> String {
    let text = |keys: &[&str]| {
        keys.iter()
            .find_map(|key| item.get(*key).and_then(Record::as_str))
            .unwrap_or_default()
            .to_string()
    };
    let amount = ["precio_venta", "total", "saldo", "monto"]
        .iter()
        .find_map(|key| match item.get(*key) {
            Some(Record::Number(n)) => n.as_f64(),
            Some(Record::String(s)) => s.parse().ok(),
            _ => None,
        });

    let id = item.get("id").map(|id| id.to_string()).unwrap_or_default();
    let label = truncate_text(
        &text(&["nombre", "nombres", "numero", "codigo", "descripcion"]),
        DEFAULT_TRUNCATE_LENGTH,
    );
    let date = format_date(&text(&["fecha", "fecha_creacion", "fecha_ingreso"]));

    format!("{:>6}  {:<50}  {:>14}  {}", id, label, format_currency(amount), date)
}
