//! Subcommand bodies.
//!
//! Input problems surface as [`CoreError`] so `main` can map them to exit
//! code 2; everything else is an ordinary failure.

use std::sync::Arc;

use chrono::{Local, NaiveDate};
use loteria_client::{ApiClient, ClientConfig, HttpApiClient, MemoryStore, SessionManager};
use loteria_core::access::{self, default_navigation, filter_navigation, Action, Resource, Role};
use loteria_core::cash_count::{compute_totals, CashCountRequest, DenominationSet, DenominationTable};
use loteria_core::{CoreError, CoreResult, ValidationError};
use tracing::info;

use crate::cli::Credentials;

// =============================================================================
// Offline Commands
// =============================================================================

/// Fills a BRL set from `label=qty` arguments.
pub fn parse_pairs(pairs: &[String]) -> CoreResult<DenominationSet> {
    let mut set = DenominationSet::new(DenominationTable::brl());
    for pair in pairs {
        let (label, qty) = pair.split_once('=').ok_or_else(|| ValidationError::InvalidFormat {
            field: pair.clone(),
            reason: "expected LABEL=QTY".to_string(),
        })?;
        set.set_raw(label.trim(), qty)?;
    }
    Ok(set)
}

/// Human-readable count summary: one line per counted denomination, then totals.
pub fn render_summary(set: &DenominationSet) -> String {
    let totals = compute_totals(set);
    let mut out = String::new();

    for (denomination, quantity, subtotal) in set.subtotals() {
        if quantity == 0 {
            continue;
        }
        out.push_str(&format!(
            "{:>10} x {:<5} {}\n",
            denomination.face_value().to_string(),
            quantity,
            subtotal
        ));
    }

    out.push_str(&format!("Total em notas:  {}\n", totals.total_notes));
    out.push_str(&format!("Total em moedas: {}\n", totals.total_coins));
    out.push_str(&format!("Total geral:     {}\n", totals.grand_total));
    out
}

pub fn count_request(
    set: &DenominationSet,
    caixa: Option<&str>,
    date: Option<NaiveDate>,
) -> CoreResult<CashCountRequest> {
    let today = Local::now().date_naive();
    CashCountRequest::new(set, caixa.unwrap_or_default(), date.unwrap_or(today), today)
}

/// `"<role> may|may not <action> <resource>"`.
pub fn check_access(role: &str, resource: &str, action: &str) -> CoreResult<(bool, String)> {
    let role: Role = role.parse()?;
    let resource: Resource = resource.parse()?;
    let action: Action = action.parse()?;

    let allowed = access::can(role, resource, action);
    let verdict = if allowed { "permitido" } else { "negado" };
    Ok((
        allowed,
        format!("{}: {} {} → {}", role.display_name(), action, resource, verdict),
    ))
}

pub fn menu_lines(role: &str) -> CoreResult<Vec<String>> {
    let role: Role = role.parse()?;
    let items = default_navigation();
    Ok(filter_navigation(role, &items)
        .into_iter()
        .map(|item| format!("{:<12} {}", item.route, item.name))
        .collect())
}

// =============================================================================
// Back-end Commands
// =============================================================================

/// The `reqwest` client for the configured back-end.
pub fn http_api(config: &ClientConfig) -> anyhow::Result<Arc<dyn ApiClient>> {
    Ok(Arc::new(HttpApiClient::new(config)?))
}

/// Logs in with an in-memory session that ends with the process.
pub async fn open_session(
    api: Arc<dyn ApiClient>,
    config: &ClientConfig,
    credentials: &Credentials,
) -> anyhow::Result<SessionManager> {
    let sessions = SessionManager::new(api, Arc::new(MemoryStore::new()), config);

    let email = credentials.email.as_deref().unwrap_or_default();
    let password = credentials.password.as_deref().unwrap_or_default();
    sessions.login(email, password).await?;
    Ok(sessions)
}

/// Logs out whatever `result` is; the command's own error wins.
async fn finish<T>(sessions: &SessionManager, result: anyhow::Result<T>) -> anyhow::Result<T> {
    let logout = sessions.logout().await;
    let value = result?;
    logout?;
    Ok(value)
}

pub async fn whoami(
    api: Arc<dyn ApiClient>,
    config: &ClientConfig,
    credentials: &Credentials,
) -> anyhow::Result<()> {
    let sessions = open_session(api, config, credentials).await?;
    let result = print_user(&sessions).await;
    finish(&sessions, result).await
}

async fn print_user(sessions: &SessionManager) -> anyhow::Result<()> {
    let session = sessions.require_session().await?;

    println!("{} <{}>", session.user.name, session.user.email);
    println!("Papel: {}", session.role().display_name());
    let items = default_navigation();
    let routes: Vec<_> = filter_navigation(session.role(), &items)
        .into_iter()
        .map(|item| item.name.as_str())
        .collect();
    println!("Menu: {}", routes.join(", "));
    Ok(())
}

pub async fn list_active_boxes(
    api: Arc<dyn ApiClient>,
    config: &ClientConfig,
    credentials: &Credentials,
) -> anyhow::Result<()> {
    let sessions = open_session(api, config, credentials).await?;
    let result = print_active_boxes(&sessions).await;
    finish(&sessions, result).await
}

async fn print_active_boxes(sessions: &SessionManager) -> anyhow::Result<()> {
    for cash_box in sessions.cash_boxes().active().await? {
        println!("{:<38} {}", cash_box.id, cash_box.label());
    }
    Ok(())
}

pub async fn submit_count(
    api: Arc<dyn ApiClient>,
    config: &ClientConfig,
    credentials: &Credentials,
    request: &CashCountRequest,
) -> anyhow::Result<()> {
    let sessions = open_session(api, config, credentials).await?;
    let result = send_count(&sessions, request).await;
    finish(&sessions, result).await
}

async fn send_count(sessions: &SessionManager, request: &CashCountRequest) -> anyhow::Result<()> {
    let stored = sessions.cash_counts().create(request).await?;
    info!(count_id = %stored.id, "Count submitted");
    println!("Contagem registrada: {} (diferença {})", stored.id, stored.difference);
    Ok(())
}

/// True when the failure was caused by bad user input.
pub fn is_input_error(err: &anyhow::Error) -> bool {
    if err.downcast_ref::<CoreError>().is_some() || err.downcast_ref::<ValidationError>().is_some() {
        return true;
    }
    matches!(
        err.downcast_ref::<loteria_client::ClientError>(),
        Some(loteria_client::ClientError::Core(_))
    )
}
