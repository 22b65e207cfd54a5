//! Defines the endpoint for adding an expense entry to the logged in user's ledger.
use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form.
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use rusqlite::Connection;
use serde::Deserialize;
use time::Date;

use crate::{
    AppState, Error,
    auth::Session,
    endpoints,
    ledger::{ExpenseEntry, add_entry},
};

/// The state needed to add an expense entry.
#[derive(Debug, Clone)]
pub struct AddExpenseState {
    /// The database connection for managing expense entries.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for AddExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The form data for adding an expense entry.
///
/// Amounts left blank are recorded as zero.
#[derive(Debug, Deserialize)]
pub struct ExpenseForm {
    /// The day the money was spent or saved.
    pub date: Date,
    #[serde(default)]
    pub food: Option<f64>,
    #[serde(default)]
    pub fuel: Option<f64>,
    #[serde(default)]
    pub groceries: Option<f64>,
    #[serde(default)]
    pub other: Option<f64>,
    #[serde(default)]
    pub savings: Option<f64>,
}

/// A route handler for adding an expense entry, redirects to the dashboard on success.
pub async fn add_expense_endpoint(
    State(state): State<AddExpenseState>,
    Extension(session): Extension<Session>,
    Form(form): Form<ExpenseForm>,
) -> Response {
    let entry = ExpenseEntry::build(form.date)
        .food(form.food.unwrap_or_default())
        .fuel(form.fuel.unwrap_or_default())
        .groceries(form.groceries.unwrap_or_default())
        .other(form.other.unwrap_or_default())
        .savings(form.savings.unwrap_or_default());

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    if let Err(error) = add_entry(&session.username, entry, &connection) {
        tracing::error!("could not add expense entry: {error}");

        return error.into_alert_response();
    }

    (
        HxRedirect(endpoints::DASHBOARD_VIEW.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}
