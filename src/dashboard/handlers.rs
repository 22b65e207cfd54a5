//! Dashboard HTTP handlers and view rendering.
//!
//! This module contains:
//! - The route handler for displaying the dashboard
//! - HTML view functions for the entry form and the analysis section
//! - The state used by the handler

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use time::{Date, OffsetDateTime};

use crate::{
    AppState, Error,
    account::get_account,
    analysis::{CategoryTotals, ExpenseSummary, salary_grouped_amounts},
    auth::Session,
    dashboard::{
        cards::{signal_view, summary_cards_view},
        charts::{
            DashboardChart, ECHARTS_URL, charts_script, charts_view, expense_distribution_chart,
            salary_bar_chart,
        },
        tables::expense_history_table,
    },
    endpoints,
    html::{
        FORM_TEXT_INPUT_STYLE, HeadElement, base, format_currency, labelled_field,
        rupee_input_styles, submit_button,
    },
    ledger::{ExpenseEntry, list_entries},
    navigation::NavBar,
    timezone::get_local_offset,
};

/// The state needed for displaying the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for reading accounts and entries.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Asia/Kolkata".
    pub local_timezone: String,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Display the logged in user's entry form, history and analysis.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    Extension(session): Extension<Session>,
) -> Result<Response, Error> {
    let local_timezone = get_local_offset(&state.local_timezone).ok_or_else(|| {
        tracing::error!("Invalid timezone {}", state.local_timezone);
        Error::InvalidTimezoneError(state.local_timezone.clone())
    })?;
    let today = OffsetDateTime::now_utc().to_offset(local_timezone).date();

    let (account, entries) = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        let account = get_account(session.account_id, &connection).inspect_err(|error| {
            tracing::error!("could not get account {}: {error}", session.account_id)
        })?;
        let entries = list_entries(&session.username, &connection).inspect_err(|error| {
            tracing::error!("could not get entries for {}: {error}", session.username)
        })?;

        (account, entries)
    };

    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW).into_html();
    let entry_form = entry_form_view(today);

    if entries.is_empty() {
        let content = html!(
            (nav_bar)

            div class="flex flex-col items-center px-2 lg:px-6 lg:py-8 mx-auto max-w-screen-xl text-gray-900 dark:text-white"
            {
                (welcome_view(account.username.as_str(), account.monthly_salary))
                (entry_form)
                (no_data_view())
            }
        );

        return Ok(base("Dashboard", &[rupee_input_styles()], &content).into_response());
    }

    let charts = build_dashboard_charts(&entries, account.monthly_salary);
    let summary = ExpenseSummary::from_entries(&entries);

    let content = html!(
        (nav_bar)

        div
            id="dashboard-content"
            class="flex flex-col items-center gap-4 px-2 lg:px-6 lg:py-8 mx-auto
                max-w-screen-xl text-gray-900 dark:text-white"
        {
            (welcome_view(account.username.as_str(), account.monthly_salary))
            (entry_form)
            (expense_history_table(&entries))
            (summary_cards_view(&summary))
            (signal_view(summary.signal()))
            (charts_view(&charts))
        }
    );

    let head_elements = [
        rupee_input_styles(),
        HeadElement::ScriptLink(ECHARTS_URL.to_owned()),
        charts_script(&charts),
    ];

    Ok(base("Dashboard", &head_elements, &content).into_response())
}

/// Creates the pie and bar charts for `entries`.
fn build_dashboard_charts(entries: &[ExpenseEntry], salary: f64) -> [DashboardChart; 2] {
    [
        DashboardChart {
            id: "expense-distribution-chart",
            options: expense_distribution_chart(&CategoryTotals::from_entries(entries))
                .to_string(),
        },
        DashboardChart {
            id: "salary-expenses-chart",
            options: salary_bar_chart(&salary_grouped_amounts(entries, salary)).to_string(),
        },
    ]
}

fn welcome_view(username: &str, salary: f64) -> Markup {
    html! {
        div class="w-full" {
            h2 id="welcome" class="text-2xl font-bold" { "Welcome, " (username) "!" }
            p class="text-sm text-gray-500 dark:text-gray-400" {
                "Monthly salary: " (format_currency(salary))
            }
        }
    }
}

fn amount_input(name: &str, label: &str) -> Markup {
    let input = html! {
        div class="input-wrapper w-full" {
            input
                type="number"
                name=(name)
                id=(name)
                min="0"
                step="0.01"
                placeholder="0.00"
                class=(FORM_TEXT_INPUT_STYLE);
        }
    };

    labelled_field(name, label, input, None)
}

/// The form for adding an entry. Blank amounts are recorded as zero.
fn entry_form_view(today: Date) -> Markup {
    let date_input = html! {
        input
            type="date"
            name="date"
            id="date"
            max=(today)
            value=(today)
            class=(FORM_TEXT_INPUT_STYLE)
            required;
    };

    html! {
        section class="w-full p-4 rounded-lg shadow bg-white dark:bg-gray-800" {
            h3 class="text-xl font-semibold mb-4" { "Add an Entry" }

            form
                hx-post=(endpoints::EXPENSES_API)
                hx-target-error="#alert-container"
                hx-indicator="#indicator"
                hx-disabled-elt="#submit-button"
                class="grid grid-cols-1 md:grid-cols-3 gap-4"
            {
                (labelled_field("date", "Date", date_input, None))

                (amount_input("food", "Food"))
                (amount_input("fuel", "Fuel"))
                (amount_input("groceries", "Groceries"))
                (amount_input("other", "Other"))
                (amount_input("savings", "Savings"))

                div class="md:col-span-3" {
                    (submit_button("Add Entry"))
                }
            }
        }
    }
}

fn no_data_view() -> Markup {
    html! {
        div id="no-data" class="flex flex-col items-center py-8" {
            h2 class="text-xl font-bold" { "Nothing here yet..." }

            p {
                "Your totals and charts will show up here once you add an entry above."
            }
        }
    }
}
