//! Alert system for displaying success, warning and error messages to users.
//!
//! Alerts are rendered either inline on a page or as a fragment that HTMX swaps
//! into `#alert-container` when a form post fails.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

/// Alert message types for styling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertType {
    Success,
    Warning,
    Error,
}

/// An alert message with an optional line of details.
#[derive(Debug, Clone)]
pub struct Alert<'a> {
    pub alert_type: AlertType,
    pub message: &'a str,
    pub details: &'a str,
}

impl<'a> Alert<'a> {
    /// Create a new success alert
    pub fn success(message: &'a str, details: &'a str) -> Self {
        Self {
            alert_type: AlertType::Success,
            message,
            details,
        }
    }

    /// Create a new warning alert
    pub fn warning(message: &'a str, details: &'a str) -> Self {
        Self {
            alert_type: AlertType::Warning,
            message,
            details,
        }
    }

    /// Create a new error alert
    pub fn error(message: &'a str, details: &'a str) -> Self {
        Self {
            alert_type: AlertType::Error,
            message,
            details,
        }
    }

    pub fn into_html(self) -> Markup {
        let style = match self.alert_type {
            AlertType::Success => {
                "p-4 mb-4 text-sm text-green-800 rounded-lg bg-green-50 \
                dark:bg-gray-800 dark:text-green-400 border border-green-300 \
                dark:border-green-800"
            }
            AlertType::Warning => {
                "p-4 mb-4 text-sm text-yellow-800 rounded-lg bg-yellow-50 \
                dark:bg-gray-800 dark:text-yellow-300 border border-yellow-300 \
                dark:border-yellow-800"
            }
            AlertType::Error => {
                "p-4 mb-4 text-sm text-red-800 rounded-lg bg-red-50 \
                dark:bg-gray-800 dark:text-red-400 border border-red-300 \
                dark:border-red-800"
            }
        };

        html! {
            div
                class=(style)
                role="alert"
                data-alert-type=(format!("{:?}", self.alert_type).to_lowercase())
            {
                span class="font-medium" { (self.message) }

                @if !self.details.is_empty() {
                    " " (self.details)
                }
            }
        }
    }

    /// Render the alert as a response with `status_code`.
    pub fn into_response_with_status(self, status_code: StatusCode) -> Response {
        (status_code, self.into_html()).into_response()
    }
}
