//! The sign-up page for creating a new account.
use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error, PasswordHash, ValidatedPassword,
    account::{Username, create_account},
    endpoints,
    html::{
        FORM_TEXT_INPUT_STYLE, base, labelled_field, link, log_in_sign_up, password_input,
        rupee_input_styles, submit_button, username_input,
    },
    internal_server_error::get_internal_server_error_redirect,
};

/// The minimum number of characters the password should have to be considered valid on the client side (server-side validation is done on top of this validation).
const PASSWORD_INPUT_MIN_LENGTH: u8 = 14;

fn confirm_password_input(min_length: u8, error_message: Option<&str>) -> Markup {
    let input = html! {
        input
            type="password"
            name="confirm_password"
            id="confirm-password"
            placeholder="••••••••"
            class=(FORM_TEXT_INPUT_STYLE)
            required
            minlength=(min_length)
            autofocus[error_message.is_some()];
    };

    labelled_field("confirm-password", "Confirm Password", input, error_message)
}

fn salary_input(salary: &str, error_message: Option<&str>) -> Markup {
    let input = html! {
        div class="input-wrapper w-full"
        {
            input
                type="number"
                name="salary"
                id="salary"
                min="0"
                step="0.01"
                placeholder="0.00"
                class=(FORM_TEXT_INPUT_STYLE)
                required
                value=(salary);
        }
    };

    labelled_field("salary", "Monthly Salary", input, error_message)
}

/// Error messages to show next to the sign-up form fields.
#[derive(Default)]
struct SignUpErrors<'a> {
    username: Option<&'a str>,
    password: Option<&'a str>,
    confirm_password: Option<&'a str>,
    salary: Option<&'a str>,
}

fn sign_up_form(username: &str, salary: &str, errors: SignUpErrors) -> Markup {
    html! {
        form
            hx-post=(endpoints::ACCOUNTS_API)
            hx-indicator="#indicator"
            hx-disabled-elt="#submit-button"
            class="space-y-4 md:space-y-6"
        {
            (username_input(username, errors.username))
            (password_input(PASSWORD_INPUT_MIN_LENGTH, errors.password))
            (confirm_password_input(PASSWORD_INPUT_MIN_LENGTH, errors.confirm_password))
            (salary_input(salary, errors.salary))

            (submit_button("Sign Up"))

            p class="text-sm font-light text-gray-500 dark:text-gray-400"
            {
                "Already have an account? "
                (link(endpoints::LOG_IN_VIEW, "Log in here"))
            }
        }
    }
}

/// Display the sign-up page.
pub async fn get_sign_up_page() -> Response {
    let sign_up_form = sign_up_form("", "", SignUpErrors::default());
    let content = log_in_sign_up("Create an account", &sign_up_form);
    base("Sign Up", &[rupee_input_styles()], &content).into_response()
}

/// The state needed for creating a new account.
#[derive(Debug, Clone)]
pub struct SignUpState {
    /// The database connection for storing accounts.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for SignUpState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The raw data entered by the user in the sign-up form.
#[derive(Serialize, Deserialize)]
pub struct SignUpForm {
    pub username: String,
    pub password: String,
    pub confirm_password: String,
    /// The user's monthly salary.
    pub salary: f64,
}

/// Create an account from the sign-up form and redirect to the log-in page.
///
/// The form is returned with error messages if any field is invalid or the
/// username is already taken.
pub async fn create_account_endpoint(
    State(state): State<SignUpState>,
    Form(form): Form<SignUpForm>,
) -> Response {
    let salary_string = form.salary.to_string();

    let username = match Username::new(&form.username) {
        Ok(username) => username,
        Err(error) => {
            let message = error.to_string();
            return sign_up_form(
                &form.username,
                &salary_string,
                SignUpErrors {
                    username: Some(&message),
                    ..Default::default()
                },
            )
            .into_response();
        }
    };

    let validated_password = match ValidatedPassword::new(&form.password, username.as_str()) {
        Ok(password) => password,
        Err(error) => {
            let message = error.to_string();
            return sign_up_form(
                username.as_str(),
                &salary_string,
                SignUpErrors {
                    password: Some(&message),
                    ..Default::default()
                },
            )
            .into_response();
        }
    };

    if form.password != form.confirm_password {
        return sign_up_form(
            username.as_str(),
            &salary_string,
            SignUpErrors {
                confirm_password: Some("Passwords do not match"),
                ..Default::default()
            },
        )
        .into_response();
    }

    if !form.salary.is_finite() || form.salary < 0.0 {
        return sign_up_form(
            username.as_str(),
            "",
            SignUpErrors {
                salary: Some("Salary must be a number that is zero or greater"),
                ..Default::default()
            },
        )
        .into_response();
    }

    let password_hash = match PasswordHash::new(validated_password, PasswordHash::DEFAULT_COST) {
        Ok(hash) => hash,
        Err(e) => {
            tracing::error!("an error occurred while hashing a password: {e}");

            return get_internal_server_error_redirect();
        }
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return get_internal_server_error_redirect();
        }
    };

    match create_account(username.clone(), password_hash, form.salary, &connection) {
        Ok(account) => {
            tracing::info!("Created account {} for \"{}\"", account.id, account.username);

            (
                HxRedirect(endpoints::LOG_IN_VIEW.to_owned()),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(error @ Error::DuplicateUsername(_)) => {
            let message = error.to_string();
            sign_up_form(
                username.as_str(),
                &salary_string,
                SignUpErrors {
                    username: Some(&message),
                    ..Default::default()
                },
            )
            .into_response()
        }
        Err(error) => {
            tracing::error!("An unhandled error occurred while inserting a new account: {error}");

            get_internal_server_error_redirect()
        }
    }
}
