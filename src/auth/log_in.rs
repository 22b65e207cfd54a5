//! This file defines the routes for displaying the log-in page and handling log-in requests.
//! The cookie and middleware modules handle the lower level session logic.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::Duration;

use crate::{
    AppState,
    account::{find_account_for_log_in, verify_log_in},
    auth::{Session, invalidate_auth_cookie, set_auth_cookie},
    endpoints,
    html::{
        base, link, log_in_sign_up, password_input, submit_button, username_input,
    },
};

fn log_in_form(username: &str, error_message: Option<&str>) -> Markup {
    html! {
        form
            hx-post=(endpoints::LOG_IN_API)
            hx-indicator="#indicator"
            hx-disabled-elt="#username, #password, #submit-button"
            class="space-y-4 md:space-y-6"
        {
            (username_input(username, None))
            (password_input(0, error_message))

            div class="flex items-center gap-x-3"
            {
                input
                    type="checkbox"
                    name="remember_me"
                    id="remember_me"
                    tabindex="0"
                    class="rounded-xs";

                label
                    for="remember_me"
                    class="block text-sm font-medium text-gray-900 dark:text-white"
                {
                    "Keep me logged in for one week"
                }
            }

            (submit_button("Log in"))

            p class="text-sm font-light text-gray-500 dark:text-gray-400" {
                "Don't have an account? "
                (link(endpoints::SIGN_UP_VIEW, "Sign up here"))
            }
        }
    }
}

/// Display the log-in page.
pub async fn get_log_in_page() -> Response {
    let log_in_form = log_in_form("", None);
    let content = log_in_sign_up("Log in to your account", &log_in_form);
    base("Log In", &[], &content).into_response()
}

/// How long the auth cookie should last if the user selects "remember me" at log-in.
const REMEMBER_ME_COOKIE_DURATION: Duration = Duration::days(7);

/// The state needed to perform a login.
#[derive(Debug, Clone)]
pub struct LoginState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The duration for which cookies used for authentication are valid.
    pub cookie_duration: Duration,
    /// The database connection for looking up accounts.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for LoginState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
            db_connection: state.db_connection.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<LoginState> for Key {
    fn from_ref(state: &LoginState) -> Self {
        state.cookie_key.clone()
    }
}

/// The message shown when the username or password is wrong.
///
/// The same message is used for both so the form does not reveal which
/// usernames exist.
pub const INVALID_CREDENTIALS_ERROR_MSG: &str = "Invalid username or password.";

const INTERNAL_ERROR_MSG: &str = "An internal error occurred. Please try again later.";

/// Re-render the form with `message` under the password field, keeping the username.
fn fail(username: &str, message: &str) -> Response {
    log_in_form(username, Some(message)).into_response()
}

/// Handler for log-in requests via the POST method.
///
/// On success the session cookie is set and the client is sent to the dashboard.
/// Otherwise the form comes back with a message explaining the problem.
pub async fn post_log_in(
    State(state): State<LoginState>,
    jar: PrivateCookieJar,
    Form(user_data): Form<LogInData>,
) -> Response {
    let LogInData {
        username,
        password,
        remember_me,
    } = user_data;

    let found = match state.db_connection.lock() {
        Ok(connection) => find_account_for_log_in(&username, &connection),
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return fail(&username, INTERNAL_ERROR_MSG);
        }
    };

    // The lock is released by now, bcrypt must not block other requests.
    let authenticated = found.and_then(|account| verify_log_in(account, &password));

    let account = match authenticated {
        Ok(Some(account)) => account,
        Ok(None) => {
            tracing::info!("failed log-in attempt for {username:?}");
            return fail(&username, INVALID_CREDENTIALS_ERROR_MSG);
        }
        Err(error) => {
            tracing::error!("could not verify credentials for {username:?}: {error}");
            return fail(&username, INTERNAL_ERROR_MSG);
        }
    };

    let cookie_duration = match remember_me {
        Some(_) => REMEMBER_ME_COOKIE_DURATION,
        None => state.cookie_duration,
    };

    let session = Session {
        account_id: account.id,
        username: account.username.to_string(),
    };

    match set_auth_cookie(jar.clone(), session, cookie_duration) {
        Ok(jar) => {
            tracing::info!("{} logged in", account.username);
            (
                StatusCode::SEE_OTHER,
                HxRedirect(endpoints::DASHBOARD_VIEW.to_owned()),
                jar,
            )
                .into_response()
        }
        Err(error) => {
            tracing::error!("could not set session cookie: {error}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                HxRedirect(endpoints::INTERNAL_ERROR_VIEW.to_owned()),
                invalidate_auth_cookie(jar),
            )
                .into_response()
        }
    }
}

/// The log-in form as submitted.
///
/// The password is only ever compared against the stored hash, so it is not validated.
#[derive(Clone, Serialize, Deserialize)]
pub struct LogInData {
    /// The username as typed, matched exactly.
    pub username: String,
    /// The raw password.
    pub password: String,

    /// The "keep me logged in" checkbox. Browsers only send checked boxes, so
    /// any value means checked.
    pub remember_me: Option<String>,
}

#[cfg(test)]
mod log_in_page_tests {
    use axum::http::StatusCode;

    use crate::{
        endpoints,
        test_utils::{
            assert_form_input, assert_form_submit_button, assert_hx_endpoint, assert_valid_html,
            must_get_form, parse_html_document,
        },
    };

    use super::get_log_in_page;

    #[tokio::test]
    async fn log_in_page_displays_form() {
        let response = get_log_in_page().await;

        assert_eq!(response.status(), StatusCode::OK);

        let document = parse_html_document(response).await;
        assert_valid_html(&document);

        let form = must_get_form(&document);
        assert_hx_endpoint(&form, endpoints::LOG_IN_API, "hx-post");
        assert_form_input(&form, "username", "text");
        assert_form_input(&form, "password", "password");
        assert_form_submit_button(&form);

        let sign_up_link = form
            .select(&scraper::Selector::parse("a[href]").unwrap())
            .next()
            .expect("expected a link to the sign-up page");
        assert_eq!(
            sign_up_link.value().attr("href"),
            Some(endpoints::SIGN_UP_VIEW)
        );
    }
}
