//! Middleware that only lets requests with a live session through to the account's pages.

use axum::{
    extract::{FromRef, FromRequestParts, Request, State},
    http::{StatusCode, header::SET_COOKIE, request::Parts},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use axum_htmx::HxRedirect;
use time::Duration;

use crate::{
    AppState,
    auth::{
        Session,
        cookie::{extend_auth_cookie_duration_if_needed, get_token_from_cookies},
    },
    endpoints,
};

/// The state needed for the auth middleware
#[derive(Clone)]
pub struct AuthState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// How long a session lasts after the last request.
    pub cookie_duration: Duration,
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
        }
    }
}

impl FromRef<AuthState> for Key {
    fn from_ref(state: &AuthState) -> Self {
        state.cookie_key.clone()
    }
}

/// How to send a client without a session to the log-in page.
#[derive(Clone, Copy)]
enum Rejection {
    /// A plain 303 redirect, for full page loads.
    Redirect,
    /// An `HX-Redirect` header, for htmx requests whose response would otherwise be swapped into the page.
    HxRedirect,
}

impl IntoResponse for Rejection {
    fn into_response(self) -> Response {
        match self {
            Rejection::Redirect => Redirect::to(endpoints::LOG_IN_VIEW).into_response(),
            Rejection::HxRedirect => {
                (HxRedirect(endpoints::LOG_IN_VIEW.to_owned()), StatusCode::OK).into_response()
            }
        }
    }
}

async fn read_session(
    parts: &mut Parts,
    state: &AuthState,
) -> Option<(PrivateCookieJar, Session)> {
    let jar = match PrivateCookieJar::from_request_parts(parts, state).await {
        Ok(jar) => jar,
        Err(error) => {
            tracing::error!("could not read cookie jar: {error:?}");
            return None;
        }
    };

    match get_token_from_cookies(&jar) {
        Ok(token) => Some((jar, token.session)),
        Err(error) => {
            tracing::debug!("rejected request to {}: {error}", parts.uri.path());
            None
        }
    }
}

async fn guard(state: AuthState, request: Request, next: Next, rejection: Rejection) -> Response {
    let (mut parts, body) = request.into_parts();

    let Some((jar, session)) = read_session(&mut parts, &state).await else {
        return rejection.into_response();
    };

    parts.extensions.insert(session);
    let mut response = next.run(Request::from_parts(parts, body)).await;

    // Each request pushes the end of the session back.
    let jar = extend_auth_cookie_duration_if_needed(jar.clone(), state.cookie_duration)
        .unwrap_or_else(|error| {
            tracing::error!("could not extend session cookie: {error}");
            jar
        });

    let jar_response = jar.into_response();
    for cookie in jar_response.headers().get_all(SET_COOKIE) {
        response.headers_mut().append(SET_COOKIE, cookie.clone());
    }

    response
}

/// Run the request with its [Session] in the request extensions, or redirect
/// to the log-in page when there is no live session.
///
/// Handlers receive the session with `Extension(session): Extension<Session>`.
pub async fn auth_guard(State(state): State<AuthState>, request: Request, next: Next) -> Response {
    guard(state, request, next, Rejection::Redirect).await
}

/// Like [auth_guard], but rejects with an `HX-Redirect` for routes called by htmx.
pub async fn auth_guard_hx(
    State(state): State<AuthState>,
    request: Request,
    next: Next,
) -> Response {
    guard(state, request, next, Rejection::HxRedirect).await
}

#[cfg(test)]
mod auth_guard_tests {
    use axum::{
        Extension, Router,
        extract::State,
        middleware,
        routing::{get, post},
    };
    use axum_extra::extract::{
        PrivateCookieJar,
        cookie::{Cookie, Key, SameSite},
    };
    use axum_test::TestServer;
    use sha2::{Digest, Sha512};
    use time::{Duration, OffsetDateTime};

    use crate::{
        AccountId, Error,
        auth::{
            AuthState, COOKIE_TOKEN, DEFAULT_COOKIE_DURATION, Session, auth_guard, auth_guard_hx,
            set_auth_cookie,
        },
        endpoints,
    };

    const LOG_IN_ROUTE: &str = "/test/log_in";
    const PROTECTED_ROUTE: &str = "/test/protected";

    async fn greet(Extension(session): Extension<Session>) -> String {
        format!("Namaste, {}!", session.username)
    }

    async fn log_in(
        State(state): State<AuthState>,
        jar: PrivateCookieJar,
    ) -> Result<PrivateCookieJar, Error> {
        set_auth_cookie(
            jar,
            Session {
                account_id: AccountId::new(1),
                username: "priya".to_owned(),
            },
            state.cookie_duration,
        )
    }

    fn server(htmx: bool, cookie_duration: Duration) -> TestServer {
        let state = AuthState {
            cookie_key: Key::from(&Sha512::digest("guard tests")),
            cookie_duration,
        };

        let protected = Router::new().route(PROTECTED_ROUTE, get(greet));
        let protected = if htmx {
            protected.route_layer(middleware::from_fn_with_state(state.clone(), auth_guard_hx))
        } else {
            protected.route_layer(middleware::from_fn_with_state(state.clone(), auth_guard))
        };

        let app = protected
            .route(LOG_IN_ROUTE, post(log_in))
            .with_state(state);

        TestServer::new(app)
    }

    #[track_caller]
    fn assert_close_to_now_plus(time: OffsetDateTime, duration: Duration) {
        let want = OffsetDateTime::now_utc() + duration;

        assert!(
            (time - want).abs() < Duration::seconds(1),
            "got {time:?}, want about {want:?}"
        );
    }

    #[tokio::test]
    async fn valid_session_reaches_handler() {
        let server = server(false, DEFAULT_COOKIE_DURATION);
        let cookie = server.post(LOG_IN_ROUTE).await.cookie(COOKIE_TOKEN);

        let response = server.get(PROTECTED_ROUTE).add_cookie(cookie).await;

        response.assert_status_ok();
        response.assert_text("Namaste, priya!");
    }

    #[tokio::test]
    async fn valid_session_is_extended() {
        let server = server(false, Duration::seconds(5));
        let jar = server.post(LOG_IN_ROUTE).await.cookies();

        let response = server.get(PROTECTED_ROUTE).add_cookies(jar).await;

        let cookie = response.cookie(COOKIE_TOKEN);
        assert_close_to_now_plus(cookie.expires_datetime().unwrap(), Duration::seconds(5));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Strict));
    }

    #[tokio::test]
    async fn missing_cookie_redirects_to_log_in() {
        let response = server(false, DEFAULT_COOKIE_DURATION)
            .get(PROTECTED_ROUTE)
            .await;

        response.assert_status_see_other();
        assert_eq!(response.header("location"), endpoints::LOG_IN_VIEW);
    }

    #[tokio::test]
    async fn garbled_cookie_redirects_to_log_in() {
        let response = server(false, DEFAULT_COOKIE_DURATION)
            .get(PROTECTED_ROUTE)
            .add_cookie(Cookie::new(COOKIE_TOKEN, "not encrypted"))
            .await;

        response.assert_status_see_other();
        assert_eq!(response.header("location"), endpoints::LOG_IN_VIEW);
    }

    #[tokio::test]
    async fn expired_session_redirects_to_log_in() {
        let server = server(false, Duration::seconds(-5));
        let mut cookie = server.post(LOG_IN_ROUTE).await.cookie(COOKIE_TOKEN);
        // A client that ignores the cookie's expiry still sends it.
        cookie.set_expires(OffsetDateTime::now_utc() + Duration::days(1));

        let response = server.get(PROTECTED_ROUTE).add_cookie(cookie).await;

        response.assert_status_see_other();
        assert_eq!(response.header("location"), endpoints::LOG_IN_VIEW);
    }

    #[tokio::test]
    async fn htmx_request_without_session_gets_hx_redirect() {
        let response = server(true, DEFAULT_COOKIE_DURATION)
            .get(PROTECTED_ROUTE)
            .add_header("HX-Request", "true")
            .await;

        response.assert_status_ok();
        assert_eq!(response.header("hx-redirect"), endpoints::LOG_IN_VIEW);
    }
}
