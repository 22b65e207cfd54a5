//! Ends the current session.

use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::PrivateCookieJar;

use crate::{
    auth::{cookie::get_token_from_cookies, invalidate_auth_cookie},
    endpoints,
};

/// Overwrite the session cookie with an expired one and send the client to the log-in page.
///
/// Works without a valid session, so a stale tab can always log out.
pub async fn get_log_out(jar: PrivateCookieJar) -> Response {
    if let Ok(token) = get_token_from_cookies(&jar) {
        tracing::info!("{} logged out", token.session.username);
    }

    (invalidate_auth_cookie(jar), Redirect::to(endpoints::LOG_IN_VIEW)).into_response()
}

#[cfg(test)]
mod log_out_tests {
    use axum::{
        body::Body,
        http::{Response, StatusCode, header},
    };
    use axum_extra::extract::{
        PrivateCookieJar,
        cookie::{Cookie, Key},
    };
    use sha2::{Digest, Sha512};
    use time::{Duration, OffsetDateTime};

    use crate::{
        AccountId,
        auth::{COOKIE_TOKEN, DEFAULT_COOKIE_DURATION, Session, get_log_out, set_auth_cookie},
        endpoints,
    };

    fn empty_jar() -> PrivateCookieJar {
        PrivateCookieJar::new(Key::from(&Sha512::digest("rupee")))
    }

    fn token_cookie(response: &Response<Body>) -> Cookie<'static> {
        response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|value| Cookie::parse(value.to_str().ok()?.to_owned()).ok())
            .find(|cookie| cookie.name() == COOKIE_TOKEN)
            .expect("response should overwrite the token cookie")
    }

    #[track_caller]
    fn assert_logged_out(response: &Response<Body>) {
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            endpoints::LOG_IN_VIEW
        );

        let cookie = token_cookie(response);
        assert_eq!(cookie.expires_datetime(), Some(OffsetDateTime::UNIX_EPOCH));
        assert_eq!(cookie.max_age(), Some(Duration::ZERO));
    }

    #[tokio::test]
    async fn log_out_expires_session_cookie() {
        let jar = set_auth_cookie(
            empty_jar(),
            Session {
                account_id: AccountId::new(7),
                username: "priya".to_owned(),
            },
            DEFAULT_COOKIE_DURATION,
        )
        .unwrap();

        let response = get_log_out(jar).await;

        assert_logged_out(&response);
    }

    #[tokio::test]
    async fn log_out_without_session_still_redirects() {
        let response = get_log_out(empty_jar()).await;

        assert_logged_out(&response);
    }
}
