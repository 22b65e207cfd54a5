//! Sessions for logged in users: the sign-up, log-in and log-out pages, the
//! encrypted session cookie and the middleware that guards protected routes.

mod cookie;
mod log_in;
mod log_out;
mod middleware;
mod sign_up;
mod token;

pub use cookie::DEFAULT_COOKIE_DURATION;
pub(crate) use cookie::{invalidate_auth_cookie, set_auth_cookie};
pub use log_in::{get_log_in_page, post_log_in};
pub use log_out::get_log_out;
pub use middleware::{auth_guard, auth_guard_hx};
pub use sign_up::{create_account_endpoint, get_sign_up_page};
pub use token::Session;

#[cfg(test)]
pub(crate) use cookie::COOKIE_TOKEN;

#[cfg(test)]
pub use middleware::AuthState;
