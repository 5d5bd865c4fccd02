//! Authentication module
//!
//! Session bootstrap against the array management API: a static API token
//! is exchanged once at `POST /login` for a session token, which is then
//! attached as `x-auth-token` to every subsequent request.

mod session;
mod types;

pub use session::login;
pub use types::{Credentials, Session};
