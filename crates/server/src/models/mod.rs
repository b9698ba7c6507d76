//! Domain types and request/response payloads.

pub mod item;
pub mod order;
pub mod user;

/// Session storage keys.
pub mod session_keys {
    /// Key under which the logged-in user is stored in the session.
    pub const CURRENT_USER: &str = "auth.user";
}
