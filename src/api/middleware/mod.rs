pub mod auth;

pub use auth::{SessionAuth, SessionUser};
