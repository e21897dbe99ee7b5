pub mod admin;
pub mod auth;
pub mod error_code;
pub mod health;
pub mod helpers;
pub mod links;
pub mod redirect;
pub mod routes;
pub mod types;
pub mod users;

pub use error_code::ErrorCode;
pub use health::{AppStartTime, HealthService, health_routes};
pub use redirect::{RedirectService, redirect_routes};
pub use routes::api_routes;
pub use types::*;
