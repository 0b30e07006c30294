mod auth_service;
mod session_store;
mod user_store;

pub use auth_service::AuthService;
pub use session_store::SessionStore;
pub use user_store::UserStore;
