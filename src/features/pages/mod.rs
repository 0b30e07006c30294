pub mod handlers;
pub mod navigation;
pub mod routes;

pub use handlers::PageState;
