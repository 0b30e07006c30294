pub mod status_handler;

pub use status_handler::{__path_get_network_status, get_network_status};
