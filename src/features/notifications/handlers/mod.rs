pub mod notification_handler;

pub use notification_handler::{
    __path_create_notification, __path_dismiss_notification, __path_list_notifications,
    create_notification, dismiss_notification, list_notifications,
};
