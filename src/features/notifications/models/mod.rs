mod toast;

pub use toast::{NewToast, Toast, ToastType};
