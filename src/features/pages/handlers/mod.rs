pub mod page_handler;

pub use page_handler::{
    contact_support, dashboard, dismiss_toast, faq, history, home, login_page, login_submit,
    logout, register_page, register_submit, report_detail, report_form, status_page,
    submit_report, PageState,
};
