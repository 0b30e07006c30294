pub mod report_handler;

pub use report_handler::{
    __path_contact_support, __path_create_report, __path_find_similar_reports, __path_get_report,
    __path_list_buildings, __path_list_reports, __path_quick_report, __path_update_report_status,
    contact_support, create_report, find_similar_reports, get_report, list_buildings,
    list_reports, quick_report, update_report_status,
};
