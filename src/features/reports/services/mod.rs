mod duplicate_detection;
mod report_filter;
mod report_service;

pub use duplicate_detection::find_similar;
pub use report_filter::{distinct_buildings, filter_reports};
pub use report_service::ReportService;
