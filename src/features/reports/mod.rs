pub mod dtos;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;

pub use repositories::{mock_reports, InMemoryReportRepository, ReportRepository};
pub use services::ReportService;
