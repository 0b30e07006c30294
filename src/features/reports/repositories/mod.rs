mod report_repository;
mod seed;

pub use report_repository::{InMemoryReportRepository, ReportRepository};
pub use seed::mock_reports;
