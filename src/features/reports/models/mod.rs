mod report;

pub use report::{CreateReport, Report, ReportSeverity, ReportStatus, ReportUpdate};
