mod report_dto;

pub use report_dto::{
    ContactSupportDto, CreateReportDto, FilterValue, QuickIssue, QuickReportAckDto,
    QuickReportDto, ReportDetailResponseDto, ReportQuery, ReportResponseDto, ReportSort,
    ReportUpdateResponseDto, SimilarReportsRequestDto, UpdateReportStatusDto,
};
