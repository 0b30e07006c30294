mod status_dto;

pub use status_dto::{NetworkStatusDto, OverallState, SeverityCountsDto, StatusCountsDto};
