use std::cmp::Reverse;

use crate::features::reports::dtos::{ReportQuery, ReportSort};
use crate::features::reports::models::Report;

/// Derive the displayed list from the full report set
///
/// Search matches location, building or description case-insensitively;
/// an empty term matches everything. Categorical filters compose with AND.
/// Sorting is stable, so ties keep their input order.
pub fn filter_reports(reports: &[Report], query: &ReportQuery) -> Vec<Report> {
    let term = query.search.to_lowercase();

    let mut filtered: Vec<Report> = reports
        .iter()
        .filter(|r| matches_search(r, &term))
        .filter(|r| query.severity.matches(&r.severity))
        .filter(|r| query.status.matches(&r.status()))
        .filter(|r| query.building.matches(&r.building))
        .cloned()
        .collect();

    sort_reports(&mut filtered, query.sort);
    filtered
}

pub fn sort_reports(reports: &mut [Report], sort: ReportSort) {
    match sort {
        ReportSort::Recent => reports.sort_by_key(|r| Reverse(r.submitted_at)),
        ReportSort::Oldest => reports.sort_by_key(|r| r.submitted_at),
        ReportSort::Severity => reports.sort_by_key(|r| r.severity.rank()),
    }
}

fn matches_search(report: &Report, term: &str) -> bool {
    term.is_empty()
        || report.location.to_lowercase().contains(term)
        || report.building.to_lowercase().contains(term)
        || report.description.to_lowercase().contains(term)
}

/// Distinct building values in first-seen order
pub fn distinct_buildings(reports: &[Report]) -> Vec<String> {
    let mut buildings: Vec<String> = Vec::new();
    for report in reports {
        if !buildings.contains(&report.building) {
            buildings.push(report.building.clone());
        }
    }
    buildings
}
