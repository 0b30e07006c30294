use crate::features::reports::models::Report;

/// Open reports that look like the one being written
///
/// A report is similar when it has the same building and at least one
/// affected area overlapping the selection, where overlap is substring
/// containment in either direction. Resolved reports are never surfaced.
/// Advisory only.
pub fn find_similar(reports: &[Report], building: &str, affected_areas: &[String]) -> Vec<Report> {
    if building.is_empty() || affected_areas.is_empty() {
        return Vec::new();
    }

    reports
        .iter()
        .filter(|r| r.status().is_open())
        .filter(|r| r.building == building)
        .filter(|r| {
            r.affected_areas
                .iter()
                .any(|existing| affected_areas.iter().any(|a| areas_overlap(existing, a)))
        })
        .cloned()
        .collect()
}

fn areas_overlap(a: &str, b: &str) -> bool {
    a.contains(b) || b.contains(a)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::reports::repositories::mock_reports;
    use chrono::Utc;

    fn areas(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_same_building_and_area() {
        let reports = mock_reports(Utc::now());
        let similar = find_similar(&reports, "Library", &areas(&["Ethernet Connection"]));
        assert_eq!(similar.len(), 1);
        assert_eq!(similar[0].id, "2");
    }

    #[test]
    fn test_substring_overlap_either_direction() {
        let reports = mock_reports(Utc::now());
        assert_eq!(find_similar(&reports, "Library", &areas(&["Ethernet"])).len(), 1);
        assert_eq!(
            find_similar(
                &reports,
                "Engineering Hall",
                &areas(&["VPN Access (remote)"])
            )
            .len(),
            1
        );
    }

    #[test]
    fn test_resolved_reports_are_not_surfaced() {
        let reports = mock_reports(Utc::now());
        // Report 1 matches building and area but is resolved
        assert!(find_similar(&reports, "Science Building", &areas(&["WiFi Network"])).is_empty());
    }

    #[test]
    fn test_no_match_cases() {
        let reports = mock_reports(Utc::now());
        assert!(find_similar(&reports, "Library", &[]).is_empty());
        assert!(find_similar(&reports, "Library", &areas(&["VPN Access"])).is_empty());
        assert!(find_similar(&reports, "Dormitory A", &areas(&["Ethernet Connection"])).is_empty());
    }
}
