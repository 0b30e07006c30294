use chrono::{DateTime, Duration, Utc};

use crate::features::reports::models::{CreateReport, Report, ReportSeverity, ReportStatus};

struct SeedReport {
    location: &'static str,
    building: &'static str,
    severity: ReportSeverity,
    description: &'static str,
    area: &'static str,
    email: &'static str,
    phone: Option<&'static str>,
    age: Duration,
    received: &'static str,
    /// (minutes ago, status, message)
    timeline: &'static [(i64, ReportStatus, &'static str)],
}

const TIMELINE_1: &[(i64, ReportStatus, &str)] = &[
    (
        60,
        ReportStatus::InProgress,
        "Our IT team is investigating the WiFi issue. We've identified a router malfunction.",
    ),
    (
        30,
        ReportStatus::Resolved,
        "Issue has been resolved. WiFi network is now fully operational on Floor 3.",
    ),
];

const TIMELINE_2: &[(i64, ReportStatus, &str)] = &[
    (
        180,
        ReportStatus::InProgress,
        "Issue confirmed. Multiple ethernet ports showing intermittent connectivity.",
    ),
    (
        60,
        ReportStatus::InProgress,
        "Technician on-site. Replacing faulty network cables in the main floor.",
    ),
];

const TIMELINE_4: &[(i64, ReportStatus, &str)] = &[(
    20 * 60,
    ReportStatus::Resolved,
    "Email service restored for all users.",
)];

const TIMELINE_5: &[(i64, ReportStatus, &str)] = &[(
    5 * 60,
    ReportStatus::InProgress,
    "Our IT team is investigating the video conferencing issue.",
)];

fn seeds() -> Vec<SeedReport> {
    vec![
        SeedReport {
            location: "Room 201, Floor 3",
            building: "Science Building",
            severity: ReportSeverity::High,
            description: "WiFi network completely down in the entire floor. Students unable to access online resources and submit assignments.",
            area: "WiFi Network",
            email: "student@campus.edu",
            phone: Some("(555) 123-4567"),
            age: Duration::hours(2),
            received: "Report received and assigned to IT support team.",
            timeline: TIMELINE_1,
        },
        SeedReport {
            location: "Main Floor",
            building: "Library",
            severity: ReportSeverity::Medium,
            description: "Ethernet connections are intermittently dropping, affecting study areas.",
            area: "Ethernet Connection",
            email: "user@campus.edu",
            phone: Some("(555) 234-5678"),
            age: Duration::hours(4),
            received: "Report received and queued for investigation.",
            timeline: TIMELINE_2,
        },
        SeedReport {
            location: "Room 105",
            building: "Engineering Hall",
            severity: ReportSeverity::Low,
            description: "VPN access is slow and timing out frequently",
            area: "VPN Access",
            email: "engineer@campus.edu",
            phone: None,
            age: Duration::hours(1),
            received: "Report received and queued for review.",
            timeline: &[],
        },
        SeedReport {
            location: "Computer Lab",
            building: "Student Center",
            severity: ReportSeverity::High,
            description: "Email service completely unavailable for all users",
            area: "Email Service",
            email: "admin@campus.edu",
            phone: None,
            age: Duration::hours(24),
            received: "Report received and queued for review.",
            timeline: TIMELINE_4,
        },
        SeedReport {
            location: "Auditorium",
            building: "Administration Building",
            severity: ReportSeverity::Medium,
            description: "Video conferencing platform experiencing lag and disconnections",
            area: "Video Conferencing",
            email: "faculty@campus.edu",
            phone: None,
            age: Duration::hours(6),
            received: "Report received and queued for review.",
            timeline: TIMELINE_5,
        },
    ]
}

/// The fixed demo report set, ids "1" to "5", timestamped relative to `now`
pub fn mock_reports(now: DateTime<Utc>) -> Vec<Report> {
    seeds()
        .into_iter()
        .enumerate()
        .map(|(i, seed)| {
            let data = CreateReport {
                location: seed.location.to_string(),
                building: seed.building.to_string(),
                severity: seed.severity,
                description: seed.description.to_string(),
                affected_areas: vec![seed.area.to_string()],
                contact_email: seed.email.to_string(),
                contact_phone: seed.phone.map(str::to_string),
            };
            let mut report = Report::new((i + 1).to_string(), data, now - seed.age, seed.received);
            for (minutes_ago, status, message) in seed.timeline {
                report.apply_update(*status, *message, now - Duration::minutes(*minutes_ago));
            }
            report
        })
        .collect()
}
