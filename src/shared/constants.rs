// =============================================================================
// CATALOGS
// =============================================================================

/// Buildings a report can be filed against
pub const BUILDINGS: &[&str] = &[
    "Science Building",
    "Engineering Hall",
    "Library",
    "Student Center",
    "Dormitory A",
    "Dormitory B",
    "Administration Building",
    "Athletic Center",
    "Other",
];

/// Services a report can list as affected
pub const AFFECTED_AREAS: &[&str] = &[
    "WiFi Network",
    "Ethernet Connection",
    "VPN Access",
    "Email Service",
    "Learning Management System",
    "Video Conferencing",
    "Other",
];

// =============================================================================
// VALIDATION
// =============================================================================

/// Minimum description length, counted in characters after trimming
pub const MIN_DESCRIPTION_LENGTH: usize = 10;

/// Minimum password length on registration
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Longest a toast may stay on screen, in milliseconds
pub const MAX_TOAST_DURATION_MS: u64 = 60_000;

// =============================================================================
// STORAGE KEYS
// =============================================================================

/// Key holding the ordered list of registered users
pub const USERS_KEY: &str = "users";

/// Key holding the current session record
pub const CURRENT_USER_KEY: &str = "currentUser";

// =============================================================================
// ROLE CONSTANTS
// =============================================================================

/// Student role - can report outages and browse history
pub const ROLE_STUDENT: &str = "student";

/// Staff role - can additionally post status updates on reports
pub const ROLE_STAFF: &str = "staff";

/// Faculty role - same permissions as staff
pub const ROLE_FACULTY: &str = "faculty";
