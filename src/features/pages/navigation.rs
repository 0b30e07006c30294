//! Page table and access rule.
//!
//! Dashboard, report form and history need a session; visitors without one
//! are sent to the login page.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Home,
    Login,
    Register,
    Dashboard,
    Report,
    ReportDetail,
    History,
    Status,
    Faq,
}

/// Link shown in the page header
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavLink {
    pub title: &'static str,
    pub path: &'static str,
}

pub const LOGIN_PATH: &str = "/login";

impl Page {
    pub const ALL: [Page; 9] = [
        Page::Home,
        Page::Login,
        Page::Register,
        Page::Dashboard,
        Page::Report,
        Page::ReportDetail,
        Page::History,
        Page::Status,
        Page::Faq,
    ];

    /// Route pattern
    pub fn path(&self) -> &'static str {
        match self {
            Page::Home => "/",
            Page::Login => LOGIN_PATH,
            Page::Register => "/register",
            Page::Dashboard => "/dashboard",
            Page::Report => "/report",
            Page::ReportDetail => "/report/{id}",
            Page::History => "/history",
            Page::Status => "/status",
            Page::Faq => "/faq",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Page::Home => "Campus Internet",
            Page::Login => "Log In",
            Page::Register => "Register",
            Page::Dashboard => "Dashboard",
            Page::Report => "Report an Outage",
            Page::ReportDetail => "Report Details",
            Page::History => "Report History",
            Page::Status => "Network Status",
            Page::Faq => "FAQ",
        }
    }

    /// Visitors without a session are sent to [`LOGIN_PATH`]
    pub fn requires_session(&self) -> bool {
        matches!(self, Page::Dashboard | Page::Report | Page::History)
    }
}

/// Header links for the current session state
pub fn nav_links(signed_in: bool) -> Vec<NavLink> {
    let pages: &[Page] = if signed_in {
        &[
            Page::Dashboard,
            Page::Report,
            Page::History,
            Page::Status,
            Page::Faq,
        ]
    } else {
        &[Page::Status, Page::Faq, Page::Login, Page::Register]
    };

    pages
        .iter()
        .map(|p| NavLink {
            title: p.title(),
            path: p.path(),
        })
        .collect()
}
