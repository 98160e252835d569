//! Landing page copy and timing

use std::time::Duration;

use crate::gate::AccessGate;
use crate::routes::Route;

/// Rotating headline, as (lead, rest)
pub const HEADLINES: [(&str, &str); 3] = [
    ("Smart", "health care starts here"),
    ("Quick and easy", "check on your heart"),
    ("AI-powered", "health data analysis"),
];

pub const HEADLINE_INTERVAL: Duration = Duration::from_millis(3000);

pub fn next_headline(index: usize) -> usize {
    (index + 1) % HEADLINES.len()
}

/// Entry tile on the landing page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    pub route: Route,
    pub title: &'static str,
    pub blurb: &'static str,
    pub features: &'static [&'static str],
}

impl Tile {
    /// Clinician tile checks the role in place instead of navigating
    pub fn gate(&self) -> Option<AccessGate> {
        match self.route {
            Route::Professional => Some(AccessGate::professional_inline()),
            Route::Intro | Route::User => None,
        }
    }
}

pub const TILES: [Tile; 2] = [
    Tile {
        route: Route::User,
        title: "For general users",
        blurb: "Upload your ECG and answer a short questionnaire to get an AI reading.",
        features: &["ECG image upload", "Health checkup analysis", "Screening questionnaire", "AI result"],
    },
    Tile {
        route: Route::Professional,
        title: "For clinicians",
        blurb: "Review patients, risk scores and score history.",
        features: &["Patient list", "Risk score rubric", "Score history"],
    },
];
