use std::fmt;

use clap::ValueEnum;

/// Number of weekly score slots per student.
pub const WEEK_SLOTS: usize = 5;

/// The two tracked class cohorts, each mapped to its own sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ClassLevel {
    PlusOne,
    PlusTwo,
}

impl ClassLevel {
    pub fn slug(self) -> &'static str {
        match self {
            ClassLevel::PlusOne => "plus-one",
            ClassLevel::PlusTwo => "plus-two",
        }
    }

    /// Tab name inside the spreadsheet.
    pub fn sheet_tab(self) -> &'static str {
        match self {
            ClassLevel::PlusOne => "Plus One",
            ClassLevel::PlusTwo => "Plus Two",
        }
    }

    /// Plus Two runs on a later exam calendar: an empty sheet means the
    /// exam has not started, not that the fetch failed.
    pub fn empty_means_not_started(self) -> bool {
        matches!(self, ClassLevel::PlusTwo)
    }
}

impl fmt::Display for ClassLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Up,
    Down,
    Stable,
}

impl Trend {
    pub fn arrow(self) -> &'static str {
        match self {
            Trend::Up => "▲",
            Trend::Down => "▼",
            Trend::Stable => "–",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Student {
    /// Stable within one fetch only: "{class-slug}-{row number}".
    pub id: String,
    pub name: String,
    pub weekly_scores: Vec<f64>,
    pub total_score: f64,
    /// 0 until the whole collection has been ranked.
    pub rank: usize,
    pub trend: Trend,
}

/// Per-subject score breakdown for one student, fetched on demand.
#[derive(Debug, Clone)]
pub struct SubjectBreakdown {
    pub name: String,
    pub total_score: Option<f64>,
    pub subjects: Vec<(String, f64)>,
}
