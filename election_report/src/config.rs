// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

/// The pre-election status of a candidate, as recorded in the results table.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum CandidateStatus {
    /// The candidate held the seat before the election.
    TitleHolder,
    /// Any other status in the source table.
    Challenger,
}

impl CandidateStatus {
    /// The source workbook spells the incumbent status exactly "Title Holder".
    /// Everything else is treated as a challenger.
    pub fn from_label(label: &str) -> CandidateStatus {
        if label == "Title Holder" {
            CandidateStatus::TitleHolder
        } else {
            CandidateStatus::Challenger
        }
    }
}

/// One row of the static election-results table: one candidate standing in
/// one constituency.
#[derive(PartialEq, Debug, Clone)]
pub struct ElectionRecord {
    pub constituency: String,
    pub candidate: String,
    /// Fraction of the votes cast, in [0, 1].
    pub share: f64,
    /// Number of ballots cast in the constituency.
    pub turnout: u64,
    /// Number of eligible voters in the constituency.
    pub electorate: u64,
    pub status: CandidateStatus,
    pub party: String,
    /// Hex colour for the candidate's party, e.g. "#0087DC".
    pub colour: String,
}

/// A representative's entry in the profile table.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct MpProfile {
    pub name: String,
    pub url: String,
}

// ********* Configuration **********

/// How to pick the runner-up when computing the victory margin.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum RunnerUpMode {
    /// The second-highest share over all candidates in the constituency.
    SecondHighestShare,
    /// The second entry of the displayed chart series. This reproduces the
    /// behaviour of the original report, where sub-threshold candidates were
    /// dropped from the series before the runner-up was read positionally.
    ChartPosition,
}

/// Thresholds governing a constituency report.
#[derive(PartialEq, Debug, Clone)]
pub struct ReportOptions {
    /// Candidates below this share are folded into the "Other" bucket.
    pub other_share_threshold: f64,
    /// Turnout fractions below this get the "Only ..." prefix.
    pub low_turnout_threshold: f64,
    /// Margins (percent points) at or above this are a safe seat.
    pub safe_margin_points: f64,
    /// Margins (percent points) at or below this could flip next time.
    pub close_margin_points: f64,
    pub runner_up_mode: RunnerUpMode,
}

impl ReportOptions {
    pub const DEFAULT: ReportOptions = ReportOptions {
        other_share_threshold: 0.02,
        low_turnout_threshold: 0.60,
        safe_margin_points: 20.0,
        close_margin_points: 5.0,
        runner_up_mode: RunnerUpMode::SecondHighestShare,
    };
}

impl Default for ReportOptions {
    fn default() -> Self {
        ReportOptions::DEFAULT
    }
}

// ********* Errors **********

/// Errors that prevent a constituency report from being built.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum ReportError {
    /// No row of the results table matches the requested constituency.
    NoSuchConstituency(String),
    /// The electorate column is zero, so no turnout fraction exists.
    ZeroElectorate(String),
}

impl Error for ReportError {}

impl Display for ReportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportError::NoSuchConstituency(name) => {
                write!(f, "no election results found for constituency {:?}", name)
            }
            ReportError::ZeroElectorate(name) => {
                write!(f, "constituency {:?} has a zero electorate", name)
            }
        }
    }
}
