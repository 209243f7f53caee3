mod config;
use log::{debug, info};

pub use crate::config::*;

/// Label used for the synthetic aggregate of sub-threshold candidates.
pub const OTHER_LABEL: &str = "Other";

/// Neutral colour padded onto the chart when a displayed entry has none
/// (the "Other" bucket never carries one).
pub const DEFAULT_COLOUR: &str = "#000000";

// **** Output data structures ****

/// Turnout for a constituency, with its display label.
///
/// The label carries an "Only " prefix when the fraction is below the
/// configured low-turnout threshold.
#[derive(PartialEq, Debug, Clone)]
pub struct TurnoutSummary {
    pub fraction: f64,
    pub label: String,
}

/// What happened to the seat's incumbent.
///
/// `Unknown` covers constituencies where no row carries the "Title Holder"
/// status; the narrative sub-heading is omitted in that case.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum Incumbency {
    Held,
    Ousted { incumbent: String },
    Unknown,
}

impl Incumbency {
    /// The verb phrase for the sub-heading "{winner} {phrase} {constituency}",
    /// or `None` when the incumbent is unknown.
    pub fn phrase(&self) -> Option<String> {
        match self {
            Incumbency::Held => Some("held".to_string()),
            Incumbency::Ousted { incumbent } => Some(format!("kicked {} out of", incumbent)),
            Incumbency::Unknown => None,
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum SafetyVerdict {
    Safe,
    TooClose,
    CouldLose,
}

/// The victory margin and its characterization.
#[derive(PartialEq, Debug, Clone)]
pub struct SeatSafety {
    /// Winner share minus runner-up share, in percent points.
    pub margin_points: f64,
    pub verdict: SafetyVerdict,
}

impl SeatSafety {
    pub fn message(&self, winner: &str) -> String {
        match self.verdict {
            SafetyVerdict::Safe => format!(
                "There's not much chance of {} losing at the next election",
                winner
            ),
            SafetyVerdict::TooClose => "The next election could go either way ...".to_string(),
            SafetyVerdict::CouldLose => format!(
                "Too close for comfort! {} could lose next time ...",
                winner
            ),
        }
    }
}

/// One displayed line of the candidate table.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct CandidateLine {
    pub name: String,
    pub party: String,
    /// Formatted share, e.g. "42.3%".
    pub share_label: String,
}

/// Parallel columns feeding the bar chart. The last entry of `parties` and
/// `values` is always the "Other" bucket.
#[derive(PartialEq, Debug, Clone)]
pub struct ChartSeries {
    pub parties: Vec<String>,
    /// Vote shares in percent points, one per party.
    pub values: Vec<f64>,
    pub colours: Vec<String>,
}

/// Everything derived for one constituency lookup. Not persisted.
#[derive(PartialEq, Debug, Clone)]
pub struct SearchResult {
    pub constituency: String,
    pub winner: String,
    pub winner_profile_url: Option<String>,
    pub turnout: TurnoutSummary,
    pub incumbency: Incumbency,
    pub safety: SeatSafety,
    pub candidates: Vec<CandidateLine>,
    pub series: ChartSeries,
}

// **** Aggregation ****

fn points_label(points: f64) -> String {
    format!("{:.1}%", points)
}

/// Formats a share in [0, 1] as a percent label, e.g. 0.423 -> "42.3%".
pub fn percent_label(share: f64) -> String {
    points_label(share * 100.0)
}

fn turnout_summary(
    row: &ElectionRecord,
    options: &ReportOptions,
) -> Result<TurnoutSummary, ReportError> {
    if row.electorate == 0 {
        return Err(ReportError::ZeroElectorate(row.constituency.clone()));
    }
    let fraction = row.turnout as f64 / row.electorate as f64;
    let label = if fraction < options.low_turnout_threshold {
        format!("Only {}", percent_label(fraction))
    } else {
        percent_label(fraction)
    };
    Ok(TurnoutSummary { fraction, label })
}

fn seat_safety(
    rows: &[&ElectionRecord],
    displayed_points: &[f64],
    winner_points: f64,
    options: &ReportOptions,
) -> SeatSafety {
    let runner_up_points = match options.runner_up_mode {
        RunnerUpMode::SecondHighestShare => {
            let mut points: Vec<f64> = rows.iter().map(|r| r.share * 100.0).collect();
            points.sort_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));
            points.get(1).copied().unwrap_or(0.0)
        }
        RunnerUpMode::ChartPosition => displayed_points.get(1).copied().unwrap_or(0.0),
    };
    let margin_points = winner_points - runner_up_points;
    let verdict = if margin_points >= options.safe_margin_points {
        SafetyVerdict::Safe
    } else if margin_points <= options.close_margin_points {
        SafetyVerdict::CouldLose
    } else {
        SafetyVerdict::TooClose
    };
    SeatSafety {
        margin_points,
        verdict,
    }
}

/// Builds the report for one constituency from the static tables.
///
/// Arguments:
/// * `records` the full election-results table
/// * `profiles` the representative-profile table, matched by exact name
/// * `constituency` the (ASCII-folded) constituency name to report on
/// * `options` thresholds and the runner-up policy
///
/// This is a single pass over the matching rows, written as pure folds: the
/// result does not depend on mutable accumulators surviving between rows.
/// Display order follows the table order (the source table is sorted by
/// descending share), but winner detection does not rely on it.
pub fn build_search_result(
    records: &[ElectionRecord],
    profiles: &[MpProfile],
    constituency: &str,
    options: &ReportOptions,
) -> Result<SearchResult, ReportError> {
    let rows: Vec<&ElectionRecord> = records
        .iter()
        .filter(|r| r.constituency == constituency)
        .collect();
    if rows.is_empty() {
        return Err(ReportError::NoSuchConstituency(constituency.to_string()));
    }
    info!(
        "build_search_result: {} candidate rows for {:?}",
        rows.len(),
        constituency
    );

    let turnout = turnout_summary(rows[0], options)?;

    // Strict-greater fold: on a tie, the first row holding the maximum wins.
    let winner_row = rows
        .iter()
        .copied()
        .skip(1)
        .fold(rows[0], |best, r| if r.share > best.share { r } else { best });
    let winner_points = winner_row.share * 100.0;

    let incumbency = match rows
        .iter()
        .find(|r| r.status == CandidateStatus::TitleHolder)
    {
        None => Incumbency::Unknown,
        Some(inc) if inc.candidate == winner_row.candidate => Incumbency::Held,
        Some(inc) => Incumbency::Ousted {
            incumbent: inc.candidate.clone(),
        },
    };

    let (displayed, folded): (Vec<&ElectionRecord>, Vec<&ElectionRecord>) = rows
        .iter()
        .copied()
        .partition(|r| r.share >= options.other_share_threshold);
    let other_points: f64 = folded.iter().map(|r| r.share * 100.0).sum();
    debug!(
        "build_search_result: {} displayed, {} folded into {:?} ({:.3} points)",
        displayed.len(),
        folded.len(),
        OTHER_LABEL,
        other_points
    );

    let displayed_points: Vec<f64> = displayed.iter().map(|r| r.share * 100.0).collect();
    let safety = seat_safety(&rows, &displayed_points, winner_points, options);

    let mut candidates: Vec<CandidateLine> = displayed
        .iter()
        .map(|r| CandidateLine {
            name: r.candidate.clone(),
            party: r.party.clone(),
            share_label: percent_label(r.share),
        })
        .collect();
    candidates.push(CandidateLine {
        name: OTHER_LABEL.to_string(),
        party: OTHER_LABEL.to_string(),
        share_label: points_label(other_points),
    });

    let mut parties: Vec<String> = displayed.iter().map(|r| r.party.clone()).collect();
    parties.push(OTHER_LABEL.to_string());
    let mut values = displayed_points;
    values.push(other_points);
    let mut colours: Vec<String> = displayed.iter().map(|r| r.colour.clone()).collect();
    while colours.len() < parties.len() {
        colours.push(DEFAULT_COLOUR.to_string());
    }

    let winner_profile_url = profiles
        .iter()
        .find(|p| p.name == winner_row.candidate)
        .map(|p| p.url.clone());

    Ok(SearchResult {
        constituency: constituency.to_string(),
        winner: winner_row.candidate.clone(),
        winner_profile_url,
        turnout,
        incumbency,
        safety,
        candidates,
        series: ChartSeries {
            parties,
            values,
            colours,
        },
    })
}
