use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The two ethical frameworks a choice can instantiate. The set is closed:
/// every aggregate tallies both variants explicitly, so a framework absent
/// from the data shows up as a zero count, never a missing key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Framework {
    Utilitarian,
    Deontological,
}

impl Framework {
    pub fn as_str(&self) -> &'static str {
        match self {
            Framework::Utilitarian => "utilitarian",
            Framework::Deontological => "deontological",
        }
    }
}

impl FromStr for Framework {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "utilitarian" => Ok(Framework::Utilitarian),
            "deontological" => Ok(Framework::Deontological),
            other => anyhow::bail!("unknown ethical framework {other:?}"),
        }
    }
}

impl fmt::Display for Framework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One participant's answer to one dilemma, as captured by the experiment
/// frontend and stored in a results CSV.
#[derive(Debug, Clone)]
pub struct ResultRecord {
    pub participant_id: String,
    pub dilemma_id: i64,
    pub dilemma_title: String,
    pub choice: String,
    pub framework: Framework,
    pub reaction_time_secs: f64,
    pub timestamp: String,
}

/// Share of each framework across a set of responses, in percent.
/// The two fields sum to 100 when every response carries a known framework.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct FrameworkPercentages {
    pub utilitarian: f64,
    pub deontological: f64,
}

/// Distributional statistics over a reaction-time series, in seconds.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ReactionTimeStats {
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

/// Overall reaction-time statistics plus the same stats grouped by framework.
/// A framework with no responses has no entry.
#[derive(Debug, Clone, Serialize)]
pub struct ReactionTimeSummary {
    pub overall: ReactionTimeStats,
    pub utilitarian: Option<ReactionTimeStats>,
    pub deontological: Option<ReactionTimeStats>,
}

/// Per-dilemma response breakdown. `choice_std_dev` is the population
/// standard deviation of the {1 utilitarian, 0 deontological} recoding over
/// the dilemma's respondents; 0 means unanimous, 0.5 a perfect split.
#[derive(Debug, Clone, Serialize)]
pub struct DilemmaStats {
    pub dilemma_id: i64,
    pub dilemma_title: String,
    pub utilitarian_count: usize,
    pub deontological_count: usize,
    pub utilitarian_pct: f64,
    pub deontological_pct: f64,
    pub mean_reaction_time: f64,
    pub reaction_time_std_dev: f64,
    pub choice_std_dev: f64,
}

/// Participant-level label for where their choices lean, by the strict
/// >60% rule. Exactly 60% is Mixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DominantFramework {
    Utilitarian,
    Deontological,
    Mixed,
}

/// Per-participant response breakdown.
#[derive(Debug, Clone, Serialize)]
pub struct ParticipantStats {
    pub participant_id: String,
    pub total_answered: usize,
    pub utilitarian_count: usize,
    pub deontological_count: usize,
    pub utilitarian_pct: f64,
    pub deontological_pct: f64,
    pub mean_reaction_time: f64,
    pub dominant_framework: DominantFramework,
}

/// How many participants fall under each dominant-framework label.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ParticipantLabelCounts {
    pub utilitarian_dominant: usize,
    pub deontological_dominant: usize,
    pub mixed: usize,
}

/// Point-biserial correlation between framework choice and reaction time.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CorrelationResult {
    pub correlation: f64,
    pub p_value: f64,
    pub significant: bool,
}
