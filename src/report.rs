use std::path::Path;

use anyhow::Context;
use chrono::Utc;
use serde::Serialize;

use crate::correlation;
use crate::error::AnalysisError;
use crate::models::{DilemmaStats, ParticipantLabelCounts, ResultRecord};
use crate::stats;

/// The analysis report document, shaped for JSON export.
#[derive(Debug, Serialize)]
pub struct Report {
    pub report_date: String,
    pub summary: Summary,
    pub framework_reaction_time_correlation: CorrelationSection,
    pub participant_framework_distribution: ParticipantLabelCounts,
    pub high_disagreement_dilemmas: Vec<DisagreementEntry>,
    pub long_reaction_time_dilemmas: Vec<SlowDilemmaEntry>,
}

#[derive(Debug, Serialize)]
pub struct Summary {
    pub total_participants: usize,
    pub total_responses: usize,
    pub framework_distribution: FrameworkDistribution,
    pub reaction_times: ReactionTimes,
}

#[derive(Debug, Serialize)]
pub struct FrameworkDistribution {
    pub utilitarian_percentage: f64,
    pub deontological_percentage: f64,
}

#[derive(Debug, Serialize)]
pub struct ReactionTimes {
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
}

/// The correlation block stays in the report even when the statistic cannot
/// be computed; the reason replaces the numbers rather than the section
/// being dropped or zero-filled.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum CorrelationSection {
    Computed {
        correlation: f64,
        p_value: f64,
        significant: bool,
    },
    Unavailable {
        unavailable: String,
    },
}

#[derive(Debug, Serialize)]
pub struct DisagreementEntry {
    pub dilemma_id: i64,
    pub dilemma_title: String,
    pub choice_std_dev: f64,
}

#[derive(Debug, Serialize)]
pub struct SlowDilemmaEntry {
    pub dilemma_id: i64,
    pub dilemma_title: String,
    pub mean_reaction_time: f64,
}

const RANKING_SIZE: usize = 3;

/// Top dilemmas by disagreement score, descending, ties broken by ascending
/// dilemma id so equal scores rank deterministically.
fn rank_by_disagreement(dilemmas: &[DilemmaStats]) -> Vec<DisagreementEntry> {
    let mut ranked: Vec<&DilemmaStats> = dilemmas.iter().collect();
    ranked.sort_by(|a, b| {
        b.choice_std_dev
            .partial_cmp(&a.choice_std_dev)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.dilemma_id.cmp(&b.dilemma_id))
    });
    ranked
        .into_iter()
        .take(RANKING_SIZE)
        .map(|d| DisagreementEntry {
            dilemma_id: d.dilemma_id,
            dilemma_title: d.dilemma_title.clone(),
            choice_std_dev: d.choice_std_dev,
        })
        .collect()
}

fn rank_by_reaction_time(dilemmas: &[DilemmaStats]) -> Vec<SlowDilemmaEntry> {
    let mut ranked: Vec<&DilemmaStats> = dilemmas.iter().collect();
    ranked.sort_by(|a, b| {
        b.mean_reaction_time
            .partial_cmp(&a.mean_reaction_time)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.dilemma_id.cmp(&b.dilemma_id))
    });
    ranked
        .into_iter()
        .take(RANKING_SIZE)
        .map(|d| SlowDilemmaEntry {
            dilemma_id: d.dilemma_id,
            dilemma_title: d.dilemma_title.clone(),
            mean_reaction_time: d.mean_reaction_time,
        })
        .collect()
}

/// Composes the report from the aggregation and correlation outputs. Pure
/// assembly: all numbers are produced by the stats and correlation modules.
pub fn build_report(records: &[ResultRecord]) -> Result<Report, AnalysisError> {
    if records.is_empty() {
        return Err(AnalysisError::EmptyDataset);
    }

    let percentages = stats::framework_percentages(records)?;
    let reaction_times = stats::reaction_time_summary(records)?;
    let dilemmas = stats::dilemma_breakdown(records);
    let participants = stats::participant_breakdown(records);
    let label_counts = stats::participant_label_counts(&participants);

    let correlation_section = match correlation::framework_reaction_time_correlation(records) {
        Ok(result) => CorrelationSection::Computed {
            correlation: result.correlation,
            p_value: result.p_value,
            significant: result.significant,
        },
        Err(err) => CorrelationSection::Unavailable {
            unavailable: err.to_string(),
        },
    };

    Ok(Report {
        report_date: Utc::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        summary: Summary {
            total_participants: participants.len(),
            total_responses: records.len(),
            framework_distribution: FrameworkDistribution {
                utilitarian_percentage: percentages.utilitarian,
                deontological_percentage: percentages.deontological,
            },
            reaction_times: ReactionTimes {
                mean: reaction_times.overall.mean,
                median: reaction_times.overall.median,
                std_dev: reaction_times.overall.std_dev,
            },
        },
        framework_reaction_time_correlation: correlation_section,
        participant_framework_distribution: label_counts,
        high_disagreement_dilemmas: rank_by_disagreement(&dilemmas),
        long_reaction_time_dilemmas: rank_by_reaction_time(&dilemmas),
    })
}

/// Writes the report as pretty-printed JSON.
pub fn write_report(report: &Report, path: &Path) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}
