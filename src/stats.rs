use std::collections::BTreeMap;

use crate::error::AnalysisError;
use crate::models::{
    DilemmaStats, DominantFramework, Framework, FrameworkPercentages, ParticipantLabelCounts,
    ParticipantStats, ReactionTimeStats, ReactionTimeSummary, ResultRecord,
};

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Sample standard deviation (n - 1 denominator); 0.0 for fewer than two
/// values rather than NaN.
fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let sum_sq: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    (sum_sq / (values.len() - 1) as f64).sqrt()
}

/// Population standard deviation (n denominator). Used for the disagreement
/// score, where a singleton group must deterministically score 0.
fn population_std(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let sum_sq: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    (sum_sq / values.len() as f64).sqrt()
}

fn count_frameworks(records: &[&ResultRecord]) -> (usize, usize) {
    let mut utilitarian = 0;
    let mut deontological = 0;
    for record in records {
        match record.framework {
            Framework::Utilitarian => utilitarian += 1,
            Framework::Deontological => deontological += 1,
        }
    }
    (utilitarian, deontological)
}

/// Share of utilitarian vs deontological choices across all responses.
/// Both frameworks are always reported, zero-filled when absent.
pub fn framework_percentages(
    records: &[ResultRecord],
) -> Result<FrameworkPercentages, AnalysisError> {
    if records.is_empty() {
        return Err(AnalysisError::UndefinedStatistic(
            "framework percentages over an empty table".to_string(),
        ));
    }
    let refs: Vec<&ResultRecord> = records.iter().collect();
    let (utilitarian, deontological) = count_frameworks(&refs);
    let total = records.len() as f64;
    Ok(FrameworkPercentages {
        utilitarian: utilitarian as f64 / total * 100.0,
        deontological: deontological as f64 / total * 100.0,
    })
}

fn reaction_time_stats(times: &[f64]) -> ReactionTimeStats {
    ReactionTimeStats {
        mean: mean(times),
        median: median(times),
        std_dev: sample_std(times),
        min: times.iter().copied().fold(f64::INFINITY, f64::min),
        max: times.iter().copied().fold(f64::NEG_INFINITY, f64::max),
    }
}

/// Reaction-time distribution overall and per framework.
pub fn reaction_time_summary(
    records: &[ResultRecord],
) -> Result<ReactionTimeSummary, AnalysisError> {
    if records.is_empty() {
        return Err(AnalysisError::UndefinedStatistic(
            "reaction time statistics over an empty table".to_string(),
        ));
    }
    let all_times: Vec<f64> = records.iter().map(|r| r.reaction_time_secs).collect();

    let per_framework = |framework: Framework| -> Option<ReactionTimeStats> {
        let times: Vec<f64> = records
            .iter()
            .filter(|r| r.framework == framework)
            .map(|r| r.reaction_time_secs)
            .collect();
        if times.is_empty() {
            None
        } else {
            Some(reaction_time_stats(&times))
        }
    };

    Ok(ReactionTimeSummary {
        overall: reaction_time_stats(&all_times),
        utilitarian: per_framework(Framework::Utilitarian),
        deontological: per_framework(Framework::Deontological),
    })
}

/// Per-dilemma breakdown, one freshly built statistic per `(id, title)`
/// group, ordered by dilemma id.
pub fn dilemma_breakdown(records: &[ResultRecord]) -> Vec<DilemmaStats> {
    let mut groups: BTreeMap<(i64, String), Vec<&ResultRecord>> = BTreeMap::new();
    for record in records {
        groups
            .entry((record.dilemma_id, record.dilemma_title.clone()))
            .or_default()
            .push(record);
    }

    groups
        .into_iter()
        .map(|((dilemma_id, dilemma_title), group)| {
            let (utilitarian_count, deontological_count) = count_frameworks(&group);
            let total = group.len() as f64;
            let times: Vec<f64> = group.iter().map(|r| r.reaction_time_secs).collect();
            let recoded: Vec<f64> = group
                .iter()
                .map(|r| match r.framework {
                    Framework::Utilitarian => 1.0,
                    Framework::Deontological => 0.0,
                })
                .collect();
            DilemmaStats {
                dilemma_id,
                dilemma_title,
                utilitarian_count,
                deontological_count,
                utilitarian_pct: utilitarian_count as f64 / total * 100.0,
                deontological_pct: deontological_count as f64 / total * 100.0,
                mean_reaction_time: mean(&times),
                reaction_time_std_dev: sample_std(&times),
                choice_std_dev: population_std(&recoded),
            }
        })
        .collect()
}

/// Strict >60% rule; exactly 60% on either side stays Mixed.
pub fn dominant_framework(utilitarian_pct: f64, deontological_pct: f64) -> DominantFramework {
    if utilitarian_pct > 60.0 {
        DominantFramework::Utilitarian
    } else if deontological_pct > 60.0 {
        DominantFramework::Deontological
    } else {
        DominantFramework::Mixed
    }
}

/// Per-participant breakdown, ordered by participant id.
pub fn participant_breakdown(records: &[ResultRecord]) -> Vec<ParticipantStats> {
    let mut groups: BTreeMap<String, Vec<&ResultRecord>> = BTreeMap::new();
    for record in records {
        groups
            .entry(record.participant_id.clone())
            .or_default()
            .push(record);
    }

    groups
        .into_iter()
        .map(|(participant_id, group)| {
            let (utilitarian_count, deontological_count) = count_frameworks(&group);
            let total = group.len() as f64;
            let utilitarian_pct = utilitarian_count as f64 / total * 100.0;
            let deontological_pct = deontological_count as f64 / total * 100.0;
            let times: Vec<f64> = group.iter().map(|r| r.reaction_time_secs).collect();
            ParticipantStats {
                participant_id,
                total_answered: group.len(),
                utilitarian_count,
                deontological_count,
                utilitarian_pct,
                deontological_pct,
                mean_reaction_time: mean(&times),
                dominant_framework: dominant_framework(utilitarian_pct, deontological_pct),
            }
        })
        .collect()
}

/// Tally of participants per dominant-framework label.
pub fn participant_label_counts(participants: &[ParticipantStats]) -> ParticipantLabelCounts {
    let mut counts = ParticipantLabelCounts {
        utilitarian_dominant: 0,
        deontological_dominant: 0,
        mixed: 0,
    };
    for participant in participants {
        match participant.dominant_framework {
            DominantFramework::Utilitarian => counts.utilitarian_dominant += 1,
            DominantFramework::Deontological => counts.deontological_dominant += 1,
            DominantFramework::Mixed => counts.mixed += 1,
        }
    }
    counts
}
