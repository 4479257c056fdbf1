use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::dilemmas;
use crate::loader::RESULT_HEADERS;
use crate::models::Framework;

/// One submitted experiment session, in the shape the capture frontend
/// posts it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSubmission {
    pub participant_id: String,
    pub timestamp: String,
    pub results: Vec<SessionAnswer>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionAnswer {
    pub dilemma_id: i64,
    pub dilemma_title: String,
    pub choice: String,
    pub framework: Framework,
    pub reaction_time: f64,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
struct SessionSummary {
    utilitarian_percentage: f64,
    deontological_percentage: f64,
    average_reaction_time: f64,
}

#[derive(Debug, Serialize)]
struct SessionDocument<'a> {
    participant_id: &'a str,
    timestamp: &'a str,
    results: &'a [SessionAnswer],
    summary: SessionSummary,
}

fn validate(submission: &SessionSubmission) -> anyhow::Result<()> {
    anyhow::ensure!(
        !submission.participant_id.trim().is_empty(),
        "participant id must not be empty"
    );
    anyhow::ensure!(
        !submission.results.is_empty(),
        "session contains no answers"
    );
    for answer in &submission.results {
        anyhow::ensure!(
            dilemmas::by_id(answer.dilemma_id).is_some(),
            "unknown dilemma id {}",
            answer.dilemma_id
        );
        anyhow::ensure!(
            answer.reaction_time >= 0.0,
            "negative reaction time for dilemma {}",
            answer.dilemma_id
        );
    }
    Ok(())
}

fn summarize(results: &[SessionAnswer]) -> SessionSummary {
    let total = results.len() as f64;
    let utilitarian = results
        .iter()
        .filter(|r| r.framework == Framework::Utilitarian)
        .count() as f64;
    let utilitarian_percentage = utilitarian / total * 100.0;
    SessionSummary {
        utilitarian_percentage,
        deontological_percentage: 100.0 - utilitarian_percentage,
        average_reaction_time: results.iter().map(|r| r.reaction_time).sum::<f64>() / total,
    }
}

/// Persists one session as a results CSV the loader can read back, with the
/// per-session summary appended as trailer rows, plus a JSON sidecar.
/// Returns the CSV path.
pub fn persist_session(
    results_dir: &Path,
    submission: &SessionSubmission,
) -> anyhow::Result<PathBuf> {
    validate(submission)?;
    std::fs::create_dir_all(results_dir)
        .with_context(|| format!("failed to create {}", results_dir.display()))?;

    // Filename carries only the date portion of the session timestamp.
    let date = submission
        .timestamp
        .split('T')
        .next()
        .unwrap_or(&submission.timestamp);
    let stem = format!("trolley_results_{}_{}", submission.participant_id, date);
    let csv_path = results_dir.join(format!("{stem}.csv"));

    let summary = summarize(&submission.results);
    write_session_csv(&csv_path, submission, &summary)?;

    let document = SessionDocument {
        participant_id: &submission.participant_id,
        timestamp: &submission.timestamp,
        results: &submission.results,
        summary,
    };
    let json_path = results_dir.join(format!("{stem}.json"));
    let json = serde_json::to_string_pretty(&document)?;
    std::fs::write(&json_path, json)
        .with_context(|| format!("failed to write {}", json_path.display()))?;

    Ok(csv_path)
}

fn write_session_csv(
    path: &Path,
    submission: &SessionSubmission,
    summary: &SessionSummary,
) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    writer.write_record(RESULT_HEADERS)?;

    for answer in &submission.results {
        writer.write_record([
            submission.participant_id.as_str(),
            &answer.dilemma_id.to_string(),
            answer.dilemma_title.as_str(),
            answer.choice.as_str(),
            answer.framework.as_str(),
            &answer.reaction_time.to_string(),
            answer.timestamp.as_str(),
        ])?;
    }

    // Summary trailer: a blank spacer then one line per headline figure.
    // These rows have no Dilemma ID, which is what marks them as non-data.
    let blank = ["", "", "", "", "", "", ""];
    writer.write_record(blank)?;
    writer.write_record(["Summary", "", "", "", "", "", ""])?;
    writer.write_record([
        "Utilitarian Percentage",
        &format!("{:.2}%", summary.utilitarian_percentage),
        "",
        "",
        "",
        "",
        "",
    ])?;
    writer.write_record([
        "Deontological Percentage",
        &format!("{:.2}%", summary.deontological_percentage),
        "",
        "",
        "",
        "",
        "",
    ])?;
    writer.write_record([
        "Average Reaction Time",
        &format!("{:.2}s", summary.average_reaction_time),
        "",
        "",
        "",
        "",
        "",
    ])?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader;

    fn submission() -> SessionSubmission {
        SessionSubmission {
            participant_id: "p1".to_string(),
            timestamp: "2026-08-01T10:00:00".to_string(),
            results: vec![
                SessionAnswer {
                    dilemma_id: 1,
                    dilemma_title: "Autonomous Vehicle Decision".to_string(),
                    choice: "Swerve to minimize casualties".to_string(),
                    framework: Framework::Utilitarian,
                    reaction_time: 3.0,
                    timestamp: "2026-08-01T10:00:05".to_string(),
                },
                SessionAnswer {
                    dilemma_id: 2,
                    dilemma_title: "AI Healthcare Resource Allocation".to_string(),
                    choice: "First come, first served".to_string(),
                    framework: Framework::Deontological,
                    reaction_time: 5.0,
                    timestamp: "2026-08-01T10:00:15".to_string(),
                },
            ],
        }
    }

    #[test]
    fn persisted_session_loads_back_without_trailer_rows() {
        let dir = tempfile::tempdir().unwrap();
        let csv_path = persist_session(dir.path(), &submission()).unwrap();
        assert_eq!(
            csv_path.file_name().unwrap().to_str().unwrap(),
            "trolley_results_p1_2026-08-01.csv"
        );

        let records = loader::load_results_file(&csv_path).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].framework, Framework::Utilitarian);
        assert_eq!(records[1].dilemma_id, 2);
    }

    #[test]
    fn imported_session_feeds_a_full_analysis() {
        let dir = tempfile::tempdir().unwrap();
        persist_session(dir.path(), &submission()).unwrap();

        let records = loader::load_all_results(dir.path()).unwrap();
        assert_eq!(records.len(), 2);

        let report = crate::report::build_report(&records).unwrap();
        assert_eq!(report.summary.total_participants, 1);
        assert_eq!(report.summary.total_responses, 2);
        assert!(
            (report.summary.framework_distribution.utilitarian_percentage - 50.0).abs() < 1e-9
        );
        assert!((report.summary.reaction_times.mean - 4.0).abs() < 1e-9);
    }

    #[test]
    fn sidecar_summary_matches_session() {
        let dir = tempfile::tempdir().unwrap();
        persist_session(dir.path(), &submission()).unwrap();

        let json = std::fs::read_to_string(dir.path().join("trolley_results_p1_2026-08-01.json"))
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["summary"]["utilitarian_percentage"], 50.0);
        assert_eq!(value["summary"]["average_reaction_time"], 4.0);
        assert_eq!(value["results"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn unknown_dilemma_is_rejected() {
        let mut bad = submission();
        bad.results[0].dilemma_id = 42;
        let dir = tempfile::tempdir().unwrap();
        assert!(persist_session(dir.path(), &bad).is_err());
    }

    #[test]
    fn empty_session_is_rejected() {
        let mut bad = submission();
        bad.results.clear();
        let dir = tempfile::tempdir().unwrap();
        assert!(persist_session(dir.path(), &bad).is_err());
    }
}
