use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::warn;

use crate::models::ResultRecord;

/// Column layout of a results CSV, as written by the capture side.
pub const RESULT_HEADERS: [&str; 7] = [
    "Participant ID",
    "Dilemma ID",
    "Dilemma Title",
    "Choice",
    "Ethical Framework",
    "Reaction Time (s)",
    "Timestamp",
];

/// Raw CSV row. Everything stays a string until the trailer check has run,
/// because summary trailer rows reuse the data columns for free-form text.
#[derive(Debug, serde::Deserialize)]
struct RawRow {
    #[serde(rename = "Participant ID")]
    participant_id: String,
    #[serde(rename = "Dilemma ID")]
    dilemma_id: String,
    #[serde(rename = "Dilemma Title")]
    dilemma_title: String,
    #[serde(rename = "Choice")]
    choice: String,
    #[serde(rename = "Ethical Framework")]
    framework: String,
    #[serde(rename = "Reaction Time (s)")]
    reaction_time: String,
    #[serde(rename = "Timestamp")]
    timestamp: String,
}

/// First-column labels of the per-session summary trailer. The label rows
/// reuse the Dilemma ID column for the summary value ("50.00%", "4.15s"),
/// so an empty Dilemma ID alone does not identify them.
const TRAILER_LABELS: [&str; 4] = [
    "Summary",
    "Utilitarian Percentage",
    "Deontological Percentage",
    "Average Reaction Time",
];

impl RawRow {
    /// Trailer rows are the blank spacer (no Dilemma ID) and the summary
    /// lines the capture pipeline appends, labelled in the Participant ID
    /// column. They are not data.
    fn is_trailer(&self) -> bool {
        self.dilemma_id.trim().is_empty()
            || TRAILER_LABELS.contains(&self.participant_id.trim())
    }

    fn into_record(self) -> anyhow::Result<ResultRecord> {
        let participant_id = self.participant_id.trim().to_string();
        anyhow::ensure!(!participant_id.is_empty(), "row has an empty participant id");

        let dilemma_id: i64 = self
            .dilemma_id
            .trim()
            .parse()
            .with_context(|| format!("invalid dilemma id {:?}", self.dilemma_id))?;
        let reaction_time_secs: f64 = self
            .reaction_time
            .trim()
            .parse()
            .with_context(|| format!("invalid reaction time {:?}", self.reaction_time))?;
        anyhow::ensure!(
            reaction_time_secs >= 0.0,
            "negative reaction time {reaction_time_secs}"
        );

        Ok(ResultRecord {
            participant_id,
            dilemma_id,
            dilemma_title: self.dilemma_title.trim().to_string(),
            choice: self.choice.trim().to_string(),
            framework: self.framework.parse()?,
            reaction_time_secs,
            timestamp: self.timestamp.trim().to_string(),
        })
    }
}

/// Loads one results CSV, dropping trailer rows. Any malformed data row
/// makes the whole source unreadable.
pub fn load_results_file(path: &Path) -> anyhow::Result<Vec<ResultRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("failed to open {}", path.display()))?;

    let mut records = Vec::new();
    for (idx, row) in reader.deserialize::<RawRow>().enumerate() {
        let row = row.with_context(|| format!("{} row {}", path.display(), idx + 1))?;
        if row.is_trailer() {
            continue;
        }
        let record = row
            .into_record()
            .with_context(|| format!("{} row {}", path.display(), idx + 1))?;
        records.push(record);
    }
    Ok(records)
}

fn is_results_file(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    name.contains("trolley_results") && name.ends_with(".csv")
}

/// Loads every results CSV in `results_dir` and concatenates them into one
/// table. Sources are visited in filename order so the combined row order is
/// reproducible, and an unreadable source is skipped rather than aborting
/// the run. No matching sources yields an empty table, not an error.
pub fn load_all_results(results_dir: &Path) -> anyhow::Result<Vec<ResultRecord>> {
    let entries = std::fs::read_dir(results_dir)
        .with_context(|| format!("failed to read results directory {}", results_dir.display()))?;

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| is_results_file(path))
        .collect();
    paths.sort();

    let mut combined = Vec::new();
    for path in paths {
        match load_results_file(&path) {
            Ok(records) => combined.extend(records),
            Err(err) => warn!(source = %path.display(), error = %err, "skipping unreadable results file"),
        }
    }
    Ok(combined)
}

/// Writes the combined table back out as one CSV, without trailer rows.
pub fn write_combined_csv(records: &[ResultRecord], path: &Path) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    writer.write_record(RESULT_HEADERS)?;
    for record in records {
        writer.write_record([
            record.participant_id.as_str(),
            &record.dilemma_id.to_string(),
            record.dilemma_title.as_str(),
            record.choice.as_str(),
            record.framework.as_str(),
            &record.reaction_time_secs.to_string(),
            record.timestamp.as_str(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SESSION_CSV: &str = "\
Participant ID,Dilemma ID,Dilemma Title,Choice,Ethical Framework,Reaction Time (s),Timestamp
p1,1,Autonomous Vehicle Decision,Swerve to minimize casualties,utilitarian,3.2,2026-08-01T10:00:00
p1,2,AI Healthcare Resource Allocation,First come first served,deontological,5.1,2026-08-01T10:00:20
,,,,,,
Summary,,,,,,
Utilitarian Percentage,50.00%,,,,,
Deontological Percentage,50.00%,,,,,
Average Reaction Time,4.15s,,,,,
";

    fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn drops_trailer_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "trolley_results_p1_2026-08-01.csv", SESSION_CSV);

        let records = load_results_file(&path).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].participant_id, "p1");
        assert_eq!(records[0].dilemma_id, 1);
        assert!((records[1].reaction_time_secs - 5.1).abs() < 1e-9);
    }

    #[test]
    fn summary_values_in_dilemma_id_column_are_still_trailer() {
        // The summary lines put their value, not an id, in the Dilemma ID
        // cell; they must be dropped, not treated as malformed data.
        let dir = tempfile::tempdir().unwrap();
        let csv = "\
Participant ID,Dilemma ID,Dilemma Title,Choice,Ethical Framework,Reaction Time (s),Timestamp
p1,1,Title,Choice,utilitarian,3.2,2026-08-01T10:00:00
Utilitarian Percentage,100.00%,,,,,
Deontological Percentage,0.00%,,,,,
Average Reaction Time,3.20s,,,,,
";
        let path = write_file(dir.path(), "trolley_results_p1.csv", csv);
        let records = load_results_file(&path).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].dilemma_id, 1);
    }

    #[test]
    fn malformed_data_row_fails_the_source() {
        let dir = tempfile::tempdir().unwrap();
        let bad = "\
Participant ID,Dilemma ID,Dilemma Title,Choice,Ethical Framework,Reaction Time (s),Timestamp
p1,1,Title,Choice,consequentialist,3.2,2026-08-01T10:00:00
";
        let path = write_file(dir.path(), "trolley_results_bad.csv", bad);
        assert!(load_results_file(&path).is_err());
    }

    #[test]
    fn combines_sources_in_filename_order_and_skips_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let second = SESSION_CSV.replace("p1", "p2");
        write_file(dir.path(), "trolley_results_p2_2026-08-02.csv", &second);
        write_file(dir.path(), "trolley_results_p1_2026-08-01.csv", SESSION_CSV);
        write_file(dir.path(), "trolley_results_broken.csv", "not,a,results\nfile");
        write_file(dir.path(), "notes.txt", "ignored");

        let records = load_all_results(dir.path()).unwrap();
        assert_eq!(records.len(), 4);
        assert_eq!(records[0].participant_id, "p1");
        assert_eq!(records[2].participant_id, "p2");
    }

    #[test]
    fn empty_directory_yields_empty_table() {
        let dir = tempfile::tempdir().unwrap();
        let records = load_all_results(dir.path()).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn combined_export_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let source = write_file(dir.path(), "trolley_results_p1.csv", SESSION_CSV);
        let records = load_results_file(&source).unwrap();

        let out = dir.path().join("trolley_results_combined.csv");
        write_combined_csv(&records, &out).unwrap();
        let reloaded = load_results_file(&out).unwrap();
        assert_eq!(reloaded.len(), records.len());
        assert_eq!(reloaded[1].dilemma_title, records[1].dilemma_title);
    }
}
