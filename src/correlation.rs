use statrs::distribution::{ContinuousCDF, StudentsT};

use crate::error::AnalysisError;
use crate::models::{CorrelationResult, Framework, ResultRecord};

const SIGNIFICANCE_LEVEL: f64 = 0.05;

/// Point-biserial correlation between the framework recoding (1 utilitarian,
/// 0 deontological) and reaction time, with its two-tailed p-value under the
/// t test on n - 2 degrees of freedom.
///
/// Needs at least two responses and variation in both series; otherwise the
/// coefficient is undefined and an error is returned instead of a NaN.
pub fn framework_reaction_time_correlation(
    records: &[ResultRecord],
) -> Result<CorrelationResult, AnalysisError> {
    if records.len() < 2 {
        return Err(AnalysisError::UndefinedStatistic(
            "correlation needs at least two responses".to_string(),
        ));
    }

    let recoded: Vec<f64> = records
        .iter()
        .map(|r| match r.framework {
            Framework::Utilitarian => 1.0,
            Framework::Deontological => 0.0,
        })
        .collect();
    let times: Vec<f64> = records.iter().map(|r| r.reaction_time_secs).collect();

    let n = records.len() as f64;
    let mean_x = recoded.iter().sum::<f64>() / n;
    let mean_y = times.iter().sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in recoded.iter().zip(times.iter()) {
        cov += (x - mean_x) * (y - mean_y);
        var_x += (x - mean_x).powi(2);
        var_y += (y - mean_y).powi(2);
    }

    if var_x == 0.0 {
        return Err(AnalysisError::UndefinedStatistic(
            "all responses chose the same framework".to_string(),
        ));
    }
    if var_y == 0.0 {
        return Err(AnalysisError::UndefinedStatistic(
            "all reaction times are identical".to_string(),
        ));
    }

    let correlation = (cov / (var_x * var_y).sqrt()).clamp(-1.0, 1.0);
    let p_value = two_tailed_p_value(correlation, n)?;

    Ok(CorrelationResult {
        correlation,
        p_value,
        significant: p_value < SIGNIFICANCE_LEVEL,
    })
}

fn two_tailed_p_value(r: f64, n: f64) -> Result<f64, AnalysisError> {
    // Perfect separation drives the t statistic to infinity; the tail
    // probability is 0 and the distribution lookup would be degenerate.
    if 1.0 - r * r < 1e-12 {
        return Ok(0.0);
    }
    let t = r * ((n - 2.0) / (1.0 - r * r)).sqrt();
    let dist = StudentsT::new(0.0, 1.0, n - 2.0).map_err(|_| {
        AnalysisError::UndefinedStatistic(format!(
            "t distribution with {} degrees of freedom",
            n - 2.0
        ))
    })?;
    Ok((2.0 * (1.0 - dist.cdf(t.abs()))).clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(framework: Framework, rt: f64) -> ResultRecord {
        ResultRecord {
            participant_id: "p1".to_string(),
            dilemma_id: 1,
            dilemma_title: "Dilemma 1".to_string(),
            choice: "choice".to_string(),
            framework,
            reaction_time_secs: rt,
            timestamp: "2026-08-01T10:00:00".to_string(),
        }
    }

    #[test]
    fn perfect_separation_is_near_one_and_significant() {
        let mut records = Vec::new();
        for _ in 0..5 {
            records.push(record(Framework::Utilitarian, 1.0));
            records.push(record(Framework::Deontological, 10.0));
        }
        let result = framework_reaction_time_correlation(&records).unwrap();
        assert!(result.correlation.abs() > 0.999);
        assert!(result.correlation < 0.0); // utilitarian answers are the fast ones
        assert!(result.significant);
    }

    #[test]
    fn noisy_but_separated_groups_stay_significant() {
        let mut records = Vec::new();
        for i in 0..6 {
            records.push(record(Framework::Utilitarian, 1.0 + 0.1 * i as f64));
            records.push(record(Framework::Deontological, 10.0 + 0.1 * i as f64));
        }
        let result = framework_reaction_time_correlation(&records).unwrap();
        assert!(result.correlation < -0.99);
        assert!(result.p_value < 0.001);
        assert!(result.significant);
    }

    #[test]
    fn unrelated_series_is_not_significant() {
        let records = vec![
            record(Framework::Utilitarian, 2.0),
            record(Framework::Deontological, 2.1),
            record(Framework::Utilitarian, 2.2),
            record(Framework::Deontological, 1.9),
            record(Framework::Utilitarian, 2.05),
            record(Framework::Deontological, 2.15),
        ];
        let result = framework_reaction_time_correlation(&records).unwrap();
        assert!(result.correlation.abs() < 0.9);
        assert!(!result.significant);
    }

    #[test]
    fn single_framework_input_is_undefined() {
        let records = vec![
            record(Framework::Utilitarian, 1.0),
            record(Framework::Utilitarian, 2.0),
        ];
        assert!(matches!(
            framework_reaction_time_correlation(&records),
            Err(AnalysisError::UndefinedStatistic(_))
        ));
    }

    #[test]
    fn constant_reaction_times_are_undefined() {
        let records = vec![
            record(Framework::Utilitarian, 3.0),
            record(Framework::Deontological, 3.0),
        ];
        assert!(matches!(
            framework_reaction_time_correlation(&records),
            Err(AnalysisError::UndefinedStatistic(_))
        ));
    }

    #[test]
    fn fewer_than_two_responses_is_undefined() {
        assert!(framework_reaction_time_correlation(&[]).is_err());
        assert!(framework_reaction_time_correlation(&[record(Framework::Utilitarian, 1.0)]).is_err());
    }
}
