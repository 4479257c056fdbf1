use thiserror::Error;

/// Failure conditions of the analysis stages. I/O and parse failures at the
/// loading boundary stay `anyhow` errors; these cover the cases where the
/// data itself cannot support a requested statistic.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// No usable records after combining all sources.
    #[error("no results to analyze")]
    EmptyDataset,

    /// The statistic is mathematically undefined for this input, e.g. a
    /// correlation over a zero-variance series or a percentage over an
    /// empty group.
    #[error("statistic undefined: {0}")]
    UndefinedStatistic(String),
}
