use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReconError {
    /// Two different detections share one (epoch, label) key. The source data
    /// contradicts itself and must be fixed before rerunning.
    #[error(
        "conflicting observations for {label} at MJD {mjd:.6}:\n  kept:     {existing}\n  incoming: {incoming}"
    )]
    Conflict {
        mjd: f64,
        label: String,
        existing: String,
        incoming: String,
    },
    /// TOML parse / deserialization error.
    #[error("config parse error: {0}")]
    ConfigParse(String),
    /// Config validation error (bad tolerance, bad observatory code, etc.).
    #[error("config validation error: {0}")]
    ConfigValidation(String),
}
