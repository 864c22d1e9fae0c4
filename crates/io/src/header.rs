use astroreport_recon::config::HeaderConfig;
use astroreport_recon::model::Observation;

/// Submission header block, one keyword per line, no trailing newline.
pub fn make_header(observations: &[Observation], config: &HeaderConfig) -> String {
    let mut lines = vec![
        format!("COD {}", config.observatory_code),
        format!("OBS {}", config.observers.join(", ")),
    ];
    if !config.measurers.is_empty() {
        lines.push(format!("MEA {}", config.measurers.join(", ")));
    }
    let optional = [
        ("TEL", &config.telescope),
        ("NET", &config.network),
        ("ACK", &config.acknowledge),
    ];
    for (keyword, value) in optional {
        if let Some(value) = value {
            lines.push(format!("{keyword} {value}"));
        }
    }
    lines.push(format!("NUM {}", observations.len()));
    lines.join("\n")
}
