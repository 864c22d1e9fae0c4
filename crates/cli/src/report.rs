//! `astroreport` pipeline: resolve settings, load both corpora, reconcile,
//! write the submission.

use std::path::{Path, PathBuf};

use astroreport_io::{load_corpus, make_header, parse_date_bound, to_submission_line};
use astroreport_io::{AliasIndex, CorpusWalker, LoadedCorpus};
use astroreport_recon::config::HeaderConfig;
use astroreport_recon::model::Observation;
use astroreport_recon::{
    DateRange, ExactLabel, IdentityResolver, ReconInput, ReportConfig, ReportCriteria,
    ReportSelection, ToleranceConfig,
};

use crate::{Cli, CliError};

const DEFAULT_ALIAS_INDEX: &str = "idx/file.idx";

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Where a name pattern came from; a bad one is a usage error on the command
/// line and a config error in a file.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Source {
    Flag,
    Config,
}

#[derive(Debug)]
struct Settings {
    existing_pattern: (String, Source),
    new_pattern: (String, Source),
    alias_index: Option<PathBuf>,
    criteria: ReportCriteria,
    header: HeaderConfig,
}

fn load_config(path: Option<&Path>) -> Result<(ReportConfig, PathBuf), CliError> {
    let Some(path) = path else {
        return Ok((ReportConfig::default(), PathBuf::from(".")));
    };
    let text = std::fs::read_to_string(path)
        .map_err(|e| CliError::io(format!("cannot read config {}: {e}", path.display())))?;
    let config = ReportConfig::from_toml(&text)
        .map_err(|e| CliError::from(e).with_hint(format!("in {}", path.display())))?;
    let base = path.parent().map(Path::to_path_buf).unwrap_or_default();
    tracing::debug!("loaded config {}", path.display());
    Ok((config, base))
}

/// Merge flags over config over defaults.
fn resolve(cli: &Cli) -> Result<Settings, CliError> {
    let (config, config_dir) = load_config(cli.config.as_deref())?;

    let pick = |flag: &Option<String>, configured: &str| match flag {
        Some(p) => (p.clone(), Source::Flag),
        None => (configured.to_string(), Source::Config),
    };
    let existing_pattern = pick(&cli.existing_name_regex, &config.sources.existing_pattern);
    let new_pattern = pick(&cli.new_name_regex, &config.sources.new_pattern);

    let alias_index = match (&cli.idx_filename, &config.sources.alias_index) {
        (Some(flag), _) => Some(flag.clone()),
        (None, Some(configured)) => Some(config_dir.join(configured)),
        (None, None) => None,
    };

    let tolerance = match cli.tolerance {
        Some(arcsec) => {
            let tolerance = ToleranceConfig { arcsec };
            tolerance
                .validate()
                .map_err(|e| CliError::usage(format!("--tolerance: {e}")))?;
            tolerance
        }
        None => config.tolerance,
    };

    let start = cli.start_date.as_deref().map(parse_date_bound).transpose()?;
    let end = cli.end_date.as_deref().map(parse_date_bound).transpose()?;
    if let (Some(s), Some(e)) = (start, end) {
        if s >= e {
            tracing::warn!("start date MJD {s} is not before end date MJD {e}; nothing can be selected");
        }
    }

    let mut header = config.header;
    if let Some(cod) = &cli.cod {
        header.observatory_code = cod.clone();
    }
    if !cli.observers.is_empty() {
        header.observers = cli.observers.clone();
    }
    header
        .validate()
        .map_err(|e| CliError::usage(e.to_string()).with_hint("check --cod and --obs"))?;

    Ok(Settings {
        existing_pattern,
        new_pattern,
        alias_index,
        criteria: ReportCriteria {
            date_range: DateRange::new(start, end),
            tolerance,
            selection: ReportSelection::from_want_replacement(cli.replacement),
        },
        header,
    })
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

fn load_dir(root: &Path, (pattern, source): &(String, Source)) -> Result<LoadedCorpus, CliError> {
    let walker = CorpusWalker::new(root, pattern).map_err(|e| match source {
        Source::Flag => CliError::from(e),
        Source::Config => CliError::config(e.to_string()),
    })?;
    let files = walker.walk()?;
    let corpus = load_corpus(&files)?;
    tracing::info!(
        "{}: {} observations from {} files",
        root.display(),
        corpus.observations.len(),
        corpus.files
    );
    if corpus.skipped_lines > 0 {
        tracing::warn!("{}: {} unparseable lines skipped", root.display(), corpus.skipped_lines);
    }
    Ok(corpus)
}

/// An explicitly named alias index must load. The default location is
/// optional: without it designations only match themselves.
fn load_resolver(
    explicit: Option<&Path>,
    existing_dir: &Path,
) -> Result<Box<dyn IdentityResolver>, CliError> {
    if let Some(path) = explicit {
        return Ok(Box::new(AliasIndex::load(path)?));
    }

    let default = existing_dir
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join(DEFAULT_ALIAS_INDEX);
    if default.is_file() {
        Ok(Box::new(AliasIndex::load(&default)?))
    } else {
        tracing::warn!(
            "no alias index at {}; designations will only match themselves",
            default.display()
        );
        Ok(Box::new(ExactLabel))
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// Header lines, then one record per line.
fn render_report(selected: &[Observation], header: &HeaderConfig) -> Result<String, CliError> {
    let mut out = make_header(selected, header);
    out.push('\n');
    for obs in selected {
        out.push_str(&to_submission_line(obs)?);
        out.push('\n');
    }
    Ok(out)
}

// ---------------------------------------------------------------------------
// Command
// ---------------------------------------------------------------------------

pub fn cmd_report(cli: Cli) -> Result<(), CliError> {
    let settings = resolve(&cli)?;

    let existing = load_dir(&cli.existing_dir, &settings.existing_pattern)?;
    let new = load_dir(&cli.new_dir, &settings.new_pattern)?;
    let resolver = load_resolver(settings.alias_index.as_deref(), &cli.existing_dir)?;

    let input = ReconInput {
        existing: existing.observations,
        new: new.observations,
    };
    let result = astroreport_recon::run(input, &*resolver, &settings.criteria)?;

    tracing::info!("{}", result.summary.headline());

    if cli.json {
        let json = serde_json::to_string_pretty(&result)
            .map_err(|e| CliError::io(format!("JSON serialization error: {e}")))?;
        println!("{json}");
    }

    if result.selected.is_empty() {
        tracing::warn!("no observations matched criteria");
        return Ok(());
    }

    let text = render_report(&result.selected, &settings.header)?;
    std::fs::write(&cli.report_file, text).map_err(|e| {
        CliError::io(format!("cannot write {}: {e}", cli.report_file.display()))
    })?;
    tracing::info!(
        "wrote {} observations to {}",
        result.selected.len(),
        cli.report_file.display()
    );
    Ok(())
}
