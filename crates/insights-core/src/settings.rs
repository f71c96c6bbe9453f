use clap::{CommandFactory, Parser};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Customer-support KPI, Pareto and dashboard toolkit
#[derive(Parser, Debug, Clone)]
#[command(
    name = "cx-insights",
    about = "Customer-support KPIs, Pareto analysis and dashboard from CSV exports",
    version
)]
pub struct Settings {
    /// Pipeline step to run
    #[arg(long, default_value = "all", value_parser = ["all", "clean", "analyze", "pareto", "dashboard"])]
    pub step: String,

    /// Directory holding the raw CSV exports and receiving all outputs
    #[arg(long, default_value = "Data")]
    pub data_dir: PathBuf,

    /// Dashboard theme
    #[arg(long, default_value = "auto", value_parser = ["light", "dark", "classic", "auto"])]
    pub theme: String,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Clear saved configuration
    #[arg(long)]
    pub clear: bool,
}

// ── DataFiles ──────────────────────────────────────────────────────────────────

/// Every input and output path used by the pipeline, rooted at one directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataFiles {
    pub raw_tickets: PathBuf,
    pub raw_calls: PathBuf,
    pub raw_feedback: PathBuf,
    pub cleaned_tickets: PathBuf,
    pub cleaned_calls: PathBuf,
    pub cleaned_feedback: PathBuf,
    pub insights_workbook: PathBuf,
    pub pareto_csv: PathBuf,
    pub five_whys_csv: PathBuf,
    pub dashboard_workbook: PathBuf,
}

impl DataFiles {
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            raw_tickets: dir.join("support_tickets.csv"),
            raw_calls: dir.join("call_logs.csv"),
            raw_feedback: dir.join("feedback.csv"),
            cleaned_tickets: dir.join("cleaned_support_tickets.csv"),
            cleaned_calls: dir.join("cleaned_call_logs.csv"),
            cleaned_feedback: dir.join("cleaned_feedback.csv"),
            insights_workbook: dir.join("CX_Insights.xlsx"),
            pareto_csv: dir.join("pareto_issue_type.csv"),
            five_whys_csv: dir.join("five_whys_template.csv"),
            dashboard_workbook: dir.join("CX_Insights_dashboard.xlsx"),
        }
    }
}

// ── LastUsedParams ─────────────────────────────────────────────────────────────

/// Persisted last-used parameters saved to `~/.cx-insights/last_used.json`.
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct LastUsedParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
}

impl LastUsedParams {
    /// Default location: `~/.cx-insights/last_used.json`.
    pub fn config_path() -> PathBuf {
        Self::config_path_in(&dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
    }

    /// Config path rooted at `base_dir` (used for testing).
    pub fn config_path_in(base_dir: &Path) -> PathBuf {
        base_dir.join(".cx-insights").join("last_used.json")
    }

    /// Load persisted params, falling back to `Default` when the file is
    /// absent or unreadable.
    pub fn load_from(path: &Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        serde_json::from_str(&content).unwrap_or_default()
    }

    /// Write params to `path` via a temp file and rename, creating parent
    /// directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;

        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, &json)?;
        std::fs::rename(&tmp, path)?;

        Ok(())
    }

    /// Delete the config file at `path` if it exists.
    pub fn clear_at(path: &Path) -> Result<(), std::io::Error> {
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse process arguments, merge with last-used params where no explicit
    /// value was given, and persist the result.
    pub fn load_with_last_used() -> Self {
        Self::load_with_last_used_impl(
            std::env::args_os().collect(),
            &LastUsedParams::config_path(),
        )
    }

    /// Same as [`load_with_last_used`](Self::load_with_last_used) with an
    /// explicit argument list and config path, so tests can redirect both.
    pub fn load_with_last_used_impl(args: Vec<std::ffi::OsString>, config_path: &Path) -> Self {
        let matches = Settings::command().get_matches_from(args.clone());
        let mut settings = Settings::parse_from(args);

        if settings.clear {
            if let Err(e) = LastUsedParams::clear_at(config_path) {
                tracing::warn!("Could not clear {}: {}", config_path.display(), e);
            }
            return Self::apply_debug(settings);
        }

        let last = LastUsedParams::load_from(config_path);

        // CLI always wins; `step` is never restored.
        if !is_arg_explicitly_set(&matches, "data_dir") {
            if let Some(v) = last.data_dir {
                settings.data_dir = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "theme") {
            if let Some(v) = last.theme {
                settings.theme = v;
            }
        }

        settings = Self::apply_debug(settings);

        let params = LastUsedParams::from(&settings);
        if let Err(e) = params.save_to(config_path) {
            tracing::debug!("Could not persist settings: {}", e);
        }

        settings
    }

    /// Resolve the input/output paths for the configured data directory.
    pub fn files(&self) -> DataFiles {
        DataFiles::in_dir(&self.data_dir)
    }

    /// `--debug` overrides the log level.
    fn apply_debug(mut settings: Settings) -> Settings {
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }
}

// ── Conversion ─────────────────────────────────────────────────────────────────

impl From<&Settings> for LastUsedParams {
    fn from(s: &Settings) -> Self {
        LastUsedParams {
            data_dir: Some(s.data_dir.clone()),
            theme: Some(s.theme.clone()),
        }
    }
}

/// Returns `true` when `name` was supplied on the command line rather than
/// taken from a default.
fn is_arg_explicitly_set(matches: &clap::ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(clap::parser::ValueSource::CommandLine)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
