mod classify;
mod config;
mod detail;
mod history;
mod tokens;

use std::time::Instant;

use sentix_core::{
    Dashboard, DashboardConfig, DetailView, DisplayRow, Envelope, EnvelopeError, FeedId,
    IndicatorHistory, PageInfo, SentimentType,
};
use serde::Serialize;
use serde_json::Value;

use crate::cli::{Cli, Command};
use crate::error::CliError;
use crate::metadata::Metadata;

/// Typed command payload; serialized as the envelope's `data`.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum View {
    Tokens {
        rows: Vec<DisplayRow>,
        pagination: PageInfo,
    },
    Detail(DetailView),
    History(IndicatorHistory),
    Sentiment {
        sentiment: SentimentType,
    },
    Config(DashboardConfig),
}

impl View {
    /// Per-item JSON values for NDJSON output.
    pub fn items(&self) -> Result<Vec<Value>, serde_json::Error> {
        match self {
            Self::Tokens { rows, .. } => rows.iter().map(serde_json::to_value).collect(),
            Self::Detail(view) => view.indicators.iter().map(serde_json::to_value).collect(),
            Self::History(history) => history.series.iter().map(serde_json::to_value).collect(),
            other => Ok(vec![serde_json::to_value(other)?]),
        }
    }
}

pub struct CommandResult {
    pub view: View,
    pub warnings: Vec<String>,
    pub errors: Vec<EnvelopeError>,
    pub latency_ms: u64,
    pub feeds: Vec<FeedId>,
}

impl CommandResult {
    pub fn ok(view: View, feeds: Vec<FeedId>) -> Self {
        Self {
            view,
            warnings: Vec::new(),
            errors: Vec::new(),
            latency_ms: 0,
            feeds,
        }
    }

    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings.extend(warnings);
        self
    }

    pub fn with_errors(mut self, errors: Vec<EnvelopeError>) -> Self {
        self.errors.extend(errors);
        self
    }

    pub fn with_latency(mut self, started: Instant) -> Self {
        self.latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        self
    }
}

/// Envelope for machine-readable output plus the typed view for tables.
pub struct CommandOutput {
    pub envelope: Envelope<Value>,
    pub view: View,
}

pub async fn run(cli: &Cli) -> Result<CommandOutput, CliError> {
    let command_result = match &cli.command {
        Command::Tokens(args) => tokens::run(args, &dashboard(cli)?).await,
        Command::Detail(args) => detail::run(args, &dashboard(cli)?).await,
        Command::History(args) => history::run(args, &dashboard(cli)?).await,
        Command::Classify(args) => classify::run(args)?,
        Command::Config => config::run(load_config(cli)?),
    };

    let CommandResult {
        view,
        warnings,
        errors,
        latency_ms,
        feeds,
    } = command_result;

    let mut metadata = Metadata::new(feeds, latency_ms);
    for warning in warnings {
        metadata.push_warning(warning);
    }

    let data = serde_json::to_value(&view)?;
    let envelope = Envelope::with_errors(metadata.into_envelope_meta()?, data, errors)?;
    Ok(CommandOutput { envelope, view })
}

fn load_config(cli: &Cli) -> Result<DashboardConfig, CliError> {
    let mut config = DashboardConfig::load(cli.config.as_deref())?;
    if cli.mock {
        config.use_mock_data = true;
    }
    Ok(config)
}

fn dashboard(cli: &Cli) -> Result<Dashboard, CliError> {
    let dashboard = Dashboard::from_config(load_config(cli)?);
    tracing::debug!(feed = dashboard.feed_name(), "dashboard ready");
    Ok(dashboard)
}
