use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::backend::client::BackendConfig;
use crate::overlay::overlay_model::OverlayConfig;
use crate::resolve::engine::ResolutionEngine;
use crate::resolve::scoring::ScoringWeights;
use crate::surface::scanner::ScannerConfig;

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "tap-assist",
    version,
    about = "Resolve simplified page actions to the real buttons, links and inputs"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config file (default: tap-assist.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Decision trace file (JSONL)
    #[arg(long, global = true)]
    pub trace: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve one action against a captured surface snapshot
    Resolve {
        /// JSON file with the element walk
        #[arg(long)]
        surface: String,

        /// Action as a JSON object, or a bare label
        #[arg(long, alias = "label")]
        action: String,

        /// Extra matching keywords (comma separated)
        #[arg(long, value_delimiter = ',')]
        keywords: Vec<String>,

        /// Type hint override: input, activatable or unspecified
        #[arg(long)]
        type_hint: Option<String>,

        /// Override the acceptance threshold
        #[arg(long)]
        threshold: Option<u32>,
    },

    /// Match a spoken transcript against an action list
    Voice {
        /// What the user said
        #[arg(long)]
        transcript: String,

        /// JSON file with a draw payload or an array of actions
        #[arg(long)]
        actions: String,
    },

    /// Drive the overlay over stdin/stdout (NDJSON) for a page shim
    Serve {
        /// Acknowledgment delay before the overlay closes
        #[arg(long)]
        ack_delay_ms: Option<u64>,
    },

    /// Send a screenshot to the summarizing backend and print the action list
    Simplify {
        /// File holding the screenshot as a data URL
        #[arg(long)]
        image: String,

        /// Use the built-in mock payload instead of calling the backend
        #[arg(long, default_value_t = false)]
        mock: bool,

        /// Backend endpoint
        #[arg(long)]
        endpoint: Option<String>,
    },
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `tap-assist.yaml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub scoring: ScoringWeights,
    #[serde(default)]
    pub scanner: ScannerConfig,
    #[serde(default)]
    pub overlay: OverlayConfig,
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub trace: TraceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceConfig {
    #[serde(default = "default_trace_path")]
    pub path: String,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            path: default_trace_path(),
        }
    }
}

fn default_trace_path() -> String { "resolution_trace.jsonl".to_string() }

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file. Returns defaults if file is missing or malformed.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or("tap-assist.yaml");
    match std::fs::read_to_string(config_path) {
        Ok(content) => serde_yaml::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!("ignoring malformed config '{}': {}", config_path, e);
            AppConfig::default()
        }),
        Err(_) => AppConfig::default(),
    }
}

// ============================================================================
// Config Builders (merge CLI args with config file)
// ============================================================================

pub fn build_engine(config: &AppConfig, threshold: Option<u32>) -> ResolutionEngine {
    let mut weights = config.scoring.clone();
    if let Some(t) = threshold {
        weights.accept_threshold = t;
    }
    ResolutionEngine::new(weights, config.scanner.clone())
}

pub fn build_overlay_config(config: &AppConfig, ack_delay_ms: Option<u64>) -> OverlayConfig {
    OverlayConfig {
        ack_delay_ms: ack_delay_ms.unwrap_or(config.overlay.ack_delay_ms),
    }
}

pub fn build_backend_config(config: &AppConfig, endpoint: Option<&str>) -> BackendConfig {
    BackendConfig {
        endpoint: endpoint
            .map(str::to_string)
            .unwrap_or_else(|| config.backend.endpoint.clone()),
        timeout_secs: config.backend.timeout_secs,
    }
}
