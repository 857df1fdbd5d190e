use std::io::{BufReader, stdin, stdout};

use serde_json::Value;

use crate::action::action_model::{ActionDescriptor, DrawPayload, TypeHint};
use crate::action::voice::match_transcript;
use crate::backend::client::{HttpSummaryBackend, MockSummaryBackend, SummaryBackend};
use crate::cli::config::{AppConfig, build_backend_config, build_engine, build_overlay_config};
use crate::host::bridge::{HostBridge, serve};
use crate::host::snapshot::SnapshotSurface;
use crate::overlay::error::OverlayError;
use crate::overlay::machine::OverlayMachine;
use crate::overlay::overlay_model::OverlayState;
use crate::resolve::engine::{Resolution, ResolutionReport};
use crate::trace::logger::TraceLogger;
use crate::trace::trace::TraceEvent;

// ============================================================================
// resolve subcommand
// ============================================================================

/// Resolve one action against a snapshot file; returns whether a target was found.
pub fn cmd_resolve(
    config: &AppConfig,
    surface_path: &str,
    action: &str,
    keywords: &[String],
    type_hint: Option<&str>,
    threshold: Option<u32>,
    tracer: &TraceLogger,
) -> Result<bool, Box<dyn std::error::Error>> {
    let raw = read_json(surface_path)?;
    let mut surface = SnapshotSurface::from_json(&raw)?;
    let engine = build_engine(config, threshold);
    let action = parse_action_arg(action, keywords, type_hint)?;

    let report = engine.resolve(&mut surface, &action)?;
    tracer.log(
        &TraceEvent::now(0, OverlayState::Searching, "resolve")
            .with_label(&action.label)
            .with_report(&report, engine.threshold()),
    );

    println!("{}", format_report(&report, &surface, engine.threshold()));
    Ok(report.resolution.is_resolved())
}

/// `--action` is either an action object in JSON or a bare label.
/// `--keywords` are appended and `--type-hint` overrides the object's hint.
pub fn parse_action_arg(
    raw: &str,
    keywords: &[String],
    type_hint: Option<&str>,
) -> Result<ActionDescriptor, OverlayError> {
    let mut action = if raw.trim_start().starts_with('{') {
        serde_json::from_str::<ActionDescriptor>(raw).map_err(|e| OverlayError::JsonParse {
            context: "--action".into(),
            source: e,
        })?
    } else {
        ActionDescriptor::new(raw, &[])
    };

    action.keywords.extend(keywords.iter().cloned());
    if let Some(hint) = type_hint {
        action.type_hint = parse_type_hint(hint);
    }
    Ok(action)
}

pub fn format_report(report: &ResolutionReport, surface: &SnapshotSurface, threshold: u32) -> String {
    match &report.resolution {
        Resolution::Resolved(t) => {
            let tag = surface
                .elements
                .get(t.candidate.0)
                .map(|e| e.tag.as_str())
                .unwrap_or("?");
            format!(
                "resolved: element #{} <{}> score {} (threshold {}, {} candidates)",
                t.candidate.0, tag, t.score, threshold, report.candidates_scanned
            )
        }
        Resolution::NotFound { max_score } => format!(
            "not found: best score {} (threshold {}, {} candidates)",
            max_score, threshold, report.candidates_scanned
        ),
    }
}

pub fn parse_type_hint(raw: &str) -> TypeHint {
    match raw.trim().to_lowercase().as_str() {
        "input" => TypeHint::Input,
        "activatable" | "clickable" => TypeHint::Activatable,
        _ => TypeHint::Unspecified,
    }
}

// ============================================================================
// voice subcommand
// ============================================================================

pub fn cmd_voice(transcript: &str, actions_path: &str) -> Result<bool, Box<dyn std::error::Error>> {
    let raw = read_json(actions_path)?;
    let actions = parse_action_list(&raw)?;

    match match_transcript(transcript, &actions) {
        Some(action) => {
            println!("matched: {}", action.label);
            Ok(true)
        }
        None => {
            println!(
                "{}",
                OverlayError::VoiceNoMatch {
                    transcript: transcript.trim().to_lowercase()
                }
            );
            Ok(false)
        }
    }
}

/// A draw payload, or a bare array of actions.
pub fn parse_action_list(raw: &Value) -> Result<Vec<ActionDescriptor>, OverlayError> {
    let parsed = if raw.is_array() {
        serde_json::from_value::<Vec<ActionDescriptor>>(raw.clone())
    } else {
        serde_json::from_value::<DrawPayload>(raw.clone()).map(|p| p.primary_actions)
    };

    parsed.map_err(|e| OverlayError::JsonParse {
        context: "action list".into(),
        source: e,
    })
}

// ============================================================================
// serve subcommand
// ============================================================================

pub fn cmd_serve(
    config: &AppConfig,
    ack_delay_ms: Option<u64>,
    tracer: &TraceLogger,
) -> Result<(), Box<dyn std::error::Error>> {
    let engine = build_engine(config, None);
    let mut machine = OverlayMachine::new(engine, build_overlay_config(config, ack_delay_ms));
    let mut bridge = HostBridge::new(BufReader::new(stdin()), stdout());

    tracing::info!("serving overlay over stdio");
    serve(&mut bridge, &mut machine, tracer)?;
    Ok(())
}

// ============================================================================
// simplify subcommand
// ============================================================================

pub fn cmd_simplify(
    config: &AppConfig,
    image_path: &str,
    mock: bool,
    endpoint: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let image_data = std::fs::read_to_string(image_path)?;

    let backend: Box<dyn SummaryBackend> = if mock {
        Box::new(MockSummaryBackend)
    } else {
        Box::new(HttpSummaryBackend::new(build_backend_config(config, endpoint)))
    };

    let payload = backend.simplify(image_data.trim())?;
    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(())
}

fn read_json(path: &str) -> Result<Value, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(path)?;
    let value = serde_json::from_str(&content).map_err(|e| OverlayError::JsonParse {
        context: path.to_string(),
        source: e,
    })?;
    Ok(value)
}
