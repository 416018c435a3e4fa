//! Diagnostics for the Transform Stage
//!
//! The rewrite passes never fail. Anything noteworthy is reported as a
//! `Diagnostic` to a caller-supplied `DiagnosticSink`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ir::SourceLocation;

// ═══════════════════════════════════════════════════════════════════════════════
// DIAGNOSTIC CODES
// ═══════════════════════════════════════════════════════════════════════════════

pub const WARN_HOIST_DEPRECATED: &str = "W001";
pub const WARN_DYNAMIC_SCRIPT_SRC: &str = "W002";
pub const WARN_SET_DIRECTIVE_CHILDREN: &str = "W003";

fn get_hint(code: &str) -> &'static str {
    match code {
        WARN_HOIST_DEPRECATED => "You may remove the `hoist` attribute.",
        WARN_DYNAMIC_SCRIPT_SRC => "Use a string literal on the src attribute instead.",
        WARN_SET_DIRECTIVE_CHILDREN => "Remove the child nodes to suppress this warning.",
        _ => "",
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub code: String,
    pub severity: Severity,
    pub message: String,
    pub hint: String,
    pub file: String,
    pub location: Option<SourceLocation>,
}

impl Diagnostic {
    pub fn warning(code: &str, message: impl Into<String>, file: &str) -> Self {
        Self {
            code: code.to_string(),
            severity: Severity::Warning,
            message: message.into(),
            hint: get_hint(code).to_string(),
            file: file.to_string(),
            location: None,
        }
    }

    pub fn at(mut self, location: SourceLocation) -> Self {
        self.location = Some(location);
        self
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// SINKS
// ═══════════════════════════════════════════════════════════════════════════════

pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

/// Forwards every diagnostic to `tracing` at warn level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        tracing::warn!(
            code = %diagnostic.code,
            file = %diagnostic.file,
            hint = %diagnostic.hint,
            "{}",
            diagnostic.message
        );
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// BOUNDARY ERRORS
// ═══════════════════════════════════════════════════════════════════════════════

/// Failures at the serialized boundary. The in-memory passes never produce these.
#[derive(Debug, Error)]
pub enum TransformError {
    #[error("Failed to parse document JSON: {0}")]
    InvalidDocument(#[source] serde_json::Error),

    #[error("Failed to parse transform options: {0}")]
    InvalidOptions(#[source] serde_json::Error),

    #[error("Failed to serialize transform result: {0}")]
    Serialize(#[source] serde_json::Error),
}
