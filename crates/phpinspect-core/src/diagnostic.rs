//! Diagnostic types produced by inspections

use mago_span::Span;

use crate::fix::FixDescriptor;

/// Severity of a reported finding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Broken code - must be fixed
    Error,
    /// Likely bug or pattern violation - should be reviewed
    Warning,
    /// Maintainability improvement, behavior is unaffected
    Suggestion,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Suggestion => write!(f, "suggestion"),
        }
    }
}

/// A single finding, anchored to a node of the inspected file
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// The rule that produced this finding (e.g. "nested_not_operators")
    pub rule: &'static str,
    /// Span of the node the finding is anchored to
    pub span: Span,
    /// Human-readable message
    pub message: String,
    /// Severity level
    pub severity: Severity,
    /// Optional automated rewrite
    pub fix: Option<FixDescriptor>,
}

impl Diagnostic {
    /// Create a diagnostic without a fix
    pub fn new(rule: &'static str, span: Span, message: impl Into<String>, severity: Severity) -> Self {
        Self {
            rule,
            span,
            message: message.into(),
            severity,
            fix: None,
        }
    }

    /// Attach an automated fix
    pub fn with_fix(mut self, fix: FixDescriptor) -> Self {
        self.fix = Some(fix);
        self
    }
}

/// Receiver for diagnostics emitted during a traversal
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

/// Vec-backed sink preserving emission order
#[derive(Debug, Default)]
pub struct DiagnosticList {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

impl DiagnosticSink for DiagnosticList {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }
}
