//! Non-fatal findings reported while parsing and building commands
//!
//! Malformed markup never aborts a parse. Each anomaly (unknown command,
//! failing constructor, wrong argument count, runaway nesting) becomes a
//! [`Diagnostic`] handed to a [`DiagnosticSink`] the moment it is detected. The
//! sink belongs to the caller: collect them with [`Diagnostics`], or send them
//! to the `log` facade with [`LogSink`].

use serde::Serialize;
use std::fmt;

/// Diagnostic severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// What went wrong
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagnosticKind {
    /// No command kind is registered under the canonical name.
    UnknownCommand,
    /// A registered kind failed to construct.
    ConstructionFailed,
    /// Surplus arguments were dropped.
    TooManyArguments,
    /// Missing required arguments were padded with empty text.
    NotEnoughArguments,
    /// Argument nesting exceeded the parser's depth limit.
    NestingTooDeep,
}

impl DiagnosticKind {
    /// Stable identifier, suitable for filtering.
    pub fn code(self) -> &'static str {
        match self {
            DiagnosticKind::UnknownCommand => "unknown-command",
            DiagnosticKind::ConstructionFailed => "construction-failed",
            DiagnosticKind::TooManyArguments => "too-many-arguments",
            DiagnosticKind::NotEnoughArguments => "not-enough-arguments",
            DiagnosticKind::NestingTooDeep => "nesting-too-deep",
        }
    }

    pub fn severity(self) -> Severity {
        match self {
            DiagnosticKind::ConstructionFailed => Severity::Error,
            _ => Severity::Warning,
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A single non-fatal finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub severity: Severity,
    /// Command name as written in the source.
    pub command: String,
    pub message: String,
    /// Excerpt of the source around the command, if known.
    pub location: Option<String>,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, command: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: kind.severity(),
            command: command.into(),
            message: message.into(),
            location: None,
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.location {
            Some(location) => write!(f, "{} (at {}...)", self.message, location),
            None => f.write_str(&self.message),
        }
    }
}

/// Receiver for diagnostics, owned by the caller.
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for &mut S {
    fn report(&mut self, diagnostic: Diagnostic) {
        (**self).report(diagnostic)
    }
}

/// Collects diagnostics in the order they were reported.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.items.iter()
    }

    /// Rendered messages, locations included.
    pub fn messages(&self) -> Vec<String> {
        self.items.iter().map(ToString::to_string).collect()
    }

    /// Number of diagnostics of the given kind.
    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.items.iter().filter(|d| d.kind == kind).count()
    }

    pub fn has(&self, kind: DiagnosticKind) -> bool {
        self.count(kind) > 0
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.items
    }
}

impl DiagnosticSink for Diagnostics {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.items.push(diagnostic);
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Forwards diagnostics to the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        match diagnostic.severity {
            Severity::Error => log::error!("{diagnostic}"),
            Severity::Warning => log::warn!("{diagnostic}"),
        }
    }
}
