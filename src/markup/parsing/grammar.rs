use crate::markup::brackets::{literal, BracketMarker};
use crate::markup::syntax::{
    Syntax, SyntaxError, MARK_ARGUMENT_END, MARK_ARGUMENT_START, MARK_OPTIONAL_END,
    MARK_OPTIONAL_START,
};
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;

static DEFAULT_GRAMMAR: Lazy<Arc<Grammar>> = Lazy::new(|| {
    Arc::new(Grammar::new(&Syntax::default()).expect("default markup syntax is valid"))
});

/// Compiled markers and patterns for one [`Syntax`].
///
/// Building a grammar compiles several regexes, so build it once and share it
/// between parsers.
#[derive(Debug, Clone)]
pub struct Grammar {
    syntax: Syntax,
    required: BracketMarker,
    optional: BracketMarker,
    required_group: Regex,
    optional_group: Regex,
}

impl Grammar {
    pub fn new(syntax: &Syntax) -> Result<Self, SyntaxError> {
        syntax.validate()?;

        let required = BracketMarker::new(
            syntax.escape,
            syntax.argument_start,
            syntax.argument_end,
            MARK_ARGUMENT_START,
            MARK_ARGUMENT_END,
        )?;
        let optional = BracketMarker::new(
            syntax.escape,
            syntax.optional_start,
            syntax.optional_end,
            MARK_OPTIONAL_START,
            MARK_OPTIONAL_END,
        )?;

        Ok(Self {
            syntax: syntax.clone(),
            required_group: group_pattern(MARK_ARGUMENT_START, MARK_ARGUMENT_END)?,
            optional_group: group_pattern(MARK_OPTIONAL_START, MARK_OPTIONAL_END)?,
            required,
            optional,
        })
    }

    /// Grammar of the default syntax.
    pub fn standard() -> Arc<Grammar> {
        Arc::clone(&DEFAULT_GRAMMAR)
    }

    pub fn syntax(&self) -> &Syntax {
        &self.syntax
    }

    /// Mark the top-level required and optional groups of `text`.
    pub fn mark(&self, text: &str) -> String {
        self.optional.mark(&self.required.mark(text))
    }

    /// Undo [`Grammar::mark`], including markers left in partial slices.
    pub fn unmark(&self, text: &str) -> String {
        self.optional
            .unmark(&self.required.unmark(text))
            .into_owned()
    }

    /// Contents of the marked required group at the very start of `text`,
    /// after optional whitespace, and the length consumed.
    pub(super) fn required_group<'t>(&self, text: &'t str) -> Option<(&'t str, usize)> {
        capture_group(&self.required_group, text)
    }

    pub(super) fn optional_group<'t>(&self, text: &'t str) -> Option<(&'t str, usize)> {
        capture_group(&self.optional_group, text)
    }
}

fn group_pattern(start: char, end: char) -> Result<Regex, regex::Error> {
    let (s, e) = (literal(start), literal(end));
    Regex::new(&format!(r"\A\s*{s}<0>([^{e}]*){e}<0>"))
}

fn capture_group<'t>(pattern: &Regex, text: &'t str) -> Option<(&'t str, usize)> {
    let caps = pattern.captures(text)?;
    let whole = caps.get(0)?;
    let contents = caps.get(1)?;
    Some((contents.as_str(), whole.end()))
}
