//! Top-level bracket group marking
//!
//! Argument groups may nest (`{a {b} c}`) and may contain escaped delimiters
//! (`{a \} b}`), which makes them hard to extract with a plain regular
//! expression. The marker rewrites text so that every balanced, unescaped
//! delimiter pair that is not nested inside another pair of the same kind is
//! replaced by `marker_start<0>` .. `marker_end<0>`. Anything nested inside such
//! a group stays plain text; the parser marks it again when it descends into
//! the group.
//!
//! Marking is a single pass with a stack of open delimiters. An unescaped end
//! delimiter closes the most recent unclosed start delimiter; ends with
//! nothing to close and starts that are never closed stay literal. A second
//! walk over the matched pairs keeps the markers of pairs at depth zero and
//! writes nested pairs back as raw delimiters.
//!
//! A delimiter directly preceded by the escape character is never a group
//! boundary.

use super::syntax::SyntaxError;
use regex::{Captures, Regex};
use std::borrow::Cow;

/// Marks the top-level groups of one delimiter kind.
#[derive(Debug, Clone)]
pub struct BracketMarker {
    escape: char,
    start: char,
    end: char,
    marker_start: char,
    marker_end: char,
    tag: Regex,
}

impl BracketMarker {
    /// Create a marker for the `start`/`end` delimiter pair.
    ///
    /// The marker characters must not otherwise occur in the text, and the
    /// delimiters must differ from the escape character.
    pub fn new(
        escape: char,
        start: char,
        end: char,
        marker_start: char,
        marker_end: char,
    ) -> Result<Self, SyntaxError> {
        for (role, ch) in [("start delimiter", start), ("end delimiter", end)] {
            if ch == '<' || ch == '>' {
                return Err(SyntaxError::AngleBracket { role, ch });
            }
        }

        let (ms, me) = (literal(marker_start), literal(marker_end));

        Ok(Self {
            escape,
            start,
            end,
            marker_start,
            marker_end,
            tag: Regex::new(&format!("({ms})<[0-9]+>|{me}<[0-9]+>"))?,
        })
    }

    pub fn start(&self) -> char {
        self.start
    }

    pub fn end(&self) -> char {
        self.end
    }

    pub fn marker_start(&self) -> char {
        self.marker_start
    }

    pub fn marker_end(&self) -> char {
        self.marker_end
    }

    /// Replace all top-level delimiter pairs with `<0>` markers.
    pub fn mark(&self, text: &str) -> String {
        let chars: Vec<char> = text.chars().collect();
        let matched = self.matched_pairs(&chars);

        let mut marked = String::with_capacity(text.len());
        let mut depth = 0usize;
        for (ch, is_matched) in chars.iter().zip(&matched) {
            if !is_matched {
                marked.push(*ch);
            } else if *ch == self.start {
                if depth == 0 {
                    marked.push(self.marker_start);
                    marked.push_str("<0>");
                } else {
                    marked.push(self.start);
                }
                depth += 1;
            } else {
                depth -= 1;
                if depth == 0 {
                    marked.push(self.marker_end);
                    marked.push_str("<0>");
                } else {
                    marked.push(self.end);
                }
            }
        }

        marked
    }

    /// Flags the delimiters of `chars` that belong to a balanced pair.
    fn matched_pairs(&self, chars: &[char]) -> Vec<bool> {
        let mut matched = vec![false; chars.len()];
        let mut open = Vec::new();
        let mut previous = None;

        for (i, &ch) in chars.iter().enumerate() {
            let escaped = previous == Some(self.escape);
            previous = Some(ch);
            if escaped {
                continue;
            }

            if ch == self.start {
                open.push(i);
            } else if ch == self.end {
                if let Some(start) = open.pop() {
                    matched[start] = true;
                    matched[i] = true;
                }
            }
        }

        matched
    }

    /// Turn markers of this kind back into raw delimiters, whatever their tag.
    pub fn unmark<'t>(&self, text: &'t str) -> Cow<'t, str> {
        self.tag.replace_all(text, |caps: &Captures<'_>| {
            if caps.get(1).is_some() {
                self.start.to_string()
            } else {
                self.end.to_string()
            }
        })
    }
}

/// Mark the top-level `start`/`end` groups of `text` in one go.
pub fn mark_brackets(
    text: &str,
    escape: char,
    start: char,
    end: char,
    marker_start: char,
    marker_end: char,
) -> Result<String, SyntaxError> {
    Ok(BracketMarker::new(escape, start, end, marker_start, marker_end)?.mark(text))
}

/// Regex escape for a single character, safe inside and outside classes.
pub(crate) fn literal(ch: char) -> String {
    format!("\\x{{{:X}}}", ch as u32)
}
