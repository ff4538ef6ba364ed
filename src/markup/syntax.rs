//! Markup characters
//!
//! Every character with a structural meaning in the markup is configurable. The
//! defaults are:
//!
//! | Element                      | Character(s)                      |
//! |------------------------------|-----------------------------------|
//! | Command introducer           | `\`                               |
//! | Required-argument delimiters | `{` `}`                           |
//! | Optional-argument delimiters | `[` `]`                           |
//! | Escape character             | `\`                               |
//! | Symbolic command characters  | `< > = ! ~ * # $ % @ ? + \|`      |
//!
//! The bracket marker rewrites delimiters into private control characters
//! followed by an angle-bracket tag (`\u{1}<0>`), which is why delimiters can
//! be neither angle brackets nor one of those control characters.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Marker replacing a top-level required-argument start delimiter.
pub const MARK_ARGUMENT_START: char = '\u{1}';
/// Marker replacing a top-level required-argument end delimiter.
pub const MARK_ARGUMENT_END: char = '\u{2}';
/// Marker replacing a top-level optional-argument start delimiter.
pub const MARK_OPTIONAL_START: char = '\u{3}';
/// Marker replacing a top-level optional-argument end delimiter.
pub const MARK_OPTIONAL_END: char = '\u{4}';

/// Characters that may form symbolic command names such as `\<=`.
pub const DEFAULT_SYMBOLS: &str = "<>=!~*#$%@?+|";

const RESERVED: [char; 4] = [
    MARK_ARGUMENT_START,
    MARK_ARGUMENT_END,
    MARK_OPTIONAL_START,
    MARK_OPTIONAL_END,
];

/// Invalid markup character configuration
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SyntaxError {
    #[error("{role} cannot be {ch:?}, it is reserved for bracket marking")]
    Reserved { role: &'static str, ch: char },
    #[error("{role} cannot be an angle bracket ({ch:?}), marker tags use them")]
    AngleBracket { role: &'static str, ch: char },
    #[error("{role} {ch:?} cannot be alphanumeric or whitespace")]
    NotPunctuation { role: &'static str, ch: char },
    #[error("{first} and {second} both use {ch:?}")]
    Conflict {
        first: &'static str,
        second: &'static str,
        ch: char,
    },
    #[error("symbolic command characters cannot include the {role} {ch:?}")]
    SymbolConflict { role: &'static str, ch: char },
    #[error("invalid pattern for the markup grammar: {0}")]
    Pattern(#[from] regex::Error),
}

/// The set of structural markup characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Syntax {
    pub command: char,
    pub escape: char,
    pub argument_start: char,
    pub argument_end: char,
    pub optional_start: char,
    pub optional_end: char,
    pub symbols: String,
}

impl Default for Syntax {
    fn default() -> Self {
        Self {
            command: '\\',
            escape: '\\',
            argument_start: '{',
            argument_end: '}',
            optional_start: '[',
            optional_end: ']',
            symbols: DEFAULT_SYMBOLS.to_string(),
        }
    }
}

impl Syntax {
    /// Returns `true` if `ch` can be part of a symbolic command name.
    pub fn is_symbol(&self, ch: char) -> bool {
        self.symbols.contains(ch)
    }

    /// Returns `true` if `ch` can start a command name after the introducer.
    pub fn is_name_start(&self, ch: char) -> bool {
        ch.is_alphanumeric() || self.is_symbol(ch)
    }

    /// Check that the characters can be told apart by the parser.
    pub fn validate(&self) -> Result<(), SyntaxError> {
        let delimiters = [
            ("required-argument start", self.argument_start),
            ("required-argument end", self.argument_end),
            ("optional-argument start", self.optional_start),
            ("optional-argument end", self.optional_end),
        ];
        let introducers = [("command introducer", self.command), ("escape", self.escape)];

        for (role, ch) in delimiters.iter().chain(introducers.iter()).copied() {
            if RESERVED.contains(&ch) {
                return Err(SyntaxError::Reserved { role, ch });
            }
            if ch.is_alphanumeric() || ch.is_whitespace() {
                return Err(SyntaxError::NotPunctuation { role, ch });
            }
        }

        for (i, (role, ch)) in delimiters.iter().copied().enumerate() {
            if ch == '<' || ch == '>' {
                return Err(SyntaxError::AngleBracket { role, ch });
            }
            let later = delimiters[i + 1..].iter().chain(introducers.iter());
            if let Some((second, _)) = later.copied().find(|(_, other)| *other == ch) {
                return Err(SyntaxError::Conflict {
                    first: role,
                    second,
                    ch,
                });
            }
        }

        for (role, ch) in delimiters.iter().chain(introducers.iter()).copied() {
            if self.is_symbol(ch) {
                return Err(SyntaxError::SymbolConflict { role, ch });
            }
        }
        if let Some(ch) = self.symbols.chars().find(|c| c.is_alphanumeric()) {
            return Err(SyntaxError::NotPunctuation {
                role: "symbolic command character",
                ch,
            });
        }

        Ok(())
    }
}
