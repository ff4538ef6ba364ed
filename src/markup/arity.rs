//! Arity contracts and their enforcement
//!
//! A command kind declares how many optional and required arguments it takes.
//! Parsed (or programmatically supplied) argument lists are reconciled against
//! that declaration slot by slot:
//!
//! - variadic or exact match: accepted unchanged
//! - too many: the first `n` are kept, the surplus is handed back and reported
//! - too few: padded with empty text and reported
//!
//! Leaving out the optional arguments altogether is not an error: a command
//! written without any optional group keeps an empty optional list.

use super::ast::Node;
use super::diagnostics::{Diagnostic, DiagnosticKind};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of arguments a slot takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "ArityRepr", into = "ArityRepr")]
pub enum Arity {
    Exact(usize),
    Variadic,
}

impl Arity {
    /// Returns `true` if `count` arguments satisfy this arity exactly.
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Arity::Exact(n) => n == count,
            Arity::Variadic => true,
        }
    }

    pub fn is_variadic(self) -> bool {
        self == Arity::Variadic
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Exact(n) => write!(f, "{n}"),
            Arity::Variadic => write!(f, "any"),
        }
    }
}

/// Config representation: a count or the word `any`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum ArityRepr {
    Count(usize),
    Keyword(String),
}

impl TryFrom<ArityRepr> for Arity {
    type Error = String;

    fn try_from(repr: ArityRepr) -> Result<Self, Self::Error> {
        match repr {
            ArityRepr::Count(n) => Ok(Arity::Exact(n)),
            ArityRepr::Keyword(word) => match word.as_str() {
                "any" | "variadic" => Ok(Arity::Variadic),
                _ => Err(format!(
                    "expected an argument count or \"any\", found {word:?}"
                )),
            },
        }
    }
}

impl From<Arity> for ArityRepr {
    fn from(arity: Arity) -> Self {
        match arity {
            Arity::Exact(n) => ArityRepr::Count(n),
            Arity::Variadic => ArityRepr::Keyword("any".to_string()),
        }
    }
}

/// Declared argument counts of a command kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Contract {
    pub optional: Arity,
    pub required: Arity,
}

impl Contract {
    /// Contract of commands whose kind is unknown: anything goes.
    pub const VARIADIC: Contract = Contract::new(Arity::Variadic, Arity::Variadic);

    pub const fn new(optional: Arity, required: Arity) -> Self {
        Self { optional, required }
    }

    pub const fn exact(optional: usize, required: usize) -> Self {
        Self::new(Arity::Exact(optional), Arity::Exact(required))
    }
}

impl fmt::Display for Contract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]{{{}}}", self.optional, self.required)
    }
}

/// Which argument list is being enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Optional,
    Required,
}

impl Slot {
    fn noun(self) -> &'static str {
        match self {
            Slot::Optional => "optional arguments",
            Slot::Required => "arguments",
        }
    }
}

/// What enforcement did to an argument list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Adjustment {
    Accepted,
    /// Arguments beyond the declared count, in source order.
    Truncated { surplus: Vec<Node> },
    /// Number of empty arguments appended.
    Padded { missing: usize },
}

impl Adjustment {
    /// The diagnostic to report for this adjustment, if any.
    pub fn diagnostic(&self, slot: Slot, name: &str) -> Option<Diagnostic> {
        match self {
            Adjustment::Accepted => None,
            Adjustment::Truncated { .. } => Some(Diagnostic::new(
                DiagnosticKind::TooManyArguments,
                name,
                format!(
                    "too many {} given for '{name}', surplus will be ignored",
                    slot.noun()
                ),
            )),
            Adjustment::Padded { .. } => Some(Diagnostic::new(
                DiagnosticKind::NotEnoughArguments,
                name,
                format!(
                    "not enough {} given for '{name}', missing arguments will be empty",
                    slot.noun()
                ),
            )),
        }
    }
}

/// Result of enforcing one slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enforced {
    pub arguments: Vec<Node>,
    pub adjustment: Adjustment,
}

/// Reconcile `actual` with the `declared` arity of `slot`.
pub fn enforce(slot: Slot, mut actual: Vec<Node>, declared: Arity) -> Enforced {
    let adjustment = match declared {
        Arity::Variadic => Adjustment::Accepted,
        Arity::Exact(count) if actual.len() > count => Adjustment::Truncated {
            surplus: actual.split_off(count),
        },
        Arity::Exact(count)
            if actual.len() < count && !(slot == Slot::Optional && actual.is_empty()) =>
        {
            let missing = count - actual.len();
            actual.resize_with(count, Node::empty);
            Adjustment::Padded { missing }
        }
        Arity::Exact(_) => Adjustment::Accepted,
    };

    Enforced {
        arguments: actual,
        adjustment,
    }
}
