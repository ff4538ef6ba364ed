//! The standard command kinds and symbol table
//!
//! | Kind           | Optional | Required |
//! |----------------|----------|----------|
//! | `bold`         | 0        | 1        |
//! | `symbol`       | 0        | 1        |
//! | `count`        | 1        | 3        |
//! | `link`         | 2        | 1        |
//! | `title`        | 2        | 1        |
//! | `divider`      | 1        | 2        |
//! | `editable`     | 2        | 6        |
//! | `overlayicon`  | 1        | any      |
//! | `table`        | 1        | any      |
//!
//! The comparison symbols (`\<`, `\<=`, `\>`, `\>=`) take no arguments.

use super::CommandKind;
use crate::markup::arity::{Arity, Contract};

const KINDS: [(&str, Contract); 13] = [
    ("bold", Contract::exact(0, 1)),
    ("symbol", Contract::exact(0, 1)),
    ("count", Contract::exact(1, 3)),
    ("link", Contract::exact(2, 1)),
    ("title", Contract::exact(2, 1)),
    ("divider", Contract::exact(1, 2)),
    ("editable", Contract::exact(2, 6)),
    ("overlayicon", Contract::new(Arity::Exact(1), Arity::Variadic)),
    ("table", Contract::new(Arity::Exact(1), Arity::Variadic)),
    ("less", Contract::exact(0, 0)),
    ("lessEqual", Contract::exact(0, 0)),
    ("greater", Contract::exact(0, 0)),
    ("greaterEqual", Contract::exact(0, 0)),
];

const SYMBOLS: [(&str, &str); 4] = [
    ("<", "Less"),
    ("<=", "LessEqual"),
    (">", "Greater"),
    (">=", "GreaterEqual"),
];

pub fn standard_kinds() -> Vec<CommandKind> {
    KINDS
        .iter()
        .map(|(name, contract)| CommandKind::new(*name, *contract))
        .collect()
}

/// Symbolic command names and their canonical keys.
pub fn standard_symbols() -> Vec<(&'static str, &'static str)> {
    SYMBOLS.to_vec()
}
