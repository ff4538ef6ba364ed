//! Testing utilities for parsed nodes
//!
//!     Parser tests check structure, not strings. Comparing whole node vectors with
//!     `assert_eq!` works for one-liners but becomes unreadable as soon as arguments nest,
//!     and a failing comparison dumps the entire tree without saying where it differs.
//!
//!     Use the fluent assertions instead. Every assertion carries a context path
//!     (`nodes[1].arguments[0]`), so a failure names the exact node:
//!
//!     ```rust,ignore
//!     use dma_markup::markup::testing::{assert_nodes, parse_collecting};
//!
//!     let (nodes, diagnostics) = parse_collecting("see \\table[wide]{a \\bold{b}}");
//!     assert!(diagnostics.is_empty());
//!     assert_nodes(&nodes)
//!         .count(2)
//!         .text(0, "see ")
//!         .command(1, |table| {
//!             table.name("table").optional_text(0, "wide");
//!             table.argument(0, |group| {
//!                 group.group().argument_text(0, "a ");
//!             });
//!         });
//!     ```
//!
//!     [`parse_collecting`] parses with the standard registry and returns the diagnostics
//!     next to the nodes, which is what most tests want to look at together.

mod assertions;

pub use assertions::{assert_nodes, CommandAssertion, NodesAssertion};

use super::ast::Node;
use super::diagnostics::Diagnostics;
use super::parsing::parse;

/// Parse `text` with the standard registry, collecting all diagnostics.
pub fn parse_collecting(text: &str) -> (Vec<Node>, Diagnostics) {
    let mut diagnostics = Diagnostics::new();
    let nodes = parse(text, &mut diagnostics);
    (nodes, diagnostics)
}
