//! # dma-markup
//!
//! Parser and serializer for the DMA command markup: escaped, bracket-delimited
//! text such as `some \bold{text} with \link[url]{a link}`.
//!
//! The markup is turned into a flat sequence of [`Node`](markup::ast::Node)s,
//! each either literal text or a named command with optional (`[..]`) and
//! required (`{..}`) arguments. Argument counts are reconciled against the
//! contract the command kind declares in a [`Registry`](markup::registry::Registry);
//! every anomaly is reported as a diagnostic instead of failing the parse.
//!
//! File Layout
//!
//! src/markup
//!   ├── syntax        Markup characters and their validation
//!   ├── brackets      Top-level bracket group marking
//!   ├── ast           Command tree and the command builder
//!   ├── arity         Arity contracts and their enforcement
//!   ├── registry      Command kinds by canonical name
//!   ├── parsing       The recursive-descent parser
//!   ├── serializer    Tree back to markup text
//!   ├── diagnostics   Non-fatal findings and their sinks
//!   ├── formats       Output formats (markup, json, yaml, treeviz)
//!   ├── config        Layered configuration loading
//!   └── testing       Fluent assertions for tests
//!
//! For testing guidelines, see the [testing module](markup::testing).

pub mod markup;
