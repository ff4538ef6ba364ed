//! Main module for markup library functionality

pub mod arity;
pub mod ast;
pub mod brackets;
pub mod config;
pub mod diagnostics;
pub mod formats;
pub mod parsing;
pub mod registry;
pub mod serializer;
pub mod syntax;
pub mod testing;

pub use arity::{Arity, Contract};
pub use ast::{Argument, Command, CommandBuilder, Node};
pub use diagnostics::{Diagnostic, DiagnosticKind, DiagnosticSink, Diagnostics, LogSink};
pub use parsing::{parse, Grammar, Parser};
pub use registry::{CommandKind, Registry};
pub use serializer::{render, render_all, Renderer};
pub use syntax::Syntax;
