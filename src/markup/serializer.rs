//! Rendering nodes back to markup text
//!
//! Literal text is written as is, without re-escaping: text that must contain
//! delimiters literally has to carry its escapes already, as parsed text does.
//! A command is written as the introducer, its name, every optional argument in
//! optional delimiters and every required argument in required delimiters. A
//! command without any argument gets a trailing space so that its name cannot
//! merge with the text that follows. Anonymous groups render as the
//! concatenation of their arguments.

use super::ast::{Command, Node};
use super::syntax::Syntax;
use once_cell::sync::Lazy;
use std::fmt;

static DEFAULT_SYNTAX: Lazy<Syntax> = Lazy::new(Syntax::default);

/// Render a single node with the default syntax.
pub fn render(node: &Node) -> String {
    Renderer::default().render(node)
}

/// Render a sequence of nodes with the default syntax.
pub fn render_all(nodes: &[Node]) -> String {
    Renderer::default().render_all(nodes)
}

/// Writes nodes using the characters of a [`Syntax`].
#[derive(Debug, Clone, Copy)]
pub struct Renderer<'s> {
    syntax: &'s Syntax,
}

impl<'s> Renderer<'s> {
    pub fn new(syntax: &'s Syntax) -> Self {
        Self { syntax }
    }

    pub fn render(&self, node: &Node) -> String {
        let mut out = String::new();
        self.write_node(&mut out, node);
        out
    }

    pub fn render_command(&self, command: &Command) -> String {
        let mut out = String::new();
        self.write_command(&mut out, command);
        out
    }

    pub fn render_all(&self, nodes: &[Node]) -> String {
        let mut out = String::new();
        for node in nodes {
            self.write_node(&mut out, node);
        }
        out
    }

    fn write_node(&self, out: &mut String, node: &Node) {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Command(command) => self.write_command(out, command),
        }
    }

    fn write_command(&self, out: &mut String, command: &Command) {
        if command.is_group() {
            for argument in command.arguments() {
                self.write_node(out, argument);
            }
            return;
        }

        out.push(self.syntax.command);
        out.push_str(command.name());

        for optional in command.optionals() {
            out.push(self.syntax.optional_start);
            self.write_node(out, optional);
            out.push(self.syntax.optional_end);
        }
        for argument in command.arguments() {
            out.push(self.syntax.argument_start);
            self.write_node(out, argument);
            out.push(self.syntax.argument_end);
        }

        if command.optionals().is_empty() && command.arguments().is_empty() {
            out.push(' ');
        }
    }
}

impl Default for Renderer<'static> {
    fn default() -> Self {
        Self::new(&DEFAULT_SYNTAX)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render(self))
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&Renderer::default().render_command(self))
    }
}
