//! Fluent assertion API for nodes

use crate::markup::ast::{Command, Node};

/// Create an assertion builder for a node sequence
pub fn assert_nodes(nodes: &[Node]) -> NodesAssertion<'_> {
    NodesAssertion {
        nodes,
        context: "nodes".to_string(),
    }
}

fn describe(node: &Node) -> String {
    match node {
        Node::Text(text) => format!("text {text:?}"),
        Node::Command(command) if command.is_group() => "group".to_string(),
        Node::Command(command) => format!("command '{}'", command.name()),
    }
}

fn expect_text<'n>(node: &'n Node, context: &str) -> &'n str {
    node.as_text()
        .unwrap_or_else(|| panic!("{context}: Expected text, found {}", describe(node)))
}

fn expect_command<'n>(node: &'n Node, context: &str) -> &'n Command {
    node.as_command()
        .unwrap_or_else(|| panic!("{context}: Expected command, found {}", describe(node)))
}

fn nth<'n>(nodes: &'n [Node], index: usize, context: &str) -> &'n Node {
    nodes.get(index).unwrap_or_else(|| {
        panic!(
            "{context}: Index {index} out of bounds ({} nodes)",
            nodes.len()
        )
    })
}

pub struct NodesAssertion<'a> {
    nodes: &'a [Node],
    context: String,
}

impl<'a> NodesAssertion<'a> {
    pub fn count(self, expected: usize) -> Self {
        assert_eq!(
            self.nodes.len(),
            expected,
            "{}: Expected {} nodes, found {}",
            self.context,
            expected,
            self.nodes.len()
        );
        self
    }

    /// Assert the node at `index` is literal text equal to `expected`
    pub fn text(self, index: usize, expected: &str) -> Self {
        let context = format!("{}[{index}]", self.context);
        let actual = expect_text(nth(self.nodes, index, &self.context), &context);
        assert_eq!(actual, expected, "{context}: text mismatch");
        self
    }

    /// Assert the node at `index` is a command and run `check` on it
    pub fn command<F>(self, index: usize, check: F) -> Self
    where
        F: FnOnce(&CommandAssertion<'a>),
    {
        let context = format!("{}[{index}]", self.context);
        let command = expect_command(nth(self.nodes, index, &self.context), &context);
        check(&CommandAssertion { command, context });
        self
    }
}

pub struct CommandAssertion<'a> {
    command: &'a Command,
    context: String,
}

impl<'a> CommandAssertion<'a> {
    pub fn name(&self, expected: &str) -> &Self {
        assert_eq!(
            self.command.name(),
            expected,
            "{}: Expected command '{}', found '{}'",
            self.context,
            expected,
            self.command.name()
        );
        self
    }

    /// Assert this is an anonymous group
    pub fn group(&self) -> &Self {
        assert!(
            self.command.is_group(),
            "{}: Expected group, found command '{}'",
            self.context,
            self.command.name()
        );
        self
    }

    pub fn optional_count(&self, expected: usize) -> &Self {
        let actual = self.command.optionals().len();
        assert_eq!(
            actual, expected,
            "{}: Expected {} optional arguments, found {}",
            self.context, expected, actual
        );
        self
    }

    pub fn argument_count(&self, expected: usize) -> &Self {
        let actual = self.command.arguments().len();
        assert_eq!(
            actual, expected,
            "{}: Expected {} arguments, found {}",
            self.context, expected, actual
        );
        self
    }

    pub fn optional_text(&self, index: usize, expected: &str) -> &Self {
        let context = format!("{}.optionals", self.context);
        let node = nth(self.command.optionals(), index, &context);
        let context = format!("{context}[{index}]");
        assert_eq!(expect_text(node, &context), expected, "{context}: text mismatch");
        self
    }

    pub fn argument_text(&self, index: usize, expected: &str) -> &Self {
        let context = format!("{}.arguments", self.context);
        let node = nth(self.command.arguments(), index, &context);
        let context = format!("{context}[{index}]");
        assert_eq!(expect_text(node, &context), expected, "{context}: text mismatch");
        self
    }

    /// Assert the optional argument at `index` is a command and check it
    pub fn optional<F>(&self, index: usize, check: F) -> &Self
    where
        F: FnOnce(&CommandAssertion<'a>),
    {
        let context = format!("{}.optionals", self.context);
        let node = nth(self.command.optionals(), index, &context);
        let context = format!("{context}[{index}]");
        let command = expect_command(node, &context);
        check(&CommandAssertion { command, context });
        self
    }

    /// Assert the required argument at `index` is a command and check it
    pub fn argument<F>(&self, index: usize, check: F) -> &Self
    where
        F: FnOnce(&CommandAssertion<'a>),
    {
        let context = format!("{}.arguments", self.context);
        let node = nth(self.command.arguments(), index, &context);
        let context = format!("{context}[{index}]");
        let command = expect_command(node, &context);
        check(&CommandAssertion { command, context });
        self
    }
}
