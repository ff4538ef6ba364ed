use super::builder::CommandBuilder;
use crate::markup::arity::Contract;
use serde::{Deserialize, Serialize};

/// Literal text or a command.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Node {
    /// Text without command semantics. Escaped delimiters keep their escape.
    Text(String),
    Command(Command),
}

/// Arguments are nodes: literal text or a nested command.
pub type Argument = Node;

impl Node {
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text(text.into())
    }

    /// The empty literal, used for missing arguments.
    pub fn empty() -> Self {
        Node::Text(String::new())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Node::Text(text) => Some(text),
            Node::Command(_) => None,
        }
    }

    pub fn as_command(&self) -> Option<&Command> {
        match self {
            Node::Command(command) => Some(command),
            Node::Text(_) => None,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Node::Text(_))
    }

    /// Returns `true` if the node carries no text at all.
    pub fn is_empty(&self) -> bool {
        match self {
            Node::Text(text) => text.is_empty(),
            Node::Command(command) => command.is_empty(),
        }
    }
}

impl From<&str> for Node {
    fn from(text: &str) -> Self {
        Node::Text(text.to_string())
    }
}

impl From<String> for Node {
    fn from(text: String) -> Self {
        Node::Text(text)
    }
}

impl From<Command> for Node {
    fn from(command: Command) -> Self {
        Node::Command(command)
    }
}

/// A named command with its optional and required arguments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Command {
    name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    optionals: Vec<Node>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    arguments: Vec<Node>,
}

impl Command {
    /// Create a command with exactly the given arguments, without arity checks.
    pub fn new(name: impl Into<String>, optionals: Vec<Node>, arguments: Vec<Node>) -> Self {
        Self {
            name: name.into(),
            optionals,
            arguments,
        }
    }

    /// Anonymous group holding a mixed sequence of nodes.
    pub fn group(nodes: Vec<Node>) -> Self {
        Self::new(String::new(), Vec::new(), nodes)
    }

    /// Start an arity-checked command.
    pub fn builder(name: impl Into<String>, contract: Contract) -> CommandBuilder {
        CommandBuilder::new(name, contract)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn optionals(&self) -> &[Node] {
        &self.optionals
    }

    pub fn arguments(&self) -> &[Node] {
        &self.arguments
    }

    pub fn is_group(&self) -> bool {
        self.name.is_empty()
    }

    /// Returns `true` if no argument, optional or required, carries text.
    pub fn is_empty(&self) -> bool {
        self.optionals.iter().all(Node::is_empty) && self.arguments.iter().all(Node::is_empty)
    }

    pub fn into_parts(self) -> (String, Vec<Node>, Vec<Node>) {
        (self.name, self.optionals, self.arguments)
    }
}
