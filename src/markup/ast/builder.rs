use super::node::{Command, Node};
use crate::markup::arity::{enforce, Contract, Slot};
use crate::markup::diagnostics::DiagnosticSink;

/// Collects arguments for a command and checks them against its contract.
///
/// ```rust,ignore
/// let bold = Command::builder("bold", Contract::exact(0, 1))
///     .argument("some text")
///     .build(&mut diagnostics);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandBuilder {
    name: String,
    contract: Contract,
    optionals: Vec<Node>,
    arguments: Vec<Node>,
    location: Option<String>,
}

impl CommandBuilder {
    pub fn new(name: impl Into<String>, contract: Contract) -> Self {
        Self {
            name: name.into(),
            contract,
            optionals: Vec::new(),
            arguments: Vec::new(),
            location: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn contract(&self) -> Contract {
        self.contract
    }

    pub fn optional(mut self, node: impl Into<Node>) -> Self {
        self.optionals.push(node.into());
        self
    }

    pub fn optionals<I, N>(mut self, nodes: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<Node>,
    {
        self.optionals.extend(nodes.into_iter().map(Into::into));
        self
    }

    pub fn argument(mut self, node: impl Into<Node>) -> Self {
        self.arguments.push(node.into());
        self
    }

    pub fn arguments<I, N>(mut self, nodes: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<Node>,
    {
        self.arguments.extend(nodes.into_iter().map(Into::into));
        self
    }

    /// Source excerpt attached to any diagnostic the build reports.
    pub fn located_at(mut self, excerpt: impl Into<String>) -> Self {
        self.location = Some(excerpt.into());
        self
    }

    /// Enforce the contract on both argument lists and freeze the command.
    pub fn build(self, sink: &mut dyn DiagnosticSink) -> Command {
        let optionals = enforce(Slot::Optional, self.optionals, self.contract.optional);
        let arguments = enforce(Slot::Required, self.arguments, self.contract.required);

        let adjustments = [
            (Slot::Optional, &optionals.adjustment),
            (Slot::Required, &arguments.adjustment),
        ];
        for (slot, adjustment) in adjustments {
            if let Some(mut diagnostic) = adjustment.diagnostic(slot, &self.name) {
                diagnostic.location = self.location.clone();
                sink.report(diagnostic);
            }
        }

        Command::new(self.name, optionals.arguments, arguments.arguments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::arity::Arity;
    use crate::markup::diagnostics::{DiagnosticKind, Diagnostics};

    #[test]
    fn builds_matching_command_silently() {
        let mut diagnostics = Diagnostics::new();
        let command = CommandBuilder::new("name", Contract::exact(1, 2))
            .arguments(["first", "second"])
            .optional("optional")
            .build(&mut diagnostics);

        assert!(diagnostics.is_empty());
        assert_eq!(command.name(), "name");
        assert_eq!(command.optionals(), &[Node::text("optional")]);
        assert_eq!(command.arguments(), &[Node::text("first"), Node::text("second")]);
    }

    #[test]
    fn enforces_both_slots_independently() {
        let mut diagnostics = Diagnostics::new();
        let command = CommandBuilder::new("bold", Contract::exact(0, 1))
            .optional("command")
            .arguments(["a", "b"])
            .located_at("\\bold[command]{a}{b}")
            .build(&mut diagnostics);

        assert!(command.optionals().is_empty());
        assert_eq!(command.arguments(), &[Node::text("a")]);
        assert_eq!(diagnostics.count(DiagnosticKind::TooManyArguments), 2);
        assert!(diagnostics
            .iter()
            .all(|d| d.location.as_deref() == Some("\\bold[command]{a}{b}")));
    }

    #[test]
    fn pads_missing_required_arguments() {
        let mut diagnostics = Diagnostics::new();
        let command = CommandBuilder::new("count", Contract::exact(1, 3))
            .argument("5")
            .build(&mut diagnostics);

        assert_eq!(
            command.arguments(),
            &[Node::text("5"), Node::empty(), Node::empty()]
        );
        assert!(diagnostics.has(DiagnosticKind::NotEnoughArguments));
    }

    #[test]
    fn variadic_keeps_everything() {
        let mut diagnostics = Diagnostics::new();
        let command = CommandBuilder::new("table", Contract::new(Arity::Exact(1), Arity::Variadic))
            .arguments(["a", "b", "c", "d"])
            .build(&mut diagnostics);

        assert_eq!(command.arguments().len(), 4);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn nested_commands_as_arguments() {
        let mut diagnostics = Diagnostics::new();
        let inner = CommandBuilder::new("bold", Contract::exact(0, 1))
            .argument("command")
            .build(&mut diagnostics);
        let outer = CommandBuilder::new("divider", Contract::exact(1, 2))
            .arguments([Node::text("class"), inner.clone().into()])
            .build(&mut diagnostics);

        assert_eq!(outer.arguments()[1].as_command(), Some(&inner));
        assert!(diagnostics.is_empty());
    }
}
