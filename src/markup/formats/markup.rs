use super::registry::{FormatError, Formatter};
use crate::markup::ast::Node;
use crate::markup::serializer::Renderer;
use crate::markup::syntax::Syntax;

/// Markup text, rendered with the given syntax
#[derive(Debug, Clone, Default)]
pub struct MarkupFormatter {
    syntax: Syntax,
}

impl MarkupFormatter {
    pub fn new(syntax: Syntax) -> Self {
        Self { syntax }
    }
}

impl Formatter for MarkupFormatter {
    fn name(&self) -> &str {
        "markup"
    }

    fn serialize(&self, nodes: &[Node]) -> Result<String, FormatError> {
        Ok(Renderer::new(&self.syntax).render_all(nodes))
    }

    fn description(&self) -> &str {
        "Nodes rendered back to markup text"
    }
}
