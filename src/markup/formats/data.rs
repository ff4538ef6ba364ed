//! JSON and YAML output of the node tree

use super::registry::{FormatError, Formatter};
use crate::markup::ast::Node;

/// Pretty-printed JSON via `serde_json`
pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn name(&self) -> &str {
        "json"
    }

    fn serialize(&self, nodes: &[Node]) -> Result<String, FormatError> {
        serde_json::to_string_pretty(nodes)
            .map_err(|err| FormatError::SerializationError(err.to_string()))
    }

    fn description(&self) -> &str {
        "Node tree as JSON"
    }
}

/// YAML via `serde_yaml`
pub struct YamlFormatter;

impl Formatter for YamlFormatter {
    fn name(&self) -> &str {
        "yaml"
    }

    fn serialize(&self, nodes: &[Node]) -> Result<String, FormatError> {
        serde_yaml::to_string(nodes).map_err(|err| FormatError::SerializationError(err.to_string()))
    }

    fn description(&self) -> &str {
        "Node tree as YAML"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::ast::Command;

    fn sample() -> Vec<Node> {
        vec![
            Node::text("see "),
            Command::new("link", vec!["url".into()], vec!["text".into()]).into(),
        ]
    }

    #[test]
    fn json_is_readable_back() {
        let json = JsonFormatter.serialize(&sample()).unwrap();
        let back: Vec<Node> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sample());

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[1]["command"]["name"], "link");
        assert_eq!(value[1]["command"]["optionals"][0]["text"], "url");
    }

    #[test]
    fn yaml_is_readable_back() {
        let yaml = YamlFormatter.serialize(&sample()).unwrap();
        assert!(yaml.contains("link"));
        let back: Vec<Node> = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back, sample());
    }
}
