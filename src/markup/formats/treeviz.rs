//! Treeviz formatter for parsed nodes
//!
//! One line per node, with the nesting drawn as box connectors, 2 columns per
//! level:
//!
//! <prefix><connector> <icon> <label> (label truncated to 30 characters)
//!
//! Example for `see \table[wide]{a \bold{b}}`:
//!
//! ```text
//! ⧉ 2 nodes
//! ├─ ◦ see
//! └─ ⌘ \table
//!   ├─ ◦ [wide]
//!   └─ ⊕ group
//!     ├─ ◦ a
//!     └─ ⌘ \bold
//!       └─ ◦ b
//! ```
//!
//! Icons
//!     Nodes: ⧉
//!     Text: ◦
//!     Command: ⌘
//!     Group: ⊕
//!
//! Optional arguments have their label wrapped in brackets.

use super::registry::{FormatError, Formatter};
use crate::markup::ast::{Command, Node};

const LABEL_WIDTH: usize = 30;

struct Snapshot {
    icon: &'static str,
    label: String,
    children: Vec<Snapshot>,
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let mut truncated = s.chars().take(max_chars).collect::<String>();
        truncated.push('…');
        truncated
    } else {
        s.to_string()
    }
}

fn snapshot(node: &Node, optional: bool) -> Snapshot {
    let mut snapshot = match node {
        Node::Text(text) => Snapshot {
            icon: "◦",
            label: text.replace('\n', "↵"),
            children: Vec::new(),
        },
        Node::Command(command) => command_snapshot(command),
    };
    if optional {
        snapshot.label = format!("[{}]", snapshot.label);
    }
    snapshot
}

fn command_snapshot(command: &Command) -> Snapshot {
    let (icon, label) = if command.is_group() {
        ("⊕", "group".to_string())
    } else {
        ("⌘", format!("\\{}", command.name()))
    };

    let children = command
        .optionals()
        .iter()
        .map(|node| snapshot(node, true))
        .chain(command.arguments().iter().map(|node| snapshot(node, false)))
        .collect();

    Snapshot {
        icon,
        label,
        children,
    }
}

fn format_snapshot(output: &mut String, snapshot: &Snapshot, prefix: &str, is_last: bool) {
    let connector = if is_last { "└─" } else { "├─" };
    output.push_str(&format!(
        "{prefix}{connector} {} {}\n",
        snapshot.icon,
        truncate(&snapshot.label, LABEL_WIDTH).trim_end()
    ));

    let child_prefix = format!("{prefix}{}", if is_last { "  " } else { "│ " });
    format_children(output, &snapshot.children, &child_prefix);
}

fn format_children(output: &mut String, children: &[Snapshot], prefix: &str) {
    for (i, child) in children.iter().enumerate() {
        format_snapshot(output, child, prefix, i + 1 == children.len());
    }
}

pub fn to_treeviz_str(nodes: &[Node]) -> String {
    let children: Vec<_> = nodes.iter().map(|node| snapshot(node, false)).collect();
    let noun = if nodes.len() == 1 { "node" } else { "nodes" };

    let mut output = format!("⧉ {} {noun}\n", nodes.len());
    format_children(&mut output, &children, "");
    output
}

/// Formatter implementation for treeviz format
pub struct TreevizFormatter;

impl Formatter for TreevizFormatter {
    fn name(&self) -> &str {
        "treeviz"
    }

    fn serialize(&self, nodes: &[Node]) -> Result<String, FormatError> {
        Ok(to_treeviz_str(nodes))
    }

    fn description(&self) -> &str {
        "Visual tree representation with indentation and Unicode icons"
    }
}
