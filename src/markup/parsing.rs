//! Parsing markup text into nodes
//!
//!     The parser turns markup text into a flat, ordered sequence of [`Node`]s: literal
//!     text fragments and commands. Commands carry their argument groups, parsed
//!     recursively.
//!
//! Parsing One Level
//!
//!     1. Marking: the [`Grammar`] marks the top-level required groups and then the
//!        top-level optional groups, so both kinds can be extracted with plain regexes.
//!        See [brackets](crate::markup::brackets).
//!     2. Scanning: find the next command introducer that is not escaped and is
//!        followed by a name character. Everything before it is a literal fragment.
//!     3. Name: a maximal run of alphanumerics, or a maximal run of symbol characters.
//!     4. Groups: any number of optional groups, then any number of required groups,
//!        each possibly preceded by whitespace.
//!     5. Arguments: the unmarked contents of every group are parsed again, one level
//!        deeper. A single resulting node is used as is, several are wrapped in an
//!        anonymous group command, none become the empty literal.
//!     6. Building: the name is resolved in the [`Registry`] and the builder enforces
//!        the declared arity.
//!     7. A command without any group swallows one following whitespace character.
//!
//!     Each nesting level is marked from scratch on the unmarked argument text, which
//!     keeps marker tags of one level out of the next.
//!
//! Diagnostics
//!
//!     Parsing never fails. Unknown names, failing constructors and arity corrections
//!     are reported to the caller's sink with an excerpt of the surrounding source.
//!     Arguments nested deeper than the parser's depth limit are kept as literal text.

mod grammar;

pub use grammar::Grammar;

use super::ast::{Command, Node};
use super::diagnostics::{Diagnostic, DiagnosticKind, DiagnosticSink, Diagnostics};
use super::registry::Registry;
use super::syntax::{
    MARK_ARGUMENT_END, MARK_ARGUMENT_START, MARK_OPTIONAL_END, MARK_OPTIONAL_START,
};
use std::sync::Arc;

/// Nesting depth of arguments parsed before the rest is kept as text.
pub const DEFAULT_MAX_DEPTH: usize = 64;

const EXCERPT_BEFORE: usize = 15;
const EXCERPT_AFTER: usize = 35;

/// A marker character followed by its `<0>` tag.
const TAG_WIDTH: usize = 4;

/// Parse `text` with the standard registry and syntax.
pub fn parse(text: &str, sink: &mut dyn DiagnosticSink) -> Vec<Node> {
    Parser::new(Registry::standard()).parse(text, sink)
}

/// Markup parser bound to a registry and a grammar.
#[derive(Debug, Clone)]
pub struct Parser<'r> {
    registry: &'r Registry,
    grammar: Arc<Grammar>,
    max_depth: usize,
}

impl<'r> Parser<'r> {
    /// A parser for the default syntax.
    pub fn new(registry: &'r Registry) -> Self {
        Self::with_grammar(registry, Grammar::standard())
    }

    pub fn with_grammar(registry: &'r Registry, grammar: Arc<Grammar>) -> Self {
        Self {
            registry,
            grammar,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    /// Parse `text` into literal fragments and commands.
    pub fn parse(&self, text: &str, sink: &mut dyn DiagnosticSink) -> Vec<Node> {
        self.parse_level(text, 0, sink)
    }

    fn parse_level(&self, text: &str, depth: usize, sink: &mut dyn DiagnosticSink) -> Vec<Node> {
        let mut nodes = Vec::new();
        if text.is_empty() {
            return nodes;
        }

        log::trace!("parsing {} bytes at depth {depth}", text.len());

        let grammar = &*self.grammar;
        let marked = grammar.mark(text);
        let mut start = 0;

        while start < marked.len() {
            let Some(pos) = self.find_command(&marked, start) else {
                nodes.push(Node::text(grammar.unmark(&marked[start..])));
                break;
            };

            if pos > start {
                nodes.push(Node::text(grammar.unmark(&marked[start..pos])));
            }

            let name_start = pos + grammar.syntax().command.len_utf8();
            let mut end = self.name_end(&marked, name_start);
            let name = &marked[name_start..end];

            let mut optionals = Vec::new();
            while let Some((contents, consumed)) = grammar.optional_group(&marked[end..]) {
                optionals.push(contents);
                end += consumed;
            }
            let mut arguments = Vec::new();
            while let Some((contents, consumed)) = grammar.required_group(&marked[end..]) {
                arguments.push(contents);
                end += consumed;
            }

            let bare = optionals.is_empty() && arguments.is_empty();

            let mut pending = Diagnostics::new();
            let optionals = self.parse_arguments(name, &optionals, depth, sink, &mut pending);
            let arguments = self.parse_arguments(name, &arguments, depth, sink, &mut pending);

            let command = self
                .registry
                .resolve(name, &mut pending)
                .optionals(optionals)
                .arguments(arguments)
                .build(&mut pending);

            if !pending.is_empty() {
                let excerpt = self.excerpt(&marked, pos);
                for diagnostic in pending.into_vec() {
                    sink.report(diagnostic.with_location(excerpt.clone()));
                }
            }

            nodes.push(Node::Command(command));

            if bare {
                if let Some(ch) = marked[end..].chars().next().filter(|c| c.is_whitespace()) {
                    end += ch.len_utf8();
                }
            }
            start = end;
        }

        nodes
    }

    /// Byte offset of the next real command introducer at or after `from`.
    fn find_command(&self, marked: &str, from: usize) -> Option<usize> {
        let syntax = self.grammar.syntax();
        let mut previous = marked[..from].chars().next_back();
        let mut chars = marked[from..].char_indices().peekable();

        while let Some((offset, ch)) = chars.next() {
            let next = chars.peek().map(|(_, next)| *next);
            if ch == syntax.command
                && previous != Some(syntax.escape)
                && !(syntax.escape == syntax.command && next == Some(syntax.command))
                && next.is_some_and(|next| syntax.is_name_start(next))
            {
                return Some(from + offset);
            }
            previous = Some(ch);
        }

        None
    }

    /// End of the command name starting at `start`.
    fn name_end(&self, marked: &str, start: usize) -> usize {
        let syntax = self.grammar.syntax();
        let rest = &marked[start..];
        let alphanumeric = rest.chars().next().is_some_and(char::is_alphanumeric);

        let length = rest
            .char_indices()
            .find(|(_, ch)| {
                if alphanumeric {
                    !ch.is_alphanumeric()
                } else {
                    !syntax.is_symbol(*ch)
                }
            })
            .map_or(rest.len(), |(offset, _)| offset);

        start + length
    }

    fn parse_arguments(
        &self,
        name: &str,
        groups: &[&str],
        depth: usize,
        sink: &mut dyn DiagnosticSink,
        pending: &mut Diagnostics,
    ) -> Vec<Node> {
        groups
            .iter()
            .map(|contents| {
                let source = self.grammar.unmark(contents);

                if depth >= self.max_depth {
                    pending.report(Diagnostic::new(
                        DiagnosticKind::NestingTooDeep,
                        name,
                        format!(
                            "arguments of '{name}' nested deeper than {} levels are kept as text",
                            self.max_depth
                        ),
                    ));
                    return Node::text(source);
                }

                let mut parsed = self.parse_level(&source, depth + 1, &mut *sink);
                match parsed.len() {
                    0 => Node::empty(),
                    1 => parsed.remove(0),
                    _ => Node::Command(Command::group(parsed)),
                }
            })
            .collect()
    }

    /// Unmarked source around the command starting at `pos`.
    fn excerpt(&self, marked: &str, pos: usize) -> String {
        let (lo, hi) = excerpt_window(marked, pos);
        let before = self.grammar.unmark(&marked[lo..pos]);
        let after = self.grammar.unmark(&marked[pos..hi]);

        let skip = before.chars().count().saturating_sub(EXCERPT_BEFORE);
        before
            .chars()
            .skip(skip)
            .chain(after.chars().take(EXCERPT_AFTER))
            .collect()
    }
}

/// Byte range of `marked` around `pos` that holds at least the excerpt's
/// source characters and never splits a marker from its tag.
fn excerpt_window(marked: &str, pos: usize) -> (usize, usize) {
    let lo = marked[..pos]
        .char_indices()
        .rev()
        .nth(EXCERPT_BEFORE * TAG_WIDTH - 1)
        .map_or(0, |(offset, _)| offset);
    let hi = marked[pos..]
        .char_indices()
        .nth(EXCERPT_AFTER * TAG_WIDTH)
        .map_or(marked.len(), |(offset, _)| pos + offset);

    (
        split_tag(marked, lo).unwrap_or(lo),
        split_tag(marked, hi).map_or(hi, |tag| tag + TAG_WIDTH),
    )
}

/// Start of the marker tag that `boundary` falls inside of, if any.
fn split_tag(marked: &str, boundary: usize) -> Option<usize> {
    let bytes = marked.as_bytes();
    (boundary.saturating_sub(TAG_WIDTH - 1)..boundary)
        .find(|&at| is_marker(bytes[at]) && bytes[at + 1..].starts_with(b"<0>"))
}

fn is_marker(byte: u8) -> bool {
    [
        MARK_ARGUMENT_START,
        MARK_ARGUMENT_END,
        MARK_OPTIONAL_START,
        MARK_OPTIONAL_END,
    ]
    .contains(&char::from(byte))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::arity::Contract;
    use crate::markup::registry::CommandKind;
    use crate::markup::testing::{assert_nodes, parse_collecting};

    #[test]
    fn empty_text() {
        let (nodes, diagnostics) = parse_collecting("");
        assert!(nodes.is_empty());
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn plain_text() {
        let (nodes, diagnostics) = parse_collecting("just some text");
        assert_eq!(nodes, vec![Node::text("just some text")]);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn simple_command() {
        let (nodes, diagnostics) = parse_collecting("\\bold{some test}");
        assert!(diagnostics.is_empty());
        assert_nodes(&nodes).count(1).command(0, |bold| {
            bold.name("bold").optional_count(0).argument_count(1);
            bold.argument_text(0, "some test");
        });
    }

    #[test]
    fn text_around_commands() {
        let (nodes, _) = parse_collecting("a \\bold{b} c");
        assert_nodes(&nodes)
            .count(3)
            .text(0, "a ")
            .command(1, |bold| {
                bold.name("bold").argument_text(0, "b");
            })
            .text(2, " c");
    }

    #[test]
    fn adjacent_commands_have_no_empty_fragment() {
        let (nodes, _) = parse_collecting("\\bold{a}\\bold{b}");
        assert_nodes(&nodes)
            .count(2)
            .command(0, |c| {
                c.argument_text(0, "a");
            })
            .command(1, |c| {
                c.argument_text(0, "b");
            });
    }

    #[test]
    fn surplus_arguments_are_dropped() {
        let (nodes, diagnostics) = parse_collecting("\\bold{some test}{some other}");
        assert_nodes(&nodes).count(1).command(0, |bold| {
            bold.argument_count(1).argument_text(0, "some test");
        });
        assert_eq!(
            diagnostics.messages(),
            vec![
                "too many arguments given for 'bold', surplus will be ignored \
                 (at \\bold{some test}{some other}...)"
            ]
        );
    }

    #[test]
    fn missing_arguments_are_padded() {
        let (nodes, diagnostics) = parse_collecting("\\bold command");
        assert_nodes(&nodes)
            .count(2)
            .command(0, |bold| {
                bold.argument_count(1).argument_text(0, "");
            })
            .text(1, "command");
        assert_eq!(diagnostics.count(DiagnosticKind::NotEnoughArguments), 1);
    }

    #[test]
    fn surplus_optionals_are_dropped() {
        let (nodes, diagnostics) = parse_collecting("\\bold[command]{test}");
        assert_nodes(&nodes).count(1).command(0, |bold| {
            bold.optional_count(0).argument_count(1).argument_text(0, "test");
        });
        assert!(diagnostics.has(DiagnosticKind::TooManyArguments));
        assert!(diagnostics.messages()[0].starts_with("too many optional arguments"));
    }

    #[test]
    fn nested_command_in_group() {
        let (nodes, diagnostics) = parse_collecting("\\bold{a\\bold{b}}");
        assert!(diagnostics.is_empty());
        assert_nodes(&nodes).count(1).command(0, |bold| {
            bold.name("bold").argument(0, |group| {
                group.group().argument_count(2).argument_text(0, "a");
                group.argument(1, |inner| {
                    inner.name("bold").argument_text(0, "b");
                });
            });
        });
    }

    #[test]
    fn single_nested_command_is_used_directly() {
        let (nodes, _) = parse_collecting("\\bold{\\bold{b}}");
        assert_nodes(&nodes).command(0, |outer| {
            outer.argument(0, |inner| {
                inner.name("bold").argument_text(0, "b");
            });
        });
    }

    #[test]
    fn optional_and_required_groups() {
        let (nodes, diagnostics) = parse_collecting("\\link[url][class]{text}");
        assert!(diagnostics.is_empty());
        assert_nodes(&nodes).count(1).command(0, |link| {
            link.name("link")
                .optional_count(2)
                .optional_text(0, "url")
                .optional_text(1, "class")
                .argument_text(0, "text");
        });
    }

    #[test]
    fn missing_optionals_are_accepted() {
        let (nodes, diagnostics) = parse_collecting("\\link{text}");
        assert!(diagnostics.is_empty());
        assert_nodes(&nodes).command(0, |link| {
            link.optional_count(0).argument_count(1);
        });
    }

    #[test]
    fn partial_optionals_are_padded() {
        let (nodes, diagnostics) = parse_collecting("\\link[a]{text}");
        assert_nodes(&nodes).count(1).command(0, |link| {
            link.optional_count(2)
                .optional_text(0, "a")
                .optional_text(1, "")
                .argument_text(0, "text");
        });
        assert_eq!(
            diagnostics.messages(),
            vec![
                "not enough optional arguments given for 'link', missing arguments will be \
                 empty (at \\link[a]{text}...)"
            ]
        );
        assert_eq!(crate::markup::render_all(&nodes), "\\link[a][]{text}");
    }

    #[test]
    fn whitespace_between_groups() {
        let (nodes, diagnostics) = parse_collecting("\\link[a]  [b] {c} rest");
        assert!(diagnostics.is_empty());
        assert_nodes(&nodes)
            .count(2)
            .command(0, |link| {
                link.optional_text(0, "a")
                    .optional_text(1, "b")
                    .argument_text(0, "c");
            })
            .text(1, " rest");
    }

    #[test]
    fn empty_group_is_empty_text() {
        let (nodes, _) = parse_collecting("\\bold{}");
        assert_nodes(&nodes).command(0, |bold| {
            bold.argument_count(1).argument_text(0, "");
        });
    }

    #[test]
    fn escaped_delimiters_stay_in_text() {
        let (nodes, diagnostics) = parse_collecting(
            "some \\baseCommand{with}{multiple \\{complicated\\} arguments}and some {arguments} to parse",
        );
        assert_eq!(diagnostics.count(DiagnosticKind::UnknownCommand), 1);
        assert_nodes(&nodes)
            .count(3)
            .text(0, "some ")
            .command(1, |command| {
                command
                    .name("baseCommand")
                    .argument_count(2)
                    .argument_text(0, "with")
                    .argument_text(1, "multiple \\{complicated\\} arguments");
            })
            .text(2, "and some {arguments} to parse");
    }

    #[test]
    fn escaped_introducer_is_literal() {
        let (nodes, diagnostics) = parse_collecting("\\\\some \\\\pseudo");
        assert_eq!(nodes, vec![Node::text("\\\\some \\\\pseudo")]);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn trailing_introducer_is_literal() {
        let (nodes, _) = parse_collecting("ends with \\");
        assert_eq!(nodes, vec![Node::text("ends with \\")]);
    }

    #[test]
    fn unknown_command_is_variadic() {
        let (nodes, diagnostics) = parse_collecting("\\starting[a]{b}{c}{d}");
        assert_nodes(&nodes).command(0, |command| {
            command
                .name("starting")
                .optional_count(1)
                .argument_count(3);
        });
        assert_eq!(
            diagnostics.messages(),
            vec!["could not resolve command 'starting' [Starting] (at \\starting[a]{b}{c}{d}...)"]
        );
    }

    #[test]
    fn symbolic_command_swallows_one_space() {
        let (nodes, diagnostics) = parse_collecting("a \\<=  b");
        assert!(diagnostics.is_empty());
        assert_nodes(&nodes)
            .count(3)
            .text(0, "a ")
            .command(1, |less| {
                less.name("<=").optional_count(0).argument_count(0);
            })
            .text(2, " b");
    }

    #[test]
    fn unbalanced_brackets_are_text() {
        let (nodes, _) = parse_collecting("\\bold{a{b}");
        assert_nodes(&nodes)
            .count(2)
            .command(0, |bold| {
                bold.argument_text(0, "");
            })
            .text(1, "{a{b}");
    }

    #[test]
    fn unbalanced_inner_bracket_after_group() {
        let (nodes, _) = parse_collecting("\\bold{a}{");
        assert_nodes(&nodes)
            .count(2)
            .command(0, |bold| {
                bold.argument_text(0, "a");
            })
            .text(1, "{");
    }

    #[test]
    fn multiple_levels_of_nesting() {
        let (nodes, diagnostics) =
            parse_collecting("\\table[x]{\\bold{a \\bold{b \\bold{c}}}}{[d]}");
        assert!(diagnostics.is_empty());
        assert_nodes(&nodes).count(1).command(0, |table| {
            table.name("table").optional_text(0, "x").argument_count(2);
            table.argument(0, |outer| {
                outer.name("bold").argument(0, |group| {
                    group.group().argument_text(0, "a ");
                    group.argument(1, |middle| {
                        middle.name("bold").argument(0, |inner_group| {
                            inner_group.group().argument_text(0, "b ");
                        });
                    });
                });
            });
            table.argument_text(1, "[d]");
        });
    }

    #[test]
    fn excerpt_is_clipped() {
        let text = format!("{}\\bold{{a}}{{b}}{}", "x".repeat(20), "y".repeat(40));
        let (_, diagnostics) = parse_collecting(&text);
        let location = diagnostics.iter().next().unwrap().location.clone().unwrap();
        assert_eq!(
            location,
            format!("{}\\bold{{a}}{{b}}{}", "x".repeat(15), "y".repeat(24))
        );
    }

    #[test]
    fn depth_limit_keeps_text() {
        let registry = Registry::standard();
        let parser = Parser::new(registry).max_depth(1);
        let mut diagnostics = Diagnostics::new();
        let nodes = parser.parse("\\bold{\\bold{\\bold{x}}}", &mut diagnostics);

        assert_nodes(&nodes).command(0, |outer| {
            outer.argument(0, |inner| {
                inner.name("bold").argument_text(0, "\\bold{x}");
            });
        });
        assert_eq!(diagnostics.count(DiagnosticKind::NestingTooDeep), 1);
    }

    #[test]
    fn depth_limit_diagnostic_is_located() {
        let registry = Registry::standard();
        let parser = Parser::new(registry).max_depth(1);
        let mut diagnostics = Diagnostics::new();
        parser.parse("see \\bold{\\bold{\\bold{x}}}", &mut diagnostics);

        let deep = diagnostics
            .iter()
            .find(|d| d.kind == DiagnosticKind::NestingTooDeep)
            .unwrap();
        assert_eq!(deep.location.as_deref(), Some("\\bold{\\bold{x}}"));
    }

    #[test]
    fn excerpt_never_splits_markers() {
        let text = format!(
            "{}\\bold{{a}}{{b}}{}",
            "{x}".repeat(20),
            "[y]".repeat(40)
        );
        let (_, diagnostics) = parse_collecting(&text);
        let location = diagnostics.iter().next().unwrap().location.clone().unwrap();
        assert_eq!(
            location,
            format!("{}\\bold{{a}}{{b}}{}", "{x}".repeat(5), "[y]".repeat(8))
        );
    }

    #[test]
    fn many_diagnostics_stay_linear() {
        let count = 20_000;
        let text = "\\foo x ".repeat(count);
        let started = std::time::Instant::now();
        let (nodes, diagnostics) = parse_collecting(&text);

        assert!(started.elapsed() < std::time::Duration::from_secs(10));
        assert_eq!(nodes.len(), count * 2);
        assert_eq!(diagnostics.count(DiagnosticKind::UnknownCommand), count);
        let last = diagnostics.iter().last().unwrap();
        assert_eq!(last.location.as_deref(), Some(" \\foo x \\foo x \\foo x "));
    }

    #[test]
    fn deeply_nested_braces_stay_linear() {
        let depth = 8_000;
        let text = format!("{}x{}", "{".repeat(depth), "}".repeat(depth));
        let started = std::time::Instant::now();
        let (nodes, diagnostics) = parse_collecting(&text);

        assert!(started.elapsed() < std::time::Duration::from_secs(10));
        assert!(diagnostics.is_empty());
        assert_eq!(nodes, vec![Node::text(text)]);
    }

    #[test]
    fn deep_nesting_does_not_overflow() {
        let depth = 200;
        let text = format!("{}x{}", "\\bold{".repeat(depth), "}".repeat(depth));
        let (nodes, diagnostics) = parse_collecting(&text);
        assert_eq!(nodes.len(), 1);
        assert!(diagnostics.has(DiagnosticKind::NestingTooDeep));
    }

    #[test]
    fn custom_registry() {
        let mut registry = Registry::new();
        registry
            .register(CommandKind::new("emph", Contract::exact(0, 2)))
            .unwrap();
        let mut diagnostics = Diagnostics::new();
        let nodes = Parser::new(&registry).parse("\\emph{a}", &mut diagnostics);

        assert_nodes(&nodes).command(0, |emph| {
            emph.argument_count(2).argument_text(1, "");
        });
        assert!(diagnostics.has(DiagnosticKind::NotEnoughArguments));
    }

    #[test]
    fn custom_syntax() {
        let syntax = crate::markup::syntax::Syntax {
            command: '@',
            escape: '^',
            argument_start: '(',
            argument_end: ')',
            symbols: "=!".into(),
            ..Default::default()
        };
        let grammar = Arc::new(Grammar::new(&syntax).unwrap());
        let mut diagnostics = Diagnostics::new();
        let nodes = Parser::with_grammar(Registry::standard(), grammar)
            .parse("see @bold(it^)) now", &mut diagnostics);

        assert!(diagnostics.is_empty());
        assert_nodes(&nodes)
            .count(3)
            .text(0, "see ")
            .command(1, |bold| {
                bold.argument_text(0, "it^)");
            })
            .text(2, " now");
    }
}
