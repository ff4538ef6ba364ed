//! Command kinds by canonical name
//!
//! The parser only knows command names as written. The registry maps them to a
//! [`CommandKind`] (declared arity) and a [`Constructor`] producing a preset
//! [`CommandBuilder`]:
//!
//! - alphanumeric names are looked up with their first character upper-cased,
//!   so `\bold` and `\Bold` both resolve to the kind registered as `bold`
//! - symbolic names (`\<=`) go through the symbol table (`<=` → `LessEqual`)
//!
//! Resolution never fails. Unknown names and failing constructors fall back to
//! the unconstrained [`Contract::VARIADIC`] and report a diagnostic. Programmer
//! errors, such as two kinds sharing a canonical name, fail at registration.

mod standard;

pub use standard::{standard_kinds, standard_symbols};

use super::arity::Contract;
use super::ast::CommandBuilder;
use super::diagnostics::{Diagnostic, DiagnosticKind, DiagnosticSink};
use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

static STANDARD: Lazy<Registry> = Lazy::new(Registry::with_standard_kinds);

/// Errors raised while setting up or querying a registry
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("command '{name}' clashes with registered command '{existing}' (both are '{key}')")]
    Duplicate {
        key: String,
        name: String,
        existing: String,
    },
    #[error("command '{0}' has no canonical name")]
    NoCanonicalKey(String),
    #[error("no command registered for '{0}'")]
    Unknown(String),
    #[error(transparent)]
    Construct(#[from] ConstructError),
}

/// A constructor refused to build a command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ConstructError(pub String);

/// Creates the builder for a command of the given kind, named as written.
pub type Constructor =
    Arc<dyn Fn(&CommandKind, &str) -> Result<CommandBuilder, ConstructError> + Send + Sync>;

/// A registered kind of command.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct CommandKind {
    name: String,
    contract: Contract,
}

impl CommandKind {
    pub fn new(name: impl Into<String>, contract: Contract) -> Self {
        Self {
            name: name.into(),
            contract,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn contract(&self) -> Contract {
        self.contract
    }

    /// Builder for a command of this kind under its registered name.
    pub fn builder(&self) -> CommandBuilder {
        CommandBuilder::new(self.name.clone(), self.contract)
    }
}

fn default_constructor() -> Constructor {
    Arc::new(|kind: &CommandKind, name: &str| Ok(CommandBuilder::new(name, kind.contract())))
}

#[derive(Clone)]
struct Entry {
    kind: CommandKind,
    constructor: Constructor,
}

/// Maps canonical names to command kinds.
#[derive(Clone)]
pub struct Registry {
    entries: HashMap<String, Entry>,
    symbols: HashMap<String, String>,
}

impl Registry {
    /// A registry with the standard symbol table and no kinds.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            symbols: standard_symbols()
                .into_iter()
                .map(|(symbol, name)| (symbol.to_string(), name.to_string()))
                .collect(),
        }
    }

    /// A registry with the standard symbol table and the standard kinds.
    pub fn with_standard_kinds() -> Self {
        let mut registry = Self::new();
        for kind in standard_kinds() {
            if let Some(key) = registry.canonical_key(kind.name()) {
                registry.entries.insert(
                    key,
                    Entry {
                        kind,
                        constructor: default_constructor(),
                    },
                );
            }
        }
        registry
    }

    /// The shared, read-only standard registry.
    pub fn standard() -> &'static Registry {
        &STANDARD
    }

    /// Add a symbolic command name, e.g. `("<>", "NotEqual")`.
    pub fn register_symbol(&mut self, symbol: impl Into<String>, canonical: impl Into<String>) {
        self.symbols.insert(symbol.into(), canonical.into());
    }

    /// Register a kind built with the default constructor.
    pub fn register(&mut self, kind: CommandKind) -> Result<(), RegistryError> {
        self.register_with(kind, default_constructor())
    }

    /// Register a kind with its own constructor.
    pub fn register_with(
        &mut self,
        kind: CommandKind,
        constructor: Constructor,
    ) -> Result<(), RegistryError> {
        let key = self
            .canonical_key(kind.name())
            .ok_or_else(|| RegistryError::NoCanonicalKey(kind.name().to_string()))?;

        if let Some(existing) = self.entries.get(&key) {
            return Err(RegistryError::Duplicate {
                key,
                name: kind.name().to_string(),
                existing: existing.kind.name().to_string(),
            });
        }

        self.entries.insert(key, Entry { kind, constructor });
        Ok(())
    }

    /// Lookup key for a command name as written in the source.
    pub fn canonical_key(&self, name: &str) -> Option<String> {
        let mut chars = name.chars();
        let first = chars.next()?;
        if first.is_alphanumeric() {
            Some(first.to_uppercase().chain(chars).collect())
        } else {
            self.symbols.get(name).cloned()
        }
    }

    pub fn kind(&self, name: &str) -> Option<&CommandKind> {
        let key = self.canonical_key(name)?;
        self.entries.get(&key).map(|entry| &entry.kind)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.kind(name).is_some()
    }

    /// All registered kinds, sorted by name.
    pub fn kinds(&self) -> Vec<&CommandKind> {
        let mut kinds: Vec<_> = self.entries.values().map(|entry| &entry.kind).collect();
        kinds.sort_by(|a, b| a.name().cmp(b.name()));
        kinds
    }

    /// Symbol table entries, sorted by symbol.
    pub fn symbols(&self) -> Vec<(&str, &str)> {
        let mut symbols: Vec<_> = self
            .symbols
            .iter()
            .map(|(symbol, name)| (symbol.as_str(), name.as_str()))
            .collect();
        symbols.sort();
        symbols
    }

    /// Builder for programmatic construction of a registered command.
    pub fn builder(&self, name: &str) -> Result<CommandBuilder, RegistryError> {
        let entry = self
            .canonical_key(name)
            .and_then(|key| self.entries.get(&key))
            .ok_or_else(|| RegistryError::Unknown(name.to_string()))?;
        Ok((entry.constructor)(&entry.kind, name)?)
    }

    /// Builder for a parsed command name; never fails.
    ///
    /// Unknown names and failing constructors yield an unconstrained builder
    /// and a diagnostic.
    pub fn resolve(&self, name: &str, sink: &mut dyn DiagnosticSink) -> CommandBuilder {
        let key = self.canonical_key(name);
        let entry = key.as_ref().and_then(|key| self.entries.get(key));

        let Some(entry) = entry else {
            let message = match &key {
                Some(key) => format!("could not resolve command '{name}' [{key}]"),
                None => format!("could not resolve command '{name}'"),
            };
            sink.report(Diagnostic::new(DiagnosticKind::UnknownCommand, name, message));
            return CommandBuilder::new(name, Contract::VARIADIC);
        };

        match (entry.constructor)(&entry.kind, name) {
            Ok(builder) => builder,
            Err(err) => {
                let key = key.unwrap_or_default();
                sink.report(Diagnostic::new(
                    DiagnosticKind::ConstructionFailed,
                    name,
                    format!("cannot instantiate command '{name}' [{key}]: {err}"),
                ));
                CommandBuilder::new(name, Contract::VARIADIC)
            }
        }
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::with_standard_kinds()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("kinds", &self.kinds())
            .field("symbols", &self.symbols())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::arity::Arity;
    use crate::markup::diagnostics::Diagnostics;

    #[test]
    fn canonical_keys() {
        let registry = Registry::new();
        assert_eq!(registry.canonical_key("bold").as_deref(), Some("Bold"));
        assert_eq!(registry.canonical_key("Bold").as_deref(), Some("Bold"));
        assert_eq!(registry.canonical_key("2col").as_deref(), Some("2col"));
        assert_eq!(registry.canonical_key("<=").as_deref(), Some("LessEqual"));
        assert_eq!(registry.canonical_key(">").as_deref(), Some("Greater"));
        assert_eq!(registry.canonical_key("~~"), None);
        assert_eq!(registry.canonical_key(""), None);
    }

    #[test]
    fn resolves_registered_kind() {
        let mut diagnostics = Diagnostics::new();
        let builder = Registry::standard().resolve("bold", &mut diagnostics);

        assert!(diagnostics.is_empty());
        assert_eq!(builder.name(), "bold");
        assert_eq!(builder.contract(), Contract::exact(0, 1));
    }

    #[test]
    fn keeps_name_as_written() {
        let mut diagnostics = Diagnostics::new();
        let builder = Registry::standard().resolve("Bold", &mut diagnostics);
        assert_eq!(builder.name(), "Bold");
        assert_eq!(builder.contract(), Contract::exact(0, 1));
    }

    #[test]
    fn resolves_symbolic_names() {
        let mut diagnostics = Diagnostics::new();
        let builder = Registry::standard().resolve("<=", &mut diagnostics);
        assert!(diagnostics.is_empty());
        assert_eq!(builder.name(), "<=");
        assert_eq!(builder.contract(), Contract::exact(0, 0));
    }

    #[test]
    fn unknown_name_falls_back() {
        let mut diagnostics = Diagnostics::new();
        let builder = Registry::standard().resolve("starting", &mut diagnostics);

        assert_eq!(builder.contract(), Contract::VARIADIC);
        assert_eq!(
            diagnostics.messages(),
            vec!["could not resolve command 'starting' [Starting]"]
        );
    }

    #[test]
    fn unknown_symbol_falls_back() {
        let mut diagnostics = Diagnostics::new();
        let builder = Registry::standard().resolve("~", &mut diagnostics);

        assert_eq!(builder.contract(), Contract::VARIADIC);
        assert_eq!(diagnostics.messages(), vec!["could not resolve command '~'"]);
    }

    #[test]
    fn failing_constructor_falls_back() {
        let mut registry = Registry::new();
        registry
            .register_with(
                CommandKind::new("broken", Contract::exact(0, 1)),
                Arc::new(|_: &CommandKind, _: &str| Err(ConstructError("not today".into()))),
            )
            .unwrap();

        let mut diagnostics = Diagnostics::new();
        let builder = registry.resolve("broken", &mut diagnostics);

        assert_eq!(builder.contract(), Contract::VARIADIC);
        assert!(diagnostics.has(DiagnosticKind::ConstructionFailed));
        assert_eq!(
            diagnostics.messages(),
            vec!["cannot instantiate command 'broken' [Broken]: not today"]
        );
    }

    #[test]
    fn duplicate_registration_fails() {
        let mut registry = Registry::with_standard_kinds();
        let err = registry
            .register(CommandKind::new("Bold", Contract::exact(0, 2)))
            .unwrap_err();
        assert_eq!(
            err,
            RegistryError::Duplicate {
                key: "Bold".into(),
                name: "Bold".into(),
                existing: "bold".into(),
            }
        );
    }

    #[test]
    fn symbolic_kind_needs_symbol_entry() {
        let mut registry = Registry::new();
        let err = registry
            .register(CommandKind::new("<>", Contract::exact(0, 0)))
            .unwrap_err();
        assert_eq!(err, RegistryError::NoCanonicalKey("<>".into()));

        registry.register_symbol("<>", "NotEqual");
        registry
            .register(CommandKind::new("<>", Contract::exact(0, 0)))
            .unwrap();
        assert!(registry.contains("notEqual"));
    }

    #[test]
    fn programmatic_builder() {
        let registry = Registry::standard();
        let builder = registry.builder("table").unwrap();
        assert_eq!(
            builder.contract(),
            Contract::new(Arity::Exact(1), Arity::Variadic)
        );
        assert_eq!(
            registry.builder("nothing").unwrap_err(),
            RegistryError::Unknown("nothing".into())
        );
    }

    #[test]
    fn kinds_are_sorted() {
        let names: Vec<_> = Registry::standard()
            .kinds()
            .into_iter()
            .map(CommandKind::name)
            .collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
        assert!(names.contains(&"overlayicon"));
    }

    #[test]
    fn standard_registry_is_shareable() {
        fn assert_sync<T: Sync + Send>(_: &T) {}
        assert_sync(Registry::standard());

        let handles: Vec<_> = (0..4)
            .map(|_| std::thread::spawn(|| Registry::standard().contains("link")))
            .collect();
        for handle in handles {
            assert!(handle.join().unwrap());
        }
    }
}
