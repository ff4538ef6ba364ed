//! Configuration loading
//!
//! `defaults/markup.default.toml` is embedded into the crate so that the
//! documented defaults and runtime behavior stay in sync. Callers layer their
//! own files on top of those defaults via [`Loader`] before deserializing into
//! [`MarkupConfig`], which then yields the registry, grammar and parser the
//! configuration describes.

use super::arity::{Arity, Contract};
use super::parsing::{Grammar, Parser};
use super::registry::{CommandKind, Registry, RegistryError};
use super::syntax::{Syntax, SyntaxError};
use ::config::builder::DefaultState;
use ::config::{Config, ConfigBuilder, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

const DEFAULT_TOML: &str = include_str!("../../defaults/markup.default.toml");

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot load configuration: {0}")]
    Load(#[from] ::config::ConfigError),
    #[error("invalid markup syntax: {0}")]
    Syntax(#[from] SyntaxError),
    #[error("invalid command configuration: {0}")]
    Registry(#[from] RegistryError),
}

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MarkupConfig {
    pub syntax: Syntax,
    pub parser: ParserConfig,
    #[serde(default)]
    pub symbols: Vec<SymbolConfig>,
    #[serde(default)]
    pub commands: Vec<CommandConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ParserConfig {
    pub max_depth: usize,
}

/// A symbolic command name and the canonical name it resolves to.
#[derive(Debug, Clone, Deserialize)]
pub struct SymbolConfig {
    pub symbol: String,
    pub name: String,
}

/// An additional command kind.
#[derive(Debug, Clone, Deserialize)]
pub struct CommandConfig {
    pub name: String,
    pub optional: Arity,
    pub required: Arity,
}

impl CommandConfig {
    pub fn kind(&self) -> CommandKind {
        CommandKind::new(self.name.clone(), Contract::new(self.optional, self.required))
    }
}

impl MarkupConfig {
    /// The standard kinds plus the configured symbols and commands.
    pub fn registry(&self) -> Result<Registry, ConfigError> {
        let mut registry = Registry::with_standard_kinds();
        for symbol in &self.symbols {
            registry.register_symbol(symbol.symbol.clone(), symbol.name.clone());
        }
        for command in &self.commands {
            registry.register(command.kind())?;
        }
        Ok(registry)
    }

    pub fn grammar(&self) -> Result<Arc<Grammar>, ConfigError> {
        Ok(Arc::new(Grammar::new(&self.syntax)?))
    }

    /// A parser over `registry` with the configured syntax and depth limit.
    pub fn parser<'r>(&self, registry: &'r Registry) -> Result<Parser<'r>, ConfigError> {
        Ok(Parser::with_grammar(registry, self.grammar()?).max_depth(self.parser.max_depth))
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override.
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    pub fn build(self) -> Result<MarkupConfig, ConfigError> {
        Ok(self.builder.build()?.try_deserialize()?)
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<MarkupConfig, ConfigError> {
    Loader::new().build()
}
