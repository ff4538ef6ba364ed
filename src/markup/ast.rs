//! Command tree
//!
//! Parsing yields a flat sequence of [`Node`]s. A node is either literal text or
//! a [`Command`]: a name plus ordered optional and required argument lists,
//! each argument again a node. A command with an empty name is an anonymous
//! group; it stands in for an argument that mixes text and commands.
//!
//! Commands are immutable. Arity-checked construction goes through
//! [`CommandBuilder`], which reconciles the collected arguments with the
//! kind's contract when built.

mod builder;
mod node;

pub use builder::CommandBuilder;
pub use node::{Argument, Command, Node};
