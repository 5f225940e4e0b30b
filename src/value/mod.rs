//! Configuration value tree
//!
//! A snapshot is an owned tree of named fields: leaves are scalars
//! (string, number, boolean, date) or null, internal nodes are keyed
//! structures. Arrays are carried as leaves: the resolvers never recurse
//! into them and a merge replaces them wholesale.

mod revive;
mod tree;

pub use tree::{ConfigValue, Map};
