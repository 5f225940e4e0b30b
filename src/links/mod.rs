//! Declarative environment links.
//!
//! A link binds one configuration field to one environment variable with a
//! coercion type, a required/default policy, and an optional custom
//! transform. Link specifications form a tree mirroring (a subset of) the
//! base structure; a node is either a descriptor or a container of further
//! nodes, never both.

mod descriptor;
mod resolve;

pub use descriptor::{LinkDescriptor, LinkSpec, LinkType, TransformFn};
pub use resolve::resolve_links;
