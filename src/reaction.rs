//! Post-merge reaction pipeline.
//!
//! Reactions are pure in-place mutations applied to the merged snapshot,
//! strictly in registration order. Each reaction sees the draft as every
//! earlier reaction left it; the pipeline owns the draft, so committing a
//! step is just handing ownership to the next one.

use crate::value::ConfigValue;

/// A registered snapshot mutation. Registered once, applied on every
/// recomputation, never removed.
pub type Reaction = Box<dyn Fn(&mut ConfigValue) + Send + Sync>;

/// Run every reaction over a working copy of `snapshot`, in order.
pub fn apply_reactions(snapshot: ConfigValue, reactions: &[Reaction]) -> ConfigValue {
    let mut draft = snapshot;
    for reaction in reactions {
        reaction(&mut draft);
    }
    draft
}
