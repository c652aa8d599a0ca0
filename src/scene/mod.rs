//! Explicit scene state: objects, curves, registries, and the context that owns them.

pub(crate) mod context;
pub(crate) mod curve;
pub(crate) mod object;
pub(crate) mod registry;
