//! Shading operator graphs: the node/edge model, the name-keyed registry, the per-surface
//! builder, and structural fingerprints.

pub(crate) mod builder;
pub(crate) mod fingerprint;
pub(crate) mod graph;
pub(crate) mod registry;
