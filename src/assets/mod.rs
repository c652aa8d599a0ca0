//! Input images: directory discovery and header probing.

pub(crate) mod discover;
pub(crate) mod probe;
