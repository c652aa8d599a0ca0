//! Render delegation: the request contract, the scene document handed to renderers, and the
//! external-process delegate.

pub(crate) mod delegate;
pub(crate) mod export;
pub(crate) mod process;
