//! Built-in renderers.

#[cfg(feature = "json")]
pub mod json;
