//! Layered wizard configuration.
//!
//! Combines up to three YAML layers in fixed priority order:
//! 1. **Base** - required; the embedded default or `--config`
//! 2. **User** - optional per-user overrides
//! 3. **Preset** - optional per-run preset
//!
//! ## Merge Strategy
//! - Mappings: deep merge field-by-field, later layers win
//! - Lists and scalars: replaced wholesale; a null override is a no-op
//! - `questions` and `post_actions`: merged by entry `id`, base order first
//!
//! The merged document is validated once, reporting every issue, and then
//! decoded into [`ConfigDocument`].

pub mod interpolate;
mod loader;
mod merge;
mod types;
pub mod validate;

pub use interpolate::{interpolate, interpolate_str, value_to_string};
pub use loader::{ConfigStore, Layer, LayerSources, Source, normalize_keys};
pub use merge::{
    MERGEABLE_COLLECTIONS, deep_merge, entry_id, merge_all, merge_collection, merge_document,
};
pub use types::*;

/// Built-in base document used when no base path is configured.
pub const DEFAULT_BASE: &str = include_str!("../../config/base.yaml");

/// The embedded base document as a [`Source`].
pub fn default_base() -> Source {
    Source::yaml("embedded base", DEFAULT_BASE)
}
