//! Configuration structures for bundle assembly.
//!
//! This module provides the bundle definition schema, placeholder
//! resolution, platform tag detection and the run-wide [`Settings`].

mod builder;
mod core;
mod definition;
pub mod placeholders;
mod platform;

pub use builder::SettingsBuilder;
pub use self::core::Settings;
pub use definition::{BundleDefinition, SourceRoot, SourceRule, validate_table};
pub use placeholders::PlaceholderEnvironment;
pub use platform::{detect_platform, platform_tag};
