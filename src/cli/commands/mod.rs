//! Command execution for the update, rebuild and bundle phases.

mod bundles;
mod rebuild;
mod update;

pub use bundles::build_bundles;
pub use rebuild::rebuild_modules;
pub use update::{clone_module, update_module, update_modules};
