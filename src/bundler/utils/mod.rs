//! Filesystem and process helpers shared by the bundler and the module pipeline.

pub mod fs;
pub mod process;
