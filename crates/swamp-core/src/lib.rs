#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core data structures shared by the Swamp compiler crates.
//!
//! - [`SourceMap`]: owned source texts addressed by [`SourceId`]
//! - [`Span`] and [`SourceRef`]: byte ranges and their line/column rendering
//! - [`ArtifactName`] and [`ModulePath`]: fully qualified module naming
//! - [`settings`]: solution, package and user environment files

mod artifact;
pub mod colors;
pub mod settings;
mod source_map;
mod span;

#[cfg(test)]
mod artifact_tests;
#[cfg(test)]
mod settings_tests;

pub use artifact::{ArtifactName, ModulePath};
pub use colors::Colors;
pub use source_map::{Source, SourceId, SourceKind, SourceMap};
pub use span::{SourceRef, Span};
