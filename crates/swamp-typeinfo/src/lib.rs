#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! TypeInfo chunk: a dense, de-duplicated table of the types a package uses.
//!
//! Backends address types by [`InfoIndex`]. The table is built by the compiler
//! (one entry per structurally distinct type), serialized with
//! [`TypeInfoChunk::to_bytes`] and read back with [`TypeInfoChunk::from_bytes`].
//!
//! Binary layout:
//!
//! ```text
//! u8 major, u8 minor, u8 patch, u8 count, entry[count]
//! entry := u8 kind-tag, payload
//! ```
//!
//! Strings are `u8`-length-prefixed UTF-8; type references are one `u8` index.

mod chunk;
mod dump;
mod kind;
mod read;
mod write;

#[cfg(test)]
mod dump_tests;
#[cfg(test)]
mod format_tests;
#[cfg(test)]
mod kind_tests;

pub use chunk::{InfoField, InfoIndex, InfoType, InfoVariant, TypeInfoChunk};
pub use dump::dump;
pub use kind::InfoKind;
pub use read::ReadError;
pub use write::WriteError;

/// Format version written in the header.
pub const VERSION: (u8, u8, u8) = (0, 1, 3);

/// Entries addressable by a single-byte index (and countable in the `u8` header).
pub const MAX_TYPES: usize = u8::MAX as usize;
