//! The type graph.
//!
//! Every type of a build session lives in one [`TypeArena`] and is addressed
//! by [`TypeId`]. Atoms are the structural forms; references, aliases and
//! local type contexts are indirections that [`TypeArena::resolve`] follows
//! down to an atom.

mod arena;
mod compat;
mod error;
mod names;
mod node;
mod resolve;

#[cfg(test)]
mod compat_tests;
#[cfg(test)]
mod resolve_tests;

pub use arena::TypeArena;
pub use error::TypeError;
pub use node::*;
pub use resolve::{Bindings, MAX_RESOLVE_DEPTH};
