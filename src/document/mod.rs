//! Tree values and the shared root that handles operate on.

pub mod node;
pub mod tree;

pub use node::{Number, Opaque, OpaqueRef, Value};
pub use tree::Tree;
