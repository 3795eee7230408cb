//! Veneer Host Object Model
//!
//! The entity/operation world the override-chain machinery operates on.
//!
//! # Core Concepts
//!
//! - [`ObjectSpace`]: process-wide owner table, resolution, composition
//! - [`Owner`]: operation tables with local-vs-composed provenance
//! - [`OverrideGroup`]: named bundle of override layers
//! - [`Callable`] / [`Layer`] / [`Forward`]: closure chain machinery
//!
//! # Example
//!
//! ```rust
//! use veneer_object::{Args, Callable, ObjectSpace, OwnerId, OpName, Value};
//!
//! let space = ObjectSpace::new();
//! space.define("X", "foo", Callable::new(|_| Ok(Value::from("X#foo"))));
//!
//! let result = space.call(&OwnerId::new("X"), &OpName::new("foo"), &Args::none());
//! assert_eq!(result.unwrap(), Value::from("X#foo"));
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod callable;
mod group;
mod ident;
mod owner;
mod space;

// Re-exports
pub use callable::{compose, Args, Block, CallError, Callable, Forward, Layer, Value};
pub use group::OverrideGroup;
pub use ident::{OpName, OwnerId};
pub use owner::Owner;
pub use space::ObjectSpace;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
