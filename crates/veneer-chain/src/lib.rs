//! Veneer Override Chains
//!
//! Reversible layering of behavior onto named operations ("method slots")
//! without manual alias chaining: wrap a slot once, compose override groups
//! on top (each forwarding into the next-older implementation when it
//! chooses to), and revert the whole chain with a single call.
//!
//! # Core Concepts
//!
//! - [`Veneer`]: the four operations — wrap, group wrap, revert, group revert
//! - [`SlotRegistry`]: per-slot wrap state plus the captured original
//! - [`SlotState`]: `Unwrapped` / `Wrapped` state machine
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use veneer_chain::Veneer;
//! use veneer_object::{Args, Callable, Layer, ObjectSpace, OverrideGroup, OpName, OwnerId, Value};
//!
//! let space = Arc::new(ObjectSpace::new());
//! space.define("X", "foo", Callable::new(|_| Ok(Value::from("X#foo"))));
//!
//! let veneer = Veneer::new(Arc::clone(&space));
//! let group = OverrideGroup::new("M").define(
//!     "foo",
//!     Layer::new(|args, forward| {
//!         let inner = forward.call(args)?;
//!         Ok(Value::from(format!("M#foo/{}", inner.as_str().unwrap_or_default())))
//!     }),
//! );
//! veneer.wrap_group("X", &group);
//!
//! let result = space.call(&OwnerId::new("X"), &OpName::new("foo"), &Args::none()).unwrap();
//! assert_eq!(result, Value::from("M#foo/X#foo"));
//!
//! veneer.revert("X", ["foo"]);
//! let result = space.call(&OwnerId::new("X"), &OpName::new("foo"), &Args::none()).unwrap();
//! assert_eq!(result, Value::from("X#foo"));
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod slot;
mod veneer;

// Re-exports
pub use slot::{SlotKey, SlotRegistry, SlotState};
pub use veneer::Veneer;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
