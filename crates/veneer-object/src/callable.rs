//! Callable machinery: dynamic values, arguments, layers, and composition
//!
//! An operation body is a [`Callable`]: a closure over [`Args`] returning a
//! [`Value`] or a [`CallError`]. Override layers are [`Layer`]s, which
//! additionally receive a [`Forward`] handle to the next-older
//! implementation. [`compose`] folds a layer over its forward target once,
//! at registration time, so steady-state invocation is a plain call through
//! an immutable closure chain.

use crate::ident::{OpName, OwnerId};
use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;

/// Dynamic argument/result value passed through the chain
pub type Value = serde_json::Value;

/// Errors surfaced when invoking an operation
///
/// Note that wrapping and reverting never produce these; only *calling* an
/// operation can fail, and failures raised by a forwarded implementation
/// propagate unchanged to the original caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CallError {
    /// Failure raised by an implementation in the chain
    #[error("operation raised: {0}")]
    Raised(String),

    /// No resolvable implementation for the name on the owner
    #[error("no operation named `{name}` on `{owner}`")]
    NoSuchOperation {
        /// Owner the call targeted
        owner: OwnerId,
        /// Operation name that failed to resolve
        name: OpName,
    },

    /// A layer forwarded but nothing older exists in the chain
    #[error("`{name}` forwarded but no older implementation exists")]
    NoForwardTarget {
        /// Operation name whose chain ran out
        name: OpName,
    },

    /// An implementation invoked its trailing block, but the caller gave none
    #[error("operation invoked a block but none was given")]
    NoBlockGiven,
}

/// Trailing block/continuation passed alongside positional arguments
///
/// Cloned freely; every layer of a chain sees the same block.
#[derive(Clone)]
pub struct Block(Arc<dyn Fn() -> Value + Send + Sync>);

impl Block {
    /// Create a block from a closure
    #[inline]
    pub fn new(f: impl Fn() -> Value + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    /// Invoke the block
    #[inline]
    #[must_use]
    pub fn call(&self) -> Value {
        (self.0)()
    }
}

impl Debug for Block {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("Block(..)")
    }
}

/// Positional arguments plus an optional trailing block
#[derive(Debug, Clone, Default)]
pub struct Args {
    values: Vec<Value>,
    block: Option<Block>,
}

impl Args {
    /// No arguments, no block
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Positional arguments only
    #[inline]
    #[must_use]
    pub fn new(values: Vec<Value>) -> Self {
        Self {
            values,
            block: None,
        }
    }

    /// Attach a trailing block
    #[inline]
    #[must_use]
    pub fn with_block(mut self, block: Block) -> Self {
        self.block = Some(block);
        self
    }

    /// Positional argument values
    #[inline]
    #[must_use]
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Positional argument by index
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// The trailing block, if the caller supplied one
    #[inline]
    #[must_use]
    pub fn block(&self) -> Option<&Block> {
        self.block.as_ref()
    }

    /// Invoke the trailing block
    ///
    /// # Errors
    /// `CallError::NoBlockGiven` if the caller did not supply a block.
    pub fn call_block(&self) -> Result<Value, CallError> {
        self.block
            .as_ref()
            .map(Block::call)
            .ok_or(CallError::NoBlockGiven)
    }
}

/// A resolvable operation implementation
///
/// Originals, forwarding entry points, and fully composed chains are all
/// `Callable`s; the distinction lives in the slot registry, not here.
#[derive(Clone)]
pub struct Callable(Arc<dyn Fn(&Args) -> Result<Value, CallError> + Send + Sync>);

impl Callable {
    /// Create a callable from a closure
    #[inline]
    pub fn new(f: impl Fn(&Args) -> Result<Value, CallError> + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    /// Invoke the implementation
    ///
    /// # Errors
    /// Whatever the implementation raises, unchanged.
    #[inline]
    pub fn call(&self, args: &Args) -> Result<Value, CallError> {
        (self.0)(args)
    }
}

impl Debug for Callable {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("Callable(..)")
    }
}

/// Handle to the next-older implementation in a chain
///
/// Handed to every [`Layer`] at composition time. A layer that never calls
/// it stops the chain at itself; that is the layer author's choice, not
/// enforced here.
#[derive(Debug, Clone)]
pub struct Forward {
    name: OpName,
    target: Option<Callable>,
}

impl Forward {
    /// Create a forward handle
    #[inline]
    #[must_use]
    pub fn new(name: OpName, target: Option<Callable>) -> Self {
        Self { name, target }
    }

    /// Whether anything older exists to forward into
    #[inline]
    #[must_use]
    pub fn has_target(&self) -> bool {
        self.target.is_some()
    }

    /// Call the next-older implementation with the given arguments
    ///
    /// # Errors
    /// `CallError::NoForwardTarget` if the chain has nothing older;
    /// otherwise whatever the older implementation raises.
    pub fn call(&self, args: &Args) -> Result<Value, CallError> {
        match &self.target {
            Some(callable) => callable.call(args),
            None => Err(CallError::NoForwardTarget {
                name: self.name.clone(),
            }),
        }
    }
}

/// An override layer: a body that may forward to the next-older
/// implementation
#[derive(Clone)]
pub struct Layer(Arc<dyn Fn(&Args, &Forward) -> Result<Value, CallError> + Send + Sync>);

impl Layer {
    /// Create a layer from a closure
    #[inline]
    pub fn new(
        f: impl Fn(&Args, &Forward) -> Result<Value, CallError> + Send + Sync + 'static,
    ) -> Self {
        Self(Arc::new(f))
    }

    /// The layer that only forwards
    ///
    /// This is the entry point installed by a wrap: a chain of exactly one
    /// element whose body calls the captured original with the same
    /// arguments and block.
    #[inline]
    #[must_use]
    pub fn forwarding() -> Self {
        Self::new(|args, forward| forward.call(args))
    }

    /// Run the layer body
    ///
    /// # Errors
    /// Whatever the body raises.
    #[inline]
    pub fn invoke(&self, args: &Args, forward: &Forward) -> Result<Value, CallError> {
        (self.0)(args, forward)
    }
}

impl Debug for Layer {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("Layer(..)")
    }
}

/// Compose a layer over its forward target into a single callable
///
/// Composition happens once, when the layer is attached; invocation is then
/// a plain synchronous call through the captured closures.
#[must_use]
pub fn compose(name: &OpName, layer: &Layer, next: Option<Callable>) -> Callable {
    let layer = layer.clone();
    let forward = Forward::new(name.clone(), next);
    Callable::new(move |args| layer.invoke(args, &forward))
}
