//! The handler contract.
//!
//! A handler is a pure function of its [`InvocationContext`]: it inspects the
//! request and returns the [`Effect`]s it wants performed. The dispatcher
//! executes them afterwards, so handlers can be unit-tested without a
//! gateway, a config store or a network.
//!
//! Plain functions and closures implement [`CommandHandler`] automatically:
//!
//! ```rust,ignore
//! use herald_framework::{Effect, InvocationContext};
//!
//! fn ping(_ctx: &InvocationContext<'_>) -> Vec<Effect> {
//!     vec![Effect::reply("pong")]
//! }
//! ```

use std::sync::Arc;

use crate::context::InvocationContext;
use crate::effect::Effect;

/// The core trait for command handlers.
pub trait CommandHandler: Send + Sync + 'static {
    /// Computes the effects of one invocation.
    fn invoke(&self, ctx: &InvocationContext<'_>) -> Vec<Effect>;
}

impl<F> CommandHandler for F
where
    F: Fn(&InvocationContext<'_>) -> Vec<Effect> + Send + Sync + 'static,
{
    fn invoke(&self, ctx: &InvocationContext<'_>) -> Vec<Effect> {
        (self)(ctx)
    }
}

/// A type-erased handler that can be stored in the registry.
pub type BoxedHandler = Arc<dyn CommandHandler>;

/// Pins a closure to the handler signature.
///
/// Closures that capture state need this so their argument lifetime is
/// inferred as higher-ranked.
pub fn handler_fn<F>(f: F) -> F
where
    F: Fn(&InvocationContext<'_>) -> Vec<Effect> + Send + Sync + 'static,
{
    f
}
