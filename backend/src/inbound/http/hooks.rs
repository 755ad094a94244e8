//! Optional pre/post hooks around each repository operation.
//!
//! Embedders can observe or filter operations without touching the handler
//! shells. Hooks are an explicit configuration struct rather than a mutable
//! keyed map: one optional pair per operation, invoked synchronously around
//! the repository call.

use std::sync::Arc;

use crate::domain::User;

/// Decide whether an operation proceeds; `false` filters the request and the
/// shell responds with an empty envelope instead of calling the repository.
pub type BeforeHook = Arc<dyn Fn(&User) -> bool + Send + Sync>;

/// Observe an operation after the repository call; the flag reports success.
pub type AfterHook = Arc<dyn Fn(&User, bool) + Send + Sync>;

/// Hook pair for a single operation.
#[derive(Clone, Default)]
pub struct HookPair {
    /// Runs before the repository call.
    pub before: Option<BeforeHook>,
    /// Runs after the repository call.
    pub after: Option<AfterHook>,
}

impl HookPair {
    /// Run the pre-hook; absent hooks admit everything.
    pub fn admit(&self, user: &User) -> bool {
        self.before.as_ref().is_none_or(|hook| hook(user))
    }

    /// Run the post-hook, if any.
    pub fn observe(&self, user: &User, succeeded: bool) {
        if let Some(hook) = &self.after {
            hook(user, succeeded);
        }
    }
}

/// Hook configuration for the four user operations.
#[derive(Clone, Default)]
pub struct OperationHooks {
    /// Hooks around create.
    pub add: HookPair,
    /// Hooks around update.
    pub update: HookPair,
    /// Hooks around delete.
    pub delete: HookPair,
    /// Hooks around find.
    pub query: HookPair,
}
