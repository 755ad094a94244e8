//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they depend only
//! on the repository port and the drain coordinator, staying testable with
//! in-memory implementations.

use std::sync::Arc;

use crate::domain::ports::UserRepository;
use crate::inbound::http::hooks::OperationHooks;
use crate::server::DrainCoordinator;

/// Dependency bundle for the user endpoints.
#[derive(Clone)]
pub struct HttpState {
    /// Data-access port the handlers invoke.
    pub users: Arc<dyn UserRepository>,
    /// Admission and shutdown coordination.
    pub drain: Arc<DrainCoordinator>,
    /// Optional pre/post hooks per operation.
    pub hooks: Arc<OperationHooks>,
}

impl HttpState {
    /// Construct state with no hooks configured.
    pub fn new(users: Arc<dyn UserRepository>, drain: Arc<DrainCoordinator>) -> Self {
        Self {
            users,
            drain,
            hooks: Arc::new(OperationHooks::default()),
        }
    }

    /// Attach a hook configuration.
    #[must_use]
    pub fn with_hooks(mut self, hooks: Arc<OperationHooks>) -> Self {
        self.hooks = hooks;
        self
    }
}
