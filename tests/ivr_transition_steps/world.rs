//! Shared world state for IVR transition BDD scenarios.

use std::sync::Arc;

use ivr_metrics::{
    call_state::{adapters::memory::InMemorySyncStore, services::CallStateRecorder},
    clock::ManualClock,
    ivr_task::{
        adapters::memory::InMemoryTaskRouter,
        domain::{TaskSid, WorkflowSid},
        services::TaskLifecycleService,
    },
    transition::{
        domain::HandlerResponse,
        services::{IvrMetricsHandler, IvrTransitionCoordinator},
    },
};
use rstest::fixture;

/// Handler type used by the BDD world.
pub type TestHandler = IvrMetricsHandler<
    InMemoryTaskRouter<ManualClock>,
    InMemorySyncStore<ManualClock>,
    ManualClock,
>;

/// Scenario world for IVR transition behaviour tests.
pub struct IvrWorld {
    pub router: InMemoryTaskRouter<ManualClock>,
    pub store: InMemorySyncStore<ManualClock>,
    pub clock: Arc<ManualClock>,
    pub handler: TestHandler,
    pub call_sid: Option<String>,
    pub active_task: Option<TaskSid>,
    pub reply: Option<HandlerResponse>,
}

impl IvrWorld {
    /// Creates a world backed by empty in-memory services.
    ///
    /// # Panics
    ///
    /// Panics if the literal workflow SID is rejected.
    #[must_use]
    pub fn new() -> Self {
        let clock = Arc::new(ManualClock::default());
        let router = InMemoryTaskRouter::with_clock(Arc::clone(&clock));
        let store = InMemorySyncStore::with_clock(Arc::clone(&clock));
        let workflow = WorkflowSid::new("WW-ivr").expect("literal workflow SID is valid");
        let tasks =
            TaskLifecycleService::new(Arc::new(router.clone()), Arc::clone(&clock), workflow);
        let handler = IvrMetricsHandler::new(IvrTransitionCoordinator::new(
            tasks,
            CallStateRecorder::new(Arc::new(store.clone())),
        ));
        Self {
            router,
            store,
            clock,
            handler,
            call_sid: None,
            active_task: None,
            reply: None,
        }
    }

    /// Returns the call under test.
    ///
    /// # Errors
    ///
    /// Returns an error when no call has been set up.
    pub fn call(&self) -> Result<&str, eyre::Report> {
        self.call_sid
            .as_deref()
            .ok_or_else(|| eyre::eyre!("missing call in scenario world"))
    }

    /// Returns the reply to the last routing event.
    ///
    /// # Errors
    ///
    /// Returns an error when no event has been handled.
    pub fn reply(&self) -> Result<&HandlerResponse, eyre::Report> {
        self.reply
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing reply in scenario world"))
    }
}

impl Default for IvrWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> IvrWorld {
    IvrWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
