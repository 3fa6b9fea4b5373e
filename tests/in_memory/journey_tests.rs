//! Multi-step caller journeys through the IVR.

use crate::in_memory::helpers::{Backend, TestError, created_task, event, memory_backend, runtime};
use chrono::Duration;
use ivr_metrics::ivr_task::{
    adapters::memory::TaskRouterCall,
    domain::AssignmentStatus,
    services::{CANCELLATION_REASON, IVR_TASK_CHANNEL},
};
use rstest::rstest;
use serde_json::json;
use std::io;
use tokio::runtime::Runtime;

/// A caller enters the menu, takes one branch, then leaves.
#[rstest]
fn three_step_journey_leaves_one_canceled_task_per_step(
    runtime: io::Result<Runtime>,
    memory_backend: Result<Backend, TestError>,
) -> Result<(), TestError> {
    let rt = runtime?;
    let backend = memory_backend?;

    let entered = rt.block_on(backend.handler.handle(&event("C1", None, None, false, "main")));
    let first = created_task(&entered)?;
    backend.clock.advance(Duration::seconds(12));

    let advanced = rt.block_on(backend.handler.handle(&event(
        "C1",
        Some(&first),
        Some(&first),
        false,
        "main/billing",
    )));
    let second = created_task(&advanced)?;
    backend.clock.advance(Duration::seconds(37));

    let left = rt.block_on(backend.handler.handle(&event(
        "C1",
        Some(&second),
        Some(&first),
        true,
        "main/billing/agent",
    )));

    assert!(left.is_success());
    assert_eq!(backend.entry("C1")?, Some(json!({})));

    assert_eq!(
        backend.attributes(&first)?,
        json!({
            "conversations": {
                "conversation_attribute_1": "C1",
                "ivr_path": "main/billing",
                "abandoned": "No",
                "ivr_time": 12
            }
        })
    );
    assert_eq!(
        backend.attributes(&second)?,
        json!({
            "conversations": {
                "conversation_attribute_1": "C1",
                "conversation_id": first.as_str(),
                "ivr_path": "main/billing/agent",
                "abandoned": "No",
                "ivr_time": 37
            }
        })
    );

    for sid in [&first, &second] {
        let stored = backend.task(sid)?;
        assert_eq!(
            stored.record.assignment_status(),
            Some(AssignmentStatus::Canceled)
        );
        assert_eq!(stored.reason.as_deref(), Some(CANCELLATION_REASON));
        assert_eq!(stored.task_channel.as_deref(), Some(IVR_TASK_CHANNEL));
    }
    Ok(())
}

/// Calls progressing at the same time never see each other's tasks.
#[rstest]
fn interleaved_calls_keep_separate_entries(
    runtime: io::Result<Runtime>,
    memory_backend: Result<Backend, TestError>,
) -> Result<(), TestError> {
    let rt = runtime?;
    let backend = memory_backend?;

    let alpha = created_task(&rt.block_on(
        backend.handler.handle(&event("C-alpha", None, None, false, "main")),
    ))?;
    let beta = created_task(&rt.block_on(
        backend.handler.handle(&event("C-beta", None, None, false, "main")),
    ))?;
    let alpha_next = created_task(&rt.block_on(backend.handler.handle(&event(
        "C-alpha",
        Some(&alpha),
        Some(&alpha),
        false,
        "main/2",
    ))))?;

    assert_eq!(
        backend.entry("C-alpha")?,
        Some(json!({"activeTask": alpha_next.as_str()}))
    );
    assert_eq!(
        backend.entry("C-beta")?,
        Some(json!({"activeTask": beta.as_str()}))
    );
    assert_eq!(
        backend.task(&beta)?.record.assignment_status(),
        Some(AssignmentStatus::Pending)
    );
    Ok(())
}

/// A failed cancellation aborts before any task is created.
#[rstest]
fn failed_cancellation_creates_nothing(
    runtime: io::Result<Runtime>,
    memory_backend: Result<Backend, TestError>,
) -> Result<(), TestError> {
    let rt = runtime?;
    let backend = memory_backend?;
    let missing = ivr_metrics::ivr_task::domain::TaskSid::new("WT-unknown")?;

    let response = rt.block_on(backend.handler.handle(&event(
        "C1",
        Some(&missing),
        None,
        false,
        "main/2",
    )));

    assert_eq!(response.status(), 404);
    assert_eq!(
        backend.router.journal()?,
        vec![TaskRouterCall::Fetch(missing)]
    );
    assert_eq!(backend.entry("C1")?, None);
    Ok(())
}
