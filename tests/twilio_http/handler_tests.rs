//! Whole routing events over both Twilio adapters.

use crate::twilio_http::helpers::{
    ITEMS_PATH, TASKS_PATH, TestError, error_body, form, item_body, sync_store, task_body,
    task_router,
};
use chrono::{TimeZone, Utc};
use ivr_metrics::{
    call_state::{
        adapters::twilio::TwilioSyncStore, domain::CallSid, services::CallStateRecorder,
    },
    clock::ManualClock,
    ivr_task::{
        adapters::twilio::TwilioTaskRouter,
        domain::{IvrPath, TaskSid, WorkflowSid},
        services::TaskLifecycleService,
    },
    transition::{
        domain::RoutingEvent,
        services::{IvrMetricsHandler, IvrTransitionCoordinator},
    },
};
use mockito::Server;
use serde_json::json;
use std::sync::Arc;

type TwilioCoordinator = IvrTransitionCoordinator<TwilioTaskRouter, TwilioSyncStore, ManualClock>;

/// Coordinator whose clock sits 37 seconds after the mocked task creation.
fn coordinator(base_url: &str) -> Result<TwilioCoordinator, TestError> {
    let now = Utc
        .with_ymd_and_hms(2024, 5, 14, 18, 50, 39)
        .single()
        .ok_or("invalid instant")?;
    let tasks = TaskLifecycleService::new(
        Arc::new(task_router(base_url)),
        Arc::new(ManualClock::new(now)),
        WorkflowSid::new("WW1")?,
    );
    Ok(IvrTransitionCoordinator::new(
        tasks,
        CallStateRecorder::new(Arc::new(sync_store(base_url))),
    ))
}

#[tokio::test(flavor = "multi_thread")]
async fn final_step_cancels_with_elapsed_time_and_clears_entry() -> Result<(), TestError> {
    let mut server = Server::new_async().await;
    let fetch = server
        .mock("GET", format!("{TASKS_PATH}/WT1").as_str())
        .with_status(200)
        .with_body(task_body(
            "WT1",
            r#"{"conversations":{"conversation_attribute_1":"C1","ivr_path":"main"}}"#,
            "pending",
        ))
        .create_async()
        .await;
    let cancel = server
        .mock("POST", format!("{TASKS_PATH}/WT1").as_str())
        .match_body(form(&[
            ("AssignmentStatus", "canceled"),
            ("Reason", "IVR path selected"),
        ]))
        .with_status(200)
        .with_body(task_body("WT1", "{}", "canceled"))
        .create_async()
        .await;
    let create = server
        .mock("POST", TASKS_PATH)
        .expect(0)
        .create_async()
        .await;
    let update = server
        .mock("POST", format!("{ITEMS_PATH}/C1").as_str())
        .match_body(form(&[("Data", "{}"), ("ItemTtl", "86400")]))
        .with_status(200)
        .with_body(item_body("C1", "{}"))
        .create_async()
        .await;
    let event = RoutingEvent::new(CallSid::new("C1")?, IvrPath::new("main/exit"))
        .with_active_task(TaskSid::new("WT1")?)
        .final_step();

    let outcome = coordinator(&server.url())?.apply(&event).await?;

    fetch.assert_async().await;
    cancel.assert_async().await;
    create.assert_async().await;
    update.assert_async().await;
    assert_eq!(outcome.task_sid, None);
    let canceled = outcome.canceled.ok_or("task should be canceled")?;
    assert_eq!(canceled.ivr_time, 37);
    assert_eq!(
        canceled.attributes,
        json!({
            "conversations": {
                "conversation_attribute_1": "C1",
                "ivr_path": "main/exit",
                "abandoned": "No",
                "ivr_time": 37
            }
        })
    );
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn creation_failure_status_reaches_the_reply() -> Result<(), TestError> {
    let mut server = Server::new_async().await;
    let _create = server
        .mock("POST", TASKS_PATH)
        .with_status(503)
        .with_body(error_body(503, 20_503, "Service Unavailable"))
        .create_async()
        .await;
    let sync = server
        .mock("POST", mockito::Matcher::Regex("^/v1/Services/.*".to_owned()))
        .expect(0)
        .create_async()
        .await;
    let handler = IvrMetricsHandler::new(coordinator(&server.url())?);

    let reply = handler
        .handle(&json!({
            "callSid": "C1",
            "isFinalIvrTask": "false",
            "ivrPath": "main"
        }))
        .await;

    sync.assert_async().await;
    assert_eq!(
        serde_json::to_value(&reply)?,
        json!({
            "statusCode": 503,
            "body": {
                "success": false,
                "message": "Error encountered. Twilio API returned 503: Service Unavailable"
            }
        })
    );
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn entering_a_step_replies_with_the_new_task() -> Result<(), TestError> {
    let mut server = Server::new_async().await;
    let _create = server
        .mock("POST", TASKS_PATH)
        .match_body(form(&[("TaskChannel", "voice"), ("WorkflowSid", "WW1")]))
        .with_status(201)
        .with_body(task_body("WT2", "{}", "pending"))
        .create_async()
        .await;
    let _update = server
        .mock("POST", format!("{ITEMS_PATH}/C1").as_str())
        .match_body(form(&[("Data", r#"{"activeTask":"WT2"}"#)]))
        .with_status(200)
        .with_body(item_body("C1", r#"{"activeTask":"WT2"}"#))
        .create_async()
        .await;
    let handler = IvrMetricsHandler::new(coordinator(&server.url())?);

    let reply = handler
        .handle(&json!({
            "activeTaskSid": "",
            "callSid": "C1",
            "firstIvrTaskSid": "WT0",
            "isFinalIvrTask": "false",
            "ivrPath": "main"
        }))
        .await;

    assert_eq!(
        serde_json::to_value(&reply)?,
        json!({"taskSid": "WT2", "status": 200})
    );
    Ok(())
}
