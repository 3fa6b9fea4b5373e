//! `TaskRouter` adapter requests and status mapping.

use crate::twilio_http::helpers::{
    BASIC_AUTH, TASKS_PATH, TestError, error_body, form, task_body, task_router,
};
use ivr_metrics::ivr_task::{
    domain::{AssignmentStatus, NewTask, TaskSid, TaskUpdate, WorkflowSid},
    ports::{TaskRouter, TaskRouterError},
};
use mockito::{Matcher, Server};
use serde_json::json;

#[tokio::test(flavor = "multi_thread")]
async fn create_task_posts_channel_workflow_and_attributes() -> Result<(), TestError> {
    let attributes = r#"{"conversations":{"conversation_attribute_1":"C1","ivr_path":"main"}}"#;
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", TASKS_PATH)
        .match_header("authorization", BASIC_AUTH)
        .match_header(
            "content-type",
            Matcher::Regex("application/x-www-form-urlencoded".to_owned()),
        )
        .match_body(form(&[
            ("Attributes", attributes),
            ("TaskChannel", "voice"),
            ("WorkflowSid", "WW1"),
        ]))
        .with_status(201)
        .with_body(task_body("WT1", attributes, "pending"))
        .create_async()
        .await;

    let record = task_router(&server.url())
        .create_task(&NewTask {
            workflow_sid: WorkflowSid::new("WW1")?,
            task_channel: "voice".to_owned(),
            attributes: json!({
                "conversations": {"conversation_attribute_1": "C1", "ivr_path": "main"}
            }),
        })
        .await?;

    mock.assert_async().await;
    assert_eq!(record.sid().as_str(), "WT1");
    assert_eq!(record.attributes(), Some(attributes));
    assert_eq!(record.assignment_status(), Some(AssignmentStatus::Pending));
    assert_eq!(record.date_created(), Some("2024-05-14T18:50:02Z"));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn cancel_update_posts_status_and_reason() -> Result<(), TestError> {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", format!("{TASKS_PATH}/WT1").as_str())
        .match_body(form(&[
            ("AssignmentStatus", "canceled"),
            ("Reason", "IVR path selected"),
            ("Attributes", r#"{"conversations":{"abandoned":"No"}}"#),
        ]))
        .with_status(200)
        .with_body(task_body("WT1", "{}", "canceled"))
        .create_async()
        .await;

    let record = task_router(&server.url())
        .update_task(
            &TaskSid::new("WT1")?,
            &TaskUpdate {
                attributes: json!({"conversations": {"abandoned": "No"}}),
                assignment_status: AssignmentStatus::Canceled,
                reason: "IVR path selected".to_owned(),
            },
        )
        .await?;

    mock.assert_async().await;
    assert_eq!(record.assignment_status(), Some(AssignmentStatus::Canceled));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn fetching_an_unknown_task_is_not_found() -> Result<(), TestError> {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", format!("{TASKS_PATH}/WT404").as_str())
        .with_status(404)
        .with_body(error_body(404, 20_404, "The requested resource was not found"))
        .create_async()
        .await;
    let sid = TaskSid::new("WT404")?;

    let result = task_router(&server.url()).fetch_task(&sid).await;

    mock.assert_async().await;
    assert!(matches!(result, Err(TaskRouterError::NotFound(ref missing)) if *missing == sid));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn rejected_creation_carries_status_and_message() -> Result<(), TestError> {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", TASKS_PATH)
        .with_status(400)
        .with_body(error_body(400, 20_001, "Invalid WorkflowSid"))
        .create_async()
        .await;

    let result = task_router(&server.url())
        .create_task(&NewTask {
            workflow_sid: WorkflowSid::new("WW-bad")?,
            task_channel: "voice".to_owned(),
            attributes: json!({}),
        })
        .await;

    let Err(err) = result else {
        return Err("creation should fail".into());
    };
    assert_eq!(err.status(), Some(400));
    assert_eq!(err.to_string(), "Twilio API returned 400: Invalid WorkflowSid");
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn malformed_success_body_is_invalid_response() -> Result<(), TestError> {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", format!("{TASKS_PATH}/WT1").as_str())
        .with_status(200)
        .with_body("not json")
        .create_async()
        .await;

    let result = task_router(&server.url())
        .fetch_task(&TaskSid::new("WT1")?)
        .await;

    assert!(matches!(result, Err(TaskRouterError::InvalidResponse(_))));
    Ok(())
}
