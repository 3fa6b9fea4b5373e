//! Given steps for IVR transition BDD scenarios.

use super::world::{IvrWorld, run_async};
use chrono::Duration;
use eyre::WrapErr;
use ivr_metrics::{
    call_state::{domain::CallSid, services::CallStateRecorder},
    ivr_task::domain::{TaskRecord, TaskSid},
    twilio::ApiFailure,
};
use mockable::Clock;
use rstest_bdd_macros::given;
use std::sync::Arc;

#[given(r#"a call "{call_sid}" with no active IVR task"#)]
fn call_without_active_task(world: &mut IvrWorld, call_sid: String) {
    world.call_sid = Some(call_sid);
    world.active_task = None;
}

#[given(r#"a call "{call_sid}" whose active task "{task_sid}" was created {seconds:i64} seconds ago"#)]
fn call_with_active_task(
    world: &mut IvrWorld,
    call_sid: String,
    task_sid: String,
    seconds: i64,
) -> Result<(), eyre::Report> {
    let sid = TaskSid::new(task_sid).wrap_err("construct active task SID")?;
    let created = world.clock.utc() - Duration::seconds(seconds);
    world
        .router
        .insert_task(
            TaskRecord::new(sid.clone())
                .with_attributes(format!(
                    r#"{{"conversations":{{"conversation_attribute_1":"{call_sid}","ivr_path":"main"}}}}"#
                ))
                .with_date_created(created.to_rfc2822()),
        )
        .wrap_err("seed active task")?;

    let call = CallSid::new(call_sid.clone()).wrap_err("construct call SID")?;
    let recorder = CallStateRecorder::new(Arc::new(world.store.clone()));
    run_async(recorder.record(&call, Some(&sid))).wrap_err("seed call entry")?;

    world.call_sid = Some(call_sid);
    world.active_task = Some(sid);
    Ok(())
}

#[given("the task router rejects new tasks with status {status:u16}")]
fn router_rejects_new_tasks(world: &mut IvrWorld, status: u16) -> Result<(), eyre::Report> {
    world
        .router
        .reject_creation(ApiFailure {
            status,
            code: None,
            message: "Service Unavailable".to_owned(),
        })
        .wrap_err("inject task creation failure")
}
