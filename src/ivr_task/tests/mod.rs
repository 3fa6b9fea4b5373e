//! Unit tests for the IVR task module.


use crate::ivr_task::{
    domain::{NewTask, TaskRecord, TaskSid, TaskUpdate},
    ports::{TaskRouter, TaskRouterResult},
};
use async_trait::async_trait;
use mockall::mock;

mock! {
    pub Router {}

    #[async_trait]
    impl TaskRouter for Router {
        async fn create_task(&self, task: &NewTask) -> TaskRouterResult<TaskRecord>;
        async fn fetch_task(&self, sid: &TaskSid) -> TaskRouterResult<TaskRecord>;
        async fn update_task(&self, sid: &TaskSid, update: &TaskUpdate)
        -> TaskRouterResult<TaskRecord>;
    }
}
