use serde::{Deserialize, Serialize};

pub const ANALYSIS_TASK_PATH: &str = "/task/morphological-analysis";
pub const UNSUPPORTED_TASK_PATH: &str = "/task/unsupported";

/// Follow-up work handed to the task queue and executed by a task endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DeferredTask {
    Analysis { user_id: String, text: String },
    Unsupported { user_id: String },
}

impl DeferredTask {
    pub fn path(&self) -> &'static str {
        match self {
            DeferredTask::Analysis { .. } => ANALYSIS_TASK_PATH,
            DeferredTask::Unsupported { .. } => UNSUPPORTED_TASK_PATH,
        }
    }

    pub fn user_id(&self) -> &str {
        match self {
            DeferredTask::Analysis { user_id, .. } | DeferredTask::Unsupported { user_id } => {
                user_id
            }
        }
    }

    /// Form-encoded body understood by the task endpoints.
    pub fn form_fields(&self) -> Vec<(&'static str, &str)> {
        match self {
            DeferredTask::Analysis { user_id, text } => {
                vec![("mid", user_id.as_str()), ("text", text.as_str())]
            }
            DeferredTask::Unsupported { user_id } => vec![("mid", user_id.as_str())],
        }
    }
}
