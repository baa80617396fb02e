use serde::Deserialize;

/// Form body posted by the task queue.
#[derive(Debug, Deserialize)]
pub struct TaskRequestDto {
    pub mid: String,
    #[serde(default)]
    pub text: String,
}
