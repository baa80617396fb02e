use reqwest::Client;

use crate::domain::models::DeferredTask;

/// Posts a deferred task to its endpoint as a form.
#[derive(Clone)]
pub struct HttpTaskDelivery {
    http: Client,
    base_url: String,
}

impl HttpTaskDelivery {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        Ok(Self {
            http: Client::builder().user_agent("linebot/task-queue").build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn url_for(&self, task: &DeferredTask) -> String {
        format!("{}{}", self.base_url, task.path())
    }

    pub async fn deliver(&self, task: &DeferredTask) -> anyhow::Result<()> {
        let response = self
            .http
            .post(self.url_for(task))
            .form(&task.form_fields())
            .send()
            .await?;

        if response.status().is_server_error() {
            anyhow::bail!("task endpoint answered {}", response.status());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joins_base_and_task_path() {
        let delivery = HttpTaskDelivery::new("http://localhost:8080/").unwrap();
        let task = DeferredTask::Unsupported {
            user_id: "U1".to_string(),
        };

        assert_eq!(
            delivery.url_for(&task),
            "http://localhost:8080/task/unsupported"
        );
    }
}
