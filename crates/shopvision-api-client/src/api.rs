//! Task endpoints of the shopvision backend.

use reqwest::multipart::{Form, Part};
use shopvision_core::{
    ClassificationResult, SearchResult, SelectedFile, TaskError, TaskKind, TaskResult,
};

use crate::ApiClient;

/// Connectivity check endpoint.
pub const HEALTH_PATH: &str = "/health";

/// Multipart field carrying the image.
pub const IMAGE_FIELD: &str = "image";

/// Single-part form with the file under [`IMAGE_FIELD`].
pub fn image_form(file: &SelectedFile) -> Form {
    let part = || Part::bytes(file.payload().to_vec()).file_name(file.name().to_string());
    let part = part().mime_str(file.mime_type()).unwrap_or_else(|_| part());
    Form::new().part(IMAGE_FIELD, part)
}

impl ApiClient {
    /// POST the file to the task's endpoint and parse the body into a result.
    pub async fn run_task(
        &self,
        kind: TaskKind,
        file: &SelectedFile,
    ) -> Result<TaskResult, TaskError> {
        match kind {
            TaskKind::Classify => self.classify(file).await.map(TaskResult::Classification),
            TaskKind::Search => self.search(file).await.map(TaskResult::Search),
        }
    }

    /// Classify the image as shop / not shop.
    pub async fn classify(&self, file: &SelectedFile) -> Result<ClassificationResult, TaskError> {
        let body = self
            .post_multipart(TaskKind::Classify.endpoint(), image_form(file))
            .await?;
        Ok(ClassificationResult::from_body(&body)?)
    }

    /// Search for similar indexed images.
    pub async fn search(&self, file: &SelectedFile) -> Result<SearchResult, TaskError> {
        let body = self
            .post_multipart(TaskKind::Search.endpoint(), image_form(file))
            .await?;
        Ok(SearchResult::from_body(&body)?)
    }

    /// GET /health. Any JSON body counts as healthy.
    pub async fn health(&self) -> Result<serde_json::Value, TaskError> {
        self.get_json(HEALTH_PATH).await
    }
}

/// Notification text for a health check outcome.
pub fn health_notification(outcome: &Result<serde_json::Value, TaskError>) -> String {
    match outcome {
        Ok(body) => format!("Backend OK: {}", body),
        Err(err) => format!("Backend connection failed: {}", err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn health_messages() {
        assert_eq!(
            health_notification(&Ok(json!({"status": "healthy"}))),
            r#"Backend OK: {"status":"healthy"}"#
        );
        assert_eq!(
            health_notification(&Err(TaskError::backend(503, None))),
            "Backend connection failed: Request failed with status code 503"
        );
    }
}
