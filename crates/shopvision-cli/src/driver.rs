//! Runs session effects against the real world.
//!
//! The session reducer never blocks; this driver executes the effects it returns
//! (preview decoding, task dispatch) and feeds the outcomes back until the queue
//! is empty.

use std::collections::VecDeque;

use shopvision_api_client::TaskDispatcher;
use shopvision_core::{derive_preview, Action, Effect, Session};

pub struct Driver {
    session: Session,
    dispatcher: TaskDispatcher,
    notifications: Vec<String>,
}

impl Driver {
    pub fn new(session: Session, dispatcher: TaskDispatcher) -> Self {
        Self {
            session,
            dispatcher,
            notifications: Vec::new(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Notifications raised since the last call.
    pub fn take_notifications(&mut self) -> Vec<String> {
        std::mem::take(&mut self.notifications)
    }

    /// Apply `action` and run every effect it causes.
    pub async fn apply(&mut self, action: Action) {
        let mut queue: VecDeque<Effect> = self.session.apply(action).into();

        while let Some(effect) = queue.pop_front() {
            let follow_up = match effect {
                Effect::PreventDefault => None,
                Effect::ClearFileInput => {
                    tracing::debug!("File input cleared");
                    None
                }
                Effect::Notify(message) => {
                    self.notifications.push(message);
                    None
                }
                Effect::DecodePreview { generation, file } => {
                    Some(match derive_preview(file).await {
                        Ok(preview) => Action::PreviewReady {
                            generation,
                            preview,
                        },
                        Err(error) => Action::PreviewFailed { generation, error },
                    })
                }
                Effect::Dispatch {
                    generation,
                    kind,
                    file,
                } => Some(match self.dispatcher.dispatch(kind, Some(&file)).await {
                    Ok(result) => Action::TaskSucceeded { generation, result },
                    Err(error) => Action::TaskFailed {
                        generation,
                        kind,
                        error,
                    },
                }),
            };

            if let Some(action) = follow_up {
                queue.extend(self.session.apply(action));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb, RgbImage};
    use mockito::Server;
    use shopvision_api_client::ApiClient;
    use shopvision_core::{
        DragEvent, FilePreview, RawFile, ResultView, TaskKind, TaskState,
    };
    use std::io::Cursor;

    fn png_bytes() -> Vec<u8> {
        let img = RgbImage::from_pixel(4, 4, Rgb([10, 120, 200]));
        let mut buffer = Vec::new();
        img.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
            .unwrap();
        buffer
    }

    fn driver_for(url: String) -> Driver {
        let client = ApiClient::new(url, None).unwrap();
        Driver::new(Session::default(), TaskDispatcher::new(client))
    }

    #[tokio::test]
    async fn select_preview_and_classify() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/api/task1/classify")
            .with_status(200)
            .with_body(r#"{"data":{"label":"shop","probability":0.92,"shop_prob":0.92,"not_shop_prob":0.08,"shop_names":["Acme"]}}"#)
            .create_async()
            .await;

        let mut driver = driver_for(server.url());
        driver
            .apply(Action::SelectFile(Some(RawFile::new(
                "storefront.png",
                "image/png",
                png_bytes(),
            ))))
            .await;
        assert!(matches!(
            driver.session().preview(),
            Some(FilePreview::Image {
                width: 4,
                height: 4,
                ..
            })
        ));

        driver.apply(Action::StartTask(TaskKind::Classify)).await;
        mock.assert_async().await;

        assert!(driver.take_notifications().is_empty());
        assert_eq!(driver.session().task_state(), TaskState::Idle);
        let Some(ResultView::Classification(view)) = driver.session().result_view() else {
            panic!("expected a classification view");
        };
        assert_eq!(view.confidence, "92.0%");
    }

    #[tokio::test]
    async fn drop_uses_first_file() {
        let mut driver = driver_for("http://127.0.0.1:9".to_string());
        driver
            .apply(Action::Drag(DragEvent::Drop {
                files: vec![
                    RawFile::new("first.png", "image/png", png_bytes()),
                    RawFile::new("second.png", "image/png", png_bytes()),
                ],
            }))
            .await;

        let session = driver.session();
        assert_eq!(session.selected().map(|f| f.name()), Some("first.png"));
        assert!(session.preview().map(|p| p.is_available()).unwrap_or(false));
    }

    #[tokio::test]
    async fn undecodable_file_keeps_selection() {
        let mut driver = driver_for("http://127.0.0.1:9".to_string());
        driver
            .apply(Action::SelectFile(Some(RawFile::new(
                "broken.jpg",
                "image/jpeg",
                b"not really a jpeg".to_vec(),
            ))))
            .await;

        let session = driver.session();
        assert!(session.selected().is_some());
        assert_eq!(session.preview(), None);
        assert_eq!(
            session.validation_error().map(|e| e.to_string()),
            Some("Failed to read image file".to_string())
        );
    }

    #[tokio::test]
    async fn task_without_file_notifies() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/api/task2/search")
            .expect(0)
            .create_async()
            .await;

        let mut driver = driver_for(server.url());
        driver.apply(Action::StartTask(TaskKind::Search)).await;

        assert_eq!(
            driver.take_notifications(),
            vec!["Please select an image first".to_string()]
        );
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn backend_failure_notifies_with_detail() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/api/task2/search")
            .with_status(400)
            .with_body(r#"{"detail":"No filename provided"}"#)
            .create_async()
            .await;

        let mut driver = driver_for(server.url());
        driver
            .apply(Action::SelectFile(Some(RawFile::new(
                "IMG_2001.heic",
                "image/heic",
                b"heic".to_vec(),
            ))))
            .await;
        assert_eq!(driver.session().preview(), Some(&FilePreview::Unavailable));

        driver.apply(Action::StartTask(TaskKind::Search)).await;
        assert_eq!(
            driver.take_notifications(),
            vec!["Search failed: No filename provided".to_string()]
        );
        assert_eq!(driver.session().result(), None);
        assert_eq!(driver.session().task_state(), TaskState::Idle);
    }
}
