//! Editor error types and the generic error presentation hook

use parking_lot::Mutex;
use thiserror::Error;

/// Message discriminator the backend sends with a 409 when another gauge
/// already owns the MBean.
pub const DUPLICATE_MBEAN_MESSAGE: &str = "mbeanObjectName";

/// Failure reported by the HTTP collaborator.
///
/// `status` is `0` when no response was received at all.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", self.describe())]
pub struct HttpError {
    pub status: u16,
    pub message: Option<String>,
}

impl HttpError {
    /// Connection refused, timeout, TLS failure, ...
    pub fn network(detail: impl Into<String>) -> Self {
        Self {
            status: 0,
            message: Some(detail.into()),
        }
    }

    pub fn status(status: u16, message: Option<String>) -> Self {
        Self { status, message }
    }

    pub fn is_network(&self) -> bool {
        self.status == 0
    }

    /// 409 raised because another gauge already claims the MBean.
    pub fn is_duplicate_mbean_conflict(&self) -> bool {
        self.status == 409 && self.message.as_deref() == Some(DUPLICATE_MBEAN_MESSAGE)
    }

    fn describe(&self) -> String {
        if self.is_network() {
            return "Unable to connect to server".to_string();
        }
        match &self.message {
            Some(message) => message.clone(),
            None => format!("Request failed with status {}", self.status),
        }
    }
}

/// Errors surfaced by [`crate::GaugeEditor`] operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EditorError {
    #[error(transparent)]
    Http(#[from] HttpError),

    #[error("There is already a gauge for this MBean")]
    DuplicateMBean,

    #[error("Unexpected response from server: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Gauge configuration has not been loaded")]
    NotLoaded,

    #[error("Gauge has not been saved yet")]
    NotSaved,

    #[error("Save is disabled: {0}")]
    SaveBlocked(&'static str),
}

pub type EditorResult<T> = Result<T, EditorError>;

/// Generic error presentation for failures that are not handled inline.
pub trait ErrorPresenter: Send + Sync {
    fn present(&self, error: &EditorError);
}

/// Reports errors through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogErrorPresenter;

impl ErrorPresenter for LogErrorPresenter {
    fn present(&self, error: &EditorError) {
        match error {
            EditorError::Http(http) => {
                tracing::error!(status = http.status, detail = ?http.message, "{}", http)
            }
            other => tracing::error!("{}", other),
        }
    }
}

/// Keeps the display text of every presented error.
#[derive(Debug, Default)]
pub struct RecordingErrorPresenter {
    presented: Mutex<Vec<String>>,
}

impl RecordingErrorPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn presented(&self) -> Vec<String> {
        self.presented.lock().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.presented.lock().is_empty()
    }
}

impl ErrorPresenter for RecordingErrorPresenter {
    fn present(&self, error: &EditorError) {
        self.presented.lock().push(error.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_errors_have_a_fixed_message() {
        let err = HttpError::network("connection refused");
        assert!(err.is_network());
        assert_eq!(err.to_string(), "Unable to connect to server");
    }

    #[test]
    fn status_errors_prefer_server_message() {
        assert_eq!(
            HttpError::status(500, Some("boom".to_string())).to_string(),
            "boom"
        );
        assert_eq!(
            HttpError::status(503, None).to_string(),
            "Request failed with status 503"
        );
    }

    #[test]
    fn only_409_with_discriminator_is_a_duplicate() {
        assert!(HttpError::status(409, Some("mbeanObjectName".to_string()))
            .is_duplicate_mbean_conflict());
        assert!(!HttpError::status(409, Some("other".to_string())).is_duplicate_mbean_conflict());
        assert!(!HttpError::status(400, Some("mbeanObjectName".to_string()))
            .is_duplicate_mbean_conflict());
        assert!(!HttpError::status(409, None).is_duplicate_mbean_conflict());
    }

    #[test]
    fn duplicate_error_message() {
        assert_eq!(
            EditorError::DuplicateMBean.to_string(),
            "There is already a gauge for this MBean"
        );
    }

    #[test]
    fn recording_presenter_collects_messages() {
        let presenter = RecordingErrorPresenter::new();
        presenter.present(&EditorError::Http(HttpError::status(500, None)));
        presenter.present(&EditorError::NotLoaded);
        assert_eq!(
            presenter.presented(),
            vec![
                "Request failed with status 500".to_string(),
                "Gauge configuration has not been loaded".to_string()
            ]
        );
    }
}
