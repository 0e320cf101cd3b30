//! Gauge editor - configuration screen logic for JVM MBean gauges
//!
//! A gauge selects one MBean on a monitored JVM and the subset of its numeric
//! attributes to sample. This crate provides:
//! - [`GaugeEditor`], the load / edit / save / delete workflow
//! - Reconciliation of live MBean attributes with a saved selection
//! - A `reqwest` transport for the monitoring backend
//! - An in-memory navigation history
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use gauge_editor::{ClientConfig, GaugeEditor, HistoryNavigator, ReqwestTransport};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ClientConfig::new().with_server_id("prod-1");
//! let transport = Arc::new(ReqwestTransport::from_config(&config)?);
//! let navigator = Arc::new(HistoryNavigator::new("config/gauge"));
//!
//! let mut editor = GaugeEditor::new(&config.server_id, transport, navigator.clone());
//! editor.load().await?;
//! editor.set_mbean_object_name("java.lang:type=Memory");
//! editor.select_mbean_object_name().await?;
//! editor.set_attribute_checked("HeapMemoryUsage.used", true);
//!
//! let outcome = editor.save().await?;
//! outcome.redirect.run(navigator.as_ref()).await;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
mod editor;
pub mod error;
pub mod loading;
pub mod model;
pub mod navigation;
pub mod reconcile;
pub mod transport;

pub use api::GaugeApi;
pub use config::{ClientConfig, ConfigError};
pub use editor::{
    DEFAULT_SUGGESTION_LIMIT, GAUGE_LIST_PATH, GaugeEditor, PostSaveRedirect, SaveOutcome,
    VERSION_PARAM,
};
pub use error::{
    EditorError, EditorResult, ErrorPresenter, HttpError, LogErrorPresenter,
    RecordingErrorPresenter,
};
pub use loading::{InFlight, InFlightGuard};
pub use model::{
    AttributeChoice, GaugeConfig, GaugeResponse, MBeanAttribute, MBeanAttributesResponse,
};
pub use navigation::{HistoryMode, HistoryNavigator, LeaveDecision, Navigator};
pub use transport::{HttpTransport, ReqwestTransport};
