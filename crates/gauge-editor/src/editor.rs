//! Gauge editor
//!
//! [`GaugeEditor`] owns the state of the gauge configuration screen: the
//! working config and its loaded snapshot, the attribute checklist of the
//! selected MBean, and the validation flags reported by the backend. Every
//! handler takes the editor explicitly; there is no ambient screen state.
//!
//! The checklist is the source of truth for `config.mbean_attributes`: every
//! checklist mutation re-projects the checked rows into the config.

use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::api::GaugeApi;
use crate::error::{EditorError, EditorResult, ErrorPresenter, LogErrorPresenter};
use crate::loading::InFlight;
use crate::model::{
    AttributeChoice, GaugeConfig, GaugeRemovePayload, GaugeResponse, GaugeSavePayload,
};
use crate::navigation::{HistoryMode, LeaveDecision, Navigator};
use crate::reconcile::{
    NEW_GAUGE_HEADING, format_heading, merge_attribute_choices, project_checked,
    sort_attributes,
};
use crate::transport::HttpTransport;

/// Query parameter carrying the gauge version on the editor URL.
pub const VERSION_PARAM: &str = "v";
/// Screen the editor returns to after save and delete.
pub const GAUGE_LIST_PATH: &str = "config/gauge-list";
pub const DEFAULT_SUGGESTION_LIMIT: usize = 10;

const WILDCARD: char = '*';

/// Result of a successful save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveOutcome {
    /// "Saved" for an update, "Added" for a create
    pub message: &'static str,
    pub version: String,
    pub redirect: PostSaveRedirect,
}

/// Deferred navigation back to the gauge list after a save.
///
/// The current entry must be rewritten to the new version before the list
/// entry is pushed, otherwise going back would land on a stale revision.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "the editor URL keeps the old version until the redirect runs"]
pub struct PostSaveRedirect {
    version: String,
}

impl PostSaveRedirect {
    pub fn version(&self) -> &str {
        &self.version
    }

    pub async fn run(self, navigator: &dyn Navigator) {
        tokio::task::yield_now().await;
        navigator.replace_query(VERSION_PARAM, &self.version);

        tokio::task::yield_now().await;
        navigator.navigate(GAUGE_LIST_PATH, HistoryMode::Push);
    }
}

#[derive(Debug, Clone, Default)]
struct EditorState {
    /// Version the screen was opened with, updated after each save
    version: Option<String>,
    loaded: bool,
    config: Option<GaugeConfig>,
    original_config: Option<GaugeConfig>,
    heading: String,
    /// Last object name attributes were fetched for
    selected_mbean_object_name: Option<String>,
    mbean_unavailable: bool,
    mbean_unmatched: bool,
    duplicate_mbean: bool,
    attribute_choices: Vec<AttributeChoice>,
    form_invalid: bool,
    leave_guard_attached: bool,
}

pub struct GaugeEditor {
    server_id: String,
    api: GaugeApi,
    navigator: Arc<dyn Navigator>,
    presenter: Arc<dyn ErrorPresenter>,
    suggestion_limit: usize,
    suggestion_spinner: InFlight,
    attributes_loading: InFlight,
    state: EditorState,
}

impl GaugeEditor {
    pub fn new(
        server_id: impl Into<String>,
        transport: Arc<dyn HttpTransport>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            server_id: server_id.into(),
            api: GaugeApi::new(transport),
            navigator,
            presenter: Arc::new(LogErrorPresenter),
            suggestion_limit: DEFAULT_SUGGESTION_LIMIT,
            suggestion_spinner: InFlight::new(),
            attributes_loading: InFlight::new(),
            state: EditorState {
                leave_guard_attached: true,
                ..Default::default()
            },
        }
    }

    pub fn with_presenter(mut self, presenter: Arc<dyn ErrorPresenter>) -> Self {
        self.presenter = presenter;
        self
    }

    pub fn with_suggestion_limit(mut self, limit: usize) -> Self {
        self.suggestion_limit = limit;
        self
    }

    // ---------------------------------------------------------------------
    // Load
    // ---------------------------------------------------------------------

    /// Load the gauge named by the `v` query parameter, or start a new one.
    #[instrument(skip(self), fields(server_id = %self.server_id))]
    pub async fn load(&mut self) -> EditorResult<()> {
        let version = self
            .navigator
            .query_param(VERSION_PARAM)
            .filter(|v| !v.is_empty());
        self.state.version = version.clone();

        match version {
            Some(version) => {
                let response = match self.api.gauge(&self.server_id, &version).await {
                    Ok(response) => response,
                    Err(e) => return Err(self.present(e)),
                };
                self.state.loaded = true;
                self.apply_response(response);
            }
            None => {
                self.state.loaded = true;
                self.apply_response(GaugeResponse::default());
            }
        }
        Ok(())
    }

    /// Install a server copy of the gauge as both working config and snapshot.
    fn apply_response(&mut self, response: GaugeResponse) {
        let GaugeResponse {
            mut config,
            mbean_unavailable,
            mbean_unmatched,
            mbean_available_attribute_names,
        } = response;

        sort_attributes(&mut config.mbean_attributes);

        if config.has_mbean_object_name() {
            self.state.heading = format_heading(&config.display);
            self.state.selected_mbean_object_name = Some(config.mbean_object_name.clone());
            self.state.mbean_unavailable = mbean_unavailable;
            self.state.mbean_unmatched = mbean_unmatched;
            self.state.attribute_choices =
                merge_attribute_choices(&mbean_available_attribute_names, &config.mbean_attributes);
        } else {
            self.state.heading = NEW_GAUGE_HEADING.to_string();
        }

        debug!(
            mbean = %config.mbean_object_name,
            attributes = config.mbean_attributes.len(),
            "gauge config loaded"
        );
        self.state.original_config = Some(config.clone());
        self.state.config = Some(config);
    }

    // ---------------------------------------------------------------------
    // Accessors
    // ---------------------------------------------------------------------

    pub fn loaded(&self) -> bool {
        self.state.loaded
    }

    pub fn config(&self) -> Option<&GaugeConfig> {
        self.state.config.as_ref()
    }

    pub fn original_config(&self) -> Option<&GaugeConfig> {
        self.state.original_config.as_ref()
    }

    pub fn heading(&self) -> &str {
        &self.state.heading
    }

    pub fn attribute_choices(&self) -> &[AttributeChoice] {
        &self.state.attribute_choices
    }

    pub fn selected_mbean_object_name(&self) -> Option<&str> {
        self.state.selected_mbean_object_name.as_deref()
    }

    pub fn mbean_unavailable(&self) -> bool {
        self.state.mbean_unavailable
    }

    pub fn mbean_unmatched(&self) -> bool {
        self.state.mbean_unmatched
    }

    pub fn duplicate_mbean(&self) -> bool {
        self.state.duplicate_mbean
    }

    /// Shared handle, active while any suggestion lookup is running.
    pub fn suggestion_spinner(&self) -> InFlight {
        self.suggestion_spinner.clone()
    }

    /// Shared handle, active while attributes of a new MBean are fetched.
    pub fn attributes_loading(&self) -> InFlight {
        self.attributes_loading.clone()
    }

    // ---------------------------------------------------------------------
    // Change detection and validation
    // ---------------------------------------------------------------------

    pub fn has_changes(&self) -> bool {
        self.state.config != self.state.original_config
    }

    /// Check run by the navigation layer before leaving the screen.
    pub fn on_location_change_start(&self) -> LeaveDecision {
        if self.state.leave_guard_attached && self.has_changes() {
            LeaveDecision::ConfirmUnsavedChanges
        } else {
            LeaveDecision::Proceed
        }
    }

    pub fn has_mbean_object_name_error(&self) -> bool {
        match &self.state.config {
            None => true,
            Some(config) => {
                !config.has_mbean_object_name()
                    || self.state.mbean_unavailable
                    || self.state.mbean_unmatched
                    || self.state.duplicate_mbean
            }
        }
    }

    pub fn save_disabled(&self) -> bool {
        self.save_blocked_reason().is_some()
    }

    fn save_blocked_reason(&self) -> Option<&'static str> {
        let config = match &self.state.config {
            Some(config) => config,
            None => return Some("configuration not loaded"),
        };
        if !self.has_changes() {
            Some("no changes")
        } else if config.mbean_attributes.is_empty() {
            Some("no attributes selected")
        } else if self.state.form_invalid {
            Some("form is invalid")
        } else if self.state.mbean_unavailable {
            Some("MBean is unavailable")
        } else if self.state.mbean_unmatched {
            Some("MBean object name does not match any MBean")
        } else if self.state.duplicate_mbean {
            Some("another gauge already uses this MBean")
        } else {
            None
        }
    }

    // ---------------------------------------------------------------------
    // Bindings
    // ---------------------------------------------------------------------

    /// Text-field binding for the object name. Does not fetch anything; call
    /// [`Self::select_mbean_object_name`] once the user commits the value.
    pub fn set_mbean_object_name(&mut self, name: &str) {
        if let Some(config) = self.state.config.as_mut() {
            config.mbean_object_name = name.to_string();
        }
    }

    pub fn set_form_invalid(&mut self, invalid: bool) {
        self.state.form_invalid = invalid;
    }

    /// Returns `false` if no checklist row has this name.
    pub fn set_attribute_checked(&mut self, name: &str, checked: bool) -> bool {
        self.update_choice(name, |choice| choice.checked = checked)
    }

    /// Returns `false` if no checklist row has this name.
    pub fn set_attribute_counter(&mut self, name: &str, counter: bool) -> bool {
        self.update_choice(name, |choice| choice.counter = counter)
    }

    pub fn set_attribute_choices(&mut self, choices: Vec<AttributeChoice>) {
        if self.state.attribute_choices != choices {
            self.state.attribute_choices = choices;
            self.recompute_mbean_attributes();
        }
    }

    fn update_choice(&mut self, name: &str, update: impl FnOnce(&mut AttributeChoice)) -> bool {
        let Some(choice) = self
            .state
            .attribute_choices
            .iter_mut()
            .find(|choice| choice.name == name)
        else {
            return false;
        };

        let before = choice.clone();
        update(choice);
        if *choice != before {
            self.recompute_mbean_attributes();
        }
        true
    }

    /// Re-project the checklist into `config.mbean_attributes`, skipping
    /// writes that would not change anything.
    fn recompute_mbean_attributes(&mut self) {
        let state = &mut self.state;
        let Some(config) = state.config.as_mut() else {
            return;
        };
        let projected = project_checked(&state.attribute_choices);
        if config.mbean_attributes != projected {
            config.mbean_attributes = projected;
        }
    }

    // ---------------------------------------------------------------------
    // MBean selection
    // ---------------------------------------------------------------------

    /// Object-name suggestions for a partial name.
    ///
    /// Wildcard patterns are returned as-is without a lookup.
    #[instrument(skip(self), fields(server_id = %self.server_id))]
    pub async fn mbean_object_names(&self, fragment: &str) -> EditorResult<Vec<String>> {
        if fragment.contains(WILDCARD) {
            return Ok(vec![fragment.to_string()]);
        }

        let _spinner = self.suggestion_spinner.enter();
        self.api
            .matching_mbean_objects(&self.server_id, fragment, self.suggestion_limit)
            .await
            .map_err(|e| self.present(e))
    }

    /// Commit the object name currently in the text field.
    ///
    /// Returns `true` if this was a new selection and attributes were
    /// re-fetched; re-selecting the confirmed name is a no-op.
    #[instrument(skip(self), fields(server_id = %self.server_id))]
    pub async fn select_mbean_object_name(&mut self) -> EditorResult<bool> {
        let name = match &self.state.config {
            Some(config) => config.mbean_object_name.clone(),
            None => return Err(EditorError::NotLoaded),
        };

        if self.state.selected_mbean_object_name.as_deref() == Some(name.as_str()) {
            debug!(mbean = %name, "object name unchanged, keeping attributes");
            return Ok(false);
        }

        self.state.selected_mbean_object_name = Some(name.clone());
        self.fetch_mbean_attributes(&name).await?;
        Ok(true)
    }

    /// Focus left the object-name field. An empty field drops everything
    /// that depended on the previous MBean.
    pub fn blur_mbean_object_name(&mut self) {
        let cleared = self
            .state
            .config
            .as_ref()
            .is_some_and(|config| !config.has_mbean_object_name());
        if cleared {
            self.state.mbean_unavailable = false;
            self.state.mbean_unmatched = false;
            self.state.duplicate_mbean = false;
            self.set_attribute_choices(Vec::new());
        }
    }

    /// Fresh checklist for a newly selected MBean. Prior checks are dropped
    /// since attributes of a different MBean are unrelated.
    async fn fetch_mbean_attributes(&mut self, object_name: &str) -> EditorResult<()> {
        let gauge_version = self
            .state
            .config
            .as_ref()
            .and_then(|config| config.version())
            .unwrap_or_default()
            .to_string();

        let result = {
            let _loading = self.attributes_loading.enter();
            self.api
                .mbean_attributes(&self.server_id, object_name, &gauge_version)
                .await
        };
        let response = result.map_err(|e| self.present(e))?;

        debug!(
            mbean = %object_name,
            attributes = response.mbean_attributes.len(),
            unavailable = response.mbean_unavailable,
            unmatched = response.mbean_unmatched,
            duplicate = response.duplicate_mbean,
            "fetched MBean attributes"
        );
        self.state.mbean_unavailable = response.mbean_unavailable;
        self.state.mbean_unmatched = response.mbean_unmatched;
        self.state.duplicate_mbean = response.duplicate_mbean;
        self.set_attribute_choices(
            response
                .mbean_attributes
                .into_iter()
                .map(AttributeChoice::live)
                .collect(),
        );
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Save / delete
    // ---------------------------------------------------------------------

    /// Create or update the gauge.
    ///
    /// On success the returned config becomes the new snapshot. Run the
    /// outcome's redirect to move back to the gauge list.
    #[instrument(skip(self), fields(server_id = %self.server_id, version = ?self.state.version))]
    pub async fn save(&mut self) -> EditorResult<SaveOutcome> {
        let config = self.state.config.clone().ok_or(EditorError::NotLoaded)?;
        if let Some(reason) = self.save_blocked_reason() {
            return Err(EditorError::SaveBlocked(reason));
        }

        let payload = GaugeSavePayload {
            config,
            server_id: self.server_id.clone(),
        };
        let updating = self.state.version.is_some();
        let result = if updating {
            self.api.update(&payload).await
        } else {
            self.api.add(&payload).await
        };

        match result {
            Ok(response) => {
                let version = response.config.version().unwrap_or_default().to_string();
                self.apply_response(response);
                let message = if updating { "Saved" } else { "Added" };
                self.state.version = Some(version.clone()).filter(|v| !v.is_empty());
                info!(version = %version, "{} gauge", message.to_lowercase());
                Ok(SaveOutcome {
                    message,
                    version: version.clone(),
                    redirect: PostSaveRedirect { version },
                })
            }
            Err(EditorError::Http(e)) if e.is_duplicate_mbean_conflict() => {
                warn!(mbean = %payload.config.mbean_object_name, "gauge already exists for MBean");
                self.state.duplicate_mbean = true;
                Err(EditorError::DuplicateMBean)
            }
            Err(e) => Err(self.present(e)),
        }
    }

    /// Remove the gauge and leave the screen without the unsaved-changes prompt.
    #[instrument(skip(self), fields(server_id = %self.server_id))]
    pub async fn delete(&mut self) -> EditorResult<()> {
        let version = self
            .state
            .config
            .as_ref()
            .ok_or(EditorError::NotLoaded)?
            .version()
            .ok_or(EditorError::NotSaved)?
            .to_string();

        let payload = GaugeRemovePayload {
            server_id: self.server_id.clone(),
            version,
        };
        if let Err(e) = self.api.remove(&payload).await {
            return Err(self.present(e));
        }

        info!(version = %payload.version, "removed gauge");
        self.state.leave_guard_attached = false;
        self.navigator.navigate(GAUGE_LIST_PATH, HistoryMode::Replace);
        Ok(())
    }

    fn present(&self, error: EditorError) -> EditorError {
        self.presenter.present(&error);
        error
    }
}
