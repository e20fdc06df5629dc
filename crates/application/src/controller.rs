//! Portal controller
//!
//! The single owner of portal state. Every user action and every network
//! completion goes through one of its methods; the view layer only reads
//! the resulting state. The controller performs no I/O itself: probes are
//! handed out as `PendingProbe`s and their results handed back with the
//! ticket they were issued with, and session persistence is signalled
//! through `take_dirty_session`.

use atrium_domain::{
    CatalogView, Credential, DomainError, DomainResult, InspectorState, ProbeOutcome, ProbeRequest,
    ProbeState, Selection, Session, SettingsDocument, ThemeMode, Toast, ToastKind, ToastState,
};

use crate::ports::{CancellationReceiver, CancellationToken};
use crate::use_cases::{LoadSettingsError, ProbeResult, ProbeResultExt};

/// Static parameters of a controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortalSettings {
    /// Origin every endpoint path is resolved against, without trailing slash.
    pub origin: String,
    /// Header the credential is sent in.
    pub credential_header: String,
}

/// Where a settings document came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentSource {
    /// The offline copy saved by an earlier run.
    Cache,
    /// The settings endpoint.
    Network,
}

/// Identifies one probe and the selection that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeTicket {
    seq: u64,
    category: usize,
    endpoint: usize,
}

/// A probe the caller must execute and report back.
#[derive(Debug)]
pub struct PendingProbe {
    /// Ticket to pass to `complete_probe`.
    pub ticket: ProbeTicket,
    /// The request to send.
    pub request: ProbeRequest,
    /// Fires when the probe is superseded or the inspector closes.
    pub cancel: CancellationReceiver,
}

#[derive(Debug)]
struct InFlight {
    ticket: ProbeTicket,
    cancel: CancellationToken,
}

/// Owns and mutates all portal state.
#[derive(Debug)]
pub struct PortalController {
    settings: PortalSettings,
    document: Option<SettingsDocument>,
    catalog: CatalogView,
    search: String,
    inspector: InspectorState,
    session: Session,
    session_dirty: bool,
    toasts: ToastState,
    loading_screen: bool,
    nav_open: bool,
    probe_seq: u64,
    in_flight: Option<InFlight>,
}

impl PortalController {
    /// Creates a controller from its settings and the stored session.
    #[must_use]
    pub fn new(settings: PortalSettings, session: Session) -> Self {
        Self {
            settings,
            document: None,
            catalog: CatalogView::default(),
            search: String::new(),
            inspector: InspectorState::default(),
            session,
            session_dirty: false,
            toasts: ToastState::new(),
            loading_screen: true,
            nav_open: false,
            probe_seq: 0,
            in_flight: None,
        }
    }

    // --- Settings document ---

    /// Stores a document and re-renders the catalog, keeping the active
    /// search applied.
    pub fn apply_document(&mut self, document: SettingsDocument, source: DocumentSource) {
        let mut catalog = CatalogView::render(&document);
        catalog.apply_filter(&self.search);

        tracing::info!(
            ?source,
            endpoints = catalog.endpoint_count(),
            "catalog rendered"
        );
        self.catalog = catalog;
        self.document = Some(document);
    }

    /// Records a failed settings load. Prior state is left untouched.
    pub fn settings_failed(&mut self, error: &LoadSettingsError) {
        tracing::error!(%error, "error loading settings");
        self.toasts.show(ToastKind::Error, "Error loading API settings");
    }

    /// Hides the loading screen once the initial load has settled.
    pub fn finish_loading(&mut self) {
        self.loading_screen = false;
    }

    // --- Inspector ---

    /// Binds an endpoint to the inspector and opens it.
    ///
    /// Any probe still running for the previous selection is cancelled.
    ///
    /// # Errors
    ///
    /// Returns a domain error if the indexes do not name a loaded endpoint.
    pub fn select_endpoint(&mut self, category: usize, endpoint: usize) -> DomainResult<()> {
        let document = self
            .document
            .as_ref()
            .ok_or(DomainError::UnknownCategory(category))?;
        let item = document.endpoint(category, endpoint).ok_or_else(|| {
            if document.categories.get(category).is_none() {
                DomainError::UnknownCategory(category)
            } else {
                DomainError::UnknownEndpoint { category, endpoint }
            }
        })?;

        let selection = Selection::new(&self.settings.origin, category, endpoint, item);
        self.cancel_in_flight();
        tracing::debug!(endpoint = %selection.name, url = %selection.url, "endpoint selected");
        self.inspector.open(selection);
        Ok(())
    }

    /// Updates a parameter input of the selected endpoint.
    ///
    /// # Errors
    ///
    /// Returns a domain error if nothing is selected or the parameter is
    /// not declared.
    pub fn set_param(&mut self, key: &str, value: &str) -> DomainResult<()> {
        let selection = self
            .inspector
            .selection_mut()
            .ok_or_else(|| DomainError::UnknownParameter(key.to_string()))?;
        selection.set_param(key, value)
    }

    /// Closes the inspector, dropping the response and cancelling any
    /// probe still in flight.
    pub fn close_inspector(&mut self) {
        self.cancel_in_flight();
        self.inspector.close();
    }

    /// Returns the URL to copy, or `None` with an error toast if nothing
    /// is selected.
    pub fn copy_endpoint(&mut self) -> Option<String> {
        let url = self.inspector.selection().map(|s| s.url.clone());
        if url.is_none() {
            self.clipboard_result(false);
        }
        url
    }

    /// Reports the result of a clipboard write.
    pub fn clipboard_result(&mut self, copied: bool) {
        if copied {
            self.toasts.show(ToastKind::Success, "Copied to clipboard");
        } else {
            self.toasts.show(ToastKind::Error, "Failed to copy to clipboard");
        }
    }

    // --- Probes ---

    /// Starts a probe for the selected endpoint.
    ///
    /// Returns `None` when the probe is refused: no selection, or no
    /// credential (a warning toast is shown and nothing is sent).
    pub fn begin_probe(&mut self) -> Option<PendingProbe> {
        let Some(selection) = self.inspector.selection() else {
            tracing::warn!("probe requested without a selected endpoint");
            return None;
        };

        if !self.session.api_key.is_present() {
            self.toasts.show(ToastKind::Warning, "Please enter your API key first");
            return None;
        }

        let request = match ProbeRequest::build(
            &self.settings.origin,
            &selection.path,
            &selection.param_pairs(),
            &self.settings.credential_header,
            &self.session.api_key,
        ) {
            Ok(request) => request,
            Err(e) => {
                self.toasts.show(ToastKind::Error, format!("API test failed: {e}"));
                return None;
            }
        };

        let (category, endpoint) = (selection.category, selection.endpoint);
        self.cancel_in_flight();
        self.probe_seq += 1;
        let ticket = ProbeTicket {
            seq: self.probe_seq,
            category,
            endpoint,
        };
        let (token, cancel) = CancellationToken::new();
        self.in_flight = Some(InFlight {
            ticket,
            cancel: token,
        });
        self.inspector.set_probe(ProbeState::Loading);

        tracing::info!(
            url = %request.url,
            credential = %self.session.api_key,
            "probe started"
        );
        Some(PendingProbe {
            ticket,
            request,
            cancel,
        })
    }

    /// Applies the result of a probe.
    ///
    /// Returns false, leaving the inspector untouched, if the ticket is no
    /// longer current (the probe was superseded or the inspector closed).
    pub fn complete_probe(&mut self, ticket: ProbeTicket, result: ProbeResult) -> bool {
        if self.in_flight.as_ref().map(|f| f.ticket) != Some(ticket) {
            tracing::debug!(?ticket, "discarding stale probe result");
            return false;
        }
        self.in_flight = None;

        if let Err(e) = &result {
            if e.is_cancelled() {
                return false;
            }
            tracing::warn!(error = %e, "probe failed");
        }

        let outcome: ProbeOutcome = result.into_outcome();
        let (kind, message) = outcome.notice();
        self.toasts.show(kind, message);
        self.inspector.set_probe(ProbeState::settled(outcome));
        true
    }

    fn cancel_in_flight(&mut self) {
        if let Some(in_flight) = self.in_flight.take() {
            tracing::debug!(ticket = ?in_flight.ticket, "cancelling probe");
            in_flight.cancel.cancel();
        }
    }

    // --- Session ---

    /// Stores a new credential. No validation is performed.
    pub fn set_credential(&mut self, value: &str) {
        self.session.api_key = Credential::new(value);
        self.session_dirty = true;
    }

    /// Switches between light and dark theme.
    pub fn toggle_theme(&mut self) -> ThemeMode {
        self.session.theme = self.session.theme.toggled();
        self.session_dirty = true;
        self.toasts.show(
            ToastKind::Success,
            format!("Theme changed to {} mode", self.session.theme),
        );
        self.session.theme
    }

    /// Returns the session if it changed since the last call.
    pub fn take_dirty_session(&mut self) -> Option<Session> {
        if self.session_dirty {
            self.session_dirty = false;
            Some(self.session.clone())
        } else {
            None
        }
    }

    // --- Search, navigation, toasts ---

    /// Filters the catalog.
    pub fn search(&mut self, query: &str) {
        query.clone_into(&mut self.search);
        self.catalog.apply_filter(query);
    }

    /// Opens or closes the navigation drawer.
    pub fn toggle_nav(&mut self) -> bool {
        self.nav_open = !self.nav_open;
        self.nav_open
    }

    /// Hides the current toast.
    pub fn dismiss_toast(&mut self) {
        self.toasts.dismiss();
    }

    /// Hides the toast `id` if it is still visible.
    pub fn expire_toast(&mut self, id: u64) -> bool {
        self.toasts.expire(id)
    }

    // --- Read access ---

    /// Controller settings.
    #[must_use]
    pub const fn settings(&self) -> &PortalSettings {
        &self.settings
    }

    /// The loaded document, if any.
    #[must_use]
    pub const fn document(&self) -> Option<&SettingsDocument> {
        self.document.as_ref()
    }

    /// The rendered catalog.
    #[must_use]
    pub const fn catalog(&self) -> &CatalogView {
        &self.catalog
    }

    /// Inspector state.
    #[must_use]
    pub const fn inspector(&self) -> &InspectorState {
        &self.inspector
    }

    /// Current session.
    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// Visible toast.
    #[must_use]
    pub const fn toast(&self) -> Option<&Toast> {
        self.toasts.current()
    }

    /// Whether the loading screen is up.
    #[must_use]
    pub const fn loading_screen(&self) -> bool {
        self.loading_screen
    }

    /// Whether the navigation drawer is open.
    #[must_use]
    pub const fn nav_open(&self) -> bool {
        self.nav_open
    }

    /// Whether a probe is in flight.
    #[must_use]
    pub const fn probe_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::HttpClientError;
    use crate::use_cases::ProbeError;
    use atrium_domain::{Category, Endpoint, EndpointStatus, ProbeResponse};
    use pretty_assertions::assert_eq;

    const ORIGIN: &str = "https://portal.example.com";

    fn settings() -> PortalSettings {
        PortalSettings {
            origin: ORIGIN.to_string(),
            credential_header: "X-API-Key".to_string(),
        }
    }

    fn document() -> SettingsDocument {
        SettingsDocument {
            categories: vec![
                Category {
                    name: "Users".to_string(),
                    items: vec![Endpoint {
                        name: "Get User".to_string(),
                        desc: "Fetch a user".to_string(),
                        path: "/api/user?id=".to_string(),
                        status: EndpointStatus::Ready,
                        params: [("id".to_string(), "user id".to_string())].into(),
                    }],
                },
                Category {
                    name: "Misc".to_string(),
                    items: vec![Endpoint {
                        name: "Ping".to_string(),
                        desc: "Health check".to_string(),
                        path: "/api/ping".to_string(),
                        ..Endpoint::default()
                    }],
                },
            ],
            ..SettingsDocument::default()
        }
    }

    fn controller_with_key(key: &str) -> PortalController {
        let session = Session {
            api_key: Credential::new(key),
            theme: ThemeMode::Light,
        };
        let mut controller = PortalController::new(settings(), session);
        controller.apply_document(document(), DocumentSource::Network);
        controller
    }

    fn ok(status: u16, body: &str) -> ProbeResult {
        Ok(ProbeResponse {
            status,
            body: body.to_string(),
        })
    }

    #[test]
    fn apply_document_renders_catalog() {
        let controller = controller_with_key("");
        assert_eq!(controller.catalog().endpoint_count(), 2);
        assert!(controller.loading_screen());
    }

    #[test]
    fn failed_load_keeps_previous_document() {
        let mut controller = controller_with_key("");
        controller.settings_failed(&LoadSettingsError::Status(500));

        assert_eq!(controller.catalog().endpoint_count(), 2);
        let toast = controller.toast().expect("toast shown");
        assert_eq!(toast.kind, ToastKind::Error);
        assert_eq!(toast.message, "Error loading API settings");
    }

    #[test]
    fn reload_reapplies_search() {
        let mut controller = controller_with_key("");
        controller.search("ping");
        controller.apply_document(document(), DocumentSource::Network);
        assert_eq!(controller.catalog().visible_count(), 1);
    }

    #[test]
    fn select_endpoint_opens_inspector() {
        let mut controller = controller_with_key("");
        controller.select_endpoint(0, 0).expect("exists");

        let selection = controller.inspector().selection().expect("selected");
        assert_eq!(selection.url, "https://portal.example.com/api/user?id=");
        assert!(selection.shows_params());

        assert!(controller.select_endpoint(7, 0).is_err());
        assert!(controller.select_endpoint(0, 7).is_err());
    }

    #[test]
    fn probe_without_credential_is_refused() {
        let mut controller = controller_with_key("");
        controller.select_endpoint(0, 0).expect("exists");

        assert!(controller.begin_probe().is_none());
        assert!(!controller.probe_in_flight());
        let toast = controller.toast().expect("warning shown");
        assert_eq!(toast.kind, ToastKind::Warning);
        assert_eq!(toast.message, "Please enter your API key first");
    }

    #[test]
    fn probe_embeds_path_parameter() {
        let mut controller = controller_with_key("secret");
        controller.select_endpoint(0, 0).expect("exists");
        controller.set_param("id", "42").expect("declared");

        let pending = controller.begin_probe().expect("probe starts");
        assert_eq!(pending.request.url, "https://portal.example.com/api/user?id=42");
        assert_eq!(
            pending.request.headers[0],
            ("X-API-Key".to_string(), "secret".to_string())
        );
        assert!(controller.inspector().probe().is_loading());
    }

    #[test]
    fn completed_probe_settles_inspector() {
        let mut controller = controller_with_key("secret");
        controller.select_endpoint(1, 0).expect("exists");
        let pending = controller.begin_probe().expect("probe starts");

        assert!(controller.complete_probe(pending.ticket, ok(200, r#"{"pong":true}"#)));
        assert!(!controller.probe_in_flight());
        let outcome = controller.inspector().probe().outcome().expect("settled");
        assert_eq!(outcome.panel_text(), "{\n  \"pong\": true\n}");
        assert_eq!(controller.toast().map(|t| t.kind), Some(ToastKind::Success));
    }

    #[test]
    fn failed_status_shows_error_toast() {
        let mut controller = controller_with_key("secret");
        controller.select_endpoint(1, 0).expect("exists");
        let pending = controller.begin_probe().expect("probe starts");

        controller.complete_probe(pending.ticket, ok(403, r#"{"message":"Forbidden"}"#));
        let toast = controller.toast().expect("toast");
        assert_eq!(toast.kind, ToastKind::Error);
        assert_eq!(toast.message, "API test failed: Forbidden");
    }

    #[test]
    fn transport_error_is_rendered_as_text() {
        let mut controller = controller_with_key("secret");
        controller.select_endpoint(1, 0).expect("exists");
        let pending = controller.begin_probe().expect("probe starts");

        controller.complete_probe(
            pending.ticket,
            Err(ProbeError::HttpError(HttpClientError::ConnectionFailed(
                "reset".to_string(),
            ))),
        );
        let outcome = controller.inspector().probe().outcome().expect("settled");
        assert_eq!(outcome.panel_text(), "Error: Connection failed: reset");
    }

    #[test]
    fn closing_inspector_cancels_and_discards_late_result() {
        let mut controller = controller_with_key("secret");
        controller.select_endpoint(1, 0).expect("exists");
        let pending = controller.begin_probe().expect("probe starts");

        controller.close_inspector();
        assert!(pending.cancel.is_cancelled());
        assert!(!controller.complete_probe(pending.ticket, ok(200, "{}")));
        assert!(!controller.inspector().is_open());
        assert!(controller.inspector().probe().is_idle());
    }

    #[test]
    fn reselecting_supersedes_running_probe() {
        let mut controller = controller_with_key("secret");
        controller.select_endpoint(1, 0).expect("exists");
        let first = controller.begin_probe().expect("probe starts");

        controller.select_endpoint(0, 0).expect("exists");
        let second = controller.begin_probe().expect("probe starts");

        assert!(first.cancel.is_cancelled());
        assert!(!controller.complete_probe(first.ticket, ok(200, "{}")));
        assert!(controller.complete_probe(second.ticket, ok(200, "{}")));
    }

    #[test]
    fn theme_toggle_marks_session_dirty() {
        let mut controller = controller_with_key("");
        assert!(controller.take_dirty_session().is_none());

        assert_eq!(controller.toggle_theme(), ThemeMode::Dark);
        assert_eq!(
            controller.toast().map(|t| t.message.as_str()),
            Some("Theme changed to dark mode")
        );
        assert_eq!(controller.toggle_theme(), ThemeMode::Light);

        let session = controller.take_dirty_session().expect("dirty");
        assert_eq!(session.theme, ThemeMode::Light);
        assert!(controller.take_dirty_session().is_none());
    }

    #[test]
    fn credential_is_stored_verbatim() {
        let mut controller = controller_with_key("");
        controller.set_credential("  odd key ");
        assert_eq!(controller.session().api_key.expose(), "  odd key ");
        assert!(controller.take_dirty_session().is_some());
    }

    #[test]
    fn copy_without_selection_fails() {
        let mut controller = controller_with_key("");
        assert!(controller.copy_endpoint().is_none());
        assert_eq!(
            controller.toast().map(|t| t.message.as_str()),
            Some("Failed to copy to clipboard")
        );

        controller.select_endpoint(1, 0).expect("exists");
        assert_eq!(
            controller.copy_endpoint().as_deref(),
            Some("https://portal.example.com/api/ping")
        );
    }
}
