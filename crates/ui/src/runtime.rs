//! Portal runtime
//!
//! Runs on the Tokio thread and owns the `PortalController`. Commands are
//! handled strictly in order; network calls and timers run as spawned
//! tasks that post their completion back as commands, so no handler ever
//! waits on the network.

use std::sync::Arc;
use std::time::Duration;

use atrium_application::{
    DocumentSource, HttpClient, LoadSettings, PendingProbe, PortalController, RunProbe,
    SessionStore, SettingsCache,
};
use atrium_domain::{Session, TOAST_DURATION};
use atrium_infrastructure::PortalConfig;
use tokio::sync::mpsc;

use crate::bridge::{
    CatalogData, HeaderData, InspectorData, ProbeData, ToastData, UiCommand, UiUpdate,
};

/// Delay between the end of the initial load and hiding the loading screen.
pub const LOADING_SCREEN_DELAY: Duration = Duration::from_secs(1);

/// External services the runtime talks to.
pub struct PortalServices<C: HttpClient> {
    pub client: Arc<C>,
    pub sessions: Arc<dyn SessionStore>,
    pub cache: Arc<dyn SettingsCache>,
}

/// Controller plus the plumbing around it.
pub struct PortalRuntime<C: HttpClient + 'static> {
    controller: PortalController,
    load_settings: Arc<LoadSettings<C>>,
    run_probe: Arc<RunProbe<C>>,
    sessions: Arc<dyn SessionStore>,
    cache: Arc<dyn SettingsCache>,
    commands: mpsc::UnboundedSender<UiCommand>,
    updates: mpsc::UnboundedSender<UiUpdate>,
    shown_toast: Option<u64>,
    loading_delay: Duration,
    toast_duration: Duration,
}

impl<C: HttpClient + 'static> PortalRuntime<C> {
    /// Restores the session, shows any cached catalog and starts the
    /// settings request.
    pub async fn start(
        services: PortalServices<C>,
        config: &PortalConfig,
        commands: mpsc::UnboundedSender<UiCommand>,
        updates: mpsc::UnboundedSender<UiUpdate>,
    ) -> Self {
        let session = services.sessions.load().await.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "could not restore session, starting fresh");
            Session::default()
        });

        let mut runtime = Self {
            controller: PortalController::new(config.portal_settings(), session),
            load_settings: Arc::new(LoadSettings::new(
                Arc::clone(&services.client),
                &config.origin,
                &config.settings_path,
            )),
            run_probe: Arc::new(RunProbe::new(services.client)),
            sessions: services.sessions,
            cache: services.cache,
            commands,
            updates,
            shown_toast: None,
            loading_delay: LOADING_SCREEN_DELAY,
            toast_duration: TOAST_DURATION,
        };

        let session = runtime.controller.session();
        runtime.send(UiUpdate::Theme {
            dark: session.theme.is_dark(),
        });
        runtime.send(UiUpdate::CredentialRestored(
            session.api_key.expose().to_string(),
        ));
        runtime.send(UiUpdate::CredentialValid(session.api_key.is_present()));

        match runtime.cache.load().await {
            Ok(Some(document)) => {
                runtime
                    .controller
                    .apply_document(document, DocumentSource::Cache);
            }
            Ok(None) => {}
            Err(e) => tracing::warn!(error = %e, "ignoring unreadable settings cache"),
        }
        runtime.publish_document();
        runtime.spawn_settings_load();
        runtime
    }

    /// Overrides the loading screen delay and toast lifetime.
    #[must_use]
    pub fn with_delays(mut self, loading: Duration, toast: Duration) -> Self {
        self.loading_delay = loading;
        self.toast_duration = toast;
        self
    }

    /// Processes commands until shutdown.
    pub async fn run(mut self, mut commands: mpsc::UnboundedReceiver<UiCommand>) {
        while let Some(command) = commands.recv().await {
            if !self.handle(command).await {
                break;
            }
        }
        tracing::info!("portal runtime stopped");
    }

    /// Handles one command. Returns false on shutdown.
    pub async fn handle(&mut self, command: UiCommand) -> bool {
        match command {
            UiCommand::SelectEndpoint { category, endpoint } => {
                match self.controller.select_endpoint(category, endpoint) {
                    Ok(()) => self.publish_inspector(),
                    Err(e) => tracing::warn!(error = %e, "selection ignored"),
                }
            }
            UiCommand::CloseInspector => {
                if self.controller.inspector().is_open() {
                    self.controller.close_inspector();
                    self.publish_inspector();
                }
            }
            UiCommand::ParamEdited { key, value } => {
                if let Err(e) = self.controller.set_param(&key, &value) {
                    tracing::warn!(error = %e, "parameter edit ignored");
                }
            }
            UiCommand::CopyEndpoint => {
                if let Some(url) = self.controller.copy_endpoint() {
                    self.send(UiUpdate::CopyToClipboard(url));
                }
            }
            UiCommand::ClipboardResult { copied } => self.controller.clipboard_result(copied),
            UiCommand::SendProbe => self.start_probe(),
            UiCommand::CredentialEdited { value } => {
                self.controller.set_credential(&value);
                let present = self.controller.session().api_key.is_present();
                self.send(UiUpdate::CredentialValid(present));
            }
            UiCommand::ToggleTheme => {
                let theme = self.controller.toggle_theme();
                self.send(UiUpdate::Theme {
                    dark: theme.is_dark(),
                });
            }
            UiCommand::SearchEdited { query } => {
                self.controller.search(&query);
                self.publish_catalog();
            }
            UiCommand::ToggleNav => {
                let open = self.controller.toggle_nav();
                self.send(UiUpdate::NavOpen(open));
            }
            UiCommand::DismissToast => self.controller.dismiss_toast(),
            UiCommand::Shutdown => {
                let session = self.controller.session().clone();
                self.save_session(&session).await;
                return false;
            }
            UiCommand::SettingsLoaded(result) => {
                match result {
                    Ok(document) => {
                        if let Err(e) = self.cache.store(&document).await {
                            tracing::warn!(error = %e, "could not cache settings document");
                        }
                        self.controller
                            .apply_document(document, DocumentSource::Network);
                        self.publish_document();
                    }
                    Err(e) => self.controller.settings_failed(&e),
                }
                self.send_after(self.loading_delay, UiCommand::HideLoadingScreen);
            }
            UiCommand::ProbeFinished { ticket, result } => {
                if self.controller.complete_probe(ticket, result) {
                    self.publish_probe();
                }
            }
            UiCommand::ExpireToast { id } => {
                self.controller.expire_toast(id);
            }
            UiCommand::HideLoadingScreen => {
                self.controller.finish_loading();
                self.send(UiUpdate::LoadingScreen(false));
            }
        }

        self.sync_toast();
        if let Some(session) = self.controller.take_dirty_session() {
            self.save_session(&session).await;
        }
        true
    }

    /// Read access for the window and tests.
    #[must_use]
    pub const fn controller(&self) -> &PortalController {
        &self.controller
    }

    fn spawn_settings_load(&self) {
        let load_settings = Arc::clone(&self.load_settings);
        let commands = self.commands.clone();
        tokio::spawn(async move {
            let result = load_settings.execute().await;
            let _ = commands.send(UiCommand::SettingsLoaded(result));
        });
    }

    fn start_probe(&mut self) {
        let Some(PendingProbe {
            ticket,
            request,
            cancel,
        }) = self.controller.begin_probe()
        else {
            return;
        };
        self.publish_probe();

        let run_probe = Arc::clone(&self.run_probe);
        let commands = self.commands.clone();
        tokio::spawn(async move {
            let result = run_probe.execute_with_cancellation(&request, cancel).await;
            let _ = commands.send(UiCommand::ProbeFinished { ticket, result });
        });
    }

    fn send_after(&self, delay: Duration, command: UiCommand) {
        let commands = self.commands.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = commands.send(command);
        });
    }

    async fn save_session(&self, session: &Session) {
        if let Err(e) = self.sessions.save(session).await {
            tracing::warn!(error = %e, "failed to save session");
        }
    }

    /// Publishes the toast if it changed and arms its expiry timer.
    fn sync_toast(&mut self) {
        let toast = self.controller.toast().map(ToastData::from);
        let id = toast.as_ref().map(|t| t.id);
        if id == self.shown_toast {
            return;
        }

        self.shown_toast = id;
        if let Some(id) = id {
            self.send_after(self.toast_duration, UiCommand::ExpireToast { id });
        }
        self.send(UiUpdate::Toast(toast));
    }

    fn publish_document(&self) {
        self.send(UiUpdate::Header(HeaderData::from_document(
            self.controller.document(),
        )));
        self.publish_catalog();
    }

    fn publish_catalog(&self) {
        self.send(UiUpdate::Catalog(CatalogData::from(self.controller.catalog())));
    }

    fn publish_inspector(&self) {
        self.send(UiUpdate::Inspector(InspectorData::from_state(
            self.controller.inspector(),
        )));
        self.publish_probe();
    }

    fn publish_probe(&self) {
        self.send(UiUpdate::Probe(ProbeData::from(
            self.controller.inspector().probe(),
        )));
    }

    fn send(&self, update: UiUpdate) {
        let _ = self.updates.send(update);
    }
}

#[cfg(test)]
mod tests {
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use atrium_application::{HttpClientError, HttpResponse, StorageError};
    use atrium_domain::{SettingsDocument, ThemeMode, ToastKind};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::bridge::ProbePhase;

    const SETTINGS: &str = r#"{
        "name": "Zyrex API",
        "version": "v2.0.0",
        "categories": [
            {
                "name": "Users",
                "items": [
                    {
                        "name": "Get User",
                        "desc": "Fetch a user",
                        "path": "/api/user?id=",
                        "status": "ready",
                        "params": { "id": "user id" }
                    },
                    { "name": "List Users", "desc": "All users", "path": "/api/users" }
                ]
            }
        ]
    }"#;

    /// Serves the settings document and answers every other URL with `{"ok":true}`.
    struct MockClient {
        settings: Option<String>,
        requests: Mutex<Vec<(String, Vec<(String, String)>)>>,
    }

    impl MockClient {
        fn serving(settings: &str) -> Self {
            Self {
                settings: Some(settings.to_string()),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn offline() -> Self {
            Self {
                settings: None,
                requests: Mutex::new(Vec::new()),
            }
        }

        fn probe_requests(&self) -> Vec<(String, Vec<(String, String)>)> {
            self.requests
                .lock()
                .expect("lock")
                .iter()
                .filter(|(url, _)| !url.ends_with("/api/settings"))
                .cloned()
                .collect()
        }
    }

    impl HttpClient for MockClient {
        fn get(
            &self,
            url: &str,
            headers: &[(String, String)],
        ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpClientError>> + Send + '_>>
        {
            self.requests
                .lock()
                .expect("lock")
                .push((url.to_string(), headers.to_vec()));

            let result = if url.ends_with("/api/settings") {
                self.settings
                    .clone()
                    .map(|body| HttpResponse { status: 200, body })
                    .ok_or_else(|| HttpClientError::ConnectionFailed("offline".to_string()))
            } else {
                Ok(HttpResponse {
                    status: 200,
                    body: r#"{"ok":true}"#.to_string(),
                })
            };
            Box::pin(async move { result })
        }
    }

    #[derive(Default)]
    struct MemorySessions {
        initial: Session,
        saved: Mutex<Vec<Session>>,
    }

    #[async_trait]
    impl SessionStore for MemorySessions {
        async fn load(&self) -> Result<Session, StorageError> {
            Ok(self.initial.clone())
        }

        async fn save(&self, session: &Session) -> Result<(), StorageError> {
            self.saved.lock().expect("lock").push(session.clone());
            Ok(())
        }
    }

    #[derive(Default)]
    struct MemoryCache {
        document: Mutex<Option<SettingsDocument>>,
    }

    #[async_trait]
    impl SettingsCache for MemoryCache {
        async fn load(&self) -> Result<Option<SettingsDocument>, StorageError> {
            Ok(self.document.lock().expect("lock").clone())
        }

        async fn store(&self, document: &SettingsDocument) -> Result<(), StorageError> {
            *self.document.lock().expect("lock") = Some(document.clone());
            Ok(())
        }
    }

    struct Harness {
        portal: PortalRuntime<MockClient>,
        client: Arc<MockClient>,
        sessions: Arc<MemorySessions>,
        cache: Arc<MemoryCache>,
        commands: mpsc::UnboundedReceiver<UiCommand>,
        updates: mpsc::UnboundedReceiver<UiUpdate>,
    }

    impl Harness {
        async fn start(client: MockClient, sessions: MemorySessions, cache: MemoryCache) -> Self {
            let client = Arc::new(client);
            let sessions = Arc::new(sessions);
            let cache = Arc::new(cache);
            let (cmd_tx, commands) = mpsc::unbounded_channel();
            let (update_tx, updates) = mpsc::unbounded_channel();

            let services = PortalServices {
                client: Arc::clone(&client),
                sessions: Arc::clone(&sessions) as Arc<dyn SessionStore>,
                cache: Arc::clone(&cache) as Arc<dyn SettingsCache>,
            };
            let portal = PortalRuntime::start(services, &PortalConfig::default(), cmd_tx, update_tx)
                .await
                .with_delays(Duration::ZERO, Duration::from_secs(60));

            Self {
                portal,
                client,
                sessions,
                cache,
                commands,
                updates,
            }
        }

        fn with_toast_duration(self, toast: Duration) -> Self {
            Self {
                portal: self.portal.with_delays(Duration::ZERO, toast),
                ..self
            }
        }

        /// Handles the next command posted by a spawned task.
        async fn pump(&mut self) -> bool {
            let command = self.commands.recv().await.expect("command posted");
            self.portal.handle(command).await
        }

        async fn send(&mut self, command: UiCommand) -> bool {
            self.portal.handle(command).await
        }

        fn drain(&mut self) -> Vec<UiUpdate> {
            let mut updates = Vec::new();
            while let Ok(update) = self.updates.try_recv() {
                updates.push(update);
            }
            updates
        }

        fn last_toast(&self) -> Option<(ToastKind, String)> {
            self.portal
                .controller()
                .toast()
                .map(|t| (t.kind, t.message.clone()))
        }
    }

    fn shown_toasts(updates: &[UiUpdate]) -> Vec<Option<ToastData>> {
        updates
            .iter()
            .filter_map(|u| match u {
                UiUpdate::Toast(t) => Some(t.clone()),
                _ => None,
            })
            .collect()
    }

    fn catalog_counts(updates: &[UiUpdate]) -> Vec<usize> {
        updates
            .iter()
            .filter_map(|u| match u {
                UiUpdate::Catalog(c) => Some(c.endpoint_count),
                _ => None,
            })
            .collect()
    }

    #[tokio::test]
    async fn startup_loads_renders_and_hides_loading_screen() {
        let mut h = Harness::start(
            MockClient::serving(SETTINGS),
            MemorySessions::default(),
            MemoryCache::default(),
        )
        .await;

        assert!(h.pump().await);
        assert!(h.pump().await);

        let updates = h.drain();
        assert!(updates.contains(&UiUpdate::Theme { dark: false }));
        assert!(updates.contains(&UiUpdate::CredentialValid(false)));
        assert_eq!(catalog_counts(&updates), vec![0, 2]);
        assert!(updates.iter().any(|u| matches!(
            u,
            UiUpdate::Header(HeaderData { name, version, .. })
                if name == "Zyrex API" && version == "v2.0.0"
        )));
        assert_eq!(updates.last(), Some(&UiUpdate::LoadingScreen(false)));
        assert!(!h.portal.controller().loading_screen());

        let cached = h.cache.document.lock().expect("lock").clone();
        assert_eq!(cached.map(|d| d.endpoint_count()), Some(2));
    }

    #[tokio::test]
    async fn offline_start_shows_cached_catalog_and_error_toast() {
        let cache = MemoryCache::default();
        *cache.document.lock().expect("lock") =
            Some(SettingsDocument::from_json(SETTINGS).expect("valid"));

        let mut h = Harness::start(MockClient::offline(), MemorySessions::default(), cache).await;
        assert_eq!(catalog_counts(&h.drain()), vec![2]);

        h.pump().await;
        assert_eq!(
            h.last_toast(),
            Some((ToastKind::Error, "Error loading API settings".to_string()))
        );
        assert_eq!(h.portal.controller().catalog().endpoint_count(), 2);

        h.pump().await;
        assert!(h.drain().contains(&UiUpdate::LoadingScreen(false)));
    }

    #[tokio::test]
    async fn probe_without_credential_is_refused() {
        let mut h = Harness::start(
            MockClient::serving(SETTINGS),
            MemorySessions::default(),
            MemoryCache::default(),
        )
        .await;
        h.pump().await;

        h.send(UiCommand::SelectEndpoint {
            category: 0,
            endpoint: 1,
        })
        .await;
        h.send(UiCommand::SendProbe).await;

        assert_eq!(
            h.last_toast(),
            Some((
                ToastKind::Warning,
                "Please enter your API key first".to_string()
            ))
        );
        assert!(h.client.probe_requests().is_empty());
    }

    #[tokio::test]
    async fn probe_round_trip() {
        let mut h = Harness::start(
            MockClient::serving(SETTINGS),
            MemorySessions::default(),
            MemoryCache::default(),
        )
        .await;
        h.pump().await;

        h.send(UiCommand::CredentialEdited {
            value: "secret-key".to_string(),
        })
        .await;
        h.send(UiCommand::SelectEndpoint {
            category: 0,
            endpoint: 0,
        })
        .await;
        h.send(UiCommand::ParamEdited {
            key: "id".to_string(),
            value: "42".to_string(),
        })
        .await;
        h.send(UiCommand::SendProbe).await;
        h.drain();

        // Skip the loading-screen timer if it fires first.
        loop {
            let command = h.commands.recv().await.expect("command posted");
            let finished = matches!(command, UiCommand::ProbeFinished { .. });
            h.portal.handle(command).await;
            if finished {
                break;
            }
        }

        let requests = h.client.probe_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].0, "http://localhost:3000/api/user?id=42");
        assert!(
            requests[0]
                .1
                .contains(&("X-API-Key".to_string(), "secret-key".to_string()))
        );

        let updates = h.drain();
        assert!(updates.iter().any(|u| matches!(
            u,
            UiUpdate::Probe(ProbeData { phase: ProbePhase::Response, success: true, .. })
        )));
        assert_eq!(
            h.last_toast(),
            Some((ToastKind::Success, "API test successful".to_string()))
        );
    }

    #[tokio::test]
    async fn theme_toggle_and_shutdown_save_session() {
        let sessions = MemorySessions {
            initial: Session {
                theme: ThemeMode::Dark,
                ..Session::default()
            },
            ..MemorySessions::default()
        };
        let mut h = Harness::start(
            MockClient::serving(SETTINGS),
            sessions,
            MemoryCache::default(),
        )
        .await;
        assert!(h.drain().contains(&UiUpdate::Theme { dark: true }));

        h.send(UiCommand::ToggleTheme).await;
        assert!(h.drain().contains(&UiUpdate::Theme { dark: false }));
        assert!(!h.send(UiCommand::Shutdown).await);

        let saved = h.sessions.saved.lock().expect("lock").clone();
        assert_eq!(saved.len(), 2);
        assert!(saved.iter().all(|s| s.theme == ThemeMode::Light));
    }

    #[tokio::test]
    async fn copy_without_selection_fails_and_with_selection_requests_clipboard() {
        let mut h = Harness::start(
            MockClient::serving(SETTINGS),
            MemorySessions::default(),
            MemoryCache::default(),
        )
        .await;
        h.pump().await;

        h.send(UiCommand::CopyEndpoint).await;
        assert_eq!(
            h.last_toast(),
            Some((ToastKind::Error, "Failed to copy to clipboard".to_string()))
        );

        h.send(UiCommand::SelectEndpoint {
            category: 0,
            endpoint: 1,
        })
        .await;
        h.drain();
        h.send(UiCommand::CopyEndpoint).await;
        assert!(h.drain().contains(&UiUpdate::CopyToClipboard(
            "http://localhost:3000/api/users".to_string()
        )));

        h.send(UiCommand::ClipboardResult { copied: true }).await;
        assert_eq!(
            h.last_toast(),
            Some((ToastKind::Success, "Copied to clipboard".to_string()))
        );
    }

    #[tokio::test]
    async fn search_publishes_filtered_catalog() {
        let mut h = Harness::start(
            MockClient::serving(SETTINGS),
            MemorySessions::default(),
            MemoryCache::default(),
        )
        .await;
        h.pump().await;
        h.drain();

        h.send(UiCommand::SearchEdited {
            query: "list".to_string(),
        })
        .await;
        let updates = h.drain();
        let Some(UiUpdate::Catalog(catalog)) = updates.first() else {
            panic!("expected catalog update, got {updates:?}");
        };
        assert_eq!(catalog.visible_count, 1);
        assert_eq!(catalog.categories[0].cards[0].title, "List Users");
    }

    #[tokio::test]
    async fn toast_is_hidden_when_its_timer_fires() {
        let mut h = Harness::start(
            MockClient::serving(SETTINGS),
            MemorySessions::default(),
            MemoryCache::default(),
        )
        .await
        .with_toast_duration(Duration::from_millis(10));

        h.send(UiCommand::ToggleTheme).await;
        let shown = shown_toasts(&h.drain());
        assert_eq!(shown.len(), 1);
        assert_eq!(
            shown[0].as_ref().map(|t| t.message.as_str()),
            Some("Theme changed to dark mode")
        );

        // Settings load and loading-screen commands may arrive first.
        loop {
            let command = h.commands.recv().await.expect("command posted");
            let expired = matches!(command, UiCommand::ExpireToast { .. });
            h.portal.handle(command).await;
            if expired {
                break;
            }
        }

        assert!(h.portal.controller().toast().is_none());
        assert_eq!(shown_toasts(&h.drain()), vec![None]);
    }

    #[tokio::test]
    async fn older_toast_timer_leaves_newer_toast_visible() {
        let mut h = Harness::start(
            MockClient::serving(SETTINGS),
            MemorySessions::default(),
            MemoryCache::default(),
        )
        .await;

        h.send(UiCommand::ToggleTheme).await;
        let first = shown_toasts(&h.drain())
            .pop()
            .flatten()
            .expect("first toast shown");
        h.send(UiCommand::ToggleTheme).await;
        let second = shown_toasts(&h.drain())
            .pop()
            .flatten()
            .expect("second toast shown");
        assert_ne!(first.id, second.id);

        h.send(UiCommand::ExpireToast { id: first.id }).await;
        assert!(shown_toasts(&h.drain()).is_empty());
        assert_eq!(
            h.last_toast(),
            Some((ToastKind::Success, "Theme changed to light mode".to_string()))
        );

        h.send(UiCommand::ExpireToast { id: second.id }).await;
        assert_eq!(shown_toasts(&h.drain()), vec![None]);
        assert!(h.portal.controller().toast().is_none());
    }
}
