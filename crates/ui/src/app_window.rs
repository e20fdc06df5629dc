//! Application window management
//!
//! This module provides the main application window and binds its
//! callbacks to the portal runtime.

use std::rc::Rc;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use atrium_application::{SessionStore, SettingsCache};
use atrium_infrastructure::{FileSessionStore, FileSettingsCache, PortalConfig, ReqwestHttpClient};
use slint::{ComponentHandle, ModelRc, VecModel};
use tokio::sync::mpsc;

use crate::bridge::{
    CatalogData, InspectorData, UiCommand, UiUpdate, from_slint_int, to_slint_int,
};
use crate::runtime::{PortalRuntime, PortalServices};
use crate::{AtriumPalette, CategoryGroup, EndpointCard, MainWindow, ParamField, UiError};

const UPDATE_INTERVAL: Duration = Duration::from_millis(16);

/// Application window wrapper with business logic bindings.
pub struct AppWindow {
    window: MainWindow,
    cmd_tx: mpsc::UnboundedSender<UiCommand>,
    worker: JoinHandle<()>,
}

impl AppWindow {
    /// Creates the window and starts the portal runtime thread.
    ///
    /// # Errors
    ///
    /// Returns an error if the window, HTTP client or runtime cannot be
    /// created.
    pub fn new(config: &PortalConfig) -> Result<Self, UiError> {
        let window = MainWindow::new()?;
        let ui_weak = window.as_weak();

        // Create channels for UI <-> async communication
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel::<UiCommand>();
        let (update_tx, mut update_rx) = mpsc::unbounded_channel::<UiUpdate>();

        bind_callbacks(&window, &cmd_tx);

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()?;
        let services = PortalServices {
            client: Arc::new(ReqwestHttpClient::new()?),
            sessions: Arc::new(FileSessionStore::new()) as Arc<dyn SessionStore>,
            cache: Arc::new(FileSettingsCache::new()) as Arc<dyn SettingsCache>,
        };

        let config = config.clone();
        let cmd_tx_async = cmd_tx.clone();
        let worker = std::thread::Builder::new()
            .name("atrium-runtime".to_string())
            .spawn(move || {
                runtime.block_on(async move {
                    let portal =
                        PortalRuntime::start(services, &config, cmd_tx_async, update_tx).await;
                    portal.run(cmd_rx).await;
                });
            })?;

        // Process UI updates on the main thread using a timer
        let timer = slint::Timer::default();
        timer.start(slint::TimerMode::Repeated, UPDATE_INTERVAL, move || {
            while let Ok(update) = update_rx.try_recv() {
                if let Some(ui) = ui_weak.upgrade() {
                    apply_update(&ui, update);
                }
            }
        });

        // The timer must outlive the window
        std::mem::forget(timer);

        Ok(Self {
            window,
            cmd_tx,
            worker,
        })
    }

    /// Runs the event loop until the window closes, then stops the runtime
    /// after it has saved the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the event loop fails.
    pub fn run(self) -> Result<(), UiError> {
        let result = self.window.run();

        let _ = self.cmd_tx.send(UiCommand::Shutdown);
        if self.worker.join().is_err() {
            tracing::error!("portal runtime thread panicked");
        }
        result.map_err(UiError::from)
    }
}

/// Forwards every window callback to the runtime as a command.
fn bind_callbacks(window: &MainWindow, cmd_tx: &mpsc::UnboundedSender<UiCommand>) {
    let tx = cmd_tx.clone();
    window.on_endpoint_selected(move |category, endpoint| {
        if let (Some(category), Some(endpoint)) =
            (from_slint_int(category), from_slint_int(endpoint))
        {
            let _ = tx.send(UiCommand::SelectEndpoint { category, endpoint });
        }
    });

    let tx = cmd_tx.clone();
    window.on_close_inspector(move || {
        let _ = tx.send(UiCommand::CloseInspector);
    });

    let tx = cmd_tx.clone();
    window.on_param_edited(move |key, value| {
        let _ = tx.send(UiCommand::ParamEdited {
            key: key.to_string(),
            value: value.to_string(),
        });
    });

    let tx = cmd_tx.clone();
    window.on_copy_endpoint(move || {
        let _ = tx.send(UiCommand::CopyEndpoint);
    });

    let tx = cmd_tx.clone();
    window.on_clipboard_written(move |copied| {
        let _ = tx.send(UiCommand::ClipboardResult { copied });
    });

    let tx = cmd_tx.clone();
    window.on_send_probe(move || {
        let _ = tx.send(UiCommand::SendProbe);
    });

    let tx = cmd_tx.clone();
    window.on_api_key_edited(move |value| {
        let _ = tx.send(UiCommand::CredentialEdited {
            value: value.to_string(),
        });
    });

    let tx = cmd_tx.clone();
    window.on_toggle_theme(move || {
        let _ = tx.send(UiCommand::ToggleTheme);
    });

    let tx = cmd_tx.clone();
    window.on_search_edited(move |query| {
        let _ = tx.send(UiCommand::SearchEdited {
            query: query.to_string(),
        });
    });

    let tx = cmd_tx.clone();
    window.on_toggle_nav(move || {
        let _ = tx.send(UiCommand::ToggleNav);
    });

    let tx = cmd_tx.clone();
    window.on_dismiss_toast(move || {
        let _ = tx.send(UiCommand::DismissToast);
    });
}

/// Applies a UI update to the Slint window.
fn apply_update(ui: &MainWindow, update: UiUpdate) {
    match update {
        UiUpdate::Header(header) => {
            ui.set_portal_name(header.name.into());
            ui.set_portal_description(header.description.into());
            ui.set_portal_status(header.status.into());
            ui.set_portal_version(header.version.into());
        }

        UiUpdate::Catalog(catalog) => apply_catalog(ui, catalog),

        UiUpdate::Inspector(Some(inspector)) => apply_inspector(ui, inspector),

        UiUpdate::Inspector(None) => {
            ui.set_inspector_open(false);
            ui.set_params(ModelRc::default());
        }

        UiUpdate::Probe(probe) => {
            ui.set_probe_phase(probe.phase.to_index());
            ui.set_response_text(probe.text.into());
            ui.set_response_success(probe.success);
        }

        UiUpdate::Toast(Some(toast)) => {
            ui.set_toast_kind(toast.kind.to_index());
            ui.set_toast_message(toast.message.into());
            ui.set_toast_visible(true);
        }

        UiUpdate::Toast(None) => ui.set_toast_visible(false),

        UiUpdate::Theme { dark } => ui.global::<AtriumPalette>().set_dark(dark),

        UiUpdate::CredentialRestored(value) => ui.set_api_key(value.into()),

        UiUpdate::CredentialValid(valid) => ui.set_api_key_valid(valid),

        UiUpdate::LoadingScreen(visible) => ui.set_loading(visible),

        UiUpdate::NavOpen(open) => ui.set_nav_open(open),

        UiUpdate::CopyToClipboard(text) => ui.invoke_copy_to_clipboard(text.into()),
    }
}

fn apply_catalog(ui: &MainWindow, catalog: CatalogData) {
    let groups: Vec<CategoryGroup> = catalog
        .categories
        .into_iter()
        .map(|group| {
            let cards: Vec<EndpointCard> = group
                .cards
                .into_iter()
                .map(|card| EndpointCard {
                    category: to_slint_int(card.category),
                    endpoint: to_slint_int(card.endpoint),
                    title: card.title.into(),
                    description: card.description.into(),
                    badge: card.badge.into(),
                    ready: card.ready,
                })
                .collect();
            CategoryGroup {
                title: group.title.into(),
                subtitle: group.subtitle.into(),
                cards: ModelRc::new(VecModel::from(cards)),
            }
        })
        .collect();

    let model: ModelRc<CategoryGroup> = Rc::new(VecModel::from(groups)).into();
    ui.set_categories(model);
    ui.set_endpoint_count(to_slint_int(catalog.endpoint_count));
    ui.set_visible_count(to_slint_int(catalog.visible_count));
}

fn apply_inspector(ui: &MainWindow, inspector: InspectorData) {
    let params: Vec<ParamField> = inspector
        .params
        .into_iter()
        .map(|p| ParamField {
            key: p.key.into(),
            placeholder: p.placeholder.into(),
            value: p.value.into(),
        })
        .collect();
    let model: ModelRc<ParamField> = Rc::new(VecModel::from(params)).into();

    ui.set_inspector_name(inspector.name.into());
    ui.set_inspector_description(inspector.description.into());
    ui.set_inspector_url(inspector.url.into());
    ui.set_show_params(inspector.show_params);
    ui.set_params(model);
    ui.set_inspector_open(true);
}
