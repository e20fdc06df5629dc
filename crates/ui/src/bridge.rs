//! UI Bridge Module
//!
//! Defines the communication protocol between the Slint UI thread
//! and the async Tokio runtime, plus the plain data the UI thread turns
//! into Slint models.

use atrium_application::{LoadSettingsError, ProbeResult, ProbeTicket};
use atrium_domain::{
    CatalogView, InspectorState, ProbeState, SettingsDocument, Toast, ToastKind,
};

/// Commands sent to the async runtime.
///
/// Most come from UI callbacks; the rest are posted back by tasks the
/// runtime spawned itself.
#[derive(Debug)]
pub enum UiCommand {
    /// User clicked an endpoint card.
    SelectEndpoint { category: usize, endpoint: usize },

    /// User closed the inspector (close button, backdrop or Escape).
    CloseInspector,

    /// User typed into a parameter input.
    ParamEdited { key: String, value: String },

    /// User clicked the copy button next to the endpoint URL.
    CopyEndpoint,

    /// The UI thread finished a clipboard write.
    ClipboardResult { copied: bool },

    /// User clicked "Test API".
    SendProbe,

    /// User edited the API key field.
    CredentialEdited { value: String },

    /// User toggled the theme.
    ToggleTheme,

    /// User edited the search field.
    SearchEdited { query: String },

    /// User clicked the menu button.
    ToggleNav,

    /// User dismissed the toast.
    DismissToast,

    /// The window closed.
    Shutdown,

    // --- Internal completions ---
    /// The settings request completed.
    SettingsLoaded(Result<SettingsDocument, LoadSettingsError>),

    /// A probe completed or was cancelled.
    ProbeFinished {
        ticket: ProbeTicket,
        result: ProbeResult,
    },

    /// A toast's display time elapsed.
    ExpireToast { id: u64 },

    /// The loading screen delay elapsed.
    HideLoadingScreen,
}

/// Updates sent from the async runtime to the UI thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiUpdate {
    /// Portal name, description, status and version.
    Header(HeaderData),

    /// Re-rendered catalog.
    Catalog(CatalogData),

    /// Inspector opened with a selection, or closed (`None`).
    Inspector(Option<InspectorData>),

    /// Probe indicator and response panel.
    Probe(ProbeData),

    /// Visible toast, or none.
    Toast(Option<ToastData>),

    /// Theme flag.
    Theme { dark: bool },

    /// Stored credential echoed back into the API key field.
    CredentialRestored(String),

    /// Whether the API key field shows the valid marker.
    CredentialValid(bool),

    /// Loading screen visibility.
    LoadingScreen(bool),

    /// Navigation drawer visibility.
    NavOpen(bool),

    /// Text the UI thread should place on the clipboard.
    CopyToClipboard(String),
}

/// Header labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderData {
    pub name: String,
    pub description: String,
    pub status: String,
    pub version: String,
}

impl HeaderData {
    /// Labels for a loaded document, or the defaults when none is loaded.
    #[must_use]
    pub fn from_document(document: Option<&SettingsDocument>) -> Self {
        let fallback = SettingsDocument::default();
        let document = document.unwrap_or(&fallback);
        Self {
            name: document.display_name().to_string(),
            description: document.display_description().to_string(),
            status: document.display_status().to_string(),
            version: document.display_version().to_string(),
        }
    }
}

/// Catalog as shown: only visible groups and cards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogData {
    pub categories: Vec<CategoryData>,
    pub endpoint_count: usize,
    pub visible_count: usize,
}

/// One visible category group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryData {
    pub title: String,
    pub subtitle: String,
    pub cards: Vec<CardData>,
}

/// One visible endpoint card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardData {
    pub category: usize,
    pub endpoint: usize,
    pub title: String,
    pub description: String,
    pub badge: String,
    pub ready: bool,
}

impl From<&CatalogView> for CatalogData {
    fn from(catalog: &CatalogView) -> Self {
        let categories = catalog
            .categories()
            .iter()
            .filter(|c| c.visible)
            .map(|c| CategoryData {
                title: c.title.clone(),
                subtitle: c.subtitle.clone(),
                cards: c
                    .cards
                    .iter()
                    .filter(|card| card.visible)
                    .map(|card| CardData {
                        category: card.category,
                        endpoint: card.endpoint,
                        title: card.title.clone(),
                        description: card.description.clone(),
                        badge: card.status.badge().to_string(),
                        ready: card.status.is_ready(),
                    })
                    .collect(),
            })
            .collect();

        Self {
            categories,
            endpoint_count: catalog.endpoint_count(),
            visible_count: catalog.visible_count(),
        }
    }
}

/// Inspector dialog contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InspectorData {
    pub name: String,
    pub description: String,
    pub url: String,
    pub show_params: bool,
    pub params: Vec<ParamData>,
}

/// One parameter input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamData {
    pub key: String,
    pub placeholder: String,
    pub value: String,
}

impl InspectorData {
    /// Dialog contents, or `None` when the inspector is closed.
    #[must_use]
    pub fn from_state(state: &InspectorState) -> Option<Self> {
        let selection = state.selection()?;
        Some(Self {
            name: selection.name.clone(),
            description: selection.description.clone(),
            url: selection.url.clone(),
            show_params: selection.shows_params(),
            params: selection
                .params
                .iter()
                .map(|p| ParamData {
                    key: p.key.clone(),
                    placeholder: p.placeholder.clone(),
                    value: p.value.clone(),
                })
                .collect(),
        })
    }
}

/// What the probe area shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProbePhase {
    /// Neither indicator nor panel.
    #[default]
    Hidden,
    /// Loading indicator, panel hidden.
    Loading,
    /// Response panel.
    Response,
}

impl ProbePhase {
    /// Index used by the Slint `probe-phase` property.
    #[must_use]
    pub const fn to_index(self) -> i32 {
        match self {
            Self::Hidden => 0,
            Self::Loading => 1,
            Self::Response => 2,
        }
    }
}

/// Probe area contents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProbeData {
    pub phase: ProbePhase,
    pub text: String,
    pub success: bool,
}

impl From<&ProbeState> for ProbeData {
    fn from(state: &ProbeState) -> Self {
        match state {
            ProbeState::Idle => Self::default(),
            ProbeState::Loading => Self {
                phase: ProbePhase::Loading,
                ..Self::default()
            },
            ProbeState::Settled { outcome } => Self {
                phase: ProbePhase::Response,
                text: outcome.panel_text(),
                success: outcome.is_success(),
            },
        }
    }
}

/// Visible toast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToastData {
    pub id: u64,
    pub kind: ToastKind,
    pub message: String,
}

impl From<&Toast> for ToastData {
    fn from(toast: &Toast) -> Self {
        Self {
            id: toast.id,
            kind: toast.kind,
            message: toast.message.clone(),
        }
    }
}

/// Converts an index to a Slint `int`, saturating.
#[must_use]
pub fn to_slint_int(value: usize) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

/// Converts a Slint `int` back to an index; negative values are rejected.
#[must_use]
pub fn from_slint_int(value: i32) -> Option<usize> {
    usize::try_from(value).ok()
}
