//! Endpoint inspector: the dialog bound to the selected endpoint.

use crate::document::Endpoint;
use crate::error::{DomainError, DomainResult};
use crate::state::ProbeState;

/// One generated parameter input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamInput {
    /// Parameter name, used as the label.
    pub key: String,
    /// Parameter description, used as the placeholder.
    pub placeholder: String,
    /// Current input value.
    pub value: String,
}

/// The endpoint currently bound to the inspector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// Category index in the catalog.
    pub category: usize,
    /// Endpoint index within the category.
    pub endpoint: usize,
    /// Endpoint name.
    pub name: String,
    /// Endpoint description.
    pub description: String,
    /// Path template.
    pub path: String,
    /// Fully qualified URL (origin + path).
    pub url: String,
    /// One input per declared parameter, in key order.
    pub params: Vec<ParamInput>,
}

impl Selection {
    /// Binds an endpoint, with all inputs empty.
    #[must_use]
    pub fn new(origin: &str, category: usize, endpoint: usize, item: &Endpoint) -> Self {
        Self {
            category,
            endpoint,
            name: item.name.clone(),
            description: item.desc.clone(),
            path: item.path.clone(),
            url: format!("{origin}{}", item.path),
            params: item
                .params
                .iter()
                .map(|(key, description)| ParamInput {
                    key: key.clone(),
                    placeholder: description.clone(),
                    value: String::new(),
                })
                .collect(),
        }
    }

    /// Whether the parameter section is shown at all.
    #[must_use]
    pub fn shows_params(&self) -> bool {
        !self.params.is_empty()
    }

    /// Updates an input value.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::UnknownParameter` if the endpoint does not
    /// declare `key`.
    pub fn set_param(&mut self, key: &str, value: impl Into<String>) -> DomainResult<()> {
        let input = self
            .params
            .iter_mut()
            .find(|p| p.key == key)
            .ok_or_else(|| DomainError::UnknownParameter(key.to_string()))?;
        input.value = value.into();
        Ok(())
    }

    /// Current `(key, value)` pairs, in input order.
    #[must_use]
    pub fn param_pairs(&self) -> Vec<(String, String)> {
        self.params
            .iter()
            .map(|p| (p.key.clone(), p.value.clone()))
            .collect()
    }
}

/// Inspector dialog state.
#[derive(Debug, Clone, Default)]
pub struct InspectorState {
    selection: Option<Selection>,
    probe: ProbeState,
}

impl InspectorState {
    /// Opens the dialog on a new selection, replacing any previous one.
    pub fn open(&mut self, selection: Selection) {
        self.selection = Some(selection);
        self.probe = ProbeState::Idle;
    }

    /// Closes the dialog and clears the response area.
    pub fn close(&mut self) {
        self.selection = None;
        self.probe = ProbeState::Idle;
    }

    /// Whether the dialog is visible. Page scroll is locked while it is.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.selection.is_some()
    }

    /// The bound endpoint.
    #[must_use]
    pub const fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    /// Mutable access to the bound endpoint.
    pub const fn selection_mut(&mut self) -> Option<&mut Selection> {
        self.selection.as_mut()
    }

    /// Probe state of the response area.
    #[must_use]
    pub const fn probe(&self) -> &ProbeState {
        &self.probe
    }

    /// Replaces the probe state.
    pub fn set_probe(&mut self, probe: ProbeState) {
        self.probe = probe;
    }
}
