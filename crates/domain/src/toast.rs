//! Transient status notifications.

use std::time::Duration;

/// How long a toast stays up before it dismisses itself.
pub const TOAST_DURATION: Duration = Duration::from_secs(3);

/// Toast severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToastKind {
    /// Operation succeeded.
    Success,
    /// Operation failed.
    Error,
    /// Operation refused.
    Warning,
    /// Neutral information.
    #[default]
    Info,
}

impl ToastKind {
    /// Stable index used by the view layer.
    #[must_use]
    pub const fn to_index(self) -> i32 {
        match self {
            Self::Success => 0,
            Self::Error => 1,
            Self::Warning => 2,
            Self::Info => 3,
        }
    }
}

/// A single toast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    /// Identifier, increases with every toast shown.
    pub id: u64,
    /// Severity.
    pub kind: ToastKind,
    /// Message text.
    pub message: String,
}

/// The toast slot. At most one toast is visible at a time; showing a new
/// one replaces the current one.
#[derive(Debug, Clone, Default)]
pub struct ToastState {
    current: Option<Toast>,
    next_id: u64,
}

impl ToastState {
    /// Creates an empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Shows a toast and returns its id, to be passed back to `expire`.
    pub fn show(&mut self, kind: ToastKind, message: impl Into<String>) -> u64 {
        self.next_id += 1;
        self.current = Some(Toast {
            id: self.next_id,
            kind,
            message: message.into(),
        });
        self.next_id
    }

    /// Hides the current toast.
    pub fn dismiss(&mut self) {
        self.current = None;
    }

    /// Hides the toast with `id` if it is still the one shown.
    ///
    /// Returns true if something was hidden.
    pub fn expire(&mut self, id: u64) -> bool {
        if self.current.as_ref().is_some_and(|t| t.id == id) {
            self.current = None;
            true
        } else {
            false
        }
    }

    /// The visible toast, if any.
    #[must_use]
    pub const fn current(&self) -> Option<&Toast> {
        self.current.as_ref()
    }
}
