//! Gate View
//!
//! Blocking two-field form (display name, job title). Leaving it requires a
//! valid submission; nothing else navigates away from it.

use thiserror::Error;
use tracing::{debug, info};

use crate::session::{Identity, SessionContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateField {
    DisplayName,
    Title,
}

impl GateField {
    pub fn label(&self) -> &'static str {
        match self {
            GateField::DisplayName => "Display name",
            GateField::Title => "Job title",
        }
    }

    fn other(&self) -> Self {
        match self {
            GateField::DisplayName => GateField::Title,
            GateField::Title => GateField::DisplayName,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Unauthenticated,
    Authenticated,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Please fill in: {}", missing_labels(.missing))]
pub struct ValidationError {
    pub missing: Vec<GateField>,
}

fn missing_labels(missing: &[GateField]) -> String {
    missing
        .iter()
        .map(GateField::label)
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Debug, Clone)]
pub struct GateView {
    display_name: String,
    title: String,
    focus: GateField,
    state: GateState,
    /// Whether this form edits an existing identity.
    editing: bool,
    error: Option<ValidationError>,
}

impl GateView {
    /// A fresh gate; already authenticated if the session holds an identity.
    pub fn new(session: &SessionContext) -> Self {
        let state = if session.is_present() {
            GateState::Authenticated
        } else {
            GateState::Unauthenticated
        };
        Self {
            display_name: String::new(),
            title: String::new(),
            focus: GateField::DisplayName,
            state,
            editing: false,
            error: None,
        }
    }

    /// The "edit my info" form, pre-filled from the current identity.
    pub fn edit(session: &SessionContext) -> Self {
        let mut gate = Self::new(session);
        if let Some(identity) = session.current() {
            gate.display_name = identity.display_name;
            gate.title = identity.title;
            gate.editing = true;
        }
        gate.state = GateState::Unauthenticated;
        gate
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub fn focus(&self) -> GateField {
        self.focus
    }

    pub fn error(&self) -> Option<&ValidationError> {
        self.error.as_ref()
    }

    pub fn value(&self, field: GateField) -> &str {
        match field {
            GateField::DisplayName => &self.display_name,
            GateField::Title => &self.title,
        }
    }

    pub fn set_value(&mut self, field: GateField, value: impl Into<String>) {
        *self.field_mut(field) = value.into();
    }

    pub fn toggle_focus(&mut self) {
        self.focus = self.focus.other();
    }

    pub fn input_char(&mut self, c: char) {
        let focus = self.focus;
        self.field_mut(focus).push(c);
    }

    pub fn backspace(&mut self) {
        let focus = self.focus;
        self.field_mut(focus).pop();
    }

    fn field_mut(&mut self, field: GateField) -> &mut String {
        match field {
            GateField::DisplayName => &mut self.display_name,
            GateField::Title => &mut self.title,
        }
    }

    /// Validates and, if both fields carry text, signs in (or updates the
    /// existing identity).
    pub fn submit(&mut self, session: &SessionContext) -> Result<Identity, ValidationError> {
        let display_name = self.display_name.trim().to_string();
        let title = self.title.trim().to_string();

        let mut missing = Vec::new();
        if display_name.is_empty() {
            missing.push(GateField::DisplayName);
        }
        if title.is_empty() {
            missing.push(GateField::Title);
        }
        if let Some(first) = missing.first() {
            self.focus = *first;
            let error = ValidationError { missing };
            debug!("Gate submission rejected: {}", error);
            self.error = Some(error.clone());
            return Err(error);
        }

        let identity = Identity {
            display_name,
            title,
        };
        if session.is_present() {
            session.update(identity.clone());
        } else {
            session.sign_in(&identity.display_name, &identity.title);
        }
        info!("Gate passed by {}", identity.display_name);

        self.display_name = identity.display_name.clone();
        self.title = identity.title.clone();
        self.error = None;
        self.state = GateState::Authenticated;
        Ok(identity)
    }
}
