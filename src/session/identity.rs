use serde::{Deserialize, Serialize};

/// The display name + job title pair that unlocks the list screens.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub display_name: String,
    pub title: String,
}

impl Identity {
    /// Builds an identity from raw form input. Both fields are trimmed and
    /// must be non-empty afterwards.
    pub fn new(display_name: impl AsRef<str>, title: impl AsRef<str>) -> Option<Self> {
        let display_name = display_name.as_ref().trim();
        let title = title.as_ref().trim();
        if display_name.is_empty() || title.is_empty() {
            return None;
        }
        Some(Self {
            display_name: display_name.to_string(),
            title: title.to_string(),
        })
    }

    /// A stored value is only usable when both fields carry text.
    pub fn is_valid(&self) -> bool {
        !self.display_name.trim().is_empty() && !self.title.trim().is_empty()
    }
}
