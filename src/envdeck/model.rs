use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A named backend profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub description: Option<String>,
}

impl Environment {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            active: false,
            description: None,
        }
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Partial update for an environment. `None` leaves a field untouched.
///
/// `description` is doubly optional so a patch can clear it:
/// `Some(None)` removes the description, `None` keeps the current one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvironmentPatch {
    pub name: Option<String>,
    pub url: Option<String>,
    pub active: Option<bool>,
    pub description: Option<Option<String>>,
}

impl EnvironmentPatch {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn active(mut self, active: bool) -> Self {
        self.active = Some(active);
        self
    }

    pub fn description(mut self, description: Option<String>) -> Self {
        self.description = Some(description);
        self
    }

    /// A patch must touch at least one of name, url or active.
    pub fn has_key_fields(&self) -> bool {
        self.name.is_some() || self.url.is_some() || self.active.is_some()
    }
}

/// Full replacement of an environment's editable fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentEdit {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl EnvironmentEdit {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }
}

/// Markdown notes attached to one environment, keyed by the environment name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub name: String,
    // Older data files wrote the body under "documentation".
    #[serde(default, alias = "documentation")]
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            name: name.into(),
            content: content.into(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// The environment captured by `begin_edit`, waiting for `commit_edit`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagedEdit {
    pub item: Environment,
}

impl StagedEdit {
    pub fn name(&self) -> &str {
        &self.item.name
    }
}

// On-disk envelopes

#[derive(Debug, Default, Serialize, Deserialize)]
pub(crate) struct EnvironmentsFile {
    #[serde(default)]
    pub environments: Vec<Environment>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub(crate) struct DocumentationsFile {
    #[serde(default)]
    pub documentations: Vec<Document>,
}
