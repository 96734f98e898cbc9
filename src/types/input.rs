//! Classification input types

use serde::{Deserialize, Serialize};

/// File metadata attached to a message.
///
/// Only the name and MIME type are inspected, never the contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub mime_type: String,
}

impl Attachment {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
        }
    }
}

/// Text (and optional attachments) submitted for analysis.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClassificationInput {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

impl ClassificationInput {
    /// Create an input from text alone.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            attachments: Vec::new(),
        }
    }

    /// Add an attachment.
    pub fn with_attachment(mut self, name: impl Into<String>, mime_type: impl Into<String>) -> Self {
        self.attachments.push(Attachment::new(name, mime_type));
        self
    }

    /// Whether any attachments were supplied.
    pub fn has_attachments(&self) -> bool {
        !self.attachments.is_empty()
    }
}
