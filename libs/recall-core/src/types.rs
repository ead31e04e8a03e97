//! Shared types for the flashcard domain.

use serde::{Deserialize, Serialize};

/// Term/definition content of a single card.
///
/// This is the shape study sessions operate on and the shape card lists are
/// submitted in when a set is created or its cards are replaced wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardContent {
    pub term: String,
    pub definition: String,
    /// Optional media URL backing the card.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

impl CardContent {
    /// Create card content without a reference URL.
    pub fn new(term: impl Into<String>, definition: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            definition: definition.into(),
            reference: None,
        }
    }
}
