//! Card context passed explicitly into the building blocks.

use serde::{Deserialize, Serialize};

use crate::id::CardId;

/// Identity of the card a building block runs inside.
///
/// This is what the host would otherwise expose ambiently; callers construct
/// it once and hand it to the lookup controller and the access evaluator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardContext {
    card_id: CardId,
    card_prefix: String,
}

impl CardContext {
    pub fn new(card_id: impl Into<CardId>, card_prefix: impl Into<String>) -> Self {
        Self {
            card_id: card_id.into(),
            card_prefix: card_prefix.into(),
        }
    }

    pub fn card_id(&self) -> &CardId {
        &self.card_id
    }

    /// Server/tenant prefix the host assigns to this card's pipelines.
    pub fn card_prefix(&self) -> &str {
        &self.card_prefix
    }

    pub fn package_name(&self) -> &str {
        self.card_id.package_name()
    }
}
