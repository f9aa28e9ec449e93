//! Status messages reported to the UI and their default copy.

use alloy::primitives::TxHash;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::blockchain::types::Network;

/// Size hint for an icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IconSize {
    Small,
    Medium,
    Large,
    Huge,
}

/// Icon descriptor rendered next to a status message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Icon {
    Emoji { emoji: String, size: IconSize },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub url: String,
    pub label: String,
}

/// One progress update: text, optional icon and optional link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusMessage {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<Icon>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<Link>,
}

impl StatusMessage {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            icon: None,
            link: None,
        }
    }

    pub fn with_icon(mut self, icon: Icon) -> Self {
        self.icon = Some(icon);
        self
    }

    pub fn with_link(mut self, url: impl Into<String>, label: impl Into<String>) -> Self {
        self.link = Some(Link {
            url: url.into(),
            label: label.into(),
        });
        self
    }
}

impl From<&str> for StatusMessage {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

pub fn getting_ready() -> StatusMessage {
    StatusMessage::new("Getting ready...")
}

pub fn waiting_for_signature(safe_mode: bool) -> StatusMessage {
    let message = if safe_mode {
        "Waiting for you to propose the transaction to your safe..."
    } else {
        "Waiting for you to confirm the transaction in your wallet..."
    };
    StatusMessage::new(message).with_icon(Icon::Emoji {
        emoji: "👛".to_string(),
        size: IconSize::Huge,
    })
}

pub fn waiting_for_confirmation(network: &Network, tx_hash: &TxHash) -> StatusMessage {
    StatusMessage::new("Waiting for your transaction to be confirmed on the network.")
        .with_link(network.tx_url(tx_hash), "View on Etherscan")
}

pub fn wrapping_up() -> StatusMessage {
    StatusMessage::new("Wrapping up...")
}

/// Receiver of progress updates while a flow runs.
pub trait ProgressSink: Send + Sync {
    fn update(&self, status: StatusMessage);
}

impl ProgressSink for mpsc::UnboundedSender<StatusMessage> {
    fn update(&self, status: StatusMessage) {
        // UI gone; the flow keeps running regardless
        let _ = self.send(status);
    }
}
