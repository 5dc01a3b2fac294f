//! # Chat
//!
//! The recursive rich-text node embedded in status and kick payloads.
//!
//! Every optional field is omitted entirely from serialized output when
//! absent; clients reject explicit nulls. `extra` is omitted when empty
//! and `color` when blank or whitespace-only.

use serde::{Deserialize, Serialize};

/// One rich-text node. Children in `extra` inherit this node's styling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Chat {
    #[serde(default)]
    pub text: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub underlined: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strikethrough: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub obfuscated: Option<bool>,

    #[serde(default, skip_serializing_if = "color_is_blank")]
    pub color: Option<String>,

    #[serde(
        rename = "clickEvent",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub click_event: Option<ClickEvent>,

    #[serde(
        rename = "hoverEvent",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub hover_event: Option<HoverEvent>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra: Vec<Chat>,
}

fn color_is_blank(color: &Option<String>) -> bool {
    color.as_deref().is_none_or(|c| c.trim().is_empty())
}

/// Action taken when the client clicks this node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ClickEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_url: Option<String>,
}

/// Tooltip shown when the client hovers this node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoverEvent {
    pub show_text: Box<Chat>,
}

impl Chat {
    /// A plain node carrying only `text`.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }
}

impl From<&str> for Chat {
    fn from(text: &str) -> Self {
        Chat::text(text)
    }
}

impl From<String> for Chat {
    fn from(text: String) -> Self {
        Chat::text(text)
    }
}
