//! Block kinds and their persisted payloads.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The kind of a content block, as stored in documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    Alert,
    Columns,
    Timer,
}

impl BlockKind {
    pub const ALL: [BlockKind; 3] = [BlockKind::Alert, BlockKind::Columns, BlockKind::Timer];

    pub fn as_str(&self) -> &'static str {
        match self {
            BlockKind::Alert => "alert",
            BlockKind::Columns => "columns",
            BlockKind::Timer => "timer",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Entry shown in the host's block-insertion menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toolbox {
    pub title: String,
    pub icon: String,
}

impl Toolbox {
    pub fn new(title: impl Into<String>, icon: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            icon: icon.into(),
        }
    }
}

/// An ordered run of child block records. The records belong to the host's
/// block format and are never interpreted here.
pub type BlockSequence = Vec<Value>;

// ============================================================================
// Alert
// ============================================================================

/// Visual style of an alert box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertVariant {
    #[default]
    Primary,
    Secondary,
    Success,
    Danger,
    Warning,
    Info,
    Light,
    Dark,
}

impl AlertVariant {
    pub const ALL: [AlertVariant; 8] = [
        AlertVariant::Primary,
        AlertVariant::Secondary,
        AlertVariant::Success,
        AlertVariant::Danger,
        AlertVariant::Warning,
        AlertVariant::Info,
        AlertVariant::Light,
        AlertVariant::Dark,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AlertVariant::Primary => "primary",
            AlertVariant::Secondary => "secondary",
            AlertVariant::Success => "success",
            AlertVariant::Danger => "danger",
            AlertVariant::Warning => "warning",
            AlertVariant::Info => "info",
            AlertVariant::Light => "light",
            AlertVariant::Dark => "dark",
        }
    }

    /// Human-readable label for selection controls.
    pub fn label(&self) -> &'static str {
        match self {
            AlertVariant::Primary => "Primary",
            AlertVariant::Secondary => "Secondary",
            AlertVariant::Success => "Success",
            AlertVariant::Danger => "Danger",
            AlertVariant::Warning => "Warning",
            AlertVariant::Info => "Info",
            AlertVariant::Light => "Light",
            AlertVariant::Dark => "Dark",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.as_str() == name)
    }
}

/// Persisted data of an alert block.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AlertPayload {
    #[serde(rename = "type")]
    pub variant: AlertVariant,
    /// Rich text; filtered by the host against the block's sanitize policy.
    pub message: String,
}

impl AlertPayload {
    /// Build from stored data, falling back to defaults field by field.
    pub fn from_data(data: &Value) -> Self {
        let variant = data
            .get("type")
            .and_then(Value::as_str)
            .and_then(AlertVariant::parse)
            .unwrap_or_default();
        let message = string_field(data, "message");
        Self { variant, message }
    }
}

// ============================================================================
// Timer
// ============================================================================

/// Persisted data of a countdown timer block.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TimerPayload {
    /// ISO-8601 deadline, or empty when no deadline was picked yet.
    #[serde(rename = "countdownDate")]
    pub deadline: String,
}

impl TimerPayload {
    pub fn from_data(data: &Value) -> Self {
        Self {
            deadline: string_field(data, "countdownDate"),
        }
    }
}

// ============================================================================
// Columns
// ============================================================================

/// Persisted data of a columns block.
///
/// `content.len() == columns` holds for every payload produced by this crate
/// family; documents written elsewhere are normalized on load.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ColumnsPayload {
    pub columns: usize,
    pub content: Vec<BlockSequence>,
}

fn string_field(data: &Value, key: &str) -> String {
    data.get(key)
        .and_then(Value::as_str)
        .map(str::to_owned)
        .unwrap_or_default()
}
