//! Column layout - N parallel slots, each holding a block sequence.

use std::ops::RangeInclusive;

use quill_api::{BlockSequence, ColumnsPayload};
use serde_json::Value;

use crate::error::LayoutError;

pub const SUPPORTED_COLUMN_COUNTS: RangeInclusive<usize> = 1..=4;
pub const DEFAULT_COLUMN_COUNT: usize = 2;

/// Invariant: `slots.len() == column_count`, and the count is supported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnLayout {
    column_count: usize,
    slots: Vec<BlockSequence>,
}

impl ColumnLayout {
    /// A layout with `count` empty slots.
    pub fn new(count: usize) -> Result<Self, LayoutError> {
        check(count)?;
        Ok(Self::empty(count))
    }

    fn empty(count: usize) -> Self {
        Self {
            column_count: count,
            slots: vec![Vec::new(); count],
        }
    }

    /// Build from stored data, coercing anything malformed.
    ///
    /// Unsupported or missing counts become the default; slot lists that are
    /// too short are padded with empty slots, too long ones are truncated.
    pub fn from_persisted(data: &Value) -> Self {
        let count = data
            .get("columns")
            .and_then(|v| {
                v.as_u64()
                    .or_else(|| v.as_str().and_then(|s| s.trim().parse().ok()))
            })
            .map(|n| n as usize)
            .filter(|n| SUPPORTED_COLUMN_COUNTS.contains(n))
            .unwrap_or_else(|| {
                tracing::debug!(columns = ?data.get("columns"), "column count defaulted");
                DEFAULT_COLUMN_COUNT
            });

        let mut slots: Vec<BlockSequence> = data
            .get("content")
            .and_then(Value::as_array)
            .map(|content| {
                content
                    .iter()
                    .map(|slot| slot.as_array().cloned().unwrap_or_default())
                    .collect()
            })
            .unwrap_or_default();
        if slots.len() != count {
            tracing::debug!(
                found = slots.len(),
                expected = count,
                "column content resized to column count"
            );
        }
        slots.resize_with(count, Vec::new);

        Self {
            column_count: count,
            slots,
        }
    }

    pub fn column_count(&self) -> usize {
        self.column_count
    }

    pub fn slots(&self) -> &[BlockSequence] {
        &self.slots
    }

    pub fn slot(&self, index: usize) -> Option<&BlockSequence> {
        self.slots.get(index)
    }

    /// Change the number of columns. Every slot is rebuilt empty, including
    /// slots that exist before and after the change. On error the layout is
    /// left untouched.
    pub fn set_column_count(&mut self, count: usize) -> Result<(), LayoutError> {
        check(count)?;
        *self = Self::empty(count);
        Ok(())
    }

    /// Persisted form with the given slot contents.
    pub fn to_payload(&self, content: Vec<BlockSequence>) -> ColumnsPayload {
        ColumnsPayload {
            columns: self.column_count,
            content,
        }
    }
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self::empty(DEFAULT_COLUMN_COUNT)
    }
}

fn check(count: usize) -> Result<(), LayoutError> {
    if SUPPORTED_COLUMN_COUNTS.contains(&count) {
        Ok(())
    } else {
        Err(LayoutError::UnsupportedColumnCount(count))
    }
}
