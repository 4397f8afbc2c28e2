//! Columns block - side-by-side child editors.
//!
//! Each column holds its own block sequence, edited in a child session the
//! host provides. Changing the column count starts every column over empty.

pub mod layout;
pub mod orchestrator;

use std::sync::Arc;

use async_trait::async_trait;
use quill_api::{BlockKind, FieldPolicy, SanitizePolicy, Toolbox};
use serde_json::Value;

use crate::host::SessionFactory;
use crate::surface::{BlockInput, Control, SelectOption, Surface};
use crate::{Block, BlockError, BlockTool, HostApi};

pub use layout::{ColumnLayout, DEFAULT_COLUMN_COUNT, SUPPORTED_COLUMN_COUNTS};
pub use orchestrator::{NestedEditorOrchestrator, SessionSet};

pub struct ColumnsTool;

impl BlockTool for ColumnsTool {
    fn name(&self) -> &str {
        BlockKind::Columns.as_str()
    }

    fn toolbox(&self) -> Toolbox {
        Toolbox::new("Columns", r#"<i class="bi bi-layout-three-columns"></i>"#)
    }

    fn sanitize(&self) -> SanitizePolicy {
        SanitizePolicy::new()
            .field("columns", FieldPolicy::Trusted)
            .field("content", FieldPolicy::rich_text())
    }

    fn construct(&self, data: &Value, host: &HostApi) -> Box<dyn Block> {
        Box::new(ColumnsBlock::new(ColumnLayout::from_persisted(data), host))
    }
}

pub struct ColumnsBlock {
    layout: ColumnLayout,
    orchestrator: NestedEditorOrchestrator,
    factory: Arc<dyn SessionFactory>,
}

impl ColumnsBlock {
    pub fn new(layout: ColumnLayout, host: &HostApi) -> Self {
        Self {
            layout,
            orchestrator: NestedEditorOrchestrator::new(host.child_config.clone()),
            factory: Arc::clone(&host.sessions),
        }
    }

    pub fn layout(&self) -> &ColumnLayout {
        &self.layout
    }

    pub fn orchestrator(&self) -> &NestedEditorOrchestrator {
        &self.orchestrator
    }

    /// Change the column count, discarding all column content, and give
    /// every column a fresh session.
    pub fn set_column_count(&mut self, count: usize) -> Result<(), BlockError> {
        self.layout.set_column_count(count)?;
        self.orchestrator.provision(&self.layout, self.factory.as_ref());
        Ok(())
    }
}

#[async_trait]
impl Block for ColumnsBlock {
    fn name(&self) -> &str {
        BlockKind::Columns.as_str()
    }

    fn render(&mut self) -> Surface {
        if !self.orchestrator.is_provisioned() {
            self.orchestrator.provision(&self.layout, self.factory.as_ref());
        }

        let options = SUPPORTED_COLUMN_COUNTS
            .map(|n| {
                let label = if n == 1 {
                    "1 Column".to_string()
                } else {
                    format!("{n} Columns")
                };
                SelectOption::new(n.to_string(), label)
            })
            .collect();

        let mut controls = vec![Control::Select {
            field: "columns",
            options,
            selected: self.layout.column_count().to_string(),
        }];
        controls.extend((0..self.layout.column_count()).map(|slot| Control::Slot {
            slot,
            container_id: format!("editor-column-{slot}"),
        }));

        Surface {
            class: "editor-columns-block",
            controls,
        }
    }

    fn apply(&mut self, input: BlockInput) -> Result<(), BlockError> {
        match &input {
            BlockInput::Selected { field, value } if field == "columns" => {
                let count = value
                    .trim()
                    .parse()
                    .map_err(|_| BlockError::UnsupportedInput {
                        block: "columns",
                        input: input.describe(),
                    })?;
                self.set_column_count(count)
            }
            _ => Err(BlockError::UnsupportedInput {
                block: "columns",
                input: input.describe(),
            }),
        }
    }

    async fn save(&self) -> Result<Value, BlockError> {
        // Never rendered: no sessions hold edits, the layout is current.
        let content = if self.orchestrator.is_provisioned() {
            self.orchestrator.serialize_all().await?
        } else {
            self.layout.slots().to_vec()
        };
        Ok(serde_json::to_value(self.layout.to_payload(content))?)
    }
}

impl Drop for ColumnsBlock {
    fn drop(&mut self) {
        self.orchestrator.teardown();
    }
}
