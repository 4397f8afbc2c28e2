//! Alert block - a styled message box.

use async_trait::async_trait;
use quill_api::{AlertPayload, AlertVariant, BlockKind, FieldPolicy, SanitizePolicy, Toolbox};
use serde_json::Value;

use crate::surface::{BlockInput, Control, SelectOption, Surface};
use crate::{Block, BlockError, BlockTool, HostApi};

pub struct AlertTool;

impl BlockTool for AlertTool {
    fn name(&self) -> &str {
        BlockKind::Alert.as_str()
    }

    fn toolbox(&self) -> Toolbox {
        Toolbox::new("Alert", r#"<i class="bi bi-exclamation-triangle-fill"></i>"#)
    }

    fn sanitize(&self) -> SanitizePolicy {
        SanitizePolicy::new()
            .field("type", FieldPolicy::Trusted)
            .field("message", FieldPolicy::rich_text())
    }

    fn construct(&self, data: &Value, _host: &HostApi) -> Box<dyn Block> {
        Box::new(AlertBlock::new(AlertPayload::from_data(data)))
    }
}

#[derive(Debug, Clone)]
pub struct AlertBlock {
    payload: AlertPayload,
}

impl AlertBlock {
    pub fn new(payload: AlertPayload) -> Self {
        Self { payload }
    }

    pub fn payload(&self) -> &AlertPayload {
        &self.payload
    }
}

#[async_trait]
impl Block for AlertBlock {
    fn name(&self) -> &str {
        BlockKind::Alert.as_str()
    }

    fn render(&mut self) -> Surface {
        let options = AlertVariant::ALL
            .iter()
            .map(|v| SelectOption::new(v.as_str(), v.label()))
            .collect();

        Surface {
            class: "editor-alert-block",
            controls: vec![
                Control::Select {
                    field: "type",
                    options,
                    selected: self.payload.variant.as_str().to_string(),
                },
                Control::TextArea {
                    field: "message",
                    placeholder: "Enter alert message...",
                    value: self.payload.message.clone(),
                },
            ],
        }
    }

    fn apply(&mut self, input: BlockInput) -> Result<(), BlockError> {
        match &input {
            BlockInput::Selected { field, value } if field == "type" => {
                if let Some(variant) = AlertVariant::parse(value) {
                    self.payload.variant = variant;
                    return Ok(());
                }
            }
            BlockInput::Text { field, value } if field == "message" => {
                self.payload.message = value.clone();
                return Ok(());
            }
            _ => {}
        }
        Err(BlockError::UnsupportedInput {
            block: "alert",
            input: input.describe(),
        })
    }

    async fn save(&self) -> Result<Value, BlockError> {
        Ok(serde_json::to_value(&self.payload)?)
    }
}
