//! Block registry - maps block kind names to their tools.

use std::collections::HashMap;

use async_trait::async_trait;
use quill_api::{SanitizePolicy, Toolbox};
use serde_json::Value;

use crate::surface::{BlockInput, Surface};
use crate::{BlockError, HostApi};

/// A block type: static metadata plus a constructor for instances.
pub trait BlockTool: Send + Sync {
    /// Kind name stored in documents.
    fn name(&self) -> &str;

    /// Entry for the host's block-insertion menu.
    fn toolbox(&self) -> Toolbox;

    /// Per-field sanitization policy for this block's payload.
    fn sanitize(&self) -> SanitizePolicy;

    /// Build an instance from stored data. Missing or malformed fields fall
    /// back to defaults; this never fails.
    fn construct(&self, data: &Value, host: &HostApi) -> Box<dyn Block>;
}

/// One block in a document, with its in-memory state.
#[async_trait]
pub trait Block: Send + Sync {
    /// Kind name of the tool that built this block.
    fn name(&self) -> &str;

    /// Produce the editable view.
    fn render(&mut self) -> Surface;

    /// Apply a user edit to the in-memory state.
    fn apply(&mut self, input: BlockInput) -> Result<(), BlockError>;

    /// Serialize the current state into stored data.
    async fn save(&self) -> Result<Value, BlockError>;
}

/// Registry of all available block tools.
pub struct BlockRegistry {
    tools: Vec<Box<dyn BlockTool>>,
    by_name: HashMap<String, usize>,
}

impl BlockRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            tools: Vec::new(),
            by_name: HashMap::new(),
        }
    }

    /// Create a registry with the built-in block tools.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(crate::AlertTool));
        registry.register(Box::new(crate::ColumnsTool));
        registry.register(Box::new(crate::TimerTool));
        registry
    }

    /// Register a tool. A later tool with the same name shadows the earlier one.
    pub fn register(&mut self, tool: Box<dyn BlockTool>) {
        let index = self.tools.len();
        self.by_name.insert(tool.name().to_string(), index);
        self.tools.push(tool);
    }

    /// Find the tool for a kind name.
    pub fn find(&self, name: &str) -> Option<&dyn BlockTool> {
        self.by_name.get(name).map(|&idx| self.tools[idx].as_ref())
    }

    /// Menu entries of every reachable tool, in registration order.
    pub fn toolbox(&self) -> Vec<(&str, Toolbox)> {
        self.tools
            .iter()
            .enumerate()
            .filter(|(idx, tool)| self.by_name.get(tool.name()) == Some(idx))
            .map(|(_, tool)| (tool.name(), tool.toolbox()))
            .collect()
    }

    /// Construct a block of the given kind.
    pub fn construct(
        &self,
        name: &str,
        data: &Value,
        host: &HostApi,
    ) -> Result<Box<dyn Block>, BlockError> {
        let tool = self
            .find(name)
            .ok_or_else(|| BlockError::UnknownKind(name.to_string()))?;
        tracing::debug!(kind = name, "constructing block");
        Ok(tool.construct(data, host))
    }

    /// Sanitization policy of the given kind.
    pub fn sanitize(&self, name: &str) -> Result<SanitizePolicy, BlockError> {
        self.find(name)
            .map(|tool| tool.sanitize())
            .ok_or_else(|| BlockError::UnknownKind(name.to_string()))
    }
}

impl Default for BlockRegistry {
    fn default() -> Self {
        Self::new()
    }
}
