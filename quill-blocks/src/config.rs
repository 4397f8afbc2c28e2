//! Host-tunable configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for the countdown live view.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Cadence of countdown refreshes after the initial one.
    pub tick_interval: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(1000),
        }
    }
}

/// Which tools a column's child editor offers.
///
/// Hosts usually load this from their own settings file; every field falls
/// back to the stock toolset when absent.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChildEditorConfig {
    pub header: HeaderTool,
    pub paragraph: InlineTool,
    pub image: ImageTool,
    pub list: InlineTool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HeaderTool {
    pub levels: Vec<u8>,
    pub default_level: u8,
    pub inline_toolbar: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InlineTool {
    pub inline_toolbar: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageTool {
    pub endpoints: ImageEndpoints,
}

/// Upload endpoints handed to the child editor's image tool. Serving them is
/// the host's business.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ImageEndpoints {
    pub by_file: String,
    pub by_url: String,
}

impl Default for HeaderTool {
    fn default() -> Self {
        Self {
            levels: vec![1, 2, 3],
            default_level: 2,
            inline_toolbar: vec!["link".to_string()],
        }
    }
}

impl Default for InlineTool {
    fn default() -> Self {
        Self {
            inline_toolbar: true,
        }
    }
}

impl Default for ImageEndpoints {
    fn default() -> Self {
        Self {
            by_file: "/uploadFile".to_string(),
            by_url: "/fetchUrl".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scheduler_default_is_one_hertz() {
        assert_eq!(
            SchedulerConfig::default().tick_interval,
            Duration::from_secs(1)
        );
    }

    #[test]
    fn test_child_config_partial_override() {
        let config: ChildEditorConfig = serde_json::from_value(json!({
            "header": { "levels": [2, 3] },
            "image": { "endpoints": { "byFile": "/api/upload" } }
        }))
        .unwrap();

        assert_eq!(config.header.levels, vec![2, 3]);
        assert_eq!(config.header.default_level, 2);
        assert_eq!(config.image.endpoints.by_file, "/api/upload");
        assert_eq!(config.image.endpoints.by_url, "/fetchUrl");
        assert!(config.list.inline_toolbar);
    }

    #[test]
    fn test_child_config_wire_shape() {
        let value = serde_json::to_value(ChildEditorConfig::default()).unwrap();
        assert_eq!(value["header"]["defaultLevel"], json!(2));
        assert_eq!(value["header"]["inlineToolbar"], json!(["link"]));
        assert_eq!(value["image"]["endpoints"]["byUrl"], json!("/fetchUrl"));
    }
}
