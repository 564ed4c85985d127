//! The `get_random_destination` tool.

use anyhow::Result;
use serde_json::{json, Value};
use std::sync::Arc;

use super::{Tool, ToolResult};
use crate::destinations::DestinationPicker;

/// Exposes a shared [`DestinationPicker`] to the model. Takes no arguments.
pub struct RandomDestinationTool {
    picker: Arc<DestinationPicker>,
}

impl RandomDestinationTool {
    pub fn new(picker: Arc<DestinationPicker>) -> Self {
        Self { picker }
    }
}

#[async_trait::async_trait]
impl Tool for RandomDestinationTool {
    fn name(&self) -> &str {
        crate::constants::RANDOM_DESTINATION_TOOL
    }

    fn description(&self) -> &str {
        "Provides a random vacation destination."
    }

    fn schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {},
            "required": []
        })
    }

    async fn execute(&self, _input: Value) -> Result<ToolResult> {
        let previous = self.picker.last_pick().map(str::to_string);
        let destination = self.picker.pick_next().to_string();
        tracing::info!(destination = %destination, previous = ?previous, "tool picked destination");
        Ok(ToolResult::success(destination))
    }
}
