//! Adapter bridging travel-agent's [`Tool`] trait to rig-core's [`ToolDyn`].
//!
//! rig-core's agent builder only accepts its own tool objects, so each
//! registered tool is wrapped in a [`RigToolAdapter`] before the agent is
//! built. The adapter supplies the definition sent with each request and
//! runs the tool when the model asks for it.

use std::pin::Pin;
use std::sync::Arc;

use rig::completion::ToolDefinition as RigToolDefinition;
use rig::tool::{ToolDyn, ToolError};

use super::Tool;

pub struct RigToolAdapter {
    tool: Arc<dyn Tool>,
}

impl RigToolAdapter {
    pub fn new(tool: Arc<dyn Tool>) -> Self {
        Self { tool }
    }
}

impl ToolDyn for RigToolAdapter {
    fn name(&self) -> String {
        self.tool.name().to_string()
    }

    fn definition<'a>(
        &'a self,
        _prompt: String,
    ) -> Pin<Box<dyn std::future::Future<Output = RigToolDefinition> + Send + 'a>> {
        let name = self.tool.name().to_string();
        let description = self.tool.description().to_string();
        let parameters = self.tool.schema();
        Box::pin(async move {
            RigToolDefinition {
                name,
                description,
                parameters,
            }
        })
    }

    fn call<'a>(
        &'a self,
        args: String,
    ) -> Pin<Box<dyn std::future::Future<Output = Result<String, ToolError>> + Send + 'a>> {
        Box::pin(async move {
            // Zero-argument tools may be called with an empty string.
            let input: serde_json::Value = if args.trim().is_empty() {
                serde_json::Value::Object(Default::default())
            } else {
                serde_json::from_str(&args).map_err(ToolError::JsonError)?
            };
            tracing::debug!(tool = %self.tool.name(), %args, "model invoked tool");
            match self.tool.execute(input).await {
                Ok(result) if result.is_error => Ok(format!("Error: {}", result.content)),
                Ok(result) => Ok(result.content),
                // Returned as text so the model sees the failure instead of
                // rig-core nesting it inside ToolSetError.
                Err(e) => Ok(format!("Error: {}", e)),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::ToolResult;
    use anyhow::Result;
    use serde_json::{json, Value};

    struct FailingTool;

    #[async_trait::async_trait]
    impl Tool for FailingTool {
        fn name(&self) -> &str {
            "failing"
        }

        fn description(&self) -> &str {
            "Always fails."
        }

        fn schema(&self) -> Value {
            json!({"type": "object", "properties": {}})
        }

        async fn execute(&self, _input: Value) -> Result<ToolResult> {
            anyhow::bail!("boom")
        }
    }

    struct RefusingTool;

    #[async_trait::async_trait]
    impl Tool for RefusingTool {
        fn name(&self) -> &str {
            "refusing"
        }

        fn description(&self) -> &str {
            "Reports an error result."
        }

        fn schema(&self) -> Value {
            json!({"type": "object", "properties": {}})
        }

        async fn execute(&self, _input: Value) -> Result<ToolResult> {
            Ok(ToolResult::error("not today".to_string()))
        }
    }

    #[tokio::test]
    async fn test_definition_mirrors_tool() {
        let adapter = RigToolAdapter::new(Arc::new(FailingTool));
        assert_eq!(ToolDyn::name(&adapter), "failing");
        let def = adapter.definition(String::new()).await;
        assert_eq!(def.name, "failing");
        assert_eq!(def.description, "Always fails.");
        assert_eq!(def.parameters["type"], "object");
    }

    #[tokio::test]
    async fn test_execute_error_becomes_text() {
        let adapter = RigToolAdapter::new(Arc::new(FailingTool));
        let out = adapter.call("{}".to_string()).await.unwrap();
        assert_eq!(out, "Error: boom");
    }

    #[tokio::test]
    async fn test_error_result_becomes_text() {
        let adapter = RigToolAdapter::new(Arc::new(RefusingTool));
        let out = adapter.call(String::new()).await.unwrap();
        assert_eq!(out, "Error: not today");
    }

    #[tokio::test]
    async fn test_invalid_json_rejected() {
        let adapter = RigToolAdapter::new(Arc::new(FailingTool));
        assert!(adapter.call("{not json".to_string()).await.is_err());
    }
}
