//! Closure-backed tools.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;
use futures::FutureExt;
use serde_json::Value;

use crate::domain::ports::{Tool, ToolError};

type Handler = dyn Fn(Value) -> BoxFuture<'static, Result<String, ToolError>> + Send + Sync;

/// A [`Tool`] whose body is an async closure.
pub struct FnTool {
    name: String,
    description: String,
    parameters: Value,
    mutates: bool,
    handler: Box<Handler>,
}

impl FnTool {
    pub fn new<F, Fut>(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: Value,
        handler: F,
    ) -> Self
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<String, ToolError>> + Send + 'static,
    {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
            mutates: false,
            handler: Box::new(move |args| handler(args).boxed()),
        }
    }

    /// Mark the tool as modifying the workspace.
    pub fn mutating(mut self) -> Self {
        self.mutates = true;
        self
    }
}

impl fmt::Debug for FnTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnTool")
            .field("name", &self.name)
            .field("mutates", &self.mutates)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Tool for FnTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn parameters(&self) -> Value {
        self.parameters.clone()
    }

    fn mutates(&self) -> bool {
        self.mutates
    }

    async fn call(&self, args: Value) -> Result<String, ToolError> {
        (self.handler)(args).await
    }
}

/// Wrap an async closure as a shareable tool.
///
/// ```ignore
/// let search = tool(
///     "search_web",
///     "Search the web for a query.",
///     json!({"type": "object", "properties": {"query": {"type": "string"}}}),
///     |args| async move { Ok(do_search(&args["query"]).await) },
/// );
/// ```
pub fn tool<F, Fut>(
    name: impl Into<String>,
    description: impl Into<String>,
    parameters: Value,
    handler: F,
) -> Arc<dyn Tool>
where
    F: Fn(Value) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<String, ToolError>> + Send + 'static,
{
    Arc::new(FnTool::new(name, description, parameters, handler))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::parse_args;
    use serde_json::json;

    #[derive(serde::Deserialize)]
    struct Greeting {
        name: String,
    }

    #[tokio::test]
    async fn test_closure_tool_is_called_with_args() {
        let greet = tool(
            "greet",
            "Say hello.",
            json!({"type": "object", "properties": {"name": {"type": "string"}}}),
            |args| async move {
                let input: Greeting = parse_args("greet", args)?;
                Ok(format!("Hello, {}!", input.name))
            },
        );

        assert_eq!(greet.name(), "greet");
        assert_eq!(greet.description(), "Say hello.");
        assert!(!greet.mutates());
        assert_eq!(greet.call(json!({"name": "Konan"})).await.unwrap(), "Hello, Konan!");
        assert!(greet.call(json!({})).await.is_err());
    }

    #[test]
    fn test_mutating_flag() {
        let t = FnTool::new("deploy", "Deploy.", json!({}), |_| async { Ok(String::new()) })
            .mutating();
        assert!(t.mutates());
        assert!(format!("{t:?}").contains("deploy"));
    }
}
