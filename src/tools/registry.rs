//! Tool registry
//!
//! Process-local table from tool name to handler. Registration replaces any
//! previous handler under the same name. Lookups share a read lock, and the
//! handler runs after the lock is released, so a slow tool never blocks
//! registration or other calls.
//!
//! Two failure classes stay distinct:
//! - unknown name: `Err(ClientError::ToolNotFound)`
//! - handler failure: `Ok(ToolCallResult { status: Error, .. })`

use crate::errors::{ClientError, Result};
use crate::types::{Message, Tool, ToolArguments, ToolCallResult};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Instant;

/// Executable tool body
pub type ToolHandler = Arc<dyn Fn(&ToolArguments) -> anyhow::Result<Value> + Send + Sync>;

struct ToolEntry {
    handler: ToolHandler,
    declaration: Option<Tool>,
}

/// Shared, cheaply cloneable tool table
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: Arc<RwLock<HashMap<String, ToolEntry>>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` under `name`, replacing any existing one
    pub fn register_tool<F>(&self, name: impl Into<String>, handler: F)
    where
        F: Fn(&ToolArguments) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        self.insert(name.into(), Arc::new(handler), None);
    }

    /// Register a handler together with the declaration sent to the model
    pub fn register<F>(&self, tool: Tool, handler: F)
    where
        F: Fn(&ToolArguments) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        let name = tool.name().to_string();
        self.insert(name, Arc::new(handler), Some(tool));
    }

    fn insert(&self, name: String, handler: ToolHandler, declaration: Option<Tool>) {
        self.write().insert(
            name,
            ToolEntry {
                handler,
                declaration,
            },
        );
    }

    /// Run the tool registered as `name`
    pub fn call_tool(&self, name: &str, args: &ToolArguments) -> Result<ToolCallResult> {
        let handler = self
            .read()
            .get(name)
            .map(|entry| Arc::clone(&entry.handler))
            .ok_or_else(|| ClientError::ToolNotFound(name.to_string()))?;

        let started = Instant::now();
        let outcome = handler(args);
        let duration_ms = started.elapsed().as_millis() as u64;

        let result = match outcome {
            Ok(value) => ToolCallResult::success(value),
            Err(e) => ToolCallResult::failure(format!("{:#}", e)),
        };

        Ok(result
            .with_metadata("tool", json!(name))
            .with_metadata("duration_ms", json!(duration_ms)))
    }

    /// Run every tool call carried by a model message, in order
    pub fn call_tool_calls(&self, message: &Message) -> Vec<(String, Result<ToolCallResult>)> {
        message
            .tool_calls
            .iter()
            .map(|call| {
                let name = call.function.name.clone();
                let outcome = self.call_tool(&name, &call.function.arguments);
                (name, outcome)
            })
            .collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.read().contains_key(name)
    }

    /// Registered names, sorted
    pub fn tool_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Declarations of tools registered through [`register`](Self::register), sorted by name
    pub fn declarations(&self) -> Vec<Tool> {
        let mut tools: Vec<Tool> = self
            .read()
            .values()
            .filter_map(|entry| entry.declaration.clone())
            .collect();
        tools.sort_by(|a, b| a.name().cmp(b.name()));
        tools
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, ToolEntry>> {
        self.tools.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, ToolEntry>> {
        self.tools.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.tool_names())
            .finish()
    }
}
