//! Tool catalog snapshots: a stable view of which tools are available.
//!
//! The Assembler and Agent Loop consume a `ToolCatalogSnapshot`, never the
//! live catalog, so prompt construction stays stable within a step even if
//! tools are added or removed concurrently by an external bridge.

use std::collections::HashMap;
use std::sync::Arc;

use ac_domain::message::ToolDefinition;
use parking_lot::RwLock;

use crate::traits::Tool;

/// An immutable point-in-time view of the registered tools.
#[derive(Debug, Clone, Default)]
pub struct ToolCatalogSnapshot {
    definitions: Vec<ToolDefinition>,
}

impl ToolCatalogSnapshot {
    pub fn definitions(&self) -> &[ToolDefinition] {
        &self.definitions
    }

    pub fn names(&self) -> Vec<String> {
        self.definitions.iter().map(|d| d.name.clone()).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.definitions.iter().any(|d| d.name == name)
    }
}

/// Live, mutable registry of tools, keyed by name.
pub struct ToolCatalog {
    tools: RwLock<HashMap<String, Arc<dyn Tool>>>,
}

impl Default for ToolCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolCatalog {
    pub fn new() -> Self {
        Self {
            tools: RwLock::new(HashMap::new()),
        }
    }

    pub fn add(&self, tool: Arc<dyn Tool>) {
        self.tools.write().insert(tool.name().to_string(), tool);
    }

    pub fn remove(&self, name: &str) {
        self.tools.write().remove(name);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.read().get(name).cloned()
    }

    /// A stable snapshot for this step's prompt construction and dispatch.
    pub fn snapshot(&self) -> ToolCatalogSnapshot {
        let tools = self.tools.read();
        let mut definitions: Vec<ToolDefinition> = tools
            .values()
            .map(|t| ToolDefinition {
                name: t.name().to_string(),
                description: t.description().to_string(),
                parameters: t.parameters(),
            })
            .collect();
        definitions.sort_by(|a, b| a.name.cmp(&b.name));
        ToolCatalogSnapshot { definitions }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stub::FixedTool;

    #[test]
    fn snapshot_reflects_current_registrations() {
        let catalog = ToolCatalog::new();
        catalog.add(Arc::new(FixedTool::new("list_files", "lists files")));
        let snap = catalog.snapshot();
        assert!(snap.contains("list_files"));
        catalog.remove("list_files");
        let snap = catalog.snapshot();
        assert!(!snap.contains("list_files"));
    }
}
