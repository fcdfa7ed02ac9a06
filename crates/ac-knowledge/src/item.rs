//! Knowledge item types.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Scope {
    Browser,
    Coding,
    DataAnalysis,
    FileOps,
    Search,
    Api,
    Shell,
    General,
}

impl Scope {
    pub fn as_str(self) -> &'static str {
        match self {
            Scope::Browser => "browser",
            Scope::Coding => "coding",
            Scope::DataAnalysis => "data-analysis",
            Scope::FileOps => "file-ops",
            Scope::Search => "search",
            Scope::Api => "api",
            Scope::Shell => "shell",
            Scope::General => "general",
        }
    }

    /// Canonical scope-to-tool-substring mapping.
    pub fn tool_substrings(self) -> &'static [&'static str] {
        match self {
            Scope::Browser => &["browser", "browser_use", "web"],
            Scope::Coding => &["python", "code", "execute"],
            Scope::DataAnalysis => &["pandas", "data", "analyze"],
            Scope::FileOps => &["file", "read", "write", "edit"],
            Scope::Search => &["search", "google", "bing"],
            Scope::Api => &["api", "http", "request"],
            Scope::Shell => &["bash", "shell", "terminal"],
            Scope::General => &[],
        }
    }

    pub const ALL: [Scope; 8] = [
        Scope::Browser,
        Scope::Coding,
        Scope::DataAnalysis,
        Scope::FileOps,
        Scope::Search,
        Scope::Api,
        Scope::Shell,
        Scope::General,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    BestPractice,
    Warning,
    Reference,
    Tip,
    Constraint,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::BestPractice => "best-practice",
            Category::Warning => "warning",
            Category::Reference => "reference",
            Category::Tip => "tip",
            Category::Constraint => "constraint",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeItem {
    pub id: String,
    pub scope: Scope,
    pub category: Category,
    pub content: String,
    pub triggers: Vec<String>,
    pub conditions: Option<String>,
    pub priority: u8,
    pub enabled: bool,
}

impl KnowledgeItem {
    pub fn new(
        id: impl Into<String>,
        scope: Scope,
        category: Category,
        content: impl Into<String>,
        triggers: Vec<&str>,
        priority: u8,
    ) -> Self {
        Self {
            id: id.into(),
            scope,
            category,
            content: content.into(),
            triggers: triggers.into_iter().map(|s| s.to_string()).collect(),
            conditions: None,
            priority,
            enabled: true,
        }
    }

    /// Matches when enabled AND (a trigger appears in `context` case
    /// insensitively, OR an active tool intersects this item's scope).
    pub fn matches(&self, context: &str, active_tools: &[String]) -> bool {
        if !self.enabled {
            return false;
        }
        let lower_context = context.to_lowercase();
        let trigger_match = self
            .triggers
            .iter()
            .any(|t| lower_context.contains(&t.to_lowercase()));
        if trigger_match {
            return true;
        }
        let substrings = self.scope.tool_substrings();
        active_tools.iter().any(|tool| {
            let lower_tool = tool.to_lowercase();
            substrings.iter().any(|s| lower_tool.contains(s))
        })
    }
}
