//! The Knowledge Registry.

use parking_lot::RwLock;

use crate::item::{Category, KnowledgeItem, Scope};

pub struct KnowledgeRegistry {
    items: RwLock<Vec<KnowledgeItem>>,
    pub max_injections: usize,
}

impl KnowledgeRegistry {
    pub fn new(max_injections: usize) -> Self {
        Self {
            items: RwLock::new(Vec::new()),
            max_injections,
        }
    }

    /// Pre-populated with a default catalog spanning every scope, so a
    /// freshly constructed agent has useful context before any caller
    /// registers custom items.
    pub fn with_defaults(max_injections: usize) -> Self {
        let registry = Self::new(max_injections);
        for item in default_items() {
            registry.register(item);
        }
        registry
    }

    pub fn register(&self, item: KnowledgeItem) {
        let mut items = self.items.write();
        items.retain(|existing| existing.id != item.id);
        items.push(item);
    }

    pub fn unregister(&self, id: &str) {
        self.items.write().retain(|item| item.id != id);
    }

    /// Items matching `context`/`active_tools`, sorted by descending
    /// priority, truncated to `max_injections`. Deterministic and
    /// order-insensitive in `tools`: sorting is by priority then id.
    pub fn relevant(&self, context: &str, active_tools: &[String]) -> Vec<KnowledgeItem> {
        let items = self.items.read();
        let mut matched: Vec<KnowledgeItem> = items
            .iter()
            .filter(|item| item.matches(context, active_tools))
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.priority.cmp(&a.priority).then_with(|| a.id.cmp(&b.id)));
        matched.truncate(self.max_injections);
        matched
    }

    /// Maps tool-name substrings to scopes.
    pub fn tool_scope_detect(&self, tools: &[String]) -> Vec<Scope> {
        let mut detected = Vec::new();
        for scope in Scope::ALL {
            let substrings = scope.tool_substrings();
            if substrings.is_empty() {
                continue;
            }
            let hit = tools.iter().any(|tool| {
                let lower = tool.to_lowercase();
                substrings.iter().any(|s| lower.contains(s))
            });
            if hit {
                detected.push(scope);
            }
        }
        detected
    }
}

fn default_items() -> Vec<KnowledgeItem> {
    vec![
        KnowledgeItem::new(
            "browser-wait-for-load",
            Scope::Browser,
            Category::BestPractice,
            "Wait for page load/network-idle before interacting with elements.",
            vec!["browser", "page", "click"],
            6,
        ),
        KnowledgeItem::new(
            "coding-small-diffs",
            Scope::Coding,
            Category::BestPractice,
            "Prefer small, verifiable changes; run relevant tests after each edit.",
            vec!["code", "python", "refactor"],
            7,
        ),
        KnowledgeItem::new(
            "coding-no-secrets",
            Scope::Coding,
            Category::Constraint,
            "Never hardcode credentials or API keys in generated code.",
            vec!["code", "api key", "secret"],
            9,
        ),
        KnowledgeItem::new(
            "data-analysis-check-nulls",
            Scope::DataAnalysis,
            Category::Tip,
            "Check for null/missing values before aggregating a dataset.",
            vec!["data", "pandas", "analyze"],
            5,
        ),
        KnowledgeItem::new(
            "file-ops-backup-before-overwrite",
            Scope::FileOps,
            Category::Warning,
            "Confirm a file's existing content before overwriting it.",
            vec!["file", "write", "overwrite"],
            8,
        ),
        KnowledgeItem::new(
            "file-ops-path-safety",
            Scope::FileOps,
            Category::Constraint,
            "Never write outside the declared workspace root.",
            vec!["file", "path", "write"],
            9,
        ),
        KnowledgeItem::new(
            "search-prefer-recent",
            Scope::Search,
            Category::Tip,
            "Prefer recent, authoritative sources over forum posts for factual queries.",
            vec!["search", "google", "lookup"],
            4,
        ),
        KnowledgeItem::new(
            "api-respect-rate-limits",
            Scope::Api,
            Category::BestPractice,
            "Respect documented rate limits; back off on 429/5xx instead of retrying immediately.",
            vec!["api", "http", "request"],
            6,
        ),
        KnowledgeItem::new(
            "shell-no-destructive-defaults",
            Scope::Shell,
            Category::Warning,
            "Avoid destructive shell commands (rm -rf, force-push) without explicit confirmation.",
            vec!["bash", "shell", "rm", "delete"],
            9,
        ),
        KnowledgeItem::new(
            "general-state-assumptions",
            Scope::General,
            Category::Reference,
            "State assumptions explicitly when the request is ambiguous, rather than guessing silently.",
            vec!["ambiguous", "unclear", "assume"],
            3,
        ),
        KnowledgeItem::new(
            "general-terminate-when-done",
            Scope::General,
            Category::Tip,
            "Invoke the terminal tool once the plan's objective is verifiably satisfied.",
            vec!["done", "finished", "complete"],
            3,
        ),
    ]
}
