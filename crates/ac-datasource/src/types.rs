//! Datasource descriptor types.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scheme", rename_all = "snake_case")]
pub enum AuthScheme {
    None,
    ApiKey { header: String, env_var: String },
    Bearer { env_var: String },
    Basic { username_env_var: String, password_env_var: String },
    OAuth2 { env_var: String },
    Custom { description: String },
}

impl AuthScheme {
    pub fn label(&self) -> &'static str {
        match self {
            AuthScheme::None => "none",
            AuthScheme::ApiKey { .. } => "api-key",
            AuthScheme::Bearer { .. } => "bearer",
            AuthScheme::Basic { .. } => "basic",
            AuthScheme::OAuth2 { .. } => "oauth2",
            AuthScheme::Custom { .. } => "custom",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub param_type: String,
    pub required: bool,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Endpoint {
    pub path: String,
    pub method: HttpMethod,
    pub description: String,
    pub parameters: Vec<Parameter>,
    pub example: Option<String>,
    pub rate_limit: Option<String>,
}

impl Endpoint {
    pub fn to_documentation(&self) -> String {
        let mut lines = vec![format!("{} {} — {}", self.method.as_str(), self.path, self.description)];
        for p in &self.parameters {
            lines.push(format!(
                "  - {} ({}{}): {}",
                p.name,
                p.param_type,
                if p.required { ", required" } else { "" },
                p.description
            ));
        }
        if let Some(example) = &self.example {
            lines.push(format!("  example: {example}"));
        }
        if let Some(rl) = &self.rate_limit {
            lines.push(format!("  rate limit: {rl}"));
        }
        lines.join("\n")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Datasource {
    pub id: String,
    pub name: String,
    pub description: String,
    pub base_url: String,
    pub auth: AuthScheme,
    pub endpoints: Vec<Endpoint>,
    pub tags: Vec<String>,
    pub priority: u8,
    pub enabled: bool,
    pub usage_count: u64,
}

impl Datasource {
    pub fn matches_query(&self, query: &str) -> bool {
        // An empty query is a substring of every field, so a literal port of the
        // containment checks below would match everything; treat it as no match.
        if query.trim().is_empty() {
            return false;
        }
        let query_lower = query.to_lowercase();
        let name_lower = self.name.to_lowercase();
        if name_lower.contains(&query_lower) || query_lower.contains(&name_lower) {
            return true;
        }
        if self.tags.iter().any(|t| query_lower.contains(&t.to_lowercase())) {
            return true;
        }
        self.endpoints
            .iter()
            .any(|e| e.description.to_lowercase().contains(&query_lower))
    }

    pub fn to_documentation(&self) -> String {
        let mut lines = vec![format!(
            "{} ({}) — {}\nauth: {}",
            self.name,
            self.base_url,
            self.description,
            self.auth.label()
        )];
        for endpoint in &self.endpoints {
            lines.push(endpoint.to_documentation());
        }
        lines.join("\n\n")
    }

    /// A short Rust code fragment seeding `suggest_api_call` — exact text
    /// is not a stability contract.
    pub fn generate_rust_snippet(&self, query_params: &[(&str, &str)]) -> Option<String> {
        let endpoint = self.endpoints.first()?;
        let params_src: String = query_params
            .iter()
            .map(|(k, v)| format!("(\"{k}\", \"{v}\")"))
            .collect::<Vec<_>>()
            .join(", ");
        let method = endpoint.method.as_str().to_lowercase();
        Some(format!(
            "let client = api_client.handle(\"{}\");\nlet response = client.{}(\"{}\", &[{}]).await?;",
            self.id, method, endpoint.path, params_src
        ))
    }
}
