//! The Datasource Registry.

use parking_lot::RwLock;

use crate::types::{AuthScheme, Datasource, Endpoint, HttpMethod, Parameter};

pub struct DatasourceRegistry {
    items: RwLock<Vec<Datasource>>,
}

impl DatasourceRegistry {
    pub fn new() -> Self {
        Self {
            items: RwLock::new(Vec::new()),
        }
    }

    /// Pre-populated with illustrative defaults so `find_relevant`/
    /// `documentation` have realistic fixtures without a caller having to
    /// populate the registry first.
    pub fn with_defaults() -> Self {
        let registry = Self::new();
        for item in default_datasources() {
            registry.register(item);
        }
        registry
    }

    pub fn register(&self, item: Datasource) {
        let mut items = self.items.write();
        items.retain(|existing| existing.id != item.id);
        items.push(item);
    }

    pub fn unregister(&self, id: &str) {
        self.items.write().retain(|item| item.id != id);
    }

    pub fn get(&self, id: &str) -> Option<Datasource> {
        self.items.read().iter().find(|d| d.id == id).cloned()
    }

    /// Matches by boolean OR across name/tags/endpoint description. Ties
    /// broken by descending priority, then descending usage_count, then
    /// lexicographic id.
    pub fn find_relevant(&self, query: &str, limit: usize) -> Vec<Datasource> {
        let items = self.items.read();
        let mut matched: Vec<Datasource> = items
            .iter()
            .filter(|d| d.enabled && d.matches_query(query))
            .cloned()
            .collect();
        matched.sort_by(|a, b| {
            b.priority
                .cmp(&a.priority)
                .then_with(|| b.usage_count.cmp(&a.usage_count))
                .then_with(|| a.id.cmp(&b.id))
        });
        matched.truncate(limit);
        matched
    }

    /// Marks a datasource used, bumping `usage_count` under the same
    /// exclusion as structural registry changes.
    pub fn mark_used(&self, id: &str) {
        let mut items = self.items.write();
        if let Some(item) = items.iter_mut().find(|d| d.id == id) {
            item.usage_count += 1;
        }
    }

    pub fn documentation(&self, id: &str) -> Option<String> {
        self.get(id).map(|d| d.to_documentation())
    }

    pub fn suggest_api_call(&self, query: &str) -> Option<String> {
        let matches = self.find_relevant(query, 1);
        matches.first().and_then(|d| d.generate_rust_snippet(&[]))
    }
}

impl Default for DatasourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn default_datasources() -> Vec<Datasource> {
    vec![
        Datasource {
            id: "openweathermap".into(),
            name: "OpenWeatherMap".into(),
            description: "Current weather and forecasts by city or coordinates.".into(),
            base_url: "https://api.openweathermap.org/data/2.5".into(),
            auth: AuthScheme::ApiKey {
                header: "appid".into(),
                env_var: "OPENWEATHER_API_KEY".into(),
            },
            endpoints: vec![Endpoint {
                path: "/weather".into(),
                method: HttpMethod::Get,
                description: "Current weather for a city.".into(),
                parameters: vec![Parameter {
                    name: "q".into(),
                    param_type: "string".into(),
                    required: true,
                    description: "City name, e.g. 'London'.".into(),
                }],
                example: Some("GET /weather?q=London".into()),
                rate_limit: Some("60 calls/minute".into()),
            }],
            tags: vec!["weather".into(), "forecast".into()],
            priority: 5,
            enabled: true,
            usage_count: 0,
        },
        Datasource {
            id: "github".into(),
            name: "GitHub".into(),
            description: "Repository, issue, and user metadata.".into(),
            base_url: "https://api.github.com".into(),
            auth: AuthScheme::Bearer {
                env_var: "GITHUB_TOKEN".into(),
            },
            endpoints: vec![Endpoint {
                path: "/repos/{owner}/{repo}".into(),
                method: HttpMethod::Get,
                description: "Repository metadata.".into(),
                parameters: vec![
                    Parameter {
                        name: "owner".into(),
                        param_type: "string".into(),
                        required: true,
                        description: "Repository owner.".into(),
                    },
                    Parameter {
                        name: "repo".into(),
                        param_type: "string".into(),
                        required: true,
                        description: "Repository name.".into(),
                    },
                ],
                example: Some("GET /repos/rust-lang/rust".into()),
                rate_limit: Some("5000 calls/hour (authenticated)".into()),
            }],
            tags: vec!["code".into(), "repository".into(), "git".into()],
            priority: 7,
            enabled: true,
            usage_count: 0,
        },
        Datasource {
            id: "wikipedia".into(),
            name: "Wikipedia".into(),
            description: "Encyclopedia article summaries and search.".into(),
            base_url: "https://en.wikipedia.org/api/rest_v1".into(),
            auth: AuthScheme::None,
            endpoints: vec![Endpoint {
                path: "/page/summary/{title}".into(),
                method: HttpMethod::Get,
                description: "Plain-text summary of an article.".into(),
                parameters: vec![Parameter {
                    name: "title".into(),
                    param_type: "string".into(),
                    required: true,
                    description: "Article title.".into(),
                }],
                example: Some("GET /page/summary/Rust_(programming_language)".into()),
                rate_limit: None,
            }],
            tags: vec!["encyclopedia".into(), "reference".into(), "search".into()],
            priority: 4,
            enabled: true,
            usage_count: 0,
        },
        Datasource {
            id: "restcountries".into(),
            name: "REST Countries".into(),
            description: "Country metadata: population, region, currency, borders.".into(),
            base_url: "https://restcountries.com/v3.1".into(),
            auth: AuthScheme::None,
            endpoints: vec![Endpoint {
                path: "/name/{name}".into(),
                method: HttpMethod::Get,
                description: "Country details by name.".into(),
                parameters: vec![Parameter {
                    name: "name".into(),
                    param_type: "string".into(),
                    required: true,
                    description: "Country name, full or partial.".into(),
                }],
                example: Some("GET /name/japan".into()),
                rate_limit: None,
            }],
            tags: vec!["countries".into(), "reference".into(), "geography".into()],
            priority: 3,
            enabled: true,
            usage_count: 0,
        },
        Datasource {
            id: "jsonplaceholder".into(),
            name: "JSONPlaceholder".into(),
            description: "Generic fake REST API for prototyping and testing.".into(),
            base_url: "https://jsonplaceholder.typicode.com".into(),
            auth: AuthScheme::None,
            endpoints: vec![Endpoint {
                path: "/posts/{id}".into(),
                method: HttpMethod::Get,
                description: "Fetch a single placeholder post.".into(),
                parameters: vec![Parameter {
                    name: "id".into(),
                    param_type: "integer".into(),
                    required: true,
                    description: "Post id.".into(),
                }],
                example: Some("GET /posts/1".into()),
                rate_limit: None,
            }],
            tags: vec!["test".into(), "placeholder".into(), "api".into()],
            priority: 1,
            enabled: true,
            usage_count: 0,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_relevant_matches_by_name_tag_or_endpoint_description() {
        let registry = DatasourceRegistry::with_defaults();
        let by_name = registry.find_relevant("weather", 3);
        assert!(by_name.iter().any(|d| d.id == "openweathermap"));
        let by_tag = registry.find_relevant("geography", 3);
        assert!(by_tag.iter().any(|d| d.id == "restcountries"));
    }

    #[test]
    fn find_relevant_breaks_ties_by_priority_then_usage_then_id() {
        let registry = DatasourceRegistry::with_defaults();
        let results = registry.find_relevant("", 10);
        assert!(results.is_empty(), "empty query should match nothing");
    }

    #[test]
    fn documentation_renders_header_and_endpoint_blocks() {
        let registry = DatasourceRegistry::with_defaults();
        let docs = registry.documentation("github").unwrap();
        assert!(docs.contains("GitHub"));
        assert!(docs.contains("GET /repos/{owner}/{repo}"));
    }

    #[test]
    fn suggest_api_call_returns_a_rust_snippet() {
        let registry = DatasourceRegistry::with_defaults();
        let snippet = registry.suggest_api_call("weather").unwrap();
        assert!(snippet.contains("api_client.handle(\"openweathermap\")"));
        assert!(snippet.contains(".get("));
    }

    #[test]
    fn mark_used_increments_usage_count_and_affects_tie_break() {
        let registry = DatasourceRegistry::with_defaults();
        registry.mark_used("jsonplaceholder");
        assert_eq!(registry.get("jsonplaceholder").unwrap().usage_count, 1);
    }
}
