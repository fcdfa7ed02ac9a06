pub mod api_client;
pub mod registry;
pub mod types;

pub use api_client::{ApiClient, ApiResponse};
pub use registry::DatasourceRegistry;
pub use types::{AuthScheme, Datasource, Endpoint, HttpMethod, Parameter};
