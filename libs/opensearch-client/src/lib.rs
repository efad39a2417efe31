//! OpenSearch engine client
//!
//! Connects the compilers in [`opensearch_compiler`] to a live cluster:
//! options loading, connection settings, an async [`SearchEngine`] over
//! `reqwest`, a health probe and a [`SearchProvider`] that runs
//! compile → execute → lift.
//!
//! # Example
//!
//! ```rust,no_run
//! use opensearch_client::{OpenSearchClient, OpenSearchOptions, SearchProvider};
//! use search_model::SearchRequest;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let options = OpenSearchOptions::load()?;
//! let client = OpenSearchClient::from_options(&options)?;
//! let fields = client.get_field_catalog("products").await?;
//!
//! let provider = SearchProvider::new(client);
//! let response = provider
//!     .search("products", &SearchRequest::default(), &fields)
//!     .await?;
//! println!("{} hits", response.total_count);
//! # Ok(())
//! # }
//! ```
pub mod client;
pub mod connection;
pub mod error;
pub mod health;
pub mod options;
pub mod provider;

pub use client::{OpenSearchClient, SearchEngine};
pub use connection::{BasicAuth, ConnectionSettings, DEFAULT_USER};
pub use error::{Error, Result};
pub use health::{HealthChecker, HealthReport, HealthStatus};
pub use options::OpenSearchOptions;
pub use provider::SearchProvider;
