//! Studio backend interaction module
//!
//! # Module Structure
//!
//! - [`client`] - Base-URL aware client used by the data sources
//! - [`http`] - HTTP utilities for the JSON REST API
//!
//! # Example
//!
//! ```ignore
//! use crate::api::client::ApiClient;
//!
//! async fn example() -> anyhow::Result<()> {
//!     let client = ApiClient::new("https://admin.ashaa.xyz/api", None)?;
//!     let contacts = client.get(&client.endpoint_url("Contact")).await?;
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod http;
