//! Client library for a product catalog API.
//!
//! # Overview
//! `CatalogClient` turns typed catalog operations (list, fetch, create,
//! update, delete products) into JSON requests and hands them to a
//! [`Transport`]. The transport owns every wire concern: URL construction
//! against a configured base endpoint and the actual HTTP round-trip.
//!
//! # Design
//! - `CatalogClient` is stateless apart from the transport it owns.
//! - `UreqTransport` is the blocking HTTP implementation; `RecordingTransport`
//!   records calls and replays scripted replies for tests.
//! - Errors keep network and remote failures apart (`TransportError`) and
//!   add the JSON failures of the client layer on top (`ApiError`).
//! - The library logs through `tracing` and never installs a subscriber.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod transport;
pub mod types;

pub use client::CatalogClient;
pub use config::TransportConfig;
pub use error::{ApiError, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use transport::{build_url, check_status, Query, RecordingTransport, Transport, UreqTransport};
pub use types::{ArticleGroup, MetaData, MetaResponse, Product, ProductList, Variation};
