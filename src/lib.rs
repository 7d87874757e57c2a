//! # lazylink
//!
//! A lazy-loading client for hypermedia REST APIs: APIs that return
//! interlinked JSON resources (objects referencing other objects by URL,
//! and paginated collections). The crate lets a caller navigate the
//! resource graph as if it were already fully loaded, fetching and
//! caching sub-resources on demand and handling pagination transparently.
//!
//! ## Overview
//!
//! - [`ApiClient`]: performs GET/POST requests, owns the cache and the
//!   default headers/params/timeouts, and wraps fetched JSON into
//!   resources.
//! - [`Resource`]: a closed family of wrappers (object, list, paginated
//!   list, error) chosen by inspecting the raw JSON shape once at wrap
//!   time; scalars pass through unwrapped.
//! - [`cache`]: TTL-expiring cache backends, in-memory and
//!   disk-persisted, injected into the client at construction.
//! - [`TokenClient`] / [`GraderClient`]: thin configuration layers over
//!   the base client.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use lazylink::{ApiClient, ClientConfig};
//!
//! let config = ClientConfig::builder()
//!     .base_url("https://api.example/api/v2/")
//!     .api_version("2")
//!     .build()?;
//! let client = ApiClient::new(config);
//!
//! // One fetch; `course` is followed lazily on access.
//! let mut exercise = client.load_data("/exercises/1/").await?;
//! let mut course = exercise.get("course").await?;
//! let name = course.get("name").await?;
//! println!("{:?}", name.as_str());
//! ```
//!
//! ## Pagination
//!
//! ```rust,ignore
//! let mut listing = client.load_data("/exercises/").await?;
//! if let Some(pages) = listing.as_paginated() {
//!     let mut cursor = pages.iter();
//!     while let Some(item) = cursor.try_next().await? {
//!         // pages are fetched on demand, cache-first
//!     }
//! }
//! ```
//!
//! ## Design Principles
//!
//! - **No global state**: the cache is an explicitly constructed instance
//!   owned by the client, injectable at construction.
//! - **Explicit accessors**: field access that may perform I/O is an
//!   `async` method returning `Result`, never hidden behind something
//!   that looks like a plain field read.
//! - **Best-effort navigation**: a failing linked-resource fetch logs and
//!   falls back to the raw string; transient transport failures surface
//!   as a synthesized 504 response, not as errors.

pub mod cache;
pub mod clients;
pub mod config;
pub mod error;
pub mod resource;
pub mod urls;

// Re-export the public surface at the crate root for convenience
pub use cache::{Cache, FilesystemCache, InMemoryCache};
pub use clients::{ApiClient, ApiResponse, GraderClient, PostBody, TokenClient};
pub use config::{ClientConfig, ClientConfigBuilder};
pub use error::{ApiError, UrlError};
pub use resource::{
    ErrorResource, ListResource, ObjectResource, PageCursor, PaginatedResource, Resource,
};
