//! Client types for talking to a hypermedia API.
//!
//! [`ApiClient`] is the workhorse: it owns the cache and default request
//! settings and produces [`Resource`](crate::Resource) wrappers.
//! [`TokenClient`] and [`GraderClient`] are thin configuration layers
//! over it.

mod api_client;
mod grader;
mod response;
mod token;

pub use api_client::{ApiClient, PostBody};
pub use grader::GraderClient;
pub use response::ApiResponse;
pub use token::TokenClient;
