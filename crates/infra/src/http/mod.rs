//! HTTP transport shared by every remote call

mod client;

pub use client::{HttpClient, HttpClientBuilder, RetryPolicy};
