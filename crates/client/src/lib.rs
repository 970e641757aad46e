//! Async client for the Amberdata derivatives analytics REST API.
//!
//! Each lookup is one authenticated GET; the decoded JSON body is returned
//! as-is, including error payloads the service reports with a 4xx status.

pub mod client;
pub mod dispatcher;
pub mod error;

pub use client::DerivativesClient;
pub use dispatcher::RequestDispatcher;
pub use error::ClientError;

pub use amberdata_core::{
    ApiResponse, ClientConfig, DateParam, Endpoint, MarginType, PutCall, QueryParams, TimeFormat,
    TimeInterval,
};
