//! Server-local wire models: the response envelope, request payloads and
//! shaped view types for the reporting endpoints.

pub mod envelope;
pub mod requests;
pub mod views;
