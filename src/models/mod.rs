//! Request and Response models for the storage HTTP API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies, on both the
//! server and the remote client side.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{validate_name, EnqueueRequest, SetRequest};
pub use responses::{
    ErrorResponse, GetResponse, HealthResponse, KeyResponse, QueueLenResponse,
    QueueValueResponse, RemoveResponse,
};
