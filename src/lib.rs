//! Kubernetes operator for worker fleets.
//!
//! Watches `WorkerFleet` resources and keeps a Deployment and a Service in line with the
//! declared replica and thread counts, recording the outcome on the resource status.

pub mod client;
pub mod core;
pub mod model;
pub mod policy;
pub mod service;
