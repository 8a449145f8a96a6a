//! Inbound adapters that translate external requests into domain service
//! calls while keeping framework details at the edge.
//!
//! The directory is served over HTTP only; handlers live under [`http`].

pub mod http;
