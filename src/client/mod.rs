//! Integrity Service Transport
//!
//! HTTP/JSON adapter for the remote integrity evaluation service. The
//! session controller talks to the [`IntegrityApi`] trait; the concrete
//! [`IntegrityClient`] is the reqwest implementation. Failures surface as
//! [`ClientError`] and are never fatal to a session.

pub mod error;
pub mod integrity;

pub use error::ClientError;
pub use integrity::{IntegrityApi, IntegrityClient};
