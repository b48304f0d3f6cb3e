// Synchronization of the local store with the upstream job service:
// cache-aside reads, force-sync, and the deterministic payload transform.

pub mod handlers;
pub mod questions;
pub mod service;
pub mod store;
pub mod transform;
pub mod upstream;
