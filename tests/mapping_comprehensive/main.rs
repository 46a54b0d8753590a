//! Comprehensive mapping metadata tests
//!
//! End-to-end coverage of the public API: building metadata, the
//! snapshot/restore cycle with lazy namespace qualification, and the
//! registry with its durable cache.

mod common;

mod lifecycle;
mod registry_flow;
