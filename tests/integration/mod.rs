//! Integration Tests Module
//!
//! End-to-end tests for batch construction, bounded dispatch and the full
//! analysis run against scripted backends.

// Instrumented backend and in-memory file source
mod support;

// Batch boundaries, ordering and determinism
mod batch_builder_test;

// Concurrency cap, admission order and failure isolation
mod dispatch_test;

// Report, error log and summary of complete runs
mod analyzer_test;
