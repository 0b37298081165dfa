//! Property-based tests for the elimination strategies.
