//! Integration tests for the harvester
//!
//! These tests use wiremock to create mock HTTP servers and exercise
//! fetching, wave scheduling, the full harvest and ingest end-to-end.

mod common;
mod fetch_tests;
mod harvest_tests;
mod ingest_tests;
