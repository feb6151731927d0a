//! Integration tests
//!
//! `api_tests` drives the router in-process against an in-memory ticket
//! store. `live_api` targets a running server and is ignored by default.

mod api_tests;
mod common;
mod live_api;
