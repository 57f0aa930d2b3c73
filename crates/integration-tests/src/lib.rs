//! Integration tests for the Malai storefront API.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the database and apply migrations, then the server
//! cargo run -p malai-api
//!
//! # Run integration tests against it
//! cargo test -p malai-integration-tests -- --ignored
//! ```
//!
//! Tests talk to a running server over HTTP; the base URL comes from
//! `API_BASE_URL` (default `http://localhost:3000`). They are `#[ignore]`d
//! by default so `cargo test` stays green without a server.
