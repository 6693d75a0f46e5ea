//! Integration tests for the cloud provider config asset
//!
//! These tests drive the asset the way the installer's graph engine does:
//! resolve the dependencies it declares, generate once, then read the files.
//!
//! ```bash
//! cargo test --test assets
//! ```

mod asset_tests;
