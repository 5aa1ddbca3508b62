//! Observability setup.
//!
//! Structured logging with the `tracing` crate: the store logs every
//! operation with `product_id`/`quantity`/`seq` fields, and the
//! coordinator wraps each validation in a span. Filtering is driven by
//! `RUST_LOG`:
//!
//! ```bash
//! # Compact operation log
//! RUST_LOG=info cargo test
//!
//! # Include ticket issuance and superseded reconciliations
//! RUST_LOG=debug cargo test
//! ```

/// Initializes the tracing subscriber for the process.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false) // Module paths add noise; fields carry the context.
        .compact()
        .init();
}
