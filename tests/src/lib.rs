//! # HIE Mediator Test Suite
//!
//! Cross-subsystem scenarios run against a fully wired mediator.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── harness.rs              # Wired mediator + admin router fixture
//!     ├── routing_scenarios.rs    # Priority, no-fallback auth, primary route
//!     ├── validation_scenarios.rs # Create/update rule enforcement
//!     ├── lifecycle_scenarios.rs  # TCP / polling notification choreography
//!     └── admin_scenarios.rs      # REST surface end to end
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p hm-tests
//! cargo test -p hm-tests integration::routing_scenarios
//! ```

pub mod integration;
