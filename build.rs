//! Build script that ensures Cargo rebuilds when scenario files change.
//!
//! The behavioural tests validate Gherkin feature files at compile time, but
//! Cargo cannot automatically detect when those files change. This script
//! emits a `rerun-if-changed` directive so incremental builds pick up new or
//! modified scenarios.

fn main() {
    println!("cargo:rerun-if-changed=tests/features");
}
