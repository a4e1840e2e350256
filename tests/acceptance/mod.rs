//! Campaign-level acceptance tests.

mod campaign_test;
mod common;
mod determinism_test;
mod interruption_test;
