// The infra module contains implementations of core traits.
// Everything that talks to Google over HTTP lives here.

#[path = "google/mod.rs"]
pub mod google;
