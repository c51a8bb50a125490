//! Dispatch integration tests.

mod support;

mod auth;
mod completion;
mod registries;
mod secret;
