//! Session state for the console: who is signed in, with which token, and
//! the flows that change it.
//!
//! The [`CredentialStore`] is the only shared mutable state. The gateway
//! reads it on every call through [`convene_gateway::BearerSource`]; only
//! the [`AuthProvider`] flows write to it.

pub mod credentials;
pub mod error;
pub mod provider;
pub mod store;

pub use {
    credentials::{AuthState, Credential, CredentialStore},
    error::{Error, Result},
    provider::{AuthOutcome, AuthProvider, CheckOutcome, routes},
    store::{JsonFileStore, KeyValueStore, MemoryStore, keys},
};
