//! Parley Domain - Core types
//!
//! This crate defines the domain model for the Parley API client:
//! token pairs, account payloads, request/response specifications and
//! client settings. All types here are pure Rust with no I/O dependencies.

pub mod account;
pub mod auth;
pub mod error;
pub mod request;
pub mod response;
pub mod settings;

pub use account::{Profile, ProfileUpdate};
pub use auth::{LoginRequest, RefreshError, RegisterRequest, TokenKey, TokenPair, bearer};
pub use error::{DomainError, DomainResult};
pub use request::{AUTHORIZATION, Header, Headers, HttpMethod, RequestSpec};
pub use response::{ResponseSpec, UNAUTHORIZED};
pub use settings::{ClientSettings, DEFAULT_BASE_URL};
