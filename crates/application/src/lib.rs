//! Parley Application - Ports, authenticated client and use cases
//!
//! This crate defines the application layer with:
//! - Port traits for the HTTP transport and the token store
//! - The authenticated HTTP client with single-flight token refresh
//! - Account use cases (login, register, logout, profile)
//! - Application-level error handling

pub mod auth;
pub mod client;
pub mod error;
pub mod ports;
pub mod use_cases;

pub use auth::{InMemoryTokenStore, PendingRefresh, RefreshCoordinator, RefreshLeader, RefreshTicket};
pub use client::AuthenticatedHttpClient;
pub use error::{ApplicationError, ApplicationResult};
pub use ports::{HttpClient, HttpClientError, TokenStore, TokenStoreError};
pub use use_cases::{GetProfile, Login, Logout, Register, UpdateProfile};
