//! Authentication support for the Parley API client.
//!
//! This module provides:
//! - In-memory token storage implementing the `TokenStore` port
//! - Refresh coordination, so concurrent authorization failures share one refresh

mod coordinator;
mod token_store;

pub use coordinator::{PendingRefresh, RefreshCoordinator, RefreshLeader, RefreshOutcome, RefreshTicket};
pub use token_store::InMemoryTokenStore;
