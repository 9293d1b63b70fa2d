//! Application use cases built on the authenticated client.

mod login;
mod logout;
mod profile;
mod register;

pub use login::Login;
pub use logout::Logout;
pub use profile::{GetProfile, UpdateProfile};
pub use register::Register;
