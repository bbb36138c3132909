//! Core business logic for vidhub.

pub mod cascade;
pub mod ownership;
pub mod services;
pub mod toggle;
pub mod views;

#[cfg(test)]
mod testing;

pub use cascade::CascadeDeleter;
pub use ownership::{Owned, ensure_owner};
pub use services::*;
pub use toggle::{LikeTarget, ToggleEngine, ToggleOutcome};
