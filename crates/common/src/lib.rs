//! Common utilities and shared types for vidhub.
//!
//! - **Configuration**: Application settings via [`Config`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`]
//! - **ID Generation**: ULID-based identifiers via [`IdGenerator`] and [`EntityId`]
//! - **Media**: The external media host via [`MediaStore`]
//!
//! # Example
//!
//! ```no_run
//! use vidhub_common::{Config, IdGenerator, AppResult};
//!
//! fn example() -> AppResult<()> {
//!     let config = Config::load()?;
//!     let id_gen = IdGenerator::new();
//!     let id = id_gen.generate();
//!     println!("Listening on port {} with id {}", config.server.port, id);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod id;
pub mod media;

pub use config::{Config, ServerConfig};
pub use error::{AppError, AppResult};
pub use id::{EntityId, IdGenerator};
pub use media::{CloudinaryStore, MediaKind, MediaStore, UploadedMedia, public_id_from_url};
