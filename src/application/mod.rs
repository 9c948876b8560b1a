//! Application layer: traversal engine and graph services
//!
//! This layer orchestrates domain logic and depends on I/O boundary traits.

pub mod error;
pub mod error_ext;
pub mod observer;
pub mod services;

pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::IoResultExt;
pub use observer::{ChangeKind, SessionChange, SessionObserver};
pub use services::{GraphService, TraversalEngine};
