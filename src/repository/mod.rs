//! Typed access to the four persisted entities.
//!
//! Every function takes a `SqliteExecutor`, so callers can pass either the
//! pool or an open transaction. Errors are returned as raw `sqlx::Error`;
//! services lift them into `AppError::Storage`.

pub mod link_access;
pub mod share_link;
pub mod user;
pub mod video;

pub use link_access::LinkAccessRepository;
pub use share_link::ShareLinkRepository;
pub use user::UserRepository;
pub use video::VideoRepository;
