pub mod link_access;
pub mod share_link;
pub mod user;
pub mod video;

pub use link_access::*;
pub use share_link::*;
pub use user::*;
pub use video::*;
