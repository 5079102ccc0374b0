pub mod access;
pub mod authorization;
pub mod link;
pub mod user;
pub mod video;

pub use access::AccessService;
pub use link::LinkService;
pub use user::UserService;
pub use video::VideoService;
