pub mod access;
pub mod health;
pub mod link;
pub mod user;
pub mod video;
