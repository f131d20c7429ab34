pub mod admin;
pub mod auth;
pub mod creator;
pub mod video;
pub mod waitlist;
