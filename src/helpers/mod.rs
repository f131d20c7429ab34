pub mod requests;
pub mod tokens;
pub mod users;
