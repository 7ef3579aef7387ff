pub mod auth;
pub mod device;
pub mod tasks;
