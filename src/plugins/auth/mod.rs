pub mod accounts;
pub mod errors;
pub mod password;
pub mod session;

pub use accounts::{normalize_identity, Accounts, SignUp, UserProfile};
pub use errors::AuthError;
pub use session::Session;
