pub mod errors;
pub mod helpers;
pub mod store;
pub mod types;

pub use errors::TaskStoreError;
pub use store::TaskStore;
