//! Database models and queries

pub mod documents;
pub mod init;
pub mod models;
pub mod runs;

pub use documents::*;
pub use init::*;
pub use models::*;
pub use runs::*;
