// Library interface for newschat modules
// This allows tests and the binaries to import modules

pub mod api;
pub mod articles;
pub mod assembler;
pub mod enrichment;
pub mod error;
pub mod ids;
pub mod query;
pub mod render;
pub mod session;
pub mod transcript;

pub use error::ChatError;
pub use session::{ChatSession, SessionState};
