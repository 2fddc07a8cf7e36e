pub mod authentication_backend;
pub mod session_lifecycle;
pub mod session_store;
pub mod token_generator;

pub use authentication_backend::*;
pub use session_lifecycle::*;
pub use session_store::*;
pub use token_generator::*;
