pub mod error;
pub mod session;
pub mod state;

pub use error::*;
pub use session::*;
pub use state::*;
