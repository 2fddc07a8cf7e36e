pub mod authorization_request;
pub mod oidc_state;
pub mod principal;

pub use authorization_request::*;
pub use oidc_state::*;
pub use principal::*;
