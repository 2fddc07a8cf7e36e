pub mod openid_connect;
pub mod token;

pub use openid_connect::OpenIdConnectBackend;
pub use token::OsTokenGenerator;
