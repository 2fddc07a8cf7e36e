pub mod anti_forgery;
pub mod authentication_service;
pub mod authorization_service;
pub mod session_service;

pub use anti_forgery::AntiForgeryContext;
pub use authentication_service::AuthenticationService;
pub use authorization_service::AuthorizationService;
pub use session_service::{SessionService, SESSION_PRINCIPAL_KEY};
