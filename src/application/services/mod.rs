//! Business logic services for the application layer.

pub mod account_service;
pub mod link_service;
pub mod token_service;

pub use account_service::AccountService;
pub use link_service::LinkService;
pub use token_service::{MAX_TOKEN_MINUTES, TokenService};
