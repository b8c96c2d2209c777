pub mod github_service;
pub mod ranking_service;
pub mod user_service;

pub use github_service::*;
pub use ranking_service::*;
pub use user_service::*;
