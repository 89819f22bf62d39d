pub mod activity_service;
pub mod auth_service;
pub mod game_service;
pub mod report_service;
pub mod settlement_service;

pub use activity_service::*;
pub use auth_service::*;
pub use game_service::*;
pub use report_service::*;
pub use settlement_service::*;
