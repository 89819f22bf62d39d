use actix_web::{HttpMessage, HttpRequest};

use crate::error::AppError;
use crate::models::CurrentUser;

pub mod admin;
pub mod auth;
pub mod game;
pub mod invoice;
pub mod report;

pub use admin::admin_config;
pub use auth::auth_config;
pub use game::game_config;
pub use invoice::invoice_config;
pub use report::report_config;

/// 认证中间件写入的当前用户；拿不到说明路径配置有误
pub(crate) fn current_user(req: &HttpRequest) -> Result<CurrentUser, AppError> {
    req.extensions()
        .get::<CurrentUser>()
        .cloned()
        .ok_or_else(|| AppError::Auth("Not authenticated".to_string()))
}
