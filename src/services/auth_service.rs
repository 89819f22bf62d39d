use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

use crate::database::DbConn;
use crate::entities::users;
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::services::record_activity;
use crate::utils::{JwtService, verify_password};

#[derive(Clone)]
pub struct AuthService {
    db: DbConn,
    jwt_service: JwtService,
}

impl AuthService {
    pub fn new(db: DbConn, jwt_service: JwtService) -> Self {
        Self { db, jwt_service }
    }

    fn auth_response(&self, user: users::Model) -> AppResult<AuthResponse> {
        let access_token =
            self.jwt_service
                .generate_access_token(user.id, &user.username, user.role)?;
        let refresh_token =
            self.jwt_service
                .generate_refresh_token(user.id, &user.username, user.role)?;

        Ok(AuthResponse {
            user: UserResponse::from(user),
            access_token,
            refresh_token,
            expires_in: self.jwt_service.get_access_token_expires_in(),
        })
    }

    pub async fn login(&self, request: LoginRequest) -> AppResult<AuthResponse> {
        let user = users::Entity::find()
            .filter(users::Column::Username.eq(request.username.as_str()))
            .one(&self.db)
            .await?;

        // 不区分"用户不存在"和"密码错误"
        let user = match user {
            Some(user) if verify_password(&request.password, &user.password_hash)? => user,
            _ => {
                log::warn!("Failed login attempt for username {}", request.username);
                return Err(AppError::Auth("Invalid username or password".to_string()));
            }
        };

        record_activity(&self.db, user.id, "Logged in", None).await?;
        log::info!("User {} logged in", user.username);

        self.auth_response(user)
    }

    pub async fn refresh(&self, refresh_token: &str) -> AppResult<AuthResponse> {
        let claims = self.jwt_service.verify_refresh_token(refresh_token)?;
        let user_id: i64 = claims
            .sub
            .parse()
            .map_err(|_| AppError::Auth("Invalid token subject".to_string()))?;

        // 账号可能已被删除，刷新前重新校验
        let user = users::Entity::find_by_id(user_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::Auth("Unknown user".to_string()))?;

        self.auth_response(user)
    }

    pub async fn logout(&self, actor: &CurrentUser) -> AppResult<()> {
        record_activity(&self.db, actor.id, "Logged out", None).await?;
        log::info!("User {} logged out", actor.username);
        Ok(())
    }

    pub async fn get_profile(&self, actor: &CurrentUser) -> AppResult<UserResponse> {
        let user = users::Entity::find_by_id(actor.id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Unknown user".to_string()))?;
        Ok(UserResponse::from(user))
    }
}
