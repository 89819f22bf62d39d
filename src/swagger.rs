use actix_web::web;
use utoipa::OpenApi;
use utoipa::{
    Modify,
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
};
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers;
use crate::models::*;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::auth::login,
        handlers::auth::refresh,
        handlers::auth::logout,
        handlers::auth::me,
        handlers::game::list_tables,
        handlers::game::active_games,
        handlers::game::list_games,
        handlers::game::start_game,
        handlers::game::end_game,
        handlers::game::update_game,
        handlers::game::current_price,
        handlers::report::summary,
        handlers::invoice::customer_invoice,
        handlers::invoice::daily_owner_invoice,
        handlers::invoice::daily_all_invoice,
        handlers::admin::delete_game,
        handlers::admin::archive_day,
        handlers::admin::settle_loan,
        handlers::admin::list_activities,
        handlers::admin::create_table,
    ),
    components(
        schemas(
            Role,
            PaymentStatus,
            GameState,
            LoginRequest,
            UserResponse,
            AuthResponse,
            StartGameRequest,
            EndGameRequest,
            EndGameResponse,
            UpdateGameRequest,
            GameRecordResponse,
            ActiveGameResponse,
            CurrentPriceResponse,
            TableResponse,
            CreateTableRequest,
            SettleLoanRequest,
            CustomerTotals,
            OwnerSummary,
            SummaryResponse,
            ActivityResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "登录与令牌"),
        (name = "game", description = "球台与对局"),
        (name = "report", description = "汇总报表"),
        (name = "invoice", description = "PDF 发票"),
        (name = "admin", description = "管理员操作")
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    );
}
