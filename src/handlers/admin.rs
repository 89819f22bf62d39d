use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

use crate::handlers::current_user;
use crate::models::*;
use crate::services::{ActivityService, GameService, SettlementService};

#[utoipa::path(
    delete,
    path = "/admin/games/{id}",
    tag = "admin",
    params(("id" = i64, Path, description = "对局记录 ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "删除成功"),
        (status = 403, description = "仅管理员"),
        (status = 404, description = "记录不存在")
    )
)]
pub async fn delete_game(
    game_service: web::Data<GameService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let user = match current_user(&req) {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };

    match game_service.delete_record(&user, path.into_inner()).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Record deleted"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/archive-day",
    tag = "admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "当天已确认记录已归档"),
        (status = 403, description = "仅管理员")
    )
)]
pub async fn archive_day(
    game_service: web::Data<GameService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let user = match current_user(&req) {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };

    match game_service.archive_today(&user).await {
        Ok(archived) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": { "archived": archived },
            "message": "Day reset successfully"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/settle-loan",
    tag = "admin",
    request_body = SettleLoanRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "结算完成"),
        (status = 400, description = "金额必须为正"),
        (status = 403, description = "仅管理员")
    )
)]
pub async fn settle_loan(
    settlement_service: web::Data<SettlementService>,
    req: HttpRequest,
    request: web::Json<SettleLoanRequest>,
) -> Result<HttpResponse> {
    let user = match current_user(&req) {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };

    match settlement_service
        .settle_loan(&user, request.into_inner())
        .await
    {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Loan payment processed successfully"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/admin/activities",
    tag = "admin",
    params(
        ("page" = Option<u32>, Query, description = "页码"),
        ("page_size" = Option<u32>, Query, description = "每页数量")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "审计日志，按时间倒序"),
        (status = 403, description = "仅管理员")
    )
)]
pub async fn list_activities(
    activity_service: web::Data<ActivityService>,
    req: HttpRequest,
    query: web::Query<ActivityQuery>,
) -> Result<HttpResponse> {
    let user = match current_user(&req) {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };

    match activity_service.list(&user, &query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/tables",
    tag = "admin",
    request_body = CreateTableRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "建台成功", body = TableResponse),
        (status = 403, description = "仅管理员")
    )
)]
pub async fn create_table(
    game_service: web::Data<GameService>,
    req: HttpRequest,
    request: web::Json<CreateTableRequest>,
) -> Result<HttpResponse> {
    let user = match current_user(&req) {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };

    match game_service.create_table(&user, request.into_inner()).await {
        Ok(table) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": table
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn admin_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .route("/games/{id}", web::delete().to(delete_game))
            .route("/archive-day", web::post().to(archive_day))
            .route("/settle-loan", web::post().to(settle_loan))
            .route("/activities", web::get().to(list_activities))
            .route("/tables", web::post().to(create_table)),
    );
}
