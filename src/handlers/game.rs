use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

use crate::handlers::current_user;
use crate::models::*;
use crate::services::GameService;

#[utoipa::path(
    get,
    path = "/tables",
    tag = "game",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "球台列表（含占用状态）"),
        (status = 401, description = "未授权")
    )
)]
pub async fn list_tables(
    game_service: web::Data<GameService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let user = match current_user(&req) {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };

    match game_service.list_tables(&user).await {
        Ok(tables) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": tables
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/games/active",
    tag = "game",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "进行中对局，价格实时折算"),
        (status = 401, description = "未授权")
    )
)]
pub async fn active_games(
    game_service: web::Data<GameService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let user = match current_user(&req) {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };

    match game_service.list_active(&user).await {
        Ok(games) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": games
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/games",
    tag = "game",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "未归档对局记录"),
        (status = 401, description = "未授权")
    )
)]
pub async fn list_games(
    game_service: web::Data<GameService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let user = match current_user(&req) {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };

    match game_service.list_records(&user).await {
        Ok(records) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": records
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/games/start",
    tag = "game",
    request_body = StartGameRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "开台成功", body = GameRecordResponse),
        (status = 409, description = "球台已被占用"),
        (status = 404, description = "球台不存在")
    )
)]
pub async fn start_game(
    game_service: web::Data<GameService>,
    req: HttpRequest,
    request: web::Json<StartGameRequest>,
) -> Result<HttpResponse> {
    let user = match current_user(&req) {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };

    match game_service.start_game(&user, request.into_inner()).await {
        Ok(record) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": record
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/games/end",
    tag = "game",
    request_body = EndGameRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "结束对局并返回台费", body = EndGameResponse),
        (status = 404, description = "该球台没有进行中的对局")
    )
)]
pub async fn end_game(
    game_service: web::Data<GameService>,
    req: HttpRequest,
    request: web::Json<EndGameRequest>,
) -> Result<HttpResponse> {
    let user = match current_user(&req) {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };

    match game_service.end_game(&user, request.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/games/{id}",
    tag = "game",
    request_body = UpdateGameRequest,
    params(("id" = i64, Path, description = "对局记录 ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "更新成功", body = GameRecordResponse),
        (status = 409, description = "记录已确认，不能再改"),
        (status = 400, description = "请求参数错误")
    )
)]
pub async fn update_game(
    game_service: web::Data<GameService>,
    req: HttpRequest,
    path: web::Path<i64>,
    request: web::Json<UpdateGameRequest>,
) -> Result<HttpResponse> {
    let user = match current_user(&req) {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };

    match game_service
        .update_record(&user, path.into_inner(), request.into_inner())
        .await
    {
        Ok(record) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": record
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/games/{id}/price",
    tag = "game",
    params(("id" = i64, Path, description = "对局记录 ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "当前价（读取时刻折算）", body = CurrentPriceResponse),
        (status = 404, description = "记录不存在")
    )
)]
pub async fn current_price(
    game_service: web::Data<GameService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let user = match current_user(&req) {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };

    match game_service.current_price(&user, path.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn game_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/tables", web::get().to(list_tables)).service(
        web::scope("/games")
            .route("", web::get().to(list_games))
            .route("/active", web::get().to(active_games))
            .route("/start", web::post().to(start_game))
            .route("/end", web::post().to(end_game))
            .route("/{id}", web::put().to(update_game))
            .route("/{id}/price", web::get().to(current_price)),
    );
}
