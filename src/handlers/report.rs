use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

use crate::handlers::current_user;
use crate::models::*;
use crate::services::ReportService;

#[utoipa::path(
    get,
    path = "/reports/summary",
    tag = "report",
    params(
        ("owner" = Option<String>, Query, description = "台主（仅管理员可指定）")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "已付 / 赊账汇总与按顾客分组", body = SummaryResponse),
        (status = 403, description = "无权查看其他台主")
    )
)]
pub async fn summary(
    report_service: web::Data<ReportService>,
    req: HttpRequest,
    query: web::Query<SummaryQuery>,
) -> Result<HttpResponse> {
    let user = match current_user(&req) {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };

    match report_service.summary(&user, &query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn report_config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/reports").route("/summary", web::get().to(summary)));
}
