use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use chrono::{Local, NaiveDate};
use serde::Deserialize;

use crate::handlers::current_user;
use crate::models::*;
use crate::services::ReportService;
use crate::utils::pdf;

#[derive(Debug, Deserialize)]
pub struct InvoiceDateQuery {
    /// 缺省为今天（本地日历日）
    pub date: Option<NaiveDate>,
}

fn pdf_attachment(bytes: Vec<u8>, filename: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("application/pdf")
        .insert_header((
            "Content-Disposition",
            format!("attachment; filename=\"{filename}\""),
        ))
        .body(bytes)
}

#[utoipa::path(
    get,
    path = "/invoices/customer/{owner}/{customer}",
    tag = "invoice",
    params(
        ("owner" = String, Path, description = "台主（owner_a / owner_b）"),
        ("customer" = String, Path, description = "顾客姓名")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "顾客对账单 PDF", content_type = "application/pdf"),
        (status = 403, description = "仅管理员")
    )
)]
pub async fn customer_invoice(
    report_service: web::Data<ReportService>,
    req: HttpRequest,
    path: web::Path<(Role, String)>,
) -> Result<HttpResponse> {
    let user = match current_user(&req) {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };
    let (owner, customer) = path.into_inner();

    let result = report_service
        .customer_invoice(&user, owner, &customer)
        .await
        .and_then(|doc| pdf::render(&doc));
    match result {
        Ok(bytes) => Ok(pdf_attachment(
            bytes,
            format!(
                "invoice_{owner}_{customer}_{}.pdf",
                Local::now().format("%Y%m%d")
            ),
        )),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/invoices/daily/{owner}",
    tag = "invoice",
    params(
        ("owner" = String, Path, description = "台主（owner_a / owner_b）"),
        ("date" = Option<String>, Query, description = "日期 YYYY-MM-DD，缺省今天")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "单台主日报 PDF", content_type = "application/pdf"),
        (status = 403, description = "仅管理员")
    )
)]
pub async fn daily_owner_invoice(
    report_service: web::Data<ReportService>,
    req: HttpRequest,
    path: web::Path<Role>,
    query: web::Query<InvoiceDateQuery>,
) -> Result<HttpResponse> {
    let user = match current_user(&req) {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };
    let owner = path.into_inner();
    let date = query.date.unwrap_or_else(crate::utils::today_local);

    let result = report_service
        .daily_owner_invoice(&user, owner, date)
        .await
        .and_then(|doc| pdf::render(&doc));
    match result {
        Ok(bytes) => Ok(pdf_attachment(
            bytes,
            format!("daily_invoice_{owner}_{}.pdf", date.format("%Y%m%d")),
        )),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/invoices/daily-all",
    tag = "invoice",
    params(
        ("date" = Option<String>, Query, description = "日期 YYYY-MM-DD，缺省今天")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "全台主日报 PDF", content_type = "application/pdf"),
        (status = 403, description = "仅管理员")
    )
)]
pub async fn daily_all_invoice(
    report_service: web::Data<ReportService>,
    req: HttpRequest,
    query: web::Query<InvoiceDateQuery>,
) -> Result<HttpResponse> {
    let user = match current_user(&req) {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };
    let date = query.date.unwrap_or_else(crate::utils::today_local);

    let result = report_service
        .daily_all_invoice(&user, date)
        .await
        .and_then(|doc| pdf::render(&doc));
    match result {
        Ok(bytes) => Ok(pdf_attachment(
            bytes,
            format!("daily_invoice_all_{}.pdf", date.format("%Y%m%d")),
        )),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn invoice_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/invoices")
            .route("/customer/{owner}/{customer}", web::get().to(customer_invoice))
            .route("/daily-all", web::get().to(daily_all_invoice))
            .route("/daily/{owner}", web::get().to(daily_owner_invoice)),
    );
}
