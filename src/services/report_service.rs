use std::collections::BTreeMap;

use chrono::{Local, NaiveDate};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};

use crate::database::DbConn;
use crate::entities::{billiard_tables, game_records, users};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::utils::pdf::{InvoiceDoc, InvoiceSection};
use crate::utils::{elapsed_hours, format_mad, local_day_bounds};

/// 未登记顾客名的记录在分组里统一挂到这个键下
const UNNAMED_CUSTOMER: &str = "-";

/// 汇总与发票数据。所有数字都按请求即时重算，记录变动频繁，缓存只会出错。
#[derive(Clone)]
pub struct ReportService {
    db: DbConn,
}

impl ReportService {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    /// 汇总口径：已确认且未归档
    async fn countable_records(
        &self,
        owner: Role,
    ) -> AppResult<Vec<(game_records::Model, billiard_tables::Model)>> {
        let rows = game_records::Entity::find()
            .find_also_related(billiard_tables::Entity)
            .filter(billiard_tables::Column::Owner.eq(owner))
            .filter(game_records::Column::Confirmed.eq(true))
            .filter(game_records::Column::Archived.eq(false))
            .order_by_asc(game_records::Column::StartTime)
            .all(&self.db)
            .await?;

        rows.into_iter()
            .map(|(record, table)| {
                let table = table.ok_or_else(|| {
                    AppError::Internal(format!("Game record {} has no table", record.id))
                })?;
                Ok((record, table))
            })
            .collect()
    }

    pub async fn owner_summary(&self, owner: Role) -> AppResult<OwnerSummary> {
        let records = self.countable_records(owner).await?;

        let mut total_paid_minor = 0;
        let mut total_loan_minor = 0;
        let mut customers: BTreeMap<String, CustomerTotals> = BTreeMap::new();

        for (record, _) in records {
            let customer = record
                .customer_name
                .clone()
                .unwrap_or_else(|| UNNAMED_CUSTOMER.to_string());
            let totals = customers.entry(customer).or_default();
            match record.payment_status {
                PaymentStatus::Paid => {
                    total_paid_minor += record.price_minor;
                    totals.paid_minor += record.price_minor;
                }
                PaymentStatus::Loan => {
                    total_loan_minor += record.price_minor;
                    totals.loan_minor += record.price_minor;
                }
            }
        }

        Ok(OwnerSummary {
            owner,
            total_paid_minor,
            total_loan_minor,
            customers,
        })
    }

    /// 台主只能看自己的汇总；管理员可指定台主或一次拿全部
    pub async fn summary(
        &self,
        actor: &CurrentUser,
        query: &SummaryQuery,
    ) -> AppResult<SummaryResponse> {
        let owners: Vec<Role> = if actor.role.is_admin() {
            match query.owner {
                Some(owner) if !owner.is_admin() => vec![owner],
                Some(_) => {
                    return Err(AppError::Validation(
                        "Owner must be one of the table owners".to_string(),
                    ));
                }
                None => Role::owners().to_vec(),
            }
        } else {
            if query.owner.is_some_and(|owner| owner != actor.role) {
                return Err(AppError::PermissionDenied);
            }
            vec![actor.role]
        };

        let mut summaries = Vec::with_capacity(owners.len());
        for owner in owners {
            summaries.push(self.owner_summary(owner).await?);
        }
        Ok(SummaryResponse { owners: summaries })
    }

    /// 发票标题里显示台主的账号名，而不是角色代号
    async fn owner_label(&self, owner: Role) -> AppResult<String> {
        let user = users::Entity::find()
            .filter(users::Column::Role.eq(owner))
            .one(&self.db)
            .await?;
        Ok(user
            .map(|user| user.username)
            .unwrap_or_else(|| owner.to_string()))
    }

    /// 顾客对账单：该顾客名下已确认未归档的已结束对局
    pub async fn customer_invoice(
        &self,
        actor: &CurrentUser,
        owner: Role,
        customer_name: &str,
    ) -> AppResult<InvoiceDoc> {
        if !actor.role.is_admin() {
            return Err(AppError::PermissionDenied);
        }

        let records = self.countable_records(owner).await?;
        let mut rows = Vec::new();
        let mut total_paid_minor = 0;
        let mut total_loan_minor = 0;

        // 新的在前，跟柜台对账习惯一致
        for (record, table) in records.into_iter().rev() {
            if record.customer_name.as_deref() != Some(customer_name) {
                continue;
            }
            // 只列已结束的对局
            let Some(end_time) = record.end_time else {
                continue;
            };
            rows.push(vec![
                record.start_time.format("%Y-%m-%d %H:%M").to_string(),
                table.name,
                format!("{:.1} hours", elapsed_hours(record.start_time, end_time)),
                format_mad(record.price_minor),
                record.payment_status.to_string(),
            ]);
            match record.payment_status {
                PaymentStatus::Paid => total_paid_minor += record.price_minor,
                PaymentStatus::Loan => total_loan_minor += record.price_minor,
            }
        }

        Ok(InvoiceDoc {
            title: format!("Invoice for {customer_name}"),
            meta: vec![format!(
                "Generated on {}",
                Local::now().format("%Y-%m-%d %H:%M")
            )],
            sections: vec![InvoiceSection {
                heading: None,
                header: ["Date", "Table", "Duration", "Price", "Status"]
                    .map(String::from)
                    .to_vec(),
                widths: vec![18, 12, 13, 14, 8],
                rows,
                totals: vec![
                    ("Total Paid:".to_string(), format_mad(total_paid_minor)),
                    ("Total Loan:".to_string(), format_mad(total_loan_minor)),
                ],
            }],
        })
    }

    async fn daily_owner_section(
        &self,
        owner: Role,
        date: NaiveDate,
        heading: Option<String>,
    ) -> AppResult<(InvoiceSection, i64, i64)> {
        let (day_start, day_end) = local_day_bounds(date)?;
        let records = self.countable_records(owner).await?;

        let mut rows = Vec::new();
        let mut total_paid_minor = 0;
        let mut total_loan_minor = 0;

        for (record, table) in records {
            if record.start_time < day_start || record.start_time >= day_end {
                continue;
            }
            let Some(end_time) = record.end_time else {
                continue;
            };
            rows.push(vec![
                record.start_time.format("%H:%M").to_string(),
                table.name,
                record
                    .customer_name
                    .clone()
                    .unwrap_or_else(|| UNNAMED_CUSTOMER.to_string()),
                format!("{:.1} hours", elapsed_hours(record.start_time, end_time)),
                format_mad(record.price_minor),
                record.payment_status.to_string(),
            ]);
            match record.payment_status {
                PaymentStatus::Paid => total_paid_minor += record.price_minor,
                PaymentStatus::Loan => total_loan_minor += record.price_minor,
            }
        }

        let section = InvoiceSection {
            heading,
            header: ["Time", "Table", "Customer", "Duration", "Price", "Status"]
                .map(String::from)
                .to_vec(),
            widths: vec![7, 12, 16, 13, 14, 8],
            rows,
            totals: vec![
                ("Total Paid:".to_string(), format_mad(total_paid_minor)),
                ("Total Loan:".to_string(), format_mad(total_loan_minor)),
                (
                    "Total:".to_string(),
                    format_mad(total_paid_minor + total_loan_minor),
                ),
            ],
        };
        Ok((section, total_paid_minor, total_loan_minor))
    }

    pub async fn daily_owner_invoice(
        &self,
        actor: &CurrentUser,
        owner: Role,
        date: NaiveDate,
    ) -> AppResult<InvoiceDoc> {
        if !actor.role.is_admin() {
            return Err(AppError::PermissionDenied);
        }

        let label = self.owner_label(owner).await?;
        let (section, _, _) = self.daily_owner_section(owner, date, None).await?;

        Ok(InvoiceDoc {
            title: format!("Daily Report - {label} - {date}"),
            meta: vec![format!(
                "Generated on {}",
                Local::now().format("%Y-%m-%d %H:%M")
            )],
            sections: vec![section],
        })
    }

    /// 两位台主各一节，最后一节是合并总计
    pub async fn daily_all_invoice(
        &self,
        actor: &CurrentUser,
        date: NaiveDate,
    ) -> AppResult<InvoiceDoc> {
        if !actor.role.is_admin() {
            return Err(AppError::PermissionDenied);
        }

        let mut sections = Vec::new();
        let mut all_paid_minor = 0;
        let mut all_loan_minor = 0;

        for owner in Role::owners() {
            let label = self.owner_label(owner).await?;
            let (section, paid_minor, loan_minor) = self
                .daily_owner_section(owner, date, Some(format!("{label}'s Report")))
                .await?;
            sections.push(section);
            all_paid_minor += paid_minor;
            all_loan_minor += loan_minor;
        }

        sections.push(InvoiceSection {
            heading: Some("Grand Total".to_string()),
            header: Vec::new(),
            widths: Vec::new(),
            rows: Vec::new(),
            totals: vec![
                ("Total Paid:".to_string(), format_mad(all_paid_minor)),
                ("Total Loan:".to_string(), format_mad(all_loan_minor)),
                (
                    "Total:".to_string(),
                    format_mad(all_paid_minor + all_loan_minor),
                ),
            ],
        });

        Ok(InvoiceDoc {
            title: format!("Daily Report - All Owners - {date}"),
            meta: vec![format!("Date: {date}")],
            sections,
        })
    }
}
