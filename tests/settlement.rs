mod common;

use chrono::{Duration, Utc};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};

use common::{RecordSpec, admin, insert_record, owner_a, setup};
use cuehall_backend::entities::game_records;
use cuehall_backend::error::AppError;
use cuehall_backend::models::*;
use cuehall_backend::services::SettlementService;

fn settle(customer: &str, owner: Role, amount_minor: i64) -> SettleLoanRequest {
    SettleLoanRequest {
        customer_name: customer.to_string(),
        owner,
        amount_minor,
    }
}

async fn loans_snapshot(
    db: &sea_orm::DatabaseConnection,
) -> Vec<(i64, PaymentStatus, i64)> {
    game_records::Entity::find()
        .order_by_asc(game_records::Column::StartTime)
        .order_by_asc(game_records::Column::Id)
        .all(db)
        .await
        .unwrap()
        .into_iter()
        .map(|r| (r.price_minor, r.payment_status, r.table_id))
        .collect()
}

#[tokio::test]
async fn settles_oldest_loans_first_and_splits_partial() {
    let db = setup().await;
    let service = SettlementService::new(db.clone());
    let now = Utc::now();

    // 按开台时间排序的赊账：30、50、20 MAD
    insert_record(&db, RecordSpec::confirmed_loan(1, now - Duration::hours(3), 3000, "Hamid"))
        .await;
    let middle =
        insert_record(&db, RecordSpec::confirmed_loan(1, now - Duration::hours(2), 5000, "Hamid"))
            .await;
    insert_record(&db, RecordSpec::confirmed_loan(2, now - Duration::hours(1), 2000, "Hamid"))
        .await;

    // 收 70 MAD：第一条整条冲抵，第二条拆成已付 40 + 赊账 10，第三条不动
    service
        .settle_loan(&admin(), settle("Hamid", Role::OwnerA, 7000))
        .await
        .unwrap();

    let records = game_records::Entity::find()
        .filter(game_records::Column::CustomerName.eq("Hamid"))
        .all(&db)
        .await
        .unwrap();
    assert_eq!(records.len(), 4);

    let total_paid: i64 = records
        .iter()
        .filter(|r| r.payment_status == PaymentStatus::Paid)
        .map(|r| r.price_minor)
        .sum();
    let total_loan: i64 = records
        .iter()
        .filter(|r| r.payment_status == PaymentStatus::Loan)
        .map(|r| r.price_minor)
        .sum();
    assert_eq!(total_paid, 7000);
    assert_eq!(total_loan, 3000);

    // 原第二条留下剩余赊账
    let reduced = game_records::Entity::find_by_id(middle.id)
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reduced.payment_status, PaymentStatus::Loan);
    assert_eq!(reduced.price_minor, 1000);

    // 拆出来的已付记录克隆原对局的台号和起止时间
    let split = records
        .iter()
        .find(|r| r.payment_status == PaymentStatus::Paid && r.price_minor == 4000)
        .unwrap();
    assert_eq!(split.table_id, middle.table_id);
    assert_eq!(split.start_time, middle.start_time);
    assert_eq!(split.end_time, middle.end_time);
    assert!(split.confirmed);

    // 最新的一条没被碰
    let newest = records
        .iter()
        .find(|r| r.table_id == 2)
        .unwrap();
    assert_eq!(newest.payment_status, PaymentStatus::Loan);
    assert_eq!(newest.price_minor, 2000);
}

#[tokio::test]
async fn exact_amount_settles_without_split() {
    let db = setup().await;
    let service = SettlementService::new(db.clone());
    let now = Utc::now();

    insert_record(&db, RecordSpec::confirmed_loan(1, now - Duration::hours(3), 3000, "Hamid"))
        .await;
    insert_record(&db, RecordSpec::confirmed_loan(1, now - Duration::hours(2), 5000, "Hamid"))
        .await;

    service
        .settle_loan(&admin(), settle("Hamid", Role::OwnerA, 8000))
        .await
        .unwrap();

    let records = loans_snapshot(&db).await;
    // 全部整条冲抵，不产生新记录
    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|(_, status, _)| *status == PaymentStatus::Paid));
}

#[tokio::test]
async fn rejects_non_positive_amount() {
    let db = setup().await;
    let service = SettlementService::new(db.clone());
    let now = Utc::now();

    insert_record(&db, RecordSpec::confirmed_loan(1, now - Duration::hours(1), 3000, "Hamid"))
        .await;

    for amount in [0, -500] {
        let err = service
            .settle_loan(&admin(), settle("Hamid", Role::OwnerA, amount))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    let records = loans_snapshot(&db).await;
    assert_eq!(records, vec![(3000, PaymentStatus::Loan, 1)]);
}

#[tokio::test]
async fn overpayment_excess_is_dropped() {
    let db = setup().await;
    let service = SettlementService::new(db.clone());
    let now = Utc::now();

    insert_record(&db, RecordSpec::confirmed_loan(1, now - Duration::hours(1), 2000, "Hamid"))
        .await;

    // 超出欠款的部分不报错也不挂账
    service
        .settle_loan(&admin(), settle("Hamid", Role::OwnerA, 5000))
        .await
        .unwrap();

    let records = loans_snapshot(&db).await;
    assert_eq!(records, vec![(2000, PaymentStatus::Paid, 1)]);
}

#[tokio::test]
async fn scoped_to_owner_and_customer() {
    let db = setup().await;
    let service = SettlementService::new(db.clone());
    let now = Utc::now();

    // owner_a 名下另一位顾客、owner_b 名下同名顾客，都不该被碰
    insert_record(&db, RecordSpec::confirmed_loan(1, now - Duration::hours(2), 3000, "Hamid"))
        .await;
    insert_record(&db, RecordSpec::confirmed_loan(1, now - Duration::hours(2), 3000, "Driss"))
        .await;
    insert_record(&db, RecordSpec::confirmed_loan(3, now - Duration::hours(2), 3000, "Hamid"))
        .await;

    service
        .settle_loan(&admin(), settle("Hamid", Role::OwnerA, 3000))
        .await
        .unwrap();

    let paid: Vec<_> = game_records::Entity::find()
        .filter(game_records::Column::PaymentStatus.eq(PaymentStatus::Paid))
        .all(&db)
        .await
        .unwrap();
    assert_eq!(paid.len(), 1);
    assert_eq!(paid[0].table_id, 1);
    assert_eq!(paid[0].customer_name.as_deref(), Some("Hamid"));
}

#[tokio::test]
async fn ignores_unconfirmed_and_archived_loans() {
    let db = setup().await;
    let service = SettlementService::new(db.clone());
    let now = Utc::now();

    insert_record(
        &db,
        RecordSpec::confirmed_loan(1, now - Duration::hours(3), 3000, "Hamid").unconfirmed(),
    )
    .await;
    insert_record(
        &db,
        RecordSpec::confirmed_loan(1, now - Duration::hours(2), 3000, "Hamid").archived(),
    )
    .await;

    service
        .settle_loan(&admin(), settle("Hamid", Role::OwnerA, 6000))
        .await
        .unwrap();

    // 两条都不符合结算口径，原样保留
    let records = loans_snapshot(&db).await;
    assert!(records.iter().all(|(_, status, _)| *status == PaymentStatus::Loan));
}

#[tokio::test]
async fn settlement_is_admin_only() {
    let db = setup().await;
    let service = SettlementService::new(db.clone());
    let now = Utc::now();

    insert_record(&db, RecordSpec::confirmed_loan(1, now - Duration::hours(1), 3000, "Hamid"))
        .await;

    let err = service
        .settle_loan(&owner_a(), settle("Hamid", Role::OwnerA, 3000))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::PermissionDenied));

    let records = loans_snapshot(&db).await;
    assert_eq!(records, vec![(3000, PaymentStatus::Loan, 1)]);
}
