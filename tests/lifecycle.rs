mod common;

use chrono::{Duration, Utc};
use sea_orm::EntityTrait;

use common::{HOURLY_RATE, RecordSpec, admin, insert_record, owner_a, owner_b, setup};
use cuehall_backend::entities::game_records;
use cuehall_backend::error::AppError;
use cuehall_backend::models::*;
use cuehall_backend::services::GameService;

fn start_request(table_id: i64) -> StartGameRequest {
    StartGameRequest {
        table_id,
        customer_name: None,
    }
}

#[tokio::test]
async fn start_creates_in_progress_record() {
    let db = setup().await;
    let service = GameService::new(db.clone(), HOURLY_RATE);

    let record = service.start_game(&owner_a(), start_request(1)).await.unwrap();
    assert_eq!(record.state, GameState::InProgress);
    assert_eq!(record.payment_status, PaymentStatus::Loan);
    assert_eq!(record.price_minor, 0);
    assert!(record.end_time.is_none());
    assert!(!record.confirmed);

    let tables = service.list_tables(&owner_a()).await.unwrap();
    let table = tables.iter().find(|t| t.id == 1).unwrap();
    assert!(table.occupied);
    assert!(!tables.iter().find(|t| t.id == 2).unwrap().occupied);
}

#[tokio::test]
async fn start_on_occupied_table_conflicts() {
    let db = setup().await;
    let service = GameService::new(db.clone(), HOURLY_RATE);

    service.start_game(&owner_a(), start_request(1)).await.unwrap();
    let err = service
        .start_game(&owner_a(), start_request(1))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    // 失败的开台不能留下任何记录
    let count = game_records::Entity::find().all(&db).await.unwrap().len();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn start_on_foreign_table_denied() {
    let db = setup().await;
    let service = GameService::new(db.clone(), HOURLY_RATE);

    // 球台 1 属于 owner_a
    let err = service
        .start_game(&owner_b(), start_request(1))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::PermissionDenied));
    assert!(game_records::Entity::find().all(&db).await.unwrap().is_empty());

    // 管理员不受限
    service.start_game(&admin(), start_request(1)).await.unwrap();
}

#[tokio::test]
async fn end_computes_elapsed_price() {
    let db = setup().await;
    let service = GameService::new(db.clone(), HOURLY_RATE);

    // 两小时前开的台
    insert_record(
        &db,
        RecordSpec {
            table_id: 1,
            start_time: Utc::now() - Duration::hours(2),
            end_time: None,
            price_minor: 0,
            payment_status: PaymentStatus::Loan,
            state: GameState::InProgress,
            customer_name: None,
            confirmed: false,
            archived: false,
        },
    )
    .await;

    let response = service
        .end_game(
            &owner_a(),
            EndGameRequest {
                table_id: 1,
                payment_status: None,
            },
        )
        .await
        .unwrap();

    // 2 小时 × 30 MAD = 60 MAD
    assert_eq!(response.price_minor, 6000);

    let record = game_records::Entity::find_by_id(response.record_id)
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(record.state, GameState::Finished);
    assert!(record.end_time.is_some());
    // 缺省按已付
    assert_eq!(record.payment_status, PaymentStatus::Paid);

    // 没有进行中的对局时再结束报 NotFound
    let err = service
        .end_game(
            &owner_a(),
            EndGameRequest {
                table_id: 1,
                payment_status: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn confirm_requires_customer_name() {
    let db = setup().await;
    let service = GameService::new(db.clone(), HOURLY_RATE);

    let record = insert_record(
        &db,
        RecordSpec::confirmed_loan(1, Utc::now() - Duration::hours(1), 3000, "Hamid").unconfirmed(),
    )
    .await;

    // 空白顾客名直接拒绝
    let err = service
        .update_record(
            &owner_a(),
            record.id,
            UpdateGameRequest {
                customer_name: Some("   ".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let updated = service
        .update_record(
            &owner_a(),
            record.id,
            UpdateGameRequest {
                confirm: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(updated.confirmed);
}

#[tokio::test]
async fn confirmed_record_is_frozen() {
    let db = setup().await;
    let service = GameService::new(db.clone(), HOURLY_RATE);

    let record = insert_record(
        &db,
        RecordSpec::confirmed_loan(1, Utc::now() - Duration::hours(1), 3000, "Hamid"),
    )
    .await;

    let err = service
        .update_record(
            &owner_a(),
            record.id,
            UpdateGameRequest {
                price_minor: Some(1),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::AlreadyConfirmed));

    let unchanged = game_records::Entity::find_by_id(record.id)
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(unchanged.price_minor, 3000);
}

#[tokio::test]
async fn marking_paid_implicitly_confirms() {
    let db = setup().await;
    let service = GameService::new(db.clone(), HOURLY_RATE);

    let record = insert_record(
        &db,
        RecordSpec::confirmed_loan(1, Utc::now() - Duration::hours(1), 3000, "Hamid").unconfirmed(),
    )
    .await;

    let updated = service
        .update_record(
            &owner_a(),
            record.id,
            UpdateGameRequest {
                payment_status: Some(PaymentStatus::Paid),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(updated.confirmed);
    assert_eq!(updated.payment_status, PaymentStatus::Paid);
}

#[tokio::test]
async fn negative_price_update_rejected() {
    let db = setup().await;
    let service = GameService::new(db.clone(), HOURLY_RATE);

    let record = insert_record(
        &db,
        RecordSpec::confirmed_loan(1, Utc::now() - Duration::hours(1), 3000, "Hamid").unconfirmed(),
    )
    .await;

    let err = service
        .update_record(
            &owner_a(),
            record.id,
            UpdateGameRequest {
                price_minor: Some(-100),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn delete_is_admin_only() {
    let db = setup().await;
    let service = GameService::new(db.clone(), HOURLY_RATE);

    let record = insert_record(
        &db,
        RecordSpec::confirmed_loan(1, Utc::now() - Duration::hours(1), 3000, "Hamid"),
    )
    .await;

    let err = service.delete_record(&owner_a(), record.id).await.unwrap_err();
    assert!(matches!(err, AppError::PermissionDenied));
    assert!(
        game_records::Entity::find_by_id(record.id)
            .one(&db)
            .await
            .unwrap()
            .is_some()
    );

    service.delete_record(&admin(), record.id).await.unwrap();
    assert!(
        game_records::Entity::find_by_id(record.id)
            .one(&db)
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn archive_only_touches_todays_confirmed_records() {
    let db = setup().await;
    let service = GameService::new(db.clone(), HOURLY_RATE);

    let now = Utc::now();
    let today_confirmed =
        insert_record(&db, RecordSpec::confirmed_loan(1, now, 3000, "Hamid")).await;
    let yesterday_confirmed =
        insert_record(&db, RecordSpec::confirmed_loan(1, now - Duration::days(2), 2000, "Hamid"))
            .await;
    let today_unconfirmed = insert_record(
        &db,
        RecordSpec::confirmed_loan(2, now, 1000, "Driss").unconfirmed(),
    )
    .await;

    let err = service.archive_today(&owner_a()).await.unwrap_err();
    assert!(matches!(err, AppError::PermissionDenied));

    let archived = service.archive_today(&admin()).await.unwrap();
    assert_eq!(archived, 1);

    let reload = |id| game_records::Entity::find_by_id(id).one(&db);
    assert!(reload(today_confirmed.id).await.unwrap().unwrap().archived);
    assert!(!reload(yesterday_confirmed.id).await.unwrap().unwrap().archived);
    assert!(!reload(today_unconfirmed.id).await.unwrap().unwrap().archived);
}

#[tokio::test]
async fn running_price_is_computed_on_read() {
    let db = setup().await;
    let service = GameService::new(db.clone(), HOURLY_RATE);

    let record = insert_record(
        &db,
        RecordSpec {
            table_id: 1,
            start_time: Utc::now() - Duration::minutes(30),
            end_time: None,
            price_minor: 0,
            payment_status: PaymentStatus::Loan,
            state: GameState::InProgress,
            customer_name: None,
            confirmed: false,
            archived: false,
        },
    )
    .await;

    let price = service.current_price(&owner_a(), record.id).await.unwrap();
    // 半小时 × 30 MAD ≈ 15 MAD，落库价仍是 0
    assert!((price.duration_hours - 0.5).abs() < 0.01);
    assert!((price.running_price_minor - 1500).abs() < 5);

    let stored = game_records::Entity::find_by_id(record.id)
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.price_minor, 0);
}
