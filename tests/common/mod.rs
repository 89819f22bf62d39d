use chrono::{DateTime, Utc};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, Set};

use cuehall_backend::entities::{billiard_tables, game_records, users};
use cuehall_backend::models::{CurrentUser, GameState, PaymentStatus, Role};

pub const HOURLY_RATE: f64 = 30.0;

/// 内存库 + 真实迁移 + 三个员工账号 + 三张球台
/// （球台 1、2 归 owner_a，球台 3 归 owner_b）
pub async fn setup() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    Migrator::up(&db, None).await.unwrap();

    let staff = [
        ("admin", Role::Admin),
        ("ayoub", Role::OwnerA),
        ("ayman", Role::OwnerB),
    ];
    for (username, role) in staff {
        users::ActiveModel {
            username: Set(username.to_string()),
            // 测试里用最低 cost，省时间
            password_hash: Set(bcrypt::hash(username, 4).unwrap()),
            role: Set(role),
            ..Default::default()
        }
        .insert(&db)
        .await
        .unwrap();
    }

    let tables = [
        ("mini 1", Role::OwnerA),
        ("mini 2", Role::OwnerA),
        ("strong", Role::OwnerB),
    ];
    for (name, owner) in tables {
        billiard_tables::ActiveModel {
            name: Set(name.to_string()),
            owner: Set(owner),
            ..Default::default()
        }
        .insert(&db)
        .await
        .unwrap();
    }

    db
}

pub fn admin() -> CurrentUser {
    CurrentUser {
        id: 1,
        username: "admin".to_string(),
        role: Role::Admin,
    }
}

pub fn owner_a() -> CurrentUser {
    CurrentUser {
        id: 2,
        username: "ayoub".to_string(),
        role: Role::OwnerA,
    }
}

pub fn owner_b() -> CurrentUser {
    CurrentUser {
        id: 3,
        username: "ayman".to_string(),
        role: Role::OwnerB,
    }
}

pub struct RecordSpec {
    pub table_id: i64,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub price_minor: i64,
    pub payment_status: PaymentStatus,
    pub state: GameState,
    pub customer_name: Option<String>,
    pub confirmed: bool,
    pub archived: bool,
}

impl RecordSpec {
    /// 已确认的赊账记录，结束时间 = 开台 + 1 小时
    pub fn confirmed_loan(
        table_id: i64,
        start_time: DateTime<Utc>,
        price_minor: i64,
        customer: &str,
    ) -> Self {
        Self {
            table_id,
            start_time,
            end_time: Some(start_time + chrono::Duration::hours(1)),
            price_minor,
            payment_status: PaymentStatus::Loan,
            state: GameState::Finished,
            customer_name: Some(customer.to_string()),
            confirmed: true,
            archived: false,
        }
    }

    pub fn paid(mut self) -> Self {
        self.payment_status = PaymentStatus::Paid;
        self
    }

    pub fn unconfirmed(mut self) -> Self {
        self.confirmed = false;
        self
    }

    pub fn archived(mut self) -> Self {
        self.archived = true;
        self
    }
}

pub async fn insert_record(db: &DatabaseConnection, spec: RecordSpec) -> game_records::Model {
    game_records::ActiveModel {
        table_id: Set(spec.table_id),
        start_time: Set(spec.start_time),
        end_time: Set(spec.end_time),
        price_minor: Set(spec.price_minor),
        payment_status: Set(spec.payment_status),
        state: Set(spec.state),
        customer_name: Set(spec.customer_name),
        created_by: Set("ayoub".to_string()),
        confirmed: Set(spec.confirmed),
        archived: Set(spec.archived),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
}
