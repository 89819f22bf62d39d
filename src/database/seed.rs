use sea_orm::{ActiveModelTrait, EntityTrait, PaginatorTrait, Set, TransactionTrait};

use crate::config::{SeedConfig, StaffSeed};
use crate::database::DbConn;
use crate::entities::{billiard_tables, users};
use crate::error::AppResult;
use crate::models::Role;
use crate::utils::hash_password;

/// 首次启动建档：users 表为空时写入员工账号与球台，否则不动
pub async fn seed_initial_data(conn: &DbConn, seed: &SeedConfig) -> AppResult<()> {
    let existing = users::Entity::find().count(conn).await?;
    if existing > 0 {
        return Ok(());
    }

    let txn = conn.begin().await?;

    let staff: [(&str, &str, Role); 3] = [
        (&seed.admin_username, &seed.admin_password, Role::Admin),
        (&seed.owner_a.username, &seed.owner_a.password, Role::OwnerA),
        (&seed.owner_b.username, &seed.owner_b.password, Role::OwnerB),
    ];
    for (username, password, role) in staff {
        users::ActiveModel {
            username: Set(username.to_string()),
            password_hash: Set(hash_password(password)?),
            role: Set(role),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
    }

    let owners: [(&StaffSeed, Role); 2] = [
        (&seed.owner_a, Role::OwnerA),
        (&seed.owner_b, Role::OwnerB),
    ];
    let mut table_count = 0;
    for (staff_seed, role) in owners {
        for name in &staff_seed.tables {
            billiard_tables::ActiveModel {
                name: Set(name.clone()),
                owner: Set(role),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
            table_count += 1;
        }
    }

    txn.commit().await?;
    log::info!("Seeded 3 staff accounts and {table_count} tables");
    Ok(())
}
