pub mod billiard_tables;
pub mod game_records;
pub mod user_activities;
pub mod users;

pub use billiard_tables as table_entity;
pub use game_records as game_record_entity;
pub use user_activities as user_activity_entity;
pub use users as user_entity;
