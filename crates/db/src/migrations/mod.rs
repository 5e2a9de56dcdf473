//! Database migrations.
//!
//! Schema migrations for the database.

#![allow(missing_docs)]

use sea_orm_migration::prelude::*;

mod m20250301_000001_create_user_table;
mod m20250301_000002_create_profile_table;
mod m20250301_000003_create_settings_table;
mod m20250301_000004_create_follow_table;
mod m20250301_000005_create_block_table;
mod m20250301_000006_create_category_and_tag_tables;
mod m20250301_000007_create_post_tables;
mod m20250301_000008_create_comment_table;
mod m20250301_000009_create_like_table;
mod m20250301_000010_create_report_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_user_table::Migration),
            Box::new(m20250301_000002_create_profile_table::Migration),
            Box::new(m20250301_000003_create_settings_table::Migration),
            Box::new(m20250301_000004_create_follow_table::Migration),
            Box::new(m20250301_000005_create_block_table::Migration),
            Box::new(m20250301_000006_create_category_and_tag_tables::Migration),
            Box::new(m20250301_000007_create_post_tables::Migration),
            Box::new(m20250301_000008_create_comment_table::Migration),
            Box::new(m20250301_000009_create_like_table::Migration),
            Box::new(m20250301_000010_create_report_table::Migration),
        ]
    }
}
