//! Embedded SQL migrations
//!
//! Migrations are embedded at compile time using include_str!

/// Migration metadata
pub struct Migration {
    pub id: &'static str,
    pub sql: &'static str,
}

/// Get all embedded migrations in order
pub fn get_migrations() -> Vec<Migration> {
    vec![
        Migration {
            id: "001_search_state_schema",
            sql: include_str!("../../migrations/001_search_state_schema.sql"),
        },
        Migration {
            id: "002_notification_events_schema",
            sql: include_str!("../../migrations/002_notification_events_schema.sql"),
        },
        Migration {
            id: "003_saved_searches_schema",
            sql: include_str!("../../migrations/003_saved_searches_schema.sql"),
        },
    ]
}
