//! Database schema and migrations for blogmon.
//!
//! Migrations are applied in order when the database is opened.

/// Database migrations.
///
/// Each entry is one SQL script; `schema_version` records how many have run.
pub const MIGRATIONS: &[&str] = &[
    // v1: daily post counts per blog
    r#"
CREATE TABLE blog_stats (
    blog_id     TEXT NOT NULL,
    date        TEXT NOT NULL,              -- YYYY-MM-DD in the monitor's timezone
    count       INTEGER NOT NULL DEFAULT 0 CHECK (count >= 0),
    updated_at  TEXT NOT NULL DEFAULT (datetime('now')),
    PRIMARY KEY (blog_id, date)
);

CREATE INDEX idx_blog_stats_date ON blog_stats(date);
"#,
];
