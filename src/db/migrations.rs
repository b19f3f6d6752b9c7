//! Database migrations
//!
//! Schema creation and migration logic.

use rusqlite::Connection;

use super::connection::DbResult;

/// Current schema version
pub const SCHEMA_VERSION: i32 = 1;

/// Run all migrations to bring the database up to the current schema version
pub fn run_migrations(conn: &Connection) -> DbResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;

    let current_version = get_schema_version(conn)?;

    if current_version < 1 {
        migrate_v1(conn)?;
        conn.execute("INSERT INTO schema_migrations (version) VALUES (1)", [])?;
    }

    Ok(())
}

/// Migration v1: Initial schema
fn migrate_v1(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(
        r#"
        -- ============================================
        -- BODY MEASUREMENTS
        -- Several per date allowed; replaced in place by id
        -- ============================================
        CREATE TABLE measurements (
            seq INTEGER PRIMARY KEY AUTOINCREMENT,
            id TEXT NOT NULL UNIQUE,
            date TEXT NOT NULL,                  -- ISO date: "2025-01-09"
            weight REAL NOT NULL CHECK(weight > 0),  -- kg
            height REAL NOT NULL DEFAULT 0,      -- cm, 0 = unknown

            -- Circumferences (cm)
            chest REAL,
            waist REAL,
            belly REAL,
            hips REAL,
            arms_left REAL,
            arms_right REAL,
            thighs_left REAL,
            thighs_right REAL,
            neck REAL,

            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_measurements_date ON measurements(date);

        -- ============================================
        -- WORKOUTS
        -- Immutable once saved; exercises stored as JSON
        -- ============================================
        CREATE TABLE workouts (
            seq INTEGER PRIMARY KEY AUTOINCREMENT,
            id TEXT NOT NULL UNIQUE,
            date TEXT NOT NULL,
            exercises TEXT NOT NULL,             -- JSON array of exercises
            calories_burned REAL,
            duration_minutes REAL,
            notes TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_workouts_date ON workouts(date);

        -- ============================================
        -- MEALS
        -- Totals are denormalized at creation time
        -- ============================================
        CREATE TABLE meals (
            seq INTEGER PRIMARY KEY AUTOINCREMENT,
            id TEXT NOT NULL UNIQUE,
            date TEXT NOT NULL,
            meal_type TEXT NOT NULL CHECK(meal_type IN ('morning', 'lunch', 'dinner', 'snack')),
            items TEXT NOT NULL,                 -- JSON array of food items
            total_protein REAL NOT NULL DEFAULT 0,
            total_calories REAL NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_meals_date ON meals(date);

        -- ============================================
        -- WATER LOGS
        -- One row per calendar day
        -- ============================================
        CREATE TABLE water_logs (
            date TEXT NOT NULL PRIMARY KEY,
            glasses INTEGER NOT NULL DEFAULT 0 CHECK(glasses >= 0),
            goal INTEGER NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- ============================================
        -- PROFILE
        -- Single row table
        -- ============================================
        CREATE TABLE profile (
            id INTEGER PRIMARY KEY CHECK(id = 1),
            name TEXT NOT NULL,
            target_calories REAL NOT NULL,
            daily_water_goal INTEGER NOT NULL,
            target_weight REAL,
            target_protein REAL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );
        "#,
    )?;

    Ok(())
}

/// Get the current schema version
pub fn get_schema_version(conn: &Connection) -> DbResult<i32> {
    let version: i32 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
        .unwrap_or(0);
    Ok(version)
}

/// Check if the database needs migration
pub fn needs_migration(conn: &Connection) -> DbResult<bool> {
    let current = get_schema_version(conn)?;
    Ok(current < SCHEMA_VERSION)
}
