// SQLite implementation of the Store port.
//
// Purpose
// - Back the "sqlalchemy" registry entry with a relational store.
//
// Responsibilities
// - Open the database named by `db_path` and create the schema if missing.
// - Share one connection between the category, activity and fact managers.

mod activity_manager;
mod category_manager;
mod fact_manager;

pub use activity_manager::SqlActivityManager;
pub use category_manager::SqlCategoryManager;
pub use fact_manager::SqlFactManager;

use crate::modules::time_tracking::adapters::outbound::store::{
    ActivityManager, CategoryManager, FactManager, Store, StoreError,
};
use crate::modules::time_tracking::core::{activity::Activity, category::Category};
use crate::shell::config::{HamsterConfig, IN_MEMORY_DB_PATH};
use rusqlite::{Connection, ErrorCode, OptionalExtension, Row};
use std::sync::Arc;
use tokio::sync::Mutex;

pub(crate) type SharedConnection = Arc<Mutex<Connection>>;

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS categories (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE
    );
    CREATE TABLE IF NOT EXISTS activities (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        category_id INTEGER REFERENCES categories(id) ON DELETE SET NULL,
        deleted INTEGER NOT NULL DEFAULT 0
    );
    CREATE UNIQUE INDEX IF NOT EXISTS activities_name_category
        ON activities(name, IFNULL(category_id, -1));
    CREATE TABLE IF NOT EXISTS facts (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        activity_id INTEGER NOT NULL REFERENCES activities(id),
        start_time INTEGER NOT NULL,
        end_time INTEGER,
        description TEXT,
        tags TEXT NOT NULL DEFAULT '[]'
    );
";

pub(crate) const ACTIVITY_COLUMNS: &str = "a.id, a.name, a.deleted, c.id, c.name";
pub(crate) const ACTIVITY_FROM: &str =
    "FROM activities a LEFT JOIN categories c ON c.id = a.category_id";

pub struct SqlStore {
    categories: Arc<dyn CategoryManager>,
    activities: Arc<dyn ActivityManager>,
    facts: Arc<dyn FactManager>,
}

impl SqlStore {
    pub fn new(config: &HamsterConfig) -> Result<Self, StoreError> {
        let db_path = config.db_path();
        let connection = if db_path == IN_MEMORY_DB_PATH {
            Connection::open_in_memory()
        } else {
            Connection::open(db_path)
        }
        .map_err(from_rusqlite)?;

        connection
            .execute_batch("PRAGMA foreign_keys = ON;")
            .map_err(from_rusqlite)?;
        connection.execute_batch(SCHEMA).map_err(from_rusqlite)?;
        tracing::debug!(db_path, "sql store ready");

        let connection: SharedConnection = Arc::new(Mutex::new(connection));
        Ok(Self {
            categories: Arc::new(SqlCategoryManager::new(connection.clone())),
            activities: Arc::new(SqlActivityManager::new(connection.clone())),
            facts: Arc::new(SqlFactManager::new(connection)),
        })
    }
}

impl Store for SqlStore {
    fn categories(&self) -> Arc<dyn CategoryManager> {
        self.categories.clone()
    }

    fn activities(&self) -> Arc<dyn ActivityManager> {
        self.activities.clone()
    }

    fn facts(&self) -> Arc<dyn FactManager> {
        self.facts.clone()
    }
}

pub(crate) fn from_rusqlite(err: rusqlite::Error) -> StoreError {
    match &err {
        rusqlite::Error::SqliteFailure(failure, message)
            if failure.code == ErrorCode::ConstraintViolation =>
        {
            StoreError::Validation(message.clone().unwrap_or_else(|| failure.to_string()))
        }
        _ => StoreError::Backend(err.to_string()),
    }
}

pub(crate) fn validate_name(kind: &str, name: &str) -> Result<(), StoreError> {
    if name.trim().is_empty() {
        return Err(StoreError::Validation(format!("{kind} name must not be empty")));
    }
    Ok(())
}

pub(crate) fn require_pk(kind: &str, pk: Option<i64>) -> Result<i64, StoreError> {
    pk.ok_or_else(|| StoreError::Validation(format!("{kind} has not been saved yet")))
}

pub(crate) const LIKE_ESCAPE: &str = "ESCAPE '\\'";

/// Substring pattern to pair with `LIKE_ESCAPE`; `%` and `_` in `term` match literally.
pub(crate) fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

/// Maps `a.id, a.name, a.deleted, c.id, c.name` starting at `offset`.
pub(crate) fn activity_from_row(row: &Row<'_>, offset: usize) -> rusqlite::Result<Activity> {
    let category = match (
        row.get::<_, Option<i64>>(offset + 3)?,
        row.get::<_, Option<String>>(offset + 4)?,
    ) {
        (Some(pk), Some(name)) => Some(Category::new(name).with_pk(pk)),
        _ => None,
    };
    Ok(Activity {
        pk: Some(row.get(offset)?),
        name: row.get(offset + 1)?,
        category,
        deleted: row.get::<_, i64>(offset + 2)? != 0,
    })
}

pub(crate) fn category_by_name(
    connection: &Connection,
    name: &str,
) -> Result<Option<Category>, StoreError> {
    connection
        .query_row(
            "SELECT id, name FROM categories WHERE name = ?1",
            [name],
            |row| Ok(Category::new(row.get::<_, String>(1)?).with_pk(row.get(0)?)),
        )
        .optional()
        .map_err(from_rusqlite)
}

/// Resolve a category to a stored row, creating it by name when it has no pk.
pub(crate) fn ensure_category(
    connection: &Connection,
    category: &Category,
) -> Result<Category, StoreError> {
    if category.pk.is_some() {
        return Ok(category.clone());
    }
    validate_name("category", &category.name)?;
    if let Some(existing) = category_by_name(connection, &category.name)? {
        return Ok(existing);
    }
    connection
        .execute("INSERT INTO categories (name) VALUES (?1)", [&category.name])
        .map_err(from_rusqlite)?;
    Ok(category.clone().with_pk(connection.last_insert_rowid()))
}

/// Row for (name, category), including one flagged as deleted.
pub(crate) fn activity_by_composite(
    connection: &Connection,
    name: &str,
    category_name: Option<&str>,
) -> Result<Option<Activity>, StoreError> {
    let result = match category_name {
        Some(category_name) => connection.query_row(
            &format!(
                "SELECT {ACTIVITY_COLUMNS} {ACTIVITY_FROM} \
                 WHERE a.name = ?1 AND c.name = ?2"
            ),
            [name, category_name],
            |row| activity_from_row(row, 0),
        ),
        None => connection.query_row(
            &format!(
                "SELECT {ACTIVITY_COLUMNS} {ACTIVITY_FROM} \
                 WHERE a.name = ?1 AND a.category_id IS NULL"
            ),
            [name],
            |row| activity_from_row(row, 0),
        ),
    };
    result.optional().map_err(from_rusqlite)
}

pub(crate) fn restore_activity(
    connection: &Connection,
    activity: Activity,
) -> Result<Activity, StoreError> {
    if !activity.deleted {
        return Ok(activity);
    }
    let pk = require_pk("activity", activity.pk)?;
    connection
        .execute("UPDATE activities SET deleted = 0 WHERE id = ?1", [pk])
        .map_err(from_rusqlite)?;
    Ok(Activity {
        deleted: false,
        ..activity
    })
}

/// Resolve an activity to a stored row, creating it (and its category) when it has no pk.
/// A row flagged as deleted for the same (name, category) is restored and reused.
pub(crate) fn ensure_activity(
    connection: &Connection,
    activity: &Activity,
) -> Result<Activity, StoreError> {
    if activity.pk.is_some() {
        return Ok(activity.clone());
    }
    validate_name("activity", &activity.name)?;
    let category = activity
        .category
        .as_ref()
        .map(|category| ensure_category(connection, category))
        .transpose()?;
    if let Some(existing) = activity_by_composite(
        connection,
        &activity.name,
        category.as_ref().map(|c| c.name.as_str()),
    )? {
        return restore_activity(connection, existing);
    }
    connection
        .execute(
            "INSERT INTO activities (name, category_id, deleted) VALUES (?1, ?2, 0)",
            rusqlite::params![activity.name, category.as_ref().and_then(|c| c.pk)],
        )
        .map_err(from_rusqlite)?;
    Ok(Activity {
        pk: Some(connection.last_insert_rowid()),
        name: activity.name.clone(),
        category,
        deleted: false,
    })
}
