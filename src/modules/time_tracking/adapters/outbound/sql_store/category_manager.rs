use crate::modules::time_tracking::adapters::outbound::sql_store::{
    SharedConnection, category_by_name, ensure_category, from_rusqlite, require_pk, validate_name,
};
use crate::modules::time_tracking::adapters::outbound::store::{CategoryManager, StoreError};
use crate::modules::time_tracking::core::category::Category;
use async_trait::async_trait;
use rusqlite::OptionalExtension;

pub struct SqlCategoryManager {
    connection: SharedConnection,
}

impl SqlCategoryManager {
    pub(crate) fn new(connection: SharedConnection) -> Self {
        Self { connection }
    }
}

#[async_trait]
impl CategoryManager for SqlCategoryManager {
    async fn save(&self, category: Category) -> Result<Category, StoreError> {
        validate_name("category", &category.name)?;
        let connection = self.connection.lock().await;
        match category.pk {
            None => {
                connection
                    .execute("INSERT INTO categories (name) VALUES (?1)", [&category.name])
                    .map_err(from_rusqlite)?;
                Ok(category.with_pk(connection.last_insert_rowid()))
            }
            Some(pk) => {
                let changed = connection
                    .execute(
                        "UPDATE categories SET name = ?1 WHERE id = ?2",
                        rusqlite::params![category.name, pk],
                    )
                    .map_err(from_rusqlite)?;
                if changed == 0 {
                    return Err(StoreError::NotFound {
                        kind: "category",
                        key: pk.to_string(),
                    });
                }
                Ok(category)
            }
        }
    }

    async fn get(&self, pk: i64) -> Result<Category, StoreError> {
        let connection = self.connection.lock().await;
        connection
            .query_row("SELECT id, name FROM categories WHERE id = ?1", [pk], |row| {
                Ok(Category::new(row.get::<_, String>(1)?).with_pk(row.get(0)?))
            })
            .optional()
            .map_err(from_rusqlite)?
            .ok_or(StoreError::NotFound {
                kind: "category",
                key: pk.to_string(),
            })
    }

    async fn get_by_name(&self, name: &str) -> Result<Category, StoreError> {
        let connection = self.connection.lock().await;
        category_by_name(&connection, name)?.ok_or_else(|| StoreError::NotFound {
            kind: "category",
            key: name.to_string(),
        })
    }

    async fn get_or_create(&self, name: &str) -> Result<Category, StoreError> {
        let connection = self.connection.lock().await;
        ensure_category(&connection, &Category::new(name))
    }

    async fn get_all(&self) -> Result<Vec<Category>, StoreError> {
        let connection = self.connection.lock().await;
        let mut statement = connection
            .prepare("SELECT id, name FROM categories ORDER BY name")
            .map_err(from_rusqlite)?;
        let categories = statement
            .query_map([], |row| {
                Ok(Category::new(row.get::<_, String>(1)?).with_pk(row.get(0)?))
            })
            .map_err(from_rusqlite)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;
        Ok(categories)
    }

    async fn remove(&self, category: &Category) -> Result<(), StoreError> {
        let pk = require_pk("category", category.pk)?;
        let connection = self.connection.lock().await;
        let transaction = connection.unchecked_transaction().map_err(from_rusqlite)?;

        // Activities of this category that would collide with an uncategorised
        // namesake once their category is cleared get merged into that namesake.
        transaction
            .execute(
                "UPDATE activities SET deleted = 0 \
                 WHERE category_id IS NULL AND name IN \
                 (SELECT name FROM activities WHERE category_id = ?1 AND deleted = 0)",
                [pk],
            )
            .map_err(from_rusqlite)?;
        transaction
            .execute(
                "UPDATE facts SET activity_id = \
                 (SELECT u.id FROM activities a JOIN activities u \
                  ON u.name = a.name AND u.category_id IS NULL \
                  WHERE a.id = facts.activity_id) \
                 WHERE activity_id IN \
                 (SELECT a.id FROM activities a JOIN activities u \
                  ON u.name = a.name AND u.category_id IS NULL \
                  WHERE a.category_id = ?1)",
                [pk],
            )
            .map_err(from_rusqlite)?;
        transaction
            .execute(
                "DELETE FROM activities WHERE category_id = ?1 AND name IN \
                 (SELECT name FROM activities WHERE category_id IS NULL)",
                [pk],
            )
            .map_err(from_rusqlite)?;

        let removed = transaction
            .execute("DELETE FROM categories WHERE id = ?1", [pk])
            .map_err(from_rusqlite)?;
        if removed == 0 {
            return Err(StoreError::NotFound {
                kind: "category",
                key: pk.to_string(),
            });
        }
        transaction.commit().map_err(from_rusqlite)
    }
}
