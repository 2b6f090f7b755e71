use crate::modules::time_tracking::adapters::outbound::sql_store::{
    ACTIVITY_COLUMNS, LIKE_ESCAPE, SharedConnection, activity_from_row, ensure_activity,
    from_rusqlite, like_pattern, require_pk,
};
use crate::modules::time_tracking::adapters::outbound::store::{FactManager, StoreError};
use crate::modules::time_tracking::core::fact::Fact;
use crate::shared::core::primitives::Millis;
use async_trait::async_trait;
use rusqlite::types::{Type, Value};
use rusqlite::{OptionalExtension, Row};

const FACT_FROM: &str = "FROM facts f \
     JOIN activities a ON a.id = f.activity_id \
     LEFT JOIN categories c ON c.id = a.category_id";

fn fact_columns() -> String {
    format!("f.id, f.start_time, f.end_time, f.description, f.tags, {ACTIVITY_COLUMNS}")
}

fn fact_from_row(row: &Row<'_>) -> rusqlite::Result<Fact> {
    let tags: String = row.get(4)?;
    let tags: Vec<String> = serde_json::from_str(&tags)
        .map_err(|err| rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(err)))?;
    Ok(Fact {
        pk: Some(row.get(0)?),
        activity: activity_from_row(row, 5)?,
        start_time: row.get(1)?,
        end_time: row.get(2)?,
        description: row.get(3)?,
        tags,
    })
}

pub struct SqlFactManager {
    connection: SharedConnection,
}

impl SqlFactManager {
    pub(crate) fn new(connection: SharedConnection) -> Self {
        Self { connection }
    }
}

#[async_trait]
impl FactManager for SqlFactManager {
    async fn save(&self, fact: Fact) -> Result<Fact, StoreError> {
        if !fact.has_valid_interval() {
            return Err(StoreError::InvalidInterval);
        }
        let tags = serde_json::to_string(&fact.tags)
            .map_err(|err| StoreError::Backend(err.to_string()))?;

        let connection = self.connection.lock().await;
        let activity = ensure_activity(&connection, &fact.activity)?;

        let pk = match fact.pk {
            None => {
                connection
                    .execute(
                        "INSERT INTO facts (activity_id, start_time, end_time, description, tags) \
                         VALUES (?1, ?2, ?3, ?4, ?5)",
                        rusqlite::params![
                            activity.pk,
                            fact.start_time,
                            fact.end_time,
                            fact.description,
                            tags
                        ],
                    )
                    .map_err(from_rusqlite)?;
                connection.last_insert_rowid()
            }
            Some(pk) => {
                let changed = connection
                    .execute(
                        "UPDATE facts SET activity_id = ?1, start_time = ?2, end_time = ?3, \
                         description = ?4, tags = ?5 WHERE id = ?6",
                        rusqlite::params![
                            activity.pk,
                            fact.start_time,
                            fact.end_time,
                            fact.description,
                            tags,
                            pk
                        ],
                    )
                    .map_err(from_rusqlite)?;
                if changed == 0 {
                    return Err(StoreError::NotFound {
                        kind: "fact",
                        key: pk.to_string(),
                    });
                }
                pk
            }
        };

        Ok(Fact {
            pk: Some(pk),
            activity,
            ..fact
        })
    }

    async fn get(&self, pk: i64) -> Result<Fact, StoreError> {
        let connection = self.connection.lock().await;
        connection
            .query_row(
                &format!("SELECT {} {FACT_FROM} WHERE f.id = ?1", fact_columns()),
                [pk],
                fact_from_row,
            )
            .optional()
            .map_err(from_rusqlite)?
            .ok_or(StoreError::NotFound {
                kind: "fact",
                key: pk.to_string(),
            })
    }

    async fn get_all(
        &self,
        start: Option<Millis>,
        end: Option<Millis>,
        search_term: Option<&str>,
    ) -> Result<Vec<Fact>, StoreError> {
        let mut query = format!("SELECT {} {FACT_FROM} WHERE 1 = 1", fact_columns());
        let mut params: Vec<Value> = Vec::new();
        if let Some(end) = end {
            params.push(Value::Integer(end));
            query.push_str(&format!(" AND f.start_time <= ?{}", params.len()));
        }
        if let Some(start) = start {
            params.push(Value::Integer(start));
            query.push_str(&format!(
                " AND (f.end_time IS NULL OR f.end_time >= ?{})",
                params.len()
            ));
        }
        if let Some(term) = search_term {
            params.push(Value::Text(like_pattern(term)));
            let index = params.len();
            query.push_str(&format!(
                " AND (a.name LIKE ?{index} {LIKE_ESCAPE} \
                 OR c.name LIKE ?{index} {LIKE_ESCAPE} \
                 OR f.description LIKE ?{index} {LIKE_ESCAPE})"
            ));
        }
        query.push_str(" ORDER BY f.start_time");

        let connection = self.connection.lock().await;
        let mut statement = connection.prepare(&query).map_err(from_rusqlite)?;
        let facts = statement
            .query_map(rusqlite::params_from_iter(params), fact_from_row)
            .map_err(from_rusqlite)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;
        Ok(facts)
    }

    async fn remove(&self, fact: &Fact) -> Result<(), StoreError> {
        let pk = require_pk("fact", fact.pk)?;
        let connection = self.connection.lock().await;
        let removed = connection
            .execute("DELETE FROM facts WHERE id = ?1", [pk])
            .map_err(from_rusqlite)?;
        if removed == 0 {
            return Err(StoreError::NotFound {
                kind: "fact",
                key: pk.to_string(),
            });
        }
        Ok(())
    }
}
