use crate::modules::time_tracking::adapters::outbound::sql_store::{
    ACTIVITY_COLUMNS, ACTIVITY_FROM, LIKE_ESCAPE, SharedConnection, activity_by_composite,
    activity_from_row, ensure_category, from_rusqlite, like_pattern, require_pk, validate_name,
};
use crate::modules::time_tracking::adapters::outbound::store::{ActivityManager, StoreError};
use crate::modules::time_tracking::core::{activity::Activity, category::Category};
use async_trait::async_trait;
use rusqlite::OptionalExtension;
use rusqlite::types::Value;

pub struct SqlActivityManager {
    connection: SharedConnection,
}

impl SqlActivityManager {
    pub(crate) fn new(connection: SharedConnection) -> Self {
        Self { connection }
    }
}

#[async_trait]
impl ActivityManager for SqlActivityManager {
    async fn save(&self, activity: Activity) -> Result<Activity, StoreError> {
        validate_name("activity", &activity.name)?;
        let connection = self.connection.lock().await;
        let category = activity
            .category
            .as_ref()
            .map(|category| ensure_category(&connection, category))
            .transpose()?;
        let category_pk = category.as_ref().and_then(|category| category.pk);

        let pk = match activity.pk {
            None => match activity_by_composite(
                &connection,
                &activity.name,
                category.as_ref().map(|category| category.name.as_str()),
            )? {
                Some(Activity {
                    pk: Some(pk),
                    deleted: true,
                    ..
                }) => {
                    connection
                        .execute(
                            "UPDATE activities SET deleted = ?1 WHERE id = ?2",
                            rusqlite::params![activity.deleted, pk],
                        )
                        .map_err(from_rusqlite)?;
                    pk
                }
                _ => {
                    connection
                        .execute(
                            "INSERT INTO activities (name, category_id, deleted) VALUES (?1, ?2, ?3)",
                            rusqlite::params![activity.name, category_pk, activity.deleted],
                        )
                        .map_err(from_rusqlite)?;
                    connection.last_insert_rowid()
                }
            },
            Some(pk) => {
                let changed = connection
                    .execute(
                        "UPDATE activities SET name = ?1, category_id = ?2, deleted = ?3 WHERE id = ?4",
                        rusqlite::params![activity.name, category_pk, activity.deleted, pk],
                    )
                    .map_err(from_rusqlite)?;
                if changed == 0 {
                    return Err(StoreError::NotFound {
                        kind: "activity",
                        key: pk.to_string(),
                    });
                }
                pk
            }
        };

        Ok(Activity {
            pk: Some(pk),
            category,
            ..activity
        })
    }

    async fn get(&self, pk: i64) -> Result<Activity, StoreError> {
        let connection = self.connection.lock().await;
        connection
            .query_row(
                &format!("SELECT {ACTIVITY_COLUMNS} {ACTIVITY_FROM} WHERE a.id = ?1"),
                [pk],
                |row| activity_from_row(row, 0),
            )
            .optional()
            .map_err(from_rusqlite)?
            .ok_or(StoreError::NotFound {
                kind: "activity",
                key: pk.to_string(),
            })
    }

    async fn get_by_composite(
        &self,
        name: &str,
        category: Option<&Category>,
    ) -> Result<Activity, StoreError> {
        let connection = self.connection.lock().await;
        let category_name = category.map(|category| category.name.as_str());
        activity_by_composite(&connection, name, category_name)?
            .filter(|activity| !activity.deleted)
            .ok_or_else(|| StoreError::NotFound {
                kind: "activity",
                key: match category_name {
                    Some(category_name) => format!("{name}@{category_name}"),
                    None => name.to_string(),
                },
            })
    }

    async fn get_all(
        &self,
        category: Option<&Category>,
        search_term: Option<&str>,
    ) -> Result<Vec<Activity>, StoreError> {
        let mut query = format!("SELECT {ACTIVITY_COLUMNS} {ACTIVITY_FROM} WHERE a.deleted = 0");
        let mut params: Vec<Value> = Vec::new();
        if let Some(category) = category {
            query.push_str(&format!(" AND c.name = ?{}", params.len() + 1));
            params.push(Value::Text(category.name.clone()));
        }
        if let Some(term) = search_term {
            query.push_str(&format!(
                " AND a.name LIKE ?{} {LIKE_ESCAPE}",
                params.len() + 1
            ));
            params.push(Value::Text(like_pattern(term)));
        }
        query.push_str(" ORDER BY a.name");

        let connection = self.connection.lock().await;
        let mut statement = connection.prepare(&query).map_err(from_rusqlite)?;
        let activities = statement
            .query_map(rusqlite::params_from_iter(params), |row| {
                activity_from_row(row, 0)
            })
            .map_err(from_rusqlite)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;
        Ok(activities)
    }

    async fn remove(&self, activity: &Activity) -> Result<(), StoreError> {
        let pk = require_pk("activity", activity.pk)?;
        let connection = self.connection.lock().await;
        let referenced: i64 = connection
            .query_row(
                "SELECT COUNT(*) FROM facts WHERE activity_id = ?1",
                [pk],
                |row| row.get(0),
            )
            .map_err(from_rusqlite)?;

        let changed = if referenced > 0 {
            connection.execute("UPDATE activities SET deleted = 1 WHERE id = ?1", [pk])
        } else {
            connection.execute("DELETE FROM activities WHERE id = ?1", [pk])
        }
        .map_err(from_rusqlite)?;

        if changed == 0 {
            return Err(StoreError::NotFound {
                kind: "activity",
                key: pk.to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod sql_activity_manager_tests {
    use crate::modules::time_tracking::adapters::outbound::sql_store::SqlStore;
    use crate::modules::time_tracking::adapters::outbound::store::{Store, StoreError};
    use crate::modules::time_tracking::core::{activity::Activity, category::Category};
    use crate::tests::fixtures::config::in_memory_config;
    use crate::tests::fixtures::facts::{FactBuilder, START_TIME};
    use rstest::{fixture, rstest};

    #[fixture]
    fn store() -> SqlStore {
        SqlStore::new(&in_memory_config()).unwrap()
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_create_the_category_along_with_the_activity(store: SqlStore) {
        let saved = store
            .activities()
            .save(Activity::new("Coding", Some(Category::new("Work"))))
            .await
            .unwrap();
        assert!(saved.pk.is_some());
        assert!(saved.category.as_ref().unwrap().pk.is_some());
        assert_eq!(
            store.categories().get_by_name("Work").await.unwrap(),
            saved.category.clone().unwrap()
        );
        assert_eq!(store.activities().get(saved.pk.unwrap()).await.unwrap(), saved);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_find_an_activity_by_name_and_category(store: SqlStore) {
        let activities = store.activities();
        let work = Category::new("Work");
        let with_category = activities
            .save(Activity::new("Coding", Some(work.clone())))
            .await
            .unwrap();
        let without_category = activities.save(Activity::new("Coding", None)).await.unwrap();

        assert_eq!(
            activities.get_by_composite("Coding", Some(&work)).await.unwrap(),
            with_category
        );
        assert_eq!(
            activities.get_by_composite("Coding", None).await.unwrap(),
            without_category
        );
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_report_a_missing_composite(store: SqlStore) {
        let result = store
            .activities()
            .get_by_composite("Coding", Some(&Category::new("Work")))
            .await;
        assert_eq!(
            result,
            Err(StoreError::NotFound {
                kind: "activity",
                key: "Coding@Work".to_string()
            })
        );
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_filter_activities_by_category_and_search_term(store: SqlStore) {
        let activities = store.activities();
        let work = Category::new("Work");
        activities
            .save(Activity::new("Coding", Some(work.clone())))
            .await
            .unwrap();
        activities
            .save(Activity::new("Meeting", Some(work.clone())))
            .await
            .unwrap();
        activities
            .save(Activity::new("Cooking", Some(Category::new("Home"))))
            .await
            .unwrap();

        assert_eq!(activities.get_all(None, None).await.unwrap().len(), 3);
        assert_eq!(activities.get_all(Some(&work), None).await.unwrap().len(), 2);
        let found = activities.get_all(None, Some("Co")).await.unwrap();
        let names: Vec<&str> = found.iter().map(|activity| activity.name.as_str()).collect();
        assert_eq!(names, vec!["Coding", "Cooking"]);
        assert_eq!(
            activities.get_all(Some(&work), Some("Co")).await.unwrap().len(),
            1
        );
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_delete_an_unreferenced_activity(store: SqlStore) {
        let activities = store.activities();
        let saved = activities.save(Activity::new("Coding", None)).await.unwrap();
        activities.remove(&saved).await.unwrap();
        assert!(matches!(
            activities.get(saved.pk.unwrap()).await,
            Err(StoreError::NotFound { kind: "activity", .. })
        ));
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_flag_a_referenced_activity_as_deleted(store: SqlStore) {
        let fact = store.facts().save(FactBuilder::new().build()).await.unwrap();
        let activities = store.activities();
        activities.remove(&fact.activity).await.unwrap();

        let flagged = activities.get(fact.activity.pk.unwrap()).await.unwrap();
        assert!(flagged.deleted);
        assert!(activities.get_all(None, None).await.unwrap().is_empty());
        assert!(matches!(
            activities
                .get_by_composite("Coding", Some(&Category::new("Work")))
                .await,
            Err(StoreError::NotFound { kind: "activity", .. })
        ));
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_restore_a_flagged_activity_when_saved_again(store: SqlStore) {
        let fact = store.facts().save(FactBuilder::new().build()).await.unwrap();
        let activities = store.activities();
        activities.remove(&fact.activity).await.unwrap();

        let restored = activities
            .save(Activity::new("Coding", Some(Category::new("Work"))))
            .await
            .unwrap();
        assert_eq!(restored.pk, fact.activity.pk);
        assert!(!restored.deleted);
        assert_eq!(activities.get_all(None, None).await.unwrap(), vec![restored]);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_record_facts_on_a_flagged_activity(store: SqlStore) {
        let facts = store.facts();
        let first = facts.save(FactBuilder::new().build()).await.unwrap();
        store.activities().remove(&first.activity).await.unwrap();

        let second = facts
            .save(FactBuilder::new().start_time(START_TIME + 3_600_000).end_time(None).build())
            .await
            .unwrap();
        assert_eq!(second.activity.pk, first.activity.pk);
        assert!(!second.activity.deleted);
        assert_eq!(
            store.activities().get_all(None, None).await.unwrap(),
            vec![second.activity]
        );
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_match_wildcards_in_search_terms_literally(store: SqlStore) {
        let activities = store.activities();
        activities.save(Activity::new("Coding", None)).await.unwrap();
        let literal = activities.save(Activity::new("100%_done", None)).await.unwrap();

        assert_eq!(activities.get_all(None, Some("%")).await.unwrap(), vec![literal.clone()]);
        assert_eq!(activities.get_all(None, Some("_")).await.unwrap(), vec![literal]);
        assert!(activities.get_all(None, Some("C_d")).await.unwrap().is_empty());
    }
}
