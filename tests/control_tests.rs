// End to end tests for building a controller from configuration.
//
// Responsibilities
// - Exercise the public API only: configuration in, controller and collections out.

use hamsterlib::modules::time_tracking::core::{activity::Activity, category::Category, fact::Fact};
use hamsterlib::shell::config::STORE_KEY;
use hamsterlib::shell::control::INVALID_STORAGE_MESSAGE;
use hamsterlib::{ControlError, HamsterConfig, HamsterControl};
use rstest::{fixture, rstest};
use serde_json::json;

#[fixture]
fn sql_config() -> HamsterConfig {
    serde_json::from_value(json!({ "store": "sqlalchemy" })).unwrap()
}

#[rstest]
#[case(json!({}))]
#[case(json!({ "store": "nonexistent" }))]
#[case(json!({ "store": null }))]
fn it_should_reject_configurations_without_a_registered_store(#[case] raw: serde_json::Value) {
    let config: HamsterConfig = serde_json::from_value(raw).unwrap();
    let error = HamsterControl::new(config).unwrap_err();
    assert!(matches!(error, ControlError::Configuration(_)));
    assert!(error.to_string().contains(INVALID_STORAGE_MESSAGE));
    assert!(error.to_string().to_lowercase().contains("invalid storage"));
}

#[cfg(feature = "sql")]
#[rstest]
fn it_should_resolve_equivalent_configurations_to_the_same_backend(sql_config: HamsterConfig) {
    let first = HamsterControl::new(sql_config.clone()).unwrap();
    let second = HamsterControl::new(sql_config).unwrap();
    assert!(std::ptr::eq(first.backend(), second.backend()));
    assert_eq!(first.config().store(), Some("sqlalchemy"));
}

#[cfg(feature = "sql")]
#[rstest]
#[tokio::test]
async fn it_should_share_records_between_controller_and_store_collections(
    sql_config: HamsterConfig,
) {
    let control = HamsterControl::new(sql_config).unwrap();
    let activity = Activity::new("Coding", Some(Category::new("Work")));
    let saved = control
        .facts()
        .save(Fact::new(activity, 1_700_000_000_000, Some(1_700_000_360_000)))
        .await
        .unwrap();

    let via_store = control.store().facts().get(saved.pk.unwrap()).await.unwrap();
    assert_eq!(via_store, saved);
    let categories = control.categories().get_all().await.unwrap();
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0].name, "Work");
    assert_eq!(
        control
            .activities()
            .get_by_composite("Coding", Some(&categories[0]))
            .await
            .unwrap(),
        saved.activity
    );
}

#[cfg(feature = "sql")]
#[rstest]
fn it_should_keep_separate_stores_per_controller(sql_config: HamsterConfig) {
    let first = HamsterControl::new(sql_config.clone()).unwrap();
    let second = HamsterControl::new(sql_config.with(STORE_KEY, "sqlalchemy")).unwrap();
    assert!(!std::sync::Arc::ptr_eq(first.store(), second.store()));
}

#[cfg(not(feature = "sql"))]
#[rstest]
fn it_should_report_an_unresolvable_backend(sql_config: HamsterConfig) {
    let error = HamsterControl::new(sql_config).unwrap_err();
    assert!(matches!(error, ControlError::BackendResolution { .. }));
}
