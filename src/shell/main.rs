use hamsterlib::shared::core::primitives::{now_millis, to_datetime};
use hamsterlib::shared::infrastructure::logging::TracingLogger;
use hamsterlib::shell::config::{HamsterConfig, STORE_KEY};
use hamsterlib::shell::control::HamsterControl;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, fmt};

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let mut config = HamsterConfig::from_env();
    if config.store().is_none() {
        config.insert(STORE_KEY, "sqlalchemy");
    }

    let control = HamsterControl::with_logger(config, Arc::new(TracingLogger::new()))?;
    tracing::info!(
        store = control.backend().verbose_name,
        db_path = control.config().db_path(),
        "hamster controller ready"
    );

    let now = now_millis();
    let categories = control.categories().get_all().await?;
    let activities = control.activities().get_all(None, None).await?;
    let facts = control.facts().get_all(Some(now - DAY_MS), Some(now), None).await?;
    tracing::info!(
        categories = categories.len(),
        activities = activities.len(),
        facts_last_day = facts.len(),
        "collections loaded"
    );

    for fact in facts {
        let started = to_datetime(fact.start_time)
            .map(|datetime| datetime.to_rfc3339())
            .unwrap_or_default();
        let minutes = fact
            .duration()
            .map(|duration| duration.num_minutes())
            .unwrap_or_else(|| (now - fact.start_time) / 60_000);
        tracing::info!(
            activity = %fact.activity.name,
            category = fact.activity.category_name().unwrap_or("-"),
            started = %started,
            minutes,
            "fact"
        );
    }
    Ok(())
}
