// Shared test fixture for Fact records.
// All timestamps use epoch milliseconds consistently.

use crate::modules::time_tracking::core::{activity::Activity, category::Category, fact::Fact};
use crate::shared::core::primitives::Millis;

pub const START_TIME: Millis = 1_700_000_000_000;
pub const END_TIME: Millis = 1_700_000_360_000;

pub struct FactBuilder {
    activity_name: String,
    category_name: Option<String>,
    start_time: Millis,
    end_time: Option<Millis>,
    description: Option<String>,
    tags: Vec<String>,
}

impl Default for FactBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(dead_code)]
impl FactBuilder {
    pub fn new() -> Self {
        Self {
            activity_name: "Coding".to_string(),
            category_name: Some("Work".to_string()),
            start_time: START_TIME,
            end_time: Some(END_TIME),
            description: None,
            tags: Vec::new(),
        }
    }

    pub fn activity_name(mut self, v: impl Into<String>) -> Self {
        self.activity_name = v.into();
        self
    }

    pub fn category_name(mut self, v: impl Into<String>) -> Self {
        self.category_name = Some(v.into());
        self
    }

    pub fn without_category(mut self) -> Self {
        self.category_name = None;
        self
    }

    pub fn start_time(mut self, v: Millis) -> Self {
        self.start_time = v;
        self
    }

    pub fn end_time(mut self, v: Option<Millis>) -> Self {
        self.end_time = v;
        self
    }

    pub fn description(mut self, v: impl Into<String>) -> Self {
        self.description = Some(v.into());
        self
    }

    pub fn tags(mut self, v: Vec<String>) -> Self {
        self.tags = v;
        self
    }

    pub fn build(self) -> Fact {
        let activity = Activity::new(self.activity_name, self.category_name.map(Category::new));
        Fact {
            description: self.description,
            tags: self.tags,
            ..Fact::new(activity, self.start_time, self.end_time)
        }
    }
}

#[cfg(test)]
mod fact_builder_tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn it_should_build_an_unsaved_fact_with_defaults() {
        let fact = FactBuilder::new().build();
        assert_eq!(fact.pk, None);
        assert_eq!(fact.activity.name, "Coding");
        assert_eq!(fact.activity.category_name(), Some("Work"));
        assert_eq!(fact.start_time, START_TIME);
        assert_eq!(fact.end_time, Some(END_TIME));
    }

    #[rstest]
    fn setters_override_the_defaults() {
        let fact = FactBuilder::new()
            .activity_name("Reading")
            .without_category()
            .start_time(1)
            .end_time(None)
            .description("desc")
            .tags(vec!["a".into()])
            .build();
        assert_eq!(fact.activity.name, "Reading");
        assert_eq!(fact.activity.category, None);
        assert_eq!(fact.start_time, 1);
        assert!(fact.is_ongoing());
        assert_eq!(fact.description.as_deref(), Some("desc"));
        assert_eq!(fact.tags, vec!["a"]);
    }
}
