// A fact records time spent on an activity.
//
// Timestamps
// - start_time and end_time are epoch milliseconds.
// - end_time None means the fact is still running.

use crate::modules::time_tracking::core::activity::Activity;
use crate::shared::core::primitives::Millis;
use chrono::Duration;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fact {
    pub pk: Option<i64>,
    pub activity: Activity,
    pub start_time: Millis,
    pub end_time: Option<Millis>,
    pub description: Option<String>,
    pub tags: Vec<String>,
}

impl Fact {
    pub fn new(activity: Activity, start_time: Millis, end_time: Option<Millis>) -> Self {
        Self {
            pk: None,
            activity,
            start_time,
            end_time,
            description: None,
            tags: Vec::new(),
        }
    }

    pub fn is_ongoing(&self) -> bool {
        self.end_time.is_none()
    }

    pub fn has_valid_interval(&self) -> bool {
        self.end_time.is_none_or(|end| end > self.start_time)
    }

    pub fn duration(&self) -> Option<Duration> {
        self.end_time
            .map(|end| Duration::milliseconds(end - self.start_time))
    }
}
