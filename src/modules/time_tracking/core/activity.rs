use crate::modules::time_tracking::core::category::Category;

// An activity is unique by (name, category). Activities still referenced by
// facts are flagged `deleted` rather than removed.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Activity {
    pub pk: Option<i64>,
    pub name: String,
    pub category: Option<Category>,
    pub deleted: bool,
}

impl Activity {
    pub fn new(name: impl Into<String>, category: Option<Category>) -> Self {
        Self {
            pk: None,
            name: name.into(),
            category,
            deleted: false,
        }
    }

    pub fn with_pk(mut self, pk: i64) -> Self {
        self.pk = Some(pk);
        self
    }

    pub fn category_name(&self) -> Option<&str> {
        self.category.as_ref().map(|category| category.name.as_str())
    }
}
