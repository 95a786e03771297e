//! Category Aggregate

use serde::{Deserialize, Serialize};
use validator::Validate;
use crate::domain::aggregates::product::not_blank;
use crate::domain::value_objects::CategoryId;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    id: CategoryId,
    name: String,
}

impl Category {
    pub fn new(id: CategoryId, name: impl Into<String>) -> Self { Self { id, name: name.into() } }
    pub fn id(&self) -> CategoryId { self.id }
    pub fn name(&self) -> &str { &self.name }
}

/// Body of `POST /categories` and `PUT /categories/{id}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Validate)]
pub struct CategoryDraft {
    #[validate(custom = "not_blank")]
    pub name: String,
}

impl CategoryDraft {
    pub fn new(name: impl AsRef<str>) -> Self { Self { name: name.as_ref().trim().to_string() } }
}
