use serde::{Deserialize, Serialize};

use crate::record::{Record, Row};
use crate::schema::Table;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub federation: Option<String>,
    pub name: Option<String>,
    pub abbr: Option<String>,
    pub age_min: Option<i32>,
    pub age_max: Option<i32>,
    pub change_min: Option<String>,
    pub change_max: Option<String>,
    pub gender: Option<String>,
    pub national_code: Option<String>,
    pub sort_order: Option<i32>,
    /// Parent category.
    pub category_id: Option<i64>,
    pub fedinside_label: Option<String>,
}

impl Record for Category {
    const TABLE: Table = Table::Categories;

    fn id(&self) -> i64 {
        self.id
    }

    fn to_row(&self) -> Row {
        Row::new(self.id)
            .with("federation", self.federation.clone())
            .with("name", self.name.clone())
            .with("abbr", self.abbr.clone())
            .with("age_min", self.age_min)
            .with("age_max", self.age_max)
            .with("change_min", self.change_min.clone())
            .with("change_max", self.change_max.clone())
            .with("gender", self.gender.clone())
            .with("national_code", self.national_code.clone())
            .with("sort_order", self.sort_order)
            .with("category_id", self.category_id)
            .with("fedinside_label", self.fedinside_label.clone())
    }
}
