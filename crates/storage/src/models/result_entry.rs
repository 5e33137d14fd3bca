use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::record::{Record, Row};
use crate::schema::Table;
use crate::value::OpaquePayload;

/// One performance of one athlete, stored in the `results` table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultEntry {
    pub id: i64,
    pub event_number: Option<String>,
    pub name: Option<String>,
    pub abbr: Option<String>,
    pub r#type: Option<String>,
    pub date: Option<NaiveDate>,
    pub validation: Option<String>,
    pub xml_id: Option<String>,
    pub round: Option<OpaquePayload>,
    pub heat: Option<OpaquePayload>,
    pub result: Option<OpaquePayload>,
    pub event_category: Option<OpaquePayload>,
    pub athlete_category: Option<OpaquePayload>,
    pub event_id: Option<i64>,
    pub event_type_id: Option<i64>,
    pub category_id: Option<i64>,
}

impl Record for ResultEntry {
    const TABLE: Table = Table::Results;

    fn id(&self) -> i64 {
        self.id
    }

    fn to_row(&self) -> Row {
        Row::new(self.id)
            .with("event_number", self.event_number.clone())
            .with("name", self.name.clone())
            .with("abbr", self.abbr.clone())
            .with("type", self.r#type.clone())
            .with("date", self.date)
            .with("validation", self.validation.clone())
            .with("xml_id", self.xml_id.clone())
            .with("round", self.round.clone())
            .with("heat", self.heat.clone())
            .with("result", self.result.clone())
            .with("event_category", self.event_category.clone())
            .with("athlete_category", self.athlete_category.clone())
            .with("event_id", self.event_id)
            .with("event_type_id", self.event_type_id)
            .with("category_id", self.category_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_opaque_fields_become_opaque_values() {
        let entry = ResultEntry {
            id: 900,
            round: Some(OpaquePayload::new(json!({"name": "Final"}))),
            ..Default::default()
        };
        let row = entry.to_row();

        assert!(matches!(
            row.get("round"),
            Some(crate::value::SqlValue::Opaque(_))
        ));
        assert!(!row.is_set("heat"));
        assert!(!row.is_set("category_id"));
    }

    #[test]
    fn test_row_columns_exist_in_schema() {
        let entry = ResultEntry {
            id: 1,
            name: Some("60m".to_string()),
            event_id: Some(4),
            event_type_id: Some(5),
            category_id: Some(6),
            ..Default::default()
        };
        for column in entry.to_row().columns() {
            assert!(Table::Results.has_column(column), "unknown column {}", column);
        }
    }
}
