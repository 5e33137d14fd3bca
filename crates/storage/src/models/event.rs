use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::record::{Record, Row};
use crate::schema::Table;
use crate::value::OpaquePayload;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: i64,
    pub event_number: Option<String>,
    pub name: Option<String>,
    pub date_start: Option<NaiveDate>,
    pub date_end: Option<NaiveDate>,
    pub start_time: Option<String>,
    pub championship: Option<bool>,
    pub season: Option<String>,
    pub facility: Option<OpaquePayload>,
    pub responsible: Option<OpaquePayload>,
    pub responsible2: Option<OpaquePayload>,
    pub r#type: Option<String>,
    pub chrono: Option<String>,
    pub organization_id: Option<i64>,
}

impl Record for Event {
    const TABLE: Table = Table::Events;

    fn id(&self) -> i64 {
        self.id
    }

    fn to_row(&self) -> Row {
        Row::new(self.id)
            .with("event_number", self.event_number.clone())
            .with("name", self.name.clone())
            .with("date_start", self.date_start)
            .with("date_end", self.date_end)
            .with("start_time", self.start_time.clone())
            .with("championship", self.championship)
            .with("season", self.season.clone())
            .with("facility", self.facility.clone())
            .with("responsible", self.responsible.clone())
            .with("responsible2", self.responsible2.clone())
            .with("type", self.r#type.clone())
            .with("chrono", self.chrono.clone())
            .with("organization_id", self.organization_id)
    }
}
