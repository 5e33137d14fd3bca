use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::record::{Record, Row};
use crate::schema::Table;

/// A discipline definition (e.g. 60m hurdles indoor) shared by many results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventType {
    pub id: i64,
    pub venue: Option<String>,
    pub distance: Option<Decimal>,
    pub wind_mode: Option<String>,
    pub wind_time: Option<Decimal>,
    pub precision: Option<i32>,
    pub handtime_diff: Option<Decimal>,
    /// Left unset when the source omits it; the column defaults to 1.
    pub nb_athletes: Option<i32>,
    pub implement: Option<String>,
    pub hurdles_nb: Option<i32>,
    pub hurdles_first: Option<Decimal>,
    pub hurdles_interval: Option<Decimal>,
    pub hurdles_last: Option<Decimal>,
    pub abbr: Option<String>,
    pub name_fr: Option<String>,
    pub name_nl: Option<String>,
    pub name_de: Option<String>,
    pub name_en: Option<String>,
    pub low2high: Option<bool>,
    pub national_code: Option<String>,
    pub sort_order: Option<i32>,
    pub type_id: Option<i64>,
    pub result_type: Option<String>,
    pub discipline_group: Option<String>,
}

impl Record for EventType {
    const TABLE: Table = Table::EventTypes;

    fn id(&self) -> i64 {
        self.id
    }

    fn to_row(&self) -> Row {
        Row::new(self.id)
            .with("venue", self.venue.clone())
            .with("distance", self.distance)
            .with("wind_mode", self.wind_mode.clone())
            .with("wind_time", self.wind_time)
            .with("precision", self.precision)
            .with("handtime_diff", self.handtime_diff)
            .with("nb_athletes", self.nb_athletes)
            .with("implement", self.implement.clone())
            .with("hurdles_nb", self.hurdles_nb)
            .with("hurdles_first", self.hurdles_first)
            .with("hurdles_interval", self.hurdles_interval)
            .with("hurdles_last", self.hurdles_last)
            .with("abbr", self.abbr.clone())
            .with("name_fr", self.name_fr.clone())
            .with("name_nl", self.name_nl.clone())
            .with("name_de", self.name_de.clone())
            .with("name_en", self.name_en.clone())
            .with("low2high", self.low2high)
            .with("national_code", self.national_code.clone())
            .with("sort_order", self.sort_order)
            .with("type_id", self.type_id)
            .with("result_type", self.result_type.clone())
            .with("discipline_group", self.discipline_group.clone())
    }
}
