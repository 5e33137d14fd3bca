use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::record::{Record, Row};
use crate::schema::Table;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Athlete {
    pub id: i64,
    pub lastname: Option<String>,
    pub firstname: Option<String>,
    pub birthdate: Option<NaiveDate>,
    /// External id used to query the athlete's result history.
    pub live_id: Option<String>,
    pub dossard: Option<String>,
    pub gender: Option<String>,
    pub nationality: Option<String>,
    pub organization_id: Option<i64>,
}

impl Record for Athlete {
    const TABLE: Table = Table::Athletes;

    fn id(&self) -> i64 {
        self.id
    }

    fn to_row(&self) -> Row {
        Row::new(self.id)
            .with("lastname", self.lastname.clone())
            .with("firstname", self.firstname.clone())
            .with("birthdate", self.birthdate)
            .with("live_id", self.live_id.clone())
            .with("dossard", self.dossard.clone())
            .with("gender", self.gender.clone())
            .with("nationality", self.nationality.clone())
            .with("organization_id", self.organization_id)
    }
}

/// The slice of an athlete the results stage needs.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct AthleteRef {
    pub id: i64,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub live_id: String,
}

impl AthleteRef {
    pub fn display_name(&self) -> String {
        match (&self.firstname, &self.lastname) {
            (Some(first), Some(last)) => format!("{} {}", first, last),
            (Some(name), None) | (None, Some(name)) => name.clone(),
            (None, None) => format!("athlete #{}", self.id),
        }
    }
}
