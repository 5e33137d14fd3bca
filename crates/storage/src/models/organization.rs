use serde::{Deserialize, Serialize};

use crate::record::{Record, Row};
use crate::schema::Table;

/// A club or regional body. The id is the federation's own and is stable
/// across imports.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Organization {
    pub id: i64,
    pub fed_number: Option<String>,
    pub r#type: Option<String>,
    pub name: Option<String>,
    pub abbr: Option<String>,
    pub alias: Option<String>,
    pub location: Option<String>,
    pub federation: Option<String>,
    pub contact_person: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone1: Option<String>,
    pub contact_phone2: Option<String>,
}

impl Record for Organization {
    const TABLE: Table = Table::Organizations;

    fn id(&self) -> i64 {
        self.id
    }

    fn to_row(&self) -> Row {
        Row::new(self.id)
            .with("fed_number", self.fed_number.clone())
            .with("type", self.r#type.clone())
            .with("name", self.name.clone())
            .with("abbr", self.abbr.clone())
            .with("alias", self.alias.clone())
            .with("location", self.location.clone())
            .with("federation", self.federation.clone())
            .with("contact_person", self.contact_person.clone())
            .with("contact_email", self.contact_email.clone())
            .with("contact_phone1", self.contact_phone1.clone())
            .with("contact_phone2", self.contact_phone2.clone())
    }
}
