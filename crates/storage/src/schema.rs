use std::fmt;

/// Destination tables. Column lists mirror the initial migration; `id` is
/// always the first column and the conflict target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Table {
    Organizations,
    Athletes,
    Categories,
    Events,
    EventTypes,
    Results,
}

impl Table {
    pub const ALL: [Table; 6] = [
        Table::Organizations,
        Table::Athletes,
        Table::Categories,
        Table::Events,
        Table::EventTypes,
        Table::Results,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Organizations => "organizations",
            Self::Athletes => "athletes",
            Self::Categories => "categories",
            Self::Events => "events",
            Self::EventTypes => "event_types",
            Self::Results => "results",
        }
    }

    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            Self::Organizations => &[
                "id",
                "fed_number",
                "type",
                "name",
                "abbr",
                "alias",
                "location",
                "federation",
                "contact_person",
                "contact_email",
                "contact_phone1",
                "contact_phone2",
            ],
            Self::Athletes => &[
                "id",
                "lastname",
                "firstname",
                "birthdate",
                "live_id",
                "dossard",
                "gender",
                "nationality",
                "organization_id",
            ],
            Self::Categories => &[
                "id",
                "federation",
                "name",
                "abbr",
                "age_min",
                "age_max",
                "change_min",
                "change_max",
                "gender",
                "national_code",
                "sort_order",
                "category_id",
                "fedinside_label",
            ],
            Self::Events => &[
                "id",
                "event_number",
                "name",
                "date_start",
                "date_end",
                "start_time",
                "championship",
                "season",
                "facility",
                "responsible",
                "responsible2",
                "type",
                "chrono",
                "organization_id",
            ],
            Self::EventTypes => &[
                "id",
                "venue",
                "distance",
                "wind_mode",
                "wind_time",
                "precision",
                "handtime_diff",
                "nb_athletes",
                "implement",
                "hurdles_nb",
                "hurdles_first",
                "hurdles_interval",
                "hurdles_last",
                "abbr",
                "name_fr",
                "name_nl",
                "name_de",
                "name_en",
                "low2high",
                "national_code",
                "sort_order",
                "type_id",
                "result_type",
                "discipline_group",
            ],
            Self::Results => &[
                "id",
                "event_number",
                "name",
                "abbr",
                "type",
                "date",
                "validation",
                "xml_id",
                "round",
                "heat",
                "result",
                "event_category",
                "athlete_category",
                "event_id",
                "event_type_id",
                "category_id",
            ],
        }
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns().contains(&column)
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
