use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use storage::OpaquePayload;

use super::de;

#[derive(Debug, Deserialize, Clone)]
pub struct TokenResponse {
    pub access_token: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RemoteOrganization {
    #[serde(deserialize_with = "de::id")]
    pub id: i64,
    #[serde(default, deserialize_with = "de::text")]
    pub fed_number: Option<String>,
    #[serde(default, rename = "type", deserialize_with = "de::text")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "de::text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "de::text")]
    pub abbr: Option<String>,
    #[serde(default, deserialize_with = "de::text")]
    pub alias: Option<String>,
    #[serde(default, deserialize_with = "de::text")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "de::text")]
    pub federation: Option<String>,
    #[serde(default, deserialize_with = "de::text")]
    pub contact_person: Option<String>,
    #[serde(default, deserialize_with = "de::text")]
    pub contact_email: Option<String>,
    #[serde(default, deserialize_with = "de::text")]
    pub contact_phone1: Option<String>,
    #[serde(default, deserialize_with = "de::text")]
    pub contact_phone2: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RemoteAthlete {
    #[serde(deserialize_with = "de::id")]
    pub id: i64,
    #[serde(default, deserialize_with = "de::text")]
    pub lastname: Option<String>,
    #[serde(default, deserialize_with = "de::text")]
    pub firstname: Option<String>,
    #[serde(default, deserialize_with = "de::date")]
    pub birthdate: Option<NaiveDate>,
    #[serde(default, rename = "liveId", deserialize_with = "de::key")]
    pub live_id: Option<String>,
    #[serde(default, deserialize_with = "de::text")]
    pub dossard: Option<String>,
    #[serde(default, deserialize_with = "de::text")]
    pub gender: Option<String>,
    #[serde(default, deserialize_with = "de::text")]
    pub nationality: Option<String>,
    #[serde(default, rename = "organizationId", deserialize_with = "de::integer")]
    pub organization_id: Option<i64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RemoteCategory {
    #[serde(deserialize_with = "de::id")]
    pub id: i64,
    #[serde(default, deserialize_with = "de::text")]
    pub federation: Option<String>,
    #[serde(default, deserialize_with = "de::text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "de::text")]
    pub abbr: Option<String>,
    #[serde(default, rename = "ageMin", deserialize_with = "de::integer")]
    pub age_min: Option<i32>,
    #[serde(default, rename = "ageMax", deserialize_with = "de::integer")]
    pub age_max: Option<i32>,
    #[serde(default, rename = "changeMin", deserialize_with = "de::text")]
    pub change_min: Option<String>,
    #[serde(default, rename = "changeMax", deserialize_with = "de::text")]
    pub change_max: Option<String>,
    #[serde(default, deserialize_with = "de::text")]
    pub gender: Option<String>,
    #[serde(default, rename = "nationalCode", deserialize_with = "de::text")]
    pub national_code: Option<String>,
    #[serde(default, rename = "sortOrder", deserialize_with = "de::integer")]
    pub sort_order: Option<i32>,
    #[serde(default, rename = "categoryId", deserialize_with = "de::integer")]
    pub category_id: Option<i64>,
    #[serde(default, rename = "fedinsidelabel", deserialize_with = "de::text")]
    pub fedinside_label: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RemoteEvent {
    #[serde(deserialize_with = "de::id")]
    pub id: i64,
    #[serde(default, rename = "eventNumber", deserialize_with = "de::text")]
    pub event_number: Option<String>,
    #[serde(default, deserialize_with = "de::text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "de::date")]
    pub date_start: Option<NaiveDate>,
    #[serde(default, deserialize_with = "de::date")]
    pub date_end: Option<NaiveDate>,
    #[serde(default, deserialize_with = "de::text")]
    pub start_time: Option<String>,
    #[serde(default, deserialize_with = "de::boolean")]
    pub championship: Option<bool>,
    #[serde(default, deserialize_with = "de::text")]
    pub season: Option<String>,
    #[serde(default, deserialize_with = "de::payload")]
    pub facility: Option<OpaquePayload>,
    #[serde(default, deserialize_with = "de::payload")]
    pub responsible: Option<OpaquePayload>,
    #[serde(default, deserialize_with = "de::payload")]
    pub responsible2: Option<OpaquePayload>,
    #[serde(default, rename = "type", deserialize_with = "de::text")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "de::text")]
    pub chrono: Option<String>,
    #[serde(default, rename = "organizationId", deserialize_with = "de::integer")]
    pub organization_id: Option<i64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RemoteEventType {
    #[serde(deserialize_with = "de::id")]
    pub id: i64,
    #[serde(default, deserialize_with = "de::text")]
    pub venue: Option<String>,
    #[serde(default, deserialize_with = "de::decimal")]
    pub distance: Option<Decimal>,
    #[serde(default, deserialize_with = "de::text")]
    pub wind_mode: Option<String>,
    #[serde(default, deserialize_with = "de::decimal")]
    pub wind_time: Option<Decimal>,
    #[serde(default, deserialize_with = "de::integer")]
    pub precision: Option<i32>,
    #[serde(default, deserialize_with = "de::decimal")]
    pub handtime_diff: Option<Decimal>,
    #[serde(default, deserialize_with = "de::integer")]
    pub nb_athletes: Option<i32>,
    #[serde(default, deserialize_with = "de::text")]
    pub implement: Option<String>,
    #[serde(default, deserialize_with = "de::integer")]
    pub hurdles_nb: Option<i32>,
    #[serde(default, deserialize_with = "de::decimal")]
    pub hurdles_first: Option<Decimal>,
    #[serde(default, deserialize_with = "de::decimal")]
    pub hurdles_interval: Option<Decimal>,
    #[serde(default, deserialize_with = "de::decimal")]
    pub hurdles_last: Option<Decimal>,
    #[serde(default, deserialize_with = "de::text")]
    pub abbr: Option<String>,
    #[serde(default, deserialize_with = "de::text")]
    pub name_fr: Option<String>,
    #[serde(default, deserialize_with = "de::text")]
    pub name_nl: Option<String>,
    #[serde(default, deserialize_with = "de::text")]
    pub name_de: Option<String>,
    #[serde(default, deserialize_with = "de::text")]
    pub name_en: Option<String>,
    #[serde(default, deserialize_with = "de::boolean")]
    pub low2high: Option<bool>,
    #[serde(default, deserialize_with = "de::text")]
    pub national_code: Option<String>,
    #[serde(default, deserialize_with = "de::integer")]
    pub sort_order: Option<i32>,
    #[serde(default, deserialize_with = "de::integer")]
    pub type_id: Option<i64>,
    #[serde(default, deserialize_with = "de::text")]
    pub result_type: Option<String>,
    #[serde(default, deserialize_with = "de::text")]
    pub discipline_group: Option<String>,
}

/// Any nested object of which only the id matters.
#[derive(Debug, Deserialize, Clone)]
pub struct NestedRef {
    #[serde(default, deserialize_with = "de::integer")]
    pub id: Option<i64>,
}

/// One entry of an athlete's result history, with its event and event type
/// optionally embedded.
#[derive(Debug, Deserialize, Clone)]
pub struct RemoteResult {
    #[serde(deserialize_with = "de::id")]
    pub id: i64,
    #[serde(default, rename = "eventNumber", deserialize_with = "de::text")]
    pub event_number: Option<String>,
    #[serde(default, deserialize_with = "de::text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "de::text")]
    pub abbr: Option<String>,
    #[serde(default, rename = "type", deserialize_with = "de::text")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "de::date")]
    pub date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "de::text")]
    pub validation: Option<String>,
    #[serde(default, rename = "xmlId", deserialize_with = "de::text")]
    pub xml_id: Option<String>,
    #[serde(default, deserialize_with = "de::payload")]
    pub round: Option<OpaquePayload>,
    #[serde(default, deserialize_with = "de::payload")]
    pub heat: Option<OpaquePayload>,
    #[serde(default, deserialize_with = "de::payload")]
    pub result: Option<OpaquePayload>,
    #[serde(default, rename = "eventCategory", deserialize_with = "de::payload")]
    pub event_category: Option<OpaquePayload>,
    #[serde(default, rename = "athleteCategory", deserialize_with = "de::payload")]
    pub athlete_category: Option<OpaquePayload>,
    #[serde(default)]
    pub event: Option<RemoteEvent>,
    #[serde(default, rename = "eventType")]
    pub event_type: Option<RemoteEventType>,
    #[serde(default)]
    pub category: Option<NestedRef>,
    #[serde(default, rename = "eventId", deserialize_with = "de::integer")]
    pub event_id: Option<i64>,
    #[serde(default, rename = "eventTypeId", deserialize_with = "de::integer")]
    pub event_type_id: Option<i64>,
    #[serde(default, rename = "categoryId", deserialize_with = "de::integer")]
    pub category_id: Option<i64>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AthleteResults {
    #[serde(default)]
    pub results: Vec<RemoteResult>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SearchAthlete {
    #[serde(flatten)]
    pub athlete: RemoteAthlete,
    #[serde(default)]
    pub organization: Option<RemoteOrganization>,
}

/// Response of the public search endpoint for one letter prefix.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct SearchPartition {
    #[serde(default)]
    pub athletes: Vec<SearchAthlete>,
    #[serde(default)]
    pub events: Vec<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_result_with_nested_event_and_type() {
        let raw = json!({
            "id": 5001,
            "eventNumber": "E-12",
            "date": "2024-06-01T00:00:00.000Z",
            "round": {"name": "Final"},
            "result": null,
            "event": {"id": 77, "name": "Memorial Van Damme", "facility": {"name": "KBS"}},
            "eventType": {"id": 3, "distance": 100, "nb_athletes": null},
            "category": {"id": 9}
        });
        let parsed: RemoteResult = serde_json::from_value(raw).unwrap();

        assert_eq!(parsed.event.as_ref().map(|e| e.id), Some(77));
        assert!(parsed.event.as_ref().unwrap().facility.is_some());
        assert_eq!(parsed.event_type.as_ref().unwrap().distance, Some(Decimal::from(100)));
        assert!(parsed.event_type.as_ref().unwrap().nb_athletes.is_none());
        assert_eq!(parsed.category.as_ref().and_then(|c| c.id), Some(9));
        assert!(parsed.result.is_none());
        assert!(parsed.category_id.is_none());
    }

    #[test]
    fn test_athlete_results_without_results_key() {
        let parsed: AthleteResults = serde_json::from_value(json!({})).unwrap();
        assert!(parsed.results.is_empty());
    }

    #[test]
    fn test_search_athlete_with_embedded_organization() {
        let raw = json!({
            "athletes": [
                {
                    "id": 10,
                    "firstname": "Ann",
                    "liveId": 123456,
                    "organizationId": 4,
                    "organization": {"id": 4, "name": "Club A", "type": "club"}
                },
                {"id": 11, "firstname": "Bob", "liveId": "", "organization": null}
            ],
            "events": []
        });
        let parsed: SearchPartition = serde_json::from_value(raw).unwrap();

        assert_eq!(parsed.athletes.len(), 2);
        assert_eq!(parsed.athletes[0].athlete.live_id.as_deref(), Some("123456"));
        assert_eq!(
            parsed.athletes[0].organization.as_ref().and_then(|o| o.kind.as_deref()),
            Some("club")
        );
        assert!(parsed.athletes[1].organization.is_none());
        assert!(parsed.athletes[1].athlete.live_id.is_none());
    }
}
