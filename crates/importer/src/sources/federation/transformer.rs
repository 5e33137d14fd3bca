use storage::models::{Athlete, Category, Event, EventType, Organization, ResultEntry};

use super::models::{
    RemoteAthlete, RemoteCategory, RemoteEvent, RemoteEventType, RemoteOrganization, RemoteResult,
    SearchAthlete,
};

impl From<RemoteOrganization> for Organization {
    fn from(org: RemoteOrganization) -> Self {
        Self {
            id: org.id,
            fed_number: org.fed_number,
            r#type: org.kind,
            name: org.name,
            abbr: org.abbr,
            alias: org.alias,
            location: org.location,
            federation: org.federation,
            contact_person: org.contact_person,
            contact_email: org.contact_email,
            contact_phone1: org.contact_phone1,
            contact_phone2: org.contact_phone2,
        }
    }
}

impl From<RemoteAthlete> for Athlete {
    fn from(athlete: RemoteAthlete) -> Self {
        Self {
            id: athlete.id,
            lastname: athlete.lastname,
            firstname: athlete.firstname,
            birthdate: athlete.birthdate,
            live_id: athlete.live_id,
            dossard: athlete.dossard,
            gender: athlete.gender,
            nationality: athlete.nationality,
            organization_id: athlete.organization_id,
        }
    }
}

impl From<RemoteCategory> for Category {
    fn from(category: RemoteCategory) -> Self {
        Self {
            id: category.id,
            federation: category.federation,
            name: category.name,
            abbr: category.abbr,
            age_min: category.age_min,
            age_max: category.age_max,
            change_min: category.change_min,
            change_max: category.change_max,
            gender: category.gender,
            national_code: category.national_code,
            sort_order: category.sort_order,
            category_id: category.category_id,
            fedinside_label: category.fedinside_label,
        }
    }
}

impl From<RemoteEvent> for Event {
    fn from(event: RemoteEvent) -> Self {
        Self {
            id: event.id,
            event_number: event.event_number,
            name: event.name,
            date_start: event.date_start,
            date_end: event.date_end,
            start_time: event.start_time,
            championship: event.championship,
            season: event.season,
            facility: event.facility,
            responsible: event.responsible,
            responsible2: event.responsible2,
            r#type: event.kind,
            chrono: event.chrono,
            organization_id: event.organization_id,
        }
    }
}

impl From<RemoteEventType> for EventType {
    fn from(event_type: RemoteEventType) -> Self {
        Self {
            id: event_type.id,
            venue: event_type.venue,
            distance: event_type.distance,
            wind_mode: event_type.wind_mode,
            wind_time: event_type.wind_time,
            precision: event_type.precision,
            handtime_diff: event_type.handtime_diff,
            nb_athletes: event_type.nb_athletes,
            implement: event_type.implement,
            hurdles_nb: event_type.hurdles_nb,
            hurdles_first: event_type.hurdles_first,
            hurdles_interval: event_type.hurdles_interval,
            hurdles_last: event_type.hurdles_last,
            abbr: event_type.abbr,
            name_fr: event_type.name_fr,
            name_nl: event_type.name_nl,
            name_de: event_type.name_de,
            name_en: event_type.name_en,
            low2high: event_type.low2high,
            national_code: event_type.national_code,
            sort_order: event_type.sort_order,
            type_id: event_type.type_id,
            result_type: event_type.result_type,
            discipline_group: event_type.discipline_group,
        }
    }
}

impl From<&RemoteResult> for ResultEntry {
    /// Foreign keys prefer the flat `*Id` field and fall back to the id of
    /// the embedded object.
    fn from(result: &RemoteResult) -> Self {
        Self {
            id: result.id,
            event_number: result.event_number.clone(),
            name: result.name.clone(),
            abbr: result.abbr.clone(),
            r#type: result.kind.clone(),
            date: result.date,
            validation: result.validation.clone(),
            xml_id: result.xml_id.clone(),
            round: result.round.clone(),
            heat: result.heat.clone(),
            result: result.result.clone(),
            event_category: result.event_category.clone(),
            athlete_category: result.athlete_category.clone(),
            event_id: result
                .event_id
                .or_else(|| result.event.as_ref().map(|e| e.id)),
            event_type_id: result
                .event_type_id
                .or_else(|| result.event_type.as_ref().map(|t| t.id)),
            category_id: result
                .category_id
                .or_else(|| result.category.as_ref().and_then(|c| c.id)),
        }
    }
}

/// An athlete's result history split into the three tables it feeds.
#[derive(Debug, Default)]
pub struct ResultBundle {
    pub events: Vec<Event>,
    pub event_types: Vec<EventType>,
    pub results: Vec<ResultEntry>,
}

impl ResultBundle {
    pub fn from_results(results: Vec<RemoteResult>) -> Self {
        let entries = results.iter().map(ResultEntry::from).collect();

        let mut bundle = Self {
            results: entries,
            ..Default::default()
        };
        for result in results {
            if let Some(event) = result.event {
                bundle.events.push(event.into());
            }
            if let Some(event_type) = result.event_type {
                bundle.event_types.push(event_type.into());
            }
        }

        bundle
    }
}

/// Splits one search chunk into its embedded organizations and the athletes.
pub fn split_search_chunk(chunk: &[SearchAthlete]) -> (Vec<Organization>, Vec<Athlete>) {
    let organizations = chunk
        .iter()
        .filter_map(|entry| entry.organization.clone())
        .map(Organization::from)
        .collect();
    let athletes = chunk
        .iter()
        .map(|entry| Athlete::from(entry.athlete.clone()))
        .collect();

    (organizations, athletes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn remote_result(value: serde_json::Value) -> RemoteResult {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_category_falls_back_to_nested_id() {
        let entry = ResultEntry::from(&remote_result(json!({"id": 1, "category": {"id": 31}})));
        assert_eq!(entry.category_id, Some(31));
    }

    #[test]
    fn test_flat_ids_win_over_nested_ids() {
        let entry = ResultEntry::from(&remote_result(json!({
            "id": 1,
            "categoryId": 30,
            "category": {"id": 31},
            "eventTypeId": 40,
            "eventType": {"id": 41},
            "eventId": 50,
            "event": {"id": 51}
        })));

        assert_eq!(entry.category_id, Some(30));
        assert_eq!(entry.event_type_id, Some(40));
        assert_eq!(entry.event_id, Some(50));
    }

    #[test]
    fn test_missing_foreign_keys_stay_unset() {
        let entry = ResultEntry::from(&remote_result(json!({"id": 1, "name": "Long jump"})));

        assert!(entry.category_id.is_none());
        assert!(entry.event_id.is_none());
        assert!(entry.event_type_id.is_none());
    }

    #[test]
    fn test_bundle_only_collects_embedded_objects() {
        let results = vec![
            remote_result(json!({"id": 1, "event": {"id": 10}, "eventType": {"id": 20}})),
            remote_result(json!({"id": 2, "event": {"id": 11}})),
            remote_result(json!({"id": 3})),
        ];
        let bundle = ResultBundle::from_results(results);

        assert_eq!(bundle.results.len(), 3);
        assert_eq!(bundle.events.iter().map(|e| e.id).collect::<Vec<_>>(), vec![10, 11]);
        assert_eq!(bundle.event_types.iter().map(|t| t.id).collect::<Vec<_>>(), vec![20]);
        assert_eq!(bundle.results[1].event_id, Some(11));
    }

    #[test]
    fn test_split_search_chunk() {
        let chunk: Vec<SearchAthlete> = serde_json::from_value(json!([
            {"id": 1, "organization": {"id": 100, "name": "Club A"}},
            {"id": 2},
            {"id": 3, "organization": {"id": 100, "name": "Club A"}}
        ]))
        .unwrap();

        let (organizations, athletes) = split_search_chunk(&chunk);
        assert_eq!(organizations.len(), 2);
        assert_eq!(athletes.iter().map(|a| a.id).collect::<Vec<_>>(), vec![1, 2, 3]);
    }
}
