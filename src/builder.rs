//! Single-pass construction of the project model from the raw document.

use crate::container::{RawProject, RawRangeProperty};
use crate::error::ConvertError;
use crate::model::{Entity, Event, Model};
use crate::timespan;
use std::collections::HashMap;

/// Characters that must not appear in a document title or link target.
const FORBIDDEN_CHARACTERS: &[char] = &['\\', '/', ':', '*', '?', '"', '<', '>', '|'];

/// Build the in-memory model from the parsed project document.
///
/// One pass, fail-fast: a missing required section or entity field aborts the
/// build before anything is written. Incomplete relationship entries, empty
/// property values, and out-of-range dates are dropped locally instead.
pub fn build(document: RawProject) -> Result<Model, ConvertError> {
    let missing = |section: &'static str| ConvertError::MalformedProject { section };

    let template = document.template.ok_or_else(|| missing("template"))?;
    let types = template.types.ok_or_else(|| missing("template.types"))?;
    let properties = template
        .properties
        .ok_or_else(|| missing("template.properties"))?;
    let range_properties = template
        .range_properties
        .ok_or_else(|| missing("template.rangeProperties"))?;
    let entities = document.entities.ok_or_else(|| missing("entities"))?;
    let events = document.events.ok_or_else(|| missing("events"))?;

    let date_guid = find_date_property(&range_properties)?;

    let mut model = Model::default();
    let mut labels = LabelTable::default();

    for raw in &types {
        let (Some(guid), Some(name)) = (&raw.guid, &raw.name) else {
            continue;
        };
        model.types.insert(guid.clone(), name.clone());
        model.entities_by_type.insert(guid.clone(), Vec::new());
        let title = labels.claim(format!("_{}", strip_title(name)));
        model.labels.insert(guid.clone(), title);
        for role in raw.roles.iter().flatten() {
            if let (Some(role_guid), Some(role_name)) = (&role.guid, &role.name) {
                model.roles.insert(role_guid.clone(), role_name.clone());
            }
        }
    }

    for raw in &properties {
        if let (Some(guid), Some(name)) = (&raw.guid, &raw.name) {
            model.properties.insert(guid.clone(), name.clone());
        }
    }

    for raw in entities {
        let id = raw
            .guid
            .ok_or_else(|| malformed_entity("<unknown>", "missing required field 'guid'"))?;
        let name = raw
            .name
            .ok_or_else(|| malformed_entity(&id, "missing required field 'name'"))?;
        let entity_type = raw
            .entity_type
            .ok_or_else(|| malformed_entity(&id, "missing required field 'entityType'"))?;
        let notes = raw
            .notes
            .ok_or_else(|| malformed_entity(&id, "missing required field 'notes'"))?;

        let bucket = model.entities_by_type.get_mut(&entity_type).ok_or_else(|| {
            malformed_entity(&id, &format!("references undeclared type '{entity_type}'"))
        })?;
        bucket.push(id.clone());

        let title = labels.claim(strip_title(&name));
        model.labels.insert(id.clone(), title);
        model.entities.insert(
            id,
            Entity {
                name,
                entity_type,
                notes,
            },
        );
    }

    for raw in events {
        let id = raw.guid.ok_or_else(|| ConvertError::MalformedEvent {
            id: "<unknown>".to_string(),
            detail: "missing required field 'guid'".to_string(),
        })?;
        let title = raw
            .title
            .ok_or_else(|| ConvertError::MalformedEvent {
                id: id.clone(),
                detail: "missing required field 'title'".to_string(),
            })?
            .trim()
            .to_string();

        let moment = raw
            .range_values
            .iter()
            .flatten()
            .find(|value| value.range_property.as_deref() == Some(date_guid.as_str()))
            .and_then(|value| {
                let timestamp = value.position.as_ref().and_then(|position| position.timestamp);
                timespan::decode(timestamp, &value.span.unwrap_or_default())
            });

        let mut event = Event {
            title,
            ..Event::default()
        };
        if let Some(moment) = moment {
            event.date = Some(moment.date);
            event.time = Some(moment.time);
            event.lasts_days = Some(moment.lasts_days);
            event.lasts_hours = Some(moment.lasts_hours);
            event.lasts_minutes = Some(moment.lasts_minutes);
        }
        for relationship in raw.relationships.into_iter().flatten() {
            if let (Some(role), Some(entity)) = (relationship.role, relationship.entity) {
                event.relationships.insert(role, entity);
            }
        }
        for value in raw.values.into_iter().flatten() {
            let Some(property) = value.property else {
                continue;
            };
            let Some(text) = value.value else { continue };
            let text = text.trim();
            if !text.is_empty() {
                event.values.insert(property, text.to_string());
            }
        }
        event.tags = raw
            .tags
            .unwrap_or_default()
            .iter()
            .map(|tag| tag.trim().to_string())
            .collect();

        let label = labels.claim(strip_title(&event.title));
        model.labels.insert(id.clone(), label);
        model.events.insert(id, event);
    }

    Ok(model)
}

fn malformed_entity(id: &str, detail: &str) -> ConvertError {
    ConvertError::MalformedEntity {
        id: id.to_string(),
        detail: detail.to_string(),
    }
}

/// The date definition is the range property whose calendar declares an "AD"
/// era. Without one, event timing cannot be decoded.
fn find_date_property(range_properties: &[RawRangeProperty]) -> Result<String, ConvertError> {
    for property in range_properties {
        if property.kind.as_deref() != Some("date") {
            continue;
        }
        let has_ad_era = property
            .calendar
            .iter()
            .flat_map(|calendar| calendar.eras.iter().flatten())
            .any(|era| era.name.as_deref() == Some("AD"));
        if has_ad_era {
            if let Some(guid) = &property.guid {
                return Ok(guid.clone());
            }
        }
    }
    Err(ConvertError::NoCalendar)
}

/// Remove characters that cannot appear in a file name.
fn strip_title(title: &str) -> String {
    title
        .chars()
        .filter(|character| !FORBIDDEN_CHARACTERS.contains(character))
        .collect()
}

/// Scoped collision table for display labels: the first claim of a text wins
/// it unchanged, later claims receive an `(n)` suffix starting at 1.
#[derive(Debug, Default)]
struct LabelTable {
    seen: HashMap<String, u32>,
}

impl LabelTable {
    fn claim(&mut self, text: String) -> String {
        let count = self.seen.entry(text.clone()).or_insert(0);
        let claimed = if *count == 0 {
            text.clone()
        } else {
            format!("{text}({count})")
        };
        *count += 1;
        claimed
    }
}
