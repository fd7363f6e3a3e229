//! Rendering of the project model into a cross-linked document set.
//!
//! Every title and link target resolves through the model's label table, so
//! links always point at the file that will actually be emitted. Unresolved
//! references are skipped; ids found in relationships are looked up as
//! entities only.

use crate::model::{Event, Model};

/// A rendered document: path-safe title plus Markdown content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub title: String,
    pub content: String,
}

/// Render the whole document set in write order: main index, event index,
/// per-type indexes, entity documents, event documents.
pub fn render(model: &Model) -> Vec<Document> {
    let mut documents = Vec::new();
    documents.push(main_index(model));
    documents.push(event_index(model));
    for (type_id, entity_ids) in &model.entities_by_type {
        documents.push(type_index(model, type_id, entity_ids));
    }
    for (id, entity) in &model.entities {
        documents.push(Document {
            title: title_for(model, id),
            content: to_paragraphs(&entity.notes),
        });
    }
    for (id, event) in &model.events {
        documents.push(event_document(model, id, event));
    }
    documents
}

fn main_index(model: &Model) -> Document {
    let mut lines = vec!["- [[__events]]".to_string()];
    for type_id in model.entities_by_type.keys() {
        lines.push(format!("- [[{}]]", title_for(model, type_id)));
    }
    Document {
        title: "__index".to_string(),
        content: lines.join("\n"),
    }
}

fn event_index(model: &Model) -> Document {
    let lines: Vec<String> = model
        .events
        .keys()
        .map(|id| format!("- [[{}]]", title_for(model, id)))
        .collect();
    Document {
        title: "__events".to_string(),
        content: lines.join("\n"),
    }
}

fn type_index(model: &Model, type_id: &str, entity_ids: &[String]) -> Document {
    let lines: Vec<String> = entity_ids
        .iter()
        .map(|id| format!("- [[{}]]", title_for(model, id)))
        .collect();
    Document {
        title: title_for(model, type_id),
        content: lines.join("\n"),
    }
}

fn event_document(model: &Model, id: &str, event: &Event) -> Document {
    let mut blocks: Vec<String> = Vec::new();

    for (property_id, value) in &event.values {
        let Some(name) = model.properties.get(property_id) else {
            continue;
        };
        blocks.push(format!("## {name}\n\n{}", to_paragraphs(value)));
    }

    let mut relationship_lines = Vec::new();
    for (role_id, entity_id) in &event.relationships {
        let Some(role) = model.roles.get(role_id) else {
            continue;
        };
        // Relationship targets are entity ids by contract; anything else
        // (including an event id that happens to collide) is dropped.
        if !model.entities.contains_key(entity_id) {
            continue;
        }
        relationship_lines.push(format!("{role}: [[{}]]", title_for(model, entity_id)));
    }
    if !relationship_lines.is_empty() {
        blocks.push(relationship_lines.join("\n"));
    }

    if !event.tags.is_empty() {
        let tags: Vec<String> = event
            .tags
            .iter()
            .map(|tag| format!("#{}", tag.replace(' ', "_")))
            .collect();
        blocks.push(tags.join("\n"));
    }

    let mut stamp = Vec::new();
    if let Some(date) = &event.date {
        stamp.push(date.clone());
    }
    if let Some(time) = &event.time {
        stamp.push(time.clone());
    }
    if !stamp.is_empty() {
        blocks.push(stamp.join("\n"));
    }

    Document {
        title: title_for(model, id),
        content: blocks.join("\n\n"),
    }
}

fn title_for(model: &Model, id: &str) -> String {
    model
        .label(id)
        .map(str::to_string)
        .unwrap_or_else(|| id.to_string())
}

/// Single line breaks become paragraph breaks.
fn to_paragraphs(text: &str) -> String {
    text.replace('\n', "\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder;
    use crate::container::RawProject;
    use serde_json::json;

    fn model_for(value: serde_json::Value) -> Model {
        let project: RawProject = serde_json::from_value(value).unwrap();
        builder::build(project).unwrap()
    }

    fn sample_model() -> Model {
        model_for(json!({
            "template": {
                "types": [
                    {"guid": "t1", "name": "Character", "roles": [
                        {"guid": "r1", "name": "Protagonist"}
                    ]}
                ],
                "properties": [{"guid": "p1", "name": "Summary"}],
                "rangeProperties": [
                    {"guid": "rp1", "type": "date",
                     "calendar": {"eras": [{"name": "AD"}]}}
                ]
            },
            "entities": [
                {"guid": "e1", "name": "Alice", "entityType": "t1",
                 "notes": "First line\nSecond line"}
            ],
            "events": [{
                "guid": "ev1",
                "title": "Meeting",
                "rangeValues": [
                    {"rangeProperty": "rp1", "position": {"timestamp": 90000}}
                ],
                "relationships": [
                    {"role": "r1", "entity": "e1"},
                    {"role": "r1", "entity": "missing"}
                ],
                "values": [{"property": "p1", "value": "They meet."}],
                "tags": ["first meeting"]
            }]
        }))
    }

    fn find<'a>(documents: &'a [Document], title: &str) -> &'a Document {
        documents
            .iter()
            .find(|document| document.title == title)
            .unwrap_or_else(|| panic!("no document titled {title}"))
    }

    #[test]
    fn test_main_index_links_events_and_type_indexes() {
        let documents = render(&sample_model());
        assert_eq!(documents[0].title, "__index");
        assert_eq!(documents[0].content, "- [[__events]]\n- [[_Character]]");
    }

    #[test]
    fn test_event_index_links_every_event() {
        let documents = render(&sample_model());
        assert_eq!(find(&documents, "__events").content, "- [[Meeting]]");
    }

    #[test]
    fn test_type_index_links_entities_in_order() {
        let documents = render(&sample_model());
        assert_eq!(find(&documents, "_Character").content, "- [[Alice]]");
    }

    #[test]
    fn test_entity_notes_render_as_paragraphs() {
        let documents = render(&sample_model());
        assert_eq!(
            find(&documents, "Alice").content,
            "First line\n\nSecond line"
        );
    }

    #[test]
    fn test_event_document_layout() {
        let documents = render(&sample_model());
        let meeting = find(&documents, "Meeting");
        assert!(meeting.content.contains("## Summary\n\nThey meet."));
        assert!(
            meeting
                .content
                .lines()
                .any(|line| line == "Protagonist: [[Alice]]")
        );
        assert!(meeting.content.lines().any(|line| line == "#first_meeting"));
        assert!(meeting.content.ends_with("0001-01-02\n01:00"));
    }

    #[test]
    fn test_unresolved_relationship_endpoint_is_skipped() {
        let documents = render(&sample_model());
        let meeting = find(&documents, "Meeting");
        assert_eq!(
            meeting
                .content
                .lines()
                .filter(|line| line.contains("[[") && line.contains("Protagonist"))
                .count(),
            1
        );
    }

    #[test]
    fn test_event_without_timing_omits_stamp() {
        let mut model = sample_model();
        let event = model.events.get_mut("ev1").unwrap();
        event.date = None;
        event.time = None;
        let documents = render(&model);
        let meeting = find(&documents, "Meeting");
        assert!(!meeting.content.contains("0001-01-02"));
        assert!(meeting.content.ends_with("#first_meeting"));
    }
}
