//! Project archive access: an `.aeon` file is a zip archive holding a single
//! `timeline.json` member. This module unpacks that member into raw records;
//! presence of required fields is validated by the builder, not here.

use crate::error::ConvertError;
use crate::timespan::Span;
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;

const TIMELINE_MEMBER: &str = "timeline.json";

#[derive(Debug, Default, Deserialize)]
pub struct RawProject {
    pub template: Option<RawTemplate>,
    pub entities: Option<Vec<RawEntity>>,
    pub events: Option<Vec<RawEvent>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTemplate {
    pub types: Option<Vec<RawType>>,
    pub properties: Option<Vec<RawProperty>>,
    pub range_properties: Option<Vec<RawRangeProperty>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawType {
    pub guid: Option<String>,
    pub name: Option<String>,
    pub roles: Option<Vec<RawRole>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawRole {
    pub guid: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawProperty {
    pub guid: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawRangeProperty {
    pub guid: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub calendar: Option<RawCalendar>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawCalendar {
    pub eras: Option<Vec<RawEra>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawEra {
    pub name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEntity {
    pub guid: Option<String>,
    pub name: Option<String>,
    pub entity_type: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEvent {
    pub guid: Option<String>,
    pub title: Option<String>,
    pub range_values: Option<Vec<RawRangeValue>>,
    pub relationships: Option<Vec<RawRelationship>>,
    pub values: Option<Vec<RawValue>>,
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRangeValue {
    pub range_property: Option<String>,
    pub position: Option<RawPosition>,
    pub span: Option<Span>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawPosition {
    pub timestamp: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawRelationship {
    pub role: Option<String>,
    pub entity: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawValue {
    pub property: Option<String>,
    pub value: Option<String>,
}

/// Open the project archive and parse its `timeline.json` member.
pub fn open_project(path: &Path) -> Result<RawProject, ConvertError> {
    let container = |detail: String| ConvertError::Container {
        path: path.to_path_buf(),
        detail,
    };

    let file = File::open(path).map_err(|err| container(err.to_string()))?;
    let mut archive = zip::ZipArchive::new(file)
        .map_err(|err| container(format!("not a valid project archive: {err}")))?;
    let mut member = archive
        .by_name(TIMELINE_MEMBER)
        .map_err(|err| container(format!("no '{TIMELINE_MEMBER}' member: {err}")))?;
    let mut raw = String::new();
    member
        .read_to_string(&mut raw)
        .map_err(|err| container(format!("cannot read '{TIMELINE_MEMBER}': {err}")))?;
    serde_json::from_str(&raw)
        .map_err(|err| container(format!("'{TIMELINE_MEMBER}' is not valid JSON: {err}")))
}
