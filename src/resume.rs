//! Resume content decoded from the site's YAML file.
//!
//! Decoding is lenient. Unknown keys are ignored, a field of the wrong shape
//! reads as absent, and each list entry is decoded on its own so one bad entry
//! never costs the rest of the section.

use serde::{Deserialize, Deserializer};
use serde_yaml_ng::Value;

use crate::error::DataError;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResumeData {
    pub name: Option<String>,
    pub title: Option<String>,
    pub tagline: Option<String>,
    pub contact: Vec<ContactEntry>,
    pub experience: Vec<Experience>,
    pub education: Vec<Education>,
    pub skills: Vec<String>,
    pub tools: Vec<Tool>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ContactEntry {
    pub kind: String,
    pub value: String,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Experience {
    #[serde(default, deserialize_with = "lenient_text")]
    pub role: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub company: Option<String>,
    #[serde(default, rename = "type", deserialize_with = "lenient_text")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub duration: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub details: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Education {
    #[serde(default, deserialize_with = "lenient_text")]
    pub school: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub degree: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub duration: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Tool {
    Plain(String),
    Group { category: String, items: Vec<String> },
}

impl ResumeData {
    pub fn from_yaml(text: &str) -> Result<ResumeData, DataError> {
        if text.trim().is_empty() {
            return Err(DataError::Empty);
        }
        let root: Value = serde_yaml_ng::from_str(text)?;
        ResumeData::from_value(&root)
    }

    pub fn from_value(root: &Value) -> Result<ResumeData, DataError> {
        match root {
            Value::Null => return Err(DataError::Empty),
            Value::Mapping(_) => {}
            _ => return Err(DataError::NotAMapping),
        }

        Ok(ResumeData {
            name: root.get("name").and_then(scalar_text),
            title: root.get("title").and_then(scalar_text),
            tagline: root.get("tagline").and_then(scalar_text),
            contact: contact_entries(root),
            experience: decode_each(root, "experience"),
            education: decode_each(root, "education"),
            skills: entries(root, "skills").filter_map(scalar_text).collect(),
            tools: entries(root, "tools").filter_map(tool).collect(),
        })
    }

    pub fn is_empty(&self) -> bool {
        *self == ResumeData::default()
    }
}

/// Strings, numbers and booleans as display text; anything else is absent.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(scalar_text(&value))
}

fn lenient_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(value
        .as_sequence()
        .map(|seq| seq.iter().filter_map(scalar_text).collect())
        .unwrap_or_default())
}

fn entries<'a>(root: &'a Value, key: &str) -> impl Iterator<Item = &'a Value> {
    let seq = match root.get(key) {
        Some(Value::Sequence(seq)) => Some(seq),
        Some(Value::Null) | None => None,
        Some(_) => {
            log::debug!("`{key}` is not a list, skipping");
            None
        }
    };
    seq.into_iter().flatten()
}

fn decode_each<T: for<'de> Deserialize<'de>>(root: &Value, key: &str) -> Vec<T> {
    entries(root, key)
        .enumerate()
        .filter_map(|(index, item)| match serde_yaml_ng::from_value(item.clone()) {
            Ok(decoded) => Some(decoded),
            Err(err) => {
                log::debug!("skipping {key}[{index}]: {err}");
                None
            }
        })
        .collect()
}

fn contact_entries(root: &Value) -> Vec<ContactEntry> {
    let Some(mapping) = root.get("contact").and_then(Value::as_mapping) else {
        return Vec::new();
    };
    mapping
        .iter()
        .filter_map(|(key, value)| {
            Some(ContactEntry {
                kind: scalar_text(key)?,
                value: scalar_text(value)?,
            })
        })
        .collect()
}

fn tool(value: &Value) -> Option<Tool> {
    if let Some(mapping) = value.as_mapping() {
        // Only the first entry names a group.
        let (key, items) = mapping.iter().next()?;
        let items = match items {
            Value::Sequence(seq) => seq.iter().filter_map(scalar_text).collect(),
            other => scalar_text(other).into_iter().collect(),
        };
        return Some(Tool::Group {
            category: scalar_text(key)?,
            items,
        });
    }
    scalar_text(value).map(Tool::Plain)
}
