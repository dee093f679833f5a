//! Ordered event collections with hashing and JSON persistence.

use crate::error::{EventError, EventResult};
use crate::event::{EventRecord, SerializedEvent};
use chrono::Local;
use log::{debug, info};
use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::fmt;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

// Maximum allowed size for imported event files (10MB)
const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;
const EXPORT_PREFIX: &str = "events_";
const EXPORT_TIMESTAMP: &str = "%Y%m%d%H%M%S";

/// Events in page order. Duplicates are kept; identity comes from
/// [`EventCollection::content_hash`].
#[derive(Debug, Clone, Default)]
pub struct EventCollection {
    events: Vec<EventRecord>,
    hash: Option<String>,
}

impl EventCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_events(events: Vec<EventRecord>) -> Self {
        Self { events, hash: None }
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, EventRecord> {
        self.events.iter()
    }

    /// Mutable access to the records. Clears the cached hash.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, EventRecord> {
        self.hash = None;
        self.events.iter_mut()
    }

    /// Records matching `predicate`, in collection order.
    pub fn filter<P>(&self, mut predicate: P) -> Vec<&EventRecord>
    where
        P: FnMut(&EventRecord) -> bool,
    {
        self.events.iter().filter(|event| predicate(event)).collect()
    }

    pub fn to_serialized(&self) -> Vec<SerializedEvent> {
        self.events.iter().map(EventRecord::serialize).collect()
    }

    /// SHA-256 over the order-independent canonical JSON of all records,
    /// as lowercase hex.
    pub fn content_hash(&self) -> EventResult<String> {
        if self.events.is_empty() {
            return Err(EventError::EmptyCollection);
        }

        let mut entries = self
            .to_serialized()
            .into_iter()
            .map(|event| -> EventResult<(String, Value)> {
                let value = serde_json::to_value(event)?;
                Ok((canonical_json(&value), value))
            })
            .collect::<EventResult<Vec<_>>>()?;
        entries.sort_by(|a, b| a.0.cmp(&b.0));

        let sorted = Value::Array(entries.into_iter().map(|(_, value)| value).collect());
        let digest = Sha256::digest(canonical_json(&sorted).as_bytes());
        Ok(format!("{:x}", digest))
    }

    /// Recompute and cache the content hash.
    pub fn update_hash(&mut self) -> EventResult<&str> {
        let hash = self.content_hash()?;
        Ok(self.hash.insert(hash).as_str())
    }

    /// Last hash stored by [`EventCollection::update_hash`], if still valid.
    pub fn hash(&self) -> Option<&str> {
        self.hash.as_deref()
    }

    /// Whether the current contents differ from a previously computed hash.
    pub fn has_changed(&self, previous_hash: &str) -> EventResult<bool> {
        Ok(self.content_hash()? != previous_hash)
    }

    /// Write all records to `events_<YYYYMMDDHHMMSS>.json` inside `directory`.
    pub fn export(&self, directory: impl AsRef<Path>) -> EventResult<PathBuf> {
        if self.events.is_empty() {
            return Err(EventError::EmptyCollection);
        }

        let directory = directory.as_ref();
        fs::create_dir_all(directory)?;

        let file_name =
            format!("{}{}.json", EXPORT_PREFIX, Local::now().format(EXPORT_TIMESTAMP));
        let path = directory.join(file_name);
        self.export_to(&path)?;
        Ok(path)
    }

    /// Write all records as an indented JSON array to `path`.
    pub fn export_to(&self, path: impl AsRef<Path>) -> EventResult<()> {
        if self.events.is_empty() {
            return Err(EventError::EmptyCollection);
        }

        let path = path.as_ref();
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut writer, formatter);
        self.to_serialized().serialize(&mut serializer)?;
        writer.flush()?;

        info!("Exported {} events to {}", self.events.len(), path.display());
        Ok(())
    }

    /// Append the records stored in `path`.
    ///
    /// Every record is validated before any is appended, so a corrupt file
    /// leaves the collection untouched.
    pub fn import(&mut self, path: impl AsRef<Path>) -> EventResult<()> {
        let path = path.as_ref();
        let metadata = match fs::metadata(path) {
            Ok(metadata) if metadata.is_file() => metadata,
            _ => return Err(EventError::NotFound(path.to_path_buf())),
        };
        if metadata.len() > MAX_FILE_SIZE {
            return Err(EventError::FileTooLarge {
                path: path.to_path_buf(),
                limit: MAX_FILE_SIZE,
            });
        }

        let reader = BufReader::new(File::open(path)?);
        let dump: Vec<SerializedEvent> = serde_json::from_reader(reader)?;
        if dump.is_empty() {
            return Err(EventError::EmptyData(path.to_path_buf()));
        }

        let imported = dump
            .into_iter()
            .map(EventRecord::deserialize)
            .collect::<EventResult<Vec<_>>>()?;

        debug!("Imported {} events from {}", imported.len(), path.display());
        self.events.extend(imported);
        self.hash = None;
        Ok(())
    }
}

/// JSON text with object keys sorted at every level, `", "` and `": "`
/// separators and every non-printable or non-ASCII character escaped as
/// `\uXXXX` (UTF-16 units). Matches `json.dumps(value, sort_keys=True)`.
fn canonical_json(value: &Value) -> String {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let fields: Vec<String> = keys
                .into_iter()
                .map(|key| format!("{}: {}", escape_string(key), canonical_json(&map[key])))
                .collect();
            format!("{{{}}}", fields.join(", "))
        }
        Value::Array(items) => {
            let items: Vec<String> = items.iter().map(canonical_json).collect();
            format!("[{}]", items.join(", "))
        }
        Value::String(text) => escape_string(text),
        other => other.to_string(),
    }
}

fn escape_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            ' '..='~' => out.push(c),
            _ => {
                let mut units = [0u16; 2];
                for unit in c.encode_utf16(&mut units) {
                    out.push_str(&format!("\\u{:04x}", unit));
                }
            }
        }
    }
    out.push('"');
    out
}

impl From<Vec<EventRecord>> for EventCollection {
    fn from(events: Vec<EventRecord>) -> Self {
        Self::from_events(events)
    }
}

impl<'a> IntoIterator for &'a EventCollection {
    type Item = &'a EventRecord;
    type IntoIter = std::slice::Iter<'a, EventRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}

impl IntoIterator for EventCollection {
    type Item = EventRecord;
    type IntoIter = std::vec::IntoIter<EventRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.into_iter()
    }
}

impl fmt::Display for EventCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.events.iter().map(ToString::to_string).collect();
        write!(f, "{}", rendered.join("\n\n"))
    }
}
