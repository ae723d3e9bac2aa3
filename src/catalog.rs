use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

// Fields the browser and the record generator actually read. Everything else
// the database ships stays in the `extra` map untouched.
const KNOWN_FIELDS: [&str; 5] = ["name", "amiiboSeries", "head", "tail", "image"];

pub const UNKNOWN_LABEL: &str = "Unknown";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortField {
    Series,
    Name,
}

#[derive(Clone, Debug, Default)]
pub struct CatalogEntry {
    pub name: Option<String>,
    pub amiibo_series: Option<String>,
    pub head: Option<String>,
    pub tail: Option<String>,
    pub image: Option<String>,
    // Unrecognized database fields, kept around so nothing is lost on a
    // future schema addition.
    pub extra: Map<String, Value>,
    // Runtime-only selection flag, never sourced from the database.
    pub selected: bool,
}

impl CatalogEntry {
    /// Builds an entry from one database object. Missing or wrong-typed
    /// fields become `None` instead of failing the whole parse.
    pub fn from_value(value: &Value) -> Self {
        let get_string = |key: &str| {
            value
                .get(key)
                .and_then(Value::as_str)
                .map(|s| s.to_string())
        };

        let extra = match value.as_object() {
            Some(obj) => obj
                .iter()
                .filter(|(key, _)| !KNOWN_FIELDS.contains(&key.as_str()))
                .map(|(key, val)| (key.clone(), val.clone()))
                .collect(),
            None => Map::new(),
        };

        CatalogEntry {
            name: get_string("name"),
            amiibo_series: get_string("amiiboSeries"),
            head: get_string("head"),
            tail: get_string("tail"),
            image: get_string("image"),
            extra,
            selected: false,
        }
    }

    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(UNKNOWN_LABEL)
    }

    pub fn series(&self) -> &str {
        self.amiibo_series.as_deref().unwrap_or(UNKNOWN_LABEL)
    }

    /// The list row text, "<series> - <name>".
    pub fn label(&self) -> String {
        format!("{} - {}", self.series(), self.name())
    }

    /// The 16-hex-digit record id, present only when both halves are.
    pub fn record_id(&self) -> Option<String> {
        let head = self.head.as_deref().filter(|s| !s.is_empty())?;
        let tail = self.tail.as_deref().filter(|s| !s.is_empty())?;
        Some(format!("{}{}", head, tail))
    }

    fn sort_key(&self, field: SortField) -> Option<&str> {
        match field {
            SortField::Series => self.amiibo_series.as_deref(),
            SortField::Name => self.name.as_deref(),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// Replaces the catalog with the document's entry list. The database
    /// must carry its entries under a top-level "amiibo" key.
    pub fn from_document(doc: &Value) -> Result<Catalog, String> {
        let list = doc
            .get("amiibo")
            .and_then(Value::as_array)
            .ok_or_else(|| "invalid database format: missing 'amiibo' key".to_string())?;

        Ok(Catalog {
            entries: list.iter().map(CatalogEntry::from_value).collect(),
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&CatalogEntry> {
        self.entries.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut CatalogEntry> {
        self.entries.get_mut(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CatalogEntry> {
        self.entries.iter()
    }

    pub fn count_selected(&self) -> usize {
        self.entries.iter().filter(|e| e.selected).count()
    }

    /// Flips the selection flag at `index`. Out-of-range indices are a
    /// silent no-op. Returns the new flag value so the caller can keep its
    /// running count in step.
    pub fn toggle(&mut self, index: usize) -> Option<bool> {
        let entry = self.entries.get_mut(index)?;
        entry.selected = !entry.selected;
        Some(entry.selected)
    }

    /// Flips every entry's selection flag in one pass and returns the number
    /// of entries that just became selected. Starting from a fully-unselected
    /// catalog this is "select all"; from a mixed state it is a flip-all and
    /// the returned count only covers the previously-unselected entries.
    pub fn toggle_all(&mut self) -> usize {
        let mut newly_selected = 0;
        for entry in &mut self.entries {
            if !entry.selected {
                newly_selected += 1;
            }
            entry.selected = !entry.selected;
        }
        newly_selected
    }

    pub fn clear_all(&mut self) {
        for entry in &mut self.entries {
            entry.selected = false;
        }
    }

    /// Stable re-sort by the chosen field. Entries missing the field sort
    /// before every present value ascending, after it descending.
    pub fn sort(&mut self, field: SortField, ascending: bool) {
        self.entries.sort_by(|a, b| {
            let ord = a.sort_key(field).cmp(&b.sort_key(field));
            if ascending {
                ord
            } else {
                ord.reverse()
            }
        });
    }
}

/// Reads and parses the database file on disk.
pub fn read_document(path: &Path) -> Result<Value, String> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("failed to open database file: {}", e))?;
    serde_json::from_str(&content).map_err(|e| format!("failed to parse database: {}", e))
}
