// src/process/row.rs

use serde::ser::{Serialize, SerializeMap, Serializer};

/// One decoded record: field name → cell text, in field order.
/// Serializes as a JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedRow {
    cells: Vec<(String, String)>,
}

impl DecodedRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `name`, replacing an earlier value under the same name in place.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.cells.iter_mut().find(|(n, _)| *n == name) {
            Some(cell) => cell.1 = value,
            None => self.cells.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.cells.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}

impl Serialize for DecodedRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (name, value) in &self.cells {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Pair `cells` with `names` by position.
///
/// Short rows are intentional: names past the last cell are simply absent
/// from the row. Cells past the last name are dropped.
pub fn tolerant_zip<'a, N, C>(names: N, cells: C) -> DecodedRow
where
    N: IntoIterator<Item = &'a str>,
    C: IntoIterator<Item = &'a str>,
{
    let mut row = DecodedRow::new();
    for (name, cell) in names.into_iter().zip(cells) {
        row.insert(name, cell);
    }
    row
}
