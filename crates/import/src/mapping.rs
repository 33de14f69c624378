use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// The semantic role a column can play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKey {
    Amount,
    Category,
    Date,
    Notes,
    Type,
    Icon,
    Recurrence,
}

impl FieldKey {
    pub const ALL: [FieldKey; 7] = [
        FieldKey::Amount,
        FieldKey::Category,
        FieldKey::Date,
        FieldKey::Notes,
        FieldKey::Type,
        FieldKey::Icon,
        FieldKey::Recurrence,
    ];

    pub const REQUIRED: [FieldKey; 3] = [FieldKey::Amount, FieldKey::Category, FieldKey::Date];

    pub fn is_required(self) -> bool {
        Self::REQUIRED.contains(&self)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FieldKey::Amount => "amount",
            FieldKey::Category => "category",
            FieldKey::Date => "date",
            FieldKey::Notes => "notes",
            FieldKey::Type => "type",
            FieldKey::Icon => "icon",
            FieldKey::Recurrence => "recurrence",
        }
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FieldKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        FieldKey::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| format!("Unknown field: '{s}'"))
    }
}

/// Field key → column index for one import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldMapping {
    columns: BTreeMap<FieldKey, usize>,
}

impl FieldMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, field: FieldKey, column: usize) {
        self.columns.insert(field, column);
    }

    pub fn clear(&mut self, field: FieldKey) {
        self.columns.remove(&field);
    }

    pub fn column_for(&self, field: FieldKey) -> Option<usize> {
        self.columns.get(&field).copied()
    }

    /// The field already holding `column`, if any.
    pub fn field_at(&self, column: usize) -> Option<FieldKey> {
        self.columns
            .iter()
            .find(|(_, &c)| c == column)
            .map(|(&f, _)| f)
    }

    pub fn missing_required(&self) -> Vec<FieldKey> {
        FieldKey::ALL
            .into_iter()
            .filter(|f| f.is_required() && !self.columns.contains_key(f))
            .collect()
    }

    pub fn required_fields_satisfied(&self) -> bool {
        self.missing_required().is_empty()
    }

    /// Minimum number of fields a data row needs to cover every required column.
    pub fn required_width(&self) -> usize {
        FieldKey::REQUIRED
            .iter()
            .filter_map(|f| self.column_for(*f))
            .max()
            .map_or(0, |c| c + 1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldKey, usize)> + '_ {
        self.columns.iter().map(|(&f, &c)| (f, c))
    }
}

/// Caller's choice for a single field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColumnOverride {
    Column(usize),
    Unmapped(Unmapped),
}

/// Spelled `"none"` in configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unmapped {
    None,
}

impl ColumnOverride {
    pub fn none() -> Self {
        ColumnOverride::Unmapped(Unmapped::None)
    }
}

impl std::str::FromStr for ColumnOverride {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("none") || s == "-" {
            return Ok(ColumnOverride::none());
        }
        s.parse::<usize>()
            .map(ColumnOverride::Column)
            .map_err(|_| format!("Invalid column: '{s}' (expected an index or 'none')"))
    }
}

/// A partial, caller-supplied mapping. Fields left out keep the detected column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MappingOverride {
    fields: BTreeMap<FieldKey, ColumnOverride>,
}

impl MappingOverride {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn column(mut self, field: FieldKey, column: usize) -> Self {
        self.fields.insert(field, ColumnOverride::Column(column));
        self
    }

    pub fn unmapped(mut self, field: FieldKey) -> Self {
        self.fields.insert(field, ColumnOverride::none());
        self
    }

    pub fn insert(&mut self, field: FieldKey, choice: ColumnOverride) {
        self.fields.insert(field, choice);
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Merge a detected mapping with an optional override; the override wins per field.
pub fn resolve(detected: &FieldMapping, overrides: Option<&MappingOverride>) -> FieldMapping {
    let mut resolved = detected.clone();
    let Some(overrides) = overrides else {
        return resolved;
    };

    for (&field, &choice) in &overrides.fields {
        match choice {
            ColumnOverride::Column(column) => resolved.set(field, column),
            ColumnOverride::Unmapped(_) => resolved.clear(field),
        }
    }

    resolved
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detected() -> FieldMapping {
        let mut m = FieldMapping::new();
        m.set(FieldKey::Amount, 0);
        m.set(FieldKey::Category, 1);
        m.set(FieldKey::Date, 2);
        m.set(FieldKey::Notes, 3);
        m
    }

    #[test]
    fn missing_required_lists_unmapped_fields() {
        let mut m = FieldMapping::new();
        m.set(FieldKey::Amount, 0);
        assert_eq!(m.missing_required(), vec![FieldKey::Category, FieldKey::Date]);
        assert!(!m.required_fields_satisfied());
        assert!(detected().required_fields_satisfied());
    }

    #[test]
    fn only_amount_category_date_are_required() {
        let required: Vec<_> = FieldKey::ALL.into_iter().filter(|f| f.is_required()).collect();
        assert_eq!(required, FieldKey::REQUIRED.to_vec());
        assert!(!FieldKey::Notes.is_required());
    }

    #[test]
    fn required_width_uses_highest_required_column() {
        let mut m = detected();
        m.set(FieldKey::Notes, 9);
        assert_eq!(m.required_width(), 3);
        assert_eq!(FieldMapping::new().required_width(), 0);
    }

    #[test]
    fn resolve_without_override_is_identity() {
        assert_eq!(resolve(&detected(), None), detected());
    }

    #[test]
    fn override_wins_per_field() {
        let overrides = MappingOverride::new()
            .column(FieldKey::Amount, 5)
            .unmapped(FieldKey::Notes)
            .column(FieldKey::Icon, 4);
        let resolved = resolve(&detected(), Some(&overrides));
        assert_eq!(resolved.column_for(FieldKey::Amount), Some(5));
        assert_eq!(resolved.column_for(FieldKey::Category), Some(1));
        assert_eq!(resolved.column_for(FieldKey::Notes), None);
        assert_eq!(resolved.column_for(FieldKey::Icon), Some(4));
    }

    #[test]
    fn resolve_is_idempotent() {
        let overrides = MappingOverride::new().column(FieldKey::Date, 7);
        let once = resolve(&detected(), Some(&overrides));
        let twice = resolve(&once, Some(&overrides));
        assert_eq!(once, twice);
    }

    #[test]
    fn unmapping_required_field_fails_validation() {
        let overrides = MappingOverride::new().unmapped(FieldKey::Date);
        let resolved = resolve(&detected(), Some(&overrides));
        assert_eq!(resolved.missing_required(), vec![FieldKey::Date]);
    }

    #[test]
    fn field_key_from_str() {
        assert_eq!("Amount".parse::<FieldKey>().unwrap(), FieldKey::Amount);
        assert!("payee".parse::<FieldKey>().is_err());
    }

    #[test]
    fn column_override_from_str() {
        assert_eq!("3".parse::<ColumnOverride>().unwrap(), ColumnOverride::Column(3));
        assert_eq!("none".parse::<ColumnOverride>().unwrap(), ColumnOverride::none());
        assert!("x".parse::<ColumnOverride>().is_err());
    }
}
