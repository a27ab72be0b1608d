//! Declared shape of the `bookings` table.
//!
//! The schema manager in `coolie-store` evolves the table towards this
//! declaration; the booking store builds its INSERT column list from it.
//! Bump [`SCHEMA_VERSION`] whenever a field is appended.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Revision of the field declaration below.
pub const SCHEMA_VERSION: u32 = 1;

/// Semantic type of a declared field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Real,
    Integer,
    Boolean,
}

impl FieldKind {
    /// SQLite column type; booleans are stored as 0/1 integers.
    pub fn sql_type(self) -> &'static str {
        match self {
            FieldKind::Text => "TEXT",
            FieldKind::Real => "REAL",
            FieldKind::Integer | FieldKind::Boolean => "INTEGER",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    /// Computed at creation rather than supplied by the caller.
    pub derived: bool,
}

impl FieldSpec {
    pub const fn input(name: &'static str, kind: FieldKind) -> Self {
        Self { name, kind, derived: false }
    }

    pub const fn derived(name: &'static str, kind: FieldKind) -> Self {
        Self { name, kind, derived: true }
    }
}

/// Caller-supplied booking fields, in column order.
pub const BOOKING_FIELDS: &[FieldSpec] = &[
    FieldSpec::input("name", FieldKind::Text),
    FieldSpec::input("country", FieldKind::Text),
    FieldSpec::input("state", FieldKind::Text),
    FieldSpec::input("city", FieldKind::Text),
    FieldSpec::input("luggage_weight", FieldKind::Real),
    FieldSpec::input("arrival_time", FieldKind::Text),
    FieldSpec::input("service_type", FieldKind::Text),
];

/// Columns filled in by the booking flow.
pub const DERIVED_FIELDS: &[FieldSpec] = &[
    FieldSpec::derived("helper", FieldKind::Text),
    FieldSpec::derived("fare", FieldKind::Real),
    FieldSpec::derived("timestamp", FieldKind::Text),
];

/// Every declared column except the `id` primary key.
pub fn declared_fields() -> impl Iterator<Item = &'static FieldSpec> {
    BOOKING_FIELDS.iter().chain(DERIVED_FIELDS.iter())
}

/// A value bound to a booking column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Boolean(bool),
    Integer(i64),
    Real(f64),
    Text(String),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Boolean(b) => write!(f, "{}", b),
            FieldValue::Integer(i) => write!(f, "{}", i),
            FieldValue::Real(r) => write!(f, "{}", r),
            FieldValue::Text(s) => f.write_str(s),
        }
    }
}

/// Explicit `{field name -> default value}` table.
///
/// Used twice: to resolve an omitted `country` on a request, and to backfill rows that
/// predate a newly added column.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDefaults {
    values: BTreeMap<String, FieldValue>,
}

impl Default for FieldDefaults {
    fn default() -> Self {
        let mut values = BTreeMap::new();
        values.insert("country".to_string(), FieldValue::text("India"));
        Self { values }
    }
}

impl FieldDefaults {
    pub fn empty() -> Self {
        Self { values: BTreeMap::new() }
    }

    /// Built-in defaults with `overrides` applied on top.
    pub fn with_overrides<I>(overrides: I) -> Self
    where
        I: IntoIterator<Item = (String, FieldValue)>,
    {
        let mut defaults = Self::default();
        defaults.values.extend(overrides);
        defaults
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.values.get(field)
    }

    pub fn insert(&mut self, field: impl Into<String>, value: FieldValue) {
        self.values.insert(field.into(), value);
    }

    /// Value written into pre-existing rows when `spec` becomes a new column.
    /// Derived columns always get an empty string.
    pub fn backfill_for(&self, spec: &FieldSpec) -> Option<FieldValue> {
        if spec.derived {
            Some(FieldValue::text(""))
        } else {
            self.values.get(spec.name).cloned()
        }
    }
}
