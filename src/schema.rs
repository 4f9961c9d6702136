//! # Field schemas for self-describing measurements
//!
//! This module defines the **schema layer** shared by every measurement type:
//!
//! - [`FieldType`] — the scalar type tag a field is declared with,
//! - [`FieldEntry`] — one named field (or array of fields): name, base slot
//!   offset, type tag, arity, physical units, and an optional component tag,
//! - [`Schema`] — the ordered, searchable set of entries describing one
//!   concrete measurement type.
//!
//! ## Overview
//!
//! A schema is built **once per concrete measurement type** (inside a
//! `LazyLock`, so first use is exactly-once even under concurrent
//! construction) and shared by every instance of that type through an
//! [`Arc`](std::sync::Arc). After that first build it is never mutated.
//!
//! Lookup by name is two-level: an entry whose `component` exactly matches
//! the requested component wins; entries with an **empty** component are
//! *transparent* and match any requested component. A miss returns the
//! distinguished [`unknown sentinel`](Schema::unknown) rather than an error —
//! callers test it with [`FieldEntry::found`]. Reading *through* the sentinel
//! always fails, because its index is negative.
//!
//! ## See also
//! ------------
//! * [`RecordStore`](crate::record::RecordStore) – slot storage sized by [`Schema::size`].
//! * [`Record`](crate::record::Record) – reflection getters resolving entries via [`Schema::find`].

use std::fmt;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Scalar type tag carried by every [`FieldEntry`].
///
/// `Unknown` is reserved for the sentinel returned by a failed lookup; no
/// real field may declare it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldType {
    Char,
    Short,
    Int,
    Long,
    Float,
    Double,
    Unknown,
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldType::Char => "char",
            FieldType::Short => "short",
            FieldType::Int => "int",
            FieldType::Long => "long",
            FieldType::Float => "float",
            FieldType::Double => "double",
            FieldType::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// One schema entry: a named scalar field or a contiguous array of them.
///
/// `index` is the base offset into the owning record's slot storage. Offsets
/// are chosen at schema-definition time by the measurement type itself and
/// are never renumbered; uniqueness within one schema is a cooperative
/// invariant between the entries a type declares.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldEntry {
    pub name: String,
    pub index: i32,
    pub ftype: FieldType,
    /// Number of scalar slots this entry covers; 1 for a scalar field.
    pub arity: u32,
    pub units: String,
    pub component: String,
}

impl FieldEntry {
    /// Declare a scalar field at `index`.
    pub fn new(name: &str, index: i32, ftype: FieldType) -> Self {
        Self {
            name: name.to_owned(),
            index,
            ftype,
            arity: 1,
            units: String::new(),
            component: String::new(),
        }
    }

    /// Declare this entry as an array of `arity` contiguous slots.
    pub fn with_arity(mut self, arity: u32) -> Self {
        self.arity = arity;
        self
    }

    /// Attach physical units (e.g. `"pixel"`, `"arcsec"`).
    pub fn with_units(mut self, units: &str) -> Self {
        self.units = units.to_owned();
        self
    }

    /// Tag this entry with a component, removing it from transparent lookup.
    pub fn with_component(mut self, component: &str) -> Self {
        self.component = component.to_owned();
        self
    }

    /// Sentinel predicate: `false` for the entry returned by a failed
    /// [`Schema::find`].
    pub fn found(&self) -> bool {
        self.ftype != FieldType::Unknown
    }

    /// Whether this entry covers more than one slot.
    pub fn is_array(&self) -> bool {
        self.arity > 1
    }
}

static UNKNOWN_ENTRY: LazyLock<FieldEntry> = LazyLock::new(|| FieldEntry {
    name: "unknown".to_owned(),
    index: -1,
    ftype: FieldType::Unknown,
    arity: 0,
    units: String::new(),
    component: String::new(),
});

/// Ordered, searchable set of [`FieldEntry`] describing one measurement type.
///
/// Iteration yields entries in insertion order, which is the column order of
/// every rendering of the type (CSV headers included).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Schema {
    entries: SmallVec<[FieldEntry; 8]>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one entry.
    ///
    /// The caller is responsible for supplying an `index` that does not
    /// collide with any previously added entry of the same type.
    pub fn add(&mut self, entry: FieldEntry) {
        self.entries.push(entry);
    }

    /// Total scalar capacity (Σ arity over all entries).
    ///
    /// This is the number of slots a record of this type must allocate.
    pub fn size(&self) -> usize {
        self.entries.iter().map(|e| e.arity as usize).sum()
    }

    /// Number of declared entries (not slots).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> &[FieldEntry] {
        &self.entries
    }

    /// Look up a field by name and component.
    ///
    /// An entry whose component **exactly** matches the requested one takes
    /// priority; entries with an empty component are transparent and match
    /// any requested component. A miss returns the
    /// [`unknown sentinel`](Schema::unknown) — never an error.
    ///
    /// Arguments
    /// -----------------
    /// * `name`: the field name within the measurement type.
    /// * `component`: the producing-algorithm tag, or `""` for untagged lookup.
    ///
    /// Return
    /// ----------
    /// * The matching [`FieldEntry`], or [`Schema::unknown`] if none matches.
    pub fn find(&self, name: &str, component: &str) -> &FieldEntry {
        if !component.is_empty() {
            if let Some(entry) = self
                .entries
                .iter()
                .find(|e| e.component == component && e.name == name)
            {
                return entry;
            }
        }
        if let Some(entry) = self
            .entries
            .iter()
            .find(|e| e.component.is_empty() && e.name == name)
        {
            return entry;
        }
        Self::unknown()
    }

    /// The shared unknown sentinel: name `"unknown"`, index `-1`, type
    /// [`FieldType::Unknown`].
    pub fn unknown() -> &'static FieldEntry {
        &UNKNOWN_ENTRY
    }
}

impl<'a> IntoIterator for &'a Schema {
    type Item = &'a FieldEntry;
    type IntoIter = std::slice::Iter<'a, FieldEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_schema() -> Schema {
        let mut schema = Schema::new();
        schema.add(FieldEntry::new("flux", 0, FieldType::Double));
        schema.add(FieldEntry::new("fluxErr", 1, FieldType::Float));
        schema.add(
            FieldEntry::new("radius", 2, FieldType::Float)
                .with_arity(3)
                .with_units("arcsec"),
        );
        schema
    }

    #[test]
    fn size_is_sum_of_arities() {
        let schema = sample_schema();
        assert_eq!(schema.len(), 3);
        assert_eq!(schema.size(), 5);
    }

    #[test]
    fn entries_keep_insertion_order() {
        let schema = sample_schema();
        let names: Vec<&str> = schema.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["flux", "fluxErr", "radius"]);
    }

    #[test]
    fn find_transparent_entry() {
        let schema = sample_schema();
        let entry = schema.find("fluxErr", "");
        assert!(entry.found());
        assert_eq!(entry.index, 1);
        // Transparent entries also match a tagged request.
        let entry = schema.find("fluxErr", "psf");
        assert!(entry.found());
        assert_eq!(entry.index, 1);
    }

    #[test]
    fn exact_component_match_wins_over_transparent() {
        let mut schema = sample_schema();
        schema.add(FieldEntry::new("flux", 5, FieldType::Double).with_component("model"));
        assert_eq!(schema.find("flux", "model").index, 5);
        assert_eq!(schema.find("flux", "").index, 0);
        assert_eq!(schema.find("flux", "psf").index, 0);
    }

    #[test]
    fn miss_returns_sentinel() {
        let schema = sample_schema();
        let entry = schema.find("sersic_n", "");
        assert!(!entry.found());
        assert_eq!(entry.name, "unknown");
        assert!(entry.index < 0);
        assert_eq!(entry.ftype, FieldType::Unknown);
    }

    #[test]
    fn schema_exports_to_json() {
        let schema = sample_schema();
        let json = serde_json::to_value(&schema).unwrap();
        let entries = json["entries"].as_array().unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[2]["name"], "radius");
        assert_eq!(entries[2]["ftype"], "Float");
        assert_eq!(entries[2]["arity"], 3);
        assert_eq!(entries[2]["units"], "arcsec");
    }
}
