//! # Typed, schema-indexed record storage
//!
//! This module holds the storage layer every measurement type builds on:
//!
//! - [`FieldValue`] — one erased slot, a tagged union over the six scalar
//!   types a schema may declare,
//! - [`Scalar`] — the compile-time bridge between a Rust scalar and its
//!   [`FieldType`](crate::schema::FieldType) tag,
//! - [`RecordBuilder`] / [`RecordStore`] — the
//!   construct-then-populate-then-freeze protocol: a builder allocates one
//!   slot per unit of schema capacity, every slot must be written (with a
//!   value matching its declared type) before [`RecordBuilder::freeze`]
//!   succeeds, and the frozen store is immutable,
//! - [`Record`] — the capability trait the composite and the registry depend
//!   on: schema access, the producing-algorithm component tag, and generic
//!   name-based getters that widen any slot to `f64` (or `i64`).
//!
//! ## Access paths
//!
//! A measurement type reads its own slots through the **typed fast path**
//! ([`RecordStore::value`]) using the offset constants it declared in its
//! schema; the tag check is an assertion, because freezing guarantees every
//! slot matches its declared type. Reflection callers that only know a name
//! or a [`FieldEntry`] use the **generic path** ([`Record::get`] and
//! friends), which performs the explicit widening cast at the boundary and
//! reports misses and range violations as distinguishable
//! [`SkymeterError`] variants.

use std::fmt;
use std::sync::Arc;

use crate::schema::{FieldEntry, FieldType, Schema};
use crate::skymeter_errors::SkymeterError;

/// One erased storage slot: a scalar value tagged with its type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue {
    Char(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
}

impl FieldValue {
    /// The [`FieldType`] tag matching this slot's variant.
    pub fn tag(&self) -> FieldType {
        match self {
            FieldValue::Char(_) => FieldType::Char,
            FieldValue::Short(_) => FieldType::Short,
            FieldValue::Int(_) => FieldType::Int,
            FieldValue::Long(_) => FieldType::Long,
            FieldValue::Float(_) => FieldType::Float,
            FieldValue::Double(_) => FieldType::Double,
        }
    }

    /// Widen to `f64`, whatever the declared type.
    pub fn widen(&self) -> f64 {
        match *self {
            FieldValue::Char(v) => v as f64,
            FieldValue::Short(v) => v as f64,
            FieldValue::Int(v) => v as f64,
            FieldValue::Long(v) => v as f64,
            FieldValue::Float(v) => v as f64,
            FieldValue::Double(v) => v,
        }
    }

    /// Widen (or truncate, for the floating variants) to `i64`.
    pub fn widen_long(&self) -> i64 {
        match *self {
            FieldValue::Char(v) => v as i64,
            FieldValue::Short(v) => v as i64,
            FieldValue::Int(v) => v as i64,
            FieldValue::Long(v) => v,
            FieldValue::Float(v) => v as i64,
            FieldValue::Double(v) => v as i64,
        }
    }
}

/// A Rust scalar that can live in a [`FieldValue`] slot.
pub trait Scalar: Sized {
    /// The schema tag this scalar matches.
    const TYPE: FieldType;

    fn into_value(self) -> FieldValue;
    fn from_value(value: &FieldValue) -> Option<Self>;
}

macro_rules! impl_scalar {
    ($rust:ty, $variant:ident, $tag:ident) => {
        impl Scalar for $rust {
            const TYPE: FieldType = FieldType::$tag;

            fn into_value(self) -> FieldValue {
                FieldValue::$variant(self)
            }

            fn from_value(value: &FieldValue) -> Option<Self> {
                match value {
                    FieldValue::$variant(v) => Some(*v),
                    _ => None,
                }
            }
        }
    };
}

impl_scalar!(i8, Char, Char);
impl_scalar!(i16, Short, Short);
impl_scalar!(i32, Int, Int);
impl_scalar!(i64, Long, Long);
impl_scalar!(f32, Float, Float);
impl_scalar!(f64, Double, Double);

/// Populates a record's slots before it becomes readable.
///
/// Every write is checked against the schema: the offset must fall inside a
/// declared entry, an array sub-index must stay below the entry's arity, and
/// the value's type must match the entry's declared type. [`freeze`]
/// (RecordBuilder::freeze) then verifies that **every** slot was populated,
/// so construction is all-or-nothing: a partially written record never
/// escapes.
#[derive(Debug)]
pub struct RecordBuilder {
    schema: Arc<Schema>,
    slots: Vec<Option<FieldValue>>,
}

impl RecordBuilder {
    /// Allocate empty storage sized to `schema.size()`.
    pub fn new(schema: Arc<Schema>) -> Self {
        let capacity = schema.size();
        Self {
            schema,
            slots: vec![None; capacity],
        }
    }

    /// Write a scalar field at its declared offset.
    pub fn set<T: Scalar>(&mut self, index: usize, value: T) -> Result<(), SkymeterError> {
        self.set_indexed(index, 0, value)
    }

    /// Write element `i` of an array field whose base offset is `base`.
    pub fn set_indexed<T: Scalar>(
        &mut self,
        base: usize,
        i: u32,
        value: T,
    ) -> Result<(), SkymeterError> {
        let entry = self.covering_entry(base)?;
        if i >= entry.arity {
            return Err(SkymeterError::ArrayIndexOutOfRange {
                name: entry.name.clone(),
                index: i,
                arity: entry.arity,
            });
        }
        if T::TYPE != entry.ftype {
            return Err(SkymeterError::TypeMismatch {
                name: entry.name.clone(),
                expected: entry.ftype,
                actual: T::TYPE,
            });
        }
        self.slots[base + i as usize] = Some(value.into_value());
        Ok(())
    }

    /// Freeze into an immutable [`RecordStore`].
    ///
    /// Fails with [`SkymeterError::IncompleteRecord`] naming the first slot
    /// that was never written.
    pub fn freeze(self) -> Result<RecordStore, SkymeterError> {
        let mut values = Vec::with_capacity(self.slots.len());
        for (offset, slot) in self.slots.into_iter().enumerate() {
            match slot {
                Some(value) => values.push(value),
                None => return Err(SkymeterError::IncompleteRecord { offset }),
            }
        }
        Ok(RecordStore {
            schema: self.schema,
            slots: values.into_boxed_slice(),
            component: String::new(),
        })
    }

    /// The entry whose slot range covers `offset`.
    fn covering_entry(&self, offset: usize) -> Result<&FieldEntry, SkymeterError> {
        self.schema
            .entries()
            .iter()
            .find(|e| {
                e.index >= 0
                    && (e.index as usize..e.index as usize + e.arity as usize).contains(&offset)
            })
            .ok_or(SkymeterError::SlotOutOfRange {
                name: "record".to_owned(),
                offset: offset as i64,
                capacity: self.slots.len(),
            })
    }
}

/// Frozen, fully populated slot storage for one measurement instance.
///
/// Invariants established by [`RecordBuilder::freeze`] and relied on by the
/// typed fast path: `slots.len() == schema.size()`, and every slot's tag
/// matches its entry's declared [`FieldType`].
#[derive(Debug, Clone)]
pub struct RecordStore {
    schema: Arc<Schema>,
    slots: Box<[FieldValue]>,
    /// Producing-algorithm tag, set by the registry after the algorithm ran.
    component: String,
}

impl RecordStore {
    /// The per-type schema this record was built from.
    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Total number of slots (equals `schema().size()`).
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn component(&self) -> &str {
        &self.component
    }

    pub fn set_component(&mut self, component: &str) {
        self.component = component.to_owned();
    }

    /// Typed fast path: read the scalar at a compile-time-known offset.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range or the slot's tag does not match
    /// `T` — both are programmer errors (the offset constants a type declares
    /// in its schema are wrong), not runtime conditions.
    pub fn value<T: Scalar>(&self, index: usize) -> T {
        match T::from_value(&self.slots[index]) {
            Some(v) => v,
            None => panic!(
                "slot {} holds {}, not {}",
                index,
                self.slots[index].tag(),
                T::TYPE
            ),
        }
    }

    /// Typed fast path for array fields: element `i` of the field at `base`.
    ///
    /// # Panics
    ///
    /// Same conditions as [`RecordStore::value`].
    pub fn value_at<T: Scalar>(&self, base: usize, i: u32) -> T {
        self.value(base + i as usize)
    }

    /// Fallible variant of the typed path, for callers that prefer a
    /// [`SkymeterError::TypeMismatch`] over a panic.
    pub fn try_value<T: Scalar>(&self, index: usize) -> Result<T, SkymeterError> {
        let slot = self
            .slots
            .get(index)
            .ok_or(SkymeterError::SlotOutOfRange {
                name: "record".to_owned(),
                offset: index as i64,
                capacity: self.slots.len(),
            })?;
        T::from_value(slot).ok_or(SkymeterError::TypeMismatch {
            name: "record".to_owned(),
            expected: slot.tag(),
            actual: T::TYPE,
        })
    }

    /// Resolve the slot addressed by `entry` plus sub-index `i`.
    ///
    /// The two failure causes stay distinguishable: a sub-index at or beyond
    /// the entry's arity reports [`SkymeterError::ArrayIndexOutOfRange`]; an
    /// unfound (sentinel) entry or a past-capacity offset reports
    /// [`SkymeterError::SlotOutOfRange`].
    fn slot(&self, entry: &FieldEntry, i: u32) -> Result<&FieldValue, SkymeterError> {
        if !entry.found() {
            // The sentinel's offset math must never reach a live slot.
            return Err(SkymeterError::SlotOutOfRange {
                name: entry.name.clone(),
                offset: entry.index as i64 + i as i64,
                capacity: self.slots.len(),
            });
        }
        if i >= entry.arity {
            return Err(SkymeterError::ArrayIndexOutOfRange {
                name: entry.name.clone(),
                index: i,
                arity: entry.arity,
            });
        }
        let offset = entry.index as i64 + i as i64;
        if offset < 0 || offset as usize >= self.slots.len() {
            return Err(SkymeterError::SlotOutOfRange {
                name: entry.name.clone(),
                offset,
                capacity: self.slots.len(),
            });
        }
        Ok(&self.slots[offset as usize])
    }

    /// Generic read, widened to `f64`.
    pub fn get_entry(&self, entry: &FieldEntry) -> Result<f64, SkymeterError> {
        self.get_entry_indexed(0, entry)
    }

    /// Generic array read, widened to `f64`.
    pub fn get_entry_indexed(&self, i: u32, entry: &FieldEntry) -> Result<f64, SkymeterError> {
        Ok(self.slot(entry, i)?.widen())
    }

    /// Generic read, widened to `i64`.
    pub fn get_entry_as_long(&self, entry: &FieldEntry) -> Result<i64, SkymeterError> {
        self.get_entry_as_long_indexed(0, entry)
    }

    /// Generic array read, widened to `i64`.
    pub fn get_entry_as_long_indexed(
        &self,
        i: u32,
        entry: &FieldEntry,
    ) -> Result<i64, SkymeterError> {
        Ok(self.slot(entry, i)?.widen_long())
    }

    /// Name-based read: resolve through the schema, then widen to `f64`.
    ///
    /// A lookup miss fails with [`SkymeterError::FieldNotFound`], which keeps
    /// it distinguishable from the range errors a stale [`FieldEntry`] would
    /// produce.
    pub fn get(&self, name: &str, component: &str) -> Result<f64, SkymeterError> {
        self.get_indexed(0, name, component)
    }

    /// Name-based array read, widened to `f64`.
    pub fn get_indexed(&self, i: u32, name: &str, component: &str) -> Result<f64, SkymeterError> {
        let entry = self.schema.find(name, component);
        if !entry.found() {
            return Err(SkymeterError::FieldNotFound {
                name: name.to_owned(),
                component: component.to_owned(),
            });
        }
        self.get_entry_indexed(i, entry)
    }

    /// Name-based read, widened to `i64`.
    pub fn get_as_long(&self, name: &str, component: &str) -> Result<i64, SkymeterError> {
        self.get_as_long_indexed(0, name, component)
    }

    /// Name-based array read, widened to `i64`.
    pub fn get_as_long_indexed(
        &self,
        i: u32,
        name: &str,
        component: &str,
    ) -> Result<i64, SkymeterError> {
        let entry = self.schema.find(name, component);
        if !entry.found() {
            return Err(SkymeterError::FieldNotFound {
                name: name.to_owned(),
                component: component.to_owned(),
            });
        }
        self.get_entry_as_long_indexed(i, entry)
    }
}

/// Capability surface every measurement record exposes to generic callers:
/// the composite, the registry, and the renderers all depend on this trait
/// alone, never on the concrete algorithm type.
///
/// `Display` is a supertrait so a composite can render elements it holds
/// behind `Box<dyn …>` through dynamic dispatch.
pub trait Record: fmt::Display {
    fn store(&self) -> &RecordStore;
    fn store_mut(&mut self) -> &mut RecordStore;

    fn schema(&self) -> &Arc<Schema> {
        self.store().schema()
    }

    /// Producing-algorithm tag (empty until the registry sets it).
    fn component(&self) -> &str {
        self.store().component()
    }

    fn set_component(&mut self, component: &str) {
        self.store_mut().set_component(component);
    }

    fn get(&self, name: &str, component: &str) -> Result<f64, SkymeterError> {
        self.store().get(name, component)
    }

    fn get_indexed(&self, i: u32, name: &str, component: &str) -> Result<f64, SkymeterError> {
        self.store().get_indexed(i, name, component)
    }

    fn get_entry(&self, entry: &FieldEntry) -> Result<f64, SkymeterError> {
        self.store().get_entry(entry)
    }

    fn get_entry_indexed(&self, i: u32, entry: &FieldEntry) -> Result<f64, SkymeterError> {
        self.store().get_entry_indexed(i, entry)
    }

    fn get_as_long(&self, name: &str, component: &str) -> Result<i64, SkymeterError> {
        self.store().get_as_long(name, component)
    }

    fn get_as_long_indexed(
        &self,
        i: u32,
        name: &str,
        component: &str,
    ) -> Result<i64, SkymeterError> {
        self.store().get_as_long_indexed(i, name, component)
    }

    fn get_entry_as_long(&self, entry: &FieldEntry) -> Result<i64, SkymeterError> {
        self.store().get_entry_as_long(entry)
    }

    fn get_entry_as_long_indexed(&self, i: u32, entry: &FieldEntry) -> Result<i64, SkymeterError> {
        self.store().get_entry_as_long_indexed(i, entry)
    }
}
