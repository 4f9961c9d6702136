//! # Composite measurement results
//!
//! A [`Measurement`] is the ordered result of running one or more algorithms
//! over a single sample: one boxed record per algorithm invocation, each
//! tagged with the producing algorithm's registered name as its component.
//! Elements need not share a concrete type — a composite only depends on the
//! [`Record`](crate::record::Record) capability trait, and rendering
//! dispatches dynamically through each element's own formatter.

use std::fmt;

use smallvec::SmallVec;

use crate::record::Record;

/// Insertion-ordered collection of measurement records.
///
/// `R` is normally a family trait object (`dyn Photometry`,
/// `dyn Astrometry`), so one composite can mix records produced by different
/// algorithms.
pub struct Measurement<R: ?Sized> {
    values: SmallVec<[Box<R>; 4]>,
}

impl<R: Record + ?Sized> Measurement<R> {
    pub fn new() -> Self {
        Self {
            values: SmallVec::new(),
        }
    }

    /// Append one record; insertion order is preserved.
    pub fn add(&mut self, value: Box<R>) {
        self.values.push(value);
    }

    /// Records in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &R> {
        self.values.iter().map(|v| v.as_ref())
    }

    /// The first record whose component tag equals `component`.
    pub fn find(&self, component: &str) -> Option<&R> {
        self.iter().find(|r| r.component() == component)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<R: Record + ?Sized> Default for Measurement<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Record + ?Sized> fmt::Display for Measurement<R> {
    /// Each element bracketed, space-separated, rendered by its own
    /// polymorphic formatter.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, value) in self.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "[{value}]")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Record, RecordBuilder, RecordStore};
    use crate::schema::{FieldEntry, FieldType, Schema};
    use std::fmt;
    use std::sync::Arc;

    struct Plain {
        store: RecordStore,
    }

    impl Plain {
        fn new(value: f64) -> Self {
            let mut schema = Schema::new();
            schema.add(FieldEntry::new("value", 0, FieldType::Double));
            let mut b = RecordBuilder::new(Arc::new(schema));
            b.set(0, value).unwrap();
            Self {
                store: b.freeze().unwrap(),
            }
        }
    }

    impl fmt::Display for Plain {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{}", self.store.value::<f64>(0))
        }
    }

    impl Record for Plain {
        fn store(&self) -> &RecordStore {
            &self.store
        }

        fn store_mut(&mut self) -> &mut RecordStore {
            &mut self.store
        }
    }

    fn composite() -> Measurement<dyn Record> {
        let mut m: Measurement<dyn Record> = Measurement::new();
        for (name, v) in [("a", 1.0), ("b", 2.0)] {
            let mut rec = Plain::new(v);
            rec.set_component(name);
            m.add(Box::new(rec));
        }
        m
    }

    #[test]
    fn find_by_component() {
        let m = composite();
        assert_eq!(m.len(), 2);
        assert_eq!(m.find("b").unwrap().get("value", "").unwrap(), 2.0);
        assert!(m.find("c").is_none());
    }

    #[test]
    fn display_brackets_each_element() {
        let m = composite();
        assert_eq!(m.to_string(), "[1] [2]");
    }
}
