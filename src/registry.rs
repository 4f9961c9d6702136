//! # Name-keyed algorithm registry
//!
//! Two layers, mirroring how a measurement run is configured:
//!
//! - [`AlgorithmRegistry`] — the process-wide factory table for one
//!   (result family, sample type) pair. Algorithm modules register their
//!   factories through an explicit registration routine (see
//!   [`photometry::register_builtins`](crate::photometry::register_builtins))
//!   that runs exactly once, inside a `LazyLock`, before any lookup — there
//!   is no static-initializer ordering to get wrong.
//! - [`MeasureQuantity`] — one configured measuring instance: an
//!   insertion-ordered set of active algorithms resolved by name from the
//!   registry, plus [`measure`](MeasureQuantity::measure) which runs them all
//!   over a sample and collects the tagged records into a fresh
//!   [`Measurement`].
//!
//! Re-registering a name, at either layer, is a **documented last-wins
//! overwrite**: `declare` returns the replaced factory, and
//! [`add_algorithm`](MeasureQuantity::add_algorithm) on an already-active
//! name replaces the instance in place, keeping its position in the run
//! order.

use std::collections::HashMap;
use std::sync::Arc;

use crate::measurement::Measurement;
use crate::record::Record;
use crate::skymeter_errors::SkymeterError;

/// One measurement algorithm: consumes a sample, produces a record of the
/// family `R`.
pub trait MeasureAlgorithm<R: ?Sized, S> {
    fn measure(&self, sample: &S) -> Result<Box<R>, SkymeterError>;
}

/// Zero-argument factory producing a fresh algorithm instance.
pub type AlgorithmFactory<R, S> = fn() -> Box<dyn MeasureAlgorithm<R, S>>;

/// Factory table mapping algorithm names to [`AlgorithmFactory`] entries for
/// one (result family, sample type) pair.
pub struct AlgorithmRegistry<R: ?Sized, S> {
    factories: HashMap<String, AlgorithmFactory<R, S>>,
}

impl<R: ?Sized, S> AlgorithmRegistry<R, S> {
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Register `factory` under `name`.
    ///
    /// Last registration wins; the previously registered factory, if any, is
    /// returned so the caller can detect the overwrite.
    pub fn declare(
        &mut self,
        name: &str,
        factory: AlgorithmFactory<R, S>,
    ) -> Option<AlgorithmFactory<R, S>> {
        self.factories.insert(name.to_owned(), factory)
    }

    /// Resolve `name` to its factory.
    pub fn lookup(&self, name: &str) -> Result<AlgorithmFactory<R, S>, SkymeterError> {
        self.factories
            .get(name)
            .copied()
            .ok_or_else(|| SkymeterError::UnknownAlgorithm(name.to_owned()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered names, sorted for stable listings.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl<R: ?Sized, S> Default for AlgorithmRegistry<R, S> {
    fn default() -> Self {
        Self::new()
    }
}

/// A configured measuring instance for one quantity family.
///
/// Holds the registry it resolves names against and the insertion-ordered
/// list of active algorithms. Configuration (`add_algorithm`) and execution
/// (`measure`) may be interleaved freely; each `measure` call builds a fresh
/// composite.
pub struct MeasureQuantity<R: ?Sized, S> {
    registry: Arc<AlgorithmRegistry<R, S>>,
    active: Vec<(String, Box<dyn MeasureAlgorithm<R, S>>)>,
}

impl<R: Record + ?Sized, S> MeasureQuantity<R, S> {
    pub fn new(registry: Arc<AlgorithmRegistry<R, S>>) -> Self {
        Self {
            registry,
            active: Vec::new(),
        }
    }

    /// Activate the algorithm registered under `name`.
    ///
    /// The registered name becomes the component tag of the record this
    /// algorithm produces on every subsequent [`measure`](Self::measure)
    /// call. Re-adding an active name replaces its instance in place.
    ///
    /// Return
    /// ----------
    /// * `Err(SkymeterError::UnknownAlgorithm)` if `name` was never declared.
    pub fn add_algorithm(&mut self, name: &str) -> Result<(), SkymeterError> {
        let factory = self.registry.lookup(name)?;
        let instance = factory();
        match self.active.iter_mut().find(|(n, _)| n == name) {
            Some(slot) => slot.1 = instance,
            None => self.active.push((name.to_owned(), instance)),
        }
        Ok(())
    }

    /// Active algorithm names in run order.
    pub fn algorithms(&self) -> impl Iterator<Item = &str> {
        self.active.iter().map(|(name, _)| name.as_str())
    }

    /// Run every active algorithm over `sample`.
    ///
    /// Each produced record is tagged with its algorithm's registered name
    /// and appended, in activation order, to a newly built [`Measurement`].
    /// The first failing algorithm aborts the whole call; no partial
    /// composite is returned.
    pub fn measure(&self, sample: &S) -> Result<Measurement<R>, SkymeterError> {
        let mut values = Measurement::new();
        for (name, algorithm) in &self.active {
            let mut record = algorithm.measure(sample)?;
            record.set_component(name);
            values.add(record);
        }
        Ok(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Record, RecordBuilder, RecordStore};
    use crate::schema::{FieldEntry, FieldType, Schema};
    use std::fmt;
    use std::sync::Arc;

    struct Reading {
        store: RecordStore,
    }

    impl Reading {
        fn new(value: f64) -> Result<Self, SkymeterError> {
            let mut schema = Schema::new();
            schema.add(FieldEntry::new("value", 0, FieldType::Double));
            let mut b = RecordBuilder::new(Arc::new(schema));
            b.set(0, value)?;
            Ok(Self { store: b.freeze()? })
        }
    }

    impl fmt::Display for Reading {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{}", self.store.value::<f64>(0))
        }
    }

    impl Record for Reading {
        fn store(&self) -> &RecordStore {
            &self.store
        }

        fn store_mut(&mut self) -> &mut RecordStore {
            &mut self.store
        }
    }

    struct Double;

    impl MeasureAlgorithm<dyn Record, f64> for Double {
        fn measure(&self, sample: &f64) -> Result<Box<dyn Record>, SkymeterError> {
            Ok(Box::new(Reading::new(2.0 * sample)?))
        }
    }

    struct Triple;

    impl MeasureAlgorithm<dyn Record, f64> for Triple {
        fn measure(&self, sample: &f64) -> Result<Box<dyn Record>, SkymeterError> {
            Ok(Box::new(Reading::new(3.0 * sample)?))
        }
    }

    fn registry() -> Arc<AlgorithmRegistry<dyn Record, f64>> {
        let mut reg = AlgorithmRegistry::new();
        reg.declare("double", || Box::new(Double));
        reg.declare("triple", || Box::new(Triple));
        Arc::new(reg)
    }

    #[test]
    fn lookup_unknown_name_fails() {
        let reg = registry();
        assert_eq!(
            reg.lookup("bogus").unwrap_err(),
            SkymeterError::UnknownAlgorithm("bogus".to_owned())
        );
        assert!(reg.contains("double"));
        assert_eq!(reg.names(), ["double", "triple"]);
    }

    #[test]
    fn declare_overwrites_last_wins() {
        let mut reg: AlgorithmRegistry<dyn Record, f64> = AlgorithmRegistry::new();
        assert!(reg.declare("alg", || Box::new(Double)).is_none());
        assert!(reg.declare("alg", || Box::new(Triple)).is_some());

        let mut quantity = MeasureQuantity::new(Arc::new(reg));
        quantity.add_algorithm("alg").unwrap();
        let values = quantity.measure(&10.0).unwrap();
        assert_eq!(values.find("alg").unwrap().get("value", "").unwrap(), 30.0);
    }

    #[test]
    fn measure_runs_active_algorithms_in_order() {
        let mut quantity = MeasureQuantity::new(registry());
        quantity.add_algorithm("triple").unwrap();
        quantity.add_algorithm("double").unwrap();
        assert_eq!(quantity.algorithms().collect::<Vec<_>>(), ["triple", "double"]);

        let values = quantity.measure(&2.0).unwrap();
        assert_eq!(values.len(), 2);
        let read: Vec<f64> = values.iter().map(|r| r.get("value", "").unwrap()).collect();
        assert_eq!(read, [6.0, 4.0]);
    }

    #[test]
    fn re_adding_replaces_in_place() {
        let mut quantity = MeasureQuantity::new(registry());
        quantity.add_algorithm("double").unwrap();
        quantity.add_algorithm("triple").unwrap();
        quantity.add_algorithm("double").unwrap();

        let values = quantity.measure(&1.0).unwrap();
        assert_eq!(values.len(), 2);
        // Position of the first activation is preserved.
        let components: Vec<&str> = values.iter().map(|r| r.component()).collect();
        assert_eq!(components, ["double", "triple"]);
    }

    #[test]
    fn add_unknown_algorithm_fails() {
        let mut quantity = MeasureQuantity::new(registry());
        assert_eq!(
            quantity.add_algorithm("bogus").unwrap_err(),
            SkymeterError::UnknownAlgorithm("bogus".to_owned())
        );
    }
}
