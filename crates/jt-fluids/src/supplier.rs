//! Constants supplier seam and the process-lifetime constants cache.

use crate::catalog::FluidCatalog;
use crate::constants::FluidConstants;
use crate::error::{FluidError, FluidResult};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::debug;

/// Source of pure-component constants, keyed by a fluid identifier.
pub trait ConstantsSupplier: Send + Sync {
    /// Returns the constants for `id` or [`FluidError::UnknownFluid`].
    fn lookup(&self, id: &str) -> FluidResult<FluidConstants>;
}

impl ConstantsSupplier for FluidCatalog {
    fn lookup(&self, id: &str) -> FluidResult<FluidConstants> {
        match self.find(id) {
            Some(record) => record.to_constants(),
            None => Err(FluidError::UnknownFluid { id: id.to_string() }),
        }
    }
}

impl<S: ConstantsSupplier + ?Sized> ConstantsSupplier for Arc<S> {
    fn lookup(&self, id: &str) -> FluidResult<FluidConstants> {
        (**self).lookup(id)
    }
}

/// Lazily populated, shared cache in front of a [`ConstantsSupplier`].
///
/// Concurrent first lookups of the same id may both hit the supplier; the
/// first inserted entry wins and readers never see a partial entry.
#[derive(Debug)]
pub struct ConstantsCache<S = FluidCatalog> {
    supplier: S,
    entries: RwLock<HashMap<String, Arc<FluidConstants>>>,
}

impl Default for ConstantsCache<FluidCatalog> {
    fn default() -> Self {
        Self::new(FluidCatalog::builtin())
    }
}

impl<S: ConstantsSupplier> ConstantsCache<S> {
    pub fn new(supplier: S) -> Self {
        Self {
            supplier,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn supplier(&self) -> &S {
        &self.supplier
    }

    pub fn get(&self, id: &str) -> FluidResult<Arc<FluidConstants>> {
        let key = id.trim().to_ascii_lowercase();
        if key.is_empty() {
            return Err(FluidError::invalid("fluid identifier is empty"));
        }

        if let Some(hit) = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            return Ok(Arc::clone(hit));
        }

        // Supplier call stays outside the lock.
        let constants = Arc::new(self.supplier.lookup(id.trim())?);
        debug!(fluid = %key, name = constants.name(), "cached fluid constants");

        let mut entries = self
            .entries
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        Ok(Arc::clone(entries.entry(key).or_insert(constants)))
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counting {
        calls: AtomicUsize,
    }

    impl ConstantsSupplier for Counting {
        fn lookup(&self, id: &str) -> FluidResult<FluidConstants> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            FluidCatalog::builtin().lookup(id)
        }
    }

    #[test]
    fn catalog_supplier_reports_unknown_fluid() {
        let err = FluidCatalog::builtin().lookup("unobtainium").unwrap_err();
        assert_eq!(
            err,
            FluidError::UnknownFluid {
                id: "unobtainium".into()
            }
        );
    }

    #[test]
    fn cache_hits_supplier_once_per_key() {
        let cache = ConstantsCache::new(Counting {
            calls: AtomicUsize::new(0),
        });
        let a = cache.get("Methane").unwrap();
        let b = cache.get(" methane ").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.supplier().calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn failed_lookups_are_not_cached() {
        let cache = ConstantsCache::default();
        assert!(cache.get("unobtainium").is_err());
        assert!(cache.is_empty());
        assert!(matches!(
            cache.get("   "),
            Err(FluidError::InvalidInput { .. })
        ));
    }

    #[test]
    fn concurrent_first_access_yields_one_entry() {
        let cache = Arc::new(ConstantsCache::default());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || cache.get("propane").unwrap())
            })
            .collect();
        let first = cache.get("propane").unwrap();
        for handle in handles {
            let got = handle.join().unwrap();
            assert_eq!(*got, *first);
        }
        assert_eq!(cache.len(), 1);
    }
}
