//! A stand-in for the native engine's comparator registry.
//!
//! It drives the adapter only through the raw callbacks, the way the engine
//! does, and records enough to check that every comparator is destroyed
//! exactly once and never called outside its validity window.

use std::{
    cmp::Ordering,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering::Relaxed},
    },
};

use cmp_bridge::{
    error::{Error, Result},
    ffi::prelude::*,
};
use parking_lot::{Mutex, RwLock};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

pub fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(EnvFilter::from_default_env())
        .try_init();
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    Created(String),
    Destroyed(String),
}

#[derive(Default)]
struct EngineLog {
    events: Mutex<Vec<Event>>,
    compares: AtomicUsize,
    names: AtomicUsize,
}

#[derive(Clone, Default)]
pub struct MockEngine {
    log: Arc<EngineLog>,
}

impl MockEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<Event> {
        self.log.events.lock().clone()
    }

    pub fn compare_calls(&self) -> usize {
        self.log.compares.load(Relaxed)
    }

    pub fn name_calls(&self) -> usize {
        self.log.names.load(Relaxed)
    }

    pub fn live_comparators(&self) -> usize {
        let events = self.log.events.lock();
        let created = events
            .iter()
            .filter(|e| matches!(e, Event::Created(_)))
            .count();
        created - (events.len() - created)
    }
}

unsafe impl ComparatorRegistry for MockEngine {
    type Comparator = EngineComparator;

    fn create_comparator(&self, raw: RawComparator) -> EngineComparator {
        // the engine reads the name once up front to stamp new databases with it
        let name = unsafe { raw.name() }.to_string_lossy().into_owned();
        self.log.names.fetch_add(1, Relaxed);
        self.log.events.lock().push(Event::Created(name.clone()));

        EngineComparator {
            raw,
            name,
            destroyed: RwLock::new(false),
            log: self.log.clone(),
        }
    }
}

/// The engine's own comparator object. Destroys the adapter on drop, as the
/// engine does when the options holding it are released.
pub struct EngineComparator {
    raw: RawComparator,
    name: String,
    destroyed: RwLock<bool>,
    log: Arc<EngineLog>,
}

impl EngineComparator {
    pub fn raw(&self) -> RawComparator {
        self.raw
    }

    /// The name cached at registration.
    pub fn cached_name(&self) -> &str {
        &self.name
    }

    pub fn compare(&self, a: &[u8], b: &[u8]) -> Result<Ordering> {
        let destroyed = self.destroyed.read();
        if *destroyed {
            return Err(self.after_destroy("compare"));
        }
        self.raw.check_live()?;
        self.log.compares.fetch_add(1, Relaxed);
        Ok(unsafe { self.raw.compare(a, b) })
    }

    pub fn name(&self) -> Result<String> {
        let destroyed = self.destroyed.read();
        if *destroyed {
            return Err(self.after_destroy("name"));
        }
        self.raw.check_live()?;
        self.log.names.fetch_add(1, Relaxed);
        Ok(unsafe { self.raw.name() }.to_string_lossy().into_owned())
    }

    /// Orders `keys` the way the engine lays them out in a table.
    pub fn sort(&self, keys: &mut [Vec<u8>]) -> Result<()> {
        let destroyed = self.destroyed.read();
        if *destroyed {
            return Err(self.after_destroy("sort"));
        }
        self.raw.check_live()?;
        keys.sort_by(|a, b| {
            self.log.compares.fetch_add(1, Relaxed);
            unsafe { self.raw.compare(a, b) }
        });
        Ok(())
    }

    pub fn is_destroyed(&self) -> bool {
        *self.destroyed.read()
    }

    /// Releases the adapter. A second call is reported and never reaches the
    /// destructor.
    pub fn destroy(&self) -> Result<()> {
        let mut destroyed = self.destroyed.write();
        if *destroyed {
            return Err(self.after_destroy("destroy"));
        }
        self.raw.check_live()?;
        unsafe { self.raw.destroy() };
        *destroyed = true;
        self.log
            .events
            .lock()
            .push(Event::Destroyed(self.name.clone()));
        Ok(())
    }

    fn after_destroy(&self, op: &str) -> Error {
        Error::ContractViolation(format!("{op} on destroyed comparator {:?}", self.name))
    }
}

impl Drop for EngineComparator {
    fn drop(&mut self) {
        if !self.is_destroyed() {
            if let Err(e) = self.destroy() {
                tracing::error!("Failed to destroy comparator: {:?}", e);
            }
        }
    }
}
