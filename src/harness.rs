use std::collections::HashMap;
use std::fmt::Display;

use crate::common::BenchConfig;
use crate::key::{Key, KeyFactory, KeyHashBuilder, KeyKind, KeyStrategy};
use crate::timing::{measure, TimingRecord};
use crate::BenchError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HarnessState {
    Empty,
    Filled,
}

/// One map under test: filled once, then probed and mutated in place.
pub struct Harness<S: KeyStrategy> {
    config: BenchConfig,
    factory: KeyFactory<S>,
    map: HashMap<Key<S>, Key<S>, KeyHashBuilder>,
    state: HarnessState,
    first: Option<Key<S>>,
    mid: Option<Key<S>>,
    last: Option<Key<S>>,
    skipped: Vec<usize>,
}

fn show<T: Display>(value: Option<&T>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "null".to_string(),
    }
}

impl<S: KeyStrategy> Harness<S> {
    pub fn new(config: BenchConfig) -> Self {
        Self::with_factory(config, Key::<S>::for_index)
    }

    pub fn with_factory(config: BenchConfig, factory: KeyFactory<S>) -> Self {
        let map = HashMap::with_hasher(KeyHashBuilder);
        Self {
            config,
            factory,
            map,
            state: HarnessState::Empty,
            first: None,
            mid: None,
            last: None,
            skipped: Vec::new(),
        }
    }

    #[inline]
    pub fn kind(&self) -> KeyKind {
        S::KIND
    }

    #[inline]
    pub fn state(&self) -> HarnessState {
        self.state
    }

    #[inline]
    pub fn is_filled(&self) -> bool {
        self.state == HarnessState::Filled
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn config(&self) -> &BenchConfig {
        &self.config
    }

    pub fn first(&self) -> Option<&Key<S>> {
        self.first.as_ref()
    }

    pub fn mid(&self) -> Option<&Key<S>> {
        self.mid.as_ref()
    }

    pub fn last(&self) -> Option<&Key<S>> {
        self.last.as_ref()
    }

    /// Population indices whose key could not be constructed during fill.
    pub fn skipped(&self) -> &[usize] {
        &self.skipped
    }

    pub fn get(&self, key: &Key<S>) -> Option<&Key<S>> {
        self.map.get(key)
    }

    fn ensure_filled(&self) -> Result<(), BenchError> {
        if self.is_filled() {
            Ok(())
        } else {
            Err(BenchError::NotFilled { kind: S::KIND })
        }
    }

    /// Inserts one key per population index, each mapping to itself, and
    /// retains the keys at the probe indices. Allowed once per harness.
    pub fn fill(&mut self) -> Result<TimingRecord, BenchError> {
        if self.is_filled() {
            return Err(BenchError::AlreadyFilled { kind: S::KIND });
        }

        let n = self.config.population;
        let (first_idx, mid_idx, last_idx) = self.config.probe_indices();
        let factory = self.factory;
        let map = &mut self.map;
        let (first, mid, last) = (&mut self.first, &mut self.mid, &mut self.last);
        let skipped = &mut self.skipped;

        let ((), record) = measure(format!("{} fill takes", S::KIND), || {
            map.reserve(n);
            for i in 0..n {
                let key = match factory(i) {
                    Ok(key) => key,
                    Err(e) => {
                        eprintln!("{} fill: skipping index {}: {}", S::KIND, i, e);
                        skipped.push(i);
                        continue;
                    }
                };
                map.insert(key.clone(), key.clone());

                if i == first_idx { *first = Some(key.clone()); }
                if i == mid_idx { *mid = Some(key.clone()); }
                if i == last_idx { *last = Some(key); }
            }
        });

        self.state = HarnessState::Filled;
        Ok(record)
    }

    /// Looks up `first`, `mid` and `last`, one timed block each.
    pub fn query(&self) -> Result<Vec<TimingRecord>, BenchError> {
        self.ensure_filled()?;

        let probes = [
            ("first", "First", self.first.as_ref()),
            ("mid", "Mid", self.mid.as_ref()),
            ("last", "Last", self.last.as_ref()),
        ];

        let records = probes
            .into_iter()
            .map(|(name, title, probe)| {
                let label = format!("{} {} query", S::KIND, name);
                let (found, record) = measure(label, || probe.and_then(|k| self.map.get(k)));
                record.with_detail(format!("{} element: {}", title, show(found)))
            })
            .collect();
        Ok(records)
    }

    /// Inserts a fresh key built for the configured put index.
    pub fn put(&mut self) -> Result<TimingRecord, BenchError> {
        self.ensure_filled()?;
        let key = (self.factory)(self.config.put_index)?;
        let (_, record) = self.put_key(key);
        Ok(record)
    }

    /// Timed insert of `key -> key`. Returns the value it replaced, if any.
    pub fn put_key(&mut self, key: Key<S>) -> (Option<Key<S>>, TimingRecord) {
        let map = &mut self.map;
        let (replaced, record) = measure(format!("{} put element", S::KIND), || {
            map.insert(key.clone(), key)
        });
        let detail = format!("{} put element: {}", S::KIND, show(replaced.as_ref()));
        (replaced, record.with_detail(detail))
    }

    /// Removes the retained `first` key.
    pub fn remove(&mut self) -> Result<TimingRecord, BenchError> {
        self.ensure_filled()?;
        let (_, record) = match self.first.clone() {
            Some(first) => self.remove_key(&first),
            None => self.remove_absent(),
        };
        Ok(record)
    }

    /// Timed removal of `key`. Returns the removed value, if any.
    pub fn remove_key(&mut self, key: &Key<S>) -> (Option<Key<S>>, TimingRecord) {
        let map = &mut self.map;
        let (removed, record) =
            measure(format!("{} remove first element", S::KIND), || map.remove(key));
        let detail = format!("{} remove element: {}", S::KIND, show(removed.as_ref()));
        (removed, record.with_detail(detail))
    }

    fn remove_absent(&mut self) -> (Option<Key<S>>, TimingRecord) {
        let ((), record) = measure(format!("{} remove first element", S::KIND), || ());
        (None, record.with_detail(format!("{} remove element: null", S::KIND)))
    }
}

/// Object-safe view of a harness so the orchestrator can drive all
/// variants uniformly.
pub trait Benchmark: Send {
    fn kind(&self) -> KeyKind;
    fn len(&self) -> usize;
    fn fill(&mut self) -> Result<TimingRecord, BenchError>;
    fn query(&self) -> Result<Vec<TimingRecord>, BenchError>;
    fn put(&mut self) -> Result<TimingRecord, BenchError>;
    fn remove(&mut self) -> Result<TimingRecord, BenchError>;
}

impl<S: KeyStrategy> Benchmark for Harness<S> {
    fn kind(&self) -> KeyKind { Harness::kind(self) }
    fn len(&self) -> usize { Harness::len(self) }
    fn fill(&mut self) -> Result<TimingRecord, BenchError> { Harness::fill(self) }
    fn query(&self) -> Result<Vec<TimingRecord>, BenchError> { Harness::query(self) }
    fn put(&mut self) -> Result<TimingRecord, BenchError> { Harness::put(self) }
    fn remove(&mut self) -> Result<TimingRecord, BenchError> { Harness::remove(self) }
}
