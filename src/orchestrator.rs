use std::io::Write;
use std::thread;

use crate::common::BenchConfig;
use crate::harness::Benchmark;
use crate::timing::{Reporter, TimingRecord};
use crate::{BenchError, CollidedHarness, NativeHarness, NormalHarness};

/// Drives one harness per key variant through fill, query, put and remove.
pub struct Orchestrator {
    harnesses: Vec<Box<dyn Benchmark>>,
}

impl Orchestrator {
    /// Native, Collided and Normal harnesses, in report order.
    pub fn new(config: &BenchConfig) -> Self {
        let harnesses: Vec<Box<dyn Benchmark>> = vec![
            Box::new(NativeHarness::new(config.clone())),
            Box::new(CollidedHarness::new(config.clone())),
            Box::new(NormalHarness::new(config.clone())),
        ];
        Self::with_harnesses(harnesses)
    }

    pub fn with_harnesses(harnesses: Vec<Box<dyn Benchmark>>) -> Self {
        Self { harnesses }
    }

    pub fn harnesses(&self) -> &[Box<dyn Benchmark>] {
        &self.harnesses
    }

    /// Fills every harness on its own scoped worker and waits for all of
    /// them. Workers are always joined before an error is returned.
    pub fn fill_all(&mut self) -> Result<Vec<TimingRecord>, BenchError> {
        thread::scope(|scope| {
            let tasks: Vec<_> = self
                .harnesses
                .iter_mut()
                .map(|h| {
                    let kind = h.kind();
                    (kind, scope.spawn(move || h.fill()))
                })
                .collect();

            let mut records = Vec::with_capacity(tasks.len());
            let mut failure = None;
            for (kind, task) in tasks {
                match task.join() {
                    Ok(Ok(record)) => records.push(record),
                    Ok(Err(e)) => {
                        failure.get_or_insert(e);
                    }
                    Err(_) => {
                        failure.get_or_insert(BenchError::InterruptedWait { kind });
                    }
                }
            }

            match failure {
                Some(e) => Err(e),
                None => Ok(records),
            }
        })
    }

    /// Parallel fill, then query, put and remove phases in harness order,
    /// each record printed as soon as it is produced.
    pub fn run<W: Write>(&mut self, reporter: &mut Reporter<W>) -> Result<(), BenchError> {
        let fills = self.fill_all()?;
        reporter.records(&fills)?;

        for h in &self.harnesses {
            reporter.records(&h.query()?)?;
        }
        for h in &mut self.harnesses {
            let record = h.put()?;
            reporter.records([&record])?;
        }
        for h in &mut self.harnesses {
            let record = h.remove()?;
            reporter.records([&record])?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::KeyKind;
    use std::time::Duration;

    struct Stalled(KeyKind);

    impl Benchmark for Stalled {
        fn kind(&self) -> KeyKind { self.0 }
        fn len(&self) -> usize { 0 }
        fn fill(&mut self) -> Result<TimingRecord, BenchError> {
            panic!("{} worker died", self.0)
        }
        fn query(&self) -> Result<Vec<TimingRecord>, BenchError> { Ok(Vec::new()) }
        fn put(&mut self) -> Result<TimingRecord, BenchError> {
            Ok(TimingRecord::new("put", Duration::ZERO))
        }
        fn remove(&mut self) -> Result<TimingRecord, BenchError> {
            Ok(TimingRecord::new("remove", Duration::ZERO))
        }
    }

    fn small() -> BenchConfig {
        BenchConfig { population: 64, put_index: 3 }
    }

    #[test]
    fn fill_all_fills_every_variant() {
        let mut o = Orchestrator::new(&small());
        let records = o.fill_all().unwrap();
        let labels: Vec<_> = records.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, ["Native fill takes", "Collided fill takes", "Normal fill takes"]);
        assert!(o.harnesses().iter().all(|h| h.len() == 64));
    }

    #[test]
    fn dead_worker_interrupts_the_wait() {
        let harnesses: Vec<Box<dyn Benchmark>> = vec![
            Box::new(NativeHarness::new(small())),
            Box::new(Stalled(KeyKind::Collided)),
            Box::new(NormalHarness::new(small())),
        ];
        let mut o = Orchestrator::with_harnesses(harnesses);
        let err = o.fill_all().unwrap_err();
        assert!(matches!(err, BenchError::InterruptedWait { kind: KeyKind::Collided }));
        // The healthy workers still ran to completion.
        assert_eq!(o.harnesses()[0].len(), 64);
        assert_eq!(o.harnesses()[2].len(), 64);
    }

    #[test]
    fn interrupted_run_prints_nothing() {
        let harnesses: Vec<Box<dyn Benchmark>> = vec![Box::new(Stalled(KeyKind::Native))];
        let mut o = Orchestrator::with_harnesses(harnesses);
        let mut reporter = Reporter::new(Vec::<u8>::new());
        assert!(o.run(&mut reporter).is_err());
        assert!(reporter.into_inner().is_empty());
    }
}
