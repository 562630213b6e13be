use std::io::{self, Write};
use std::time::{Duration, Instant};

/// One timed block: label, elapsed wall-clock time and the optional result
/// line produced by the block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimingRecord {
    pub label: String,
    pub elapsed: Duration,
    pub detail: Option<String>,
}

impl TimingRecord {
    pub fn new(label: impl Into<String>, elapsed: Duration) -> Self {
        Self { label: label.into(), elapsed, detail: None }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    #[inline]
    pub fn elapsed_ms(&self) -> u128 {
        self.elapsed.as_millis()
    }
}

/// Runs `op` between two clock reads. Nothing is printed here; the caller
/// hands the record to a `Reporter`.
#[inline]
pub fn measure<T, F>(label: impl Into<String>, op: F) -> (T, TimingRecord)
where
    F: FnOnce() -> T,
{
    let label = label.into();
    let start = Instant::now();
    let out = op();
    let elapsed = start.elapsed();
    (out, TimingRecord::new(label, elapsed))
}

/// Line-oriented printer for timing records.
pub struct Reporter<W: Write> {
    out: W,
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Detail line first (if any), then ` --- <label> takes: <ms> ms`.
    pub fn record(&mut self, record: &TimingRecord) -> io::Result<()> {
        if let Some(detail) = &record.detail {
            writeln!(self.out, "{}", detail)?;
        }
        writeln!(self.out, " --- {} takes: {} ms", record.label, record.elapsed_ms())
    }

    pub fn records<'a, I>(&mut self, records: I) -> io::Result<()>
    where
        I: IntoIterator<Item = &'a TimingRecord>,
    {
        for record in records {
            self.record(record)?;
        }
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
