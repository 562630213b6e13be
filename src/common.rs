/// Number of keys each map is filled with.
pub const POPULATION: usize = 30_000;

/// Population index whose field value the put benchmark reuses.
pub const PUT_INDEX: usize = 1_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchConfig {
    pub population: usize, // keys per map
    pub put_index: usize,  // index of the key re-inserted by `put`
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            population: POPULATION,
            put_index: PUT_INDEX,
        }
    }
}

impl BenchConfig {
    /// Population indices of the retained `first`, `mid` and `last` keys.
    #[inline]
    pub fn probe_indices(&self) -> (usize, usize, usize) {
        let n = self.population;
        (0, n / 2, n.saturating_sub(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_probes_match_population() {
        let config = BenchConfig::default();
        assert_eq!(config.population, 30_000);
        assert_eq!(config.probe_indices(), (0, 15_000, 29_999));
    }

    #[test]
    fn tiny_population_probes() {
        let config = BenchConfig { population: 2, ..BenchConfig::default() };
        assert_eq!(config.probe_indices(), (0, 1, 1));
    }
}
