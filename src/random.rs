//! Uniform samples for the evasive button.

/// Source of uniform samples in `[0, 1)`.
pub trait RandomSource {
    fn next_unit(&mut self) -> f64;
}

/// Browser randomness: `crypto.getRandomValues` via `getrandom` when the `rng`
/// feature is on, otherwise an LCG seeded from `performance.now()`.
#[derive(Debug, Default)]
pub struct BrowserRandom {
    #[cfg(not(feature = "rng"))]
    state: Option<u64>,
}

impl BrowserRandom {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(feature = "rng")]
impl RandomSource for BrowserRandom {
    fn next_unit(&mut self) -> f64 {
        let mut buf = [0u8; 8];
        match getrandom::getrandom(&mut buf) {
            Ok(()) => unit_from_bits(u64::from_le_bytes(buf)),
            Err(err) => {
                log::warn!("getrandom failed ({err}); falling back to clock");
                unit_from_bits(lcg_step(now_seed()))
            }
        }
    }
}

#[cfg(not(feature = "rng"))]
impl RandomSource for BrowserRandom {
    fn next_unit(&mut self) -> f64 {
        let next = lcg_step(self.state.unwrap_or_else(now_seed));
        self.state = Some(next);
        unit_from_bits(next)
    }
}

/// Replays a fixed list of samples, wrapping around. Handy for deterministic tests.
#[derive(Clone, Debug)]
pub struct FixedRandom {
    values: Vec<f64>,
    next: usize,
}

impl FixedRandom {
    pub fn new(values: impl Into<Vec<f64>>) -> Self {
        Self { values: values.into(), next: 0 }
    }
}

impl RandomSource for FixedRandom {
    fn next_unit(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let v = self.values[self.next % self.values.len()];
        self.next = self.next.wrapping_add(1);
        v
    }
}

fn now_seed() -> u64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| (p.now() * 1000.0) as u64)
        .unwrap_or(0x9E37_79B9_7F4A_7C15)
}

fn lcg_step(state: u64) -> u64 {
    state
        .wrapping_mul(6_364_136_223_846_793_005)
        .wrapping_add(1_442_695_040_888_963_407)
}

/// Top 53 bits as a float in `[0, 1)`.
fn unit_from_bits(bits: u64) -> f64 {
    (bits >> 11) as f64 / (1u64 << 53) as f64
}
