use rand_chacha::rand_core::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_core::RngCore;

const MAXF64: f64 = 9007199254740992.0;

/// Deterministic ChaCha8 stream.
pub struct Source {
    source: ChaCha8Rng,
}

impl Source {
    pub fn new(seed: [u8; 32]) -> Source {
        Source {
            source: ChaCha8Rng::from_seed(seed),
        }
    }

    pub fn new_seed(&mut self) -> [u8; 32] {
        let mut seed: [u8; 32] = [0u8; 32];
        self.source.fill_bytes(&mut seed);
        seed
    }

    /// Independent stream seeded from this one.
    pub fn branch(&mut self) -> Self {
        Source::new(self.new_seed())
    }

    /// Uniform value in [0, max) by rejection on next_u64() & mask.
    /// mask must cover max - 1.
    #[inline(always)]
    pub fn next_u64n(&mut self, max: u64, mask: u64) -> u64 {
        let mut x: u64 = self.next_u64() & mask;
        while x >= max {
            x = self.next_u64() & mask;
        }
        x
    }

    #[inline(always)]
    pub fn next_f64(&mut self, min: f64, max: f64) -> f64 {
        min + ((self.next_u64() << 11 >> 11) as f64) / MAXF64 * (max - min)
    }

    /// Fills a with uniform residues modulo q > 1.
    pub fn fill_residues(&mut self, q: u64, a: &mut [u64]) {
        assert!(q > 1, "invalid modulus q = {}", q);
        let mask: u64 = u64::MAX >> (q - 1).leading_zeros();
        a.iter_mut().for_each(|a| *a = self.next_u64n(q, mask));
    }
}

impl RngCore for Source {
    #[inline(always)]
    fn next_u32(&mut self) -> u32 {
        self.source.next_u32()
    }

    #[inline(always)]
    fn next_u64(&mut self) -> u64 {
        self.source.next_u64()
    }

    #[inline(always)]
    fn fill_bytes(&mut self, bytes: &mut [u8]) {
        self.source.fill_bytes(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic_residues() {
        let mut a: Vec<u64> = vec![0; 64];
        let mut b: Vec<u64> = vec![0; 64];
        Source::new([7u8; 32]).fill_residues(17, &mut a);
        Source::new([7u8; 32]).fill_residues(17, &mut b);
        assert_eq!(a, b);
        assert!(a.iter().all(|&x| x < 17));

        let mut source: Source = Source::new([0u8; 32]);
        let x: f64 = source.next_f64(-1.0, 1.0);
        assert!((-1.0..1.0).contains(&x));
    }
}
