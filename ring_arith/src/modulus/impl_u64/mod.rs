pub mod barrett;
pub mod operations;
pub mod prime;

use crate::error::{Error, Result};
use crate::modulus::barrett::BarrettPrecomp;
use crate::modulus::{Modulus, ReduceOnce, MAX_MODULUS_BITS};

impl ReduceOnce<u64> for u64 {
    #[inline(always)]
    fn reduce_once_constant_time_assign(&mut self, q: u64) {
        debug_assert!(q < 0x8000000000000000, "2q >= 2^64");
        *self -= (q.wrapping_sub(*self) >> 63) * q;
    }

    #[inline(always)]
    fn reduce_once_constant_time(&self, q: u64) -> u64 {
        debug_assert!(q < 0x8000000000000000, "2q >= 2^64");
        self - (q.wrapping_sub(*self) >> 63) * q
    }

    #[inline(always)]
    fn reduce_once_assign(&mut self, q: u64) {
        debug_assert!(q < 0x8000000000000000, "2q >= 2^64");
        *self = (*self).min(self.wrapping_sub(q))
    }

    #[inline(always)]
    fn reduce_once(&self, q: u64) -> u64 {
        debug_assert!(q < 0x8000000000000000, "2q >= 2^64");
        (*self).min(self.wrapping_sub(q))
    }
}

impl Modulus<u64> {
    /// Returns the precomputed constants for q.
    /// Fails if q <= 1 or if q does not fit in [`MAX_MODULUS_BITS`] bits.
    pub fn new(q: u64) -> Result<Self> {
        if q <= 1 {
            return Err(Error::InvalidModulus {
                q,
                reason: "modulus must be greater than one",
            });
        }
        if q >> MAX_MODULUS_BITS != 0 {
            return Err(Error::InvalidModulus {
                q,
                reason: "modulus must fit in 62 bits",
            });
        }
        Ok(Self {
            q,
            two_q: q << 1,
            four_q: q << 2,
            barrett: BarrettPrecomp::new(q),
        })
    }

    #[inline(always)]
    pub fn q(&self) -> u64 {
        self.q
    }

    /// Returns x mod q for any x.
    #[inline(always)]
    pub fn reduce(&self, x: u64) -> u64 {
        self.barrett.reduce::<{ crate::modulus::BARRETT }>(&x)
    }

    /// Returns a * b mod q, a and b being residues.
    #[inline(always)]
    pub fn mul(&self, a: u64, b: u64) -> u64 {
        debug_assert!(a < self.q, "a:{} q:{}", a, self.q);
        debug_assert!(b < self.q, "b:{} q:{}", b, self.q);
        self.barrett.mul::<{ crate::modulus::ONCE }>(a, b)
    }

    /// Checks that every element of a is a residue modulo q.
    pub fn check_residues(&self, a: &[u64]) -> Result<()> {
        match a.iter().position(|&x| x >= self.q) {
            Some(index) => Err(Error::OperandOutOfRange {
                index,
                value: a[index],
                q: self.q,
            }),
            None => Ok(()),
        }
    }

    /// Same as [`Modulus::check_residues`] but on the elements a[i * stride], i < n.
    pub fn check_residues_strided(&self, a: &[u64], n: usize, stride: usize) -> Result<()> {
        match a.iter().step_by(stride).take(n).position(|&x| x >= self.q) {
            Some(i) => Err(Error::OperandOutOfRange {
                index: i * stride,
                value: a[i * stride],
                q: self.q,
            }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reduce_once() {
        let q: u64 = 17;
        assert_eq!(16u64.reduce_once(q), 16);
        assert_eq!(17u64.reduce_once(q), 0);
        assert_eq!(33u64.reduce_once(q), 16);
        assert_eq!(33u64.reduce_once_constant_time(q), 16);
        let mut x: u64 = 20;
        x.reduce_once_constant_time_assign(q);
        assert_eq!(x, 3);
    }

    #[test]
    fn modulus_bounds() {
        assert!(Modulus::<u64>::new(0).is_err());
        assert!(Modulus::<u64>::new(1).is_err());
        assert!(Modulus::<u64>::new(1 << 62).is_err());
        assert!(Modulus::<u64>::new((1 << 62) - 57).is_ok());
    }

    #[test]
    fn residue_checks() {
        let m: Modulus<u64> = Modulus::new(17).unwrap();
        assert!(m.check_residues(&[0, 16, 3]).is_ok());
        assert_eq!(
            m.check_residues(&[0, 16, 17]),
            Err(Error::OperandOutOfRange {
                index: 2,
                value: 17,
                q: 17
            })
        );
        // Only the strided lattice is inspected.
        assert!(m.check_residues_strided(&[1, 99, 2, 99], 2, 2).is_ok());
        assert_eq!(
            m.check_residues_strided(&[1, 0, 18, 0], 2, 2),
            Err(Error::OperandOutOfRange {
                index: 2,
                value: 18,
                q: 17
            })
        );
    }
}
