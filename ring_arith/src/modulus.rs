pub mod barrett;
pub mod impl_u64;
pub mod prime;

use crate::error::{Error, Result};

pub type REDUCEMOD = u8;

pub const NONE: REDUCEMOD = 0;
pub const ONCE: REDUCEMOD = 1;
pub const TWICE: REDUCEMOD = 2;
pub const FOURTIMES: REDUCEMOD = 3;
pub const BARRETT: REDUCEMOD = 4;
pub const BARRETTLAZY: REDUCEMOD = 5;

/// Widest modulus accepted by the vector and transform kernels.
/// Lazy butterflies keep values in [0, 4q), which must fit in a u64.
pub const MAX_MODULUS_BITS: u32 = 62;

pub trait WordOps<O> {
    fn log2(self) -> usize;
    fn reverse_bits_msb(self, n: u32) -> O;
    fn mask(self) -> O;
}

impl WordOps<u64> for u64 {
    #[inline(always)]
    fn log2(self) -> usize {
        (u64::BITS - (self - 1).leading_zeros()) as _
    }
    #[inline(always)]
    fn reverse_bits_msb(self, n: u32) -> u64 {
        self.reverse_bits() >> (u64::BITS - n)
    }
    #[inline(always)]
    fn mask(self) -> u64 {
        (1 << self.log2()) - 1
    }
}

impl WordOps<usize> for usize {
    #[inline(always)]
    fn log2(self) -> usize {
        (usize::BITS - (self - 1).leading_zeros()) as _
    }
    #[inline(always)]
    fn reverse_bits_msb(self, n: u32) -> usize {
        self.reverse_bits() >> (usize::BITS - n)
    }
    #[inline(always)]
    fn mask(self) -> usize {
        (1 << self.log2()) - 1
    }
}

pub trait ReduceOnce<O> {
    /// Assigns self-q to self if self >= q in constant time.
    /// User must ensure that 2q fits in O.
    fn reduce_once_constant_time_assign(&mut self, q: O);
    /// Returns self-q if self >= q else self in constant time.
    /// User must ensure that 2q fits in O.
    fn reduce_once_constant_time(&self, q: O) -> O;
    /// Assigns self-q to self if self >= q.
    /// User must ensure that 2q fits in O.
    fn reduce_once_assign(&mut self, q: O);
    /// Returns self-q if self >= q else self.
    /// User must ensure that 2q fits in O.
    fn reduce_once(&self, q: O) -> O;
}

/// Precomputed constants for arithmetic modulo a fixed q < 2^62.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Modulus<O> {
    pub q: O,
    pub two_q: O,
    pub four_q: O,
    pub barrett: barrett::BarrettPrecomp<O>,
}

pub trait ScalarOperations<O> {
    // Applies a parameterized modular reduction.
    fn sa_reduce_into_sa<const REDUCE: REDUCEMOD>(&self, a: &mut O);

    // Assigns a reduced copy of a to b.
    fn sa_reduce_into_sb<const REDUCE: REDUCEMOD>(&self, a: &O, b: &mut O);

    // Assigns a + b to c.
    fn sa_add_sb_into_sc<const REDUCE: REDUCEMOD>(&self, a: &O, b: &O, c: &mut O);

    // Assigns a + b to b.
    fn sa_add_sb_into_sb<const REDUCE: REDUCEMOD>(&self, a: &O, b: &mut O);

    // Assigns a - b to c.
    fn sa_sub_sb_into_sc<const SBRANGE: u8, const REDUCE: REDUCEMOD>(
        &self,
        a: &O,
        b: &O,
        c: &mut O,
    );

    // Assigns a - b to a.
    fn sa_sub_sb_into_sa<const SBRANGE: u8, const REDUCE: REDUCEMOD>(&self, b: &O, a: &mut O);

    // Assigns -a to a.
    fn sa_neg_into_sa<const SARANGE: u8, const REDUCE: REDUCEMOD>(&self, a: &mut O);

    // Assigns -a to b.
    fn sa_neg_into_sb<const SARANGE: u8, const REDUCE: REDUCEMOD>(&self, a: &O, b: &mut O);

    // Assigns a * b to c.
    fn sa_mul_sb_into_sc<const REDUCE: REDUCEMOD>(&self, a: &O, b: &O, c: &mut O);

    // Assigns a * b to b.
    fn sa_mul_sb_into_sb<const REDUCE: REDUCEMOD>(&self, a: &O, b: &mut O);

    // Assigns a * b to c.
    fn sa_mul_sb_barrett_into_sc<const REDUCE: REDUCEMOD>(
        &self,
        a: &O,
        b: &barrett::Barrett<O>,
        c: &mut O,
    );

    // Assigns a * b to a.
    fn sa_mul_sb_barrett_into_sa<const REDUCE: REDUCEMOD>(
        &self,
        b: &barrett::Barrett<O>,
        a: &mut O,
    );
}

pub trait VectorOperations<O> {
    // vec(a) <- vec(a) mod q.
    fn va_reduce_into_va<const CHUNK: usize, const REDUCE: REDUCEMOD>(&self, a: &mut [O]);

    // vec(b) <- vec(a) mod q.
    fn va_reduce_into_vb<const CHUNK: usize, const REDUCE: REDUCEMOD>(&self, a: &[O], b: &mut [O]);

    // vec(c) <- vec(a) + vec(b).
    fn va_add_vb_into_vc<const CHUNK: usize, const REDUCE: REDUCEMOD>(
        &self,
        a: &[O],
        b: &[O],
        c: &mut [O],
    );

    // vec(b) <- vec(a) + vec(b).
    fn va_add_vb_into_vb<const CHUNK: usize, const REDUCE: REDUCEMOD>(&self, a: &[O], b: &mut [O]);

    // vec(c) <- vec(a) - vec(b).
    fn va_sub_vb_into_vc<const CHUNK: usize, const VBRANGE: u8, const REDUCE: REDUCEMOD>(
        &self,
        a: &[O],
        b: &[O],
        c: &mut [O],
    );

    // vec(a) <- vec(a) - vec(b).
    fn va_sub_vb_into_va<const CHUNK: usize, const VBRANGE: u8, const REDUCE: REDUCEMOD>(
        &self,
        b: &[O],
        a: &mut [O],
    );

    // vec(a) <- -vec(a).
    fn va_neg_into_va<const CHUNK: usize, const VARANGE: u8, const REDUCE: REDUCEMOD>(
        &self,
        a: &mut [O],
    );

    // vec(b) <- -vec(a).
    fn va_neg_into_vb<const CHUNK: usize, const VARANGE: u8, const REDUCE: REDUCEMOD>(
        &self,
        a: &[O],
        b: &mut [O],
    );

    // vec(c) <- vec(a) * vec(b).
    fn va_mul_vb_into_vc<const CHUNK: usize, const REDUCE: REDUCEMOD>(
        &self,
        a: &[O],
        b: &[O],
        c: &mut [O],
    );

    // vec(b) <- vec(a) * vec(b).
    fn va_mul_vb_into_vb<const CHUNK: usize, const REDUCE: REDUCEMOD>(&self, a: &[O], b: &mut [O]);

    // vec(c) <- vec(a) * scalar(b).
    fn va_mul_sb_barrett_into_vc<const CHUNK: usize, const REDUCE: REDUCEMOD>(
        &self,
        a: &[O],
        b: &barrett::Barrett<O>,
        c: &mut [O],
    );

    // vec(a) <- vec(a) * scalar(b).
    fn va_mul_sb_barrett_into_va<const CHUNK: usize, const REDUCE: REDUCEMOD>(
        &self,
        b: &barrett::Barrett<O>,
        a: &mut [O],
    );
}

/// Checks that q > 1 for the scalar operations, which accept any 64-bit modulus.
#[inline]
fn check_scalar_modulus(q: u64) -> Result<()> {
    if q <= 1 {
        return Err(Error::InvalidModulus {
            q,
            reason: "modulus must be greater than one",
        });
    }
    Ok(())
}

#[inline]
fn check_residue(index: usize, value: u64, q: u64) -> Result<()> {
    if value >= q {
        return Err(Error::OperandOutOfRange { index, value, q });
    }
    Ok(())
}

/// Returns (a + b) mod q.
///
/// Both operands must be residues modulo q, otherwise
/// [`Error::OperandOutOfRange`] is returned. Any q > 1 is accepted.
pub fn add_mod(a: u64, b: u64, q: u64) -> Result<u64> {
    check_scalar_modulus(q)?;
    check_residue(0, a, q)?;
    check_residue(1, b, q)?;
    let (sum, overflow) = a.overflowing_add(b);
    if overflow || sum >= q {
        Ok(sum.wrapping_sub(q))
    } else {
        Ok(sum)
    }
}

/// Returns (a - b) mod q.
pub fn sub_mod(a: u64, b: u64, q: u64) -> Result<u64> {
    check_scalar_modulus(q)?;
    check_residue(0, a, q)?;
    check_residue(1, b, q)?;
    if a >= b {
        Ok(a - b)
    } else {
        Ok(q - b + a)
    }
}

/// Returns (a * b) mod q using a 128-bit intermediate product.
pub fn multiply_mod(a: u64, b: u64, q: u64) -> Result<u64> {
    check_scalar_modulus(q)?;
    check_residue(0, a, q)?;
    check_residue(1, b, q)?;
    Ok(mul_mod_u128(a, b, q))
}

/// Returns base^exp mod q by binary exponentiation; exp = 0 yields 1.
pub fn power_mod(base: u64, exp: u64, q: u64) -> Result<u64> {
    check_scalar_modulus(q)?;
    check_residue(0, base, q)?;
    let mut x: u64 = base;
    let mut y: u64 = 1;
    let mut e: u64 = exp;
    while e > 0 {
        if e & 1 == 1 {
            y = mul_mod_u128(y, x, q);
        }
        x = mul_mod_u128(x, x, q);
        e >>= 1;
    }
    Ok(y)
}

#[inline(always)]
fn mul_mod_u128(a: u64, b: u64, q: u64) -> u64 {
    ((a as u128 * b as u128) % q as u128) as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_results_are_residues() {
        let q: u64 = 0x1fffffffffe00001;
        let values: [u64; 5] = [0, 1, 2, q >> 1, q - 1];
        for &a in &values {
            for &b in &values {
                assert!(add_mod(a, b, q).unwrap() < q);
                assert!(sub_mod(a, b, q).unwrap() < q);
                assert!(multiply_mod(a, b, q).unwrap() < q);
            }
        }
    }

    #[test]
    fn scalar_identities() {
        let q: u64 = 17;
        for a in 0..q {
            assert_eq!(multiply_mod(a, 0, q).unwrap(), 0);
            assert_eq!(power_mod(a, 0, q).unwrap(), 1);
            assert_eq!(add_mod(a, 0, q).unwrap(), a);
            assert_eq!(sub_mod(a, a, q).unwrap(), 0);
        }
        assert_eq!(add_mod(16, 5, q).unwrap(), 4);
        assert_eq!(sub_mod(3, 5, q).unwrap(), 15);
        assert_eq!(multiply_mod(10, 12, q).unwrap(), 1);
        // 3 generates (Z/17Z)*: 3^8 = -1.
        assert_eq!(power_mod(3, 8, q).unwrap(), 16);
        assert_eq!(power_mod(3, 16, q).unwrap(), 1);
    }

    #[test]
    fn full_width_modulus() {
        let q: u64 = u64::MAX - 58; // largest 64-bit prime
        assert_eq!(add_mod(q - 1, q - 1, q).unwrap(), q - 2);
        assert_eq!(multiply_mod(q - 1, q - 1, q).unwrap(), 1);
        assert_eq!(power_mod(q - 1, 3, q).unwrap(), q - 1);
    }

    #[test]
    fn contract_violations_are_rejected() {
        assert_eq!(
            add_mod(1, 1, 1),
            Err(Error::InvalidModulus {
                q: 1,
                reason: "modulus must be greater than one"
            })
        );
        assert_eq!(
            multiply_mod(3, 17, 17),
            Err(Error::OperandOutOfRange {
                index: 1,
                value: 17,
                q: 17
            })
        );
        assert!(power_mod(20, 2, 17).is_err());
        assert!(sub_mod(0, 0, 0).is_err());
    }

    #[test]
    fn word_ops() {
        assert_eq!(1024usize.log2(), 10);
        assert_eq!(1usize.reverse_bits_msb(3), 4);
        assert_eq!(6u64.reverse_bits_msb(3), 3);
        assert_eq!(17u64.mask(), 31);
    }
}
