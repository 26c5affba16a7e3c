use crate::modulus::barrett::{Barrett, BarrettPrecomp};
use crate::modulus::ReduceOnce;
use crate::modulus::{BARRETT, BARRETTLAZY, FOURTIMES, NONE, ONCE, REDUCEMOD, TWICE};

use num_bigint::BigUint;

impl BarrettPrecomp<u64> {
    pub fn new(q: u64) -> BarrettPrecomp<u64> {
        let big_r: BigUint =
            (BigUint::from(1u64) << ((u64::BITS << 1) as usize)) / BigUint::from(q);
        let digits: Vec<u64> = big_r.to_u64_digits();
        Self {
            q,
            lo: digits.first().copied().unwrap_or(0),
            hi: digits.get(1).copied().unwrap_or(0),
        }
    }

    /// Reduces x in place according to REDUCE:
    /// - NONE: no modular reduction.
    /// - ONCE: subtracts q if x >= q.
    /// - TWICE: subtracts 2q if x >= 2q.
    /// - FOURTIMES: subtracts 4q if x >= 4q.
    /// - BARRETT: maps x to x mod q.
    /// - BARRETTLAZY: maps x to [0, 2q-1] with x = x mod q.
    #[inline(always)]
    pub fn reduce_assign<const REDUCE: REDUCEMOD>(&self, x: &mut u64) {
        match REDUCE {
            NONE => {}
            ONCE => x.reduce_once_assign(self.q),
            TWICE => x.reduce_once_assign(self.q << 1),
            FOURTIMES => x.reduce_once_assign(self.q << 2),
            BARRETT => {
                let mhi: u64 = ((*x as u128 * self.hi as u128) >> 64) as u64;
                *x -= mhi.wrapping_mul(self.q);
                x.reduce_once_assign(self.q);
            }
            BARRETTLAZY => {
                let mhi: u64 = ((*x as u128 * self.hi as u128) >> 64) as u64;
                *x -= mhi.wrapping_mul(self.q);
            }
            _ => unreachable!("invalid REDUCE argument"),
        }
    }

    #[inline(always)]
    pub fn reduce<const REDUCE: REDUCEMOD>(&self, x: &u64) -> u64 {
        let mut r: u64 = *x;
        self.reduce_assign::<REDUCE>(&mut r);
        r
    }

    /// Returns z mod q in [0, 2q), then applies REDUCE (any value other
    /// than NONE or BARRETTLAZY yields the canonical residue).
    #[inline(always)]
    pub fn reduce_u128<const REDUCE: REDUCEMOD>(&self, z: u128) -> u64 {
        let (z_lo, z_hi): (u64, u64) = (z as u64, (z >> 64) as u64);
        // floor(z * (hi * 2^64 + lo) / 2^128)
        let lo_lo: u128 = (z_lo as u128 * self.lo as u128) >> 64;
        let lo_hi: u128 = z_lo as u128 * self.hi as u128;
        let hi_lo: u128 = z_hi as u128 * self.lo as u128;
        let mid: u128 = (lo_hi & u64::MAX as u128) + (hi_lo & u64::MAX as u128) + lo_lo;
        let quotient: u64 = z_hi
            .wrapping_mul(self.hi)
            .wrapping_add((lo_hi >> 64) as u64)
            .wrapping_add((hi_lo >> 64) as u64)
            .wrapping_add((mid >> 64) as u64);
        let mut r: u64 = z_lo.wrapping_sub(quotient.wrapping_mul(self.q));
        match REDUCE {
            NONE | BARRETTLAZY => {}
            _ => r.reduce_once_assign(self.q),
        }
        r
    }

    /// Returns a * b mod q.
    #[inline(always)]
    pub fn mul<const REDUCE: REDUCEMOD>(&self, a: u64, b: u64) -> u64 {
        self.reduce_u128::<REDUCE>(a as u128 * b as u128)
    }

    #[inline(always)]
    pub fn prepare(&self, v: u64) -> Barrett<u64> {
        debug_assert!(v < self.q);
        let quotient: u64 = (((v as u128) << 64) / self.q as u128) as _;
        Barrett(v, quotient)
    }

    /// Returns lhs * rhs mod q in [0, 2q) before REDUCE, for any rhs.
    #[inline(always)]
    pub fn mul_external<const REDUCE: REDUCEMOD>(&self, lhs: Barrett<u64>, rhs: u64) -> u64 {
        let mut r: u64 = rhs;
        self.mul_external_assign::<REDUCE>(lhs, &mut r);
        r
    }

    #[inline(always)]
    pub fn mul_external_assign<const REDUCE: REDUCEMOD>(&self, lhs: Barrett<u64>, rhs: &mut u64) {
        let t: u64 = ((*lhs.quotient() as u128 * *rhs as u128) >> 64) as _;
        *rhs = (rhs.wrapping_mul(*lhs.value())).wrapping_sub(self.q.wrapping_mul(t));
        self.reduce_assign::<REDUCE>(rhs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const Q: u64 = 0x1fffffffffe00001;

    #[test]
    fn barrett_reduce() {
        let precomp: BarrettPrecomp<u64> = BarrettPrecomp::new(Q);
        for &x in &[0, 1, Q - 1, Q, Q + 1, 2 * Q + 5, u64::MAX - 1, u64::MAX] {
            assert_eq!(precomp.reduce::<BARRETT>(&x), x % Q);
            assert!(precomp.reduce::<BARRETTLAZY>(&x) < 2 * Q);
        }
    }

    #[test]
    fn barrett_mul() {
        let precomp: BarrettPrecomp<u64> = BarrettPrecomp::new(Q);
        let values: [u64; 6] = [0, 1, 2, 0xdeadbeef, Q >> 1, Q - 1];
        for &a in &values {
            for &b in &values {
                let want: u64 = ((a as u128 * b as u128) % Q as u128) as u64;
                assert_eq!(precomp.mul::<ONCE>(a, b), want);
            }
        }
    }

    #[test]
    fn shoup_mul() {
        let precomp: BarrettPrecomp<u64> = BarrettPrecomp::new(Q);
        let w: Barrett<u64> = precomp.prepare(Q - 3);
        for &x in &[0, 1, Q - 1, 3 * Q + 7, u64::MAX] {
            let want: u64 = ((x as u128 * (Q - 3) as u128) % Q as u128) as u64;
            let lazy: u64 = precomp.mul_external::<NONE>(w, x);
            assert!(lazy < 2 * Q);
            assert_eq!(lazy % Q, want);
            assert_eq!(precomp.mul_external::<ONCE>(w, x), want);
        }
    }
}
