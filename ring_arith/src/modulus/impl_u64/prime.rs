use crate::error::{Error, Result};
use crate::modulus::prime::Prime;
use crate::modulus::{Modulus, ONCE};
use primality_test::is_prime;
use prime_factorization::Factorization;

impl Prime<u64> {
    /// Returns a new instance of Prime<u64>.
    /// Fails if q is not an odd prime or does not fit in 62 bits.
    pub fn new(q: u64) -> Result<Self> {
        let modulus: Modulus<u64> = Modulus::new(q)?;
        if q == 2 || !is_prime(q) {
            return Err(Error::InvalidModulus {
                q,
                reason: "modulus must be an odd prime",
            });
        }
        let factors: Vec<u64> = Factorization::run(q - 1)
            .prime_factor_repr()
            .iter()
            .map(|factor| factor.0)
            .collect();
        Ok(Self {
            modulus,
            factors,
            phi: q - 1,
        })
    }

    #[inline(always)]
    pub fn q(&self) -> u64 {
        self.modulus.q
    }

    /// Returns x^exponent mod q.
    #[inline(always)]
    pub fn pow(&self, x: u64, exponent: u64) -> u64 {
        let mut x: u64 = x;
        let mut y: u64 = 1;
        let mut i: u64 = exponent;
        while i > 0 {
            if i & 1 == 1 {
                y = self.modulus.barrett.mul::<ONCE>(y, x);
            }
            x = self.modulus.barrett.mul::<ONCE>(x, x);
            i >>= 1;
        }
        y
    }

    /// Returns x^-1 mod q.
    /// User must ensure that x is not divisible by q.
    #[inline(always)]
    pub fn inv(&self, x: u64) -> u64 {
        self.pow(x, self.phi - 1)
    }

    /// Returns the smallest generator of the multiplicative group mod q.
    pub fn primitive_root(&self) -> Result<u64> {
        (2..self.q())
            .find(|&g| {
                self.factors
                    .iter()
                    .all(|&factor| self.pow(g, self.phi / factor) != 1)
            })
            .ok_or(Error::NoPrimitiveRoot {
                order: self.phi,
                q: self.q(),
            })
    }

    /// Returns a primitive nth_root-th root of unity mod q, derived from
    /// the smallest generator. Fails unless nth_root divides q-1.
    pub fn primitive_nth_root(&self, nth_root: u64) -> Result<u64> {
        if nth_root == 0 || self.phi % nth_root != 0 {
            return Err(Error::NoPrimitiveRoot {
                order: nth_root,
                q: self.q(),
            });
        }

        let psi: u64 = self.pow(self.primitive_root()?, self.phi / nth_root);

        debug_assert_eq!(self.pow(psi, nth_root), 1);
        debug_assert!(nth_root & 1 == 1 || self.pow(psi, nth_root >> 1) == self.q() - 1);

        Ok(psi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_composites() {
        assert!(Prime::<u64>::new(15).is_err());
        assert!(Prime::<u64>::new(2).is_err());
        assert!(Prime::<u64>::new(1 << 62).is_err());
    }

    #[test]
    fn primitive_roots() {
        let prime: Prime<u64> = Prime::new(17).unwrap();
        assert_eq!(prime.factors, vec![2]);
        assert_eq!(prime.primitive_root().unwrap(), 3);
        assert_eq!(prime.primitive_nth_root(8).unwrap(), 9);
        assert_eq!(prime.inv(9), 2);
        assert_eq!(
            prime.primitive_nth_root(3),
            Err(Error::NoPrimitiveRoot { order: 3, q: 17 })
        );

        let q: u64 = 0x1fffffffffe00001;
        let prime: Prime<u64> = Prime::new(q).unwrap();
        let nth_root: u64 = 1 << 12;
        let psi: u64 = prime.primitive_nth_root(nth_root).unwrap();
        assert_eq!(prime.pow(psi, nth_root), 1);
        assert_eq!(prime.pow(psi, nth_root >> 1), q - 1);
        assert_eq!(prime.modulus.mul(psi, prime.inv(psi)), 1);
    }
}
