//! Reduction of a polynomial product to a degree < phi representative.
//!
//! The product of two operands of phi coefficients is laid out in a
//! scratch t of 2 phi - 1 coefficients and folded back:
//!
//! ```text
//! t[i - phi] += t[i]   for phi <= i < 2 phi - 1
//! t[i]       -= t[phi] for 0 <= i < phi
//! ```
//!
//! [`ProductWidth`] decides how t is filled.

use crate::cache::TransformCache;
use crate::eltwise;
use crate::error::{Error, Result};
use crate::modulus::{Modulus, ScalarOperations, ONCE};
use crate::poly;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, warn};

/// How the scratch of [`reduce_cyclotomic_with`] is filled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ProductWidth {
    /// Length-phi cyclic convolution into t\[..phi\]. The upper half of t
    /// stays zero, so the fold and the subtraction leave the product
    /// unchanged and the result is op1 * op2 mod (X^phi - 1, q).
    #[default]
    Cyclic,
    /// Full linear product through a zero-padded convolution of length
    /// N = (2 phi - 1).next_power_of_two(). Requires q = 1 mod 2N.
    Full,
}

static CYCLIC_WIDTH_REPORTED: AtomicBool = AtomicBool::new(false);

/// [`reduce_cyclotomic_with`] using [`ProductWidth::Cyclic`].
pub fn reduce_cyclotomic(
    cache: &TransformCache,
    result: &mut [u64],
    op1: &[u64],
    op2: &[u64],
    phi: usize,
    q: u64,
) -> Result<()> {
    reduce_cyclotomic_with(cache, result, op1, op2, phi, q, ProductWidth::default())
}

/// Multiplies op1 by op2 and folds the product into result.
///
/// phi must be a power of two >= 2 and every slice must hold exactly phi
/// residues. Nothing is written to result on failure.
pub fn reduce_cyclotomic_with(
    cache: &TransformCache,
    result: &mut [u64],
    op1: &[u64],
    op2: &[u64],
    phi: usize,
    q: u64,
    width: ProductWidth,
) -> Result<()> {
    if phi < 2 || !phi.is_power_of_two() {
        return Err(Error::UnsupportedLength { n: phi });
    }
    for got in [op1.len(), op2.len(), result.len()] {
        if got != phi {
            return Err(Error::LengthMismatch {
                context: "reduce_cyclotomic",
                expected: phi,
                got,
            });
        }
    }

    let len: usize = (phi << 1) - 1;
    let mut t: Vec<u64> = vec![0; len];

    match width {
        ProductWidth::Cyclic => {
            if !CYCLIC_WIDTH_REPORTED.swap(true, Ordering::Relaxed) {
                warn!(
                    phi,
                    q,
                    "cyclic product width leaves the upper half of the fold empty"
                );
            }
            debug!(phi, q, "cyclotomic reduction of a cyclic product");
            poly::multiply(cache, &mut t[..phi], op1, op2, phi, q)?;
        }
        ProductWidth::Full => {
            let n: usize = len.next_power_of_two();
            debug!(phi, q, n, "cyclotomic reduction of a full product");
            let mut a: Vec<u64> = vec![0; n];
            let mut b: Vec<u64> = vec![0; n];
            a[..phi].copy_from_slice(op1);
            b[..phi].copy_from_slice(op2);
            let mut c: Vec<u64> = vec![0; n];
            poly::multiply(cache, &mut c, &a, &b, n, q)?;
            t.copy_from_slice(&c[..len]);
        }
    }

    let modulus: Modulus<u64> = Modulus::new(q)?;

    let (low, high) = t.split_at_mut(phi);
    low.iter_mut()
        .zip(high.iter())
        .for_each(|(lo, hi)| modulus.sa_add_sb_into_sb::<ONCE>(hi, lo));

    let top: u64 = t[phi];
    t[..phi]
        .iter_mut()
        .for_each(|x| modulus.sa_sub_sb_into_sa::<1, ONCE>(&top, x));

    eltwise::reduce_mod(result, &t[..phi], q)
}
