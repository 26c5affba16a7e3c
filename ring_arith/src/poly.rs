//! Polynomial products through the NTT, with schoolbook references.

use crate::cache::TransformCache;
use crate::dft::ntt::TransformContext;
use crate::error::{Error, Result};
use crate::modulus::{Modulus, ScalarOperations, VectorOperations, BARRETT, ONCE};
use crate::CHUNK;
use std::sync::Arc;

fn check_len(context: &'static str, expected: usize, got: usize) -> Result<()> {
    if expected != got {
        return Err(Error::LengthMismatch {
            context,
            expected,
            got,
        });
    }
    Ok(())
}

/// Cyclic convolution: result = op1 * op2 mod (X^n - 1, q).
///
/// Both operands are transformed into scratch buffers, multiplied
/// pointwise, transformed back and reduced into result. All slices must
/// hold exactly n residues. Nothing is written to result on failure.
pub fn multiply(
    cache: &TransformCache,
    result: &mut [u64],
    op1: &[u64],
    op2: &[u64],
    n: usize,
    q: u64,
) -> Result<()> {
    multiply_core::<false>("multiply", cache, result, op1, op2, n, q)
}

/// Negacyclic convolution: result = op1 * op2 mod (X^n + 1, q).
pub fn multiply_negacyclic(
    cache: &TransformCache,
    result: &mut [u64],
    op1: &[u64],
    op2: &[u64],
    n: usize,
    q: u64,
) -> Result<()> {
    multiply_core::<true>("multiply_negacyclic", cache, result, op1, op2, n, q)
}

fn multiply_core<const NEGACYCLIC: bool>(
    context: &'static str,
    cache: &TransformCache,
    result: &mut [u64],
    op1: &[u64],
    op2: &[u64],
    n: usize,
    q: u64,
) -> Result<()> {
    let ctx: Arc<TransformContext> = cache.get_or_create(n, q)?;
    check_len(context, n, op1.len())?;
    check_len(context, n, op2.len())?;
    check_len(context, n, result.len())?;

    let modulus: &Modulus<u64> = &ctx.prime().modulus;
    modulus.check_residues(op1)?;
    modulus.check_residues(op2)?;

    let mut a: Vec<u64> = op1.to_vec();
    let mut b: Vec<u64> = op2.to_vec();
    ctx.forward_core::<NEGACYCLIC>(&mut a, 1);
    ctx.forward_core::<NEGACYCLIC>(&mut b, 1);
    modulus.va_mul_vb_into_vb::<CHUNK, ONCE>(&b, &mut a);
    ctx.inverse_core::<NEGACYCLIC>(&mut a, 1);
    modulus.va_reduce_into_vb::<CHUNK, BARRETT>(&a, result);
    Ok(())
}

/// O(n^2) reference for [`multiply`].
pub fn schoolbook_cyclic(result: &mut [u64], op1: &[u64], op2: &[u64], q: u64) -> Result<()> {
    schoolbook::<false>("schoolbook_cyclic", result, op1, op2, q)
}

/// O(n^2) reference for [`multiply_negacyclic`].
pub fn schoolbook_negacyclic(result: &mut [u64], op1: &[u64], op2: &[u64], q: u64) -> Result<()> {
    schoolbook::<true>("schoolbook_negacyclic", result, op1, op2, q)
}

fn schoolbook<const NEGACYCLIC: bool>(
    context: &'static str,
    result: &mut [u64],
    op1: &[u64],
    op2: &[u64],
    q: u64,
) -> Result<()> {
    let modulus: Modulus<u64> = Modulus::new(q)?;
    let n: usize = op1.len();
    check_len(context, n, op2.len())?;
    check_len(context, n, result.len())?;
    modulus.check_residues(op1)?;
    modulus.check_residues(op2)?;

    let mut acc: Vec<u64> = vec![0; n];
    for (i, a) in op1.iter().enumerate() {
        for (j, b) in op2.iter().enumerate() {
            let mut ab: u64 = 0;
            modulus.sa_mul_sb_into_sc::<ONCE>(a, b, &mut ab);
            let k: usize = i + j;
            if k < n {
                modulus.sa_add_sb_into_sb::<ONCE>(&ab, &mut acc[k]);
            } else if NEGACYCLIC {
                modulus.sa_sub_sb_into_sa::<1, ONCE>(&ab, &mut acc[k - n]);
            } else {
                modulus.sa_add_sb_into_sb::<ONCE>(&ab, &mut acc[k - n]);
            }
        }
    }
    result.copy_from_slice(&acc);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cyclic_small() {
        let cache: TransformCache = TransformCache::default();
        let mut c: Vec<u64> = vec![0; 4];
        multiply(&cache, &mut c, &[1, 2, 3, 4], &[4, 3, 2, 1], 4, 17).unwrap();
        assert_eq!(c, vec![7, 5, 7, 13]);

        let mut d: Vec<u64> = vec![0; 4];
        schoolbook_cyclic(&mut d, &[1, 2, 3, 4], &[4, 3, 2, 1], 17).unwrap();
        assert_eq!(c, d);

        multiply(&cache, &mut c, &[1, 2, 1, 0], &[1, 1, 1, 0], 4, 17).unwrap();
        assert_eq!(c, vec![2, 3, 4, 3]);
    }

    #[test]
    fn negacyclic_small() {
        let cache: TransformCache = TransformCache::default();
        let mut c: Vec<u64> = vec![0; 4];
        multiply_negacyclic(&cache, &mut c, &[1, 2, 1, 0], &[1, 1, 1, 0], 4, 17).unwrap();
        assert_eq!(c, vec![0, 3, 4, 3]);

        multiply_negacyclic(&cache, &mut c, &[1, 2, 3, 4], &[4, 3, 2, 1], 4, 17).unwrap();
        assert_eq!(c, vec![1, 0, 16, 13]);

        let mut d: Vec<u64> = vec![0; 4];
        schoolbook_negacyclic(&mut d, &[1, 2, 3, 4], &[4, 3, 2, 1], 17).unwrap();
        assert_eq!(c, d);
    }

    #[test]
    fn identity_and_shift() {
        let cache: TransformCache = TransformCache::default();
        let q: u64 = 7681;
        let n: usize = 16;
        let a: Vec<u64> = (0..n as u64).map(|i| (i * 481) % q).collect();
        let mut one: Vec<u64> = vec![0; n];
        one[0] = 1;
        let mut c: Vec<u64> = vec![0; n];
        multiply(&cache, &mut c, &a, &one, n, q).unwrap();
        assert_eq!(c, a);

        // X * a rotates a cyclically and negates the wrapped term negacyclically.
        let mut x: Vec<u64> = vec![0; n];
        x[1] = 1;
        multiply(&cache, &mut c, &a, &x, n, q).unwrap();
        assert_eq!(c[0], a[n - 1]);
        assert_eq!(&c[1..], &a[..n - 1]);
        multiply_negacyclic(&cache, &mut c, &a, &x, n, q).unwrap();
        assert_eq!(c[0], (q - a[n - 1]) % q);
        assert_eq!(&c[1..], &a[..n - 1]);
    }

    #[test]
    fn errors_leave_result_untouched() {
        let cache: TransformCache = TransformCache::default();
        let mut c: Vec<u64> = vec![5; 4];
        assert_eq!(
            multiply(&cache, &mut c, &[1, 2, 3, 4], &[4, 3, 2, 1], 4, 19),
            Err(Error::NoPrimitiveRoot { order: 8, q: 19 })
        );
        assert_eq!(
            multiply(&cache, &mut c, &[1, 2, 3], &[4, 3, 2, 1], 4, 17),
            Err(Error::LengthMismatch {
                context: "multiply",
                expected: 4,
                got: 3
            })
        );
        assert!(multiply(&cache, &mut c, &[1, 2, 3, 17], &[4, 3, 2, 1], 4, 17).is_err());
        assert_eq!(c, vec![5; 4]);
    }
}
