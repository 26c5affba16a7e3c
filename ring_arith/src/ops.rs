//! Flat operations over the process-wide [`TransformCache`].
//!
//! Buffer arguments must hold at least n (resp. phi) elements; only the
//! first n are read or written.

use crate::cache::{RootPowers, TransformCache};
use crate::cyclotomic;
use crate::dft::NttEngine;
use crate::eltwise;
use crate::error::{Error, Result};
use crate::modulus;
use crate::poly;

fn prefix<'a>(context: &'static str, a: &'a [u64], n: usize) -> Result<&'a [u64]> {
    a.get(..n).ok_or(Error::BufferTooShort {
        context,
        needed: n,
        got: a.len(),
    })
}

fn prefix_mut<'a>(context: &'static str, a: &'a mut [u64], n: usize) -> Result<&'a mut [u64]> {
    let got: usize = a.len();
    a.get_mut(..n).ok_or(Error::BufferTooShort {
        context,
        needed: n,
        got,
    })
}

pub fn add_mod(a: u64, b: u64, q: u64) -> Result<u64> {
    modulus::add_mod(a, b, q)
}

pub fn sub_mod(a: u64, b: u64, q: u64) -> Result<u64> {
    modulus::sub_mod(a, b, q)
}

pub fn multiply_mod(a: u64, b: u64, q: u64) -> Result<u64> {
    modulus::multiply_mod(a, b, q)
}

pub fn power_mod(base: u64, exp: u64, q: u64) -> Result<u64> {
    modulus::power_mod(base, exp, q)
}

/// Forward root powers of the cached (n, q) context.
pub fn get_forward_roots(n: usize, q: u64) -> Result<RootPowers> {
    TransformCache::global().forward_roots(n, q)
}

/// Inverse root powers of the cached (n, q) context.
pub fn get_inverse_roots(n: usize, q: u64) -> Result<RootPowers> {
    TransformCache::global().inverse_roots(n, q)
}

pub fn eltwise_add_mod(result: &mut [u64], op1: &[u64], op2: &[u64], n: usize, q: u64) -> Result<()> {
    let context: &'static str = "eltwise_add_mod";
    eltwise::add_mod(
        prefix_mut(context, result, n)?,
        prefix(context, op1, n)?,
        prefix(context, op2, n)?,
        q,
    )
}

pub fn eltwise_sub_mod(result: &mut [u64], op1: &[u64], op2: &[u64], n: usize, q: u64) -> Result<()> {
    let context: &'static str = "eltwise_sub_mod";
    eltwise::sub_mod(
        prefix_mut(context, result, n)?,
        prefix(context, op1, n)?,
        prefix(context, op2, n)?,
        q,
    )
}

pub fn eltwise_mult_mod(result: &mut [u64], op1: &[u64], op2: &[u64], n: usize, q: u64) -> Result<()> {
    let context: &'static str = "eltwise_mult_mod";
    eltwise::mult_mod(
        prefix_mut(context, result, n)?,
        prefix(context, op1, n)?,
        prefix(context, op2, n)?,
        q,
    )
}

pub fn eltwise_reduce_mod(result: &mut [u64], operand: &[u64], n: usize, q: u64) -> Result<()> {
    let context: &'static str = "eltwise_reduce_mod";
    eltwise::reduce_mod(
        prefix_mut(context, result, n)?,
        prefix(context, operand, n)?,
        q,
    )
}

/// In-place cyclic forward NTT of buffer\[..n\].
pub fn ntt_forward_in_place(buffer: &mut [u64], n: usize, q: u64) -> Result<()> {
    let buffer: &mut [u64] = prefix_mut("ntt_forward_in_place", buffer, n)?;
    NttEngine::global().forward_inplace(buffer, n, q, 1)
}

/// In-place cyclic inverse NTT of buffer\[..n\], scaled by n^-1.
pub fn ntt_inverse_in_place(buffer: &mut [u64], n: usize, q: u64) -> Result<()> {
    let buffer: &mut [u64] = prefix_mut("ntt_inverse_in_place", buffer, n)?;
    NttEngine::global().inverse_inplace(buffer, n, q, 1)
}

/// result\[..n\] = op1 * op2 mod (X^n - 1, q).
pub fn multiply_poly(result: &mut [u64], op1: &[u64], op2: &[u64], n: usize, q: u64) -> Result<()> {
    let context: &'static str = "multiply_poly";
    poly::multiply(
        TransformCache::global(),
        prefix_mut(context, result, n)?,
        prefix(context, op1, n)?,
        prefix(context, op2, n)?,
        n,
        q,
    )
}

/// Folding reduction of op1 * op2 into result\[..phi\], see
/// [`cyclotomic::reduce_cyclotomic`].
pub fn polynomial_multiply_cyclotomic_mod(
    result: &mut [u64],
    op1: &[u64],
    op2: &[u64],
    phi: usize,
    q: u64,
) -> Result<()> {
    let context: &'static str = "polynomial_multiply_cyclotomic_mod";
    cyclotomic::reduce_cyclotomic(
        TransformCache::global(),
        prefix_mut(context, result, phi)?,
        prefix(context, op1, phi)?,
        prefix(context, op2, phi)?,
        phi,
        q,
    )
}
