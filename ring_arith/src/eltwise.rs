//! Checked element-wise modular operations on slices.
//!
//! Strict operations require every input to be a residue modulo q and
//! report the first offending element before anything is written.
//! [`reduce_mod`] accepts any u64. Moduli are limited to
//! [`crate::modulus::MAX_MODULUS_BITS`] bits.

use crate::error::{Error, Result};
use crate::modulus::barrett::Barrett;
use crate::modulus::{Modulus, VectorOperations, BARRETT, ONCE};
use crate::CHUNK;

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

/// Checks lengths and residues of two operands and returns the modulus.
fn prepare_binary(context: &'static str, a: &[u64], b: &[u64], q: u64) -> Result<Modulus<u64>> {
    let modulus: Modulus<u64> = Modulus::new(q)?;
    check_len(context, a.len(), b.len())?;
    modulus.check_residues(a)?;
    modulus.check_residues(b)?;
    Ok(modulus)
}

/// result\[i\] = (op1\[i\] + op2\[i\]) mod q.
pub fn add_mod(result: &mut [u64], op1: &[u64], op2: &[u64], q: u64) -> Result<()> {
    let modulus: Modulus<u64> = prepare_binary("add_mod", op1, op2, q)?;
    check_len("add_mod", op1.len(), result.len())?;
    modulus.va_add_vb_into_vc::<CHUNK, ONCE>(op1, op2, result);
    Ok(())
}

/// a\[i\] = (a\[i\] + b\[i\]) mod q.
pub fn add_mod_inplace(a: &mut [u64], b: &[u64], q: u64) -> Result<()> {
    let modulus: Modulus<u64> = prepare_binary("add_mod_inplace", a, b, q)?;
    modulus.va_add_vb_into_vb::<CHUNK, ONCE>(b, a);
    Ok(())
}

/// result\[i\] = (op1\[i\] - op2\[i\]) mod q.
pub fn sub_mod(result: &mut [u64], op1: &[u64], op2: &[u64], q: u64) -> Result<()> {
    let modulus: Modulus<u64> = prepare_binary("sub_mod", op1, op2, q)?;
    check_len("sub_mod", op1.len(), result.len())?;
    modulus.va_sub_vb_into_vc::<CHUNK, 1, ONCE>(op1, op2, result);
    Ok(())
}

/// a\[i\] = (a\[i\] - b\[i\]) mod q.
pub fn sub_mod_inplace(a: &mut [u64], b: &[u64], q: u64) -> Result<()> {
    let modulus: Modulus<u64> = prepare_binary("sub_mod_inplace", a, b, q)?;
    modulus.va_sub_vb_into_va::<CHUNK, 1, ONCE>(b, a);
    Ok(())
}

/// result\[i\] = (op1\[i\] * op2\[i\]) mod q.
pub fn mult_mod(result: &mut [u64], op1: &[u64], op2: &[u64], q: u64) -> Result<()> {
    let modulus: Modulus<u64> = prepare_binary("mult_mod", op1, op2, q)?;
    check_len("mult_mod", op1.len(), result.len())?;
    modulus.va_mul_vb_into_vc::<CHUNK, ONCE>(op1, op2, result);
    Ok(())
}

/// a\[i\] = (a\[i\] * b\[i\]) mod q.
pub fn mult_mod_inplace(a: &mut [u64], b: &[u64], q: u64) -> Result<()> {
    let modulus: Modulus<u64> = prepare_binary("mult_mod_inplace", a, b, q)?;
    modulus.va_mul_vb_into_vb::<CHUNK, ONCE>(b, a);
    Ok(())
}

/// result\[i\] = operand\[i\] mod q, for any operand value.
pub fn reduce_mod(result: &mut [u64], operand: &[u64], q: u64) -> Result<()> {
    let modulus: Modulus<u64> = Modulus::new(q)?;
    check_len("reduce_mod", operand.len(), result.len())?;
    modulus.va_reduce_into_vb::<CHUNK, BARRETT>(operand, result);
    Ok(())
}

/// a\[i\] = a\[i\] mod q, for any value of a\[i\].
pub fn reduce_mod_inplace(a: &mut [u64], q: u64) -> Result<()> {
    let modulus: Modulus<u64> = Modulus::new(q)?;
    modulus.va_reduce_into_va::<CHUNK, BARRETT>(a);
    Ok(())
}

/// result\[i\] = -operand\[i\] mod q.
pub fn neg_mod(result: &mut [u64], operand: &[u64], q: u64) -> Result<()> {
    let modulus: Modulus<u64> = Modulus::new(q)?;
    check_len("neg_mod", operand.len(), result.len())?;
    modulus.check_residues(operand)?;
    modulus.va_neg_into_vb::<CHUNK, 1, ONCE>(operand, result);
    Ok(())
}

pub fn neg_mod_inplace(a: &mut [u64], q: u64) -> Result<()> {
    let modulus: Modulus<u64> = Modulus::new(q)?;
    modulus.check_residues(a)?;
    modulus.va_neg_into_va::<CHUNK, 1, ONCE>(a);
    Ok(())
}

/// result\[i\] = operand\[i\] * scalar mod q, using a Shoup precomputation
/// of the scalar.
pub fn mult_scalar_mod(result: &mut [u64], operand: &[u64], scalar: u64, q: u64) -> Result<()> {
    let modulus: Modulus<u64> = Modulus::new(q)?;
    check_len("mult_scalar_mod", operand.len(), result.len())?;
    let scalar: Barrett<u64> = prepare_scalar(&modulus, scalar)?;
    modulus.check_residues(operand)?;
    modulus.va_mul_sb_barrett_into_vc::<CHUNK, ONCE>(operand, &scalar, result);
    Ok(())
}

pub fn mult_scalar_mod_inplace(a: &mut [u64], scalar: u64, q: u64) -> Result<()> {
    let modulus: Modulus<u64> = Modulus::new(q)?;
    let scalar: Barrett<u64> = prepare_scalar(&modulus, scalar)?;
    modulus.check_residues(a)?;
    modulus.va_mul_sb_barrett_into_va::<CHUNK, ONCE>(&scalar, a);
    Ok(())
}

fn prepare_scalar(modulus: &Modulus<u64>, scalar: u64) -> Result<Barrett<u64>> {
    if scalar >= modulus.q {
        return Err(Error::OperandOutOfRange {
            index: 0,
            value: scalar,
            q: modulus.q,
        });
    }
    Ok(modulus.barrett.prepare(scalar))
}
