use crate::modulus::barrett::Barrett;
use crate::modulus::{Modulus, ScalarOperations, VectorOperations, REDUCEMOD};
use crate::{apply_sv, apply_v, apply_vsv, apply_vv, apply_vvv};

impl ScalarOperations<u64> for Modulus<u64> {
    /// Applies a modular reduction on a based on REDUCE:
    /// - NONE: no modular reduction.
    /// - ONCE: subtracts q if a >= q.
    /// - TWICE: subtracts 2q if a >= 2q.
    /// - FOURTIMES: subtracts 4q if a >= 4q.
    /// - BARRETT: maps a to a mod q using Barrett reduction.
    /// - BARRETTLAZY: maps a to a mod q using Barrett reduction with values in [0, 2q-1].
    #[inline(always)]
    fn sa_reduce_into_sa<const REDUCE: REDUCEMOD>(&self, a: &mut u64) {
        self.barrett.reduce_assign::<REDUCE>(a);
    }

    #[inline(always)]
    fn sa_reduce_into_sb<const REDUCE: REDUCEMOD>(&self, a: &u64, b: &mut u64) {
        *b = self.barrett.reduce::<REDUCE>(a);
    }

    #[inline(always)]
    fn sa_add_sb_into_sc<const REDUCE: REDUCEMOD>(&self, a: &u64, b: &u64, c: &mut u64) {
        *c = a.wrapping_add(*b);
        self.sa_reduce_into_sa::<REDUCE>(c);
    }

    #[inline(always)]
    fn sa_add_sb_into_sb<const REDUCE: REDUCEMOD>(&self, a: &u64, b: &mut u64) {
        *b = a.wrapping_add(*b);
        self.sa_reduce_into_sa::<REDUCE>(b);
    }

    #[inline(always)]
    fn sa_sub_sb_into_sc<const SBRANGE: u8, const REDUCE: REDUCEMOD>(
        &self,
        a: &u64,
        b: &u64,
        c: &mut u64,
    ) {
        *c = a.wrapping_add(self.q * SBRANGE as u64 - *b);
        self.sa_reduce_into_sa::<REDUCE>(c);
    }

    #[inline(always)]
    fn sa_sub_sb_into_sa<const SBRANGE: u8, const REDUCE: REDUCEMOD>(&self, b: &u64, a: &mut u64) {
        *a = a.wrapping_add(self.q * SBRANGE as u64 - *b);
        self.sa_reduce_into_sa::<REDUCE>(a);
    }

    #[inline(always)]
    fn sa_neg_into_sa<const SARANGE: u8, const REDUCE: REDUCEMOD>(&self, a: &mut u64) {
        *a = self.q * SARANGE as u64 - *a;
        self.sa_reduce_into_sa::<REDUCE>(a);
    }

    #[inline(always)]
    fn sa_neg_into_sb<const SARANGE: u8, const REDUCE: REDUCEMOD>(&self, a: &u64, b: &mut u64) {
        *b = self.q * SARANGE as u64 - *a;
        self.sa_reduce_into_sa::<REDUCE>(b);
    }

    #[inline(always)]
    fn sa_mul_sb_into_sc<const REDUCE: REDUCEMOD>(&self, a: &u64, b: &u64, c: &mut u64) {
        *c = self.barrett.mul::<REDUCE>(*a, *b);
    }

    #[inline(always)]
    fn sa_mul_sb_into_sb<const REDUCE: REDUCEMOD>(&self, a: &u64, b: &mut u64) {
        *b = self.barrett.mul::<REDUCE>(*a, *b);
    }

    #[inline(always)]
    fn sa_mul_sb_barrett_into_sc<const REDUCE: REDUCEMOD>(
        &self,
        a: &u64,
        b: &Barrett<u64>,
        c: &mut u64,
    ) {
        *c = self.barrett.mul_external::<REDUCE>(*b, *a);
    }

    #[inline(always)]
    fn sa_mul_sb_barrett_into_sa<const REDUCE: REDUCEMOD>(&self, b: &Barrett<u64>, a: &mut u64) {
        self.barrett.mul_external_assign::<REDUCE>(*b, a);
    }
}

impl VectorOperations<u64> for Modulus<u64> {
    #[inline(always)]
    fn va_reduce_into_va<const CHUNK: usize, const REDUCE: REDUCEMOD>(&self, a: &mut [u64]) {
        apply_v!(self, Self::sa_reduce_into_sa::<REDUCE>, a, CHUNK);
    }

    #[inline(always)]
    fn va_reduce_into_vb<const CHUNK: usize, const REDUCE: REDUCEMOD>(&self, a: &[u64], b: &mut [u64]) {
        apply_vv!(self, Self::sa_reduce_into_sb::<REDUCE>, a, b, CHUNK);
    }

    #[inline(always)]
    fn va_add_vb_into_vc<const CHUNK: usize, const REDUCE: REDUCEMOD>(
        &self,
        a: &[u64],
        b: &[u64],
        c: &mut [u64],
    ) {
        apply_vvv!(self, Self::sa_add_sb_into_sc::<REDUCE>, a, b, c, CHUNK);
    }

    #[inline(always)]
    fn va_add_vb_into_vb<const CHUNK: usize, const REDUCE: REDUCEMOD>(&self, a: &[u64], b: &mut [u64]) {
        apply_vv!(self, Self::sa_add_sb_into_sb::<REDUCE>, a, b, CHUNK);
    }

    #[inline(always)]
    fn va_sub_vb_into_vc<const CHUNK: usize, const VBRANGE: u8, const REDUCE: REDUCEMOD>(
        &self,
        a: &[u64],
        b: &[u64],
        c: &mut [u64],
    ) {
        apply_vvv!(self, Self::sa_sub_sb_into_sc::<VBRANGE, REDUCE>, a, b, c, CHUNK);
    }

    #[inline(always)]
    fn va_sub_vb_into_va<const CHUNK: usize, const VBRANGE: u8, const REDUCE: REDUCEMOD>(
        &self,
        b: &[u64],
        a: &mut [u64],
    ) {
        apply_vv!(self, Self::sa_sub_sb_into_sa::<VBRANGE, REDUCE>, b, a, CHUNK);
    }

    #[inline(always)]
    fn va_neg_into_va<const CHUNK: usize, const VARANGE: u8, const REDUCE: REDUCEMOD>(
        &self,
        a: &mut [u64],
    ) {
        apply_v!(self, Self::sa_neg_into_sa::<VARANGE, REDUCE>, a, CHUNK);
    }

    #[inline(always)]
    fn va_neg_into_vb<const CHUNK: usize, const VARANGE: u8, const REDUCE: REDUCEMOD>(
        &self,
        a: &[u64],
        b: &mut [u64],
    ) {
        apply_vv!(self, Self::sa_neg_into_sb::<VARANGE, REDUCE>, a, b, CHUNK);
    }

    #[inline(always)]
    fn va_mul_vb_into_vc<const CHUNK: usize, const REDUCE: REDUCEMOD>(
        &self,
        a: &[u64],
        b: &[u64],
        c: &mut [u64],
    ) {
        apply_vvv!(self, Self::sa_mul_sb_into_sc::<REDUCE>, a, b, c, CHUNK);
    }

    #[inline(always)]
    fn va_mul_vb_into_vb<const CHUNK: usize, const REDUCE: REDUCEMOD>(&self, a: &[u64], b: &mut [u64]) {
        apply_vv!(self, Self::sa_mul_sb_into_sb::<REDUCE>, a, b, CHUNK);
    }

    #[inline(always)]
    fn va_mul_sb_barrett_into_vc<const CHUNK: usize, const REDUCE: REDUCEMOD>(
        &self,
        a: &[u64],
        b: &Barrett<u64>,
        c: &mut [u64],
    ) {
        apply_vsv!(self, Self::sa_mul_sb_barrett_into_sc::<REDUCE>, a, b, c, CHUNK);
    }

    #[inline(always)]
    fn va_mul_sb_barrett_into_va<const CHUNK: usize, const REDUCE: REDUCEMOD>(
        &self,
        b: &Barrett<u64>,
        a: &mut [u64],
    ) {
        apply_sv!(self, Self::sa_mul_sb_barrett_into_sa::<REDUCE>, b, a, CHUNK);
    }
}
