use crate::error::{Error, Result};
use crate::modulus::barrett::Barrett;
use crate::modulus::prime::Prime;
use crate::modulus::ReduceOnce;
use crate::modulus::WordOps;
use crate::modulus::{NONE, ONCE};
use itertools::izip;

/// Precomputed tables of a length-n NTT modulo q.
///
/// Holds the powers of a primitive 2n-th root of unity psi and of its
/// inverse in bit-reversed order, each with its Shoup quotient, and n^-1
/// mod q. Built once by [`TransformContext::new`] and immutable afterwards.
///
/// The same tables serve both convolutions:
/// - cyclic, Z_q\[X\]/(X^n - 1): group j of a layer with m groups uses
///   psi_rev\[j\], i.e. the powers of omega = psi^2.
/// - negacyclic, Z_q\[X\]/(X^n + 1): group j uses psi_rev\[m + j\].
///
/// Forward outputs are in bit-reversed order; the inverse takes that
/// order back to natural order and includes the 1/n scaling.
#[derive(Debug)]
pub struct TransformContext {
    n: usize,
    log_n: u32,
    prime: Prime<u64>,
    psi: u64,
    psi_forward_rev: Vec<u64>,
    psi_forward_rev_shoup: Vec<Barrett<u64>>,
    psi_backward_rev: Vec<u64>,
    psi_backward_rev_shoup: Vec<Barrett<u64>>,
    n_inv: Barrett<u64>,
}

impl TransformContext {
    /// Builds the tables for a length-n transform modulo q.
    ///
    /// Fails if n is not a power of two >= 2, if q is not an odd prime
    /// below 2^62, or if q != 1 mod 2n.
    pub fn new(n: usize, q: u64) -> Result<Self> {
        if n < 2 || !n.is_power_of_two() {
            return Err(Error::UnsupportedLength { n });
        }

        let prime: Prime<u64> = Prime::new(q)?;

        let nth_root: u64 = (n as u64)
            .checked_mul(2)
            .ok_or(Error::UnsupportedLength { n })?;
        let psi: u64 = prime.primitive_nth_root(nth_root)?;
        let psi_inv: u64 = prime.inv(psi);

        let log_n: u32 = n.log2() as u32;

        let mut psi_forward_rev: Vec<u64> = vec![0; n];
        let mut psi_backward_rev: Vec<u64> = vec![0; n];

        let mut powers_forward: u64 = 1u64;
        let mut powers_backward: u64 = 1u64;

        for i in 0..n {
            let i_rev: usize = i.reverse_bits_msb(log_n);
            psi_forward_rev[i_rev] = powers_forward;
            psi_backward_rev[i_rev] = powers_backward;
            powers_forward = prime.modulus.mul(powers_forward, psi);
            powers_backward = prime.modulus.mul(powers_backward, psi_inv);
        }

        let barrett = &prime.modulus.barrett;
        let psi_forward_rev_shoup: Vec<Barrett<u64>> =
            psi_forward_rev.iter().map(|&w| barrett.prepare(w)).collect();
        let psi_backward_rev_shoup: Vec<Barrett<u64>> =
            psi_backward_rev.iter().map(|&w| barrett.prepare(w)).collect();
        let n_inv: Barrett<u64> = barrett.prepare(prime.inv(n as u64));

        Ok(Self {
            n,
            log_n,
            prime,
            psi,
            psi_forward_rev,
            psi_forward_rev_shoup,
            psi_backward_rev,
            psi_backward_rev_shoup,
            n_inv,
        })
    }

    #[inline(always)]
    pub fn n(&self) -> usize {
        self.n
    }

    #[inline(always)]
    pub fn log_n(&self) -> u32 {
        self.log_n
    }

    #[inline(always)]
    pub fn q(&self) -> u64 {
        self.prime.q()
    }

    #[inline(always)]
    pub fn prime(&self) -> &Prime<u64> {
        &self.prime
    }

    /// The primitive 2n-th root of unity the tables are built from.
    #[inline(always)]
    pub fn psi(&self) -> u64 {
        self.psi
    }

    /// psi^i stored at index bit_reverse(i), i < n.
    #[inline(always)]
    pub fn forward_roots(&self) -> &[u64] {
        &self.psi_forward_rev
    }

    /// psi^-i stored at index bit_reverse(i), i < n.
    #[inline(always)]
    pub fn inverse_roots(&self) -> &[u64] {
        &self.psi_backward_rev
    }

    /// n^-1 mod q.
    #[inline(always)]
    pub fn n_inv(&self) -> u64 {
        *self.n_inv.value()
    }

    /// Smallest slice length holding n elements spaced by stride.
    #[inline(always)]
    pub fn strided_len(&self, stride: usize) -> usize {
        (self.n - 1) * stride + 1
    }

    fn check_lattice(&self, context: &'static str, len: usize, stride: usize) -> Result<()> {
        if stride == 0 {
            return Err(Error::InvalidStride { context });
        }
        let needed: usize = (self.n - 1)
            .checked_mul(stride)
            .and_then(|x| x.checked_add(1))
            .ok_or(Error::BufferTooShort {
                context,
                needed: usize::MAX,
                got: len,
            })?;
        if len < needed {
            return Err(Error::BufferTooShort {
                context,
                needed,
                got: len,
            });
        }
        Ok(())
    }

    /// Forward transform of src\[i * input_stride\] into dst\[i * output_stride\],
    /// i < n. Elements of dst outside the output lattice are left untouched.
    pub fn forward<const NEGACYCLIC: bool>(
        &self,
        dst: &mut [u64],
        src: &[u64],
        input_stride: usize,
        output_stride: usize,
    ) -> Result<()> {
        self.copy_lattice("forward", dst, src, input_stride, output_stride)?;
        self.forward_core::<NEGACYCLIC>(dst, output_stride);
        Ok(())
    }

    /// Inverse transform of src\[i * input_stride\] into dst\[i * output_stride\],
    /// i < n, including the scaling by n^-1.
    pub fn inverse<const NEGACYCLIC: bool>(
        &self,
        dst: &mut [u64],
        src: &[u64],
        input_stride: usize,
        output_stride: usize,
    ) -> Result<()> {
        self.copy_lattice("inverse", dst, src, input_stride, output_stride)?;
        self.inverse_core::<NEGACYCLIC>(dst, output_stride);
        Ok(())
    }

    /// In-place forward transform of a\[i * stride\], i < n.
    pub fn forward_inplace<const NEGACYCLIC: bool>(&self, a: &mut [u64], stride: usize) -> Result<()> {
        self.check_lattice("forward_inplace", a.len(), stride)?;
        self.prime
            .modulus
            .check_residues_strided(a, self.n, stride)?;
        self.forward_core::<NEGACYCLIC>(a, stride);
        Ok(())
    }

    /// In-place inverse transform of a\[i * stride\], i < n.
    pub fn inverse_inplace<const NEGACYCLIC: bool>(&self, a: &mut [u64], stride: usize) -> Result<()> {
        self.check_lattice("inverse_inplace", a.len(), stride)?;
        self.prime
            .modulus
            .check_residues_strided(a, self.n, stride)?;
        self.inverse_core::<NEGACYCLIC>(a, stride);
        Ok(())
    }

    fn copy_lattice(
        &self,
        context: &'static str,
        dst: &mut [u64],
        src: &[u64],
        input_stride: usize,
        output_stride: usize,
    ) -> Result<()> {
        self.check_lattice(context, src.len(), input_stride)?;
        self.check_lattice(context, dst.len(), output_stride)?;
        self.prime
            .modulus
            .check_residues_strided(src, self.n, input_stride)?;
        izip!(
            dst.iter_mut().step_by(output_stride),
            src.iter().step_by(input_stride)
        )
        .take(self.n)
        .for_each(|(d, s)| *d = *s);
        Ok(())
    }

    /// Unchecked forward transform. Inputs must be residues on a lattice of
    /// n elements spaced by stride; outputs are residues.
    pub(crate) fn forward_core<const NEGACYCLIC: bool>(&self, a: &mut [u64], stride: usize) {
        let n: usize = self.n;
        let log_n: u32 = self.log_n;
        let a: &mut [u64] = &mut a[..self.strided_len(stride)];

        for layer in 0..log_n {
            let (m, size) = (1 << layer, 1 << (log_n - layer - 1));
            let t: usize = 2 * size;
            let psi: &[Barrett<u64>] = if NEGACYCLIC {
                &self.psi_forward_rev_shoup[m..2 * m]
            } else {
                &self.psi_forward_rev_shoup[..m]
            };
            if stride == 1 && size >= 8 {
                izip!(a.chunks_exact_mut(t), psi).for_each(|(a, psi)| {
                    let (a, b) = a.split_at_mut(size);
                    izip!(a.chunks_exact_mut(8), b.chunks_exact_mut(8)).for_each(|(a, b)| {
                        self.dit_inplace(&mut a[0], &mut b[0], *psi);
                        self.dit_inplace(&mut a[1], &mut b[1], *psi);
                        self.dit_inplace(&mut a[2], &mut b[2], *psi);
                        self.dit_inplace(&mut a[3], &mut b[3], *psi);
                        self.dit_inplace(&mut a[4], &mut b[4], *psi);
                        self.dit_inplace(&mut a[5], &mut b[5], *psi);
                        self.dit_inplace(&mut a[6], &mut b[6], *psi);
                        self.dit_inplace(&mut a[7], &mut b[7], *psi);
                    });
                });
            } else {
                izip!(a.chunks_mut(t * stride), psi).for_each(|(a, psi)| {
                    let (a, b) = a.split_at_mut(size * stride);
                    izip!(a.iter_mut().step_by(stride), b.iter_mut().step_by(stride))
                        .for_each(|(a, b)| self.dit_inplace(a, b, *psi));
                });
            }
        }

        let (q, two_q) = (self.prime.modulus.q, self.prime.modulus.two_q);
        a.iter_mut().step_by(stride).take(n).for_each(|a| {
            a.reduce_once_assign(two_q);
            a.reduce_once_assign(q);
            debug_assert!(*a < q, "forward_core output {} > {} (q-1)", a, q - 1);
        });
    }

    /// Unchecked inverse transform. Inputs must be residues on a lattice of
    /// n elements spaced by stride; outputs are residues.
    pub(crate) fn inverse_core<const NEGACYCLIC: bool>(&self, a: &mut [u64], stride: usize) {
        let n: usize = self.n;
        let log_n: u32 = self.log_n;
        let a: &mut [u64] = &mut a[..self.strided_len(stride)];

        for layer in (0..log_n).rev() {
            let (m, size) = (1 << layer, 1 << (log_n - layer - 1));
            let t: usize = 2 * size;
            let psi: &[Barrett<u64>] = if NEGACYCLIC {
                &self.psi_backward_rev_shoup[m..2 * m]
            } else {
                &self.psi_backward_rev_shoup[..m]
            };
            if stride == 1 && size >= 8 {
                izip!(a.chunks_exact_mut(t), psi).for_each(|(a, psi)| {
                    let (a, b) = a.split_at_mut(size);
                    izip!(a.chunks_exact_mut(8), b.chunks_exact_mut(8)).for_each(|(a, b)| {
                        self.dif_inplace(&mut a[0], &mut b[0], *psi);
                        self.dif_inplace(&mut a[1], &mut b[1], *psi);
                        self.dif_inplace(&mut a[2], &mut b[2], *psi);
                        self.dif_inplace(&mut a[3], &mut b[3], *psi);
                        self.dif_inplace(&mut a[4], &mut b[4], *psi);
                        self.dif_inplace(&mut a[5], &mut b[5], *psi);
                        self.dif_inplace(&mut a[6], &mut b[6], *psi);
                        self.dif_inplace(&mut a[7], &mut b[7], *psi);
                    });
                });
            } else {
                izip!(a.chunks_mut(t * stride), psi).for_each(|(a, psi)| {
                    let (a, b) = a.split_at_mut(size * stride);
                    izip!(a.iter_mut().step_by(stride), b.iter_mut().step_by(stride))
                        .for_each(|(a, b)| self.dif_inplace(a, b, *psi));
                });
            }
        }

        let q: u64 = self.prime.modulus.q;
        let barrett = &self.prime.modulus.barrett;
        a.iter_mut().step_by(stride).take(n).for_each(|a| {
            barrett.mul_external_assign::<ONCE>(self.n_inv, a);
            debug_assert!(*a < q, "inverse_core output {} > {} (q-1)", a, q - 1);
        });
    }

    /// Cooley-Tukey butterfly: (a, b) <- (a + psi * b, a - psi * b).
    /// Inputs in [0, 4q), outputs in [0, 4q).
    #[inline(always)]
    fn dit_inplace(&self, a: &mut u64, b: &mut u64, psi: Barrett<u64>) {
        let (two_q, four_q) = (self.prime.modulus.two_q, self.prime.modulus.four_q);
        debug_assert!(*a < four_q, "a:{} 4q:{}", a, four_q);
        debug_assert!(*b < four_q, "b:{} 4q:{}", b, four_q);
        a.reduce_once_assign(two_q);
        let bt: u64 = self.prime.modulus.barrett.mul_external::<NONE>(psi, *b);
        *b = *a + two_q - bt;
        *a += bt;
    }

    /// Gentleman-Sande butterfly: (a, b) <- (a + b, (a - b) * psi).
    /// Inputs in [0, 2q), outputs in [0, 2q).
    #[inline(always)]
    fn dif_inplace(&self, a: &mut u64, b: &mut u64, psi: Barrett<u64>) {
        let two_q: u64 = self.prime.modulus.two_q;
        debug_assert!(*a < two_q, "a:{} 2q:{}", a, two_q);
        debug_assert!(*b < two_q, "b:{} 2q:{}", b, two_q);
        let d: u64 = self
            .prime
            .modulus
            .barrett
            .mul_external::<NONE>(psi, *a + two_q - *b);
        *a += *b;
        a.reduce_once_assign(two_q);
        *b = d;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables() {
        let ctx: TransformContext = TransformContext::new(4, 17).unwrap();
        assert_eq!(ctx.psi(), 9);
        assert_eq!(ctx.forward_roots(), &[1, 13, 9, 15]);
        assert_eq!(ctx.inverse_roots(), &[1, 4, 2, 8]);
        assert_eq!(ctx.n_inv(), 13);
    }

    #[test]
    fn invalid_parameters() {
        assert_eq!(
            TransformContext::new(6, 17).err(),
            Some(Error::UnsupportedLength { n: 6 })
        );
        assert_eq!(
            TransformContext::new(1, 17).err(),
            Some(Error::UnsupportedLength { n: 1 })
        );
        assert_eq!(
            TransformContext::new(16, 17).err(),
            Some(Error::NoPrimitiveRoot { order: 32, q: 17 })
        );
        assert!(matches!(
            TransformContext::new(4, 15),
            Err(Error::InvalidModulus { q: 15, .. })
        ));
    }

    #[test]
    fn cyclic_forward() {
        let ctx: TransformContext = TransformContext::new(4, 17).unwrap();
        let mut a: Vec<u64> = vec![1, 2, 3, 4];
        ctx.forward_inplace::<false>(&mut a, 1).unwrap();
        // X(1), X(-1), X(omega), X(-omega) with omega = 13.
        assert_eq!(a, vec![10, 15, 6, 7]);
        ctx.inverse_inplace::<false>(&mut a, 1).unwrap();
        assert_eq!(a, vec![1, 2, 3, 4]);
    }

    #[test]
    fn round_trip() {
        let q: u64 = 0x800000000004001;
        let n: usize = 32;
        let ctx: TransformContext = TransformContext::new(n, q).unwrap();
        let b: Vec<u64> = (0..n as u64).map(|i| i.wrapping_mul(0x9e3779b97f4a7c15) % q).collect();

        let mut a: Vec<u64> = b.clone();
        ctx.forward_inplace::<false>(&mut a, 1).unwrap();
        ctx.inverse_inplace::<false>(&mut a, 1).unwrap();
        assert_eq!(a, b);

        ctx.forward_inplace::<true>(&mut a, 1).unwrap();
        ctx.inverse_inplace::<true>(&mut a, 1).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn strided_lattice() {
        let ctx: TransformContext = TransformContext::new(4, 17).unwrap();
        let src: Vec<u64> = vec![1, 99, 99, 2, 99, 99, 3, 99, 99, 4];
        let mut dst: Vec<u64> = vec![42; 7];
        ctx.forward::<false>(&mut dst, &src, 3, 2).unwrap();
        assert_eq!(dst, vec![10, 42, 15, 42, 6, 42, 7]);

        let mut back: Vec<u64> = vec![0; 4];
        ctx.inverse::<false>(&mut back, &dst, 2, 1).unwrap();
        assert_eq!(back, vec![1, 2, 3, 4]);
    }

    #[test]
    fn lattice_errors() {
        let ctx: TransformContext = TransformContext::new(4, 17).unwrap();
        let mut a: Vec<u64> = vec![0; 6];
        assert_eq!(
            ctx.forward_inplace::<false>(&mut a, 0),
            Err(Error::InvalidStride {
                context: "forward_inplace"
            })
        );
        assert_eq!(
            ctx.forward_inplace::<false>(&mut a, 2),
            Err(Error::BufferTooShort {
                context: "forward_inplace",
                needed: 7,
                got: 6
            })
        );
        let mut a: Vec<u64> = vec![1, 2, 17, 4];
        assert_eq!(
            ctx.inverse_inplace::<false>(&mut a, 1),
            Err(Error::OperandOutOfRange {
                index: 2,
                value: 17,
                q: 17
            })
        );
        assert_eq!(a, vec![1, 2, 17, 4]);
    }
}
