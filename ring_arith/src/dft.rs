pub mod ntt;

use crate::cache::TransformCache;
use crate::error::Result;

/// Ring the transform diagonalises.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Convolution {
    /// Z_q\[X\]/(X^n - 1).
    #[default]
    Cyclic,
    /// Z_q\[X\]/(X^n + 1).
    Negacyclic,
}

/// Strided forward and inverse NTTs, resolving (n, q) through a
/// [`TransformCache`].
#[derive(Clone, Copy, Debug)]
pub struct NttEngine<'a> {
    cache: &'a TransformCache,
    convolution: Convolution,
}

impl NttEngine<'static> {
    /// Cyclic engine over [`TransformCache::global`].
    pub fn global() -> Self {
        Self::new(TransformCache::global())
    }
}

impl<'a> NttEngine<'a> {
    pub fn new(cache: &'a TransformCache) -> Self {
        Self {
            cache,
            convolution: Convolution::default(),
        }
    }

    pub fn with_convolution(mut self, convolution: Convolution) -> Self {
        self.convolution = convolution;
        self
    }

    pub fn convolution(&self) -> Convolution {
        self.convolution
    }

    pub fn cache(&self) -> &'a TransformCache {
        self.cache
    }

    /// Transforms the n elements src\[i * input_stride\] into
    /// dst\[i * output_stride\]. Output is in bit-reversed order.
    pub fn forward(
        &self,
        dst: &mut [u64],
        src: &[u64],
        n: usize,
        q: u64,
        input_stride: usize,
        output_stride: usize,
    ) -> Result<()> {
        let ctx = self.cache.get_or_create(n, q)?;
        match self.convolution {
            Convolution::Cyclic => ctx.forward::<false>(dst, src, input_stride, output_stride),
            Convolution::Negacyclic => ctx.forward::<true>(dst, src, input_stride, output_stride),
        }
    }

    /// Inverse of [`NttEngine::forward`], scaled by n^-1.
    pub fn inverse(
        &self,
        dst: &mut [u64],
        src: &[u64],
        n: usize,
        q: u64,
        input_stride: usize,
        output_stride: usize,
    ) -> Result<()> {
        let ctx = self.cache.get_or_create(n, q)?;
        match self.convolution {
            Convolution::Cyclic => ctx.inverse::<false>(dst, src, input_stride, output_stride),
            Convolution::Negacyclic => ctx.inverse::<true>(dst, src, input_stride, output_stride),
        }
    }

    pub fn forward_inplace(&self, a: &mut [u64], n: usize, q: u64, stride: usize) -> Result<()> {
        let ctx = self.cache.get_or_create(n, q)?;
        match self.convolution {
            Convolution::Cyclic => ctx.forward_inplace::<false>(a, stride),
            Convolution::Negacyclic => ctx.forward_inplace::<true>(a, stride),
        }
    }

    pub fn inverse_inplace(&self, a: &mut [u64], n: usize, q: u64, stride: usize) -> Result<()> {
        let ctx = self.cache.get_or_create(n, q)?;
        match self.convolution {
            Convolution::Cyclic => ctx.inverse_inplace::<false>(a, stride),
            Convolution::Negacyclic => ctx.inverse_inplace::<true>(a, stride),
        }
    }
}
