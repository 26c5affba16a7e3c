/// A constant w stored with its Shoup quotient floor(w * 2^64 / q),
/// for repeated multiplications by w.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Barrett<O>(pub O, pub O);

impl<O> Barrett<O> {
    #[inline(always)]
    pub fn value(&self) -> &O {
        &self.0
    }

    #[inline(always)]
    pub fn quotient(&self) -> &O {
        &self.1
    }
}

/// Barrett ratio floor(2^128 / q) split in two words.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BarrettPrecomp<O> {
    pub q: O,
    pub lo: O,
    pub hi: O,
}

impl<O> BarrettPrecomp<O> {
    #[inline(always)]
    pub fn value_hi(&self) -> &O {
        &self.hi
    }

    #[inline(always)]
    pub fn value_lo(&self) -> &O {
        &self.lo
    }
}
