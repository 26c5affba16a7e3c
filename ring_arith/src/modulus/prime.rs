use crate::modulus::Modulus;

/// An NTT-friendly prime modulus together with the
/// distinct prime factors of q-1.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Prime<O> {
    pub modulus: Modulus<O>,
    /// distinct factors of q-1
    pub factors: Vec<O>,
    /// q-1
    pub phi: O,
}
