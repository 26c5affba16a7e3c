//! Modular polynomial arithmetic over Z_q\[X\] backed by a number-theoretic
//! transform.
//!
//! The crate is organised bottom-up:
//! - [`modulus`]: scalar and vector arithmetic modulo a word-sized q,
//!   Barrett and Shoup precomputations, primes and their roots of unity.
//! - [`dft`]: the per-(n, q) [`TransformContext`] and the strided
//!   forward/inverse transforms.
//! - [`cache`]: a thread-safe, process-wide cache of transform contexts.
//! - [`eltwise`], [`poly`] and [`cyclotomic`]: element-wise vector
//!   operations, polynomial products and reduction modulo a cyclotomic.
//! - [`ops`]: flat free functions over the global cache.

pub mod cache;
pub mod config;
pub mod cyclotomic;
pub mod dft;
pub mod eltwise;
pub mod error;
pub mod modulus;
pub mod ops;
pub mod poly;

pub use cache::{RootPowers, TransformCache};
pub use config::CacheConfig;
pub use cyclotomic::ProductWidth;
pub use dft::ntt::TransformContext;
pub use dft::{Convolution, NttEngine};
pub use error::{Error, Result};

/// Unrolling factor of the vector kernels.
pub const CHUNK: usize = 8;

pub mod macros {

    /// Applies $f to every element of $a in place.
    #[macro_export]
    macro_rules! apply_v {
        ($self:expr, $f:expr, $a:expr, $CHUNK:expr) => {
            match $CHUNK {
                8 => {
                    $a.chunks_exact_mut(8).for_each(|a| {
                        $f($self, &mut a[0]);
                        $f($self, &mut a[1]);
                        $f($self, &mut a[2]);
                        $f($self, &mut a[3]);
                        $f($self, &mut a[4]);
                        $f($self, &mut a[5]);
                        $f($self, &mut a[6]);
                        $f($self, &mut a[7]);
                    });

                    let n: usize = $a.len();
                    let m: usize = n - (n & 7);
                    $a[m..].iter_mut().for_each(|a| {
                        $f($self, a);
                    });
                }
                _ => {
                    $a.iter_mut().for_each(|a| {
                        $f($self, a);
                    });
                }
            }
        };
    }

    /// Applies $f(a\[i\], b\[i\]) writing into b.
    #[macro_export]
    macro_rules! apply_vv {
        ($self:expr, $f:expr, $a:expr, $b:expr, $CHUNK:expr) => {
            let n: usize = $a.len();
            debug_assert!(
                $b.len() == n,
                "invalid argument b: b.len() = {} != a.len() = {}",
                $b.len(),
                n
            );
            debug_assert!(
                $CHUNK & ($CHUNK - 1) == 0,
                "invalid CHUNK const: not a power of two"
            );

            match $CHUNK {
                8 => {
                    ::itertools::izip!($a.chunks_exact(8), $b.chunks_exact_mut(8)).for_each(
                        |(a, b)| {
                            $f($self, &a[0], &mut b[0]);
                            $f($self, &a[1], &mut b[1]);
                            $f($self, &a[2], &mut b[2]);
                            $f($self, &a[3], &mut b[3]);
                            $f($self, &a[4], &mut b[4]);
                            $f($self, &a[5], &mut b[5]);
                            $f($self, &a[6], &mut b[6]);
                            $f($self, &a[7], &mut b[7]);
                        },
                    );

                    let m: usize = n - (n & 7);
                    ::itertools::izip!($a[m..].iter(), $b[m..].iter_mut()).for_each(|(a, b)| {
                        $f($self, a, b);
                    });
                }
                _ => {
                    ::itertools::izip!($a.iter(), $b.iter_mut()).for_each(|(a, b)| {
                        $f($self, a, b);
                    });
                }
            }
        };
    }

    /// Applies $f(a\[i\], b\[i\]) writing into c.
    #[macro_export]
    macro_rules! apply_vvv {
        ($self:expr, $f:expr, $a:expr, $b:expr, $c:expr, $CHUNK:expr) => {
            let n: usize = $a.len();
            debug_assert!(
                $b.len() == n,
                "invalid argument b: b.len() = {} != a.len() = {}",
                $b.len(),
                n
            );
            debug_assert!(
                $c.len() == n,
                "invalid argument c: c.len() = {} != a.len() = {}",
                $c.len(),
                n
            );

            match $CHUNK {
                8 => {
                    ::itertools::izip!(
                        $a.chunks_exact(8),
                        $b.chunks_exact(8),
                        $c.chunks_exact_mut(8)
                    )
                    .for_each(|(a, b, c)| {
                        $f($self, &a[0], &b[0], &mut c[0]);
                        $f($self, &a[1], &b[1], &mut c[1]);
                        $f($self, &a[2], &b[2], &mut c[2]);
                        $f($self, &a[3], &b[3], &mut c[3]);
                        $f($self, &a[4], &b[4], &mut c[4]);
                        $f($self, &a[5], &b[5], &mut c[5]);
                        $f($self, &a[6], &b[6], &mut c[6]);
                        $f($self, &a[7], &b[7], &mut c[7]);
                    });

                    let m: usize = n - (n & 7);
                    ::itertools::izip!($a[m..].iter(), $b[m..].iter(), $c[m..].iter_mut())
                        .for_each(|(a, b, c)| {
                            $f($self, a, b, c);
                        });
                }
                _ => {
                    ::itertools::izip!($a.iter(), $b.iter(), $c.iter_mut()).for_each(
                        |(a, b, c)| {
                            $f($self, a, b, c);
                        },
                    );
                }
            }
        };
    }

    /// Applies $f(s, b\[i\]) writing into b.
    #[macro_export]
    macro_rules! apply_sv {
        ($self:expr, $f:expr, $s:expr, $b:expr, $CHUNK:expr) => {
            match $CHUNK {
                8 => {
                    $b.chunks_exact_mut(8).for_each(|b| {
                        $f($self, $s, &mut b[0]);
                        $f($self, $s, &mut b[1]);
                        $f($self, $s, &mut b[2]);
                        $f($self, $s, &mut b[3]);
                        $f($self, $s, &mut b[4]);
                        $f($self, $s, &mut b[5]);
                        $f($self, $s, &mut b[6]);
                        $f($self, $s, &mut b[7]);
                    });

                    let n: usize = $b.len();
                    let m: usize = n - (n & 7);
                    $b[m..].iter_mut().for_each(|b| {
                        $f($self, $s, b);
                    });
                }
                _ => {
                    $b.iter_mut().for_each(|b| {
                        $f($self, $s, b);
                    });
                }
            }
        };
    }

    /// Applies $f(a\[i\], s) writing into c.
    #[macro_export]
    macro_rules! apply_vsv {
        ($self:expr, $f:expr, $a:expr, $s:expr, $c:expr, $CHUNK:expr) => {
            let n: usize = $a.len();
            debug_assert!(
                $c.len() == n,
                "invalid argument c: c.len() = {} != a.len() = {}",
                $c.len(),
                n
            );

            match $CHUNK {
                8 => {
                    ::itertools::izip!($a.chunks_exact(8), $c.chunks_exact_mut(8)).for_each(
                        |(a, c)| {
                            $f($self, &a[0], $s, &mut c[0]);
                            $f($self, &a[1], $s, &mut c[1]);
                            $f($self, &a[2], $s, &mut c[2]);
                            $f($self, &a[3], $s, &mut c[3]);
                            $f($self, &a[4], $s, &mut c[4]);
                            $f($self, &a[5], $s, &mut c[5]);
                            $f($self, &a[6], $s, &mut c[6]);
                            $f($self, &a[7], $s, &mut c[7]);
                        },
                    );

                    let m: usize = n - (n & 7);
                    ::itertools::izip!($a[m..].iter(), $c[m..].iter_mut()).for_each(|(a, c)| {
                        $f($self, a, $s, c);
                    });
                }
                _ => {
                    ::itertools::izip!($a.iter(), $c.iter_mut()).for_each(|(a, c)| {
                        $f($self, a, $s, c);
                    });
                }
            }
        };
    }
}
