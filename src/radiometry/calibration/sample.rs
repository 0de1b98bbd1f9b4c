//! Raw sensor sample types

use ndarray::Array2;

/// An integer sample type a raw band can be stored in.
pub trait RawSample: Copy + Send + Sync + 'static {
    /// `max - min` of the type, the bit-depth divisor when bits per sample is unknown
    const RANGE: f64;

    fn to_f64(self) -> f64;
}

macro_rules! impl_raw_sample {
    ($($t:ty),*) => {
        $(
            impl RawSample for $t {
                const RANGE: f64 = <$t>::MAX as f64 - <$t>::MIN as f64;

                #[inline]
                fn to_f64(self) -> f64 {
                    self as f64
                }
            }
        )*
    };
}

impl_raw_sample!(u8, u16, i16, u32);

/// Raw band pixels as decoded from a file, shape `(height, width)`.
#[derive(Debug, Clone, PartialEq)]
pub enum RawPixels {
    U8(Array2<u8>),
    U16(Array2<u16>),
    U32(Array2<u32>),
}

impl RawPixels {
    pub fn dim(&self) -> (usize, usize) {
        match self {
            RawPixels::U8(pixels) => pixels.dim(),
            RawPixels::U16(pixels) => pixels.dim(),
            RawPixels::U32(pixels) => pixels.dim(),
        }
    }

    /// Storage bit width of the samples
    pub fn sample_bits(&self) -> u32 {
        match self {
            RawPixels::U8(_) => 8,
            RawPixels::U16(_) => 16,
            RawPixels::U32(_) => 32,
        }
    }
}
