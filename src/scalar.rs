use std::fmt::{self, Debug};

use num_traits::{Num, NumCast};

use crate::mbr::MbrKind;

/// Numeric capability required of a box coordinate scalar.
///
/// Exactly two scalars are supported: `i32` and `f64`. The shared box logic is
/// written once against this trait; the runtime kind tag keeps boxes of
/// different scalars from ever being compared as equal.
pub trait MbrNum: Num + NumCast + PartialOrd + Copy + Debug + Send + Sync {
    /// The runtime kind reported by boxes built from this scalar.
    const KIND: MbrKind;

    /// Write one coordinate in the diagnostic string form.
    fn fmt_coord(self, f: &mut fmt::Formatter<'_>) -> fmt::Result;

    /// Promote to `f64` for area arithmetic and axis ordering.
    fn as_f64(self) -> f64 {
        // i32 and f64 both promote losslessly
        self.to_f64().expect("coordinate scalar promotes to f64")
    }
}

impl MbrNum for i32 {
    const KIND: MbrKind = MbrKind::Int32;

    fn fmt_coord(self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl MbrNum for f64 {
    const KIND: MbrKind = MbrKind::Float64;

    fn fmt_coord(self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}", self)
    }
}
