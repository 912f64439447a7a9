//! Typed indices for grid cells and layer features.
//!
//! Both wrap a `u32` so a `Vec<CellId>` path costs four bytes per step.  The
//! inner value is `pub` for arithmetic inside the grid; everything else goes
//! through `.index()`.

use std::fmt;

macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty) = $label:literal;) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Marks "no cell / no feature"; never produced by [`new`](Self::new).
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// Checked conversion from a `Vec` position.  `None` if `i` does
            /// not fit or would collide with [`INVALID`](Self::INVALID).
            #[inline]
            pub fn new(i: usize) -> Option<Self> {
                <$inner>::try_from(i).ok().filter(|&v| v != <$inner>::MAX).map($name)
            }

            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            #[inline(always)]
            pub fn is_valid(self) -> bool {
                self != Self::INVALID
            }
        }

        impl Default for $name {
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.is_valid() {
                    write!(f, concat!($label, " {}"), self.0)
                } else {
                    f.write_str(concat!($label, " <none>"))
                }
            }
        }
    };
}

typed_id! {
    /// Row-major index of a cost-grid cell (`row * cols + col`).
    pub struct CellId(u32) = "cell";
}

typed_id! {
    /// Position of a feature within its layer (`LayerSet::land_cover[i]`, …).
    pub struct FeatureId(u32) = "feature";
}
