use std::cmp::Ordering;

/// Totally ordered wrapper around `f32`, so costs can be used with `min_by_key` and friends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrdF32(pub f32);

impl Eq for OrdF32 {}

impl PartialOrd for OrdF32 {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OrdF32 {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

pub(crate) trait ToOrd {
    fn to_ord(self) -> OrdF32;
}

impl ToOrd for f32 {
    #[inline(always)]
    fn to_ord(self) -> OrdF32 {
        OrdF32(self)
    }
}

#[inline(always)]
pub(crate) fn is_positive_finite(value: f32) -> bool {
    value.is_finite() && value > 0.0
}
