//! Past / today / future classification of day cells

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DotKind {
    Past,
    Today,
    Future,
}

impl DotKind {
    pub fn classify(day_index: u32, elapsed_days: u32) -> Self {
        use std::cmp::Ordering;
        match day_index.cmp(&elapsed_days) {
            Ordering::Less => DotKind::Past,
            Ordering::Equal => DotKind::Today,
            Ordering::Greater => DotKind::Future,
        }
    }

    /// Diameter multiplier applied to the base dot size.
    pub fn size_factor(self) -> f64 {
        match self {
            DotKind::Today => 1.8,
            DotKind::Past | DotKind::Future => 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_around_today() {
        assert_eq!(DotKind::classify(0, 10), DotKind::Past);
        assert_eq!(DotKind::classify(9, 10), DotKind::Past);
        assert_eq!(DotKind::classify(10, 10), DotKind::Today);
        assert_eq!(DotKind::classify(11, 10), DotKind::Future);
        assert_eq!(DotKind::classify(0, 0), DotKind::Today);
    }

    #[test]
    fn today_is_larger() {
        assert_eq!(DotKind::Today.size_factor(), 1.8);
        assert_eq!(DotKind::Past.size_factor(), 1.0);
    }
}
