/// Duration aggregation and display formatting
use serde::{Deserialize, Serialize};

use crate::parts::Part;

/// Total and speed-adjusted durations for the current selection
///
/// Always produced by [`compute_durations`], never mutated in place.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DerivedDurations {
    /// Sum of part durations in seconds
    pub total: u64,
    /// `total / speed`, in seconds
    pub adjusted: f64,
}

impl DerivedDurations {
    pub fn total_display(&self) -> String {
        format_duration(self.total as f64)
    }

    pub fn adjusted_display(&self) -> String {
        format_duration(self.adjusted)
    }
}

/// Sum durations over the inclusive 1-based range `[from, to]`, divided by speed
///
/// Out-of-range bounds are clamped to the loaded parts; an empty list yields zero.
pub fn compute_durations(parts: &[Part], from: usize, to: usize, speed: f64) -> DerivedDurations {
    if parts.is_empty() {
        return DerivedDurations::default();
    }

    let max = parts.len();
    let start = from.clamp(1, max);
    let end = to.clamp(start, max);

    let total: u64 = parts[start - 1..end].iter().map(|p| p.duration).sum();

    DerivedDurations {
        total,
        adjusted: total as f64 / speed,
    }
}

/// Render seconds as `H:MM:SS`, or `M:SS` when there are no whole hours
///
/// The leading component is never padded. Fractions are floored.
pub fn format_duration(seconds: f64) -> String {
    let whole = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };

    let h = whole / 3600;
    let m = (whole % 3600) / 60;
    let s = whole % 60;

    if h > 0 {
        format!("{}:{:02}:{:02}", h, m, s)
    } else {
        format!("{}:{:02}", m, s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_parts() -> Vec<Part> {
        vec![
            Part::new(1, 1, "Intro", 120),
            Part::new(2, 2, "Body", 300),
            Part::new(3, 3, "Outro", 180),
        ]
    }

    #[test]
    fn test_full_range_at_double_speed() {
        let d = compute_durations(&sample_parts(), 1, 3, 2.0);
        assert_eq!(d.total, 600);
        assert_eq!(d.adjusted, 300.0);
        assert_eq!(d.total_display(), "10:00");
        assert_eq!(d.adjusted_display(), "5:00");
    }

    #[test]
    fn test_sub_range() {
        let d = compute_durations(&sample_parts(), 2, 2, 1.0);
        assert_eq!(d.total, 300);

        let d = compute_durations(&sample_parts(), 2, 3, 1.5);
        assert_eq!(d.total, 480);
        assert_eq!(d.adjusted, 480.0 / 1.5);
    }

    #[test]
    fn test_empty_parts() {
        assert_eq!(compute_durations(&[], 1, 1, 1.0), DerivedDurations::default());
    }

    #[test]
    fn test_bounds_are_clamped() {
        let d = compute_durations(&sample_parts(), 0, 99, 1.0);
        assert_eq!(d.total, 600);

        // to below from collapses to a single part
        let d = compute_durations(&sample_parts(), 3, 1, 1.0);
        assert_eq!(d.total, 180);
    }

    #[test]
    fn test_total_is_monotonic_in_to() {
        let parts: Vec<Part> = (1..=40u32)
            .map(|p| Part::new(p as u64, p, format!("P{}", p), (p as u64 * 37) % 500))
            .collect();

        for from in 1..=parts.len() {
            let mut previous = 0;
            for to in from..=parts.len() {
                let total = compute_durations(&parts, from, to, 1.0).total;
                assert!(total >= previous, "from={} to={}", from, to);
                previous = total;
            }
        }
    }

    #[test]
    fn test_adjusted_is_exact_quotient() {
        for speed in [0.1, 0.5, 0.75, 1.0, 1.25, 2.0, 3.0, 16.0] {
            let d = compute_durations(&sample_parts(), 1, 3, speed);
            assert_eq!(d.adjusted, d.total as f64 / speed);
        }
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0.0), "0:00");
        assert_eq!(format_duration(59.0), "0:59");
        assert_eq!(format_duration(300.0), "5:00");
        assert_eq!(format_duration(600.0), "10:00");
        assert_eq!(format_duration(3599.0), "59:59");
        assert_eq!(format_duration(3600.0), "1:00:00");
        assert_eq!(format_duration(3725.0), "1:02:05");
        assert_eq!(format_duration(36000.0 * 3.0), "30:00:00");
    }

    #[test]
    fn test_format_duration_floors_and_guards() {
        assert_eq!(format_duration(85.7142), "1:25");
        assert_eq!(format_duration(-5.0), "0:00");
        assert_eq!(format_duration(f64::NAN), "0:00");
        assert_eq!(format_duration(f64::INFINITY), "0:00");
    }
}
