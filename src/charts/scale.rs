//! Linear Scale
//! Maps a data domain onto a pixel range and picks readable tick values.

/// Continuous linear mapping from `domain` to `range`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Map a data value to a pixel coordinate.
    ///
    /// A collapsed domain maps everything to the middle of the range.
    pub fn apply(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let t = if d1 == d0 {
            0.5
        } else {
            (value - d0) / (d1 - d0)
        };
        r0 + t * (r1 - r0)
    }

    /// Roughly `count` evenly spaced values inside the domain, on 1/2/5 × 10ⁿ steps.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (mut start, mut stop) = self.domain;
        if !start.is_finite() || !stop.is_finite() || count == 0 {
            return Vec::new();
        }
        if start == stop {
            return vec![start];
        }
        let reversed = stop < start;
        if reversed {
            std::mem::swap(&mut start, &mut stop);
        }

        let Some((i1, i2, inc)) = tick_spec(start, stop, count as f64) else {
            return Vec::new();
        };

        let mut ticks: Vec<f64> = (i1..=i2)
            .map(|i| {
                if inc < 0.0 {
                    i as f64 / -inc
                } else {
                    i as f64 * inc
                }
            })
            .collect();
        if reversed {
            ticks.reverse();
        }
        ticks
    }

    /// Distance between consecutive ticks for `count`.
    pub fn tick_step(&self, count: usize) -> f64 {
        let (start, stop) = self.domain;
        let (lo, hi) = if stop < start { (stop, start) } else { (start, stop) };
        match tick_spec(lo, hi, count as f64) {
            Some((_, _, inc)) if inc < 0.0 => 1.0 / -inc,
            Some((_, _, inc)) => inc,
            None => 0.0,
        }
    }

    /// Format a tick value with just enough decimals for `step`.
    pub fn format_tick(value: f64, step: f64) -> String {
        let decimals = if step > 0.0 && step.is_finite() {
            (-step.log10().floor()).max(0.0) as usize
        } else {
            0
        };
        let text = format!("{:.*}", decimals, value);
        // Avoid "-0"
        if text.trim_start_matches('-').chars().all(|c| c == '0' || c == '.') {
            text.trim_start_matches('-').to_string()
        } else {
            text
        }
    }
}

/// Integer tick bounds and increment. A negative increment means "divide by".
fn tick_spec(start: f64, stop: f64, count: f64) -> Option<(i64, i64, f64)> {
    let e10 = 50f64.sqrt();
    let e5 = 10f64.sqrt();
    let e2 = 2f64.sqrt();

    let step = (stop - start) / count.max(0.0);
    if !step.is_finite() || step <= 0.0 {
        return None;
    }
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= e10 {
        10.0
    } else if error >= e5 {
        5.0
    } else if error >= e2 {
        2.0
    } else {
        1.0
    };

    let (mut i1, mut i2, inc);
    if power < 0.0 {
        inc = 10f64.powf(-power) / factor;
        i1 = (start * inc).round();
        i2 = (stop * inc).round();
        if i1 / inc < start {
            i1 += 1.0;
        }
        if i2 / inc > stop {
            i2 -= 1.0;
        }
        if i2 < i1 && (0.5..2.0).contains(&count) {
            return tick_spec(start, stop, count * 2.0);
        }
        Some((i1 as i64, i2 as i64, -inc))
    } else {
        inc = 10f64.powf(power) * factor;
        i1 = (start / inc).round();
        i2 = (stop / inc).round();
        if i1 * inc < start {
            i1 += 1.0;
        }
        if i2 * inc > stop {
            i2 -= 1.0;
        }
        if i2 < i1 && (0.5..2.0).contains(&count) {
            return tick_spec(start, stop, count * 2.0);
        }
        Some((i1 as i64, i2 as i64, inc))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_domain_onto_range() {
        let scale = LinearScale::new((8.0, 20.0), (0.0, 600.0));
        assert_eq!(scale.apply(8.0), 0.0);
        assert_eq!(scale.apply(20.0), 600.0);
        assert_eq!(scale.apply(14.0), 300.0);
    }

    #[test]
    fn inverted_range_grows_upward() {
        let scale = LinearScale::new((0.0, 10.0), (450.0, 0.0));
        assert_eq!(scale.apply(0.0), 450.0);
        assert_eq!(scale.apply(10.0), 0.0);
        assert!(scale.apply(7.0) < scale.apply(3.0));
    }

    #[test]
    fn collapsed_domain_maps_to_middle() {
        let scale = LinearScale::new((5.0, 5.0), (0.0, 100.0));
        assert_eq!(scale.apply(5.0), 50.0);
        assert_eq!(scale.apply(123.0), 50.0);
    }

    #[test]
    fn ticks_use_round_steps() {
        let scale = LinearScale::new((8.0, 23.4), (0.0, 1.0));
        assert_eq!(
            scale.ticks(10),
            vec![8.0, 10.0, 12.0, 14.0, 16.0, 18.0, 20.0, 22.0]
        );
        assert_eq!(scale.tick_step(10), 2.0);

        let scale = LinearScale::new((0.0, 1.0), (0.0, 1.0));
        let ticks = scale.ticks(5);
        assert_eq!(ticks.len(), 6);
        assert!((ticks[1] - 0.2).abs() < 1e-12);
    }

    #[test]
    fn ticks_follow_reversed_domain() {
        let scale = LinearScale::new((10.0, 0.0), (0.0, 1.0));
        assert_eq!(scale.ticks(5), vec![10.0, 8.0, 6.0, 4.0, 2.0, 0.0]);
    }

    #[test]
    fn tick_labels_match_step_precision() {
        assert_eq!(LinearScale::format_tick(8.0, 2.0), "8");
        assert_eq!(LinearScale::format_tick(0.5, 0.5), "0.5");
        assert_eq!(LinearScale::format_tick(0.25, 0.05), "0.25");
        assert_eq!(LinearScale::format_tick(-0.0, 1.0), "0");
    }
}
