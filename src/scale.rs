use chrono::{Datelike, NaiveDate};
use plotters::style::RGBColor;

/// Tableau 10 series palette, cycled when the genre count exceeds it.
pub const PALETTE: [RGBColor; 10] = [
    RGBColor(78, 121, 167),  // blue
    RGBColor(242, 142, 44),  // orange
    RGBColor(225, 87, 89),   // red
    RGBColor(118, 183, 178), // teal
    RGBColor(89, 161, 79),   // green
    RGBColor(237, 201, 72),  // yellow
    RGBColor(175, 122, 161), // purple
    RGBColor(255, 157, 167), // pink
    RGBColor(156, 117, 95),  // brown
    RGBColor(186, 176, 171), // gray
];

/// color for the series with the given first-seen index
pub fn series_color(index: usize) -> RGBColor {
    PALETTE[index % PALETTE.len()]
}

/// Affine map from a value domain to a pixel range.
/// An inverted axis is expressed by a descending range,
/// a degenerate domain maps everything to the start of the range.
#[derive(Debug, Clone, Copy)]
pub struct LinearScale {
    pub domain: (f64, f64),
    pub range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> LinearScale {
        LinearScale { domain, range }
    }

    pub fn map(&self, v: f64) -> f64 {
        let span = self.domain.1 - self.domain.0;
        if span.abs() < f64::EPSILON {
            return self.range.0;
        }
        self.range.0 + (v - self.domain.0) / span * (self.range.1 - self.range.0)
    }

    /// Round-step ticks over the domain, close to the target count.
    /// All ticks fall within the domain bounds and increase monotonically.
    pub fn ticks(&self, target: usize) -> Vec<f64> {
        let (d0, d1) = self.domain;
        let span = d1 - d0;
        if target == 0 || span <= 0.0 {
            return vec![d0];
        }
        let step = nice_step(span / target as f64);
        let mut ticks: Vec<f64> = Vec::new();
        let mut v = (d0 / step).ceil() * step;
        while v <= d1 + step * 1e-6 {
            ticks.push(v);
            v += step;
        }
        ticks
    }
}

/// rounds a raw tick interval up to 1, 2 or 5 times a power of ten
fn nice_step(raw: f64) -> f64 {
    let mag = 10f64.powf(raw.log10().floor());
    let norm = raw / mag;
    let factor = if norm <= 1.0 {
        1.0
    } else if norm <= 2.0 {
        2.0
    } else if norm <= 5.0 {
        5.0
    } else {
        10.0
    };
    factor * mag
}

/// Day-linear map from a calendar date domain to a pixel range.
#[derive(Debug, Clone, Copy)]
pub struct TimeScale {
    pub domain: (NaiveDate, NaiveDate),
    pub range: (f64, f64),
}

impl TimeScale {
    pub fn new(domain: (NaiveDate, NaiveDate), range: (f64, f64)) -> TimeScale {
        TimeScale { domain, range }
    }

    pub fn map(&self, d: NaiveDate) -> f64 {
        let span = (self.domain.1 - self.domain.0).num_days();
        if span <= 0 {
            return self.range.0;
        }
        let offset = (d - self.domain.0).num_days() as f64 / span as f64;
        self.range.0 + offset * (self.range.1 - self.range.0)
    }

    /// Month-start ticks over the domain, stepped in whole months so that
    /// at most max_labels ticks appear, all within the domain bounds.
    pub fn month_ticks(&self, max_labels: usize) -> Vec<NaiveDate> {
        let (d0, d1) = self.domain;
        let n = months_between(d0, d1) + 1;
        let max_labels = max_labels.max(1) as i64;
        let step = ((n + max_labels - 1) / max_labels).max(1);
        let mut ticks: Vec<NaiveDate> = Vec::new();
        let mut k = 0;
        loop {
            let t = add_months(d0, k);
            if t > d1 {
                break;
            }
            if t >= d0 {
                ticks.push(t);
            }
            k += step;
        }
        ticks
    }
}

fn months_between(a: NaiveDate, b: NaiveDate) -> i64 {
    (b.year() as i64 * 12 + b.month0() as i64) - (a.year() as i64 * 12 + a.month0() as i64)
}

/// first day of the month k whole months after the month of d
fn add_months(d: NaiveDate, k: i64) -> NaiveDate {
    let months = d.year() as i64 * 12 + d.month0() as i64 + k;
    let year = months.div_euclid(12) as i32;
    let month = months.rem_euclid(12) as u32 + 1;
    NaiveDate::from_ymd_opt(year, month, 1).unwrap()
}
