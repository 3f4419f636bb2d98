//! ASCII/Unicode plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - yearly values: `o`
//! - fitted trend: `-` line
//! - legend line embedding the coefficients when a trend is present

use crate::domain::{Sample, TimeSeries, TrendResult};
use crate::report::format_trend_label;

/// Render a yearly series, optionally with its fitted trend line.
pub fn render_series_plot(
    series: &TimeSeries,
    trend: Option<&TrendResult>,
    width: usize,
    height: usize,
) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let (t_min, t_max) = year_range(series.samples()).unwrap_or((2000.0, 2001.0));

    let trend_points: Option<Vec<(f64, f64)>> = trend.map(|t| {
        t.series
            .samples()
            .iter()
            .zip(&t.trend)
            .map(|(s, &fitted)| (s.year() as f64, fitted))
            .collect()
    });

    // Determine y-range from observed values and trend line.
    let (y_min, y_max) = y_range(series.samples(), trend_points.as_deref()).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    // Draw the trend first (so observed points can overlay).
    if let Some(points) = &trend_points {
        draw_polyline(&mut grid, points, t_min, t_max, y_min, y_max);
    }

    for sample in series.samples() {
        let x = map_x(sample.year() as f64, t_min, t_max, width);
        let y = map_y(sample.value, y_min, y_max, height);
        grid[y][x] = 'o';
    }

    // Build final string. We include a small header with ranges.
    let mut out = String::new();
    out.push_str(&format!(
        "Plot: t=[{t_min:.0}, {t_max:.0}] y | T=[{y_min:.2}, {y_max:.2}]°C\n"
    ));

    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    if let Some(t) = trend {
        out.push_str(&format_trend_label(t));
        out.push('\n');
    }

    out
}

fn year_range(samples: &[Sample]) -> Option<(f64, f64)> {
    let first = samples.first()?.year() as f64;
    let last = samples.last()?.year() as f64;
    if last > first {
        Some((first, last))
    } else {
        // Single year: widen so mapping stays well-defined.
        Some((first - 0.5, first + 0.5))
    }
}

fn y_range(samples: &[Sample], trend: Option<&[(f64, f64)]>) -> Option<(f64, f64)> {
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;

    for s in samples {
        min_y = min_y.min(s.value);
        max_y = max_y.max(s.value);
    }
    if let Some(points) = trend {
        for &(_, y) in points {
            min_y = min_y.min(y);
            max_y = max_y.max(y);
        }
    }

    if min_y.is_finite() && max_y.is_finite() && max_y > min_y {
        Some((min_y, max_y))
    } else {
        None
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(t: f64, t_min: f64, t_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((t - t_min) / (t_max - t_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

fn draw_polyline(
    grid: &mut [Vec<char>],
    points: &[(f64, f64)],
    t_min: f64,
    t_max: f64,
    y_min: f64,
    y_max: f64,
) {
    if points.is_empty() {
        return;
    }
    let height = grid.len();
    let width = grid[0].len();

    let mut prev = None;
    for &(t, y) in points {
        let x = map_x(t, t_min, t_max, width);
        let yy = map_y(y, y_min, y_max, height);
        if let Some((x0, y0)) = prev {
            draw_line(grid, x0, y0, x, yy, '-');
        } else {
            grid[yy][x] = '-';
        }
        prev = Some((x, yy));
    }
}

/// Integer line drawing (Bresenham-ish).
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}
