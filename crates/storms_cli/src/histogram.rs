//! Debug view of the final layer as a text histogram.

use std::fmt::Write;

/// Larger layers are not rendered.
pub const MAX_HISTOGRAM_CELLS: usize = 35;

/// Bar length of the cell holding the last storm's maximum.
const FULL_BAR: f32 = 60.0;

const PURPLE: &str = "\x1b[0;35m";
const RESET: &str = "\x1b[0m";

/// Renders one row per cell: index, value, a bar scaled to the last storm's
/// maximum, `x` on strict local maxima and `M<i>` marks for storm peaks.
///
/// Returns `None` for layers over [`MAX_HISTOGRAM_CELLS`] or when no storm ran.
pub fn render(layer: &[f32], positions: &[usize], maxima: &[f32], color: bool) -> Option<String> {
    if layer.len() > MAX_HISTOGRAM_CELLS {
        return None;
    }
    let scale = *maxima.last()?;
    let width = layer.len().to_string().len();
    let mut out = String::new();

    for (k, &value) in layer.iter().enumerate() {
        let _ = write!(out, "{:0width$} | {:10.4} |", k, value, width = width);

        let ticks = if scale > 0.0 {
            (FULL_BAR * value / scale) as i32
        } else {
            0
        };
        let is_peak = k > 0 && k + 1 < layer.len() && value > layer[k - 1] && value > layer[k + 1];

        if color {
            out.push_str(PURPLE);
        }
        for _ in 1..ticks {
            out.push('o');
        }
        out.push(if is_peak { 'x' } else { 'o' });
        if color {
            out.push_str(RESET);
        }

        for (storm, _) in positions.iter().enumerate().filter(|(_, &p)| p == k) {
            let _ = write!(out, " M{}", storm);
        }
        out.push('\n');
    }
    Some(out)
}
