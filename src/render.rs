use crate::types::CutAssignment;

const MAX_WIDTH: f64 = 72.0;

/// Draws one stock unit as a scaled bar: each piece is a labelled segment,
/// the leftover is dotted.
///
/// ```text
/// |  4.000   |1.500|....|
/// ```
pub fn render_unit(stock_length: f64, cut: &CutAssignment, kerf: f64) -> String {
    if stock_length <= 0.0 {
        return String::new();
    }
    let scale = MAX_WIDTH / stock_length;

    let mut bar = String::from("|");
    let mut drawn = 0usize;
    for &piece in &cut.pieces {
        let width = ((piece + kerf) * scale).round().max(1.0) as usize;
        bar.push_str(&segment(&format!("{piece:.3}"), width));
        bar.push('|');
        drawn += width + 1;
    }

    let leftover = cut.leftover(stock_length, kerf);
    let rest = (MAX_WIDTH as usize).saturating_sub(drawn);
    if leftover > 0.0 && rest > 0 {
        bar.push_str(&".".repeat(rest));
        bar.push('|');
    }
    bar
}

/// Centres `label` in `width` cells, or fills the cells when it does not fit.
fn segment(label: &str, width: usize) -> String {
    let len = label.chars().count();
    if len > width {
        return "#".repeat(width);
    }
    let left = (width - len) / 2;
    let right = width - len - left;
    let mut out = String::with_capacity(width);
    out.extend(std::iter::repeat_n(' ', left));
    out.push_str(label);
    out.extend(std::iter::repeat_n(' ', right));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_single_piece() {
        let output = render_unit(6.0, &CutAssignment::new(vec![4.0]), 0.0);
        assert!(output.starts_with('|'));
        assert!(output.ends_with('|'));
        assert!(output.contains("4.000"));
        assert!(output.contains("..."));
        assert!(output.chars().count() <= MAX_WIDTH as usize + 3);
    }

    #[test]
    fn test_render_exact_fit_has_no_leftover() {
        let output = render_unit(5.0, &CutAssignment::new(vec![2.0, 3.0]), 0.0);
        assert!(output.contains("2.000"));
        assert!(output.contains("3.000"));
        assert!(!output.contains(".."));
        assert_eq!(output.matches('|').count(), 3);
    }

    #[test]
    fn test_render_narrow_piece_is_filled() {
        let output = render_unit(100.0, &CutAssignment::new(vec![1.0]), 0.0);
        assert!(output.starts_with("|#|"));
    }

    #[test]
    fn test_render_empty() {
        let output = render_unit(6.0, &CutAssignment::default(), 0.0);
        assert_eq!(output, format!("|{}|", ".".repeat(MAX_WIDTH as usize)));
    }
}
