//! Number formatting shared by the presentation layer

/// Formats `value` with a fixed number of decimals and comma-grouped thousands.
///
/// `format_grouped(50000.0, 2)` yields `"50,000.00"`.
pub fn format_grouped(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let fixed = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (fixed.as_str(), None),
    };

    let mut grouped = String::with_capacity(fixed.len() + int_part.len() / 3 + 1);
    // Rounding can turn e.g. -0.001 into "0.00"; no sign for zero then.
    if value.is_sign_negative() && fixed.chars().any(|c| c.is_ascii_digit() && c != '0') {
        grouped.push('-');
    }
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    if let Some(frac_part) = frac_part {
        grouped.push('.');
        grouped.push_str(frac_part);
    }
    grouped
}

/// Formats a percent change with an explicit sign, e.g. `+2.50%`.
pub fn format_change(change: f64) -> String {
    format!("{change:+.2}%")
}
