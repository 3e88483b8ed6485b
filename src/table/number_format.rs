//! Numeric text formatting for deck output

/// Format with `%g`-style significant digits: fixed notation for moderate
/// exponents, scientific otherwise, trailing zeros removed.
pub fn format_significant(value: f64, significant_digits: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }

    let precision = significant_digits.max(1);
    // Round first so 9.9996 with 4 digits becomes 10.00 and picks the right exponent.
    let scientific = format!("{:.*e}", precision - 1, value);
    let exponent = scientific
        .split_once('e')
        .and_then(|(_, e)| e.parse::<i32>().ok())
        .unwrap_or(0);

    #[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
    let precision_i32 = precision as i32;

    if exponent < -4 || exponent >= precision_i32 {
        let (mantissa, _) = scientific.split_once('e').unwrap_or((scientific.as_str(), ""));
        let mantissa = trim_fraction(mantissa);
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{mantissa}e{sign}{:02}", exponent.abs())
    } else {
        #[allow(clippy::cast_sign_loss)]
        let decimals = (precision_i32 - 1 - exponent).max(0) as usize;
        trim_fraction(&format!("{value:.decimals$}")).to_string()
    }
}

/// Fixed-point with a set number of decimals.
pub fn format_fixed(value: f64, decimals: usize) -> String {
    format!("{value:.decimals$}")
}

fn trim_fraction(text: &str) -> &str {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text
    }
}
