/// Fraction digits that print any finite f64 without rounding.
const EXACT_FRACTION_DIGITS: usize = 1074;

/// Rounds half away from zero at the given number of decimals. The decision
/// is taken on the exact decimal expansion of the stored double, so 25.025
/// (stored as 25.02499...) rounds down to 25.02.
pub fn round_to(value: f64, decimals: usize) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let decimals = decimals.min(EXACT_FRACTION_DIGITS);
    let exact = format!("{:.*}", EXACT_FRACTION_DIGITS, value.abs());
    let (whole, fraction) = exact.split_once('.').unwrap_or((exact.as_str(), ""));

    let mut digits = whole
        .chars()
        .chain(fraction.chars().take(decimals))
        .collect::<Vec<char>>();
    let round_up = fraction
        .as_bytes()
        .get(decimals)
        .is_some_and(|&digit| digit >= b'5');
    if round_up {
        increment_digits(&mut digits);
    }

    let (int_digits, frac_digits) = digits.split_at(digits.len() - decimals);
    let mut text = int_digits.iter().collect::<String>();
    if !frac_digits.is_empty() {
        text.push('.');
        text.extend(frac_digits);
    }
    text.parse::<f64>()
        .map(|rounded| rounded.copysign(value))
        .unwrap_or(value)
}

fn increment_digits(digits: &mut Vec<char>) {
    for digit in digits.iter_mut().rev() {
        if *digit == '9' {
            *digit = '0';
        } else {
            *digit = char::from(*digit as u8 + 1);
            return;
        }
    }
    digits.insert(0, '1');
}

pub fn mean(values: &[u32]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let sum: u64 = values.iter().map(|&v| v as u64).sum();
    Some(sum as f64 / values.len() as f64)
}

pub fn median(values: &[usize]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    let len = sorted.len();
    let median = if len % 2 == 0 {
        (sorted[len / 2 - 1] + sorted[len / 2]) as f64 / 2.0
    } else {
        sorted[len / 2] as f64
    };
    Some(median)
}
