//! Number formatting that matches what a browser prints for the same values.

use ryu_js::Buffer;

/// Replaces `NaN`/`±∞` with `0.0` so bad metrics never reach geometry.
pub fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() { v } else { 0.0 }
}

/// Formats `v` like JavaScript's `Number.prototype.toString`.
pub fn fmt_js(v: f64) -> String {
    let v = finite_or_zero(v);
    // `-0` prints as `0` in JS.
    let v = if v == 0.0 { 0.0 } else { v };
    let mut b = Buffer::new();
    b.format_finite(v).to_string()
}

/// Formats `v` like JavaScript's `Number.prototype.toFixed(2)`.
///
/// Rounding works on the exact decimal value of the double, with ties going away from zero:
/// `0.015` is stored as `0.01499...` and prints `0.01`.
pub fn fmt_fixed2(v: f64) -> String {
    let v = finite_or_zero(v);
    // 30 fractional digits lie far below the spacing of doubles near any `x.xx5` tie.
    let exact = format!("{:.30}", v.abs());
    let (int_part, frac) = exact.split_once('.').unwrap_or((exact.as_str(), ""));
    let frac = frac.as_bytes();

    let mut digits: Vec<u8> = int_part
        .bytes()
        .chain(frac.iter().copied().take(2))
        .map(|b| b - b'0')
        .collect();
    if frac.get(2).is_some_and(|&d| d >= b'5') {
        let mut i = digits.len();
        loop {
            if i == 0 {
                digits.insert(0, 1);
                break;
            }
            i -= 1;
            if digits[i] == 9 {
                digits[i] = 0;
            } else {
                digits[i] += 1;
                break;
            }
        }
    }

    let split = digits.len() - 2;
    let text = |ds: &[u8]| ds.iter().map(|d| char::from(b'0' + d)).collect::<String>();
    let sign = if v < 0.0 { "-" } else { "" };
    format!("{sign}{}.{}", text(&digits[..split]), text(&digits[split..]))
}

/// Rounds to two decimals, the way sizes are stored in the catalog.
pub fn round2(v: f64) -> f64 {
    (finite_or_zero(v) * 100.0).round() / 100.0
}
