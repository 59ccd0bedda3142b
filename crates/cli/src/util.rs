use rust_decimal::{Decimal, RoundingStrategy};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Price with currency symbol, two decimals: `₦4.50`.
pub(crate) fn money(symbol: &str, price: Decimal) -> String {
    let rounded = price.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{symbol}{rounded:.2}")
}

/// Truncate a string to fit within `width` display columns, adding ".." if truncated.
/// Uses Unicode display width so item names with CJK/emoji keep columns aligned.
pub(crate) fn truncate_display(s: &str, width: usize) -> String {
    if UnicodeWidthStr::width(s) <= width {
        return s.to_string();
    }
    if width < 3 {
        return s
            .chars()
            .next()
            .filter(|ch| ch.width().unwrap_or(0) <= width)
            .map(String::from)
            .unwrap_or_default();
    }

    // Leave room for ".."
    let budget = width - 2;
    let mut used = 0;
    let mut out = String::new();
    for ch in s.chars() {
        let cw = ch.width().unwrap_or(0);
        if used + cw > budget {
            break;
        }
        used += cw;
        out.push(ch);
    }
    out.push_str("..");
    out
}

/// Pad or truncate a string to exactly `width` display columns.
pub(crate) fn pad_right(s: &str, width: usize) -> String {
    let sw = UnicodeWidthStr::width(s);
    if sw > width {
        truncate_display(s, width)
    } else {
        format!("{}{}", s, " ".repeat(width - sw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn money_pads_and_rounds() {
        assert_eq!(money("₦", d("4.5")), "₦4.50");
        assert_eq!(money("$", d("12")), "$12.00");
        assert_eq!(money("£", d("0.125")), "£0.13");
        assert_eq!(money("C$", d("1.004")), "C$1.00");
    }

    #[test]
    fn pad_ascii() {
        assert_eq!(pad_right("milk", 6), "milk  ");
    }

    #[test]
    fn pad_wide_chars() {
        // 米 is two columns wide
        assert_eq!(pad_right("米", 4), "米  ");
    }

    #[test]
    fn truncate_long_names() {
        assert_eq!(pad_right("watermelon", 6), "wate..");
        assert_eq!(truncate_display("abc", 2), "a");
    }
}
