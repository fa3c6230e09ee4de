//! Classical Chinese numerals for chapter and line labels.

const ONES: [&str; 10] = ["", "一", "二", "三", "四", "五", "六", "七", "八", "九"];
const TEN: &str = "十";

/// Largest value `to_numeral` composes. The text has 81 chapters; the same
/// composition rule covers everything below a hundred.
pub const MAX_NUMERAL: usize = 99;

/// Formats `n` as a classical numeral: 一 … 九, 十, 十一 … 十九, 二十, 二十三 …
///
/// Returns `None` for zero and for values above [`MAX_NUMERAL`].
pub fn to_numeral(n: usize) -> Option<String> {
    if n == 0 || n > MAX_NUMERAL {
        return None;
    }

    let tens = n / 10;
    let ones = n % 10;
    let mut out = String::new();
    match tens {
        0 => {}
        1 => out.push_str(TEN),
        _ => {
            out.push_str(ONES[tens]);
            out.push_str(TEN);
        }
    }
    out.push_str(ONES[ones]);
    Some(out)
}

/// `第N章` label for a 0-based chapter index.
pub fn chapter_label(index: usize) -> String {
    format!("第{}章", numeral_or_digits(index + 1))
}

/// `第N行` label for a 0-based line index.
pub fn line_label(index: usize) -> String {
    format!("第{}行", numeral_or_digits(index + 1))
}

fn numeral_or_digits(n: usize) -> String {
    to_numeral(n).unwrap_or_else(|| n.to_string())
}
