//! Display helpers for raw token amounts and addresses.

use crate::constants::FISH_DECIMALS;

/// `1234567` -> `"1,234,567"`. Leading `-` is kept out of the grouping.
pub fn group_thousands(digits: &str) -> String {
    let (sign, digits) = match digits.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", digits),
    };
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    format!("{sign}{out}")
}

/// Raw integer amount -> decimal string with at most `max_frac` fraction
/// digits (truncated, trailing zeros trimmed). Decimals beyond what a `u128`
/// can scale by print the raw integer.
pub fn format_token_amount(raw: u128, decimals: u32, max_frac: u32) -> String {
    let Some(scale) = 10u128.checked_pow(decimals) else {
        return group_thousands(&raw.to_string());
    };
    let whole = group_thousands(&(raw / scale).to_string());
    if decimals == 0 {
        return whole;
    }

    let mut frac = format!("{:0width$}", raw % scale, width = decimals as usize);
    frac.truncate(max_frac.min(decimals) as usize);
    let frac = frac.trim_end_matches('0');

    if frac.is_empty() {
        whole
    } else {
        format!("{whole}.{frac}")
    }
}

pub fn format_fish(raw: u128) -> String {
    format_token_amount(raw, FISH_DECIMALS, FISH_DECIMALS)
}

/// `part / total` as a percentage with `dp` decimals, rounded half-up.
/// `None` when `total` is zero or the scaled value overflows.
pub fn format_percent_of(part: u128, total: u128, dp: u32) -> Option<String> {
    if total == 0 {
        return None;
    }
    let scale = 10u128.checked_pow(dp)?;
    let val = part
        .checked_mul(scale.checked_mul(100)?)?
        .checked_add(total / 2)?
        / total;
    let int_part = val / scale;
    if dp == 0 {
        return Some(format!("{int_part}%"));
    }
    Some(format!(
        "{int_part}.{:0width$}%",
        val % scale,
        width = dp as usize
    ))
}

/// `abcd…wxyz` for anything longer than 12 chars.
pub fn short_addr(addr: &str) -> String {
    let chars: Vec<char> = addr.chars().collect();
    if chars.len() <= 12 {
        return addr.to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}…{tail}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands("0"), "0");
        assert_eq!(group_thousands("999"), "999");
        assert_eq!(group_thousands("1000"), "1,000");
        assert_eq!(group_thousands("1234567"), "1,234,567");
        assert_eq!(group_thousands("-1234"), "-1,234");
    }

    #[test]
    fn test_format_token_amount() {
        assert_eq!(format_fish(0), "0");
        assert_eq!(format_fish(1_500_000), "1.5");
        assert_eq!(format_fish(967_985_833_058), "967,985.833058");
        assert_eq!(format_token_amount(1_234_567, 6, 2), "1.23");
        assert_eq!(format_token_amount(1_000_000, 6, 2), "1");
        assert_eq!(format_token_amount(42, 0, 6), "42");
    }

    #[test]
    fn test_oversized_scales_do_not_panic() {
        assert_eq!(format_token_amount(12_345, 39, 6), "12,345");
        assert_eq!(format_token_amount(u128::MAX, 38, 2), "3.4");
        assert_eq!(format_percent_of(1, 2, 37), None);
        assert_eq!(format_percent_of(1, 2, 40), None);
        assert_eq!(format_percent_of(u128::MAX, u128::MAX, 0), None);
    }

    #[test]
    fn test_format_percent_of() {
        assert_eq!(format_percent_of(1, 3, 4).as_deref(), Some("33.3333%"));
        assert_eq!(format_percent_of(2, 3, 2).as_deref(), Some("66.67%"));
        assert_eq!(format_percent_of(1, 1, 0).as_deref(), Some("100%"));
        assert_eq!(format_percent_of(5, 0, 4), None);
    }

    #[test]
    fn test_short_addr() {
        assert_eq!(short_addr("short"), "short");
        assert_eq!(
            short_addr("SEAyjT1FUx3JyXJnWt5NtjELDwuU9XsoZeZVPVvweU4"),
            "SEAy…weU4"
        );
    }
}
