// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

const MAX_FRACTION_DIGITS: u32 = 3;

/// Upper-cases the first character of every space-delimited word and
/// lower-cases the rest. Runs of spaces are preserved.
pub fn proper_case(input: &str) -> String {
    input
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    let mut out = first.to_uppercase().collect::<String>();
                    out.push_str(&chars.as_str().to_lowercase());
                    out
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// `Bondi Beach, NSW 2026` style rendering; `None` unless all three parts are
/// present and non-empty.
pub fn canonical_location(
    suburb: Option<&str>,
    state: Option<&str>,
    postal_code: Option<&str>,
) -> Option<String> {
    let suburb = suburb.filter(|value| !value.is_empty())?;
    let state = state.filter(|value| !value.is_empty())?;
    let postal_code = postal_code.filter(|value| !value.is_empty())?;
    Some(format!(
        "{}, {} {}",
        proper_case(suburb),
        state.to_uppercase(),
        postal_code
    ))
}

/// Dollar amount with `,` grouping and up to three fraction digits, trailing
/// zeros dropped.
pub fn format_price(amount: f64) -> String {
    format!("${}", format_grouped_number(amount))
}

pub fn format_grouped_number(value: f64) -> String {
    if !value.is_finite() {
        return if value.is_nan() {
            "NaN".to_owned()
        } else if value > 0.0 {
            "∞".to_owned()
        } else {
            "-∞".to_owned()
        };
    }

    let scale = 10_u64.pow(MAX_FRACTION_DIGITS) as f64;
    let scaled = (value.abs() * scale).round();
    let whole = (scaled / scale).trunc();
    let fraction = (scaled - whole * scale) as u64;
    let sign = if value < 0.0 && scaled > 0.0 { "-" } else { "" };

    let mut out = format!("{sign}{}", group_thousands(whole as u64));
    if fraction > 0 {
        let digits = format!("{fraction:0width$}", width = MAX_FRACTION_DIGITS as usize);
        out.push('.');
        out.push_str(digits.trim_end_matches('0'));
    }
    out
}

pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{canonical_location, format_price, group_thousands, proper_case};

    #[test]
    fn proper_case_handles_mixed_input() {
        assert_eq!(proper_case("bondi beach"), "Bondi Beach");
        assert_eq!(proper_case("NORTH  SYDNEY"), "North  Sydney");
        assert_eq!(proper_case("mcMahons point"), "Mcmahons Point");
        assert_eq!(proper_case(""), "");
    }

    #[test]
    fn canonical_location_requires_all_parts() {
        assert_eq!(
            canonical_location(Some("bondi beach"), Some("nsw"), Some("2026")),
            Some("Bondi Beach, NSW 2026".to_owned())
        );
        assert_eq!(canonical_location(Some("bondi"), None, Some("2026")), None);
        assert_eq!(canonical_location(Some("bondi"), Some("nsw"), Some("")), None);
        assert_eq!(canonical_location(None, None, None), None);
    }

    #[test]
    fn price_uses_thousands_separators() {
        assert_eq!(format_price(750_000.0), "$750,000");
        assert_eq!(format_price(0.0), "$0");
        assert_eq!(format_price(999.0), "$999");
        assert_eq!(format_price(1_234_567.0), "$1,234,567");
    }

    #[test]
    fn price_keeps_up_to_three_fraction_digits() {
        assert_eq!(format_price(1234.5), "$1,234.5");
        assert_eq!(format_price(0.12349), "$0.123");
        assert_eq!(format_price(10.9996), "$11");
        assert_eq!(format_price(-2500.25), "$-2,500.25");
    }

    #[test]
    fn group_thousands_boundaries() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(100), "100");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(100_000), "100,000");
    }
}
