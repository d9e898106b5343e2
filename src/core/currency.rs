use rust_decimal::Decimal;

/// Decimal places the service and its UI use for every currency
pub const MINOR_UNIT_SCALE: u32 = 2;

/// Converts minor units to a major-unit decimal (`12555` -> `125.55`)
pub fn minor_to_major(amount_minor: i64) -> Decimal {
    Decimal::new(amount_minor, MINOR_UNIT_SCALE)
}

/// Major-unit string as typed into the UI amount field, without trailing zeros
/// (`1100` -> `"11"`, `1250` -> `"12.5"`).
pub fn major_input_string(amount_minor: i64) -> String {
    minor_to_major(amount_minor).normalize().to_string()
}

/// Display symbol for the currencies the dashboard renders with a sign
fn symbol(currency: &str) -> Option<&'static str> {
    match currency {
        "USD" => Some("$"),
        "EUR" => Some("€"),
        "GBP" => Some("£"),
        "JPY" => Some("¥"),
        _ => None,
    }
}

/// Formats an amount the way an en-US currency formatter renders it:
/// `$100.00`, `€1,234.50`, `AED 11.00`, `-$1.00`.
pub fn format_amount(amount_minor: i64, currency: &str) -> String {
    let major = minor_to_major(amount_minor).round_dp(MINOR_UNIT_SCALE);
    let sign = if major.is_sign_negative() && !major.is_zero() {
        "-"
    } else {
        ""
    };

    let plain = format!("{:.width$}", major.abs(), width = MINOR_UNIT_SCALE as usize);
    let (int_part, frac_part) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match symbol(currency) {
        Some(sym) => format!("{sign}{sym}{grouped}.{frac_part}"),
        None => format!("{sign}{currency} {grouped}.{frac_part}"),
    }
}
