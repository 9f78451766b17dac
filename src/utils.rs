//! Small helpers.

pub fn sanitize_symbol(sym: &str) -> String {
    sym.trim().to_uppercase()
}

/// Two-decimal currency display, e.g. 15678.0 -> "$15678.00".
pub fn format_usd(amount: f64) -> String {
    format!("${amount:.2}")
}
