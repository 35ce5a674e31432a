//! Number formatting for text reports

/// Insert thousands separators into a whole-dollar amount
fn group_thousands(dollars: u64) -> String {
    let digits = dollars.to_string();
    let mut result = String::new();
    for (i, c) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

/// Format a currency value without cents (e.g., $45,952)
pub fn format_currency(value: f64) -> String {
    let dollars = group_thousands(value.abs().round() as u64);
    if value < 0.0 && value.abs().round() > 0.0 {
        format!("-${}", dollars)
    } else {
        format!("${}", dollars)
    }
}

/// Format a fraction as a percentage (0.055 -> "5.50%")
pub fn format_percentage(value: f64) -> String {
    format!("{:.2}%", value * 100.0)
}
