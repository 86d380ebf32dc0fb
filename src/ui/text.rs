use crate::fetch::Quote;

/// Format a price to two decimal places.
pub fn format_price(price: f64) -> String {
    format!("{:.2}", price)
}

/// Format an absolute change with an explicit sign.
pub fn format_change(change: f64) -> String {
    format!("{:+.2}", change)
}

/// Format a percent change with sign and suffix, e.g. `+0.71%`.
pub fn format_percent(change_percent: f64) -> String {
    format!("{:+.2}%", change_percent)
}

/// Directional indicator derived from the sign of the percent change.
pub fn direction_arrow(quote: &Quote) -> &'static str {
    if quote.change_percent < 0.0 {
        "▼"
    } else {
        "▲"
    }
}
