//! Output formatting for the CLI.

use console::{pad_str, style, Alignment};
use glow_commerce::catalog::Product;
use glow_commerce::Money;

/// Output handler for CLI messages.
#[derive(Clone)]
pub struct Output {
    verbose: bool,
    json: bool,
}

impl Output {
    /// Create a new output handler.
    pub fn new(verbose: bool, json: bool) -> Self {
        Self { verbose, json }
    }

    /// Print an info message.
    pub fn info(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("{} {}", style("ℹ").blue(), msg);
    }

    /// Print a success message.
    pub fn success(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("{} {}", style("✓").green(), msg);
    }

    /// Print a warning message.
    pub fn warn(&self, msg: &str) {
        if self.json {
            return;
        }
        eprintln!("{} {}", style("⚠").yellow(), msg);
    }

    /// Print an error message.
    pub fn error(&self, msg: &str) {
        if self.json {
            eprintln!("{}", serde_json::json!({ "error": msg }));
            return;
        }
        eprintln!("{} {}", style("✗").red(), style(msg).red());
    }

    /// Print a debug message (only in verbose mode).
    pub fn debug(&self, msg: &str) {
        if !self.verbose || self.json {
            return;
        }
        eprintln!("{} {}", style("→").dim(), style(msg).dim());
    }

    /// Print a header/title.
    pub fn header(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print JSON output.
    pub fn json<T: serde::Serialize>(&self, value: &T) {
        if let Ok(json) = serde_json::to_string_pretty(value) {
            println!("{}", json);
        }
    }

    /// Print a key-value pair.
    pub fn kv(&self, key: &str, value: &str) {
        if self.json {
            return;
        }
        println!("  {}: {}", style(key).dim(), value);
    }

    /// Print a list item.
    pub fn list_item(&self, item: &str) {
        if self.json {
            return;
        }
        println!("  {} {}", style("•").dim(), item);
    }

    /// Print a table row.
    pub fn table_row(&self, cols: &[&str], widths: &[usize]) {
        if self.json {
            return;
        }
        let formatted: Vec<String> = cols
            .iter()
            .zip(widths.iter())
            .map(|(col, width)| pad_str(col, *width, Alignment::Left, None).into_owned())
            .collect();
        println!("  {}", formatted.join("  ").trim_end());
    }

    /// Print plain text as is.
    pub fn raw(&self, text: &str) {
        if self.json {
            return;
        }
        print!("{}", text);
    }

    /// Check if JSON mode is enabled.
    pub fn is_json(&self) -> bool {
        self.json
    }
}

/// Stock badge for a product row.
pub fn stock_badge(product: &Product) -> String {
    match product.stock {
        0 => style("sold out").red().to_string(),
        1..=9 => style(format!("{} left", product.stock)).yellow().to_string(),
        _ => style("in stock").green().to_string(),
    }
}

/// Price with the struck compare-at price when on sale.
pub fn price_label(price: &Money, original: Option<&Money>) -> String {
    match original {
        Some(original) if original.amount_cents > price.amount_cents => format!(
            "{} {}",
            style(price.display()).green(),
            style(original.display()).dim().strikethrough()
        ),
        _ => price.display(),
    }
}

/// Rating as one decimal with a star.
pub fn format_rating(rating: f32) -> String {
    format!("{:.1}★", rating)
}

/// Cut a string to `max` characters, marking the cut with `...`.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", kept)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Serum", 10), "Serum");
        assert_eq!(truncate("Vitamin C Brightening Serum", 12), "Vitamin C...");
    }

    #[test]
    fn test_format_rating() {
        assert_eq!(format_rating(4.3), "4.3★");
        assert_eq!(format_rating(5.0), "5.0★");
    }
}
