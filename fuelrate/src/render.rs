//! Display formatting for results and explanations

use fuelrate_core::numeric::{format_money, format_significant, DEFAULT_SIGNIFICANT_FIGURES};

/// Display format for numbers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberFormat {
    /// Up to six decimals, for currency amounts and currency-bearing rates
    Money,
    /// Significant figures with scientific notation for large/small values
    SigFigs(u32),
}

/// Caller-chosen display precision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayOptions {
    pub significant_figures: u32,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        DisplayOptions { significant_figures: DEFAULT_SIGNIFICANT_FIGURES }
    }
}

/// Formats values and quantities for explanations
#[derive(Debug, Clone, Copy, Default)]
pub struct Renderer {
    options: DisplayOptions,
}

impl Renderer {
    pub fn new(options: DisplayOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> DisplayOptions {
        self.options
    }

    /// Format for physical quantities under the current options
    pub fn physical(&self) -> NumberFormat {
        NumberFormat::SigFigs(self.options.significant_figures)
    }

    pub fn value(&self, value: f64, format: NumberFormat) -> String {
        match format {
            NumberFormat::Money => format_money(value),
            NumberFormat::SigFigs(sigfigs) => format_significant(value, sigfigs),
        }
    }

    /// "1.524 m", "92 EUR", "0.607596 USD/L"
    pub fn quantity(&self, value: f64, unit: &str, format: NumberFormat) -> String {
        format!("{} {}", self.value(value, format), unit)
    }

    /// Final sentence: the headline, then the steps that produced it
    pub fn explanation(&self, headline: String, details: &[String]) -> String {
        if details.is_empty() {
            headline
        } else {
            format!("{}: {}", headline, details.join("; "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantity_formats() {
        let renderer = Renderer::default();
        assert_eq!(renderer.quantity(1.524, "m", renderer.physical()), "1.524 m");
        assert_eq!(renderer.quantity(0.60759572, "USD/L", NumberFormat::Money), "0.607596 USD/L");
    }

    #[test]
    fn test_precision_option() {
        let renderer = Renderer::new(DisplayOptions { significant_figures: 3 });
        assert_eq!(renderer.quantity(7.570823568, "L", renderer.physical()), "7.57 L");
    }

    #[test]
    fn test_explanation_joins_details() {
        let renderer = Renderer::default();
        assert_eq!(renderer.explanation("Converted".to_string(), &[]), "Converted");
        assert_eq!(
            renderer.explanation("Converted".to_string(), &["a".to_string(), "b".to_string()]),
            "Converted: a; b"
        );
    }
}
