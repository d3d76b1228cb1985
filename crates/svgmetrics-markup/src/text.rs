use serde::{Deserialize, Serialize};
use svgmetrics_core::TextMetrics;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    pub font_family: Option<String>,
    pub font_size: f64,
    pub font_weight: Option<String>,
    /// Extra advance after every character, in user units; may be negative.
    pub letter_spacing: f64,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_family: None,
            font_size: 16.0,
            font_weight: None,
            letter_spacing: 0.0,
        }
    }
}

/// Supplies the extents of a run of text. Shaping is entirely up to the implementation.
pub trait TextMeasurer {
    fn measure(&self, text: &str, style: &TextStyle) -> TextMetrics;
}

/// Font-independent metrics: every character advances by the same fraction of the font size.
#[derive(Debug, Clone, Default)]
pub struct DeterministicTextMeasurer {
    pub char_width_factor: f64,
    pub ascent_factor: f64,
    pub descent_factor: f64,
}

impl DeterministicTextMeasurer {
    /// Collapses runs of XML whitespace the way `xml:space="default"` does.
    pub fn normalized_text(text: &str) -> String {
        text.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

impl TextMeasurer for DeterministicTextMeasurer {
    fn measure(&self, text: &str, style: &TextStyle) -> TextMetrics {
        let char_width_factor = if self.char_width_factor == 0.0 {
            0.6
        } else {
            self.char_width_factor
        };
        let ascent_factor = if self.ascent_factor == 0.0 {
            0.8
        } else {
            self.ascent_factor
        };
        let descent_factor = if self.descent_factor == 0.0 {
            0.2
        } else {
            self.descent_factor
        };

        let font_size = style.font_size.max(0.0);
        let chars = Self::normalized_text(text).chars().count();
        TextMetrics {
            advance: chars as f64 * (font_size * char_width_factor + style.letter_spacing),
            ascent: font_size * ascent_factor,
            descent: font_size * descent_factor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic_metrics_scale_with_font_size() {
        let m = DeterministicTextMeasurer::default();
        let style = TextStyle {
            font_size: 10.0,
            ..Default::default()
        };
        let metrics = m.measure("  ab \n c ", &style);
        // "ab c"
        assert_eq!(metrics.advance, 24.0);
        assert_eq!(metrics.ascent, 8.0);
        assert_eq!(metrics.descent, 2.0);
    }

    #[test]
    fn custom_factors_override_defaults() {
        let m = DeterministicTextMeasurer {
            char_width_factor: 1.0,
            ..Default::default()
        };
        let metrics = m.measure("abc", &TextStyle::default());
        assert_eq!(metrics.advance, 48.0);
    }

    #[test]
    fn letter_spacing_is_added_per_character() {
        let m = DeterministicTextMeasurer::default();
        let style = TextStyle {
            font_size: 10.0,
            letter_spacing: 2.0,
            ..Default::default()
        };
        assert_eq!(m.measure("abc", &style).advance, 24.0);

        let tight = TextStyle {
            letter_spacing: -1.0,
            ..style
        };
        assert_eq!(m.measure("abc", &tight).advance, 15.0);
    }
}
