//! Terminal colors derived from the widget configuration.

use std::str::FromStr;

use crossterm::style::Color;
use flexfilter::WidgetConfig;
use palette::Srgb;

use crate::error::AppError;

/// Resolved colors and sizes for drawing.
#[derive(Debug, Clone)]
pub struct Theme {
    pub chip_bg: Color,
    pub input_bg: Color,
    pub remove_bg: Color,
    pub text: Color,
    pub muted: Color,
    pub placeholder: String,
    pub max_width: u16,
}

impl Theme {
    pub fn from_config(config: &WidgetConfig) -> Result<Self, AppError> {
        Ok(Self {
            chip_bg: parse_color("primaryColor", &config.primary_color)?,
            input_bg: parse_color("secondaryColor", &config.secondary_color)?,
            remove_bg: parse_color("removeButtonColor", &config.remove_button_color)?,
            text: Color::Black,
            muted: Color::DarkGrey,
            placeholder: config.placeholder_text.clone(),
            max_width: u16::try_from(config.width).unwrap_or(u16::MAX),
        })
    }
}

/// Parse a `#rrggbb` or `#rgb` color token.
fn parse_color(field: &'static str, value: &str) -> Result<Color, AppError> {
    let rgb = Srgb::<u8>::from_str(value).map_err(|_| AppError::Color {
        field,
        value: value.to_string(),
    })?;
    let (r, g, b) = rgb.into_components();
    Ok(Color::Rgb { r, g, b })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_colors_parse() {
        let theme = Theme::from_config(&WidgetConfig::default()).unwrap();
        assert_eq!(
            theme.chip_bg,
            Color::Rgb {
                r: 0xad,
                g: 0xf0,
                b: 0x9f
            }
        );
        assert_eq!(theme.placeholder, "Search");
    }

    #[test]
    fn test_bad_color_is_reported() {
        let config = WidgetConfig::default().with_remove_button_color("pink-ish");
        let err = Theme::from_config(&config).unwrap_err();
        assert!(matches!(err, AppError::Color { field: "removeButtonColor", .. }));
    }
}
