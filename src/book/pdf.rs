//! PDF page layout: optional per-book overrides and the resolved print options.

use serde::{Deserialize, Serialize};

/// Page margins in inches
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            top: 0.4,
            bottom: 0.4,
            left: 0.4,
            right: 0.4,
        }
    }
}

/// Layout settings where every field is optional; unset fields fall back to
/// the site-wide defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PdfLayout {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub landscape: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub print_background: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disable_header_footer: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin: Option<Margins>,
}

impl PdfLayout {
    /// Overlay `self` onto `defaults`, field by field
    pub fn resolve(&self, defaults: &PrintOptions) -> PrintOptions {
        PrintOptions {
            margin: self.margin.unwrap_or(defaults.margin),
            landscape: self.landscape.unwrap_or(defaults.landscape),
            paper_width: self.width.unwrap_or(defaults.paper_width),
            paper_height: self.height.unwrap_or(defaults.paper_height),
            header_template: self
                .header
                .clone()
                .unwrap_or_else(|| defaults.header_template.clone()),
            footer_template: self
                .footer
                .clone()
                .unwrap_or_else(|| defaults.footer_template.clone()),
            print_background: self.print_background.unwrap_or(defaults.print_background),
            display_header_footer: self
                .disable_header_footer
                .map(|disabled| !disabled)
                .unwrap_or(defaults.display_header_footer),
        }
    }
}

/// Fully resolved options handed to the renderer
#[derive(Debug, Clone, PartialEq)]
pub struct PrintOptions {
    pub margin: Margins,
    pub landscape: bool,
    /// Paper width in inches
    pub paper_width: f64,
    /// Paper height in inches
    pub paper_height: f64,
    pub header_template: String,
    pub footer_template: String,
    pub print_background: bool,
    pub display_header_footer: bool,
}

impl Default for PrintOptions {
    /// A4 portrait
    fn default() -> Self {
        Self {
            margin: Margins::default(),
            landscape: false,
            paper_width: 8.27,
            paper_height: 11.69,
            header_template: String::new(),
            footer_template: String::new(),
            print_background: true,
            display_header_footer: true,
        }
    }
}
