use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::markup::{parse_markup, Segment};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TagColors {
    pub bg: &'static str,
    pub text: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

#[derive(Debug, Clone, Serialize)]
pub struct ColorScheme {
    colors: Vec<(&'static str, TagColors)>,
}

lazy_static! {
    static ref LIGHT: ColorScheme = ColorScheme::new(vec![
        ("prosody", TagColors { bg: "#FFB3BA", text: "#000000" }),
        ("emphasis", TagColors { bg: "#BAFFC9", text: "#000000" }),
        ("break", TagColors { bg: "#BAE1FF", text: "#000000" }),
        ("say-as", TagColors { bg: "#FFFFBA", text: "#000000" }),
        ("sub", TagColors { bg: "#FFD9BA", text: "#000000" }),
        ("phoneme", TagColors { bg: "#E0BAFF", text: "#000000" }),
    ]);
    static ref DARK: ColorScheme = ColorScheme::new(vec![
        ("prosody", TagColors { bg: "#800020", text: "#FFFFFF" }),
        ("emphasis", TagColors { bg: "#006400", text: "#FFFFFF" }),
        ("break", TagColors { bg: "#00008B", text: "#FFFFFF" }),
        ("say-as", TagColors { bg: "#808000", text: "#FFFFFF" }),
        ("sub", TagColors { bg: "#8B4513", text: "#FFFFFF" }),
        ("phoneme", TagColors { bg: "#4B0082", text: "#FFFFFF" }),
    ]);
    static ref DECORATION: Regex = Regex::new(r"</?span\b[^>]*>").unwrap();
}

impl ColorScheme {
    pub fn new(colors: Vec<(&'static str, TagColors)>) -> Self {
        Self { colors }
    }

    pub fn for_theme(theme: Theme) -> &'static ColorScheme {
        match theme {
            Theme::Light => &LIGHT,
            Theme::Dark => &DARK,
        }
    }

    pub fn colors(&self, tag: &str) -> Option<TagColors> {
        self.colors
            .iter()
            .find(|(name, _)| *name == tag)
            .map(|(_, colors)| *colors)
    }
}

/// Display copy of `text` with every coloured tag (markup included) wrapped
/// in a styled `<span>`. Display only; run [`strip_decoration`] before
/// feeding it back into an edit.
pub fn project(text: &str, scheme: &ColorScheme) -> String {
    let mut out = String::with_capacity(text.len());
    decorate(&mut out, &parse_markup(text), scheme);
    out
}

fn decorate(out: &mut String, segments: &[Segment], scheme: &ColorScheme) {
    for segment in segments {
        match segment {
            Segment::Text(text) | Segment::Raw(text) => out.push_str(text),
            Segment::Tag(node) => {
                let colors = scheme.colors(&node.name);
                if let Some(c) = colors {
                    out.push_str(&format!(
                        "<span style=\"background-color: {}; color: {};\">",
                        c.bg, c.text
                    ));
                }
                out.push_str(&node.open_tag());
                decorate(out, &node.children, scheme);
                out.push_str(&node.close_tag());
                if colors.is_some() {
                    out.push_str("</span>");
                }
            }
        }
    }
}

/// Remove highlight decoration, leaving the markup it wrapped.
pub fn strip_decoration(text: &str) -> String {
    DECORATION.replace_all(text, "").into_owned()
}
