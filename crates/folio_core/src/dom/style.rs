//! Inline style declarations (`style` attribute).

use once_cell::sync::Lazy;
use regex::Regex;

static DECLARATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?P<prop>-?[A-Za-z][A-Za-z0-9-]*)\s*:\s*(?P<value>[^;]+)")
        .expect("valid style declaration regex")
});

/// Ordered inline declarations; property names are lowercase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InlineStyle {
    declarations: Vec<(String, String)>,
}

impl InlineStyle {
    pub fn get(&self, property: &str) -> Option<&str> {
        let property = property.to_ascii_lowercase();
        self.declarations
            .iter()
            .find(|(name, _)| *name == property)
            .map(|(_, value)| value.as_str())
    }

    /// Sets one declaration, keeping its original position when replaced.
    /// An empty value removes the declaration.
    pub fn set(&mut self, property: &str, value: &str) {
        let property = property.trim().to_ascii_lowercase();
        let value = value.trim();
        if value.is_empty() {
            self.remove(&property);
            return;
        }
        match self.declarations.iter_mut().find(|(name, _)| *name == property) {
            Some(entry) => entry.1 = value.to_string(),
            None => self.declarations.push((property, value.to_string())),
        }
    }

    pub fn remove(&mut self, property: &str) {
        let property = property.to_ascii_lowercase();
        self.declarations.retain(|(name, _)| *name != property);
    }

    /// Replaces every declaration with those parsed from `css_text`.
    pub fn set_css_text(&mut self, css_text: &str) {
        self.declarations.clear();
        for caps in DECLARATION_RE.captures_iter(css_text) {
            self.set(&caps["prop"], &caps["value"]);
        }
    }

    pub fn css_text(&self) -> String {
        self.declarations
            .iter()
            .map(|(name, value)| format!("{name}: {value};"))
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }
}
