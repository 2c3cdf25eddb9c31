use serde::Deserialize;

use super::document::StyleClass;

/// Colors used when a document is written out as markup.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MarkupTheme {
    pub success: String,
    pub failure: String,
    pub header: String,
    pub value: String,
    pub summary: String,
    pub rule: String,
}

impl Default for MarkupTheme {
    fn default() -> Self {
        Self {
            success: "#00BB00".to_owned(),
            failure: "#FF0000".to_owned(),
            header: "#0000BB".to_owned(),
            value: "#BBBB00".to_owned(),
            summary: "#BBBB00".to_owned(),
            rule: "#666".to_owned(),
        }
    }
}

impl MarkupTheme {
    pub fn color_for(&self, style: StyleClass) -> Option<&str> {
        match style {
            StyleClass::Plain => None,
            StyleClass::Success => Some(&self.success),
            StyleClass::Failure => Some(&self.failure),
            StyleClass::Header => Some(&self.header),
            StyleClass::Value => Some(&self.value),
            StyleClass::Summary => Some(&self.summary),
        }
    }
}
