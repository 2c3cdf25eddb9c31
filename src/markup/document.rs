/// Semantic style applied to a run of rendered text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StyleClass {
    Plain,
    Success,
    Failure,
    Header,
    /// Bracketed tokens, directory paths and yellow terminal output.
    Value,
    /// The number after a summary label.
    Summary,
}

impl StyleClass {
    pub fn label(self) -> &'static str {
        match self {
            StyleClass::Plain => "plain",
            StyleClass::Success => "success",
            StyleClass::Failure => "failure",
            StyleClass::Header => "header",
            StyleClass::Value => "value",
            StyleClass::Summary => "summary",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorSpan {
    pub style: StyleClass,
    pub text: String,
}

impl ColorSpan {
    pub fn new(style: StyleClass, text: impl Into<String>) -> Self {
        Self {
            style,
            text: text.into(),
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(StyleClass::Plain, text)
    }

    pub fn is_styled(&self) -> bool {
        self.style != StyleClass::Plain
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentLine {
    Text(Vec<ColorSpan>),
    /// Structural separator; never carries text or color.
    Rule,
}

impl DocumentLine {
    pub fn spans(&self) -> &[ColorSpan] {
        match self {
            DocumentLine::Text(spans) => spans,
            DocumentLine::Rule => &[],
        }
    }

    pub fn plain_text(&self) -> String {
        self.spans().iter().map(|span| span.text.as_str()).collect()
    }
}

/// Immutable snapshot produced by one translation pass.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RenderedDocument {
    lines: Vec<DocumentLine>,
}

impl RenderedDocument {
    pub fn new(lines: Vec<DocumentLine>) -> Self {
        Self { lines }
    }

    pub fn lines(&self) -> &[DocumentLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn styled_spans(&self) -> impl Iterator<Item = &ColorSpan> {
        self.lines
            .iter()
            .flat_map(DocumentLine::spans)
            .filter(|span| span.is_styled())
    }

    pub fn rule_count(&self) -> usize {
        self.lines
            .iter()
            .filter(|line| matches!(line, DocumentLine::Rule))
            .count()
    }

    /// Text content with styling dropped; rule lines render as empty lines.
    pub fn plain_text(&self) -> String {
        self.lines
            .iter()
            .map(DocumentLine::plain_text)
            .collect::<Vec<String>>()
            .join("\n")
    }
}
