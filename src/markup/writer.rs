pub const PRE_OPEN: &str = r#"<pre style="margin: 0; font-family: monospace; white-space: pre;">"#;
pub const PRE_CLOSE: &str = "</pre>";
pub const SPAN_OPEN_PREFIX: &str = "<span";
pub const SPAN_CLOSE: &str = "</span>";

/// Appends `text` with every markup-reserved character escaped.
pub fn escape_into(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    escape_into(&mut out, text);
    out
}

/// Builds one preformatted markup block and keeps span markers balanced.
#[derive(Debug)]
pub struct MarkupWriter {
    out: String,
    open_spans: usize,
}

impl Default for MarkupWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkupWriter {
    pub fn new() -> Self {
        Self {
            out: PRE_OPEN.to_owned(),
            open_spans: 0,
        }
    }

    pub fn open_span(&mut self, color: &str) {
        self.out.push_str(SPAN_OPEN_PREFIX);
        self.out.push_str(r#" style="color: "#);
        escape_into(&mut self.out, color);
        self.out.push_str(r#";">"#);
        self.open_spans += 1;
    }

    /// Closes the innermost span; ignored when nothing is open.
    pub fn close_span(&mut self) {
        if self.open_spans == 0 {
            return;
        }
        self.out.push_str(SPAN_CLOSE);
        self.open_spans -= 1;
    }

    pub fn text(&mut self, text: &str) {
        escape_into(&mut self.out, text);
    }

    pub fn line_break(&mut self) {
        self.out.push('\n');
    }

    pub fn horizontal_rule(&mut self, color: &str) {
        self.out
            .push_str(r#"<hr style="border: none; border-top: 1px dashed "#);
        escape_into(&mut self.out, color);
        self.out.push_str(r#"; margin: 5px 0;">"#);
    }

    pub fn open_spans(&self) -> usize {
        self.open_spans
    }

    /// Closes every span still open, then the preformatted block.
    pub fn finish(mut self) -> String {
        for _ in 0..self.open_spans {
            self.out.push_str(SPAN_CLOSE);
        }
        self.open_spans = 0;
        self.out.push_str(PRE_CLOSE);
        self.out
    }
}
