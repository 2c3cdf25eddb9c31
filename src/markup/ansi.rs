use std::ops::Range;

use super::document::StyleClass;

const ESC: char = '\u{1b}';

/// One line of decoded terminal text with the color each byte range carried.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct AnsiLine {
    pub(crate) text: String,
    pub(crate) segments: Vec<AnsiSegment>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct AnsiSegment {
    pub(crate) range: Range<usize>,
    pub(crate) style: StyleClass,
}

impl AnsiLine {
    fn push(&mut self, ch: char, style: StyleClass) {
        let start = self.text.len();
        self.text.push(ch);
        let end = self.text.len();
        if let Some(last) = self.segments.last_mut() {
            if last.style == style && last.range.end == start {
                last.range.end = end;
                return;
            }
        }
        self.segments.push(AnsiSegment {
            range: start..end,
            style,
        });
    }

    pub(crate) fn style_at(&self, offset: usize) -> StyleClass {
        self.segments
            .iter()
            .find(|segment| segment.range.contains(&offset))
            .map(|segment| segment.style)
            .unwrap_or(StyleClass::Plain)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SgrAction {
    Open(StyleClass),
    Reset,
    Strip,
}

fn classify_sgr(params: &str) -> SgrAction {
    match params {
        "0;32" => SgrAction::Open(StyleClass::Success),
        "0;31" => SgrAction::Open(StyleClass::Failure),
        "0;33" => SgrAction::Open(StyleClass::Value),
        "0;34" => SgrAction::Open(StyleClass::Header),
        "0" => SgrAction::Reset,
        _ => SgrAction::Strip,
    }
}

/// Parses `ESC [ digits ( ; digits )* m` at the start of `chars`.
///
/// Returns the parameter text and the number of chars consumed, or `None`
/// when the sequence is malformed or cut off before its final byte.
fn parse_sgr(chars: &[char]) -> Option<(String, usize)> {
    if chars.len() < 2 || chars[0] != ESC || chars[1] != '[' {
        return None;
    }
    let mut params = String::new();
    let mut i = 2usize;
    let mut digits_in_group = 0usize;
    while i < chars.len() {
        let ch = chars[i];
        match ch {
            '0'..='9' => digits_in_group += 1,
            ';' if digits_in_group > 0 => digits_in_group = 0,
            'm' if digits_in_group > 0 => return Some((params, i + 1)),
            _ => return None,
        }
        params.push(ch);
        i += 1;
    }
    None
}

/// Splits raw terminal text into lines, resolving color escapes into styles.
///
/// Known color codes nest on a stack and a reset pops the innermost one; a
/// reset with nothing open is dropped. Other complete SGR sequences are
/// removed. Incomplete or non-SGR escapes stay in the text as literal chars.
pub(crate) fn decode_lines(raw: &str) -> Vec<AnsiLine> {
    let chars: Vec<char> = raw.chars().collect();
    let mut lines = Vec::new();
    let mut line = AnsiLine::default();
    let mut open: Vec<StyleClass> = Vec::new();
    let mut i = 0usize;
    while i < chars.len() {
        let ch = chars[i];
        if ch == ESC {
            if let Some((params, consumed)) = parse_sgr(&chars[i..]) {
                match classify_sgr(&params) {
                    SgrAction::Open(style) => open.push(style),
                    SgrAction::Reset => {
                        open.pop();
                    }
                    SgrAction::Strip => {}
                }
                i += consumed;
                continue;
            }
        }
        if ch == '\n' {
            lines.push(std::mem::take(&mut line));
        } else {
            let style = open.last().copied().unwrap_or(StyleClass::Plain);
            line.push(ch, style);
        }
        i += 1;
    }
    lines.push(line);
    lines
}
