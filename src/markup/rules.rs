use std::ops::Range;
use std::sync::OnceLock;

use regex::Regex;

use super::document::StyleClass;

/// Which part of a match a rule styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleTarget {
    /// The entire line containing the match.
    Line,
    /// The matched text.
    Match,
    /// One capture group of the match.
    Group(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleEffect {
    Span(StyleClass),
    /// Replace the whole line with a horizontal rule.
    HorizontalRule,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SemanticRule {
    pub name: &'static str,
    pub pattern: &'static str,
    pub effect: RuleEffect,
    pub target: RuleTarget,
    pub priority: u8,
}

/// Highlighting rules, lowest priority value first. A rule only styles text
/// that no earlier rule already claimed.
pub const RULES: &[SemanticRule] = &[
    SemanticRule {
        name: "success-line",
        pattern: r"✓ [^:]+: Section \[[^\]]+\] found",
        effect: RuleEffect::Span(StyleClass::Success),
        target: RuleTarget::Line,
        priority: 1,
    },
    SemanticRule {
        name: "failure-line",
        pattern: r"✗ [^:]+: .+",
        effect: RuleEffect::Span(StyleClass::Failure),
        target: RuleTarget::Line,
        priority: 2,
    },
    SemanticRule {
        name: "section-header",
        pattern: r"Search Parameters:|Search Results:|Summary:",
        effect: RuleEffect::Span(StyleClass::Header),
        target: RuleTarget::Match,
        priority: 3,
    },
    SemanticRule {
        name: "bracketed-value",
        pattern: r"\[[^\]]+\]",
        effect: RuleEffect::Span(StyleClass::Value),
        target: RuleTarget::Match,
        priority: 4,
    },
    SemanticRule {
        name: "directory-path",
        pattern: r"Directory: (.+)",
        effect: RuleEffect::Span(StyleClass::Value),
        target: RuleTarget::Group(1),
        priority: 5,
    },
    SemanticRule {
        name: "summary-count",
        pattern: r"(?:Total files searched|Files with match): (\d+)",
        effect: RuleEffect::Span(StyleClass::Summary),
        target: RuleTarget::Group(1),
        priority: 6,
    },
    // Only a line made of nothing but dashes is a separator. A dash run
    // embedded in other text stays as text, so a rule never splits a line.
    SemanticRule {
        name: "separator",
        pattern: r"^\s*-{40,}\s*$",
        effect: RuleEffect::HorizontalRule,
        target: RuleTarget::Line,
        priority: 7,
    },
];

pub(crate) struct CompiledRule {
    pub(crate) rule: SemanticRule,
    pub(crate) regex: Regex,
}

pub(crate) fn compiled_rules() -> &'static [CompiledRule] {
    static COMPILED: OnceLock<Vec<CompiledRule>> = OnceLock::new();
    COMPILED.get_or_init(|| compile(RULES))
}

pub(crate) fn compile(rules: &[SemanticRule]) -> Vec<CompiledRule> {
    let mut compiled = rules
        .iter()
        .filter_map(|rule| match Regex::new(rule.pattern) {
            Ok(regex) => Some(CompiledRule { rule: *rule, regex }),
            Err(error) => {
                tracing::error!(rule = rule.name, %error, "highlight rule failed to compile");
                None
            }
        })
        .collect::<Vec<CompiledRule>>();
    compiled.sort_by_key(|compiled| compiled.rule.priority);
    compiled
}

/// Outcome of running the rule table over one line of plain text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct LineClaims {
    pub(crate) spans: Vec<(Range<usize>, StyleClass)>,
    pub(crate) rule: bool,
}

impl LineClaims {
    pub(crate) fn style_at(&self, offset: usize) -> Option<StyleClass> {
        self.spans
            .iter()
            .find(|(range, _)| range.contains(&offset))
            .map(|(_, style)| *style)
    }

    fn claim(&mut self, target: Range<usize>, style: StyleClass) {
        for free in self.unclaimed_parts(target) {
            self.spans.push((free, style));
        }
    }

    fn unclaimed_parts(&self, target: Range<usize>) -> Vec<Range<usize>> {
        let mut taken = self
            .spans
            .iter()
            .map(|(range, _)| range.clone())
            .filter(|range| range.start < target.end && target.start < range.end)
            .collect::<Vec<Range<usize>>>();
        taken.sort_by_key(|range| range.start);

        let mut free = Vec::new();
        let mut cursor = target.start;
        for range in taken {
            if range.start > cursor {
                free.push(cursor..range.start);
            }
            cursor = cursor.max(range.end);
        }
        if cursor < target.end {
            free.push(cursor..target.end);
        }
        free
    }
}

pub(crate) fn apply_rules(rules: &[CompiledRule], line: &str) -> LineClaims {
    let mut claims = LineClaims::default();
    for compiled in rules {
        match compiled.rule.effect {
            RuleEffect::HorizontalRule => {
                if claims.spans.is_empty() && compiled.regex.is_match(line) {
                    claims.rule = true;
                    return claims;
                }
            }
            RuleEffect::Span(style) => {
                for captures in compiled.regex.captures_iter(line) {
                    let target = match compiled.rule.target {
                        RuleTarget::Line => Some(0..line.len()),
                        RuleTarget::Match => captures.get(0).map(|m| m.range()),
                        RuleTarget::Group(index) => captures.get(index).map(|m| m.range()),
                    };
                    if let Some(target) = target.filter(|range| !range.is_empty()) {
                        claims.claim(target, style);
                    }
                }
            }
        }
    }
    claims
}
