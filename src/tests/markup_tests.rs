use super::writer::{PRE_CLOSE, PRE_OPEN, SPAN_CLOSE, SPAN_OPEN_PREFIX};
use super::*;

const GREEN: &str = "\u{1b}[0;32m";
const RED: &str = "\u{1b}[0;31m";
const BLUE: &str = "\u{1b}[0;34m";
const RESET: &str = "\u{1b}[0m";

fn markup(raw: &str) -> String {
    translate_to_markup(raw, &MarkupTheme::default())
}

fn styled(document: &RenderedDocument) -> Vec<(StyleClass, String)> {
    document
        .styled_spans()
        .map(|span| (span.style, span.text.clone()))
        .collect()
}

fn sample_report() -> String {
    format!(
        "{BLUE}Search Parameters:{RESET}\nDirectory: /var/db/fusion/dut_configurations\nSection: [CameraRearPhoto]\n{dashes}\n{BLUE}Search Results:{RESET}\n{GREEN}✓ a54x: Section [CameraRearPhoto] found{RESET}\n{RED}✗ b0q: Section not found{RESET}\n{dashes}\nSummary:\nTotal files searched: 212\nFiles with match: 97\n",
        dashes = "-".repeat(48)
    )
}

#[test]
fn empty_input_renders_empty_preformatted_block() {
    let document = translate("");
    assert!(document.is_empty());
    assert_eq!(markup(""), format!("{PRE_OPEN}{PRE_CLOSE}"));
}

#[test]
fn translation_is_idempotent() {
    let raw = sample_report();
    assert_eq!(translate(&raw), translate(&raw));
    assert_eq!(markup(&raw), markup(&raw));
}

#[test]
fn known_color_maps_to_a_single_success_span() {
    let document = translate(&format!("{GREEN}OK {RESET}"));
    assert_eq!(styled(&document), vec![(StyleClass::Success, "OK ".to_owned())]);
    let rendered = markup(&format!("{GREEN}OK {RESET}"));
    assert!(!rendered.contains('\u{1b}'));
    assert!(rendered.contains(r#"<span style="color: #00BB00;">OK </span>"#));
}

#[test]
fn success_line_is_one_span_without_nested_value() {
    let document = translate("✓ Foo: Section [Bar] found");
    assert_eq!(
        styled(&document),
        vec![(StyleClass::Success, "✓ Foo: Section [Bar] found".to_owned())]
    );
    let rendered = markup("✓ Foo: Section [Bar] found");
    assert_eq!(rendered.matches(SPAN_OPEN_PREFIX).count(), 1);
}

#[test]
fn separator_line_becomes_one_rule_and_no_spans() {
    let document = translate(&"-".repeat(45));
    assert_eq!(document.rule_count(), 1);
    assert_eq!(document.styled_spans().count(), 0);
    let rendered = markup(&"-".repeat(45));
    assert_eq!(rendered.matches("<hr").count(), 1);
    assert_eq!(rendered.matches(SPAN_OPEN_PREFIX).count(), 0);
}

#[test]
fn dash_run_inside_text_stays_literal() {
    let raw = format!("note: {} end", "-".repeat(44));
    let document = translate(&raw);
    assert_eq!(document.rule_count(), 0);
    let rendered = markup(&raw);
    assert!(!rendered.contains("<hr"));
    assert!(rendered.contains(&raw));
}

#[test]
fn colored_separator_drops_its_color() {
    let raw = format!("{BLUE}{}{RESET}\nafter", "=".repeat(2) + &"-".repeat(40));
    let document = translate(&raw);
    assert_eq!(document.rule_count(), 0);

    let raw = format!("{BLUE}{}{RESET}\nafter", "-".repeat(42));
    let document = translate(&raw);
    assert_eq!(document.rule_count(), 1);
    assert_eq!(document.styled_spans().count(), 0);
    assert!(markup(&raw).ends_with(";\">after</pre>"));
}

#[test]
fn reserved_characters_are_escaped() {
    let raw = "if a < b && c > d then \"quote\" <script>alert(1)</script>";
    let rendered = markup(raw);
    let body = rendered
        .strip_prefix(PRE_OPEN)
        .and_then(|rest| rest.strip_suffix(PRE_CLOSE))
        .expect("wrapped in pre");
    assert!(!body.contains('<'));
    assert!(!body.contains('>'));
    assert!(!body.contains('"'));
    assert_eq!(body.matches('&').count(), body.matches(';').count());
}

#[test]
fn markup_inside_brackets_stays_escaped_inside_value_span() {
    let rendered = markup("Query: [<b>bold</b>]");
    assert!(rendered.contains("&lt;b&gt;bold&lt;/b&gt;"));
    assert_eq!(rendered.matches(SPAN_OPEN_PREFIX).count(), 1);
}

#[test]
fn spans_are_balanced_for_truncated_and_malformed_input() {
    let inputs = [
        format!("{GREEN}never reset"),
        format!("{GREEN}{RED}{BLUE}deep\nnested"),
        format!("{RESET}{RESET}stray resets{RESET}"),
        "\u{1b}[0;3".to_owned(),
        "\u{1b}[1;\u{1b}[0;32mmix\u{1b}[".to_owned(),
        sample_report(),
        format!("{GREEN}[x] {RESET}{RESET}Directory: [a]\n✗ x: y [z]"),
    ];
    for raw in inputs {
        let rendered = markup(&raw);
        assert_eq!(
            rendered.matches(SPAN_OPEN_PREFIX).count(),
            rendered.matches(SPAN_CLOSE).count(),
            "unbalanced output for {raw:?}"
        );
        assert!(rendered.starts_with(PRE_OPEN));
        assert!(rendered.ends_with(PRE_CLOSE));
    }
}

#[test]
fn unknown_escape_codes_are_stripped() {
    let rendered = markup("\u{1b}[1;35mbold magenta\u{1b}[22m done");
    assert!(!rendered.contains('\u{1b}'));
    assert!(rendered.contains("bold magenta done"));
}

#[test]
fn split_escape_resolves_once_the_remainder_arrives() {
    let full = format!("{GREEN}OK {RESET}");
    let mut buffer = String::from("\u{1b}[0;3");

    let partial = translate(&buffer);
    assert_eq!(partial.plain_text(), "\u{1b}[0;3");
    assert_eq!(partial.styled_spans().count(), 0);

    buffer.push_str("2mOK \u{1b}[0m");
    assert_eq!(buffer, full);
    assert_eq!(translate(&buffer), translate(&full));
    assert_eq!(markup(&buffer), markup(&full));
}

#[test]
fn line_breaks_and_alignment_are_preserved() {
    let raw = "  col1    col2\n\n\tindented  \nlast";
    let document = translate(raw);
    assert_eq!(document.plain_text(), raw);
    assert_eq!(markup(raw), format!("{PRE_OPEN}  col1    col2\n\n\tindented  \nlast{PRE_CLOSE}"));
}

#[test]
fn trailing_newline_is_kept() {
    assert_eq!(markup("done\n"), format!("{PRE_OPEN}done\n{PRE_CLOSE}"));
}

#[test]
fn rule_line_consumes_its_line_break() {
    let raw = format!("above\n{}\nbelow", "-".repeat(40));
    let rendered = markup(&raw);
    let theme = MarkupTheme::default();
    let mut expected = MarkupWriter::new();
    expected.text("above");
    expected.line_break();
    expected.horizontal_rule(&theme.rule);
    expected.text("below");
    assert_eq!(rendered, expected.finish());
}

#[test]
fn sample_report_highlights_each_rule() {
    let document = translate(&sample_report());
    let spans = styled(&document);
    assert!(spans.contains(&(StyleClass::Header, "Search Parameters:".to_owned())));
    assert!(spans.contains(&(StyleClass::Header, "Search Results:".to_owned())));
    assert!(spans.contains(&(StyleClass::Header, "Summary:".to_owned())));
    assert!(spans.contains(&(
        StyleClass::Value,
        "/var/db/fusion/dut_configurations".to_owned()
    )));
    assert!(spans.contains(&(StyleClass::Value, "[CameraRearPhoto]".to_owned())));
    assert!(spans.contains(&(
        StyleClass::Success,
        "✓ a54x: Section [CameraRearPhoto] found".to_owned()
    )));
    assert!(spans.contains(&(StyleClass::Failure, "✗ b0q: Section not found".to_owned())));
    assert!(spans.contains(&(StyleClass::Summary, "212".to_owned())));
    assert!(spans.contains(&(StyleClass::Summary, "97".to_owned())));
    assert_eq!(document.rule_count(), 2);
}

#[test]
fn ansi_color_survives_on_text_no_rule_claims() {
    let document = translate(&format!("{RED}error: permission denied{RESET}"));
    assert_eq!(
        styled(&document),
        vec![(StyleClass::Failure, "error: permission denied".to_owned())]
    );
}

#[test]
fn semantic_style_wins_over_surrounding_ansi_color() {
    let document = translate(&format!("{RED}value [x] here{RESET}"));
    assert_eq!(
        styled(&document),
        vec![
            (StyleClass::Failure, "value ".to_owned()),
            (StyleClass::Value, "[x]".to_owned()),
            (StyleClass::Failure, " here".to_owned()),
        ]
    );
}

#[test]
fn custom_theme_colors_are_used() {
    let theme = MarkupTheme {
        success: "lime".to_owned(),
        ..MarkupTheme::default()
    };
    let rendered = translate_to_markup(&format!("{GREEN}ok{RESET}"), &theme);
    assert!(rendered.contains(r#"<span style="color: lime;">ok</span>"#));
}
