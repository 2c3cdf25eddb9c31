use tabled::builder::Builder;
use tabled::settings::{Padding, Style};

use crate::ui::widgets::TableSpec;

pub fn render_table(spec: &TableSpec) -> String {
    let mut builder = Builder::default();
    if !spec.headers.is_empty() {
        builder.push_record(spec.headers.iter().map(String::as_str));
    }
    spec.rows
        .iter()
        .for_each(|row| builder.push_record(row.iter().map(String::as_str)));
    let mut table = builder.build();
    table.with(Style::blank());
    table.with(Padding::new(0, 2, 0, 0));
    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_headers_and_rows_as_aligned_columns() {
        let rendered = render_table(&TableSpec::new(
            vec!["code".to_owned(), "name".to_owned()],
            vec![
                vec!["a01q".to_owned(), "Galaxy A01".to_owned()],
                vec!["akita".to_owned(), "Pixel 8a".to_owned()],
            ],
        ));
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("code"));
        assert!(lines[2].starts_with("akita"));
        assert_eq!(lines[1].find("Galaxy"), lines[2].find("Pixel"));
    }
}
