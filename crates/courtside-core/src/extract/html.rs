//! Small helpers over `scraper` shared by the page extractors.

use std::collections::BTreeMap;

use scraper::{ElementRef, Selector};

use crate::error::AppError;

pub(crate) fn selector(css: &str) -> Result<Selector, AppError> {
    Selector::parse(css).map_err(|e| AppError::SelectorError(format!("{css}: {e:?}")))
}

/// Text content of an element with inner tags stripped, trimmed.
pub fn element_text(el: &ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// Text of the first element under `scope` matching `sel`.
pub(crate) fn first_text(scope: &ElementRef<'_>, sel: &Selector) -> Option<String> {
    scope.select(sel).next().map(|el| element_text(&el))
}

/// Collapse every whitespace run to one space and trim the ends.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Cleaned text of a row's direct `td` children.
pub fn row_cells(row: &ElementRef<'_>) -> Vec<String> {
    direct_children(*row, &["td"])
        .map(|cell| element_text(&cell))
        .collect()
}

/// Direct `td` children of a row, unprocessed.
pub(crate) fn row_cell_elements<'a>(row: &ElementRef<'a>) -> Vec<ElementRef<'a>> {
    direct_children(*row, &["td"]).collect()
}

fn direct_children<'a>(
    el: ElementRef<'a>,
    names: &'static [&'static str],
) -> impl Iterator<Item = ElementRef<'a>> {
    el.children()
        .filter_map(ElementRef::wrap)
        .filter(move |child| names.contains(&child.value().name()))
}

/// Labels of the first row in `table` that carries `th` cells.
pub(crate) fn header_labels(table: &ElementRef<'_>, rows: &Selector) -> Option<Vec<String>> {
    table
        .select(rows)
        .find(|row| direct_children(*row, &["th"]).next().is_some())
        .map(|row| {
            direct_children(row, &["th", "td"])
                .map(|cell| element_text(&cell))
                .collect()
        })
}

/// Compare a table's header row against the labels a layout expects.
///
/// Returns false and logs once per table when any label differs. Tables
/// without a header row pass.
pub(crate) fn check_headers(
    table: &str,
    found: Option<&[String]>,
    expected: &BTreeMap<usize, String>,
) -> bool {
    let Some(found) = found else {
        return true;
    };
    let mismatches: Vec<String> = expected
        .iter()
        .filter(|(i, label)| found.get(**i).map(String::as_str) != Some(label.as_str()))
        .map(|(i, label)| {
            format!(
                "column {i}: expected '{label}', found '{}'",
                found.get(*i).map(String::as_str).unwrap_or("")
            )
        })
        .collect();
    if mismatches.is_empty() {
        return true;
    }
    tracing::warn!(
        table,
        mismatches = %mismatches.join("; "),
        "Header labels differ from the configured layout"
    );
    false
}

/// URL inside a `background-image: url('…')` declaration.
pub fn background_image_url(style: &str) -> Option<String> {
    let start = style.find("background-image")?;
    let rest = &style[start..];
    let open = rest.find("url(")? + "url(".len();
    let close = rest[open..].find(')')? + open;
    let url = rest[open..close].trim().trim_matches(|c| c == '\'' || c == '"').trim();
    (!url.is_empty()).then(|| url.to_string())
}

/// Prefix root-relative links with the site base; anything else is kept.
pub fn absolutize(base_url: &str, link: &str) -> String {
    if link.starts_with('/') {
        format!("{}{link}", base_url.trim_end_matches('/'))
    } else {
        link.to_string()
    }
}
