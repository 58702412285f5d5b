//! Tables embedded in filing text blocks, recovered from entity-escaped
//! HTML into plain row arrays.

use html_escape::decode_html_entities;
use scraper::{ElementRef, Html, Selector};

/// One table row. Cell counts vary row to row (headers, notes, colspans),
/// so callers check the length before indexing.
pub type TableRow = Vec<String>;

/// Extracts every table row from an HTML fragment, in source order. Text
/// blocks carry their markup entity-escaped, so entities are decoded before
/// parsing. Malformed markup is not an error: whatever the parser recovers
/// is what comes back, and input without any table yields no rows.
pub fn table_from_html(text: &str) -> Vec<TableRow> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    let markup = decode_html_entities(text);
    let fragment = Html::parse_fragment(&markup);

    let row_selector = Selector::parse("tr").unwrap();
    let cell_selector = Selector::parse("td, th").unwrap();
    let line_selector = Selector::parse("p, br").unwrap();

    let mut rows = Vec::new();
    for row in fragment.select(&row_selector) {
        let cells: TableRow = row
            .select(&cell_selector)
            .map(|cell| cell_text(cell, &line_selector))
            .collect();
        // A row without a single cell carries no data.
        if !cells.is_empty() {
            rows.push(cells);
        }
    }
    rows
}

// Cells holding paragraph or line-break children keep their line structure:
// the non-empty line texts join with " / ". Plain cells flatten.
fn cell_text(cell: ElementRef, line_selector: &Selector) -> String {
    let lines: Vec<String> = cell
        .select(line_selector)
        .map(flattened_text)
        .filter(|line| !line.is_empty())
        .collect();
    if lines.is_empty() {
        flattened_text(cell)
    } else {
        lines.join(" / ")
    }
}

// Concatenation of the element's text nodes, each trimmed of surrounding
// whitespace. Interior whitespace within a node survives.
fn flattened_text(element: ElementRef) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|chunk| !chunk.is_empty())
        .collect()
}
