//! Pure view fragments. Records go in, rows and cells come out; nothing here
//! touches the network or the session.

use crate::data_models::{Product, Scalar, TrackedProduct};
use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

pub const NOT_AVAILABLE: &str = "N/A";
pub const RESULTS_COLUMNS: usize = 4;
pub const TRACKED_COLUMNS: usize = 7;
pub const ACTIONS_COLUMN: &str = "Actions";

const CURRENCY: &str = "₹";
const LOCALE_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";
const NAIVE_FORMATS: [&str; 3] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Track { product_url: String },
    Remove { id: u32 },
}

/// An interactive element and the action it triggers, addressed by a
/// stable element id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub id: String,
    pub action: Action,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellKind {
    Text,
    Link(String),
    Button(Binding),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub text: String,
    pub colspan: usize,
    pub kind: CellKind,
}

impl Cell {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            colspan: 1,
            kind: CellKind::Text,
        }
    }

    pub fn spanning(text: impl Into<String>, colspan: usize) -> Self {
        Self {
            colspan,
            ..Self::text(text)
        }
    }

    pub fn link(text: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            kind: CellKind::Link(href.into()),
            ..Self::text(text)
        }
    }

    pub fn button(text: impl Into<String>, id: impl Into<String>, action: Action) -> Self {
        Self {
            kind: CellKind::Button(Binding {
                id: id.into(),
                action,
            }),
            ..Self::text(text)
        }
    }

    pub fn binding(&self) -> Option<&Binding> {
        match &self.kind {
            CellKind::Button(binding) => Some(binding),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    Data,
    Loading,
    Empty,
    Error,
}

impl RowKind {
    pub fn class(&self) -> &'static str {
        match self {
            RowKind::Data => "",
            RowKind::Loading => "loading",
            RowKind::Empty => "empty",
            RowKind::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub kind: RowKind,
    pub cells: Vec<Cell>,
}

impl Row {
    pub fn data(cells: Vec<Cell>) -> Self {
        Self {
            kind: RowKind::Data,
            cells,
        }
    }

    fn single(kind: RowKind, text: impl Into<String>, colspan: usize) -> Self {
        Self {
            kind,
            cells: vec![Cell::spanning(text, colspan)],
        }
    }

    pub fn class(&self) -> &'static str {
        self.kind.class()
    }

    pub fn to_plain(&self) -> String {
        self.cells
            .iter()
            .map(|cell| match &cell.kind {
                CellKind::Text => cell.text.clone(),
                CellKind::Link(href) => href.clone(),
                CellKind::Button(binding) => format!("[{}: {}]", cell.text, binding.id),
            })
            .collect::<Vec<_>>()
            .join(" | ")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableHeader {
    pub columns: Vec<String>,
}

impl TableHeader {
    pub fn new(columns: &[&str]) -> Self {
        Self {
            columns: columns.iter().map(|column| column.to_string()).collect(),
        }
    }

    pub fn search_results() -> Self {
        Self::new(&["Title", "Price", "Rating"])
    }

    pub fn tracked_products() -> Self {
        Self::new(&[
            "Product",
            "Platform",
            "Current Price",
            "Previous Price",
            "Last Updated",
            "Link",
            ACTIONS_COLUMN,
        ])
    }

    /// Adds the actions column to a bare 3-column header. Returns whether
    /// anything changed.
    pub fn ensure_actions_column(&mut self) -> bool {
        if self.columns.len() != 3 {
            return false;
        }
        self.columns.push(ACTIONS_COLUMN.to_string());
        true
    }

    pub fn to_plain(&self) -> String {
        self.columns.join(" | ")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub kind: StatusKind,
    pub text: String,
}

impl StatusMessage {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Info,
            text: text.into(),
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Error,
            text: text.into(),
        }
    }

    pub fn class(&self) -> &'static str {
        match self.kind {
            StatusKind::Info => "info",
            StatusKind::Success => "success",
            StatusKind::Error => "error",
        }
    }
}

pub fn loading_row(colspan: usize) -> Row {
    Row::single(RowKind::Loading, "Loading...", colspan)
}

pub fn error_row(message: &str, colspan: usize) -> Row {
    Row::single(RowKind::Error, format!("Error: {message}"), colspan)
}

fn scalar_or_na(value: &Option<Scalar>) -> String {
    value
        .as_ref()
        .map(|value| value.to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

pub fn product_row(index: usize, product: &Product) -> Row {
    let action = match &product.url {
        Some(url) if !url.trim().is_empty() => Cell::button(
            "Track",
            format!("track-{index}"),
            Action::Track {
                product_url: url.clone(),
            },
        ),
        _ => Cell::text(NOT_AVAILABLE),
    };
    Row::data(vec![
        Cell::text(scalar_or_na(&product.title)),
        Cell::text(scalar_or_na(&product.price)),
        Cell::text(scalar_or_na(&product.rating)),
        action,
    ])
}

pub fn search_result_rows(products: &[Product]) -> Vec<Row> {
    if products.is_empty() {
        return vec![Row::single(
            RowKind::Empty,
            "No results found",
            RESULTS_COLUMNS,
        )];
    }
    products
        .iter()
        .enumerate()
        .map(|(index, product)| product_row(index, product))
        .collect()
}

pub fn format_price(price: Option<Decimal>) -> String {
    match price {
        Some(price) => format!("{CURRENCY}{}", price.normalize()),
        None => NOT_AVAILABLE.to_string(),
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = DateTime::parse_from_rfc2822(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    // naive timestamps come from the database clock, which runs on UTC
    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Formats a server timestamp the way a browser's `toLocaleString` would in
/// the given zone. Unparseable input is shown as received.
pub fn format_timestamp_in<Tz: TimeZone>(raw: Option<&str>, zone: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    match raw {
        None => NOT_AVAILABLE.to_string(),
        Some(raw) => match parse_timestamp(raw) {
            Some(timestamp) => timestamp
                .with_timezone(zone)
                .format(LOCALE_FORMAT)
                .to_string(),
            None => raw.to_string(),
        },
    }
}

pub fn format_timestamp(raw: Option<&str>) -> String {
    format_timestamp_in(raw, &Local)
}

pub fn tracked_product_row(product: &TrackedProduct) -> Row {
    let text_or_na = |value: &Option<String>| {
        value
            .as_ref()
            .filter(|value| !value.trim().is_empty())
            .cloned()
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    };
    Row::data(vec![
        Cell::text(text_or_na(&product.product_name)),
        Cell::text(text_or_na(&product.platform)),
        Cell::text(format_price(product.current_price)),
        Cell::text(format_price(product.previous_price)),
        Cell::text(format_timestamp(product.last_updated.as_deref())),
        Cell::link("View", product.product_url.clone()),
        Cell::button(
            "Remove",
            format!("remove-{}", product.id),
            Action::Remove { id: product.id },
        ),
    ])
}

pub fn tracked_product_rows(products: &[TrackedProduct]) -> Vec<Row> {
    if products.is_empty() {
        return vec![Row::single(
            RowKind::Empty,
            "No products being tracked",
            TRACKED_COLUMNS,
        )];
    }
    products.iter().map(tracked_product_row).collect()
}

/// Every interactive element in `rows`, keyed by element id. Built from the
/// rows alone, so rendering twice never doubles a handler.
pub fn bindings<'a>(rows: impl IntoIterator<Item = &'a Row>) -> BTreeMap<String, Action> {
    rows.into_iter()
        .flat_map(|row| row.cells.iter())
        .filter_map(Cell::binding)
        .map(|binding| (binding.id.clone(), binding.action.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(title: &str, url: Option<&str>) -> Product {
        Product {
            title: Some(Scalar::Text(title.to_string())),
            price: Some(Scalar::Text("₹1,299".to_string())),
            rating: None,
            url: url.map(str::to_string),
        }
    }

    #[test]
    fn empty_results_render_single_row() {
        let rows = search_result_rows(&[]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].kind, RowKind::Empty);
        assert_eq!(rows[0].cells[0].colspan, RESULTS_COLUMNS);
    }

    #[test]
    fn missing_rating_renders_na() {
        let rows = search_result_rows(&[
            product("A", Some("https://example.com/a")),
            product("B", Some("https://example.com/b")),
        ]);
        assert_eq!(rows.len(), 2);
        for row in rows {
            assert_eq!(row.cells.len(), RESULTS_COLUMNS);
            assert_eq!(row.cells[2].text, NOT_AVAILABLE.to_string());
        }
    }

    #[test]
    fn product_without_url_has_no_action() {
        let row = product_row(0, &product("A", None));
        assert_eq!(row.cells[3].binding(), None);
        assert_eq!(row.cells[3].text, NOT_AVAILABLE.to_string());
    }

    #[test]
    fn actions_column_added_once() {
        let mut header = TableHeader::search_results();
        assert!(header.ensure_actions_column());
        assert!(!header.ensure_actions_column());
        assert_eq!(header.columns.len(), 4);
        assert_eq!(
            header
                .columns
                .iter()
                .filter(|column| column.as_str() == ACTIONS_COLUMN)
                .count(),
            1
        );
    }

    #[test]
    fn actions_column_skips_other_widths() {
        let mut header = TableHeader::new(&["Title", "Price"]);
        assert!(!header.ensure_actions_column());
        assert_eq!(header.columns.len(), 2);
    }

    #[test]
    fn error_row_spans_all_columns() {
        let row = error_row("Server error: 500", TRACKED_COLUMNS);
        assert_eq!(row.cells.len(), 1);
        assert_eq!(row.cells[0].colspan, TRACKED_COLUMNS);
        assert!(row.cells[0].text.contains("Server error: 500"));
    }

    #[test]
    fn format_price_works() {
        assert_eq!(format_price(Some(Decimal::new(129900, 2))), "₹1299".to_string());
        assert_eq!(format_price(Some(Decimal::new(12995, 1))), "₹1299.5".to_string());
        assert_eq!(format_price(None), NOT_AVAILABLE.to_string());
    }

    #[test]
    fn format_timestamp_sql_style_works() {
        assert_eq!(
            format_timestamp_in(Some("2025-01-02 15:04:05"), &Utc),
            "1/2/2025, 3:04:05 PM".to_string()
        );
    }

    #[test]
    fn format_timestamp_http_date_works() {
        assert_eq!(
            format_timestamp_in(Some("Thu, 02 Jan 2025 09:04:05 GMT"), &Utc),
            "1/2/2025, 9:04:05 AM".to_string()
        );
    }

    #[test]
    fn format_timestamp_keeps_unknown_input() {
        assert_eq!(
            format_timestamp_in(Some("yesterday"), &Utc),
            "yesterday".to_string()
        );
        assert_eq!(format_timestamp_in(None, &Utc), NOT_AVAILABLE.to_string());
    }

    #[test]
    fn tracked_rows_bind_remove_buttons() {
        let products = vec![
            TrackedProduct {
                id: 4,
                product_name: Some("Phone".to_string()),
                product_url: "https://example.com/p/4".to_string(),
                ..Default::default()
            },
            TrackedProduct {
                id: 9,
                product_url: "https://example.com/p/9".to_string(),
                ..Default::default()
            },
        ];
        let rows = tracked_product_rows(&products);
        assert_eq!(rows[1].cells[0].text, NOT_AVAILABLE.to_string());
        let bound = bindings(&rows);
        assert_eq!(bound.len(), 2);
        assert_eq!(bound.get("remove-9"), Some(&Action::Remove { id: 9 }));
    }

    #[test]
    fn bindings_do_not_accumulate() {
        let rows = search_result_rows(&[product("A", Some("https://example.com/a"))]);
        let first = bindings(&rows);
        let rerendered = search_result_rows(&[product("A", Some("https://example.com/a"))]);
        let second = bindings(&rerendered);
        assert_eq!(first, second);
        assert_eq!(second.len(), 1);
    }

    #[test]
    fn empty_tracked_list_renders_placeholder() {
        let rows = tracked_product_rows(&[]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].kind, RowKind::Empty);
        assert_eq!(rows[0].cells[0].colspan, TRACKED_COLUMNS);
    }
}
