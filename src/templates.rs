use crate::render::{CellKind, Row, StatusMessage, TableHeader};
use askama::Template;

#[derive(Template)]
#[template(
    source = r#"{% for row in rows %}<tr{% if !row.class().is_empty() %} class="{{ row.class() }}"{% endif %}>{% for cell in row.cells %}<td{% if cell.colspan > 1 %} colspan="{{ cell.colspan }}"{% endif %}>{% match cell.kind %}{% when CellKind::Text %}{{ cell.text }}{% when CellKind::Link with (href) %}<a href="{{ href }}" target="_blank">{{ cell.text }}</a>{% when CellKind::Button with (binding) %}<button id="{{ binding.id }}">{{ cell.text }}</button>{% endmatch %}</td>{% endfor %}</tr>
{% endfor %}"#,
    ext = "html"
)]
pub struct TableRowsTemplate<'a> {
    pub rows: &'a [Row],
}

#[derive(Template)]
#[template(
    source = r#"<tr>{% for column in header.columns %}<th>{{ column }}</th>{% endfor %}</tr>"#,
    ext = "html"
)]
pub struct TableHeaderTemplate<'a> {
    pub header: &'a TableHeader,
}

#[derive(Template)]
#[template(
    source = r#"<p class="status {{ status.class() }}">{{ status.text }}</p>"#,
    ext = "html"
)]
pub struct StatusTemplate<'a> {
    pub status: &'a StatusMessage,
}

pub fn rows_html(rows: &[Row]) -> Result<String, askama::Error> {
    TableRowsTemplate { rows }.render()
}

pub fn header_html(header: &TableHeader) -> Result<String, askama::Error> {
    TableHeaderTemplate { header }.render()
}

pub fn status_html(status: &StatusMessage) -> Result<String, askama::Error> {
    StatusTemplate { status }.render()
}
