use partscan_core::{CatalogRow, PartRecord};
use serde::Deserialize;

use crate::error::FeedError;

/// The gviz endpoint wraps its JSON in a JS callback:
/// `/*O_o*/\ngoogle.visualization.Query.setResponse(` ... `);`.
/// The prefix is fixed-length, the suffix is two bytes.
const WRAPPER_PREFIX_LEN: usize = 47;
const WRAPPER_SUFFIX_LEN: usize = 2;

// Fixed column layout of the feed. Column 0 and the remaining columns are
// unused.
const COL_LOCATION: usize = 1;
const COL_SUPPLIER: usize = 2;
const COL_PLANT: usize = 3;
const COL_CONCERN: usize = 4;
const COL_ALIASES: usize = 6;
const COL_CONTACT: usize = 12;

#[derive(Debug, Deserialize)]
struct GvizResponse {
    table: GvizTable,
}

#[derive(Debug, Deserialize)]
struct GvizTable {
    #[serde(default)]
    rows: Vec<GvizRow>,
}

#[derive(Debug, Deserialize)]
struct GvizRow {
    #[serde(default)]
    c: Vec<Option<GvizCell>>,
}

#[derive(Debug, Deserialize)]
struct GvizCell {
    #[serde(default)]
    v: Option<serde_json::Value>,
}

/// Strip the JS callback wrapper, leaving the JSON document.
fn strip_wrapper(body: &str) -> Result<&str, FeedError> {
    if body.len() < WRAPPER_PREFIX_LEN + WRAPPER_SUFFIX_LEN {
        return Err(FeedError::malformed(format!(
            "response too short ({} bytes)",
            body.len()
        )));
    }
    body.get(WRAPPER_PREFIX_LEN..body.len() - WRAPPER_SUFFIX_LEN)
        .ok_or_else(|| FeedError::malformed("wrapper boundary splits a UTF-8 character"))
}

/// Text content of a cell. Numbers render as their text form; nulls and
/// missing cells as empty.
fn cell_text(row: &GvizRow, index: usize) -> String {
    match row
        .c
        .get(index)
        .and_then(|cell| cell.as_ref())
        .and_then(|cell| cell.v.as_ref())
    {
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(serde_json::Value::Number(n)) => n.to_string(),
        Some(serde_json::Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

/// Parse a raw gviz response body into catalog rows.
///
/// The first row of the result set is a header and is skipped. The alias
/// column holds a comma/newline-delimited list of raw part codes.
pub fn parse_feed(body: &str) -> Result<Vec<CatalogRow>, FeedError> {
    let json = strip_wrapper(body)?;
    let response: GvizResponse = serde_json::from_str(json)?;

    let rows = response
        .table
        .rows
        .iter()
        .skip(1)
        .map(|row| {
            let record = PartRecord {
                location: cell_text(row, COL_LOCATION),
                supplier: cell_text(row, COL_SUPPLIER),
                plant: cell_text(row, COL_PLANT),
                concern_number: cell_text(row, COL_CONCERN),
                contact: cell_text(row, COL_CONTACT),
            };
            let aliases = cell_text(row, COL_ALIASES)
                .split(['\n', ','])
                .map(|alias| alias.trim().to_string())
                .filter(|alias| !alias.is_empty())
                .collect();
            CatalogRow { aliases, record }
        })
        .collect();

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PREFIX: &str = "/*O_o*/\ngoogle.visualization.Query.setResponse(";

    fn wrap(json: &str) -> String {
        format!("{PREFIX}{json});")
    }

    #[test]
    fn prefix_is_the_documented_length() {
        assert_eq!(PREFIX.len(), WRAPPER_PREFIX_LEN);
    }

    #[test]
    fn strip_wrapper_rejects_short_bodies() {
        assert!(strip_wrapper("garbage").is_err());
        assert!(strip_wrapper("").is_err());
    }

    #[test]
    fn strip_wrapper_yields_inner_json() {
        let body = wrap(r#"{"table":{"rows":[]}}"#);
        assert_eq!(strip_wrapper(&body).unwrap(), r#"{"table":{"rows":[]}}"#);
    }

    #[test]
    fn header_row_is_skipped() {
        let body = wrap(
            r#"{"table":{"rows":[
                {"c":[null,{"v":"Location"},{"v":"Supplier"}]},
                {"c":[null,{"v":"X"},{"v":"Y"},{"v":"Z"},{"v":"1"},null,{"v":"A1"},null,null,null,null,null,{"v":"c@x.com"}]}
            ]}}"#,
        );
        let rows = parse_feed(&body).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].record.location, "X");
        assert_eq!(rows[0].aliases, vec!["A1"]);
    }

    #[test]
    fn numeric_cells_render_as_text() {
        let body = wrap(
            r#"{"table":{"rows":[
                {"c":[]},
                {"c":[null,{"v":"X"},{"v":"Y"},{"v":"Z"},{"v":12345},null,{"v":678},null,null,null,null,null,{"v":"c@x.com"}]}
            ]}}"#,
        );
        let rows = parse_feed(&body).unwrap();
        assert_eq!(rows[0].record.concern_number, "12345");
        assert_eq!(rows[0].aliases, vec!["678"]);
    }

    #[test]
    fn alias_list_splits_on_comma_and_newline() {
        let body = wrap(
            r#"{"table":{"rows":[
                {"c":[]},
                {"c":[null,{"v":"X"},null,null,null,null,{"v":"A1, B-2\nC3,"},null,null,null,null,null,null]}
            ]}}"#,
        );
        let rows = parse_feed(&body).unwrap();
        assert_eq!(rows[0].aliases, vec!["A1", "B-2", "C3"]);
    }

    #[test]
    fn null_and_missing_cells_are_empty() {
        let body = wrap(
            r#"{"table":{"rows":[
                {"c":[]},
                {"c":[null,{"v":null},null]}
            ]}}"#,
        );
        let rows = parse_feed(&body).unwrap();
        assert_eq!(rows[0].record.location, "");
        assert_eq!(rows[0].record.contact, "");
        assert!(rows[0].aliases.is_empty());
    }

    #[test]
    fn invalid_json_is_a_parse_error() {
        let body = wrap("{not json");
        assert!(matches!(parse_feed(&body), Err(FeedError::Json(_))));
    }
}
