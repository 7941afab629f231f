// src/process/decode.rs
//
// The reply is shaped entirely by the tags we asked for: every record is a run
// of <F01>..<Fnn> elements, so F01 starts a row and any other tag starts a
// cell. Nothing here is a general XML parser.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use tracing::{debug, instrument, trace};

use super::row::{tolerant_zip, DecodedRow};
use crate::schema::FieldSpec;

const ROW_SEP: &str = "\r\n";
const COL_SEP: &str = "\t";
const RECORD_TAG: &str = "<F01>";
const BLANK_PAIR: &str = "<FLDBLANK></FLDBLANK>";

static WS_BEFORE_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+\r\n").expect("regex"));
static WS_BEFORE_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+<F").expect("regex"));
static CLOSE_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"</F\d+>").expect("regex"));
static OPEN_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<F\d+>").expect("regex"));
static ENTITY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&(amp|lt|gt|quot|apos);").expect("regex"));

/// Replace the five predefined XML entities in a single pass.
pub fn unescape_entities(text: &str) -> String {
    ENTITY
        .replace_all(text, |caps: &Captures| match &caps[1] {
            "amp" => "&",
            "lt" => "<",
            "gt" => ">",
            "quot" => "\"",
            _ => "'",
        })
        .into_owned()
}

/// Turn the raw reply into `\r\n`-separated records of `\t`-separated cells.
/// The result starts with a row break before each record.
pub fn normalize(reply: &str) -> String {
    let text = reply.replacen("<ENVELOPE>", "", 1).replacen("</ENVELOPE>", "", 1);
    let text = text.replace(BLANK_PAIR, "");
    let text = WS_BEFORE_BREAK.replace_all(&text, "");
    let text = text.replace(ROW_SEP, "").replace('\t', " ");
    let text = WS_BEFORE_TAG.replace_all(&text, "<F");
    let text = CLOSE_TAG.replace_all(&text, "");
    let text = text.replace(RECORD_TAG, ROW_SEP);
    let text = OPEN_TAG.replace_all(&text, COL_SEP);
    unescape_entities(&text)
}

/// Decode a reply into rows keyed by `fields[i].name`.
///
/// Cells are matched to fields purely by position, so `fields` must be in the
/// same order the request was compiled with. The header row of field names
/// is only used to line up the first record and is never returned as a row.
#[instrument(level = "debug", skip(reply, fields), fields(reply_len = reply.len(), field_count = fields.len()))]
pub fn decode(reply: &str, fields: &[FieldSpec]) -> Vec<DecodedRow> {
    let names: Vec<&str> = fields.iter().map(|f| f.name.as_str()).collect();

    // Header row: absorbs whatever precedes the first record, then dropped.
    let mut text = names.join(COL_SEP);
    text.push_str(&normalize(reply));
    trace!(%text, "normalized reply");

    let rows: Vec<DecodedRow> = text
        .split(ROW_SEP)
        .skip(1)
        .map(|line| tolerant_zip(names.iter().copied(), line.split(COL_SEP)))
        .collect();

    debug!(rows = rows.len(), "decoded reply");
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldType;

    fn fields(names: &[&str]) -> Vec<FieldSpec> {
        names
            .iter()
            .map(|n| FieldSpec::new(*n, *n, FieldType::Text))
            .collect()
    }

    /// Build a reply the way the engine lays one out: one tag per line,
    /// indented, CRLF line ends, blank padding after each record.
    fn engine_reply(rows: &[Vec<&str>]) -> String {
        let mut out = String::from("<ENVELOPE>\r\n");
        for row in rows {
            for (i, v) in row.iter().enumerate() {
                out.push_str(&format!(" <F{n:02}>{v}</F{n:02}>\r\n", n = i + 1));
            }
            out.push_str(" <FLDBLANK></FLDBLANK>\r\n");
        }
        out.push_str("</ENVELOPE>\r\n");
        out
    }

    #[test]
    fn round_trips_rows_in_order() {
        let rows = vec![
            vec!["2024-04-01", "-1500.00", "Cash"],
            vec!["2024-04-02", "320", "Bank A/c"],
            vec!["ñ", "0", "Sales"],
        ];
        let decoded = decode(&engine_reply(&rows), &fields(&["date", "amount", "ledger"]));

        assert_eq!(decoded.len(), rows.len());
        for (row, want) in decoded.iter().zip(&rows) {
            let got: Vec<&str> = row.iter().map(|(_, v)| v).collect();
            assert_eq!(&got, want);
        }
        assert_eq!(decoded[1].get("ledger"), Some("Bank A/c"));
    }

    #[test]
    fn entities_are_unescaped_once() {
        let reply = engine_reply(&[vec!["A &amp; B", "&lt;x&gt; &quot;q&quot; &apos;s&apos;", "&amp;lt;"]]);
        let decoded = decode(&reply, &fields(&["a", "b", "c"]));
        assert_eq!(decoded[0].get("a"), Some("A & B"));
        assert_eq!(decoded[0].get("b"), Some(r#"<x> "q" 's'"#));
        assert_eq!(decoded[0].get("c"), Some("&lt;"));
    }

    #[test]
    fn tabs_inside_values_become_spaces() {
        let reply = engine_reply(&[vec!["a\tb", "c"]]);
        let decoded = decode(&reply, &fields(&["x", "y"]));
        assert_eq!(decoded[0].get("x"), Some("a b"));
        assert_eq!(decoded[0].get("y"), Some("c"));
    }

    #[test]
    fn short_rows_are_tolerated() {
        let reply = engine_reply(&[vec!["1", "2", "3"], vec!["4"]]);
        let decoded = decode(&reply, &fields(&["a", "b", "c"]));
        assert_eq!(decoded.len(), 2);
        assert_eq!(decoded[1].len(), 1);
        assert_eq!(decoded[1].get("a"), Some("4"));
        assert!(!decoded[1].contains("b"));
        assert!(!decoded[1].contains("c"));
    }

    #[test]
    fn empty_cells_are_kept() {
        let reply = engine_reply(&[vec!["", "x", ""]]);
        let decoded = decode(&reply, &fields(&["a", "b", "c"]));
        assert_eq!(decoded[0].get("a"), Some(""));
        assert_eq!(decoded[0].get("b"), Some("x"));
        assert_eq!(decoded[0].get("c"), Some(""));
    }

    #[test]
    fn field_order_decides_keys() {
        let reply = engine_reply(&[vec!["1", "2"]]);
        let ab = decode(&reply, &fields(&["a", "b"]));
        let ba = decode(&reply, &fields(&["b", "a"]));
        assert_eq!(ab[0].get("a"), Some("1"));
        assert_eq!(ba[0].get("a"), Some("2"));
    }

    #[test]
    fn empty_reply_has_no_rows() {
        assert!(decode("<ENVELOPE></ENVELOPE>", &fields(&["a"])).is_empty());
        assert!(decode("", &fields(&["a"])).is_empty());
    }

    #[test]
    fn normalize_marks_rows_and_cells() {
        let reply = "<ENVELOPE><F01>a</F01><F02>b</F02><FLDBLANK></FLDBLANK><F01>c</F01><F02>d</F02></ENVELOPE>";
        assert_eq!(normalize(reply), "\r\na\tb\r\nc\td");
    }

    #[test]
    fn compact_and_pretty_replies_agree() {
        let compact = "<ENVELOPE><F01>a</F01><F02>b</F02></ENVELOPE>";
        let pretty = "<ENVELOPE>\r\n  <F01>a</F01>   \r\n\t<F02>b</F02>\r\n</ENVELOPE>";
        let f = fields(&["x", "y"]);
        assert_eq!(decode(compact, &f), decode(pretty, &f));
    }

    #[test]
    fn higher_numbered_tags_are_columns() {
        let values: Vec<String> = (1..=12).map(|i| format!("v{i}")).collect();
        let row: Vec<&str> = values.iter().map(String::as_str).collect();
        let names: Vec<String> = (1..=12).map(|i| format!("c{i}")).collect();
        let names: Vec<&str> = names.iter().map(String::as_str).collect();

        let decoded = decode(&engine_reply(&[row]), &fields(&names));
        assert_eq!(decoded[0].get("c10"), Some("v10"));
        assert_eq!(decoded[0].get("c12"), Some("v12"));
    }
}
