// src/tdl/compile.rs
//
// Builds the export request as a handful of fragments (header, parts, lines,
// fields, collection, formulae, footer) joined once at the end. The engine
// is strict about this shape, so every literal below is load-bearing.

use tracing::{debug, instrument, trace};

use super::escape::escape_text;
use super::expr::value_expression;
use super::RequestDocument;
use crate::schema::{FieldSpec, TableSpec};

const REPORT_NAME: &str = "MyReportLedgerTable";
const FORM_NAME: &str = "MyForm";
const COLLECTION_NAME: &str = "MyCollection";
const BLANK_FIELD: &str = "FldBlank";

/// Placeholders the header leaves for substitution. Anything else in braces
/// came from the caller's input and is sent as is.
pub const PERIOD_PLACEHOLDERS: [&str; 2] = ["fromDate", "toDate"];

const FOOTER: &str = "</TDLMESSAGE></TDL></DESC></BODY></ENVELOPE>";

/// `prefix` followed by `n` padded to at least two digits, e.g. `Fld01`.
fn numbered(prefix: &str, n: usize) -> String {
    format!("{prefix}{n:02}")
}

fn part_name(n: usize) -> String {
    numbered("MyPart", n)
}

fn line_name(n: usize) -> String {
    numbered("MyLine", n)
}

fn field_name(n: usize) -> String {
    numbered("Fld", n)
}

fn field_tag(n: usize) -> String {
    numbered("F", n)
}

fn filter_name(n: usize) -> String {
    numbered("Fltr", n)
}

/// A collection path split into the collection type and the chain of routes
/// walked beneath it. The first route is always our own collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub target: String,
    pub routes: Vec<String>,
}

impl Route {
    pub fn parse(collection: &str) -> Self {
        let mut segments = collection.split('.');
        let target = segments.next().unwrap_or_default().to_string();
        let routes = std::iter::once(COLLECTION_NAME.to_string())
            .chain(segments.map(str::to_string))
            .collect();
        Self { target, routes }
    }

    pub fn depth(&self) -> usize {
        self.routes.len()
    }
}

/// Static variables and the report/form scaffolding. The period placeholders
/// stay in place for substitution; the company is resolved here.
pub fn header(company: &str) -> String {
    format!(
        concat!(
            r#"<?xml version="1.0" encoding="utf-8"?>"#,
            "<ENVELOPE><HEADER><VERSION>1</VERSION><TALLYREQUEST>Export</TALLYREQUEST>",
            "<TYPE>Data</TYPE><ID>{report}</ID></HEADER>",
            "<BODY><DESC><STATICVARIABLES>",
            "<SVEXPORTFORMAT>XML (Data Interchange)</SVEXPORTFORMAT>",
            "<SVFROMDATE>{{fromDate}}</SVFROMDATE><SVTODATE>{{toDate}}</SVTODATE>",
            "<SVCURRENTCOMPANY>{company}</SVCURRENTCOMPANY>",
            "</STATICVARIABLES><TDL><TDLMESSAGE>",
            r#"<REPORT NAME="{report}"><FORMS>{form}</FORMS></REPORT>"#,
            r#"<FORM NAME="{form}"><PARTS>{part}</PARTS></FORM>"#,
        ),
        report = REPORT_NAME,
        form = FORM_NAME,
        part = part_name(1),
        company = escape_text(company),
    )
}

/// One vertically scrolled PART per route, each repeating its own LINE.
pub fn parts(route: &Route) -> String {
    route
        .routes
        .iter()
        .enumerate()
        .map(|(i, r)| {
            let n = i + 1;
            format!(
                r#"<PART NAME="{part}"><LINES>{line}</LINES><REPEAT>{line} : {r}</REPEAT><SCROLLED>Vertical</SCROLLED></PART>"#,
                part = part_name(n),
                line = line_name(n),
            )
        })
        .collect()
}

/// Navigation lines explode into the next part; the last line carries the fields.
pub fn lines(route: &Route, field_count: usize) -> String {
    let depth = route.depth();
    let mut out: String = (1..depth)
        .map(|n| {
            format!(
                r#"<LINE NAME="{line}"><FIELDS>{BLANK_FIELD}</FIELDS><EXPLODE>{next}</EXPLODE></LINE>"#,
                line = line_name(n),
                next = part_name(n + 1),
            )
        })
        .collect();

    let field_list = (1..=field_count)
        .map(field_name)
        .collect::<Vec<_>>()
        .join(",");
    out.push_str(&format!(
        r#"<LINE NAME="{line}"><FIELDS>{field_list}</FIELDS></LINE>"#,
        line = line_name(depth),
    ));
    out
}

/// A single FIELD element with its value expression and reply tag.
pub fn field(spec: &FieldSpec, n: usize) -> String {
    format!(
        r#"<FIELD NAME="{name}"><SET>{set}</SET><XMLTAG>{tag}</XMLTAG></FIELD>"#,
        name = field_name(n),
        set = value_expression(spec),
        tag = field_tag(n),
    )
}

/// Every declared field in order, then the blank padding field.
pub fn fields(specs: &[FieldSpec]) -> String {
    let mut out: String = specs
        .iter()
        .enumerate()
        .map(|(i, spec)| field(spec, i + 1))
        .collect();
    out.push_str(&format!(
        r#"<FIELD NAME="{BLANK_FIELD}"><SET>""</SET></FIELD>"#
    ));
    out
}

pub fn collection(route: &Route, fetch: &[String], filters: &[String]) -> String {
    let mut out = format!(
        r#"<COLLECTION NAME="{COLLECTION_NAME}"><TYPE>{}</TYPE>"#,
        route.target
    );
    if !fetch.is_empty() {
        out.push_str(&format!("<FETCH>{}</FETCH>", fetch.join(",")));
    }
    if !filters.is_empty() {
        let refs = (1..=filters.len())
            .map(filter_name)
            .collect::<Vec<_>>()
            .join(",");
        out.push_str(&format!("<FILTER>{refs}</FILTER>"));
    }
    out.push_str("</COLLECTION>");
    out
}

/// Filter formulae, bound verbatim: they are engine expressions, not text.
pub fn formulae(filters: &[String]) -> String {
    filters
        .iter()
        .enumerate()
        .map(|(i, f)| {
            format!(
                r#"<SYSTEM TYPE="Formulae" NAME="{}">{f}</SYSTEM>"#,
                filter_name(i + 1)
            )
        })
        .collect()
}

/// Compile `table` into an export request for `company`.
///
/// Total over any input: an empty collection or field list yields a
/// degenerate request rather than an error.
#[instrument(level = "debug", skip(table), fields(table = %table.name))]
pub fn compile(table: &TableSpec, company: &str) -> RequestDocument {
    let route = Route::parse(&table.collection);

    let doc = [
        header(company),
        parts(&route),
        lines(&route, table.fields.len()),
        fields(&table.fields),
        collection(&route, &table.fetch, &table.filters),
        formulae(&table.filters),
        FOOTER.to_string(),
    ]
    .concat();

    debug!(depth = route.depth(), fields = table.fields.len(), len = doc.len(), "compiled request");
    trace!(%doc, "request document");
    RequestDocument::new(doc)
}
