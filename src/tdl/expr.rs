// src/tdl/expr.rs

use once_cell::sync::Lazy;
use regex::Regex;

use crate::schema::{FieldSpec, FieldType};

/// A plain method reference, optionally reaching up one level with `..`.
static METHOD_REF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\.\.)?[a-zA-Z0-9_]+$").expect("method reference regex"));

/// Whether `field` names a method (and so is fitted into a type template)
/// rather than being a literal expression.
pub fn is_method_reference(field: &str) -> bool {
    METHOD_REF.is_match(field)
}

/// The value expression for a field, as placed inside its `<SET>` element.
pub fn value_expression(spec: &FieldSpec) -> String {
    let f = spec.field.as_str();
    if !is_method_reference(f) {
        return f.to_string();
    }
    match spec.ty {
        FieldType::Text => format!("${f}"),
        FieldType::Logical => format!("if ${f} then 1 else 0"),
        FieldType::Date => format!(
            r#"if $$IsEmpty:${f} then $$StrByCharCode:241 else $$PyrlYYYYMMDDFormat:${f}:"-""#
        ),
        FieldType::Number => format!(r#"if $$IsEmpty:${f} then "0" else $$String:${f}"#),
        FieldType::Amount => format!(
            r#"$$StringFindAndReplace:(if $$IsDebit:${f} then -$$NumValue:${f} else $$NumValue:${f}):"(-)":"-""#
        ),
        FieldType::Quantity => format!(
            r#"$$StringFindAndReplace:(if $$IsInwards:${f} then $$Number:$$String:${f}:"TailUnits" else -$$Number:$$String:${f}:"TailUnits"):"(-)":"-""#
        ),
        FieldType::Rate => format!("if $$IsEmpty:${f} then 0 else $$Number:${f}"),
        FieldType::Raw | FieldType::Unknown => f.to_string(),
    }
}
