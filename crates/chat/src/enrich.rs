//! Context enrichment — prefix a query with serialized key/value context.

use charla_core::ContextMap;

/// Merge free-form context into a single enriched text block prepended to the
/// user query.
///
/// An empty map returns the query unchanged. Otherwise the result is
/// `"Contexto: k1=v1, k2=v2\n\nConsulta: {query}"`, iterating the map in the
/// caller's insertion order with no trailing separator. Values render via
/// their plain textual form: strings unquoted, everything else as compact
/// JSON.
pub fn enrich(query: &str, context: &ContextMap) -> String {
    if context.is_empty() {
        return query.to_string();
    }

    let pairs = context
        .iter()
        .map(|(key, value)| format!("{key}={}", render_value(value)))
        .collect::<Vec<_>>()
        .join(", ");

    format!("Contexto: {pairs}\n\nConsulta: {query}")
}

fn render_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
