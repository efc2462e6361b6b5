//! Step input templates.
//!
//! A step input field is either a literal value or a string of the exact form
//! `{{name}}`. Only whole-field, single-variable placeholders are recognized:
//! `"{{a}} and {{b}}"`, `"price: {{p}}"`, and `"{{a.b}}"`-style paths are all
//! passed through as literal strings. There is no expression language.

use serde_json::{Map, Value};

use waypoint_contracts::plan::Context;

/// The variable name if `value` is a whole-field `{{name}}` placeholder.
///
/// Surrounding whitespace inside the braces is ignored; the name itself must
/// be non-empty and contain no braces, whitespace, or dots.
pub fn placeholder_name(value: &Value) -> Option<&str> {
    let text = value.as_str()?;
    let inner = text.strip_prefix("{{")?.strip_suffix("}}")?.trim();
    let valid = !inner.is_empty()
        && inner
            .chars()
            .all(|c| !c.is_whitespace() && c != '{' && c != '}' && c != '.');
    valid.then_some(inner)
}

/// Context overlaid with an optional per-call override.
pub fn merge(context: &Context, overrides: Option<&Map<String, Value>>) -> Context {
    let mut merged = context.clone();
    if let Some(overrides) = overrides {
        for (key, value) in overrides {
            merged.insert(key.clone(), value.clone());
        }
    }
    merged
}

/// Substitute every placeholder in `input` from `bindings`.
///
/// An unbound placeholder resolves to `null`; the engine's input gate runs
/// first, so it never hands an unbound input to a skill.
pub fn resolve(input: &Map<String, Value>, bindings: &Context) -> Map<String, Value> {
    input
        .iter()
        .map(|(field, value)| {
            let resolved = match placeholder_name(value) {
                Some(name) => bindings.get(name).cloned().unwrap_or(Value::Null),
                None => value.clone(),
            };
            (field.clone(), resolved)
        })
        .collect()
}

/// Placeholder names in `input` whose key is absent from `bindings`, in field
/// order. An explicit JSON `null` is a binding.
pub fn missing_variables(input: &Map<String, Value>, bindings: &Context) -> Vec<String> {
    let mut missing = Vec::new();
    for value in input.values() {
        if let Some(name) = placeholder_name(value) {
            if !bindings.contains_key(name) && !missing.iter().any(|m| m == name) {
                missing.push(name.to_string());
            }
        }
    }
    missing
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(m) => m,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn recognizes_whole_field_placeholders_only() {
        assert_eq!(placeholder_name(&json!("{{selectedProductId}}")), Some("selectedProductId"));
        assert_eq!(placeholder_name(&json!("{{ query }}")), Some("query"));
        assert_eq!(placeholder_name(&json!("id: {{x}}")), None);
        assert_eq!(placeholder_name(&json!("{{a}} {{b}}")), None);
        assert_eq!(placeholder_name(&json!("{{a.b}}")), None);
        assert_eq!(placeholder_name(&json!("{{}}")), None);
        assert_eq!(placeholder_name(&json!(42)), None);
    }

    #[test]
    fn resolve_substitutes_and_passes_literals() {
        let input = map(json!({
            "productId": "{{selectedProductId}}",
            "quantity": 1,
            "note": "gift {{wrap}}"
        }));
        let bindings = map(json!({ "selectedProductId": "p-100", "wrap": "yes" }));

        let resolved = resolve(&input, &bindings);

        assert_eq!(resolved["productId"], json!("p-100"));
        assert_eq!(resolved["quantity"], json!(1));
        assert_eq!(resolved["note"], json!("gift {{wrap}}"));
    }

    #[test]
    fn resolve_keeps_structured_values() {
        let input = map(json!({ "product": "{{firstProduct}}" }));
        let bindings = map(json!({ "firstProduct": { "id": "p-1", "price": 99 } }));

        assert_eq!(resolve(&input, &bindings)["product"], json!({ "id": "p-1", "price": 99 }));
    }

    #[test]
    fn override_wins_over_context() {
        let context = map(json!({ "query": "耳机", "budget": 300 }));
        let overrides = map(json!({ "query": "降噪耳机" }));

        let merged = merge(&context, Some(&overrides));

        assert_eq!(merged["query"], json!("降噪耳机"));
        assert_eq!(merged["budget"], json!(300));
        assert_eq!(context["query"], json!("耳机"), "context itself is untouched");
    }

    #[test]
    fn missing_variables_lists_only_absent_keys() {
        let input = map(json!({
            "a": "{{bound}}",
            "b": "{{absent}}",
            "c": "{{nulled}}",
            "d": "{{absent}}"
        }));
        let bindings = map(json!({ "bound": 1, "nulled": null }));

        assert_eq!(missing_variables(&input, &bindings), vec!["absent"]);
    }
}
