//! Prompts shown when execution suspends for user input.

use serde_json::Value;

use waypoint_contracts::{plan::Context, step::Step};

/// Skill id whose missing input triggers the product-selection prompt.
pub const ADD_TO_CART_SKILL: &str = "add-to-cart";

/// Build the prompt for `step`, which cannot run until `missing` are bound.
///
/// When the step adds to cart and the context carries a `products` list, the
/// prompt enumerates up to `candidate_limit` candidates as
/// `index. name - price`. Otherwise it names the step and the missing values.
pub fn user_prompt(step: &Step, missing: &[String], context: &Context, candidate_limit: usize) -> String {
    if step.skill_id == ADD_TO_CART_SKILL {
        if let Some(Value::Array(products)) = context.get("products") {
            return selection_prompt(products, candidate_limit);
        }
    }
    format!(
        "To continue with \"{}\", please provide: {}",
        step.description,
        missing.join(", ")
    )
}

fn selection_prompt(products: &[Value], candidate_limit: usize) -> String {
    if products.is_empty() {
        return "No matching products were found. Please provide a product id (selectedProductId) to add to the cart.".to_string();
    }

    let mut lines = vec!["Please choose a product to add to the cart:".to_string()];
    for (index, product) in products.iter().take(candidate_limit).enumerate() {
        lines.push(format!(
            "{}. {} - {}",
            index + 1,
            display_field(product, "name"),
            display_field(product, "price")
        ));
    }
    if products.len() > candidate_limit {
        lines.push(format!("…and {} more", products.len() - candidate_limit));
    }
    lines.push("Reply with the product id as selectedProductId.".to_string());
    lines.join("\n")
}

fn display_field(product: &Value, field: &str) -> String {
    match product.get(field) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => "?".to_string(),
        Some(other) => other.to_string(),
    }
}
