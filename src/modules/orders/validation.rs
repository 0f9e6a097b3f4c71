use bookstore_kernel::validation::{FieldKind, FieldRule, Schema};
use once_cell::sync::Lazy;

static ORDER_SCHEMA: Lazy<Schema> = Lazy::new(|| {
    Schema::new(vec![
        FieldRule::required("email", FieldKind::Email),
        FieldRule::required("product", FieldKind::String),
        FieldRule::required("quantity", FieldKind::Integer { min: Some(1) }),
    ])
});

pub fn order_schema() -> &'static Schema {
    &ORDER_SCHEMA
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_well_formed_order() {
        let candidate = json!({"email": "reader@example.com", "product": "b1", "quantity": 1});
        assert!(order_schema().validate(&candidate).is_ok());
    }

    #[test]
    fn rejects_bad_email_and_zero_quantity() {
        let candidate = json!({"email": "reader@", "product": "b1", "quantity": 0});
        let errors = order_schema().validate(&candidate).unwrap_err();
        let kinds: Vec<&str> = errors.violations().iter().map(|v| v.kind).collect();
        assert_eq!(kinds, vec!["string.email", "number.min"]);
    }

    #[test]
    fn product_is_required() {
        let candidate = json!({"email": "reader@example.com", "quantity": 2});
        let errors = order_schema().validate(&candidate).unwrap_err();
        assert_eq!(errors.violations()[0].path, "product");
        assert_eq!(errors.violations()[0].kind, "any.required");
    }
}
