use serde::{Deserialize, Serialize};

/// Body of `POST /recipes` and `PUT /recipes/{id}`. Every field is
/// required; a missing one is rejected before the handler runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeFields {
    pub title: String,
    pub description: String,
    pub ingredients: String,
    pub preparation_steps: String,
    pub cooking_time: i32,
    pub serving_size: i32,
    pub category: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn all_fields_present_deserializes() {
        let fields: RecipeFields = serde_json::from_value(json!({
            "title": "Soup",
            "description": "Warm",
            "ingredients": "water, salt",
            "preparation_steps": "boil",
            "cooking_time": 30,
            "serving_size": 2,
            "category": "Starter"
        }))
        .expect("complete payload");
        assert_eq!(fields.title, "Soup");
        assert_eq!(fields.cooking_time, 30);
    }

    #[test]
    fn missing_field_is_named_in_the_error() {
        let err = serde_json::from_value::<RecipeFields>(json!({
            "title": "Soup",
            "description": "Warm",
            "ingredients": "water, salt",
            "preparation_steps": "boil",
            "cooking_time": 30,
            "serving_size": 2
        }))
        .unwrap_err();
        assert!(err.to_string().contains("category"));
    }

    #[test]
    fn rating_and_owner_in_payload_are_ignored() {
        let fields: RecipeFields = serde_json::from_value(json!({
            "title": "Soup",
            "description": "Warm",
            "ingredients": "water",
            "preparation_steps": "boil",
            "cooking_time": 30,
            "serving_size": 2,
            "category": "Starter",
            "rating": 5.0,
            "user_id": 99
        }))
        .expect("unknown keys are ignored");
        assert_eq!(fields.category, "Starter");
    }
}
