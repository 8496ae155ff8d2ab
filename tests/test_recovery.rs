use ai_recipes::{recover, AnalysisResult};

#[test]
fn test_direct_parse() {
    let reply = r#"{"ingredients":[{"name":"egg","category":"protein"}],"recipes":[{"title":"Omelette","prep_time":"10 minutes","difficulty":"easy","steps":["Beat eggs","Cook in pan"]}]}"#;

    let result = recover(reply);

    assert_eq!(result.ingredients.len(), 1);
    assert_eq!(result.ingredients[0].name, "egg");
    assert_eq!(result.ingredients[0].category, "protein");
    assert_eq!(result.recipes.len(), 1);
    assert_eq!(result.recipes[0].title, "Omelette");
    assert_eq!(result.recipes[0].steps, vec!["Beat eggs", "Cook in pan"]);
}

#[test]
fn test_fenced_reply_with_prose() {
    let reply = "Here is the result:\n```json\n{\"ingredients\":[],\"recipes\":[]}\n```";

    let result = recover(reply);

    assert_eq!(result, AnalysisResult::default());
}

#[test]
fn test_fenced_reply_with_content() {
    let reply = "```json\n{\"ingredients\":[{\"name\":\"tomato\",\"category\":\"vegetable\"}],\"recipes\":[]}\n```\nEnjoy!";

    let result = recover(reply);

    assert_eq!(result.ingredients.len(), 1);
    assert_eq!(result.ingredients[0].name, "tomato");
}

#[test]
fn test_salvage_from_broken_outer_object() {
    let reply = r#"{"ingredients": [{"name": "carrot", "category": "vegetable"}, {"name": "rice", "category": "grain"}], "recipes": [{"title": "Carrot rice", "steps": ["Boil"#;

    let result = recover(reply);

    let names: Vec<&str> = result.ingredients.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["carrot", "rice"]);
    assert!(result.recipes.is_empty());
}

#[test]
fn test_salvage_with_trailing_comma_in_object() {
    let reply = r#"{"ingredients": [{"name": "milk", "category": "dairy"}], "recipes": [],}"#;

    let result = recover(reply);

    assert_eq!(result.ingredients.len(), 1);
    assert_eq!(result.ingredients[0].name, "milk");
}

#[test]
fn test_more_than_three_recipes_keeps_first_three() {
    let recipes: Vec<String> = (1..=5)
        .map(|n| {
            format!(
                r#"{{"title":"Dish {}","prep_time":"5 minutes","difficulty":"easy","steps":["Step"]}}"#,
                n
            )
        })
        .collect();
    let reply = format!(r#"{{"ingredients":[],"recipes":[{}]}}"#, recipes.join(","));

    let result = recover(&reply);

    let titles: Vec<&str> = result.recipes.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["Dish 1", "Dish 2", "Dish 3"]);
}

#[test]
fn test_garbage_input() {
    let result = recover("I'm sorry, I can't see any food in this picture.");
    assert!(result.is_empty());
}

#[test]
fn test_missing_fields_get_defaults() {
    let reply = r#"{"ingredients":[{"name":"basil"}],"recipes":[{"title":"Pesto"}]}"#;

    let result = recover(reply);

    assert_eq!(result.ingredients[0].category, "unknown");
    assert_eq!(result.recipes[0].prep_time, "30 minutes");
    assert_eq!(result.recipes[0].difficulty, "medium");
    assert!(result.recipes[0].steps.is_empty());
}

#[test]
fn test_recipe_with_empty_steps_passes_through() {
    let reply = r#"{"ingredients":[],"recipes":[{"title":"Toast","prep_time":"2 minutes","difficulty":"easy","steps":[]}]}"#;

    let result = recover(reply);

    assert_eq!(result.recipes.len(), 1);
    assert!(result.recipes[0].steps.is_empty());
}

#[test]
fn test_malformed_entries_are_discarded() {
    let reply = r#"{"ingredients":[{"name":""},"cheese",{"name":"ham","category":"protein"}],"recipes":[{"steps":["no title"]},{"title":"Sandwich","steps":["Assemble"]}]}"#;

    let result = recover(reply);

    assert_eq!(result.ingredients.len(), 1);
    assert_eq!(result.ingredients[0].name, "ham");
    assert_eq!(result.recipes.len(), 1);
    assert_eq!(result.recipes[0].title, "Sandwich");
}
