//! Maps a [`Recipe`] onto Tandoor's stricter recipe schema.
//!
//! All ingredients go onto the first step; mapping ingredients to the step
//! that uses them is left to the user inside Tandoor.

use crate::model::{Ingredient, Recipe, RecipeYield};
use crate::tandoor::schema::{ImportedStep, NamedRef, TandoorIngredient, TandoorRecipe, TandoorStep};
use log::debug;

const PLACEHOLDER_STEP: &str = "Prepare ingredients";

/// Total minutes of a `PT#H#M` duration; 0 when absent or unparseable
pub fn parse_duration(duration: Option<&str>) -> u32 {
    let Some(duration) = duration else {
        return 0;
    };
    let Some(start) = duration.find("PT") else {
        return 0;
    };

    let mut hours: u32 = 0;
    let mut minutes: u32 = 0;
    let mut digits = String::new();
    for c in duration[start + 2..].chars() {
        match c {
            '0'..='9' => digits.push(c),
            'H' | 'h' => hours = digits.parse().unwrap_or(0),
            'M' | 'm' => {
                minutes = digits.parse().unwrap_or(0);
                break;
            }
            _ => break,
        }
        if !c.is_ascii_digit() {
            digits.clear();
        }
    }

    hours.saturating_mul(60).saturating_add(minutes)
}

/// Serving count plus the descriptive text it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Servings {
    pub amount: u32,
    pub text: String,
}

pub fn parse_servings(recipe_yield: Option<&RecipeYield>) -> Servings {
    match recipe_yield {
        Some(RecipeYield::Number(n)) => Servings {
            amount: n.round().max(0.0) as u32,
            text: String::new(),
        },
        Some(RecipeYield::Text(text)) => Servings {
            amount: first_integer(text).unwrap_or(1),
            text: text.trim().to_string(),
        },
        None => Servings {
            amount: 1,
            text: String::new(),
        },
    }
}

fn first_integer(text: &str) -> Option<u32> {
    let digits: String = text
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

pub fn map_ingredient(ingredient: &Ingredient) -> TandoorIngredient {
    match ingredient {
        Ingredient::Text(text) => TandoorIngredient {
            food: NamedRef::new(text.trim()),
            unit: None,
            amount: 0.0,
            note: String::new(),
        },
        Ingredient::Structured(structured) => TandoorIngredient {
            food: NamedRef::new(structured.food.trim()),
            unit: structured
                .unit
                .as_deref()
                .map(str::trim)
                .filter(|u| !u.is_empty())
                .map(NamedRef::new),
            amount: structured.quantity.as_ref().map_or(0.0, |q| q.amount()),
            note: String::new(),
        },
    }
}

/// Build the Tandoor payload for a finished recipe
pub fn to_tandoor(recipe: &Recipe) -> TandoorRecipe {
    let ingredients: Vec<TandoorIngredient> =
        recipe.recipe_ingredient.iter().map(map_ingredient).collect();

    let mut steps: Vec<TandoorStep> = recipe
        .recipe_instructions
        .iter()
        .map(|instruction| TandoorStep {
            instruction: instruction.body(),
            ingredients: Vec::new(),
            show_ingredients_table: None,
        })
        .collect();

    match steps.first_mut() {
        Some(first) => first.ingredients = ingredients,
        None if !ingredients.is_empty() => steps.push(TandoorStep {
            instruction: PLACEHOLDER_STEP.to_string(),
            ingredients,
            show_ingredients_table: None,
        }),
        None => {}
    }

    let servings = parse_servings(recipe.recipe_yield.as_ref());

    TandoorRecipe {
        name: recipe.name.clone(),
        description: recipe.description.clone().unwrap_or_default(),
        steps,
        source_url: recipe.url.clone(),
        working_time: parse_duration(recipe.prep_time.as_deref()),
        waiting_time: parse_duration(recipe.cook_time.as_deref()),
        servings: servings.amount,
        servings_text: servings.text,
        internal: true,
    }
}

/// Undo Tandoor's importer collapsing a whole method into one step.
///
/// Only a lone step whose text spans several non-empty lines is split. The
/// first resulting step keeps the ingredients and table flag.
pub fn split_collapsed_steps(steps: Vec<ImportedStep>) -> Vec<ImportedStep> {
    if steps.len() != 1 || !steps[0].instruction.contains('\n') {
        return steps;
    }

    let lines: Vec<String> = steps[0]
        .instruction
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();
    if lines.len() <= 1 {
        return steps;
    }

    debug!("Splitting collapsed instruction block into {} steps", lines.len());

    let Some(original) = steps.into_iter().next() else {
        return Vec::new();
    };
    let mut first = Some(original);

    lines
        .into_iter()
        .map(|line| match first.take() {
            Some(mut step) => {
                step.instruction = line;
                step.show_ingredients_table = Some(step.show_ingredients_table.unwrap_or(true));
                step
            }
            None => ImportedStep {
                instruction: line,
                ingredients: Vec::new(),
                show_ingredients_table: Some(false),
                rest: Default::default(),
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Instruction, Quantity, StructuredIngredient, StructuredStep};
    use serde_json::json;

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration(Some("PT1H30M")), 90);
        assert_eq!(parse_duration(Some("PT45M")), 45);
        assert_eq!(parse_duration(Some("PT2H")), 120);
        assert_eq!(parse_duration(Some("PT0H15M")), 15);
        assert_eq!(parse_duration(Some("PT5400.0S")), 0);
        assert_eq!(parse_duration(None), 0);
        assert_eq!(parse_duration(Some("garbage")), 0);
        assert_eq!(parse_duration(Some("")), 0);
    }

    #[test]
    fn test_parse_servings() {
        assert_eq!(
            parse_servings(Some(&RecipeYield::Text("4 servings".into()))),
            Servings {
                amount: 4,
                text: "4 servings".into()
            }
        );
        assert_eq!(
            parse_servings(Some(&RecipeYield::Number(6.0))),
            Servings {
                amount: 6,
                text: String::new()
            }
        );
        assert_eq!(
            parse_servings(None),
            Servings {
                amount: 1,
                text: String::new()
            }
        );
        assert_eq!(
            parse_servings(Some(&RecipeYield::Text("  serves a crowd ".into()))),
            Servings {
                amount: 1,
                text: "serves a crowd".into()
            }
        );
        assert_eq!(
            parse_servings(Some(&RecipeYield::Text("Makes 12-16 cookies".into()))).amount,
            12
        );
    }

    #[test]
    fn test_map_ingredients() {
        let plain = map_ingredient(&Ingredient::Text("salt".into()));
        assert_eq!(plain.food.name, "salt");
        assert!(plain.unit.is_none());
        assert_eq!(plain.amount, 0.0);

        let structured = map_ingredient(&Ingredient::Structured(StructuredIngredient {
            food: "flour".into(),
            unit: Some("g".into()),
            quantity: Some(Quantity::Text("250".into())),
            note: Some("sifted".into()),
        }));
        assert_eq!(structured.unit, Some(NamedRef::new("g")));
        assert_eq!(structured.amount, 250.0);
        assert_eq!(structured.note, "");

        let vague = map_ingredient(&Ingredient::Structured(StructuredIngredient {
            food: "pepper".into(),
            unit: None,
            quantity: Some(Quantity::Text("to taste".into())),
            note: None,
        }));
        assert_eq!(vague.amount, 0.0);
    }

    fn recipe_with(steps: Vec<Instruction>, ingredients: Vec<Ingredient>) -> Recipe {
        Recipe {
            name: "Test".into(),
            recipe_instructions: steps,
            recipe_ingredient: ingredients,
            ..Default::default()
        }
    }

    #[test]
    fn test_ingredients_attach_to_first_step_only() {
        let recipe = recipe_with(
            vec![
                Instruction::Text("Chop".into()),
                Instruction::Step(StructuredStep {
                    text: Some("Fry".into()),
                    ..Default::default()
                }),
                Instruction::Step(StructuredStep {
                    instruction: Some("Serve".into()),
                    ..Default::default()
                }),
            ],
            vec![Ingredient::Text("onion".into()), Ingredient::Text("oil".into())],
        );

        let payload = to_tandoor(&recipe);
        assert_eq!(payload.steps.len(), 3);
        assert_eq!(payload.steps[0].ingredients.len(), 2);
        assert!(payload.steps[1..].iter().all(|s| s.ingredients.is_empty()));
        let texts: Vec<&str> = payload.steps.iter().map(|s| s.instruction.as_str()).collect();
        assert_eq!(texts, ["Chop", "Fry", "Serve"]);
        assert!(payload.internal);
    }

    #[test]
    fn test_placeholder_step_when_no_instructions() {
        let payload = to_tandoor(&recipe_with(vec![], vec![Ingredient::Text("bread".into())]));
        assert_eq!(payload.steps.len(), 1);
        assert_eq!(payload.steps[0].instruction, "Prepare ingredients");
        assert_eq!(payload.steps[0].ingredients.len(), 1);

        assert!(to_tandoor(&recipe_with(vec![], vec![])).steps.is_empty());
    }

    #[test]
    fn test_times_servings_and_source() {
        let recipe = Recipe {
            name: "Roast".into(),
            description: Some("Sunday roast".into()),
            url: Some("https://example.test/roast".into()),
            prep_time: Some("PT20M".into()),
            cook_time: Some("PT1H30M".into()),
            recipe_yield: Some(RecipeYield::Text("6 portions".into())),
            ..Default::default()
        };

        let payload = to_tandoor(&recipe);
        assert_eq!(payload.working_time, 20);
        assert_eq!(payload.waiting_time, 90);
        assert_eq!(payload.servings, 6);
        assert_eq!(payload.servings_text, "6 portions");
        assert_eq!(payload.source_url.as_deref(), Some("https://example.test/roast"));
        assert_eq!(payload.description, "Sunday roast");
    }

    fn imported(instruction: &str) -> ImportedStep {
        ImportedStep {
            instruction: instruction.into(),
            ingredients: vec![json!({"food": {"name": "onion"}, "amount": 2})],
            show_ingredients_table: None,
            rest: Default::default(),
        }
    }

    #[test]
    fn test_split_collapsed_block() {
        let split = split_collapsed_steps(vec![imported("Chop onions\nFry onions\nServe")]);

        assert_eq!(split.len(), 3);
        assert_eq!(split[0].instruction, "Chop onions");
        assert_eq!(split[0].ingredients.len(), 1);
        assert_eq!(split[0].show_ingredients_table, Some(true));
        for step in &split[1..] {
            assert!(step.ingredients.is_empty());
            assert_eq!(step.show_ingredients_table, Some(false));
        }
        assert_eq!(split[2].instruction, "Serve");
    }

    #[test]
    fn test_split_keeps_explicit_table_flag() {
        let mut step = imported("a\n\n  \nb");
        step.show_ingredients_table = Some(false);
        let split = split_collapsed_steps(vec![step]);
        assert_eq!(split.len(), 2);
        assert_eq!(split[0].show_ingredients_table, Some(false));
    }

    #[test]
    fn test_split_leaves_other_shapes_alone() {
        let single = vec![imported("Chop and fry the onions")];
        assert_eq!(split_collapsed_steps(single.clone()), single);

        let blank_lines = vec![imported("Only line\n\n   \n")];
        assert_eq!(split_collapsed_steps(blank_lines.clone()), blank_lines);

        let two = vec![imported("Chop\nFry"), imported("Serve\nEnjoy")];
        assert_eq!(split_collapsed_steps(two.clone()), two);

        assert!(split_collapsed_steps(Vec::new()).is_empty());
    }
}
