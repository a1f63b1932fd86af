use mockito::Server;
use serde_json::json;
use tandoor_import::{
    extract_recipe, tandoor_client, AuthScheme, ExtractionInput, PipelineError, ProviderKind,
    RecipeExtractor, Settings,
};

fn settings_from(toml: &str) -> Settings {
    ::config::Config::builder()
        .add_source(::config::File::from_str(toml, ::config::FileFormat::Toml))
        .build()
        .unwrap()
        .try_deserialize()
        .unwrap()
}

/// Extraction driven purely by settings, as the CLI does it
#[tokio::test]
async fn test_extract_recipe_with_settings() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/v1/messages")
        .with_status(200)
        .with_body(
            json!({"content": [{"type": "text", "text": "{\"name\": \"Pancakes\"}"}]}).to_string(),
        )
        .create_async()
        .await;

    let settings = settings_from(&format!(
        r#"
        default_provider = "anthropic"

        [providers.anthropic]
        model = "claude-sonnet-4-5"
        api_key = "test-key"
        base_url = "{}"
        "#,
        server.url()
    ));

    let recipe = extract_recipe(&ExtractionInput::Text("flour, milk, eggs".into()), &settings)
        .await
        .unwrap();
    assert_eq!(recipe.name, "Pancakes");
}

#[test]
fn test_disabled_provider_is_rejected() {
    let settings = settings_from(
        r#"
        default_provider = "openai"

        [providers.openai]
        enabled = false
        model = "gpt-4o-mini"
        api_key = "test-key"
        "#,
    );

    let result = RecipeExtractor::builder().settings(settings).build();
    assert!(matches!(result, Err(PipelineError::BuilderError(_))));
}

#[test]
fn test_unknown_default_provider_is_rejected() {
    let settings = settings_from(r#"default_provider = "mystery""#);
    let result = RecipeExtractor::builder().settings(settings).build();
    assert!(matches!(result, Err(PipelineError::BuilderError(_))));
}

#[test]
fn test_explicit_provider_overrides_settings() {
    let settings = settings_from(
        r#"
        default_provider = "openai"

        [providers.openai]
        model = "gpt-4o-mini"
        api_key = "test-key"
        "#,
    );

    let extractor = RecipeExtractor::builder()
        .settings(settings)
        .provider(ProviderKind::Google)
        .api_key("google-key")
        .build()
        .unwrap();
    assert_eq!(extractor.provider_name(), "google");
}

#[test]
fn test_tandoor_client_from_settings() {
    let settings = settings_from(
        r#"
        [tandoor]
        base_url = "https://recipes.example.test/"
        token = "abc"
        auth_scheme = "token"
        "#,
    );
    let client = tandoor_client(&settings).unwrap();
    assert_eq!(client.auth_scheme(), AuthScheme::Token);

    let missing = settings_from(
        r#"
        [tandoor]
        base_url = "https://recipes.example.test/"
        "#,
    );
    assert!(matches!(
        tandoor_client(&missing),
        Err(PipelineError::BuilderError(_))
    ));
}

/// Live URL extraction with the configured default provider.
/// This test is ignored by default since it requires network access and an API key
#[tokio::test]
#[ignore]
async fn test_live_url_extraction() {
    let settings = Settings::load().unwrap();
    let recipe = extract_recipe(
        &ExtractionInput::Url(
            "https://www.bbcgoodfood.com/recipes/classic-cottage-pie".to_string(),
        ),
        &settings,
    )
    .await
    .unwrap();

    assert!(!recipe.name.is_empty());
    assert!(!recipe.recipe_ingredient.is_empty());
    assert!(recipe.image.is_some());
}
