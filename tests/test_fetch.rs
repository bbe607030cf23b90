use recipe_extract::config::FetchConfig;
use recipe_extract::fetchers::RequestFetcher;
use recipe_extract::{fetch_recipe, fetch_recipe_with_config, AppConfig, ImportError};

fn create_recipe_html(json_ld: &str) -> String {
    format!(
        r#"
        <!DOCTYPE html>
        <html>
        <head>
            <title>Recipe Page</title>
            <script type="application/ld+json">
                {json_ld}
            </script>
        </head>
        <body>
            <h1>Recipe</h1>
        </body>
        </html>
        "#
    )
}

fn fast_retry_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.fetch = FetchConfig {
        timeout: 5,
        retry_attempts: 1,
        retry_delay_ms: 10,
        ..FetchConfig::default()
    };
    config
}

#[tokio::test]
async fn test_fetch_recipe_from_structured_page() {
    let mut server = mockito::Server::new_async().await;
    let json_ld = r#"
    {
        "@context": "https://schema.org",
        "@type": "Recipe",
        "name": "Cottage Pie",
        "recipeIngredient": ["mince", "potatoes"],
        "recipeInstructions": [{"@type": "HowToStep", "text": "Brown the mince"}]
    }
    "#;

    let _m = server
        .mock("GET", "/recipe")
        .with_status(200)
        .with_header("content-type", "text/html")
        .with_body(create_recipe_html(json_ld))
        .create_async()
        .await;

    let url = format!("{}/recipe", server.url());
    let result = fetch_recipe(&url).await.unwrap();

    assert_eq!(result.title.as_deref(), Some("Cottage Pie"));
    assert_eq!(result.ingredients, vec!["mince", "potatoes"]);
    assert_eq!(result.instructions, vec!["Brown the mince"]);
}

#[tokio::test]
async fn test_fetch_recipe_falls_back_to_markup() {
    let mut server = mockito::Server::new_async().await;

    let _m = server
        .mock("GET", "/soup")
        .with_status(200)
        .with_header("content-type", "text/html")
        .with_body(r#"<html><body><h1>Grandma's Soup</h1><li class="ingredient">2 cups broth</li></body></html>"#)
        .create_async()
        .await;

    let url = format!("{}/soup", server.url());
    let result = fetch_recipe(&url).await.unwrap();

    assert_eq!(result.title.as_deref(), Some("Grandma's Soup"));
    assert_eq!(result.ingredients, vec!["2 cups broth"]);
}

#[tokio::test]
async fn test_client_error_is_not_retried() {
    let mut server = mockito::Server::new_async().await;

    let m = server
        .mock("GET", "/missing")
        .with_status(404)
        .expect(1)
        .create_async()
        .await;

    let url = format!("{}/missing", server.url());
    let err = fetch_recipe_with_config(&url, &fast_retry_config())
        .await
        .unwrap_err();

    assert!(matches!(err, ImportError::HttpStatus(404)));
    m.assert_async().await;
}

#[tokio::test]
async fn test_server_error_is_retried_once() {
    let mut server = mockito::Server::new_async().await;

    let m = server
        .mock("GET", "/flaky")
        .with_status(503)
        .expect(2)
        .create_async()
        .await;

    let url = format!("{}/flaky", server.url());
    let err = fetch_recipe_with_config(&url, &fast_retry_config())
        .await
        .unwrap_err();

    assert!(matches!(err, ImportError::HttpStatus(503)));
    m.assert_async().await;
}

#[tokio::test]
async fn test_fetcher_returns_body() {
    let mut server = mockito::Server::new_async().await;

    let _m = server
        .mock("GET", "/page")
        .with_status(200)
        .with_body("<p>hello</p>")
        .create_async()
        .await;

    let fetcher = RequestFetcher::new(&FetchConfig::default()).unwrap();
    let body = fetcher
        .fetch(&format!("{}/page", server.url()))
        .await
        .unwrap();

    assert_eq!(body, "<p>hello</p>");
}

#[tokio::test]
async fn test_unreachable_host_fails() {
    let mut config = fast_retry_config();
    config.fetch.retry_attempts = 0;

    let result = fetch_recipe_with_config("http://127.0.0.1:9/recipe", &config).await;

    assert!(matches!(result, Err(ImportError::FetchError(_))));
}
