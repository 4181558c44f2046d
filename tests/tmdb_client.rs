mod common;

use common::mock_catalog::{MockCatalogServer, MockResponse};
use movie_shelf::catalog::{CatalogError, CatalogService, TmdbClient};
use movie_shelf::config::CatalogConfig;
use serde_json::json;

fn client_for(server: &MockCatalogServer) -> TmdbClient {
    TmdbClient::new(&CatalogConfig {
        base_url: server.base_url(),
        image_base_url: "https://images.test/w500".to_string(),
        api_key: Some("test-key".to_string()),
        ..CatalogConfig::default()
    })
    .expect("client")
}

#[tokio::test]
async fn top_movies_are_mapped_with_image_urls() {
    let server = MockCatalogServer::start().await;
    server.respond(
        "/movie/top_rated",
        MockResponse::json(json!({
            "page": 2,
            "total_pages": 40,
            "results": [
                {
                    "id": 278,
                    "title": "The Shawshank Redemption",
                    "overview": "Two imprisoned men bond.",
                    "poster_path": "/poster.jpg",
                    "backdrop_path": null,
                    "vote_average": 8.7,
                    "genre_ids": [18, 80]
                }
            ]
        })),
    );

    let page = client_for(&server).get_top_movies(2).await.expect("page");
    assert_eq!(page.page, 2);
    assert_eq!(page.total_pages, Some(40));
    let movie = &page.results[0];
    assert_eq!(movie.id, 278);
    assert_eq!(movie.genre_ids, vec![18, 80]);
    assert_eq!(
        movie.poster.as_deref(),
        Some("https://images.test/w500/poster.jpg")
    );
    assert_eq!(movie.backdrop, None);

    let request = &server.requests()[0];
    assert_eq!(request.path, "/movie/top_rated");
    assert_eq!(request.query.get("page").map(String::as_str), Some("2"));
    assert_eq!(request.query.get("api_key").map(String::as_str), Some("test-key"));
    assert_eq!(request.query.get("language").map(String::as_str), Some("en-US"));
}

#[tokio::test]
async fn genres_are_listed() {
    let server = MockCatalogServer::start().await;
    server.respond(
        "/genre/movie/list",
        MockResponse::json(json!({
            "genres": [{"id": 28, "name": "Action"}, {"id": 18, "name": "Drama"}]
        })),
    );

    let list = client_for(&server).get_genres().await.expect("genres");
    let names: Vec<_> = list.genres.iter().map(|g| g.name.as_str()).collect();
    assert_eq!(names, vec!["Action", "Drama"]);
}

#[tokio::test]
async fn details_request_credits_and_map_director_and_cast() {
    let server = MockCatalogServer::start().await;
    server.respond(
        "/movie/155",
        MockResponse::json(json!({
            "production_companies": [{"name": "Syncopy", "logo_path": null}],
            "credits": {
                "cast": [
                    {"id": 2, "name": "Heath Ledger", "order": 1},
                    {"id": 1, "name": "Christian Bale", "order": 0}
                ],
                "crew": [{"id": 3, "name": "Christopher Nolan", "job": "Director"}]
            }
        })),
    );

    let details = client_for(&server)
        .get_movie_details(155)
        .await
        .expect("details");
    assert_eq!(details.production_company.expect("company").logo, None);
    assert_eq!(details.director.expect("director").name, "Christopher Nolan");
    let cast: Vec<_> = details.actors.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(cast, vec!["Christian Bale", "Heath Ledger"]);

    let request = &server.requests()[0];
    assert_eq!(
        request.query.get("append_to_response").map(String::as_str),
        Some("credits")
    );
}

#[tokio::test]
async fn error_status_carries_catalog_message() {
    let server = MockCatalogServer::start().await;
    server.respond(
        "/genre/movie/list",
        MockResponse::error(401, "Invalid API key: You must be granted a valid key."),
    );

    let err = client_for(&server).get_genres().await.expect_err("401");
    match &err {
        CatalogError::Status {
            endpoint,
            status,
            message,
        } => {
            assert_eq!(endpoint, "/genre/movie/list");
            assert_eq!(*status, 401);
            assert!(message.starts_with("Invalid API key"));
        }
        other => panic!("Expected status error, got {other:?}"),
    }
    assert!(!err.is_transient());
}

#[tokio::test]
async fn malformed_body_is_a_decode_error() {
    let server = MockCatalogServer::start().await;
    server.respond(
        "/movie/top_rated",
        MockResponse::json(json!({"results": "not a list"})),
    );

    let err = client_for(&server)
        .get_top_movies(1)
        .await
        .expect_err("decode");
    assert!(matches!(err, CatalogError::Decode { .. }));
}

#[tokio::test]
async fn unreachable_server_is_a_transient_transport_error() {
    let server = MockCatalogServer::start().await;
    let client = client_for(&server);
    drop(server);

    let err = client.get_genres().await.expect_err("connection refused");
    assert!(matches!(err, CatalogError::Transport { .. }));
    assert!(err.is_transient());

    // The key travels in the query string and must not reach logs or views.
    let text = err.to_string();
    assert!(text.contains("/genre/movie/list"));
    assert!(!text.contains("test-key"), "key leaked: {text}");
    let source = std::error::Error::source(&err).expect("transport source");
    assert!(!source.to_string().contains("test-key"));
}

#[test]
fn missing_api_key_names_the_environment_variable() {
    let config = CatalogConfig {
        api_key: None,
        api_key_env: "MOVIE_SHELF_TEST_UNSET_KEY".to_string(),
        ..CatalogConfig::default()
    };
    match TmdbClient::new(&config) {
        Err(CatalogError::MissingApiKey { env_var }) => {
            assert_eq!(env_var, "MOVIE_SHELF_TEST_UNSET_KEY")
        }
        Err(other) => panic!("Expected MissingApiKey, got {other:?}"),
        Ok(_) => panic!("Expected MissingApiKey"),
    }
}
