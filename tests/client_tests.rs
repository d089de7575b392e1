//! Integration tests for the OneFootball Network client against a stubbed
//! remote API.
//!
//! The client is blocking, so each test starts the mock server on a
//! dedicated tokio runtime and drives the client from the test thread.

use onefootball_network::client::{ApiError, OneFootballNetwork};
use onefootball_network::configuration::Settings;
use onefootball_network::model::{Language, NewPost, PostUpdate};
use reqwest::StatusCode;
use serde_json::json;
use tokio::runtime::Runtime;
use wiremock::matchers::{body_json, body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "abc123";

fn start_server() -> (Runtime, MockServer) {
    let runtime = Runtime::new().expect("failed to create runtime");
    let server = runtime.block_on(MockServer::start());
    (runtime, server)
}

fn mount_login(runtime: &Runtime, server: &MockServer, token: &str) {
    runtime.block_on(
        Mock::given(method("POST"))
            .and(path("/v1/login"))
            .and(body_json(
                json!({"login": "editor@example.com", "password": "secret"}),
            ))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"access_token": token})),
            )
            .mount(server),
    );
}

fn try_connect(server: &MockServer) -> Result<OneFootballNetwork, ApiError> {
    let settings = Settings::builder()
        .base_url(&server.uri())
        .login("editor@example.com")
        .password("secret")
        .build()
        .expect("failed to build settings");
    OneFootballNetwork::new(settings)
}

fn connect(server: &MockServer) -> OneFootballNetwork {
    try_connect(server).expect("failed to authenticate")
}

/// A post body as the remote reports it, including a field this client does
/// not model.
fn post_json(id: u64) -> serde_json::Value {
    json!({
        "id": id,
        "synced": false,
        "external_id": "28961",
        "source_url": "https://example.com/a",
        "language": "fr",
        "published": "2020-08-10T08:28:58Z",
        "title": "T",
        "content": "<p>C</p>",
        "draft": false,
        "feed_item_id": 910278,
    })
}

fn sample_article() -> NewPost {
    NewPost::builder()
        .external_id("28961")
        .source_url("https://example.com/a")
        .language("fr")
        .published("2020-08-10T08:28:58Z")
        .title("T")
        .content("<p>C</p>")
        .build()
        .expect("sample article must validate")
}

#[test]
fn authentication_stores_the_session_token() {
    let (runtime, server) = start_server();
    mount_login(&runtime, &server, TOKEN);

    let client = connect(&server);
    assert_eq!(client.access_token(), "abc123");
}

#[test]
fn requests_carry_the_bearer_token() {
    let (runtime, server) = start_server();
    mount_login(&runtime, &server, TOKEN);
    // The mock only matches when the session header is present; a request
    // without it falls through to the server's 404.
    runtime.block_on(
        Mock::given(method("GET"))
            .and(path("/v1/posts"))
            .and(header("Authorization", "Bearer abc123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"posts": []})))
            .mount(&server),
    );

    let client = connect(&server);
    let response = client
        .list_articles(Some("28961"), None)
        .expect("listing must succeed");
    assert!(response.posts.is_empty());
}

#[test]
fn failed_authentication_is_fatal_to_construction() {
    let (runtime, server) = start_server();
    runtime.block_on(
        Mock::given(method("POST"))
            .and(path("/v1/login"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid credentials"))
            .mount(&server),
    );

    match try_connect(&server) {
        Err(ApiError::AuthenticationFailed { status, body }) => {
            assert_eq!(status, StatusCode::UNAUTHORIZED);
            assert_eq!(body, "invalid credentials");
        }
        other => panic!("expected AuthenticationFailed, got {other:?}"),
    }
}

#[test]
fn empty_access_token_is_rejected() {
    let (runtime, server) = start_server();
    mount_login(&runtime, &server, "");

    match try_connect(&server) {
        Err(ApiError::AuthenticationFailed { status, .. }) => {
            assert_eq!(status, StatusCode::OK);
        }
        other => panic!("expected AuthenticationFailed, got {other:?}"),
    }
}

#[test]
fn listing_requires_exactly_one_filter() {
    let (runtime, server) = start_server();
    mount_login(&runtime, &server, TOKEN);
    let client = connect(&server);

    assert!(matches!(
        client.list_articles(None, None),
        Err(ApiError::InvalidFilter(_))
    ));
    assert!(matches!(
        client.list_articles(Some("28961"), Some("910278")),
        Err(ApiError::InvalidFilter(_))
    ));
}

#[test]
fn lists_posts_by_external_id() {
    let (runtime, server) = start_server();
    mount_login(&runtime, &server, TOKEN);
    runtime.block_on(
        Mock::given(method("GET"))
            .and(path("/v1/posts"))
            .and(query_param("external_id", "28961"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"posts": [post_json(1)]})),
            )
            .mount(&server),
    );

    let client = connect(&server);
    let response = client
        .list_articles(Some("28961"), None)
        .expect("listing must succeed");
    assert_eq!(response.posts.len(), 1);
    assert_eq!(response.posts[0].id(), 1);
    assert_eq!(response.posts[0].post().external_id(), "28961");
}

#[test]
fn lists_posts_by_feed_item_id_batch() {
    let (runtime, server) = start_server();
    mount_login(&runtime, &server, TOKEN);
    runtime.block_on(
        Mock::given(method("GET"))
            .and(path("/v1/posts"))
            .and(query_param("feed_item_id", "910278,910279"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"posts": [post_json(1), post_json(2)]})),
            )
            .mount(&server),
    );

    let client = connect(&server);
    let response = client
        .list_articles(None, Some("910278,910279"))
        .expect("listing must succeed");
    assert_eq!(response.posts.len(), 2);
}

#[test]
fn fetches_a_post_by_id() {
    let (runtime, server) = start_server();
    mount_login(&runtime, &server, TOKEN);
    runtime.block_on(
        Mock::given(method("GET"))
            .and(path("/v1/posts/1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(post_json(1)))
            .mount(&server),
    );

    let client = connect(&server);
    let post = client.get_article(1).expect("fetch must succeed");
    assert_eq!(post.id(), 1);
    assert_eq!(post.post().language(), Language::Fr);
}

#[test]
fn fetching_a_missing_post_is_not_found() {
    let (runtime, server) = start_server();
    mount_login(&runtime, &server, TOKEN);
    runtime.block_on(
        Mock::given(method("GET"))
            .and(path("/v1/posts/99"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server),
    );

    let client = connect(&server);
    match client.get_article(99) {
        Err(ApiError::NotFound { id }) => assert_eq!(id, 99),
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[test]
fn publishes_an_article_and_decodes_the_detailed_post() {
    let (runtime, server) = start_server();
    mount_login(&runtime, &server, TOKEN);

    let article = sample_article();
    let mut echoed = article.to_value().expect("article must serialize");
    echoed["id"] = json!(1);
    echoed["synced"] = json!(false);

    runtime.block_on(
        Mock::given(method("POST"))
            .and(path("/v1/posts"))
            .and(header("Authorization", "Bearer abc123"))
            .and(body_partial_json(json!({
                "external_id": "28961",
                "source_url": "https://example.com/a",
                "language": "fr",
                "published": "2020-08-10T08:28:58Z",
                "draft": false,
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(echoed))
            .mount(&server),
    );

    let client = connect(&server);
    let published = client
        .publish_article(&article)
        .expect("publish must succeed");
    assert_eq!(published.id(), 1);
    assert!(!published.synced());
    assert_eq!(published.post().language(), Language::Fr);
}

#[test]
fn updates_send_only_the_set_fields() {
    let (runtime, server) = start_server();
    mount_login(&runtime, &server, TOKEN);
    // Exact body match: an update payload with more than the one set field
    // would not match the mock and the call would fail.
    runtime.block_on(
        Mock::given(method("PUT"))
            .and(path("/v1/posts/1"))
            .and(body_json(json!({"title": "Corrected title"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(post_json(1)))
            .mount(&server),
    );

    let client = connect(&server);
    let update = PostUpdate::builder()
        .title("Corrected title")
        .build()
        .expect("update must validate");
    let post = client.update_article(1, &update).expect("update must succeed");
    assert_eq!(post.id(), 1);
}

#[test]
fn updating_a_missing_post_is_not_found() {
    let (runtime, server) = start_server();
    mount_login(&runtime, &server, TOKEN);
    runtime.block_on(
        Mock::given(method("PUT"))
            .and(path("/v1/posts/99"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server),
    );

    let client = connect(&server);
    let update = PostUpdate::builder()
        .title("Corrected title")
        .build()
        .expect("update must validate");
    assert!(matches!(
        client.update_article(99, &update),
        Err(ApiError::NotFound { id: 99 })
    ));
}

#[test]
fn delete_confirmed_with_no_content() {
    let (runtime, server) = start_server();
    mount_login(&runtime, &server, TOKEN);
    runtime.block_on(
        Mock::given(method("DELETE"))
            .and(path("/v1/posts/1"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server),
    );

    let client = connect(&server);
    assert!(client.delete_article(1).expect("delete must succeed"));
}

#[test]
fn delete_with_other_success_status_is_unconfirmed() {
    let (runtime, server) = start_server();
    mount_login(&runtime, &server, TOKEN);
    runtime.block_on(
        Mock::given(method("DELETE"))
            .and(path("/v1/posts/1"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server),
    );

    let client = connect(&server);
    assert!(!client.delete_article(1).expect("delete must succeed"));
}

#[test]
fn deleting_a_missing_post_is_not_found() {
    let (runtime, server) = start_server();
    mount_login(&runtime, &server, TOKEN);
    runtime.block_on(
        Mock::given(method("DELETE"))
            .and(path("/v1/posts/99"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server),
    );

    let client = connect(&server);
    assert!(matches!(
        client.delete_article(99),
        Err(ApiError::NotFound { id: 99 })
    ));
}

#[test]
fn remote_errors_carry_status_and_body() {
    let (runtime, server) = start_server();
    mount_login(&runtime, &server, TOKEN);
    runtime.block_on(
        Mock::given(method("GET"))
            .and(path("/v1/posts"))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
            .mount(&server),
    );

    let client = connect(&server);
    match client.list_articles(Some("28961"), None) {
        Err(ApiError::UnexpectedResponse { status, body }) => {
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(body, "upstream exploded");
        }
        other => panic!("expected UnexpectedResponse, got {other:?}"),
    }
}
