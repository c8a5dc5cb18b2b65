//! Provider adapters against local mock HTTP servers.

use mockito::Matcher;
use news_aggregator::models::Query;
use news_aggregator::sources::{GuardianSource, NewsApiSource, NyTimesSource, Source};
use news_aggregator::utils::HttpClient;
use serde_json::json;

fn client() -> HttpClient {
    HttpClient::new().expect("http client")
}

#[tokio::test]
async fn test_guardian_search_maps_results() {
    let mut server = mockito::Server::new_async().await;
    let body = json!({
        "response": {
            "status": "ok",
            "results": [
                {
                    "id": "business/2024/jan/05/fed-decision",
                    "webTitle": "Stocks rally after Fed decision",
                    "webUrl": "https://www.theguardian.com/business/2024/jan/05/fed-decision",
                    "webPublicationDate": "2024-01-05T14:03:00Z",
                    "sectionName": "Business",
                    "fields": {
                        "trailText": "Markets surged",
                        "byline": "Jane Roe",
                        "thumbnail": "https://media.guim.co.uk/thumb.jpg"
                    }
                },
                {
                    "id": "world/2024/jan/05/no-title",
                    "webUrl": "https://www.theguardian.com/world/2024/jan/05/no-title",
                    "webPublicationDate": "2024-01-05T10:00:00Z"
                }
            ]
        }
    });
    let mock = server
        .mock("GET", "/search")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("api-key".into(), "test-key".into()),
            Matcher::UrlEncoded("q".into(), "fed,rates".into()),
            Matcher::UrlEncoded("page".into(), "1".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .create_async()
        .await;

    let source = GuardianSource::new(Some("test-key".to_string()), client()).with_base_url(server.url());
    let articles = source.fetch(&Query::new("fed rates")).await.unwrap();

    mock.assert_async().await;
    assert_eq!(articles.len(), 1);
    let article = &articles[0];
    assert_eq!(article.source, "The Guardian");
    assert_eq!(article.author, "Jane Roe");
    assert_eq!(article.category, "Business");
    assert_eq!(article.image_url.as_deref(), Some("https://media.guim.co.uk/thumb.jpg"));
}

#[tokio::test]
async fn test_guardian_error_status_uses_provider_message() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/search")
        .match_query(Matcher::Any)
        .with_status(401)
        .with_body(json!({ "response": { "status": "error", "message": "Invalid authentication credentials" } }).to_string())
        .create_async()
        .await;

    let source = GuardianSource::new(Some("bad".to_string()), client()).with_base_url(server.url());
    let outcome = source.search(&Query::default()).await;

    assert!(outcome.is_failure());
    assert_eq!(outcome.provider(), "The Guardian");
    let err = source.fetch(&Query::default()).await.unwrap_err();
    assert_eq!(err.to_string(), "Invalid authentication credentials");
}

#[tokio::test]
async fn test_guardian_without_key_never_calls_out() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/search")
        .match_query(Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let source = GuardianSource::new(None, client()).with_base_url(server.url());
    let err = source.fetch(&Query::default()).await.unwrap_err();

    mock.assert_async().await;
    assert_eq!(err.to_string(), "The Guardian API key is not configured");
}

#[tokio::test]
async fn test_nytimes_fault_message() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/articlesearch.json")
        .match_query(Matcher::Any)
        .with_status(401)
        .with_header("content-type", "application/json")
        .with_body(json!({ "fault": { "faultstring": "Invalid ApiKey" } }).to_string())
        .create_async()
        .await;

    let source = NyTimesSource::new(Some("bad".to_string()), client()).with_base_url(server.url());
    let err = source.fetch(&Query::new("budget")).await.unwrap_err();

    assert_eq!(err.to_string(), "Invalid ApiKey");
}

#[tokio::test]
async fn test_nytimes_status_text_without_message() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/articlesearch.json")
        .match_query(Matcher::Any)
        .with_status(503)
        .with_body("upstream unavailable")
        .create_async()
        .await;

    let source = NyTimesSource::new(Some("key".to_string()), client()).with_base_url(server.url());
    let err = source.fetch(&Query::default()).await.unwrap_err();

    assert!(err.to_string().contains("503"), "{}", err);
}

#[tokio::test]
async fn test_nytimes_zero_based_page_and_docs() {
    let mut server = mockito::Server::new_async().await;
    let body = json!({
        "status": "OK",
        "response": {
            "docs": [{
                "_id": "nyt://article/1",
                "headline": { "main": "Senate passes budget" },
                "abstract": "The vote was close.",
                "byline": { "original": "By John Doe" },
                "news_desk": "Politics",
                "pub_date": "2024-01-05T14:03:00+0000",
                "web_url": "https://www.nytimes.com/2024/01/05/us/politics/budget.html",
                "multimedia": [{ "url": "images/2024/01/05/budget.jpg" }]
            }]
        }
    });
    let mock = server
        .mock("GET", "/articlesearch.json")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("page".into(), "1".into()),
            Matcher::UrlEncoded("q".into(), "budget".into()),
            Matcher::UrlEncoded("sort".into(), "newest".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .create_async()
        .await;

    let source = NyTimesSource::new(Some("key".to_string()), client()).with_base_url(server.url());
    let articles = source.fetch(&Query::new("budget").page(2)).await.unwrap();

    mock.assert_async().await;
    assert_eq!(articles.len(), 1);
    assert_eq!(articles[0].author, "John Doe");
    assert_eq!(
        articles[0].image_url.as_deref(),
        Some("https://www.nytimes.com/images/2024/01/05/budget.jpg")
    );
}

#[tokio::test]
async fn test_newsapi_unexpected_format() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({ "info": "no articles section" }).to_string())
        .create_async()
        .await;

    let source = NewsApiSource::new(Some("key".to_string()), client()).with_base_url(server.url());
    let err = source.fetch(&Query::default()).await.unwrap_err();

    assert_eq!(err.to_string(), "Unexpected API response format");
}

#[tokio::test]
async fn test_newsapi_posts_translated_body() {
    let mut server = mockito::Server::new_async().await;
    let body = json!({
        "articles": {
            "results": [{
                "uri": "8012345",
                "url": "https://example.org/markets",
                "title": "Markets close higher",
                "body": "Shares rose across the board.",
                "authors": [{ "name": "Ann Lee" }],
                "source": { "title": "Example Times" },
                "categories": [{ "label": "news/Business" }],
                "dateTime": "2024-01-05T14:03:00Z"
            }]
        }
    });
    let mock = server
        .mock("POST", "/")
        .match_body(Matcher::PartialJson(json!({
            "keyword": "markets",
            "apiKey": "key",
            "articlesPage": 2,
            "resultType": "articles"
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .create_async()
        .await;

    let source = NewsApiSource::new(Some("key".to_string()), client()).with_base_url(server.url());
    let articles = source.fetch(&Query::new("markets").page(2)).await.unwrap();

    mock.assert_async().await;
    assert_eq!(articles.len(), 1);
    assert_eq!(articles[0].id, "8012345");
    assert_eq!(articles[0].source, "Example Times");
    assert_eq!(articles[0].description, "Shares rose across the board.");
}
