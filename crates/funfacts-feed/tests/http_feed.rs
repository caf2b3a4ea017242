//! The feed driven over HTTP against a mocked PostgREST endpoint.

use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use funfacts_feed::{
    Candidate, CategoryFilter, FactFeed, FactId, FeedError, StoreError, SubmitOutcome, VoteCounter,
};
use funfacts_store::{StoreClient, StoreConfig};

fn feed_for(server: &MockServer) -> FactFeed<StoreClient> {
    let config = StoreConfig::new(&server.uri(), "anon-key").unwrap();
    FactFeed::new(StoreClient::new(config).unwrap())
}

fn row(id: i64, category: &str, interesting: u64, mindblowing: u64) -> serde_json::Value {
    json!({
        "id": id,
        "created_at": "2024-03-01T12:00:00+00:00",
        "text": format!("fact {}", id),
        "source": "https://example.com/source",
        "category": category,
        "votesInteresting": interesting,
        "votesMindblowing": mindblowing,
        "votesFalse": 0
    })
}

#[tokio::test]
async fn test_refresh_sends_scoped_listing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/fact"))
        .and(query_param("select", "*"))
        .and(query_param("category", "eq.health"))
        .and(query_param("order", "votesInteresting.desc"))
        .and(query_param("limit", "1000"))
        .and(header("apikey", "anon-key"))
        .and(header("Authorization", "Bearer anon-key"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([row(7, "health", 9, 3), row(2, "health", 1, 0)])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let feed = feed_for(&server);
    let count = feed
        .refresh(CategoryFilter::Category("health".to_string()))
        .await
        .unwrap();

    assert_eq!(count, 2);
    let ids: Vec<_> = feed.facts().await.iter().map(|f| f.id).collect();
    assert_eq!(ids, vec![FactId(7), FactId(2)]);
}

#[tokio::test]
async fn test_vote_patches_incremented_counter() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/fact"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([row(7, "health", 9, 3)])))
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/fact"))
        .and(query_param("id", "eq.7"))
        .and(header("Prefer", "return=representation"))
        .and(body_json(json!({"votesMindblowing": 4})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([row(7, "health", 10, 4)])))
        .expect(1)
        .mount(&server)
        .await;

    let feed = feed_for(&server);
    feed.refresh(CategoryFilter::All).await.unwrap();
    let updated = feed.vote(FactId(7), VoteCounter::Mindblowing).await.unwrap();

    // The whole record comes from the store, including counters it changed.
    assert_eq!(updated.votes_mindblowing, 4);
    assert_eq!(updated.votes_interesting, 10);
    assert_eq!(feed.facts().await, vec![updated]);
}

#[tokio::test]
async fn test_submit_posts_candidate_fields() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/fact"))
        .and(header("Prefer", "return=representation"))
        .and(body_json(json!([{
            "text": "Bees can recognize human faces.",
            "source": "https://example.com/bees",
            "category": "science"
        }])))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([{
            "id": 42,
            "text": "Bees can recognize human faces.",
            "source": "https://example.com/bees",
            "category": "science",
            "votesInteresting": 0,
            "votesMindblowing": 0,
            "votesFalse": 0
        }])))
        .expect(1)
        .mount(&server)
        .await;

    let feed = feed_for(&server);
    let candidate = Candidate::new(
        "Bees can recognize human faces.",
        "https://example.com/bees",
        "science",
    );
    let SubmitOutcome::Posted(fact) = feed.submit(&candidate).await.unwrap() else {
        panic!("expected the fact to be posted");
    };

    assert_eq!(fact.id, FactId(42));
    assert_eq!(feed.facts().await, vec![fact]);
}

#[tokio::test]
async fn test_store_error_leaves_feed_unchanged() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/fact"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([row(1, "news", 2, 0)])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/fact"))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({
            "code": "PGRST000",
            "message": "Could not connect to the database",
            "details": null,
            "hint": null
        })))
        .mount(&server)
        .await;

    let feed = feed_for(&server);
    feed.refresh(CategoryFilter::All).await.unwrap();
    let before = feed.facts().await;

    let err = feed
        .refresh(CategoryFilter::Category("news".to_string()))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        FeedError::Remote(StoreError::Api { status: 503, .. })
    ));
    assert_eq!(feed.facts().await, before);
    assert!(!feed.is_loading().await);
}
