use std::sync::Arc;

use axum::http::StatusCode;
use nom_nlq::pipeline::QueryOutcome;
use serde_json::json;
use tests_common::generator::StubGenerator;
use tests_common::pool::{Behavior, InMemoryPool};
use tests_common::router::{create_client, create_test_state, test_limits};

fn client_with(pool: InMemoryPool, generator: StubGenerator) -> axum_test_helper::TestClient {
    create_client(create_test_state(pool, Arc::new(generator), test_limits()))
}

fn idle_client() -> axum_test_helper::TestClient {
    client_with(InMemoryPool::with_rows(vec![]), StubGenerator::default())
}

#[tokio::test]
async fn root_names_the_service() {
    let response = idle_client().get("/").send().await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await;
    insta::assert_json_snapshot!(body, @r###"
    {
      "message": "NoM Natural Language Query API",
      "version": "1.0.0"
    }
    "###);
}

#[tokio::test]
async fn health_reports_a_reachable_database() {
    let response = idle_client().get("/health").send().await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await;
    similar_asserts::assert_eq!(body, json!({"status": "healthy", "database": "connected"}));
}

#[tokio::test]
async fn health_reports_an_unreachable_database() {
    let client = client_with(
        InMemoryPool::new(1, Behavior::Unavailable),
        StubGenerator::default(),
    );
    let response = client.get("/health").send().await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await;
    similar_asserts::assert_eq!(body, json!({"status": "unhealthy", "database": "disconnected"}));
}

#[tokio::test]
async fn rejected_sql_comes_back_as_an_error_outcome() {
    let client = client_with(
        InMemoryPool::with_rows(vec![]),
        StubGenerator::sql_then_explanation("DROP TABLE accounts;", "never used"),
    );
    let response = client
        .post("/api/v1/query")
        .json(&json!({"question": "Drop the accounts table"}))
        .send()
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let outcome: QueryOutcome = response.json().await;
    insta::assert_json_snapshot!(outcome, @r###"
    {
      "question": "Drop the accounts table",
      "sql_query": null,
      "explanation": "Failed to process query",
      "results": [],
      "row_count": 0,
      "truncated": false,
      "error": "Query rejected (forbidden-keyword): query contains forbidden keyword DROP"
    }
    "###);
}

#[tokio::test]
async fn answered_question_includes_rows() {
    let rows = vec![query_engine_execution::Record::from([
        ("name".to_string(), json!("pillar-one")),
        ("rank".to_string(), json!(1)),
    ])];
    let client = client_with(
        InMemoryPool::with_rows(rows),
        StubGenerator::sql_then_explanation(
            "SELECT name, rank FROM pillars WHERE isrevoked = false ORDER BY rank ASC LIMIT 1",
            "Shows the highest ranked active pillar.",
        ),
    );
    let response = client
        .post("/api/v1/query")
        .json(&json!({"question": "Which pillar ranks first?", "include_sql": false}))
        .send()
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let outcome: QueryOutcome = response.json().await;
    insta::assert_json_snapshot!(outcome, @r###"
    {
      "question": "Which pillar ranks first?",
      "sql_query": null,
      "explanation": "Shows the highest ranked active pillar.",
      "results": [
        {
          "name": "pillar-one",
          "rank": 1
        }
      ],
      "row_count": 1,
      "truncated": false,
      "error": null
    }
    "###);
}

#[tokio::test]
async fn system_faults_are_internal_errors() {
    let client = client_with(
        InMemoryPool::new(1, Behavior::Unavailable),
        StubGenerator::sql_then_explanation("SELECT 1", "one"),
    );
    let response = client
        .post("/api/v1/query")
        .json(&json!({"question": "anything"}))
        .send()
        .await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: serde_json::Value = response.json().await;
    assert_eq!(body, json!({"detail": "Internal server error"}));
}

#[tokio::test]
async fn a_question_is_required() {
    let response = idle_client()
        .post("/api/v1/query")
        .json(&json!({"include_sql": true}))
        .send()
        .await;
    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn schema_lists_tables_and_tokens() {
    let response = idle_client().get("/api/v1/schema").send().await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await;
    assert_eq!(body["tables"].as_array().unwrap().len(), 14);
    assert_eq!(
        body["tables"][0],
        json!({"name": "momentums", "description": "Blockchain blocks"})
    );
    similar_asserts::assert_eq!(
        body["common_tokens"],
        json!([
            {"symbol": "ZNN", "standard": "zts1znnxxxxxxxxxxxxx9z4ulx", "decimals": 8},
            {"symbol": "QSR", "standard": "zts1qsrxxxxxxxxxxxxxmrhjll", "decimals": 8}
        ])
    );
}

#[tokio::test]
async fn examples_are_listed() {
    let response = idle_client().get("/api/v1/examples").send().await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await;
    let examples = body["examples"].as_array().unwrap();
    assert_eq!(examples.len(), 10);
    assert_eq!(
        examples[0],
        "Show me all transactions over 1000 ZNN in the last 10 days"
    );
}

#[tokio::test]
async fn metrics_are_exposed() {
    let client = client_with(
        InMemoryPool::with_rows(vec![]),
        StubGenerator::sql_then_explanation("DROP TABLE accounts;", "never used"),
    );
    client
        .post("/api/v1/query")
        .json(&json!({"question": "Drop the accounts table"}))
        .send()
        .await;

    let response = client.get("/metrics").send().await;
    assert_eq!(response.status(), StatusCode::OK);

    let text = response.text().await;
    assert!(text.contains("nom_nlq_query_total 1"), "{text}");
    assert!(
        text.contains("nom_nlq_rejection_total{reason=\"forbidden-keyword\"} 1"),
        "{text}"
    );
    assert!(text.contains("nom_nlq_pool_max_connections 2"), "{text}");
}
