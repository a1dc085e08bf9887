use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use deckhelper_core::{DeckHelperError, EdhrecConfig, ScryfallConfig};
use deckhelper_sources::{CardDatabase, EdhrecClient, ScryfallClient, SearchQuery, SynergySource};
use serde_json::json;
use std::collections::HashMap;
use tokio::net::TcpListener;

/// Serves `router` on an ephemeral local port and returns its base URL.
async fn spawn(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

fn card(name: &str, colors: &[&str]) -> serde_json::Value {
    json!({
        "object": "card",
        "name": name,
        "color_identity": colors,
        "legalities": {"commander": "legal"},
        "image_uris": {"png": format!("https://img.example/{}.png", name.len())},
        "set": "cmm"
    })
}

async fn named(
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    if headers.get("accept").and_then(|v| v.to_str().ok()) != Some("application/json") {
        return (StatusCode::NOT_ACCEPTABLE, Json(json!({"object": "error"})));
    }
    let fuzzy = params.get("fuzzy").cloned().unwrap_or_default().to_lowercase();
    if "sol ring".contains(&fuzzy) && !fuzzy.is_empty() {
        (StatusCode::OK, Json(card("Sol Ring", &[])))
    } else if fuzzy == "teapot" {
        (StatusCode::IM_A_TEAPOT, Json(json!({"object": "error"})))
    } else {
        (StatusCode::NOT_FOUND, Json(json!({"object": "error", "code": "not_found"})))
    }
}

async fn search(
    State(base): State<String>,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    let q = params.get("q").cloned().unwrap_or_default();
    let page = params.get("page").cloned().unwrap_or_else(|| "1".to_string());

    if q.contains("t:background") {
        return (StatusCode::NOT_FOUND, Json(json!({"object": "error"})));
    }
    if q.contains("Time Lord Doctor") {
        return (StatusCode::SERVICE_UNAVAILABLE, Json(json!({"object": "error"})));
    }
    if q.contains("Friends forever") {
        return (StatusCode::OK, Json(json!({"object": "list", "total_cards": 0})));
    }

    match page.as_str() {
        "1" => (
            StatusCode::OK,
            Json(json!({
                "object": "list",
                "data": [card("Atraxa, Praetors' Voice", &["W", "U", "B", "G"])],
                "has_more": true,
                "next_page": format!("{}/cards/search?q=solo&page=2", base),
            })),
        ),
        _ => (
            StatusCode::OK,
            Json(json!({
                "object": "list",
                "data": [card("Tymna the Weaver", &["W", "B"])],
                "has_more": false,
            })),
        ),
    }
}

async fn scryfall() -> ScryfallClient {
    scryfall_with(ScryfallConfig::default()).await
}

async fn scryfall_with(config: ScryfallConfig) -> ScryfallClient {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    let router = Router::new()
        .route("/cards/named", get(named))
        .route("/cards/search", get(search))
        .with_state(base.clone());
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    let config = ScryfallConfig {
        api_base: base,
        request_delay_ms: 0,
        ..config
    };
    ScryfallClient::new(&config).unwrap()
}

#[tokio::test]
async fn fuzzy_lookup_returns_card_with_extra_fields() {
    let client = scryfall().await;
    let card = client.named_fuzzy("sol rin").await.unwrap();
    assert_eq!(card.name, "Sol Ring");
    assert!(card.is_commander_legal());
    assert_eq!(card.extra.get("set"), Some(&json!("cmm")));
}

#[tokio::test]
async fn fuzzy_lookup_miss_is_not_found() {
    let client = scryfall().await;
    let err = client.named_fuzzy("Blorp").await.unwrap_err();
    assert!(matches!(err, DeckHelperError::NotFound(_)));
    assert_eq!(err.to_string(), r#"No card found for "Blorp"."#);
}

#[tokio::test]
async fn fuzzy_lookup_other_status_is_request_failed() {
    let client = scryfall().await;
    let err = client.named_fuzzy("teapot").await.unwrap_err();
    assert_eq!(err.status(), Some(418));
}

#[tokio::test]
async fn search_follows_pagination() {
    let client = scryfall().await;
    let colors = "WB".parse().unwrap();
    let cards = client.search(&SearchQuery::solo(&colors)).await.unwrap();
    let names: Vec<_> = cards.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Atraxa, Praetors' Voice", "Tymna the Weaver"]);
}

#[tokio::test]
async fn search_stops_at_page_cap() {
    let client = scryfall_with(ScryfallConfig {
        max_pages: 1,
        ..ScryfallConfig::default()
    })
    .await;
    let colors = "WB".parse().unwrap();
    let cards = client.search(&SearchQuery::solo(&colors)).await.unwrap();
    let names: Vec<_> = cards.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Atraxa, Praetors' Voice"]);
}

#[tokio::test]
async fn search_not_found_is_empty() {
    let client = scryfall().await;
    let colors = "G".parse().unwrap();
    let cards = client.search(&SearchQuery::backgrounds(&colors)).await.unwrap();
    assert!(cards.is_empty());
}

#[tokio::test]
async fn search_failure_carries_status() {
    let client = scryfall().await;
    let colors = "U".parse().unwrap();
    let err = client.search(&SearchQuery::doctors(&colors)).await.unwrap_err();
    assert!(matches!(
        err,
        DeckHelperError::RequestFailed { status: 503, .. }
    ));
    assert_eq!(err.to_string(), "Doctor request failed with status code 503");
}

#[tokio::test]
async fn search_without_data_is_malformed() {
    let client = scryfall().await;
    let colors = "R".parse().unwrap();
    let err = client
        .search(&SearchQuery::friends_forever(&colors))
        .await
        .unwrap_err();
    assert!(matches!(err, DeckHelperError::MalformedResponse(_)));
}

async fn edhrec_page(Path(file): Path<String>) -> impl IntoResponse {
    match file.strip_suffix(".json") {
        Some("urza-lord-high-artificer") => (
            StatusCode::OK,
            Json(json!({
                "header": "Urza, Lord High Artificer",
                "cardlist": [
                    {"name": "Sol Ring", "synergy": 0.5, "num_decks": 800, "potential_decks": 1000, "sanitized": "sol-ring"}
                ]
            })),
        ),
        Some("tinybones-trinket-thief") => (StatusCode::OK, Json(json!({"header": "Tinybones"}))),
        _ => (StatusCode::FORBIDDEN, Json(json!({}))),
    }
}

async fn edhrec() -> EdhrecClient {
    let base = spawn(Router::new().route("/pages/commanders/{file}", get(edhrec_page))).await;
    let config = EdhrecConfig {
        api_base: base,
        ..EdhrecConfig::default()
    };
    EdhrecClient::new(&config).unwrap()
}

#[tokio::test]
async fn synergy_page_is_parsed() {
    let client = edhrec().await;
    let records = client
        .synergy("urza-lord-high-artificer")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].name, "Sol Ring");
    assert_eq!(records[0].inclusion_ratio(), Some(0.8));
}

#[tokio::test]
async fn missing_synergy_data_is_none() {
    let client = edhrec().await;
    assert!(client.synergy("nobody").await.unwrap().is_none());
    assert!(client.synergy("tinybones-trinket-thief").await.unwrap().is_none());
}

#[tokio::test]
async fn unreachable_synergy_host_is_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let client = EdhrecClient::new(&EdhrecConfig {
        api_base: base,
        ..EdhrecConfig::default()
    })
    .unwrap();
    let err = client.synergy("urza-lord-high-artificer").await.unwrap_err();
    assert!(matches!(err, DeckHelperError::Transport(_)));
}
