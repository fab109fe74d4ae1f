//! LinkRegistry tests
//!
//! Tests for link issuance and lookup against a temporary SQLite database.

use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use surveylinker::config::SurveySettings;
use surveylinker::errors::SurveyError;
use surveylinker::services::LinkRegistry;
use surveylinker::storage::{LinkFilter, SeaOrmStorage, SortOrder};
use tempfile::TempDir;
use uuid::Uuid;

// =============================================================================
// Test Setup
// =============================================================================

const SECRET: &[u8] = b"registry-test-signing-secret";

async fn create_registry() -> (LinkRegistry, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("registry.db");
    let db_url = format!("sqlite://{}", db_path.display());

    let storage = Arc::new(
        SeaOrmStorage::new(&db_url, "sqlite")
            .await
            .expect("Failed to create storage"),
    );
    let settings = SurveySettings::new(SECRET.to_vec(), Duration::days(7));
    (LinkRegistry::new(storage, &settings), temp_dir)
}

// =============================================================================
// create
// =============================================================================

#[tokio::test]
async fn test_create_uses_default_ttl() {
    let (registry, _dir) = create_registry().await;
    let now = Utc::now();

    let link = registry.create_at(None, None, now).await.unwrap();

    assert_eq!(link.created_at, now);
    assert_eq!(link.expires_at, now + Duration::days(7));
    assert!(link.campaign_id.is_none());
}

#[tokio::test]
async fn test_create_with_explicit_expiry_and_campaign() {
    let (registry, _dir) = create_registry().await;
    let now = Utc::now();
    let expiry = now + Duration::hours(2);

    let link = registry
        .create_at(Some("  spring-2026 ".to_string()), Some(expiry), now)
        .await
        .unwrap();

    assert_eq!(link.expires_at, expiry);
    assert_eq!(link.campaign_id.as_deref(), Some("spring-2026"));
}

#[tokio::test]
async fn test_create_rejects_expiry_not_after_now() {
    let (registry, _dir) = create_registry().await;
    let now = Utc::now();

    for expiry in [now, now - Duration::seconds(1)] {
        let result = registry.create_at(None, Some(expiry), now).await;
        assert!(matches!(result, Err(SurveyError::InvalidExpiry(_))));
    }

    assert_eq!(registry.count(&LinkFilter::default()).await.unwrap(), 0);
}

#[tokio::test]
async fn test_create_rejects_oversized_campaign() {
    let (registry, _dir) = create_registry().await;
    let result = registry.create(Some("c".repeat(256)), None).await;
    assert!(matches!(result, Err(SurveyError::Validation(_))));
}

#[tokio::test]
async fn test_each_link_gets_unique_id_and_token() {
    let (registry, _dir) = create_registry().await;

    let a = registry.create(None, None).await.unwrap();
    let b = registry.create(None, None).await.unwrap();

    assert_ne!(a.id, b.id);
    assert_ne!(a.token, b.token);
    assert!(!a.token.contains(&a.id.to_string()));
}

// =============================================================================
// find_by_token
// =============================================================================

#[tokio::test]
async fn test_find_by_token_returns_created_link() {
    let (registry, _dir) = create_registry().await;
    let created = registry.create(Some("acme".to_string()), None).await.unwrap();

    let found = registry.find_by_token(&created.token).await.unwrap();

    assert_eq!(found.id, created.id);
    assert_eq!(found.token, created.token);
    assert_eq!(found.campaign_id, created.campaign_id);
    assert_eq!(found.expires_at, created.expires_at);
}

#[tokio::test]
async fn test_find_by_token_rejects_tampered_token() {
    let (registry, _dir) = create_registry().await;
    let created = registry.create(None, None).await.unwrap();

    let mut tampered = created.token.clone();
    let last = tampered.pop().unwrap();
    tampered.push(if last == 'A' { 'B' } else { 'A' });

    let result = registry.find_by_token(&tampered).await;
    assert!(matches!(result, Err(SurveyError::InvalidToken(_))));
}

#[tokio::test]
async fn test_find_by_token_for_unknown_link_is_not_found() {
    let (registry, _dir) = create_registry().await;

    // 合法签名，但链接从未写入
    let token = registry.codec().mint(&Uuid::new_v4()).unwrap();

    let result = registry.find_by_token(&token).await;
    assert!(matches!(result, Err(SurveyError::NotFound(_))));
}

#[tokio::test]
async fn test_find_by_ids_skips_unknown_ids() {
    let (registry, _dir) = create_registry().await;
    let a = registry.create(None, None).await.unwrap();
    let b = registry.create(Some("acme".to_string()), None).await.unwrap();
    let unknown = Uuid::new_v4();

    let mut found = registry.find_by_ids(&[a.id, unknown, b.id]).await.unwrap();
    found.sort_by_key(|link| link.id);

    let mut expected = vec![a.id, b.id];
    expected.sort();
    assert_eq!(found.iter().map(|l| l.id).collect::<Vec<_>>(), expected);

    assert!(registry.find_by_ids(&[]).await.unwrap().is_empty());
}

// =============================================================================
// list
// =============================================================================

#[tokio::test]
async fn test_list_orders_by_created_at() {
    let (registry, _dir) = create_registry().await;
    let base = Utc.with_ymd_and_hms(2026, 10, 1, 12, 0, 0).unwrap();

    for i in 0..3 {
        registry
            .create_at(None, None, base + Duration::minutes(i))
            .await
            .unwrap();
    }

    let desc = registry.list(&LinkFilter::default()).await.unwrap();
    assert_eq!(desc.len(), 3);
    assert!(desc.windows(2).all(|w| w[0].created_at >= w[1].created_at));

    let asc = registry
        .list(&LinkFilter {
            order: SortOrder::Asc,
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(asc.windows(2).all(|w| w[0].created_at <= w[1].created_at));
}

#[tokio::test]
async fn test_list_filters_by_campaign_and_date() {
    let (registry, _dir) = create_registry().await;
    let base = Utc.with_ymd_and_hms(2026, 10, 1, 0, 0, 0).unwrap();

    registry
        .create_at(Some("q4-retail".to_string()), None, base)
        .await
        .unwrap();
    registry
        .create_at(Some("q4-online".to_string()), None, base + Duration::days(2))
        .await
        .unwrap();
    registry
        .create_at(Some("other".to_string()), None, base + Duration::days(5))
        .await
        .unwrap();

    let q4 = registry
        .list(&LinkFilter {
            campaign: Some("q4".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(q4.len(), 2);

    let window = LinkFilter {
        created_after: Some(base + Duration::days(1)),
        created_before: Some(base + Duration::days(3)),
        ..Default::default()
    };
    let in_window = registry.list(&window).await.unwrap();
    assert_eq!(in_window.len(), 1);
    assert_eq!(in_window[0].campaign_id.as_deref(), Some("q4-online"));
    assert_eq!(registry.count(&window).await.unwrap(), 1);
}
