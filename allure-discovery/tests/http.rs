mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use serde_json::json;
use uuid::Uuid;

use allure_discovery::models::{PromotionKey, SwipeAction, Visibility};
use allure_shared::types::auth::AccountRole;

use common::{app, escort, get, names, post_json, post_raw, token, MemoryStore};

// --- search ---

#[tokio::test]
async fn search_total_counts_whole_filtered_set() {
    let store = MemoryStore::new();
    for i in 0..25 {
        store.add(escort(&format!("e{i:02}"), "Berlin", i));
    }
    let mut inactive = escort("gone", "Berlin", 0);
    inactive.is_active = false;
    store.add(inactive);
    let mut member = escort("member", "Berlin", 0);
    member.role = AccountRole::Member;
    store.add(member);

    let (status, body) = get(app(store), "/escorts/search?take=10&skip=20", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 25);
    assert_eq!(names(&body, "items"), ["e20", "e21", "e22", "e23", "e24"]);
}

#[tokio::test]
async fn search_ranks_month_then_week_then_recency() {
    let store = MemoryStore::new();
    let a = store.add(escort("A", "Berlin", 10));
    let b = store.add(escort("B", "Berlin", 5));
    store.add(escort("C", "Berlin", 1));
    store.promote(a, PromotionKey::Month);
    store.promote(b, PromotionKey::Week);

    let (status, body) = get(app(store), "/escorts/search", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&body, "items"), ["A", "B", "C"]);
    assert_eq!(body["items"][0]["badges"], json!(["ESCORT_OF_MONTH"]));
    assert_eq!(body["items"][1]["isEscortOfWeek"], true);
    assert_eq!(body["items"][2]["badges"], json!([]));
}

#[tokio::test]
async fn expired_booking_is_not_a_highlight() {
    let store = MemoryStore::new();
    let a = store.add(escort("A", "Berlin", 3));
    store.add(escort("B", "Berlin", 1));
    let now = Utc::now();
    store.book(a, PromotionKey::Month, now - Duration::days(31), now - Duration::days(1));

    let (_, body) = get(app(store), "/escorts/search", None).await;

    assert_eq!(names(&body, "items"), ["B", "A"]);
    assert_eq!(body["items"][1]["isEscortOfMonth"], false);
}

#[tokio::test]
async fn verified_tier_counts_as_age_verification() {
    let store = MemoryStore::new();
    let mut tiered = escort("Tiered", "Berlin", 1);
    tiered.profile.visibility = Visibility::Verified;
    store.add(tiered);
    let approved = store.add(escort("Approved", "Berlin", 2));
    store.approve(approved);
    store.add(escort("Plain", "Berlin", 3));

    let (status, body) = get(app(store.clone()), "/escorts/search", None).await;
    assert_eq!(status, StatusCode::OK);
    let items = body["items"].as_array().unwrap();
    assert_eq!(items[0]["isVerified"], true);
    assert_eq!(items[0]["isAgeVerified"], true);
    assert_eq!(items[1]["isVerified"], false);
    assert_eq!(items[1]["isAgeVerified"], true);
    assert_eq!(items[2]["isAgeVerified"], false);

    let (_, body) = get(app(store.clone()), "/escorts/search?ageVerifiedOnly=true", None).await;
    assert_eq!(body["total"], 2);

    let (_, body) = get(app(store), "/escorts/search?verifiedOnly=1", None).await;
    assert_eq!(names(&body, "items"), ["Tiered"]);
}

#[tokio::test]
async fn search_survives_missing_auxiliary_tables() {
    let store = MemoryStore::new();
    let a = store.add(escort("A", "Berlin", 1));
    store.approve(a);
    store.promote(a, PromotionKey::Week);
    store.add(escort("B", "Berlin", 2));
    store.drop_auxiliary_tables();

    let (status, body) = get(app(store), "/escorts/search", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 2);
    assert_eq!(body["items"][0]["isAgeVerified"], false);
    assert_eq!(body["items"][0]["isEscortOfWeek"], false);
}

#[tokio::test]
async fn search_filters_are_case_insensitive_and_combined() {
    let store = MemoryStore::new();
    let mut hit = escort("Hit", "Berlin", 1);
    hit.profile.hair_color = Some("Blonde".into());
    store.add(hit);
    let mut wrong_city = escort("WrongCity", "Munich", 1);
    wrong_city.profile.hair_color = Some("blonde".into());
    store.add(wrong_city);
    store.add(escort("NoHair", "Berlin", 1));

    let (status, body) = get(app(store), "/escorts/search?location=BERL&hairColor=blond&q=%20", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&body, "items"), ["Hit"]);
}

#[tokio::test]
async fn unparseable_window_falls_back_to_defaults() {
    let store = MemoryStore::new();
    for i in 0..30 {
        store.add(escort(&format!("e{i:02}"), "Berlin", i));
    }

    let (status, body) = get(app(store), "/escorts/search?take=lots&skip=-4", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 30);
    assert_eq!(body["items"].as_array().unwrap().len(), 20);
    assert_eq!(body["items"][0]["displayName"], "e00");
}

#[tokio::test]
async fn repeated_query_key_keeps_first_value() {
    let store = MemoryStore::new();
    store.add(escort("Luna", "Berlin", 1));
    store.add(escort("Mia", "Berlin", 2));

    let (status, body) = get(app(store), "/escorts/search?q=Luna&q=Mia", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&body, "items"), ["Luna"]);
}

// --- swipe ---

#[tokio::test]
async fn repeated_swipe_overwrites_single_row() {
    let store = MemoryStore::new();
    let escort_id = store.add(escort("A", "Berlin", 1));
    let member = Uuid::new_v4();
    let jwt = token(member, AccountRole::Member);

    let (status, body) = post_json(
        app(store.clone()),
        "/matching/swipe",
        Some(&jwt),
        json!({ "escortId": escort_id, "action": "LIKE" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "ok": true, "action": "LIKE" }));

    let (status, body) = post_json(
        app(store.clone()),
        "/matching/swipe",
        Some(&jwt),
        json!({ "escortId": escort_id, "action": "PASS" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["action"], "PASS");

    let rows = store.actions_for(member);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].action, SwipeAction::Pass);
}

#[tokio::test]
async fn forty_first_swipe_in_window_is_rejected() {
    let store = MemoryStore::new();
    let target = store.add(escort("A", "Berlin", 1));
    let second = store.add(escort("B", "Berlin", 1));
    let member = Uuid::new_v4();
    let jwt = token(member, AccountRole::Member);
    let recent = Utc::now() - Duration::seconds(2);
    for _ in 0..39 {
        store.seed_action(member, Uuid::new_v4(), SwipeAction::Pass, recent);
    }

    let (status, _) = post_json(
        app(store.clone()),
        "/matching/swipe",
        Some(&jwt),
        json!({ "escortId": target, "action": "LIKE" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = post_json(
        app(store.clone()),
        "/matching/swipe",
        Some(&jwt),
        json!({ "escortId": second, "action": "LIKE" }),
    )
    .await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "E3002");
    assert_eq!(store.actions_for(member).len(), 40);
}

#[tokio::test]
async fn actions_older_than_window_do_not_count() {
    let store = MemoryStore::new();
    let target = store.add(escort("A", "Berlin", 1));
    let member = Uuid::new_v4();
    let now = Utc::now();
    for _ in 0..39 {
        store.seed_action(member, Uuid::new_v4(), SwipeAction::Like, now - Duration::seconds(1));
    }
    for _ in 0..10 {
        store.seed_action(member, Uuid::new_v4(), SwipeAction::Like, now - Duration::seconds(31));
    }

    let (status, _) = post_json(
        app(store),
        "/matching/swipe",
        Some(&token(member, AccountRole::Member)),
        json!({ "escortId": target, "action": "LIKE" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn swipe_on_unknown_or_non_escort_is_not_found() {
    let store = MemoryStore::new();
    let mut agency = escort("Agency", "Berlin", 1);
    agency.role = AccountRole::Agency;
    let agency_id = store.add(agency);
    let jwt = token(Uuid::new_v4(), AccountRole::Member);

    for target in [Uuid::new_v4(), agency_id] {
        let (status, body) = post_json(
            app(store.clone()),
            "/matching/swipe",
            Some(&jwt),
            json!({ "escortId": target, "action": "LIKE" }),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "E2001");
    }
}

#[tokio::test]
async fn swipe_validation_names_the_field() {
    let store = MemoryStore::new();
    let target = store.add(escort("A", "Berlin", 1));
    let jwt = token(Uuid::new_v4(), AccountRole::Escort);

    let (status, body) = post_json(app(store.clone()), "/matching/swipe", Some(&jwt), json!({ "action": "LIKE" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]["message"].as_str().unwrap().contains("escortId"));

    let (status, body) = post_json(
        app(store.clone()),
        "/matching/swipe",
        Some(&jwt),
        json!({ "escortId": target, "action": "like" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "E3001");

    let (status, _) = post_json(
        app(store),
        "/matching/swipe",
        Some(&jwt),
        json!({ "escortId": "not-an-id", "action": "PASS" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn swipe_requires_authentication() {
    let store = MemoryStore::new();
    let target = store.add(escort("A", "Berlin", 1));

    let (status, _) = post_json(app(store), "/matching/swipe", None, json!({ "escortId": target, "action": "LIKE" })).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

// --- preferences and suggestions ---

#[tokio::test]
async fn matching_routes_require_member_role() {
    let store = MemoryStore::new();

    let (status, _) = get(app(store.clone()), "/matching/suggestions", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let escort_jwt = token(Uuid::new_v4(), AccountRole::Escort);
    let (status, body) = get(app(store.clone()), "/matching/suggestions", Some(&escort_jwt)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "E3003");

    let (status, _) = get(app(store), "/matching/preferences", Some(&escort_jwt)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn preferences_round_trip_verbatim() {
    let store = MemoryStore::new();
    let member = Uuid::new_v4();
    let jwt = token(member, AccountRole::Member);

    let (status, body) = get(app(store.clone()), "/matching/preferences", Some(&jwt)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "preferences": {} }));

    let document = json!({ "services": ["GFE"], "city": "Berlin", "mood": "whatever" });
    let (status, body) = post_json(app(store.clone()), "/matching/preferences", Some(&jwt), document.clone()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["preferences"], document);

    let (_, body) = get(app(store), "/matching/preferences", Some(&jwt)).await;
    assert_eq!(body["preferences"], document);
}

#[tokio::test]
async fn non_object_preferences_are_rejected() {
    let store = MemoryStore::new();
    let jwt = token(Uuid::new_v4(), AccountRole::Member);

    let (status, body) = post_json(app(store), "/matching/preferences", Some(&jwt), json!(["GFE"])).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "E3004");
}

#[tokio::test]
async fn suggestions_rank_by_preference_and_skip_swiped() {
    let store = MemoryStore::new();
    let member = Uuid::new_v4();
    let mut x = escort("X", "Berlin, Mitte", 5);
    x.profile.services = vec!["GFE".into(), "Massage".into()];
    store.add(x);
    let mut y = escort("Y", "Berlin", 1);
    y.profile.services = vec!["Massage".into()];
    store.add(y);
    let mut z = escort("Z", "Berlin", 2);
    z.profile.services = vec!["GFE".into()];
    let z_id = store.add(z);
    store.add(escort("Far", "Hamburg", 0));
    store.seed_action(member, z_id, SwipeAction::Pass, Utc::now() - Duration::days(3));
    store.set_preferences(member, json!({ "services": ["gfe"], "city": "berlin" }));

    let (status, body) = get(app(store), "/matching/suggestions", Some(&token(member, AccountRole::Member))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&body, "suggestions"), ["X", "Y"]);
    assert!(body["suggestions"][0].get("score").is_none());
}

#[tokio::test]
async fn suggestions_degrade_when_history_is_unavailable() {
    let store = MemoryStore::new();
    let member = Uuid::new_v4();
    store.add(escort("A", "Berlin", 1));
    store.add(escort("B", "Berlin", 2));
    store.drop_auxiliary_tables();

    let (status, body) = get(app(store), "/matching/suggestions", Some(&token(member, AccountRole::Member))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&body, "suggestions"), ["A", "B"]);
}

#[tokio::test]
async fn malformed_stored_preferences_fall_back_to_empty() {
    let store = MemoryStore::new();
    let member = Uuid::new_v4();
    store.add(escort("A", "Berlin", 1));
    store.add(escort("B", "Hamburg", 2));
    store.set_preferences(member, json!({ "services": { "nested": true } }));

    let (status, body) = get(app(store), "/matching/suggestions?limit=1", Some(&token(member, AccountRole::Member))).await;

    assert_eq!(status, StatusCode::OK);
    // Limit is clamped up to the minimum of five.
    assert_eq!(names(&body, "suggestions"), ["A", "B"]);
}

#[tokio::test]
async fn repeated_limit_keeps_first_value() {
    let store = MemoryStore::new();
    for i in 0..7 {
        store.add(escort(&format!("e{i}"), "Berlin", i));
    }
    let jwt = token(Uuid::new_v4(), AccountRole::Member);

    let (status, body) = get(app(store), "/matching/suggestions?limit=5&limit=9", Some(&jwt)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["suggestions"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let store = MemoryStore::new();
    let jwt = token(Uuid::new_v4(), AccountRole::Member);

    for uri in ["/matching/swipe", "/matching/preferences"] {
        let (status, body) = post_raw(app(store.clone()), uri, Some(&jwt), "{\"escortId\": ").await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["code"], "E0008", "{uri}");
    }
}

#[tokio::test]
async fn health_hides_database_error_text() {
    let store = MemoryStore::new();
    store.fail_database();

    let (status, body) = get(app(store), "/health", None).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "unhealthy");
    assert_eq!(body["checks"][0]["message"], "unreachable");
    let text = body.to_string();
    assert!(!text.contains("10.0.0.5"));
    assert!(!text.contains("allure_rw"));
}

#[tokio::test]
async fn health_reports_store() {
    let (status, body) = get(app(MemoryStore::new()), "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "allure-discovery");
}
