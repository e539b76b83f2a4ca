//! Integration tests for the JSON dashboard API.

mod common;

use axum::http::StatusCode;
use common::{TestClient, ALICE};
use serde_json::Value;

async fn dashboard(client: &TestClient, query: &str) -> Value {
    let (status, json) = client
        .get_json::<Value>(&format!("/api/dashboard?user_id={ALICE}{query}"))
        .await;
    assert_eq!(status, StatusCode::OK, "query {query}");
    json.expect("dashboard JSON")
}

fn count(dashboard: &Value) -> u64 {
    dashboard["overview"]["count"].as_u64().unwrap()
}

fn total(dashboard: &Value) -> f64 {
    dashboard["overview"]["total"].as_f64().unwrap()
}

#[tokio::test]
async fn test_api_requires_user_id() {
    let client = TestClient::with_sample_data();
    let (status, _) = client.get("/api/dashboard").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = client.get("/api/dashboard?user_id=nope").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_default_selection_covers_all_data() {
    let client = TestClient::with_sample_data();
    let json = dashboard(&client, "").await;

    assert_eq!(count(&json), 10);
    assert!((total(&json) - 532.9).abs() < 1e-9);
    assert_eq!(json["selectable_range"]["from"], "2024-01-01");
    assert_eq!(json["selectable_range"]["to"], "2024-03-30");
    assert_eq!(json["selection"]["top_n"], 10);
    assert_eq!(json["selection"]["budget"]["category"], "Food");
    assert_eq!(json["selection"]["period1"]["to"], "2024-01-31");
    assert_eq!(json["selection"]["period2"]["from"], "2024-02-29");
}

#[tokio::test]
async fn test_excluded_category_never_appears() {
    let client = TestClient::with_sample_data();
    let json = dashboard(&client, "&category=Home").await;

    assert!(!json["available_categories"]
        .as_array()
        .unwrap()
        .iter()
        .any(|c| c == "Home"));
    assert!(!json["available_payees"]
        .as_array()
        .unwrap()
        .iter()
        .any(|p| p == "Landlord"));
    assert_eq!(count(&json), 0);
}

#[tokio::test]
async fn test_filters_narrow_monotonically() {
    let client = TestClient::with_sample_data();

    let everything = dashboard(&client, "").await;
    let food = dashboard(&client, "&category=Food").await;
    let food_at_cafe = dashboard(&client, "&category=Food&payee=Cafe").await;
    let food_at_cafe_in_january = dashboard(
        &client,
        "&category=Food&payee=Cafe&from_date=2024-01-01&to_date=2024-01-31",
    )
    .await;

    assert_eq!(count(&everything), 10);
    assert_eq!(count(&food), 4);
    assert_eq!(count(&food_at_cafe), 2);
    assert_eq!(count(&food_at_cafe_in_january), 1);

    let mut previous = total(&everything);
    for view in [&food, &food_at_cafe, &food_at_cafe_in_january] {
        assert!(total(view) <= previous);
        previous = total(view);
    }
}

#[tokio::test]
async fn test_views_agree_on_the_total() {
    let client = TestClient::with_sample_data();
    let json = dashboard(&client, "&from_date=2024-02-01&to_date=2024-02-29").await;

    assert_eq!(count(&json), 3);
    let expected = total(&json);
    assert!((expected - 164.25).abs() < 1e-9);

    let by_category: f64 = json["categories"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["total"].as_f64().unwrap())
        .sum();
    assert!((by_category - expected).abs() < 1e-9);

    let daily = json["daily"].as_array().unwrap();
    let last = daily.last().unwrap()["cumulative"].as_f64().unwrap();
    assert!((last - expected).abs() < 1e-9);

    let percentages: f64 = json["categories"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["percentage"].as_f64().unwrap())
        .sum();
    assert!((percentages - 100.0).abs() < 1e-6);
}

#[tokio::test]
async fn test_dates_outside_the_data_are_clamped() {
    let client = TestClient::with_sample_data();
    let json = dashboard(&client, "&from_date=2000-01-01&to_date=2099-12-31").await;

    assert_eq!(json["selection"]["filter"]["date_range"]["from"], "2024-01-01");
    assert_eq!(json["selection"]["filter"]["date_range"]["to"], "2024-03-30");
    assert_eq!(count(&json), 10);
}

#[tokio::test]
async fn test_single_day_dataset_gets_a_wider_selectable_range() {
    let client = TestClient::new();
    client.insert_expense(ALICE, "2024-06-01 08:00:00", 3.0, Some("Food"), Some("Cafe"));
    client.insert_expense(ALICE, "2024-06-01 18:00:00", 4.0, Some("Food"), Some("Bistro"));

    let json = dashboard(&client, "").await;
    assert_eq!(json["selectable_range"]["from"], "2024-06-01");
    assert_eq!(json["selectable_range"]["to"], "2024-06-02");
    assert_eq!(count(&json), 2);
}

#[tokio::test]
async fn test_to_date_covers_the_whole_day() {
    let client = TestClient::new();
    client.insert_expense(ALICE, "2024-06-01 08:00:00", 3.0, Some("Food"), Some("Cafe"));
    client.insert_expense(ALICE, "2024-06-03 23:59:00", 4.0, Some("Food"), Some("Bistro"));
    client.insert_expense(ALICE, "2024-06-04 00:00:00", 5.0, Some("Food"), Some("Bistro"));

    let json = dashboard(&client, "&from_date=2024-06-01&to_date=2024-06-03").await;
    assert_eq!(count(&json), 2);
    assert!((total(&json) - 7.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_top_n_is_bounded() {
    let client = TestClient::with_sample_data();

    let json = dashboard(&client, "&top_n=3").await;
    assert_eq!(json["selection"]["top_n"], 5);
    let top = json["top_expenses"].as_array().unwrap();
    assert_eq!(top.len(), 5);
    assert_eq!(top[0]["amount"], 150.0);
    assert_eq!(top[0]["paidTo"], "Outlet");

    let json = dashboard(&client, "&top_n=50").await;
    assert_eq!(json["selection"]["top_n"], 20);
    assert_eq!(json["top_expenses"].as_array().unwrap().len(), 10);

    let amounts: Vec<f64> = json["top_expenses"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["amount"].as_f64().unwrap())
        .collect();
    assert!(amounts.windows(2).all(|pair| pair[0] >= pair[1]));
}

#[tokio::test]
async fn test_period_comparison_ignores_filters() {
    let client = TestClient::with_sample_data();
    let json = dashboard(
        &client,
        "&category=Transport&period1_from=2024-01-01&period1_to=2024-01-31\
         &period2_from=2024-02-01&period2_to=2024-02-29",
    )
    .await;

    let rows = json["period_comparison"].as_array().unwrap();
    let categories: Vec<&str> = rows
        .iter()
        .map(|r| r["category"].as_str().unwrap())
        .collect();
    assert_eq!(categories, vec!["Food", "Groceries", "Transport"]);

    assert_eq!(rows[0]["period1"], 42.5);
    assert_eq!(rows[0]["period2"], 95.0);
    assert_eq!(rows[1]["period1"], 80.0);
    assert_eq!(rows[1]["period2"], 64.25);
    assert_eq!(rows[2]["period1"], 5.0);
    assert_eq!(rows[2]["period2"], 5.0);
}

#[tokio::test]
async fn test_period_comparison_outer_join() {
    let client = TestClient::with_sample_data();
    let json = dashboard(
        &client,
        "&period1_from=2024-01-01&period1_to=2024-01-10\
         &period2_from=2024-03-01&period2_to=2024-03-31",
    )
    .await;

    let rows = json["period_comparison"].as_array().unwrap();
    let shopping = rows.iter().find(|r| r["category"] == "Shopping").unwrap();
    assert!(shopping["period1"].is_null());
    assert_eq!(shopping["period2"], 150.0);

    let transport = rows.iter().find(|r| r["category"] == "Transport").unwrap();
    assert_eq!(transport["period1"], 5.0);
    assert!(transport["period2"].is_null());
}

#[tokio::test]
async fn test_top_payees_and_weekdays() {
    let client = TestClient::with_sample_data();
    let json = dashboard(&client, "").await;

    let payees = json["top_payees"].as_array().unwrap();
    assert!(payees.len() <= 10);
    assert_eq!(payees[0]["payee"], "Supermarket");

    let weekdays: Vec<&str> = json["weekdays"]
        .as_array()
        .unwrap()
        .iter()
        .map(|w| w["weekday"].as_str().unwrap())
        .collect();
    assert_eq!(
        weekdays,
        vec!["Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday"]
    );
}

#[tokio::test]
async fn test_statistics_per_category() {
    let client = TestClient::with_sample_data();
    let json = dashboard(&client, "&category=Transport&category=Shopping").await;

    let stats = json["statistics"].as_array().unwrap();
    assert_eq!(stats.len(), 2);
    assert_eq!(stats[0]["category"], "Shopping");
    assert_eq!(stats[0]["count"], 1);
    assert!(stats[0]["std"].is_null());
    assert_eq!(stats[1]["category"], "Transport");
    assert_eq!(stats[1]["count"], 2);
    assert_eq!(stats[1]["std"], 0.0);
    assert_eq!(stats[1]["median"], 5.0);
}
