//! Record CRUD, derived fields and ownership against a live database

mod common;

use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
#[ignore = "requires database"]
async fn test_workout_lifecycle_recomputes_calories() {
    let app = common::TestApp::new().await;
    let token = app.register_user().await;

    let (status, workout) = app
        .post(
            "/api/v1/workouts",
            &token,
            json!({
                "exercise_type": "running",
                "intensity": "6 mph",
                "duration_minutes": 30,
                "date": "2024-03-10T07:00:00Z"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(workout["calories_burned"], 392);

    let id = workout["id"].as_str().unwrap();
    let (status, updated) = app
        .put(&format!("/api/v1/workouts/{}", id), &token, json!({ "duration_minutes": 60 }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["calories_burned"], 784);
    assert_eq!(updated["intensity"], "6 mph");

    assert_eq!(app.delete(&format!("/api/v1/workouts/{}", id), &token).await, StatusCode::NO_CONTENT);
    let (status, _) = app.get(&format!("/api/v1/workouts/{}", id), &token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_workout_unknown_intensity_rejected() {
    let app = common::TestApp::new().await;
    let token = app.register_user().await;

    let (status, body) = app
        .post(
            "/api/v1/workouts",
            &token,
            json!({
                "exercise_type": "yoga",
                "intensity": "6 mph",
                "duration_minutes": 30,
                "date": "2024-03-10T07:00:00Z"
            }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_records_are_private_to_their_owner() {
    let app = common::TestApp::new().await;
    let owner = app.register_user().await;
    let other = app.register_user().await;

    let (_, workout) = app
        .post(
            "/api/v1/workouts",
            &owner,
            json!({
                "exercise_type": "walking",
                "intensity": "moderate",
                "duration_minutes": 45,
                "date": "2024-03-10T07:00:00Z"
            }),
        )
        .await;
    let path = format!("/api/v1/workouts/{}", workout["id"].as_str().unwrap());

    let (status, _) = app.get(&path, &other).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(app.delete(&path, &other).await, StatusCode::NOT_FOUND);

    let (_, list) = app.get("/api/v1/workouts", &other).await;
    assert_eq!(list["total"], 0);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_meal_totals_follow_foods() {
    let app = common::TestApp::new().await;
    let token = app.register_user().await;

    let (status, meal) = app
        .post(
            "/api/v1/meals",
            &token,
            json!({
                "name": "Breakfast",
                "meal_type": "breakfast",
                "date": "2024-03-10T08:00:00Z",
                "foods": [
                    { "name": "Egg", "quantity": 2.0, "unit": "piece", "calories": 78.0, "protein": 6.0, "fat": 5.0 },
                    { "name": "Toast", "quantity": 1.0, "unit": "slice", "calories": 80.0, "carbs": 15.0 }
                ]
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(meal["total_calories"], 236.0);
    assert_eq!(meal["total_protein"], 12.0);
    assert_eq!(meal["total_carbs"], 15.0);

    let id = meal["id"].as_str().unwrap();
    let (_, updated) = app
        .put(
            &format!("/api/v1/meals/{}", id),
            &token,
            json!({ "foods": [{ "name": "Oats", "quantity": 1.0, "unit": "serving", "calories": 150.0 }] }),
        )
        .await;
    assert_eq!(updated["total_calories"], 150.0);
    assert_eq!(updated["total_protein"], 0.0);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_meal_requires_foods() {
    let app = common::TestApp::new().await;
    let token = app.register_user().await;

    let (status, body) = app
        .post(
            "/api/v1/meals",
            &token,
            json!({ "name": "Nothing", "meal_type": "snack", "date": "2024-03-10T08:00:00Z", "foods": [] }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["field"], "foods");
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_sleep_duration_and_score() {
    let app = common::TestApp::new().await;
    let token = app.register_user().await;

    let (status, sleep) = app
        .post(
            "/api/v1/sleep",
            &token,
            json!({
                "sleep_start": "2024-03-09T23:00:00Z",
                "sleep_end": "2024-03-10T07:00:00Z",
                "quality": "good"
            }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(sleep["duration_minutes"], 480);
    assert_eq!(sleep["quality_score"], 75);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_progress_latest_and_bmi() {
    let app = common::TestApp::new().await;
    let token = app.register_user().await;

    for (date, weight) in [("2024-03-01T07:00:00Z", 79.0), ("2024-03-08T07:00:00Z", 78.0)] {
        let (status, _) = app
            .post("/api/v1/progress", &token, json!({ "date": date, "weight_kg": weight }))
            .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, latest) = app.get("/api/v1/progress/latest", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(latest["weight_kg"], 78.0);
    assert_eq!(latest["bmi"], 24.1);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_list_paging_and_category_filter() {
    let app = common::TestApp::new().await;
    let token = app.register_user().await;

    for (exercise, day) in [("running", 1), ("cycling", 2), ("running", 3)] {
        app.post(
            "/api/v1/workouts",
            &token,
            json!({
                "exercise_type": exercise,
                "intensity": if exercise == "running" { "5 mph" } else { "moderate" },
                "duration_minutes": 30,
                "date": format!("2024-03-0{}T07:00:00Z", day)
            }),
        )
        .await;
    }

    let (_, page) = app.get("/api/v1/workouts?limit=2", &token).await;
    assert_eq!(page["total"], 3);
    assert_eq!(page["data"].as_array().unwrap().len(), 2);
    assert_eq!(page["data"][0]["date"], "2024-03-03T07:00:00Z");

    let (_, running) = app.get("/api/v1/workouts?exercise_type=running", &token).await;
    assert_eq!(running["total"], 2);
}
