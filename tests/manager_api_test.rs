mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{app, send, send_raw, token_for};

async fn staffed_app() -> (axum::Router, String, String) {
    let app = app();
    let manager = token_for("auth0|sarah", "Sarah Johnson");
    let nurse = token_for("auth0|mike", "Mike Chen");
    for (token, role) in [(&manager, "ADMINISTRATIVE"), (&nurse, "NURSE")] {
        let (status, _) = send(
            &app,
            "POST",
            "/api/users/register",
            Some(token),
            Some(json!({ "role": role })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }
    let (status, _) = send(
        &app,
        "PUT",
        "/api/manager/zones/NURSE",
        Some(&manager),
        Some(json!({ "lat": 40.7128, "lng": -74.0060, "radius_m": 2000 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    (app, manager, nurse)
}

#[tokio::test]
async fn manager_routes_refuse_other_roles() {
    let (app, _, nurse) = staffed_app().await;
    for uri in [
        "/api/manager/zones",
        "/api/manager/shifts/active",
        "/api/manager/shifts",
        "/api/manager/dashboard",
        "/api/manager/shifts/export",
    ] {
        let (status, _) = send(&app, "GET", uri, Some(&nurse), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{}", uri);
    }

    let (status, _) = send(
        &app,
        "PUT",
        "/api/manager/zones/DOCTOR",
        Some(&nurse),
        Some(json!({ "lat": 0.0, "lng": 0.0, "radius_m": 100 })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn zone_edits_are_validated() {
    let (app, manager, _) = staffed_app().await;

    let (status, _) = send(
        &app,
        "PUT",
        "/api/manager/zones/JANITOR",
        Some(&manager),
        Some(json!({ "lat": 0.0, "lng": 0.0, "radius_m": 100 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        "PUT",
        "/api/manager/zones/DOCTOR",
        Some(&manager),
        Some(json!({ "lat": 0.0, "lng": 0.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        "PUT",
        "/api/manager/zones/DOCTOR",
        Some(&manager),
        Some(json!({ "lat": 0.0, "lng": 200.0, "radius_m": 100 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn worker_type_listing_shows_configured_zones() {
    let (app, manager, _) = staffed_app().await;
    let (status, types) = send(&app, "GET", "/api/manager/zones", Some(&manager), None).await;
    assert_eq!(status, StatusCode::OK);
    let types = types.as_array().unwrap();
    assert_eq!(types.len(), 9);

    let nurse = types.iter().find(|t| t["role"] == "NURSE").unwrap();
    assert_eq!(nurse["worker_zone"]["radius_km"], 2.0);
    let doctor = types.iter().find(|t| t["role"] == "DOCTOR").unwrap();
    assert!(doctor["worker_zone"].is_null());
}

#[tokio::test]
async fn dashboard_history_and_export_reflect_shifts() {
    let (app, manager, nurse) = staffed_app().await;
    let at_hospital = json!({ "lat": 40.7128, "lng": -74.0060 });

    let (status, _) = send(&app, "POST", "/api/shifts/clock-in", Some(&nurse), Some(at_hospital.clone())).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, stats) = send(&app, "GET", "/api/manager/dashboard", Some(&manager), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["total_staff"], 2);
    assert_eq!(stats["active_workers"], 1);
    assert_eq!(stats["hours_per_day"].as_array().unwrap().len(), 7);

    let (status, _) = send(&app, "POST", "/api/shifts/clock-out", Some(&nurse), Some(at_hospital)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, stats) = send(&app, "GET", "/api/manager/dashboard?days=40", Some(&manager), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["active_workers"], 0);
    assert_eq!(stats["hours_per_day"].as_array().unwrap().len(), 31);
    assert_eq!(stats["staff_totals"][0]["worker_name"], "Mike Chen");
    assert_eq!(stats["staff_totals"][0]["shift_count"], 1);

    let (status, history) = send(&app, "GET", "/api/manager/shifts?limit=5", Some(&manager), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(history.as_array().unwrap().len(), 1);
    assert_eq!(history[0]["role"], "NURSE");
    assert_eq!(history[0]["active"], false);

    let (status, _) = send(
        &app,
        "GET",
        "/api/manager/shifts?from=2026-02-01T00:00:00Z&to=2026-01-01T00:00:00Z",
        Some(&manager),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, content_type, bytes) =
        send_raw(&app, "GET", "/api/manager/shifts/export", Some(&manager), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        content_type.as_deref(),
        Some("application/vnd.openxmlformats-officedocument.spreadsheetml.sheet")
    );
    assert_eq!(&bytes[..2], b"PK");
}
