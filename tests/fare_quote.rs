//! End-to-end tests for the fare quote workflow and HTTP surface

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use stdfare::models::{BoundingBox, Leg, Step};
use stdfare::routing::{DirectionsResponse, FixedDirectionsProvider};
use stdfare::tariff::{InMemoryTariffStore, TariffRow};
use stdfare::{
    DistanceTable, FareConfig, FareError, FareQuoteService, GeoPoint, QuoteSession, RegionCode,
    RouteCandidate, Selection, VehicleClass, WorkflowPhase, round_distance, web,
};
use tower::ServiceExt;

const TOKYO: &str = "日本、〒100-0005 東京都千代田区丸の内1丁目";
const UTSUNOMIYA: &str = "日本、〒320-0806 栃木県宇都宮市中央";
const HAKODATE: &str = "日本、〒040-0063 北海道函館市若松町";
const AOMORI: &str = "日本、〒030-0801 青森県青森市新町";

fn route(start: &str, end: &str, meters: u64, instructions: &[&str]) -> RouteCandidate {
    RouteCandidate {
        legs: vec![Leg {
            start_address: start.to_string(),
            end_address: end.to_string(),
            distance_meters: meters,
            steps: instructions.iter().map(|s| Step::new(*s)).collect(),
        }],
        bounds: BoundingBox::new(36.6, 35.6, 139.7, 139.9),
    }
}

fn kanto_tariffs() -> Arc<InMemoryTariffStore> {
    let rows = [(1, 29_800), (2, 34_150), (3, 45_230), (4, 53_680)]
        .into_iter()
        .map(|(vehicle_code, fare_yen)| TariffRow {
            region_code: RegionCode::Kanto.code(),
            vehicle_code,
            upto_km: round_distance(123.4, RegionCode::Kanto),
            fare_yen,
        });
    Arc::new(InMemoryTariffStore::from_rows(rows).unwrap())
}

fn service(responses: Vec<DirectionsResponse>) -> Arc<FareQuoteService> {
    Arc::new(FareQuoteService::new(
        Arc::new(FixedDirectionsProvider::sequence(responses)),
        kanto_tariffs(),
        DistanceTable::standard(),
    ))
}

fn tokyo() -> GeoPoint {
    GeoPoint::new(35.6812, 139.7671)
}

fn utsunomiya() -> GeoPoint {
    GeoPoint::new(36.5551, 139.8828)
}

#[tokio::test]
async fn kanto_route_is_quoted_from_the_tariff_table() {
    let service = service(vec![DirectionsResponse::ok(vec![route(
        TOKYO,
        UTSUNOMIYA,
        123_400,
        &["<b>東北自動車道</b>に入る"],
    )])]);
    let session = QuoteSession::new(service, Selection::default());
    session.set_origin(tokyo()).await.unwrap();
    session.set_destination(utsunomiya()).await.unwrap();

    let result = session.compute().await.unwrap();

    assert_eq!(result.billing_distance_km, 130);
    assert_eq!(result.fare_yen, 45_230);
    assert_eq!(result.format_distance(), "123.4");
    assert_eq!(result.format_fare(), "¥45,230");
    assert_eq!(session.snapshot().await.phase(), WorkflowPhase::Quoted);
}

#[tokio::test]
async fn hokkaido_to_tohoku_is_rejected() {
    let service = service(vec![DirectionsResponse::ok(vec![route(
        HAKODATE,
        AOMORI,
        160_000,
        &["直進"],
    )])]);
    let session = QuoteSession::new(service, Selection::default());
    session.set_origin(GeoPoint::new(41.77, 140.73)).await.unwrap();
    session.set_destination(GeoPoint::new(40.82, 140.74)).await.unwrap();

    let err = session.compute().await.unwrap_err();

    assert!(matches!(err, FareError::FerryRegionMismatch));
    let state = session.snapshot().await;
    assert!(state.result().is_none());
    assert_eq!(state.phase(), WorkflowPhase::Idle);
}

#[tokio::test]
async fn ferry_only_routes_succeed_after_enabling_highways() {
    let service = service(vec![
        DirectionsResponse::ok(vec![
            route(TOKYO, UTSUNOMIYA, 100_000, &["<b>東京湾フェリー</b>に乗船"]),
            route(TOKYO, UTSUNOMIYA, 110_000, &["直進", "フェリーに乗る"]),
        ]),
        DirectionsResponse::ok(vec![
            route(TOKYO, UTSUNOMIYA, 100_000, &["<b>東京湾フェリー</b>に乗船"]),
            route(TOKYO, UTSUNOMIYA, 123_400, &["<b>東北自動車道</b>に入る"]),
        ]),
    ]);
    let session = QuoteSession::new(service, Selection::default());
    session.set_use_highway(false).await;
    session.set_origin(tokyo()).await.unwrap();
    session.set_destination(utsunomiya()).await.unwrap();

    assert!(matches!(
        session.compute().await,
        Err(FareError::NoLandRoute)
    ));

    session.set_use_highway(true).await;
    let result = session.compute().await.unwrap();
    assert_eq!(result.raw_distance_km, 123.4);
    assert_eq!(result.fare_yen, 45_230);
}

#[tokio::test]
async fn changing_vehicle_clears_fare_and_keeps_points() {
    let service = service(vec![DirectionsResponse::ok(vec![route(
        TOKYO,
        UTSUNOMIYA,
        123_400,
        &[],
    )])]);
    let session = QuoteSession::new(service, Selection::default());
    session.set_origin(tokyo()).await.unwrap();
    session.set_destination(utsunomiya()).await.unwrap();
    session.compute().await.unwrap();

    session.set_vehicle(VehicleClass::Trailer).await;

    let state = session.snapshot().await;
    assert!(state.result().is_none());
    assert_eq!(state.origin(), Some(tokyo()));
    assert_eq!(state.destination(), Some(utsunomiya()));

    let result = session.compute().await.unwrap();
    assert_eq!(result.fare_yen, 53_680);
}

async fn send(app: axum::Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn post_quote(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/quote")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn http_quote_returns_fare_and_display_strings() {
    let service = service(vec![DirectionsResponse::ok(vec![route(
        TOKYO,
        UTSUNOMIYA,
        123_400,
        &[],
    )])]);
    let app = web::app(service, &FareConfig::default());

    let (status, body) = send(
        app,
        post_quote(json!({
            "origin": {"latitude": 35.6812, "longitude": 139.7671},
            "destination": {"latitude": 36.5551, "longitude": 139.8828},
            "vehicle": "large",
            "region": "kanto",
            "use_highway": true
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["fare_yen"], 45_230);
    assert_eq!(body["billing_distance_km"], 130);
    assert_eq!(body["origin_address"], "〒100-0005 東京都千代田区丸の内1丁目");
    assert_eq!(body["display"]["fare"], "¥45,230");
    assert_eq!(body["display"]["raw_distance"], "123.4km");
    assert_eq!(body["display"]["bureau"], "関東運輸局");
    assert_eq!(body["display"]["vehicle"], "大型車(10t)");
}

#[tokio::test]
async fn http_quote_without_destination_is_bad_request() {
    let service = service(vec![DirectionsResponse::ok(vec![])]);
    let app = web::app(service, &FareConfig::default());

    let (status, body) = send(
        app,
        post_quote(json!({"origin": {"latitude": 35.6812, "longitude": 139.7671}})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "missing_endpoints");
    assert_eq!(body["message"], "出発地と目的地をクリックで指定してください");
}

#[tokio::test]
async fn http_quote_surfaces_provider_status() {
    let service = service(vec![DirectionsResponse::failed("ZERO_RESULTS")]);
    let app = web::app(service, &FareConfig::default());

    let (status, body) = send(
        app,
        post_quote(json!({
            "origin": {"latitude": 35.6812, "longitude": 139.7671},
            "destination": {"latitude": 36.5551, "longitude": 139.8828}
        })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "route_unavailable");
    assert_eq!(body["message"], "ルート取得エラー：ZERO_RESULTS");
}

#[tokio::test]
async fn http_lists_regions_and_vehicles() {
    let app = web::app(service(vec![]), &FareConfig::default());

    let (status, regions) = send(
        app.clone(),
        Request::builder()
            .uri("/api/regions")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(regions.as_array().map(Vec::len), Some(10));
    assert_eq!(regions[0]["name"], "北海道");
    assert_eq!(regions[2]["slug"], "kanto");
    assert_eq!(regions[2]["bounds"]["north"], 37.0);

    let (status, vehicles) = send(
        app,
        Request::builder()
            .uri("/api/vehicles")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(vehicles[3]["label"], "トレーラー(20t)");
    assert_eq!(vehicles[3]["code"], 4);
}

#[tokio::test]
async fn http_quote_accepts_japanese_region_name_and_vehicle_code() {
    let service = service(vec![DirectionsResponse::ok(vec![route(
        TOKYO,
        UTSUNOMIYA,
        123_400,
        &[],
    )])]);
    let app = web::app(service, &FareConfig::default());

    let (status, body) = send(
        app,
        post_quote(json!({
            "origin": {"latitude": 35.6812, "longitude": 139.7671},
            "destination": {"latitude": 36.5551, "longitude": 139.8828},
            "vehicle": "4",
            "region": "関東"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["region"], "kanto");
    assert_eq!(body["vehicle"], "trailer");
    assert_eq!(body["fare_yen"], 53_680);
}

#[tokio::test]
async fn http_quote_with_unknown_region_is_json_validation_error() {
    let app = web::app(service(vec![]), &FareConfig::default());

    let (status, body) = send(
        app,
        post_quote(json!({
            "origin": {"latitude": 35.6812, "longitude": 139.7671},
            "destination": {"latitude": 36.5551, "longitude": 139.8828},
            "region": "tokyo"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation");
    assert!(body["message"].as_str().unwrap().contains("tokyo"));
}

#[tokio::test]
async fn http_quote_with_malformed_body_is_json_validation_error() {
    let app = web::app(service(vec![]), &FareConfig::default());

    let request = Request::builder()
        .method("POST")
        .uri("/api/quote")
        .header("content-type", "application/json")
        .body(Body::from("{\"origin\": "))
        .unwrap();
    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation");
}

#[tokio::test]
async fn http_quote_with_destination_only_reports_missing_origin() {
    let app = web::app(service(vec![]), &FareConfig::default());

    let (status, body) = send(
        app,
        post_quote(json!({"destination": {"latitude": 36.5551, "longitude": 139.8828}})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "origin_not_set");
}
