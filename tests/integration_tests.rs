//! Integration tests for the region lookup and forecast pipeline
//!
//! Both remote services are replaced by wiremock servers.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::json;
use tenki::{ForecastError, ForecastService, TenkiConfig, web};
use tower::ServiceExt;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const USER_AGENT: &str = "tenki-test/1.0";

const BOUNDARY_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:ldWeather="http://weather.livedoor.com/ns/rss/2.0">
  <channel>
    <ldWeather:source title="全国">
      <pref title="道南">
        <city title="室蘭" id="012040"/>
      </pref>
      <pref title="道南">
        <city title="函館" id="012025"/>
      </pref>
      <pref title="神奈川県">
        <city title="横浜" id="140010"/>
        <city title="未定"/>
      </pref>
      <pref title="福岡県">
        <city title="福岡" id="400010"/>
      </pref>
    </ldWeather:source>
  </channel>
</rss>"#;

fn config_for(server: &MockServer) -> TenkiConfig {
    let mut config = TenkiConfig::default();
    config.http.user_agent = USER_AGENT.to_string();
    config.http.timeout_seconds = 2;
    config.endpoints.boundary_url = format!("{}/primary_area.xml", server.uri());
    config.endpoints.forecast_base_url = format!("{}/api/forecast/city", server.uri());
    config
}

fn service_for(server: &MockServer) -> ForecastService {
    ForecastService::new(&config_for(server)).expect("service build")
}

async fn mount_boundaries(server: &MockServer, body: &str) {
    Mock::given(method("GET"))
        .and(path("/primary_area.xml"))
        .and(header("Accept", "application/xml"))
        .and(header("User-Agent", USER_AGENT))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body.to_owned(), "application/xml"))
        .mount(server)
        .await;
}

async fn mount_forecast(server: &MockServer, code: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(format!("/api/forecast/city/{code}")))
        .and(header("Accept", "application/json"))
        .and(header("User-Agent", USER_AGENT))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn resolves_cities_across_shared_pref_title() {
    let server = MockServer::start().await;
    mount_boundaries(&server, BOUNDARY_XML).await;
    let service = service_for(&server);

    let muroran = service.get_city_id("道南", "室蘭").await.unwrap();
    let hakodate = service.get_city_id("道南", "函館").await.unwrap();

    assert_eq!(muroran.as_str(), "012040");
    assert_eq!(hakodate.as_str(), "012025");
}

#[tokio::test]
async fn city_suffix_is_not_stripped() {
    let server = MockServer::start().await;
    mount_boundaries(&server, BOUNDARY_XML).await;

    let err = service_for(&server)
        .get_city_id("福岡県", "福岡市")
        .await
        .unwrap_err();

    assert_eq!(
        err,
        ForecastError::CityNotFound {
            city: "福岡市".to_string()
        }
    );
    assert!(err.user_message().contains("福岡市"));
}

#[tokio::test]
async fn lookup_failures_are_distinct() {
    let server = MockServer::start().await;
    mount_boundaries(&server, BOUNDARY_XML).await;
    let service = service_for(&server);

    let pref = service.get_city_id("東京都", "東京").await.unwrap_err();
    assert_eq!(
        pref,
        ForecastError::PrefNotFound {
            pref: "東京都".to_string()
        }
    );

    // 横浜 lives under 神奈川県 only
    let scoped = service.get_city_id("福岡県", "横浜").await.unwrap_err();
    assert!(matches!(scoped, ForecastError::CityNotFound { .. }));

    let empty = service.get_city_id("神奈川県", "未定").await.unwrap_err();
    assert!(matches!(empty, ForecastError::EmptyCode { .. }));

    assert_ne!(pref.user_message(), empty.user_message());
}

#[tokio::test]
async fn boundary_document_is_fetched_per_call() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/primary_area.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(BOUNDARY_XML))
        .expect(2)
        .mount(&server)
        .await;
    let service = service_for(&server);

    service.get_city_id("福岡県", "福岡").await.unwrap();
    service.get_city_id("神奈川県", "横浜").await.unwrap();
}

#[tokio::test]
async fn boundary_server_error_is_fetch_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/primary_area.xml"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = service_for(&server)
        .get_city_id("福岡県", "福岡")
        .await
        .unwrap_err();
    assert!(matches!(err, ForecastError::Fetch { .. }));
}

#[tokio::test]
async fn malformed_boundary_document_is_parse_error() {
    let server = MockServer::start().await;
    mount_boundaries(
        &server,
        r#"<rss><pref title="福岡県"><city title="福岡" id="400010"></rss>"#,
    )
    .await;

    let err = service_for(&server)
        .get_city_id("福岡県", "福岡")
        .await
        .unwrap_err();
    assert!(matches!(err, ForecastError::Parse { .. }));
}

#[tokio::test]
async fn document_without_prefectures_reports_unknown_prefecture() {
    let server = MockServer::start().await;
    mount_boundaries(&server, "<rss><channel></channel></rss>").await;

    let err = service_for(&server)
        .get_city_id("福岡県", "福岡")
        .await
        .unwrap_err();
    assert_eq!(
        err,
        ForecastError::PrefNotFound {
            pref: "福岡県".to_string()
        }
    );
}

#[tokio::test]
async fn alerts_report_single_day() {
    let server = MockServer::start().await;
    mount_forecast(
        &server,
        "140010",
        json!({
            "title": "神奈川県 横浜 の天気",
            "forecasts": [{
                "date": "2023-10-01",
                "dateLabel": "今日",
                "detail": {"weather": "晴れ", "wind": "南東の風", "wave": "1m"}
            }]
        }),
    )
    .await;

    let report = service_for(&server).get_alerts("140010").await.unwrap();
    assert_eq!(
        report,
        "weather: 晴れ\nwind: 南東の風\nwave: 1m\ndate: 2023-10-01"
    );
}

#[tokio::test]
async fn alerts_report_multiple_days_in_order() {
    let server = MockServer::start().await;
    mount_forecast(
        &server,
        "400010",
        json!({
            "forecasts": [
                {"date": "2023-10-01", "detail": {"weather": "晴れ", "wind": "北の風", "wave": null}},
                {"date": "2023-10-02", "detail": {"weather": "くもり"}},
                {"detail": {"weather": "雨"}}
            ]
        }),
    )
    .await;

    let report = service_for(&server).get_alerts("400010").await.unwrap();
    let blocks: Vec<&str> = report.split("\n---\n").collect();

    assert_eq!(blocks.len(), 3);
    assert_eq!(report.lines().filter(|l| *l == "---").count(), 2);
    assert!(blocks[0].contains("wave: Unknown"));
    assert!(blocks[1].contains("date: 2023-10-02"));
    assert!(blocks[2].contains("weather: 雨"));
    assert!(blocks[2].contains("date: Unknown"));
}

#[tokio::test]
async fn empty_forecast_is_reported() {
    let server = MockServer::start().await;
    mount_forecast(&server, "999999", json!({"forecasts": []})).await;
    mount_forecast(&server, "999998", json!({"title": "no forecasts"})).await;
    let service = service_for(&server);

    assert_eq!(
        service.get_alerts("999999").await.unwrap_err(),
        ForecastError::EmptyForecast
    );
    assert_eq!(
        service.get_alerts("999998").await.unwrap_err(),
        ForecastError::EmptyForecast
    );
}

#[tokio::test]
async fn entry_without_detail_is_malformed() {
    let server = MockServer::start().await;
    mount_forecast(&server, "140010", json!({"forecasts": [{"date": "2023-10-01"}]})).await;

    let err = service_for(&server).get_alerts("140010").await.unwrap_err();
    assert_eq!(
        err,
        ForecastError::MalformedEntry {
            date: "2023-10-01".to_string()
        }
    );
}

#[tokio::test]
async fn forecast_transport_and_decode_errors_are_distinct() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/forecast/city/000000"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/forecast/city/140010"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;
    let service = service_for(&server);

    let fetch = service.get_alerts("000000").await.unwrap_err();
    let decode = service.get_alerts("140010").await.unwrap_err();

    assert!(matches!(fetch, ForecastError::Fetch { .. }));
    assert!(matches!(decode, ForecastError::Decode { .. }));
    assert_ne!(fetch.user_message(), decode.user_message());
}

#[tokio::test]
async fn slow_forecast_times_out_as_fetch_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/forecast/city/140010"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"forecasts": []}))
                .set_delay(std::time::Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let mut config = config_for(&server);
    config.http.timeout_seconds = 1;
    let service = ForecastService::new(&config).unwrap();

    let err = service.get_alerts("140010").await.unwrap_err();
    assert!(matches!(err, ForecastError::Fetch { .. }));
}

fn city_id_uri(pref: &str, city: &str) -> String {
    let url = reqwest::Url::parse_with_params(
        "http://localhost/api/city-id",
        &[("pref", pref), ("city", city)],
    )
    .unwrap();
    format!("{}?{}", url.path(), url.query().unwrap_or_default())
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn http_city_id_endpoint() {
    let server = MockServer::start().await;
    mount_boundaries(&server, BOUNDARY_XML).await;
    let app = web::app(service_for(&server));

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(city_id_uri("神奈川県", "横浜"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "140010");

    let response = app
        .oneshot(
            Request::builder()
                .uri(city_id_uri("福岡県", "福岡市"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_text(response).await.contains("地域名が見つかりません: 福岡市"));
}

#[tokio::test]
async fn http_alerts_endpoint() {
    let server = MockServer::start().await;
    mount_forecast(
        &server,
        "140010",
        json!({"forecasts": [{"date": "2023-10-01", "detail": {"weather": "晴れ"}}]}),
    )
    .await;
    mount_forecast(&server, "999999", json!({"forecasts": []})).await;
    let app = web::app(service_for(&server));

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/alerts/140010")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.starts_with("weather: 晴れ\n"));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/alerts/999999")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body_text(response).await.contains("予報が空です"));
}
