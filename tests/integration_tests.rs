use feedback_sentiment::core::cache::CacheState;
use feedback_sentiment::core::Label;
use feedback_sentiment::domain::model::DateBucket;
use feedback_sentiment::domain::ports::{FeedbackSource, Presenter};
use feedback_sentiment::{
    DashboardEngine, DashboardError, DashboardSettings, FetchError, SheetFormat, SheetSource,
    TerminalPresenter,
};
use httpmock::prelude::*;
use std::time::{Duration, Instant};

fn reference_rows() -> serde_json::Value {
    serde_json::json!([
        {"Timestamp": "2024-01-01 09:15:00", "Reviews ": "Great app, love it!", "Email": "a@example.com"},
        {"Timestamp": "2024-01-01 12:40:00", "Reviews ": "Terrible, crashes always", "Email": "b@example.com"},
        {"Timestamp": "2024-01-02 08:05:00", "Reviews ": "It's fine I guess", "Email": "c@example.com"}
    ])
}

#[tokio::test]
async fn test_end_to_end_json_sheet() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/feedback");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(reference_rows());
    });

    let source = SheetSource::new(server.url("/feedback"), SheetFormat::Json);
    let engine = DashboardEngine::new(source, DashboardSettings::default());

    let (result, cache) = engine.tick(CacheState::empty(), Instant::now()).await;
    let model = result.unwrap();

    api_mock.assert();
    assert!(!cache.is_empty());
    assert_eq!(model.columns, vec!["Timestamp", "Reviews", "Email"]);
    assert_eq!(model.view.count(Label::Positive), 1);
    assert_eq!(model.view.count(Label::Negative), 1);
    assert_eq!(model.view.count(Label::Neutral), 1);

    // 表格由新到舊
    assert_eq!(model.latest[0].text, "It's fine I guess");
    assert_eq!(model.latest[0].label, Label::Neutral);
    assert_eq!(model.latest[2].label, Label::Positive);

    let dates: Vec<DateBucket> = model.trend[0].points.iter().map(|(d, _)| *d).collect();
    assert_eq!(dates.len(), 2);

    let mut presenter = TerminalPresenter::new(Vec::new(), 10);
    presenter.render(&model).unwrap();
    let output = String::from_utf8(presenter.into_inner()).unwrap();
    assert!(output.contains("😃 Positive: 1 | 😐 Neutral: 1 | 😠 Negative: 1"));
}

#[tokio::test]
async fn test_end_to_end_csv_export() {
    let server = MockServer::start();
    let body = "Timestamp,Reviews,Rating\n\
                1/5/2024 10:00:00,Really helpful and fast,5\n\
                not-a-date,5,4\n\
                1/6/2024 11:30:00,Slow and buggy,1\n";

    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/export");
        then.status(200).header("Content-Type", "text/csv").body(body);
    });

    let source = SheetSource::new(server.url("/export"), SheetFormat::Csv);
    let engine = DashboardEngine::new(source, DashboardSettings::default());

    let (result, _) = engine.tick(CacheState::empty(), Instant::now()).await;
    let model = result.unwrap();

    api_mock.assert();
    assert_eq!(model.view.total(), 3);
    assert_eq!(model.view.count(Label::Positive), 1);
    assert_eq!(model.view.count(Label::Negative), 1);

    let numeric = model.latest.iter().find(|r| r.text == "5").unwrap();
    assert_eq!(numeric.label, Label::Neutral);
    assert_eq!(numeric.polarity, 0.0);
    assert_eq!(numeric.date, Some(DateBucket::Unknown));
    // 無法解析的時間排在表格最後
    assert_eq!(model.latest.last().unwrap().text, "5");
}

#[tokio::test]
async fn test_missing_reviews_column_reports_schema_error() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/feedback");
        then.status(200)
            .json_body(serde_json::json!([{"Timestamp": "2024-01-01", "Comments": "great"}]));
    });

    let source = SheetSource::new(server.url("/feedback"), SheetFormat::Json);
    let engine = DashboardEngine::new(source, DashboardSettings::default());

    let (result, cache) = engine.tick(CacheState::empty(), Instant::now()).await;

    api_mock.assert();
    match result {
        Err(DashboardError::Schema { field, available }) => {
            assert_eq!(field, "Reviews");
            assert_eq!(available, vec!["Timestamp", "Comments"]);
        }
        other => panic!("expected schema error, got {:?}", other),
    }
    // 資料本身讀取成功，所以仍會被快取
    assert!(!cache.is_empty());
}

#[tokio::test]
async fn test_unauthorized_sheet_is_authentication_error() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/private");
        then.status(401);
    });

    let source = SheetSource::new(server.url("/private"), SheetFormat::Json);
    let err = source.load().await.unwrap_err();

    api_mock.assert();
    assert!(matches!(
        err,
        DashboardError::Fetch(FetchError::Authentication { status: 401 })
    ));
    assert!(err.is_tick_scoped());
}

#[tokio::test]
async fn test_server_error_keeps_dashboard_alive() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/down");
        then.status(500);
    });

    let source = SheetSource::new(server.url("/down"), SheetFormat::Json);
    let engine = DashboardEngine::new(source, DashboardSettings::default());

    let start = Instant::now();
    let (first, cache) = engine.tick(CacheState::empty(), start).await;
    let (second, cache) = engine.tick(cache, start + Duration::from_secs(10)).await;

    assert!(matches!(
        first,
        Err(DashboardError::Fetch(FetchError::Status { status: 500 }))
    ));
    assert!(second.is_err());
    assert!(cache.is_empty());
    // 失敗不會被快取，每次刷新都重試
    api_mock.assert_hits(2);
}

#[tokio::test]
async fn test_cache_bounds_requests_to_sheet() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/feedback");
        then.status(200).json_body(reference_rows());
    });

    let source = SheetSource::new(server.url("/feedback"), SheetFormat::Json);
    let engine = DashboardEngine::new(source, DashboardSettings::default());

    let start = Instant::now();
    let mut cache = CacheState::empty();
    // 每 10 秒刷新一次，共 60 秒
    for tick in 0..6 {
        let (result, next) = engine
            .tick(cache, start + Duration::from_secs(tick * 10))
            .await;
        assert!(result.is_ok());
        cache = next;
    }
    api_mock.assert_hits(1);

    let (result, _) = engine.tick(cache, start + Duration::from_secs(60)).await;
    assert!(result.is_ok());
    api_mock.assert_hits(2);
}

#[tokio::test]
async fn test_configured_headers_are_sent() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/feedback")
            .header("Authorization", "Bearer sheet-token");
        then.status(200).json_body(reference_rows());
    });

    let headers = [("Authorization".to_string(), "Bearer sheet-token".to_string())]
        .into_iter()
        .collect();
    let source = SheetSource::new(server.url("/feedback"), SheetFormat::Json)
        .with_headers(headers)
        .with_timeout(Some(Duration::from_secs(5)));

    let dataset = source.load().await.unwrap();

    api_mock.assert();
    assert_eq!(dataset.len(), 3);
}

#[tokio::test]
async fn test_unreachable_sheet_is_network_error() {
    // 沒有服務監聽的埠
    let source = SheetSource::new("http://127.0.0.1:9/feedback", SheetFormat::Json)
        .with_timeout(Some(Duration::from_secs(2)));

    let err = source.load().await.unwrap_err();
    assert!(matches!(err, DashboardError::Fetch(FetchError::Network(_))));
    assert!(err.is_tick_scoped());
}
