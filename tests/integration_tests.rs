//! Integration tests for the VAT extraction HTTP surface

use std::env;
use std::io::Cursor;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use calamine::{Data, Reader, Xlsx};
use serde_json::Value;
use tower::ServiceExt;
use vat_extractor::{
    config::{Config, LogFormat, LoggingConfig},
    create_router,
    models::{HealthResponse, VAT_FIELDS},
    services::pseudo_vat_number,
};

const BOUNDARY: &str = "vat-extractor-test-boundary";
const XLSX: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

#[derive(Default)]
struct MultipartBody {
    buf: Vec<u8>,
}

impl MultipartBody {
    fn file(mut self, field: &str, filename: &str, content_type: &str, data: &[u8]) -> Self {
        self.buf.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        self.buf.extend_from_slice(data);
        self.buf.extend_from_slice(b"\r\n");
        self
    }

    fn text(mut self, field: &str, value: &str) -> Self {
        self.buf.extend_from_slice(
            format!("--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"\r\n\r\n{value}\r\n")
                .as_bytes(),
        );
        self
    }

    fn finish(mut self) -> Vec<u8> {
        self.buf.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        self.buf
    }
}

fn app() -> Router {
    create_router(Config::default())
}

fn post_multipart(uri: &str, body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.unwrap()
}

async fn body_bytes(response: Response) -> Vec<u8> {
    to_bytes(response.into_body(), usize::MAX).await.unwrap().to_vec()
}

async fn body_json(response: Response) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

fn header_str<'a>(response: &'a Response, name: header::HeaderName) -> &'a str {
    response.headers().get(name).unwrap().to_str().unwrap()
}

fn read_sheet(bytes: &[u8], sheet: &str) -> Vec<Vec<Data>> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes.to_vec())).unwrap();
    let range = workbook.worksheet_range(sheet).unwrap();
    range.rows().map(|row| row.to_vec()).collect()
}

#[tokio::test]
async fn test_root_reports_liveness() {
    let response = send(app(), get("/")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Your VAT extraction API is running!");
}

#[tokio::test]
async fn test_health_timestamp_is_non_decreasing() {
    let first: HealthResponse =
        serde_json::from_slice(&body_bytes(send(app(), get("/health")).await).await).unwrap();
    let second: HealthResponse =
        serde_json::from_slice(&body_bytes(send(app(), get("/health")).await).await).unwrap();

    assert_eq!(first.status, "healthy");
    assert_eq!(first.version, env!("CARGO_PKG_VERSION"));
    assert!(second.timestamp >= first.timestamp);
}

#[tokio::test]
async fn test_ready_and_fields() {
    let response = send(app(), get("/ready")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let fields = body_json(send(app(), get("/fields")).await).await;
    let fields = fields.as_array().unwrap();
    assert_eq!(fields.len(), VAT_FIELDS.len());
    assert_eq!(fields[0]["code"], "001");
    assert_eq!(fields[0]["kind"], "identifier");
}

#[tokio::test]
async fn test_example_is_constant() {
    let first = body_bytes(send(app(), get("/example")).await).await;
    let second = body_bytes(send(app(), get("/example")).await).await;
    assert_eq!(first, second);

    let body: Value = serde_json::from_slice(&first).unwrap();
    assert_eq!(body["vat_return"]["vat_number"], "LU12345678");
    assert_eq!(body["vat_return"]["net_vat"], 13500.0);
    assert_eq!(body["vat_return"]["extracted_fields"], VAT_FIELDS.len());
    assert_eq!(body["vat_return"]["confidence"], 0.95);
}

#[tokio::test]
async fn test_example_excel_is_constant() {
    let first = send(app(), get("/example-excel")).await;
    assert_eq!(first.status(), StatusCode::OK);
    assert_eq!(header_str(&first, header::CONTENT_TYPE), XLSX);
    let disposition = header_str(&first, header::CONTENT_DISPOSITION).to_string();
    assert!(disposition.starts_with("attachment; filename=\"vat_example_"));
    assert!(disposition.ends_with(".xlsx\""));

    let first = body_bytes(first).await;
    let second = body_bytes(send(app(), get("/example-excel")).await).await;

    assert_eq!(read_sheet(&first, "VAT Return"), read_sheet(&second, "VAT Return"));
    assert_eq!(read_sheet(&first, "Field Codes"), read_sheet(&second, "Field Codes"));
    assert_eq!(read_sheet(&first, "VAT Return").len(), 2);
}

#[tokio::test]
async fn test_extract_json_for_any_file() {
    for (name, content_type, data) in [
        ("return.pdf", "application/pdf", b"%PDF-1.4 garbage".as_slice()),
        ("photo.png", "image/png", b"\x89PNG\r\n".as_slice()),
        ("empty.txt", "text/plain", b"".as_slice()),
    ] {
        let body = MultipartBody::default().file("file", name, content_type, data).finish();
        let response = send(app(), post_multipart("/extract", body)).await;
        assert_eq!(response.status(), StatusCode::OK, "{}", name);

        let json = body_json(response).await;
        assert_eq!(json["filename"], name);
        assert_eq!(json["size_bytes"], data.len());
        assert_eq!(json["content_type"], content_type);
        assert!(json["timestamp"].is_string());

        let extracted = json["extracted_data"].as_object().unwrap();
        for field in VAT_FIELDS {
            assert!(extracted.contains_key(field.key), "missing {}", field.key);
        }
        assert!(extracted.contains_key("extracted_at"));
        assert_eq!(extracted["vat_number"], "LU12345678");
        assert_eq!(extracted["total_sales"], 150000.0);
    }
}

#[tokio::test]
async fn test_extract_excel_has_single_row_matching_json() {
    let data = b"%PDF-1.7 content";
    let json = body_json(
        send(
            app(),
            post_multipart(
                "/extract",
                MultipartBody::default().file("file", "q3.pdf", "application/pdf", data).finish(),
            ),
        )
        .await,
    )
    .await;

    let response = send(
        app(),
        post_multipart(
            "/extract?output_format=excel",
            MultipartBody::default().file("file", "q3.pdf", "application/pdf", data).finish(),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header_str(&response, header::CONTENT_TYPE), XLSX);
    assert!(header_str(&response, header::CONTENT_DISPOSITION)
        .starts_with("attachment; filename=\"vat_extraction_"));

    let rows = read_sheet(&body_bytes(response).await, "VAT Return");
    assert_eq!(rows.len(), 2, "header plus exactly one data row");

    let headers: Vec<String> = rows[0].iter().map(|c| c.to_string()).collect();
    let extracted = &json["extracted_data"];
    for field in VAT_FIELDS {
        let col = headers.iter().position(|h| h == field.key).unwrap();
        let cell = &rows[1][col];
        match cell {
            Data::Float(n) => assert_eq!(extracted[field.key].as_f64().unwrap(), *n),
            Data::String(s) => assert_eq!(extracted[field.key].as_str().unwrap(), s),
            other => panic!("unexpected cell {:?} for {}", other, field.key),
        }
    }
    assert_eq!(rows[1][0], Data::String("q3.pdf".to_string()));
}

#[tokio::test]
async fn test_extract_format_from_form_field() {
    let body = MultipartBody::default()
        .text("output_format", "csv")
        .file("file", "q3.pdf", "application/pdf", b"%PDF")
        .finish();
    let response = send(app(), post_multipart("/extract?output_format=json", body)).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header_str(&response, header::CONTENT_TYPE), "text/csv; charset=utf-8");
    let text = String::from_utf8(body_bytes(response).await).unwrap();
    assert_eq!(text.lines().count(), 2);
    assert!(text.lines().nth(1).unwrap().starts_with("q3.pdf,LU12345678,"));
}

#[tokio::test]
async fn test_extract_rejects_unknown_format() {
    let body = MultipartBody::default().file("file", "a.pdf", "application/pdf", b"x").finish();
    let response = send(app(), post_multipart("/extract?output_format=docx", body)).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["error"]["code"], "UNSUPPORTED_FORMAT");
}

#[tokio::test]
async fn test_extract_requires_file_part() {
    let body = MultipartBody::default().text("comment", "no file here").finish();
    let response = send(app(), post_multipart("/extract", body)).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "MISSING_FILE");
    assert!(json["error"]["request_id"].is_string());
}

#[tokio::test]
async fn test_extract_rejects_body_over_limit() {
    let config = Config {
        max_file_size_mb: 1,
        ..Config::default()
    };
    let data = vec![b'a'; 2 * 1024 * 1024];
    let body = MultipartBody::default().file("file", "big.pdf", "application/pdf", &data).finish();
    let response = send(create_router(config), post_multipart("/extract", body)).await;

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "FILE_TOO_LARGE");
}

#[tokio::test]
async fn test_batch_returns_one_row_per_file_in_order() {
    let names = ["march.pdf", "january.pdf", "notes.txt", "february.pdf"];
    let body = names
        .iter()
        .fold(MultipartBody::default(), |body, name| {
            body.file("files", name, "application/octet-stream", name.as_bytes())
        })
        .finish();
    let response = send(app(), post_multipart("/extract-batch", body)).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header_str(&response, header::CONTENT_TYPE), XLSX);
    assert!(header_str(&response, header::CONTENT_DISPOSITION)
        .starts_with("attachment; filename=\"vat_batch_extraction_"));

    let rows = read_sheet(&body_bytes(response).await, "VAT Returns");
    assert_eq!(rows.len(), names.len() + 1);
    for (row, name) in rows[1..].iter().zip(names) {
        assert_eq!(row[0], Data::String(name.to_string()));
        assert_eq!(row[1], Data::String(pseudo_vat_number(name)));
        assert_eq!(row[2..row.len() - 1], rows[1][2..row.len() - 1]);
    }
}

#[tokio::test]
async fn test_batch_json_and_missing_files() {
    let body = MultipartBody::default()
        .file("files", "a.pdf", "application/pdf", b"1")
        .file("file", "b.pdf", "application/pdf", b"2")
        .finish();
    let response = send(app(), post_multipart("/extract-batch?output_format=json", body)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["count"], 2);
    assert_eq!(json["results"][1]["document"]["filename"], "b.pdf");

    let empty = MultipartBody::default().text("output_format", "excel").finish();
    let response = send(app(), post_multipart("/extract-batch", empty)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"]["code"], "MISSING_FILE");
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let request = Request::builder()
        .uri("/health")
        .header("x-request-id", "trace-me-123")
        .body(Body::empty())
        .unwrap();
    let response = send(app(), request).await;
    assert_eq!(header_str(&response, header::HeaderName::from_static("x-request-id")), "trace-me-123");

    let response = send(app(), get("/")).await;
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn test_config_loading() {
    env::remove_var("PORT");
    env::set_var("SERVER_HOST", "127.0.0.1");
    env::set_var("SERVER_PORT", "9090");
    env::set_var("MAX_FILE_SIZE_MB", "5");
    env::set_var("LOG_FORMAT", "json");

    let config = Config::from_env().unwrap();
    assert_eq!(config.server_host, "127.0.0.1");
    assert_eq!(config.server_port, 9090);
    assert_eq!(config.max_file_size_mb, 5);
    assert_eq!(config.log_format, LogFormat::Json);

    env::set_var("MAX_FILE_SIZE_MB", "lots");
    let config = Config::from_env().unwrap();
    assert_eq!(config.max_file_size_mb, 25);

    env::set_var("MAX_FILE_SIZE_MB", "0");
    assert!(Config::from_env().is_err());
    let err = Config::load().unwrap_err();
    assert_eq!(err.error_code(), "CONFIG_ERROR");
    assert!(err.to_string().contains("MAX_FILE_SIZE_MB"));

    // Logging settings are readable before any subscriber exists and never fail.
    env::set_var("LOG_FORMAT", "yaml");
    env::set_var("LOG_LEVEL", "vat_extractor=info");
    let logging = LoggingConfig::from_env();
    assert_eq!(logging.format, LogFormat::Plain);
    assert_eq!(logging.level, "vat_extractor=info");
    env::set_var("LOG_FORMAT", "pretty");
    assert_eq!(LoggingConfig::from_env().format, LogFormat::Pretty);
    env::remove_var("LOG_LEVEL");

    env::remove_var("SERVER_HOST");
    env::remove_var("SERVER_PORT");
    env::remove_var("MAX_FILE_SIZE_MB");
    env::remove_var("LOG_FORMAT");
}
