use actix_web::http::{header, StatusCode};
use actix_web::{test, App};

use quotation_server::quotation::handlers;
use quotation_server::ServerConfig;

const BOUNDARY: &str = "----quotation-test-boundary";

fn multipart_body(fields: &[(&str, &str)]) -> Vec<u8> {
    let mut body = String::new();
    for (name, value) in fields {
        body.push_str(&format!(
            "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
            BOUNDARY, name, value
        ));
    }
    body.push_str(&format!("--{}--\r\n", BOUNDARY));
    body.into_bytes()
}

fn multipart_request(fields: &[(&str, &str)]) -> test::TestRequest {
    test::TestRequest::post()
        .uri("/")
        .insert_header((
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        ))
        .set_payload(multipart_body(fields))
}

fn acme_fields() -> Vec<(&'static str, &'static str)> {
    vec![
        ("company_name", "Acme"),
        ("quotation_number", "QT-1"),
        ("date", "2025-01-01"),
        ("currency", "USD"),
        ("generated_by", "Jane"),
        ("customer_name", "Globex"),
        ("customer_contact", "ops@globex.test | +1-555-0100"),
        ("service_sl[]", "1"),
        ("service_desc[]", "Consulting"),
        ("service_qty[]", "2"),
        ("service_cost[]", "100.00"),
        ("tax_rate", "10"),
    ]
}

macro_rules! app {
    () => {
        test::init_service(App::new().configure(handlers::config(ServerConfig::default()))).await
    };
    ($config:expr) => {
        test::init_service(App::new().configure(handlers::config($config))).await
    };
}

#[actix_web::test]
async fn test_get_returns_form() {
    let app = app!();
    let req = test::TestRequest::get().uri("/").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let content_type = resp.headers().get(header::CONTENT_TYPE).unwrap().to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/html"));
    let body = test::read_body(resp).await;
    let html = std::str::from_utf8(&body).unwrap();
    assert!(html.contains("name=\"company_name\""));
    assert!(html.contains("name=\"service_cost[]\""));
}

#[actix_web::test]
async fn test_multipart_submission_returns_pdf() {
    let app = app!();
    let req = multipart_request(&acme_fields()).to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/pdf"
    );
    let disposition = resp
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.starts_with("attachment"));
    assert!(disposition.contains("quotation_QT-1.pdf"));

    let body = test::read_body(resp).await;
    assert!(body.starts_with(b"%PDF-"));
}

#[actix_web::test]
async fn test_urlencoded_submission_returns_pdf() {
    let app = app!();
    let req = test::TestRequest::post()
        .uri("/")
        .set_form(acme_fields())
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body = test::read_body(resp).await;
    assert!(body.starts_with(b"%PDF-"));
}

#[actix_web::test]
async fn test_missing_company_name_is_bad_request() {
    let app = app!();
    let fields: Vec<_> = acme_fields()
        .into_iter()
        .filter(|(n, _)| *n != "company_name")
        .collect();
    let resp = test::call_service(&app, multipart_request(&fields).to_request()).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = test::read_body(resp).await;
    let text = std::str::from_utf8(&body).unwrap();
    assert!(text.starts_with("Error:"));
    assert!(text.contains("company_name"));
}

#[actix_web::test]
async fn test_mismatched_line_items_is_bad_request() {
    let app = app!();
    let mut fields = acme_fields();
    fields.push(("service_desc[]", "Support"));
    let resp = test::call_service(&app, multipart_request(&fields).to_request()).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = test::read_body(resp).await;
    let text = std::str::from_utf8(&body).unwrap();
    assert!(text.starts_with("Error:"));
    assert!(text.contains("mismatched lengths"));
}

#[actix_web::test]
async fn test_unparseable_values_are_bad_request() {
    let app = app!();
    let fields: Vec<_> = acme_fields()
        .into_iter()
        .map(|(n, v)| if n == "service_qty[]" { (n, "two") } else { (n, v) })
        .collect();
    let req = test::TestRequest::post().uri("/").set_form(fields).to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = test::read_body(resp).await;
    assert!(body.starts_with(b"Error: invalid value 'two'"));
}

#[actix_web::test]
async fn test_path_unsafe_number_in_attachment_name() {
    let app = app!();
    let fields: Vec<_> = acme_fields()
        .into_iter()
        .map(|(n, v)| if n == "quotation_number" { (n, "QT/2025/9") } else { (n, v) })
        .collect();
    let resp = test::call_service(&app, multipart_request(&fields).to_request()).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let disposition = resp
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.contains("quotation_QT_2025_9.pdf"));
}

#[actix_web::test]
async fn test_oversized_field_is_bad_request() {
    let config = ServerConfig {
        max_field_bytes: 16,
        ..ServerConfig::default()
    };
    let app = app!(config);
    let mut fields = acme_fields();
    fields.push(("notes", "this note is definitely longer than sixteen bytes"));
    let resp = test::call_service(&app, multipart_request(&fields).to_request()).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = test::read_body(resp).await;
    let text = std::str::from_utf8(&body).unwrap();
    assert!(text.starts_with("Error:"));
    assert!(text.contains("exceeds the maximum size"));
}

#[actix_web::test]
async fn test_unsupported_content_type_is_bad_request() {
    let app = app!();
    let req = test::TestRequest::post()
        .uri("/")
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_payload("{}")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = test::read_body(resp).await;
    assert!(body.starts_with(b"Error:"));
}

#[actix_web::test]
async fn test_openapi_document_lists_root_path() {
    let app = app!();
    let req = test::TestRequest::get().uri("/api-doc/openapi.json").to_request();
    let doc: serde_json::Value = test::call_and_read_body_json(&app, req).await;

    assert!(doc["paths"]["/"]["get"].is_object());
    assert!(doc["paths"]["/"]["post"].is_object());
}
