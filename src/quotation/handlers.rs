use actix_multipart::Multipart;
use actix_web::guard::{self, GuardContext};
use actix_web::http::header::{self, ContentDisposition, ContentType, DispositionParam, DispositionType};
use actix_web::{web, HttpResponse, Responder};
use log::{error, info, warn};
use serde::Deserialize;
use utoipa::{OpenApi, ToSchema};

use crate::config::ServerConfig;
use crate::error::QuotationError;
use crate::form::{FormError, FormFields, MultipartParser};
use crate::generator::{GeneratedDocument, Generator, QuotationGenerator};
use crate::quotation::parse_quotation;

const FORM_HTML: &str = include_str!("../../static/quotation_form.html");

/// Field layout of a quotation submission, for the OpenAPI document.
#[derive(Deserialize, ToSchema)]
#[allow(dead_code)]
pub struct QuotationFormSchema {
    company_name: String,
    quotation_number: String,
    /// Calendar date, `YYYY-MM-DD`.
    date: String,
    generated_by: String,
    customer_name: String,
    customer_contact: String,
    /// `USD` (default) or `INR`.
    currency: Option<String>,
    /// GST percentage, defaults to 0.
    tax_rate: Option<String>,
    /// Free text; the first 50 lines are printed, blank lines skipped.
    notes: Option<String>,
    #[serde(rename = "service_sl[]")]
    service_sl: Vec<String>,
    #[serde(rename = "service_desc[]")]
    service_desc: Vec<String>,
    #[serde(rename = "service_qty[]")]
    service_qty: Vec<String>,
    #[serde(rename = "service_cost[]")]
    service_cost: Vec<String>,
}

#[derive(OpenApi)]
#[openapi(
    paths(quotation_form, submit_multipart),
    components(schemas(QuotationFormSchema)),
    tags(
        (name = "Quotation", description = "Quotation form and PDF generation.")
    )
)]
pub struct ApiDoc;

#[utoipa::path(
    get,
    path = "/",
    tag = "Quotation",
    responses(
        (status = 200, description = "HTML quotation form", content_type = "text/html", body = String)
    )
)]
pub async fn quotation_form() -> impl Responder {
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(FORM_HTML)
}

/// POST / with `multipart/form-data`.
#[utoipa::path(
    post,
    path = "/",
    tag = "Quotation",
    request_body(
        content = QuotationFormSchema,
        content_type = "multipart/form-data",
        description = "Quotation fields; application/x-www-form-urlencoded bodies are accepted too"
    ),
    responses(
        (status = 200, description = "Generated quotation PDF", content_type = "application/pdf", body = Vec<u8>),
        (status = 400, description = "Missing, malformed or mismatched fields", content_type = "text/plain", body = String),
        (status = 500, description = "PDF rendering failed", content_type = "text/plain", body = String)
    )
)]
pub async fn submit_multipart(
    multipart: Multipart,
    config: web::Data<ServerConfig>,
) -> Result<HttpResponse, QuotationError> {
    let fields = MultipartParser::parse_form_fields(multipart, config.form_limits())
        .await
        .inspect_err(|e| warn!("Rejected multipart body: {}", e))?;
    respond_with_pdf(fields).await
}

/// POST / with `application/x-www-form-urlencoded`.
pub async fn submit_urlencoded(
    form: web::Form<Vec<(String, String)>>,
) -> Result<HttpResponse, QuotationError> {
    respond_with_pdf(FormFields::from(form.into_inner())).await
}

async fn respond_with_pdf(fields: FormFields) -> Result<HttpResponse, QuotationError> {
    let quotation = parse_quotation(&fields).map_err(|errors| {
        warn!("Rejected quotation with {} validation error(s): {}", errors.len(), errors);
        QuotationError::from(errors)
    })?;

    let line_items = quotation.line_items.len();
    let document = web::block(move || QuotationGenerator::new().generate(&quotation))
        .await
        .map_err(|e| {
            error!("Quotation render task failed: {}", e);
            QuotationError::Blocking
        })?
        .map_err(|e| {
            let error = QuotationError::from(e);
            error!("Failed to generate quotation PDF: {}", error);
            error
        })?;

    info!(
        "Generated quotation {} ({} line item(s), {} page(s), {} bytes)",
        document.trace_id,
        line_items,
        document.page_count,
        document.pdf.len()
    );

    Ok(pdf_response(document))
}

fn pdf_response(document: GeneratedDocument) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("application/pdf")
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(document.filename)],
        })
        .body(document.pdf)
}

pub async fn openapi_json() -> impl Responder {
    HttpResponse::Ok().json(ApiDoc::openapi())
}

fn is_multipart(ctx: &GuardContext<'_>) -> bool {
    ctx.head()
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.trim_start().to_ascii_lowercase().starts_with("multipart/form-data"))
        .unwrap_or(false)
}

fn form_config(max_form_bytes: usize) -> web::FormConfig {
    web::FormConfig::default()
        .limit(max_form_bytes)
        .error_handler(|err, _req| {
            warn!("Rejected form body: {}", err);
            QuotationError::from(FormError::Body(err.to_string())).into()
        })
}

/// Register the quotation routes and their request settings.
pub fn config(server: ServerConfig) -> impl Fn(&mut web::ServiceConfig) {
    move |cfg: &mut web::ServiceConfig| {
        cfg.app_data(web::Data::new(server.clone()))
            .app_data(form_config(server.max_form_bytes))
            .service(
                web::resource("/")
                    .route(web::get().to(quotation_form))
                    .route(web::post().guard(guard::fn_guard(is_multipart)).to(submit_multipart))
                    .route(web::post().to(submit_urlencoded)),
            )
            .service(web::resource("/api-doc/openapi.json").route(web::get().to(openapi_json)));
    }
}
