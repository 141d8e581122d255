//! HTTP surface.
//!
//! A single resource at `/`:
//!
//! - `GET|POST /?email=<addr>` answers `200` with the JSON [`ValidationResult`]
//!   once validation completes.
//! - `POST /?email=<addr>&callback=<url>` answers `201` at once and posts the
//!   result to `<url>` when it is ready.
//! - A missing or empty `email` is a `400` with an empty body.
//!
//! [`ValidationResult`]: crate::validation::ValidationResult

use actix_web::http::{Method, header};
use actix_web::middleware::DefaultHeaders;
use actix_web::{HttpRequest, HttpResponse, web};
use serde::Deserialize;

use crate::notify::{CallbackNotifier, parse_callback};
use crate::validation::{ValidationRequest, Validator};

const ALLOWED_METHODS: &str = "GET, POST, OPTIONS";

/// Shared per-server state: the pipeline plus the identities it announces.
#[derive(Clone)]
pub struct AppState {
    validator: Validator,
    notifier: CallbackNotifier,
    hostname: String,
    sender: String,
}

impl AppState {
    pub fn new(
        validator: Validator,
        notifier: CallbackNotifier,
        hostname: impl Into<String>,
        sender: impl Into<String>,
    ) -> Self {
        Self {
            validator,
            notifier,
            hostname: hostname.into(),
            sender: sender.into(),
        }
    }

    fn request(&self, email: &str) -> ValidationRequest {
        ValidationRequest::new(email, self.hostname.as_str(), self.sender.as_str())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ValidateQuery {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub callback: Option<String>,
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/")
            .route(web::get().to(validate_email))
            .route(web::post().to(validate_email))
            .route(web::method(Method::OPTIONS).to(preflight)),
    );
}

/// Lets browsers on any origin call the service.
pub fn cors_headers() -> DefaultHeaders {
    DefaultHeaders::new().add((header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"))
}

async fn validate_email(
    req: HttpRequest,
    state: web::Data<AppState>,
    query: web::Query<ValidateQuery>,
) -> Result<HttpResponse, actix_web::Error> {
    let query = query.into_inner();
    let Some(email) = query.email.filter(|email| !email.is_empty()) else {
        return Ok(HttpResponse::BadRequest().finish());
    };
    let request = state.request(&email);

    if let Some(callback) = query.callback.filter(|callback| !callback.is_empty()) {
        if *req.method() != Method::POST {
            return Ok(HttpResponse::MethodNotAllowed()
                .insert_header((header::ALLOW, "POST"))
                .finish());
        }
        let url = match parse_callback(&callback) {
            Ok(url) => url,
            Err(err) => {
                tracing::debug!(email = %email, error = %err, "rejected callback");
                return Ok(HttpResponse::BadRequest().finish());
            }
        };
        let _task = state
            .notifier
            .dispatch(state.validator.clone(), request, url);
        return Ok(HttpResponse::Created().finish());
    }

    let validator = state.validator.clone();
    let result = web::block(move || validator.validate(&request))
        .await
        .map_err(|err| {
            actix_web::error::ErrorInternalServerError(format!("validation task failed: {err}"))
        })?;
    Ok(HttpResponse::Ok().json(result))
}

async fn preflight() -> HttpResponse {
    HttpResponse::NoContent()
        .insert_header((header::ACCESS_CONTROL_ALLOW_METHODS, ALLOWED_METHODS))
        .insert_header((header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type"))
        .finish()
}
