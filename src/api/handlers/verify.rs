// src/api/handlers/verify.rs
use actix_web::{web, HttpMessage, HttpRequest, HttpResponse, ResponseError, Result};
use crate::api::AppState;
use crate::errors::PlaygroundError;
use crate::models::{VerificationRequest, VerifyForm};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

pub async fn verify(
    state: web::Data<AppState>,
    req: HttpRequest,
    payload: web::Bytes,
) -> Result<HttpResponse> {
    let form = match decode_form(&req, &payload) {
        Ok(form) => form,
        Err(e) => return Ok(internal_failure(e)),
    };
    let request = VerificationRequest::from(form);

    let response = match state.verifier.verify(&request).await {
        Ok(response) => response,
        Err(e) => return Ok(internal_failure(e)),
    };

    // encode before writing so a failure never produces a partial body
    match response.encode() {
        Ok(body) => Ok(HttpResponse::Ok().content_type("application/json").body(body)),
        Err(e) => Ok(internal_failure(e)),
    }
}

fn decode_form(req: &HttpRequest, payload: &[u8]) -> Result<VerifyForm, PlaygroundError> {
    if !req.content_type().eq_ignore_ascii_case(FORM_CONTENT_TYPE) {
        return Err(PlaygroundError::InvalidRequest(format!(
            "expected {}, got {:?}",
            FORM_CONTENT_TYPE,
            req.content_type()
        )));
    }
    VerifyForm::parse(payload)
}

fn internal_failure(e: PlaygroundError) -> HttpResponse {
    match &e {
        PlaygroundError::InvalidRequest(_) => log::info!("Verification rejected: {}", e),
        _ => log::error!("Verification failed: {}", e),
    }
    e.error_response()
}
