// src/api/handlers/compile.rs
use actix_web::{http::StatusCode, http::header, web, HttpRequest, HttpResponse, Result};
use crate::api::AppState;
use crate::errors::PlaygroundError;
use serde_json::json;

/// Forwards a compile request to the Go playground and relays its answer.
pub async fn compile(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Bytes,
) -> Result<HttpResponse> {
    let url = format!("{}/compile", state.config.playground_url.trim_end_matches('/'));
    let content_type = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/x-www-form-urlencoded")
        .to_string();

    match forward(&state.client, &url, content_type, body.to_vec()).await {
        Ok((status, content_type, bytes)) => {
            let status = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
            Ok(HttpResponse::build(status).content_type(content_type).body(bytes))
        }
        Err(e) => {
            log::error!("Compile proxy to {} failed: {}", url, e);
            Ok(HttpResponse::BadGateway().json(json!({"error": "playground unavailable"})))
        }
    }
}

async fn forward(
    client: &reqwest::Client,
    url: &str,
    content_type: String,
    body: Vec<u8>,
) -> Result<(u16, String, Vec<u8>), PlaygroundError> {
    let resp = client
        .post(url)
        .header(reqwest::header::CONTENT_TYPE, content_type)
        .body(body)
        .send()
        .await?;

    let status = resp.status().as_u16();
    let content_type = resp
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/json")
        .to_string();
    let bytes = resp.bytes().await?;

    Ok((status, content_type, bytes.to_vec()))
}
