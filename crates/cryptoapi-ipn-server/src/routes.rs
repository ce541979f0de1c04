use actix_web::{get, post, web, HttpRequest, HttpResponse};
use ipn::{classify, fan_out, Notification, Outcome};
use serde::Deserialize;

use crate::error::ApiError;
use crate::metrics;
use crate::state::AppState;

/// Register every route.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(ping)
        .service(health)
        .service(metrics_endpoint)
        .service(ipn_callback)
        .service(give);
}

#[get("/ping")]
pub async fn ping() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "message": "pong" }))
}

#[get("/health")]
pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "service": "ipn-server",
        "version": env!("CARGO_PKG_VERSION"),
        "providers": state.providers.len(),
    }))
}

#[get("/metrics")]
pub async fn metrics_endpoint(req: HttpRequest, state: web::Data<AppState>) -> HttpResponse {
    match &state.metrics_token {
        Some(token) => {
            let authorized = req
                .headers()
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.strip_prefix("Bearer "))
                .map(|t| ipn::security::constant_time_eq(t.as_bytes(), token))
                .unwrap_or(false);

            if !authorized {
                return HttpResponse::Unauthorized().json(serde_json::json!({
                    "error": "unauthorized",
                    "message": "Valid Bearer token required for /metrics"
                }));
            }
        }
        None => {
            // No token configured: protected unless explicitly opted out.
            if !state.public_metrics {
                return HttpResponse::Forbidden().json(serde_json::json!({
                    "error": "forbidden",
                    "message": "Set METRICS_TOKEN or IPN_PUBLIC_METRICS=true to access /metrics"
                }));
            }
        }
    }
    HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4")
        .body(metrics::metrics_output())
}

/// Gateway callback.
///
/// Parsed from raw bytes so a malformed body gets the same `{"error": ..}`
/// shape as every other rejection.
#[post("/ipn")]
pub async fn ipn_callback(
    state: web::Data<AppState>,
    body: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    let notification = Notification::from_json(&body).map_err(|e| {
        metrics::NOTIFICATIONS_TOTAL
            .with_label_values(&["invalid_input"])
            .inc();
        tracing::warn!(error = %e, "rejected malformed notification");
        ApiError::from(e)
    })?;

    let outcome = match classify(&notification, state.scheme.as_ref()) {
        Ok(outcome) => outcome,
        Err(e) => {
            let label = if e.is_client_error() {
                "invalid_input"
            } else {
                "sign_wrong"
            };
            metrics::NOTIFICATIONS_TOTAL.with_label_values(&[label]).inc();
            tracing::warn!(
                txid = %notification.txid,
                chain = %notification.chain,
                error = %e,
                "notification rejected"
            );
            return Err(e.into());
        }
    };

    metrics::NOTIFICATIONS_TOTAL
        .with_label_values(&[outcome.label()])
        .inc();

    match &outcome {
        Outcome::AwaitingConfirmation(_) | Outcome::UnsupportedVersion(_) => {
            tracing::debug!(txid = %notification.txid, reply = %outcome.message(), "notification acknowledged");
            Ok(HttpResponse::Ok().json(serde_json::json!({ "message": outcome.message() })))
        }
        Outcome::Verified { deposit } => {
            if let Some(deposit) = deposit {
                metrics::DEPOSITS_TOTAL.inc();
                tracing::info!(
                    user_id = deposit.user_id,
                    amount = %deposit.amount,
                    currency = %deposit.currency,
                    txid = %deposit.txid,
                    "deposit confirmed"
                );
            } else {
                tracing::info!(
                    txid = %notification.txid,
                    kind = %notification.kind,
                    "notification verified"
                );
            }
            Ok(HttpResponse::Ok().json(serde_json::json!({
                "message": outcome.message(),
                "data": notification,
            })))
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct GiveQuery {
    pub label: Option<String>,
}

/// One deposit address per provider that answered this round.
#[get("/give")]
pub async fn give(
    state: web::Data<AppState>,
    query: web::Query<GiveQuery>,
) -> Result<HttpResponse, ApiError> {
    let label = match query.label.as_deref() {
        Some("") => return Err(ApiError::BadRequest("label must not be empty".to_string())),
        Some(label) => label,
        None => state.default_label.as_str(),
    };

    let timer = metrics::GIVE_DURATION.start_timer();
    let wallets = fan_out(&state.addresses, &state.providers, label).await;
    timer.observe_duration();

    tracing::info!(
        requested = state.providers.len(),
        received = wallets.len(),
        "deposit addresses issued"
    );

    Ok(HttpResponse::Ok().json(serde_json::json!({ "wallets": wallets })))
}
