use actix_web::{test, web, App};
use ipn::{LegacySignature, Notification, SignatureScheme};
use wiremock::{
    matchers::{method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

use ipn_server::config::ServerConfig;
use ipn_server::routes;
use ipn_server::state::AppState;

const API_KEY: &str = "test-api-key";

/// Build state whose address fetcher points at `api_base`.
fn make_state(api_base: &str, extra: &[(&str, &str)]) -> web::Data<AppState> {
    let mut vars: Vec<(String, String)> = vec![
        ("IPN_API_KEY".into(), API_KEY.into()),
        ("IPN_API_BASE".into(), api_base.into()),
        ("IPN_FETCH_TIMEOUT_SECS".into(), "2".into()),
    ];
    vars.extend(extra.iter().map(|(k, v)| (k.to_string(), v.to_string())));
    let config = ServerConfig::from_vars(|name| {
        vars.iter()
            .rev()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.clone())
    })
    .unwrap();
    web::Data::new(AppState::from_config(&config).unwrap())
}

/// A deposit notification signed with the test key, as the gateway sends it.
fn signed_deposit() -> serde_json::Value {
    let mut body = serde_json::json!({
        "cryptocurrencyapi.net": 3,
        "chain": "tron",
        "currency": "USDT",
        "type": "in",
        "date": 1_700_000_000,
        "from": "TFromAddress",
        "to": "TToAddress",
        "token": "USDT",
        "tokenContract": "TR7NHqjeKQxGTCi8q8ZY4pL8otSzgjLj6t",
        "amount": "1.5",
        "fee": "0",
        "txid": "e3b0c44298fc1c149afbf4c8996fb924",
        "pos": 0,
        "confirmation": 5,
        "label": "42"
    });
    let notification: Notification = serde_json::from_value(body.clone()).unwrap();
    let sign = LegacySignature::new(API_KEY).sign(&notification.canonical_string());
    body["sign"] = serde_json::json!(sign);
    body
}

fn give_body(address: &str) -> serde_json::Value {
    serde_json::json!({
        "result": {
            "address": address,
            "publicKey": "PUBLIC-KEY-MATERIAL",
            "privateKey": "PRIVATE-KEY-MATERIAL",
            "QR": format!("qr:{address}")
        }
    })
}

async fn mount_give(server: &MockServer, coin: &str, status: u16) {
    let template = if status == 200 {
        ResponseTemplate::new(200).set_body_json(give_body(&format!("{coin}-address")))
    } else {
        ResponseTemplate::new(status)
    };
    Mock::given(method("POST"))
        .and(path(format!("/{coin}/.give")))
        .respond_with(template)
        .mount(server)
        .await;
}

macro_rules! post_ipn {
    ($state:expr, $body:expr) => {{
        let app = test::init_service(
            App::new()
                .app_data($state)
                .app_data(web::PayloadConfig::new(65_536))
                .service(routes::ipn_callback),
        )
        .await;
        let req = test::TestRequest::post()
            .uri("/ipn")
            .insert_header(("Content-Type", "application/json"))
            .set_payload($body)
            .to_request();
        test::call_service(&app, req).await
    }};
}

#[actix_rt::test]
async fn test_ping_returns_pong() {
    let state = make_state("http://127.0.0.1:1", &[]);
    let app = test::init_service(App::new().app_data(state).service(routes::ping)).await;

    let req = test::TestRequest::get().uri("/ping").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "pong");
}

#[actix_rt::test]
async fn test_health_reports_provider_count() {
    let state = make_state("http://127.0.0.1:1", &[]);
    let app = test::init_service(App::new().app_data(state).service(routes::health)).await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["providers"], 4);
}

#[actix_rt::test]
async fn test_pending_confirmation_skips_signature() {
    let state = make_state("http://127.0.0.1:1", &[]);
    let mut body = signed_deposit();
    body["confirmation"] = serde_json::json!(0);
    body["sign"] = serde_json::json!("garbage");

    let resp = post_ipn!(state, body.to_string());

    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body, serde_json::json!({ "message": "confirmation: 0" }));
}

#[actix_rt::test]
async fn test_old_protocol_version_is_informational() {
    let state = make_state("http://127.0.0.1:1", &[]);
    let mut body = signed_deposit();
    body["cryptocurrencyapi.net"] = serde_json::json!(2);
    body["sign"] = serde_json::json!("garbage");

    let resp = post_ipn!(state, body.to_string());

    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(
        body,
        serde_json::json!({ "message": "cryptocurrencyapi.net: 2" })
    );
}

#[actix_rt::test]
async fn test_valid_deposit_is_echoed() {
    let state = make_state("http://127.0.0.1:1", &[]);
    let sent = signed_deposit();

    let resp = post_ipn!(state, sent.to_string());

    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "OK");
    assert_eq!(body["data"], sent);
}

#[actix_rt::test]
async fn test_native_coin_with_null_token_fields_is_accepted() {
    let state = make_state("http://127.0.0.1:1", &[]);
    let mut body = signed_deposit();
    body["chain"] = serde_json::json!("btc");
    body["currency"] = serde_json::json!("BTC");
    body["token"] = serde_json::Value::Null;
    body["tokenContract"] = serde_json::Value::Null;
    // The gateway signs null fields as empty text.
    let notification: Notification = serde_json::from_value(body.clone()).unwrap();
    assert!(notification.token.is_empty());
    body["sign"] = serde_json::json!(LegacySignature::new(API_KEY).sign(&notification.canonical_string()));

    let resp = post_ipn!(state, body.to_string());

    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "OK");
    assert_eq!(body["data"]["token"], "");
    assert_eq!(body["data"]["tokenContract"], "");
}

#[actix_rt::test]
async fn test_wire_field_order_does_not_matter() {
    let state = make_state("http://127.0.0.1:1", &[]);
    let sent = signed_deposit();
    // Re-emit the object with its keys reversed.
    let reversed: String = {
        let obj = sent.as_object().unwrap();
        let parts: Vec<String> = obj
            .iter()
            .rev()
            .map(|(k, v)| format!("{}:{}", serde_json::json!(k), v))
            .collect();
        format!("{{{}}}", parts.join(","))
    };

    let resp = post_ipn!(state, reversed);
    assert_eq!(resp.status(), 200);
}

#[actix_rt::test]
async fn test_tampered_amount_is_rejected() {
    let state = make_state("http://127.0.0.1:1", &[]);
    let mut body = signed_deposit();
    body["amount"] = serde_json::json!("2.5");

    let resp = post_ipn!(state, body.to_string());

    assert_eq!(resp.status(), 401);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body, serde_json::json!({ "error": "sign wrong" }));
}

#[actix_rt::test]
async fn test_signature_under_other_secret_is_rejected() {
    let state = make_state("http://127.0.0.1:1", &[("IPN_SECRET", "rotated-secret")]);

    let resp = post_ipn!(state, signed_deposit().to_string());

    assert_eq!(resp.status(), 401);
}

#[actix_rt::test]
async fn test_malformed_body_is_bad_request() {
    let state = make_state("http://127.0.0.1:1", &[]);

    let resp = post_ipn!(state, "not valid json at all");

    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert!(body["error"].is_string());
}

#[actix_rt::test]
async fn test_wrong_field_type_is_bad_request() {
    let state = make_state("http://127.0.0.1:1", &[]);
    let mut body = signed_deposit();
    body["confirmation"] = serde_json::json!("five");

    let resp = post_ipn!(state, body.to_string());

    assert_eq!(resp.status(), 400);
}

#[actix_rt::test]
async fn test_unparsable_label_is_bad_request_not_unauthorized() {
    let state = make_state("http://127.0.0.1:1", &[]);
    let mut body = signed_deposit();
    body["label"] = serde_json::json!("user_id");
    let notification: Notification = serde_json::from_value(body.clone()).unwrap();
    body["sign"] = serde_json::json!(LegacySignature::new(API_KEY).sign(&notification.canonical_string()));

    let resp = post_ipn!(state, body.to_string());

    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert!(body["error"].as_str().unwrap().contains("label"));
}

#[actix_rt::test]
async fn test_give_drops_failed_provider() {
    let server = MockServer::start().await;
    mount_give(&server, "trx", 200).await;
    mount_give(&server, "btc", 500).await;
    mount_give(&server, "eth", 200).await;
    mount_give(&server, "ltc", 200).await;

    let state = make_state(&server.uri(), &[]);
    let app = test::init_service(App::new().app_data(state).service(routes::give)).await;

    let req = test::TestRequest::get().uri("/give").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 200);
    let raw = test::read_body(resp).await;
    let text = std::str::from_utf8(&raw).unwrap();
    assert!(!text.contains("PRIVATE-KEY-MATERIAL"));
    assert!(!text.contains("PUBLIC-KEY-MATERIAL"));

    let body: serde_json::Value = serde_json::from_slice(&raw).unwrap();
    let wallets = body["wallets"].as_array().unwrap();
    assert_eq!(wallets.len(), 3);
    for wallet in wallets {
        let obj = wallet.as_object().unwrap();
        let mut keys: Vec<_> = obj.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, ["address", "name", "qrcode"]);
        assert_ne!(wallet["name"], "Bitcoin");
    }
}

#[actix_rt::test]
async fn test_give_total_failure_is_empty_list() {
    let server = MockServer::start().await;
    for coin in ["trx", "btc", "eth", "ltc"] {
        mount_give(&server, coin, 500).await;
    }

    let state = make_state(&server.uri(), &[]);
    let app = test::init_service(App::new().app_data(state).service(routes::give)).await;

    let req = test::TestRequest::get().uri("/give").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body, serde_json::json!({ "wallets": [] }));
}

#[actix_rt::test]
async fn test_give_unreachable_gateway_is_empty_list() {
    // Nothing listens on port 1.
    let state = make_state("http://127.0.0.1:1", &[]);
    let app = test::init_service(App::new().app_data(state).service(routes::give)).await;

    let req = test::TestRequest::get().uri("/give").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["wallets"], serde_json::json!([]));
}

#[actix_rt::test]
async fn test_give_forwards_label() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/eth/.give"))
        .and(query_param("label", "order-77"))
        .and(query_param("key", API_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(give_body("0xabc")))
        .expect(1)
        .mount(&server)
        .await;

    let state = make_state(
        &server.uri(),
        &[(
            "IPN_PROVIDERS",
            "Ethereum=/eth/.give?key={key}&label={label}&period={period}",
        )],
    );
    let app = test::init_service(App::new().app_data(state).service(routes::give)).await;

    let req = test::TestRequest::get()
        .uri("/give?label=order-77")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(
        body["wallets"],
        serde_json::json!([{ "name": "Ethereum", "qrcode": "qr:0xabc", "address": "0xabc" }])
    );
}

#[actix_rt::test]
async fn test_give_rejects_empty_label() {
    let state = make_state("http://127.0.0.1:1", &[]);
    let app = test::init_service(App::new().app_data(state).service(routes::give)).await;

    let req = test::TestRequest::get().uri("/give?label=").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 400);
}

#[actix_rt::test]
async fn test_metrics_requires_token() {
    let state = make_state("http://127.0.0.1:1", &[("METRICS_TOKEN", "metrics-token-123")]);
    let app =
        test::init_service(App::new().app_data(state).service(routes::metrics_endpoint)).await;

    let req = test::TestRequest::get().uri("/metrics").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);

    // The API key is not the metrics token
    let req = test::TestRequest::get()
        .uri("/metrics")
        .insert_header(("Authorization", format!("Bearer {API_KEY}")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);

    let req = test::TestRequest::get()
        .uri("/metrics")
        .insert_header(("Authorization", "Bearer metrics-token-123"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
}

#[actix_rt::test]
async fn test_metrics_forbidden_when_no_token() {
    let state = make_state("http://127.0.0.1:1", &[]);
    let app =
        test::init_service(App::new().app_data(state).service(routes::metrics_endpoint)).await;

    let req = test::TestRequest::get().uri("/metrics").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 403);
}

#[actix_rt::test]
async fn test_metrics_public_opt_in() {
    let state = make_state("http://127.0.0.1:1", &[("IPN_PUBLIC_METRICS", "true")]);
    let app =
        test::init_service(App::new().app_data(state).service(routes::metrics_endpoint)).await;

    let req = test::TestRequest::get().uri("/metrics").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
}
