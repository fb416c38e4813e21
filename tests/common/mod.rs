//! Shared harness for HTTP integration tests.
//!
//! Builds the full application router over in-memory adapters, a fixed
//! clock and the mock session validator.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use reqwest::Url;
use secrecy::SecretString;
use serde_json::Value;
use tower::ServiceExt;

use prompt_market::adapters::http::payments::DEFAULT_SIGNATURE_HEADER;
use prompt_market::adapters::http::{
    app_router, AuthState, PaymentsAppState, RouterSettings, UsageAppState,
};
use prompt_market::adapters::{
    FixedClock, HostedCheckoutLink, InMemoryEntitlementStore, InMemoryUsageCounterStore,
    MockSessionValidator,
};
use prompt_market::application::handlers::{
    ApplyPaymentHandler, CheckAndConsumeHandler, CreateCheckoutSessionHandler, GetMyPlanHandler,
    HandlePaymentWebhookHandler, ProvisionEntitlementCommand, ProvisionEntitlementHandler,
    SweepExpiredHandler,
};
use prompt_market::application::RetryPolicy;
use prompt_market::domain::entitlement::{EntitlementRecord, FreeQuota, PlanCatalog};
use prompt_market::domain::foundation::{Email, PrincipalId, Timestamp};
use prompt_market::domain::payment::SignatureVerifier;
use prompt_market::ports::{Clock, EntitlementStore};

pub const SECRET: &str = "whsec_integration";
pub const PERIODIC_PRODUCT: &str = "prod_yearly";
pub const PERPETUAL_PRODUCT: &str = "prod_lifetime";
pub const CHECKOUT_BASE: &str = "https://pay.example.com/checkout";

/// Token for `alice`, whose email is `alice@test.example.com`.
pub const ALICE_TOKEN: &str = "token-alice";
pub const ALICE: &str = "alice";
pub const ALICE_EMAIL: &str = "alice@test.example.com";

/// Token for `bob`, authenticated but never provisioned.
pub const BOB_TOKEN: &str = "token-bob";

pub struct TestApp {
    pub router: Router,
    pub store: Arc<InMemoryEntitlementStore>,
    pub clock: Arc<FixedClock>,
    pub sweeper: SweepExpiredHandler,
    provision: ProvisionEntitlementHandler,
}

pub struct TestAppBuilder {
    secret: Option<&'static str>,
    quota: u32,
}

impl TestAppBuilder {
    pub fn new() -> Self {
        Self {
            secret: Some(SECRET),
            quota: 10,
        }
    }

    pub fn open_mode(mut self) -> Self {
        self.secret = None;
        self
    }

    pub fn quota(mut self, quota: u32) -> Self {
        self.quota = quota;
        self
    }

    pub fn build(self) -> TestApp {
        let store = Arc::new(InMemoryEntitlementStore::new());
        let counters = Arc::new(InMemoryUsageCounterStore::new());
        let clock = Arc::new(FixedClock::at(Timestamp::now()));
        let clock_port: Arc<dyn Clock> = clock.clone();
        let retry = RetryPolicy::none();
        let catalog = PlanCatalog::new(PERIODIC_PRODUCT, PERPETUAL_PRODUCT);

        let verifier =
            SignatureVerifier::new(self.secret.map(|s| SecretString::new(s.to_string())));
        let apply = Arc::new(ApplyPaymentHandler::new(
            store.clone(),
            clock_port.clone(),
            retry,
        ));
        let checkout = Arc::new(HostedCheckoutLink::new(
            Url::parse(CHECKOUT_BASE).unwrap(),
            None,
        ));

        let payments = PaymentsAppState {
            webhook_handler: Arc::new(HandlePaymentWebhookHandler::new(
                verifier,
                catalog.clone(),
                apply,
                Duration::from_secs(5),
            )),
            checkout_handler: Arc::new(CreateCheckoutSessionHandler::new(
                store.clone(),
                checkout,
                catalog,
                retry,
            )),
            plan_handler: Arc::new(GetMyPlanHandler::new(
                store.clone(),
                clock_port.clone(),
                retry,
            )),
            signature_header: DEFAULT_SIGNATURE_HEADER.parse().unwrap(),
        };
        let usage = UsageAppState {
            gate: Arc::new(CheckAndConsumeHandler::new(
                store.clone(),
                counters,
                FreeQuota::new(self.quota),
                retry,
            )),
        };

        let validator: AuthState = Arc::new(
            MockSessionValidator::new()
                .with_test_user(ALICE_TOKEN, ALICE)
                .with_test_user(BOB_TOKEN, "bob"),
        );

        let router = app_router(payments, usage, validator, &RouterSettings::default());

        TestApp {
            router,
            sweeper: SweepExpiredHandler::new(store.clone(), clock_port.clone(), retry, 4),
            provision: ProvisionEntitlementHandler::new(store.clone(), clock_port, retry),
            store,
            clock,
        }
    }
}

impl TestApp {
    /// Provisions the free record for alice through the registration hand-off.
    pub async fn provision_alice(&self) {
        self.provision
            .handle(ProvisionEntitlementCommand {
                principal_id: alice_id(),
                email: Email::parse(ALICE_EMAIL).unwrap(),
            })
            .await
            .unwrap();
    }

    pub async fn alice(&self) -> EntitlementRecord {
        self.store.find_by_id(&alice_id()).await.unwrap().unwrap()
    }

    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, body)
    }
}

pub fn alice_id() -> PrincipalId {
    PrincipalId::new(ALICE).unwrap()
}

/// Webhook request; `signature` is sent verbatim when present.
pub fn webhook_request(body: &str, signature: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/payments/webhook")
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(sig) = signature {
        builder = builder.header(DEFAULT_SIGNATURE_HEADER, sig);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn authed(method: &str, uri: &str, token: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token));
    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub fn payment_body(email: &str, product: &str) -> String {
    serde_json::json!({
        "event_type": "payment_succeeded",
        "customer_email": email,
        "product_id": product,
    })
    .to_string()
}
