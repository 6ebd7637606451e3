//! In-memory stand-in for the subset of the DNSimple API the client uses.
//!
//! One account (`1010`) is seeded with a registered domain carrying an issued
//! certificate, a hosted domain, and a template. Every request needs a
//! bearer token; every response carries `X-RateLimit-*` headers.
//! Timestamps are fixed so responses are reproducible.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::{
    extract::{Path, Query, Request, State},
    http::{header, HeaderValue, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::info;

pub const ACCOUNT_ID: u64 = 1010;
pub const DEFAULT_RATE_LIMIT: u64 = 2400;
/// Bearer token the server always refuses.
pub const REJECTED_TOKEN: &str = "invalid";

const TIMESTAMP: &str = "2020-06-05T18:08:00Z";
const PREMIUM_PRICE: &str = "109.00";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Account {
    pub id: u64,
    pub email: String,
    pub plan_identifier: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Domain {
    pub id: u64,
    pub account_id: u64,
    pub registrant_id: Option<u64>,
    pub name: String,
    pub unicode_name: String,
    pub state: String,
    pub auto_renew: bool,
    pub private_whois: bool,
    pub expires_on: Option<String>,
    pub expires_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Certificate {
    pub id: u64,
    pub domain_id: u64,
    pub contact_id: u64,
    pub name: String,
    pub common_name: String,
    pub years: u32,
    pub csr: Option<String>,
    pub state: String,
    pub auto_renew: bool,
    pub alternate_names: Vec<String>,
    pub authority_identifier: String,
    pub created_at: String,
    pub updated_at: String,
    pub expires_at: Option<String>,
    pub expires_on: Option<String>,
    /// Only the v1 API reports this.
    #[serde(skip)]
    pub approver_email: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Template {
    pub id: u64,
    pub account_id: u64,
    pub name: String,
    pub sid: String,
    pub description: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DomainTransfer {
    pub id: u64,
    pub domain_id: u64,
    pub registrant_id: u64,
    pub state: String,
    pub auto_renew: bool,
    pub whois_privacy: bool,
    pub status_description: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Deserialize)]
pub struct ListQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

#[derive(Deserialize)]
pub struct PremiumPriceQuery {
    pub action: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateDomain {
    pub name: Option<String>,
}

#[derive(Deserialize)]
pub struct TemplateInput {
    pub name: Option<String>,
    pub sid: Option<String>,
    pub description: Option<String>,
}

#[derive(Deserialize)]
pub struct RegistrarInput {
    pub registrant_id: Option<u64>,
    pub auth_code: Option<String>,
    pub period: Option<u32>,
    #[serde(default)]
    pub whois_privacy: bool,
    #[serde(default)]
    pub auto_renew: bool,
}

#[derive(Serialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Serialize)]
struct Pagination {
    current_page: u64,
    per_page: u64,
    total_entries: u64,
    total_pages: u64,
}

#[derive(Serialize)]
struct Page<T> {
    data: Vec<T>,
    pagination: Pagination,
}

/// In-memory state. Domains are keyed by name.
#[derive(Debug)]
pub struct Store {
    next_id: u64,
    domains: BTreeMap<String, Domain>,
    certificates: BTreeMap<u64, Certificate>,
    templates: BTreeMap<u64, Template>,
    transfers: BTreeMap<u64, DomainTransfer>,
}

impl Store {
    fn seeded() -> Self {
        let mut store = Self {
            next_id: 1,
            domains: BTreeMap::new(),
            certificates: BTreeMap::new(),
            templates: BTreeMap::new(),
            transfers: BTreeMap::new(),
        };

        let alpha = store.add_domain("example-alpha.com", Some(2715));
        let certificate_id = store.id();
        store.certificates.insert(
            certificate_id,
            Certificate {
                id: certificate_id,
                domain_id: alpha.id,
                contact_id: 2715,
                name: "www".to_string(),
                common_name: "www.example-alpha.com".to_string(),
                years: 1,
                csr: Some("-----BEGIN CERTIFICATE REQUEST-----\n-----END CERTIFICATE REQUEST-----\n".to_string()),
                state: "issued".to_string(),
                auto_renew: false,
                alternate_names: Vec::new(),
                authority_identifier: "letsencrypt".to_string(),
                created_at: TIMESTAMP.to_string(),
                updated_at: TIMESTAMP.to_string(),
                expires_at: Some("2020-09-03T18:08:00Z".to_string()),
                expires_on: Some("2020-09-03".to_string()),
                approver_email: None,
            },
        );
        store.add_domain("example-beta.com", None);

        let template_id = store.id();
        store.templates.insert(
            template_id,
            Template {
                id: template_id,
                account_id: ACCOUNT_ID,
                name: "Alpha".to_string(),
                sid: "alpha".to_string(),
                description: Some("An alpha template.".to_string()),
                created_at: TIMESTAMP.to_string(),
                updated_at: TIMESTAMP.to_string(),
            },
        );
        store
    }

    fn id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Insert a domain: registered when it has a registrant, hosted otherwise.
    fn add_domain(&mut self, name: &str, registrant_id: Option<u64>) -> Domain {
        let registered = registrant_id.is_some();
        let domain = Domain {
            id: self.id(),
            account_id: ACCOUNT_ID,
            registrant_id,
            name: name.to_string(),
            unicode_name: name.to_string(),
            state: if registered { "registered" } else { "hosted" }.to_string(),
            auto_renew: false,
            private_whois: false,
            expires_on: registered.then(|| "2021-06-05".to_string()),
            expires_at: registered.then(|| "2021-06-05T18:08:00Z".to_string()),
            created_at: TIMESTAMP.to_string(),
            updated_at: TIMESTAMP.to_string(),
        };
        self.domains.insert(domain.name.clone(), domain.clone());
        domain
    }

    fn find_domain(&self, key: &str) -> Option<&Domain> {
        self.domains
            .get(key)
            .or_else(|| self.domains.values().find(|d| d.id.to_string() == key))
    }

    fn find_template(&self, key: &str) -> Option<u64> {
        self.templates
            .values()
            .find(|t| t.id.to_string() == key || t.sid == key)
            .map(|t| t.id)
    }
}

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RwLock<Store>>,
    rate_limit: u64,
    remaining: Arc<AtomicU64>,
}

/// A failed request as the DNSimple API reports it.
#[derive(Debug)]
pub struct Failure {
    status: StatusCode,
    message: String,
    errors: BTreeMap<String, Vec<String>>,
}

impl Failure {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            errors: BTreeMap::new(),
        }
    }

    fn not_found(what: &str, key: &str) -> Self {
        Self::new(StatusCode::NOT_FOUND, format!("{what} `{key}` not found"))
    }

    fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    fn validation(field: &str, reason: &str) -> Self {
        let mut failure = Self::bad_request("Validation failed");
        failure.errors.insert(field.to_string(), vec![reason.to_string()]);
        failure
    }
}

#[derive(Serialize)]
struct FailureBody<'a> {
    message: &'a str,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    errors: &'a BTreeMap<String, Vec<String>>,
}

impl IntoResponse for Failure {
    fn into_response(self) -> Response {
        let body = FailureBody {
            message: &self.message,
            errors: &self.errors,
        };
        (self.status, Json(body)).into_response()
    }
}

type ApiResult = Result<Response, Failure>;

fn data<T: Serialize>(status: StatusCode, data: T) -> ApiResult {
    Ok((status, Json(Envelope { data })).into_response())
}

fn page<T: Serialize + Clone>(items: &[T], query: &ListQuery) -> ApiResult {
    let per_page = query.per_page.unwrap_or(30).clamp(1, 100);
    let current_page = query.page.unwrap_or(1).max(1);
    let total_entries = items.len() as u64;
    let total_pages = total_entries.div_ceil(per_page).max(1);
    let start = usize::try_from((current_page - 1).saturating_mul(per_page)).unwrap_or(usize::MAX);
    let data = items
        .iter()
        .skip(start)
        .take(per_page as usize)
        .cloned()
        .collect();
    Ok(Json(Page {
        data,
        pagination: Pagination {
            current_page,
            per_page,
            total_entries,
            total_pages,
        },
    })
    .into_response())
}

fn check_account(account_id: u64) -> Result<(), Failure> {
    if account_id == ACCOUNT_ID {
        Ok(())
    } else {
        Err(Failure::not_found("Account", &account_id.to_string()))
    }
}

fn is_premium(name: &str) -> bool {
    name.ends_with(".codes")
}

pub fn app() -> Router {
    app_with_rate_limit(DEFAULT_RATE_LIMIT)
}

/// Router whose quota allows `rate_limit` requests before answering 429.
pub fn app_with_rate_limit(rate_limit: u64) -> Router {
    let state = AppState {
        store: Arc::new(RwLock::new(Store::seeded())),
        rate_limit,
        remaining: Arc::new(AtomicU64::new(rate_limit)),
    };

    let registrar = Router::new()
        .route("/check", get(check_domain))
        .route("/premium_price", get(premium_price))
        .route("/registrations", post(register_domain))
        .route("/renewals", post(renew_domain))
        .route("/transfers", post(transfer_domain))
        .route("/transfers/{transfer_id}", get(get_transfer).delete(cancel_transfer))
        .route("/authorize_transfer_out", post(authorize_transfer_out));

    Router::new()
        .route("/v2/whoami", get(whoami))
        .route("/v2/accounts", get(list_accounts))
        .route("/v2/{account_id}/domains", get(list_domains).post(create_domain))
        .route("/v2/{account_id}/domains/{domain}", get(get_domain).delete(delete_domain))
        .route("/v2/{account_id}/domains/{domain}/certificates", get(list_certificates))
        .route(
            "/v2/{account_id}/domains/{domain}/certificates/{certificate_id}",
            get(get_certificate),
        )
        .route(
            "/v1/domains/{domain}/certificates",
            get(list_legacy_certificates).post(purchase_legacy_certificate),
        )
        .route("/v1/domains/{domain}/certificates/{certificate_id}", get(get_legacy_certificate))
        .route(
            "/v1/domains/{domain}/certificates/{certificate_id}/submit",
            put(submit_legacy_certificate),
        )
        .route("/v2/{account_id}/templates", get(list_templates).post(create_template))
        .route(
            "/v2/{account_id}/templates/{template}",
            get(get_template).patch(update_template).delete(delete_template),
        )
        .nest("/v2/{account_id}/registrar/domains/{domain}", registrar)
        .layer(middleware::from_fn_with_state(state.clone(), rate_limit_and_auth))
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    serve(listener, app()).await
}

pub async fn serve(listener: TcpListener, router: Router) -> Result<(), std::io::Error> {
    axum::serve(listener, router).await
}

async fn rate_limit_and_auth(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let remaining = state
        .remaining
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
    let reset = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() + 3600)
        .unwrap_or_default();

    let authorized = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .is_some_and(|token| !token.is_empty() && token != REJECTED_TOKEN);

    let (mut response, left) = match remaining {
        Err(_) => (
            Failure::new(StatusCode::TOO_MANY_REQUESTS, "API rate limit exceeded").into_response(),
            0,
        ),
        Ok(before) if !authorized => (
            Failure::new(StatusCode::UNAUTHORIZED, "Authentication failed").into_response(),
            before - 1,
        ),
        Ok(before) => (next.run(request).await, before - 1),
    };

    let headers = response.headers_mut();
    headers.insert("x-ratelimit-limit", HeaderValue::from(state.rate_limit));
    headers.insert("x-ratelimit-remaining", HeaderValue::from(left));
    headers.insert("x-ratelimit-reset", HeaderValue::from(reset));
    response
}

// --- identity ---

fn account() -> Account {
    Account {
        id: ACCOUNT_ID,
        email: "example-account@example.com".to_string(),
        plan_identifier: "dnsimple-professional".to_string(),
        created_at: TIMESTAMP.to_string(),
        updated_at: TIMESTAMP.to_string(),
    }
}

async fn whoami() -> ApiResult {
    #[derive(Serialize)]
    struct Whoami {
        account: Account,
        user: Option<()>,
    }
    data(
        StatusCode::OK,
        Whoami {
            account: account(),
            user: None,
        },
    )
}

async fn list_accounts() -> ApiResult {
    data(StatusCode::OK, vec![account()])
}

// --- domains ---

async fn list_domains(
    State(state): State<AppState>,
    Path(account_id): Path<u64>,
    Query(query): Query<ListQuery>,
) -> ApiResult {
    check_account(account_id)?;
    let store = state.store.read().await;
    let domains: Vec<Domain> = store.domains.values().cloned().collect();
    page(&domains, &query)
}

async fn get_domain(State(state): State<AppState>, Path((account_id, key)): Path<(u64, String)>) -> ApiResult {
    check_account(account_id)?;
    let store = state.store.read().await;
    let domain = store.find_domain(&key).ok_or_else(|| Failure::not_found("Domain", &key))?;
    data(StatusCode::OK, domain)
}

async fn create_domain(
    State(state): State<AppState>,
    Path(account_id): Path<u64>,
    Json(input): Json<CreateDomain>,
) -> ApiResult {
    check_account(account_id)?;
    let name = match input.name.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => name.to_lowercase(),
        _ => return Err(Failure::validation("name", "can't be blank")),
    };
    let mut store = state.store.write().await;
    if store.domains.contains_key(&name) {
        return Err(Failure::validation("name", "has already been taken"));
    }
    let domain = store.add_domain(&name, None);
    info!(domain = %domain.name, "domain created");
    data(StatusCode::CREATED, domain)
}

async fn delete_domain(
    State(state): State<AppState>,
    Path((account_id, key)): Path<(u64, String)>,
) -> Result<StatusCode, Failure> {
    check_account(account_id)?;
    let mut store = state.store.write().await;
    let name = store
        .find_domain(&key)
        .map(|d| d.name.clone())
        .ok_or_else(|| Failure::not_found("Domain", &key))?;
    store.domains.remove(&name);
    info!(domain = %name, "domain deleted");
    Ok(StatusCode::NO_CONTENT)
}

// --- certificates ---

async fn list_certificates(
    State(state): State<AppState>,
    Path((account_id, key)): Path<(u64, String)>,
    Query(query): Query<ListQuery>,
) -> ApiResult {
    check_account(account_id)?;
    let store = state.store.read().await;
    let domain = store.find_domain(&key).ok_or_else(|| Failure::not_found("Domain", &key))?;
    let certificates: Vec<Certificate> = store
        .certificates
        .values()
        .filter(|c| c.domain_id == domain.id)
        .cloned()
        .collect();
    page(&certificates, &query)
}

async fn get_certificate(
    State(state): State<AppState>,
    Path((account_id, key, certificate_id)): Path<(u64, String, u64)>,
) -> ApiResult {
    check_account(account_id)?;
    let store = state.store.read().await;
    let domain = store.find_domain(&key).ok_or_else(|| Failure::not_found("Domain", &key))?;
    let certificate = store
        .certificates
        .get(&certificate_id)
        .filter(|c| c.domain_id == domain.id)
        .ok_or_else(|| Failure::not_found("Certificate", &certificate_id.to_string()))?;
    data(StatusCode::OK, certificate)
}

#[derive(Serialize)]
struct LegacyWrapper<'a> {
    certificate: LegacyCertificate<'a>,
}

#[derive(Serialize)]
struct LegacyCertificate<'a> {
    id: u64,
    name: &'a str,
    state: &'a str,
    csr: Option<&'a str>,
    ssl_certificate: Option<&'a str>,
    private_key: Option<&'a str>,
    approver_email: Option<&'a str>,
    available_approver_emails: Vec<String>,
    expires_on: Option<&'a str>,
    created_at: &'a str,
    updated_at: &'a str,
}

/// Addresses allowed to approve a certificate for `domain`.
fn approver_emails(domain: &str) -> Vec<String> {
    ["admin", "webmaster"]
        .iter()
        .map(|user| format!("{user}@{domain}"))
        .collect()
}

fn legacy<'a>(certificate: &'a Certificate, domain: &str) -> LegacyWrapper<'a> {
    LegacyWrapper {
        certificate: LegacyCertificate {
            id: certificate.id,
            name: &certificate.name,
            state: &certificate.state,
            csr: certificate.csr.as_deref(),
            ssl_certificate: None,
            private_key: None,
            approver_email: certificate.approver_email.as_deref(),
            available_approver_emails: approver_emails(domain),
            expires_on: certificate.expires_on.as_deref(),
            created_at: &certificate.created_at,
            updated_at: &certificate.updated_at,
        },
    }
}

#[derive(Deserialize)]
pub struct LegacyPurchaseInput {
    pub certificate: LegacyPurchase,
}

#[derive(Deserialize)]
pub struct LegacyPurchase {
    #[serde(default)]
    pub name: String,
    pub contact_id: Option<u64>,
}

#[derive(Deserialize)]
pub struct LegacySubmitInput {
    pub certificate: LegacySubmit,
}

#[derive(Deserialize)]
pub struct LegacySubmit {
    pub approver_email: Option<String>,
}

async fn list_legacy_certificates(State(state): State<AppState>, Path(key): Path<String>) -> ApiResult {
    let store = state.store.read().await;
    let domain = store.find_domain(&key).ok_or_else(|| Failure::not_found("Domain", &key))?;
    let wrapped: Vec<LegacyWrapper> = store
        .certificates
        .values()
        .filter(|c| c.domain_id == domain.id)
        .map(|c| legacy(c, &domain.name))
        .collect();
    Ok(Json(wrapped).into_response())
}

async fn get_legacy_certificate(
    State(state): State<AppState>,
    Path((key, certificate_id)): Path<(String, u64)>,
) -> ApiResult {
    let store = state.store.read().await;
    let domain = store.find_domain(&key).ok_or_else(|| Failure::not_found("Domain", &key))?;
    let certificate = store
        .certificates
        .get(&certificate_id)
        .filter(|c| c.domain_id == domain.id)
        .ok_or_else(|| Failure::not_found("Certificate", &certificate_id.to_string()))?;
    Ok(Json(legacy(certificate, &domain.name)).into_response())
}

async fn purchase_legacy_certificate(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(input): Json<LegacyPurchaseInput>,
) -> ApiResult {
    let LegacyPurchase { name, contact_id } = input.certificate;
    let contact_id = contact_id.ok_or_else(|| Failure::validation("contact_id", "can't be blank"))?;
    let mut store = state.store.write().await;
    let domain = store
        .find_domain(&key)
        .cloned()
        .ok_or_else(|| Failure::not_found("Domain", &key))?;
    if store
        .certificates
        .values()
        .any(|c| c.domain_id == domain.id && c.name == name)
    {
        return Err(Failure::new(
            StatusCode::NOT_ACCEPTABLE,
            format!("Certificate for {} already exists", domain.name),
        ));
    }

    let id = store.id();
    let common_name = if name.is_empty() {
        domain.name.clone()
    } else {
        format!("{name}.{}", domain.name)
    };
    let certificate = Certificate {
        id,
        domain_id: domain.id,
        contact_id,
        name,
        common_name,
        years: 1,
        csr: None,
        state: "purchased".to_string(),
        auto_renew: false,
        alternate_names: Vec::new(),
        authority_identifier: "comodo".to_string(),
        created_at: TIMESTAMP.to_string(),
        updated_at: TIMESTAMP.to_string(),
        expires_at: None,
        expires_on: None,
        approver_email: None,
    };
    store.certificates.insert(id, certificate);
    info!(domain = %domain.name, certificate_id = id, "certificate purchased");
    Ok((StatusCode::CREATED, Json(legacy(&store.certificates[&id], &domain.name))).into_response())
}

async fn submit_legacy_certificate(
    State(state): State<AppState>,
    Path((key, certificate_id)): Path<(String, u64)>,
    Json(input): Json<LegacySubmitInput>,
) -> ApiResult {
    let approver_email = input
        .certificate
        .approver_email
        .ok_or_else(|| Failure::validation("approver_email", "can't be blank"))?;
    let mut store = state.store.write().await;
    let domain = store
        .find_domain(&key)
        .cloned()
        .ok_or_else(|| Failure::not_found("Domain", &key))?;
    if !approver_emails(&domain.name).contains(&approver_email) {
        return Err(Failure::validation("approver_email", "is not a valid approver"));
    }
    let certificate = store
        .certificates
        .get_mut(&certificate_id)
        .filter(|c| c.domain_id == domain.id)
        .ok_or_else(|| Failure::not_found("Certificate", &certificate_id.to_string()))?;
    if certificate.state != "purchased" {
        return Err(Failure::bad_request(format!(
            "Certificate {certificate_id} cannot be submitted in state {}",
            certificate.state
        )));
    }
    certificate.state = "submitted".to_string();
    certificate.approver_email = Some(approver_email);
    info!(domain = %domain.name, certificate_id, "certificate submitted");
    Ok(Json(legacy(certificate, &domain.name)).into_response())
}

// --- templates ---

async fn list_templates(
    State(state): State<AppState>,
    Path(account_id): Path<u64>,
    Query(query): Query<ListQuery>,
) -> ApiResult {
    check_account(account_id)?;
    let store = state.store.read().await;
    let templates: Vec<Template> = store.templates.values().cloned().collect();
    page(&templates, &query)
}

async fn get_template(State(state): State<AppState>, Path((account_id, key)): Path<(u64, String)>) -> ApiResult {
    check_account(account_id)?;
    let store = state.store.read().await;
    let id = store.find_template(&key).ok_or_else(|| Failure::not_found("Template", &key))?;
    data(StatusCode::OK, &store.templates[&id])
}

async fn create_template(
    State(state): State<AppState>,
    Path(account_id): Path<u64>,
    Json(input): Json<TemplateInput>,
) -> ApiResult {
    check_account(account_id)?;
    let (Some(name), Some(sid)) = (input.name, input.sid) else {
        return Err(Failure::validation("sid", "can't be blank"));
    };
    let mut store = state.store.write().await;
    if store.templates.values().any(|t| t.sid == sid) {
        return Err(Failure::validation("sid", "has already been taken"));
    }
    let id = store.id();
    let template = Template {
        id,
        account_id,
        name,
        sid,
        description: input.description,
        created_at: TIMESTAMP.to_string(),
        updated_at: TIMESTAMP.to_string(),
    };
    store.templates.insert(id, template.clone());
    info!(sid = %template.sid, "template created");
    data(StatusCode::CREATED, template)
}

async fn update_template(
    State(state): State<AppState>,
    Path((account_id, key)): Path<(u64, String)>,
    Json(input): Json<TemplateInput>,
) -> ApiResult {
    check_account(account_id)?;
    let mut store = state.store.write().await;
    let id = store.find_template(&key).ok_or_else(|| Failure::not_found("Template", &key))?;
    if let Some(sid) = &input.sid {
        if store.templates.values().any(|t| t.id != id && &t.sid == sid) {
            return Err(Failure::validation("sid", "has already been taken"));
        }
    }
    let template = store
        .templates
        .get_mut(&id)
        .ok_or_else(|| Failure::not_found("Template", &key))?;
    if let Some(name) = input.name {
        template.name = name;
    }
    if let Some(sid) = input.sid {
        template.sid = sid;
    }
    if let Some(description) = input.description {
        template.description = Some(description);
    }
    data(StatusCode::OK, template.clone())
}

async fn delete_template(
    State(state): State<AppState>,
    Path((account_id, key)): Path<(u64, String)>,
) -> Result<StatusCode, Failure> {
    check_account(account_id)?;
    let mut store = state.store.write().await;
    let id = store.find_template(&key).ok_or_else(|| Failure::not_found("Template", &key))?;
    store.templates.remove(&id);
    Ok(StatusCode::NO_CONTENT)
}

// --- registrar ---

async fn check_domain(State(state): State<AppState>, Path((account_id, name)): Path<(u64, String)>) -> ApiResult {
    #[derive(Serialize)]
    struct Check {
        domain: String,
        available: bool,
        premium: bool,
    }
    check_account(account_id)?;
    let store = state.store.read().await;
    let available = !store.domains.contains_key(&name);
    data(
        StatusCode::OK,
        Check {
            premium: is_premium(&name),
            domain: name,
            available,
        },
    )
}

async fn premium_price(
    Path((account_id, name)): Path<(u64, String)>,
    Query(query): Query<PremiumPriceQuery>,
) -> ApiResult {
    #[derive(Serialize)]
    struct Price {
        premium_price: &'static str,
        action: String,
    }
    check_account(account_id)?;
    let action = query.action.unwrap_or_else(|| "registration".to_string());
    if !is_premium(&name) {
        return Err(Failure::bad_request(format!(
            "`{name}` is not a premium domain for {action}"
        )));
    }
    data(
        StatusCode::OK,
        Price {
            premium_price: PREMIUM_PRICE,
            action,
        },
    )
}

async fn register_domain(
    State(state): State<AppState>,
    Path((account_id, name)): Path<(u64, String)>,
    Json(input): Json<RegistrarInput>,
) -> ApiResult {
    #[derive(Serialize)]
    struct Registration {
        id: u64,
        domain_id: u64,
        registrant_id: u64,
        period: u32,
        state: &'static str,
        auto_renew: bool,
        whois_privacy: bool,
        created_at: &'static str,
        updated_at: &'static str,
    }
    check_account(account_id)?;
    let registrant_id = input
        .registrant_id
        .ok_or_else(|| Failure::validation("registrant_id", "can't be blank"))?;
    let mut store = state.store.write().await;
    if store.domains.contains_key(&name) {
        return Err(Failure::bad_request(format!("The domain {name} is already registered")));
    }
    let domain = store.add_domain(&name, Some(registrant_id));
    let id = store.id();
    info!(domain = %name, "domain registered");
    data(
        StatusCode::CREATED,
        Registration {
            id,
            domain_id: domain.id,
            registrant_id,
            period: input.period.unwrap_or(1),
            state: "new",
            auto_renew: input.auto_renew,
            whois_privacy: input.whois_privacy,
            created_at: TIMESTAMP,
            updated_at: TIMESTAMP,
        },
    )
}

async fn renew_domain(
    State(state): State<AppState>,
    Path((account_id, name)): Path<(u64, String)>,
    Json(input): Json<RegistrarInput>,
) -> ApiResult {
    #[derive(Serialize)]
    struct Renewal {
        id: u64,
        domain_id: u64,
        period: u32,
        state: &'static str,
        created_at: &'static str,
        updated_at: &'static str,
    }
    check_account(account_id)?;
    let mut store = state.store.write().await;
    let domain = store
        .domains
        .get(&name)
        .cloned()
        .ok_or_else(|| Failure::not_found("Domain", &name))?;
    if domain.registrant_id.is_none() {
        return Err(Failure::bad_request(format!("{name} may not be renewed at this time")));
    }
    let id = store.id();
    data(
        StatusCode::CREATED,
        Renewal {
            id,
            domain_id: domain.id,
            period: input.period.unwrap_or(1),
            state: "new",
            created_at: TIMESTAMP,
            updated_at: TIMESTAMP,
        },
    )
}

async fn transfer_domain(
    State(state): State<AppState>,
    Path((account_id, name)): Path<(u64, String)>,
    Json(input): Json<RegistrarInput>,
) -> ApiResult {
    check_account(account_id)?;
    let registrant_id = input
        .registrant_id
        .ok_or_else(|| Failure::validation("registrant_id", "can't be blank"))?;
    let mut store = state.store.write().await;
    if store.domains.contains_key(&name) {
        return Err(Failure::bad_request(format!(
            "The domain {name} is already in DNSimple and cannot be added"
        )));
    }
    if input.auth_code.as_deref().map_or(true, str::is_empty) {
        return Err(Failure::bad_request(
            "You must provide an authorization code for the domain",
        ));
    }
    let domain = store.add_domain(&name, Some(registrant_id));
    let id = store.id();
    let transfer = DomainTransfer {
        id,
        domain_id: domain.id,
        registrant_id,
        state: "transferring".to_string(),
        auto_renew: input.auto_renew,
        whois_privacy: input.whois_privacy,
        status_description: None,
        created_at: TIMESTAMP.to_string(),
        updated_at: TIMESTAMP.to_string(),
    };
    store.transfers.insert(id, transfer.clone());
    info!(domain = %name, transfer_id = id, "transfer started");
    data(StatusCode::CREATED, transfer)
}

async fn get_transfer(
    State(state): State<AppState>,
    Path((account_id, name, transfer_id)): Path<(u64, String, u64)>,
) -> ApiResult {
    check_account(account_id)?;
    let store = state.store.read().await;
    let domain = store.domains.get(&name).ok_or_else(|| Failure::not_found("Domain", &name))?;
    let transfer = store
        .transfers
        .get(&transfer_id)
        .filter(|t| t.domain_id == domain.id)
        .ok_or_else(|| Failure::not_found("Domain transfer", &transfer_id.to_string()))?;
    data(StatusCode::OK, transfer)
}

/// Answers 202 with the transfer as it stood; the cancellation is visible
/// on the next read.
async fn cancel_transfer(
    State(state): State<AppState>,
    Path((account_id, name, transfer_id)): Path<(u64, String, u64)>,
) -> ApiResult {
    check_account(account_id)?;
    let mut store = state.store.write().await;
    let domain_id = store
        .domains
        .get(&name)
        .map(|d| d.id)
        .ok_or_else(|| Failure::not_found("Domain", &name))?;
    let transfer = store
        .transfers
        .get_mut(&transfer_id)
        .filter(|t| t.domain_id == domain_id)
        .ok_or_else(|| Failure::not_found("Domain transfer", &transfer_id.to_string()))?;
    let before = transfer.clone();
    transfer.state = "cancelled".to_string();
    transfer.status_description = Some("Canceled by customer".to_string());
    info!(domain = %name, transfer_id, "transfer cancelled");
    data(StatusCode::ACCEPTED, before)
}

async fn authorize_transfer_out(
    State(state): State<AppState>,
    Path((account_id, name)): Path<(u64, String)>,
) -> Result<StatusCode, Failure> {
    check_account(account_id)?;
    let store = state.store.read().await;
    let domain = store.domains.get(&name).ok_or_else(|| Failure::not_found("Domain", &name))?;
    if domain.registrant_id.is_none() {
        return Err(Failure::bad_request(format!("The domain {name} is not registered with DNSimple")));
    }
    Ok(StatusCode::NO_CONTENT)
}
