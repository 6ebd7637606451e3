//! Replay recorded HTTP responses from `tests/fixtures/` through the full
//! pipeline: build, stub transport, decode, classify, map.
//!
//! Each case checks the request that went out and the typed result or error
//! that came back.

mod common;

use common::{read_http_fixture, stubbed, StubTransport, ACCOUNT_ID};
use dnsimple_core::{
    ApiError, CertificateState, Dnsimple, DnsimpleClient, DomainRegistrationAttributes, DomainRenewalAttributes,
    DomainTransferAttributes, HttpMethod, ListOptions, PremiumPriceAction,
};

// ---------------------------------------------------------------------------
// Registrar
// ---------------------------------------------------------------------------

#[test]
fn check_domain() {
    let (client, stub) = stubbed("check_domain/success.http");
    let response = client.check_domain(ACCOUNT_ID, "example.com").unwrap();

    let requests = stub.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, HttpMethod::Get);
    assert_eq!(
        requests[0].url,
        "https://api.dnsimple.test/v2/1010/registrar/domains/example.com/check"
    );
    assert_eq!(requests[0].header("Accept"), Some("application/json"));

    let check = response.data;
    assert_eq!(check.domain, "example.com");
    assert!(check.available);
    assert!(check.premium);
    assert_eq!(response.rate_limit.limit, Some(2400));
    assert_eq!(response.rate_limit.remaining, Some(2398));
    assert_eq!(response.rate_limit.reset, Some(1591384034));
}

#[test]
fn domain_premium_price() {
    let (client, stub) = stubbed("domain_premium_price/success.http");
    let price = client
        .domain_premium_price(ACCOUNT_ID, "ruby.codes", Some(PremiumPriceAction::Registration))
        .unwrap()
        .data;

    assert_eq!(
        stub.requests()[0].url,
        "https://api.dnsimple.test/v2/1010/registrar/domains/ruby.codes/premium_price?action=registration"
    );
    assert_eq!(price.premium_price, "109.00");
    assert_eq!(price.action, "registration");
}

#[test]
fn domain_premium_price_for_regular_domain() {
    let (client, _) = stubbed("domain_premium_price/failure.http");
    let err = client
        .domain_premium_price(ACCOUNT_ID, "example.com", None)
        .unwrap_err();

    match &err {
        ApiError::BadRequest { status, message, errors } => {
            assert_eq!(*status, 400);
            assert_eq!(message, "`example.com` is not a premium domain for registration");
            assert!(errors.is_empty());
        }
        other => panic!("expected BadRequest, got {other:?}"),
    }
}

#[test]
fn register_domain() {
    let (client, stub) = stubbed("register_domain/success.http");
    let registration = client
        .register_domain(ACCOUNT_ID, "example.com", &DomainRegistrationAttributes::for_registrant(10))
        .unwrap()
        .data;

    let request = &stub.requests()[0];
    assert_eq!(request.method, HttpMethod::Post);
    assert_eq!(
        request.url,
        "https://api.dnsimple.test/v2/1010/registrar/domains/example.com/registrations"
    );
    let body: serde_json::Value = serde_json::from_str(request.body.as_deref().unwrap()).unwrap();
    assert_eq!(body, serde_json::json!({"registrant_id": 10}));

    assert_eq!(registration.id, 1);
    assert_eq!(registration.domain_id, 999);
    assert_eq!(registration.state, "new");
}

#[test]
fn register_domain_without_registrant_sends_nothing() {
    let stub = StubTransport::default();
    let client = Dnsimple::with_transport(common::config(), stub.clone());

    let err = client
        .register_domain(ACCOUNT_ID, "example.com", &DomainRegistrationAttributes::default())
        .unwrap_err();

    assert!(matches!(err, ApiError::InvalidInput(_)));
    assert_eq!(stub.calls(), 0);
}

#[test]
fn renew_domain() {
    let (client, stub) = stubbed("renew_domain/success.http");
    let attributes = DomainRenewalAttributes {
        period: Some(3),
        premium_price: None,
    };
    let renewal = client.renew_domain(ACCOUNT_ID, "example.com", &attributes).unwrap().data;

    assert_eq!(stub.requests()[0].body.as_deref(), Some(r#"{"period":3}"#));
    assert_eq!(renewal.period, 3);
    assert_eq!(renewal.domain_id, 999);
}

#[test]
fn renew_domain_too_early() {
    let (client, _) = stubbed("renew_domain/error-tooearly.http");
    let err = client
        .renew_domain(ACCOUNT_ID, "example.com", &DomainRenewalAttributes::default())
        .unwrap_err();
    assert!(matches!(err, ApiError::BadRequest { .. }));
    assert_eq!(err.message(), "example.com may not be renewed at this time");
}

fn transfer_attributes() -> DomainTransferAttributes {
    DomainTransferAttributes {
        registrant_id: Some(10),
        auth_code: Some("x1y2z3".to_string()),
        ..DomainTransferAttributes::default()
    }
}

#[test]
fn transfer_domain() {
    let (client, stub) = stubbed("transfer_domain/success.http");
    let transfer = client
        .transfer_domain(ACCOUNT_ID, "example.com", &transfer_attributes())
        .unwrap()
        .data;

    let body: serde_json::Value =
        serde_json::from_str(stub.requests()[0].body.as_deref().unwrap()).unwrap();
    assert_eq!(body, serde_json::json!({"registrant_id": 10, "auth_code": "x1y2z3"}));
    assert_eq!(transfer.state, "transferring");
    assert_eq!(transfer.status_description, None);
}

#[test]
fn transfer_domain_without_registrant_sends_nothing() {
    let stub = StubTransport::default();
    let client = Dnsimple::with_transport(common::config(), stub.clone());
    let attributes = DomainTransferAttributes {
        auth_code: Some("x1y2z3".to_string()),
        ..DomainTransferAttributes::default()
    };

    let err = client.transfer_domain(ACCOUNT_ID, "example.com", &attributes).unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));
    assert_eq!(stub.calls(), 0);
}

#[test]
fn transfer_domain_business_refusals() {
    let cases = [
        (
            "transfer_domain/error-indnsimple.http",
            "The domain google.com is already in DNSimple and cannot be added",
        ),
        (
            "transfer_domain/error-missing-authcode.http",
            "You must provide an authorization code for the domain",
        ),
    ];
    for (fixture, expected) in cases {
        let (client, _) = stubbed(fixture);
        let err = client
            .transfer_domain(ACCOUNT_ID, "example.com", &transfer_attributes())
            .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest { status: 400, .. }), "{fixture}");
        assert_eq!(err.message(), expected, "{fixture}");
    }
}

#[test]
fn get_domain_transfer() {
    let (client, stub) = stubbed("get_domain_transfer/success.http");
    let transfer = client.get_domain_transfer(ACCOUNT_ID, "example.com", 361).unwrap().data;

    assert_eq!(
        stub.requests()[0].url,
        "https://api.dnsimple.test/v2/1010/registrar/domains/example.com/transfers/361"
    );
    assert_eq!(transfer.id, 361);
    assert_eq!(transfer.domain_id, 182245);
    assert_eq!(transfer.registrant_id, 2715);
    assert_eq!(transfer.state, "cancelled");
    assert!(!transfer.auto_renew);
    assert!(!transfer.whois_privacy);
    assert_eq!(transfer.status_description.as_deref(), Some("Canceled by customer"));
    assert_eq!(transfer.created_at, "2020-06-05T18:08:00Z");
    assert_eq!(transfer.updated_at, "2020-06-05T18:10:01Z");
}

#[test]
fn cancel_domain_transfer() {
    let (client, stub) = stubbed("cancel_domain_transfer/success.http");
    let transfer = client.cancel_domain_transfer(ACCOUNT_ID, "example.com", 361).unwrap().data;

    assert_eq!(stub.requests()[0].method, HttpMethod::Delete);
    assert_eq!(transfer.state, "transferring");
    assert_eq!(transfer.status_description, None);
    assert_eq!(transfer.updated_at, "2020-06-05T18:08:04Z");
}

#[test]
fn transfer_domain_out() {
    let (client, stub) = stubbed("transfer_domain_out/success.http");
    let response = client.transfer_domain_out(ACCOUNT_ID, "example.com").unwrap();

    let request = &stub.requests()[0];
    assert_eq!(request.method, HttpMethod::Post);
    assert_eq!(
        request.url,
        "https://api.dnsimple.test/v2/1010/registrar/domains/example.com/authorize_transfer_out"
    );
    let () = response.data;
    assert_eq!(response.rate_limit.remaining, Some(2387));
}

// ---------------------------------------------------------------------------
// Templates, domains, certificates, identity
// ---------------------------------------------------------------------------

#[test]
fn list_templates() {
    let (client, stub) = stubbed("list_templates/success.http");
    let page = client.list_templates(ACCOUNT_ID, &ListOptions::default()).unwrap();

    assert_eq!(stub.requests()[0].url, "https://api.dnsimple.test/v2/1010/templates");
    assert_eq!(page.data.len(), 2);
    for template in &page.data {
        assert_eq!(template.account_id, 1010);
        assert!(template.description.is_some());
    }
    assert_eq!(page.pagination.current_page, 1);
    assert_eq!(page.pagination.total_entries, 2);
}

#[test]
fn get_template() {
    let (client, stub) = stubbed("get_template/success.http");
    let template = client.get_template(ACCOUNT_ID, "1").unwrap().data;

    assert_eq!(stub.requests()[0].url, "https://api.dnsimple.test/v2/1010/templates/1");
    assert_eq!(template.id, 1);
    assert_eq!(template.account_id, 1010);
    assert_eq!(template.name, "Alpha");
    assert_eq!(template.sid, "alpha");
    assert_eq!(template.description.as_deref(), Some("An alpha template."));
}

#[test]
fn list_domains_maps_hosted_and_registered() {
    let (client, stub) = stubbed("list_domains/success.http");
    let page = client
        .list_domains(ACCOUNT_ID, &ListOptions::page(1).with_per_page(30))
        .unwrap();

    assert_eq!(
        stub.requests()[0].url,
        "https://api.dnsimple.test/v2/1010/domains?page=1&per_page=30"
    );
    let registered = &page.data[0];
    assert_eq!(registered.registrant_id, Some(2715));
    assert_eq!(registered.expires_on.as_deref(), Some("2021-06-05"));
    let hosted = &page.data[1];
    assert_eq!(hosted.state, "hosted");
    assert_eq!(hosted.registrant_id, None);
    assert_eq!(hosted.expires_at, None);
}

#[test]
fn get_domain_not_found() {
    let (client, _) = stubbed("get_domain/notfound-domain.http");
    let err = client.get_domain(ACCOUNT_ID, "0").unwrap_err();
    assert!(matches!(err, ApiError::NotFound { .. }));
    assert_eq!(err.to_string(), "not found (HTTP 404): Domain `0` not found");
}

#[test]
fn list_certificates_mixed_states() {
    let (client, _) = stubbed("list_certificates/success.http");
    let page = client
        .list_certificates(ACCOUNT_ID, "dnsimple.us", &ListOptions::default())
        .unwrap();

    let issued = &page.data[0];
    assert_eq!(issued.state, CertificateState::Issued);
    assert_eq!(issued.expires_on.as_deref(), Some("2020-09-16"));
    assert!(issued.csr.as_deref().unwrap().contains("BEGIN CERTIFICATE REQUEST"));

    let pending = &page.data[1];
    assert_eq!(pending.state, CertificateState::Requesting);
    assert_eq!(pending.expires_on, None);
    assert_eq!(pending.csr, None);
    assert_eq!(pending.fqdn("dnsimple.us"), "www.dnsimple.us");
}

#[test]
fn whoami_contexts() {
    let (client, _) = stubbed("whoami/success-account.http");
    let whoami = client.whoami().unwrap().data;
    assert_eq!(whoami.account.unwrap().email, "example-account@example.com");
    assert!(whoami.user.is_none());

    let (client, _) = stubbed("whoami/success-user.http");
    let whoami = client.whoami().unwrap().data;
    assert!(whoami.account.is_none());
    assert_eq!(whoami.user.unwrap().email, "example-user@example.com");
}

// ---------------------------------------------------------------------------
// Error classification across operations
// ---------------------------------------------------------------------------

#[test]
fn error_fixtures_classify_by_status() {
    let core = DnsimpleClient::new(common::config());

    let err = core.parse_whoami(read_http_fixture("errors/unauthorized.http")).unwrap_err();
    assert!(matches!(err, ApiError::Authentication { status: 401, .. }));

    let err = core
        .parse_delete_domain(read_http_fixture("errors/method-not-allowed.http"))
        .unwrap_err();
    assert!(matches!(err, ApiError::MethodNotAllowed { .. }));

    let err = core
        .parse_check_domain(read_http_fixture("errors/rate-limited.http"))
        .unwrap_err();
    match err {
        ApiError::RateLimitExceeded { reset, .. } => assert_eq!(reset, Some(1591384034)),
        other => panic!("expected RateLimitExceeded, got {other:?}"),
    }

    let err = core
        .parse_list_templates(read_http_fixture("errors/bad-gateway.http"))
        .unwrap_err();
    assert!(matches!(err, ApiError::Request { status: 502, .. }));
    assert!(err.message().contains("502 Bad Gateway"));

    let err = core
        .parse_create_template(read_http_fixture("errors/validation-failed.http"))
        .unwrap_err();
    let errors = err.field_errors().unwrap();
    assert_eq!(errors["sid"], vec!["has already been taken"]);
    assert_eq!(errors["name"], vec!["can't be blank"]);
}

#[test]
fn success_fixture_on_wrong_operation_is_unexpected() {
    let core = DnsimpleClient::new(common::config());
    // 200 is not a documented status for registration.
    let err = core
        .parse_register_domain(read_http_fixture("check_domain/success.http"))
        .unwrap_err();
    assert!(matches!(err, ApiError::Request { status: 200, .. }));
}

#[test]
fn transport_failure_is_connection_error() {
    let stub = StubTransport::default();
    let client = Dnsimple::with_transport(common::config(), stub.clone());
    let err = client.whoami().unwrap_err();
    assert!(matches!(err, ApiError::Connection(_)));
    assert_eq!(err.status(), None);
    assert_eq!(stub.calls(), 1);
}
