//! Certificates attached to a domain, including the legacy v1 operations.
//!
//! The v1 API wraps every certificate as `{"certificate": {...}}` and has no
//! `data` envelope, so those parsers unwrap by hand.

use serde::Serialize;
use serde_json::Value;

use super::{identifier, Dnsimple, DnsimpleClient};
use crate::attributes::{LegacyCertificatePurchaseAttributes, LegacyCertificateSubmitAttributes, ListOptions};
use crate::error::{classify, ApiError};
use crate::http::{HttpRequest, HttpResponse, Transport};
use crate::response::{decode_body, parse_collection, parse_data, Body, CollectionResponse, RateLimit, Response};
use crate::types::{map_resource, Certificate, LegacyCertificate};

impl DnsimpleClient {
    pub fn build_list_certificates(
        &self,
        account_id: u64,
        domain: &str,
        options: &ListOptions,
    ) -> Result<HttpRequest, ApiError> {
        let account = account_id.to_string();
        let domain = identifier(domain, "domain")?;
        self.get(&["v2", &account, "domains", domain, "certificates"], &options.to_query()?)
    }

    pub fn parse_list_certificates(
        &self,
        response: HttpResponse,
    ) -> Result<CollectionResponse<Certificate>, ApiError> {
        parse_collection(&response, &[200])
    }

    pub fn build_get_certificate(
        &self,
        account_id: u64,
        domain: &str,
        certificate_id: u64,
    ) -> Result<HttpRequest, ApiError> {
        let account = account_id.to_string();
        let domain = identifier(domain, "domain")?;
        let certificate = certificate_id.to_string();
        self.get(&["v2", &account, "domains", domain, "certificates", &certificate], &[])
    }

    pub fn parse_get_certificate(&self, response: HttpResponse) -> Result<Response<Certificate>, ApiError> {
        parse_data(&response, &[200])
    }

    pub fn build_list_legacy_certificates(&self, domain: &str) -> Result<HttpRequest, ApiError> {
        let domain = identifier(domain, "domain")?;
        self.get(&["v1", "domains", domain, "certificates"], &[])
    }

    /// The v1 API answers with a bare array of wrappers.
    pub fn parse_list_legacy_certificates(
        &self,
        response: HttpResponse,
    ) -> Result<Response<Vec<LegacyCertificate>>, ApiError> {
        let (body, rate_limit) = legacy_checked(&response, &[200])?;
        let items = match body {
            Body::Json(Value::Array(items)) => items,
            Body::Empty => Vec::new(),
            _ => return Err(ApiError::Decode("expected an array of certificates".to_string())),
        };
        let data = items.iter().map(unwrap_certificate).collect::<Result<Vec<_>, _>>()?;
        Ok(Response { data, rate_limit })
    }

    pub fn build_get_legacy_certificate(&self, domain: &str, certificate_id: u64) -> Result<HttpRequest, ApiError> {
        let domain = identifier(domain, "domain")?;
        let certificate = certificate_id.to_string();
        self.get(&["v1", "domains", domain, "certificates", &certificate], &[])
    }

    pub fn parse_get_legacy_certificate(
        &self,
        response: HttpResponse,
    ) -> Result<Response<LegacyCertificate>, ApiError> {
        parse_wrapped(&response, &[200])
    }

    /// Purchasing charges the account immediately. A certificate that
    /// already exists is answered with 406, surfaced as `ApiError::Request`.
    pub fn build_purchase_legacy_certificate(
        &self,
        domain: &str,
        attributes: &LegacyCertificatePurchaseAttributes,
    ) -> Result<HttpRequest, ApiError> {
        attributes.validate()?;
        let domain = identifier(domain, "domain")?;
        self.post(&["v1", "domains", domain, "certificates"], Some(&Wrapped { certificate: attributes }))
    }

    pub fn parse_purchase_legacy_certificate(
        &self,
        response: HttpResponse,
    ) -> Result<Response<LegacyCertificate>, ApiError> {
        parse_wrapped(&response, &[201])
    }

    /// Submit a purchased certificate to the authority. Fails with
    /// `InvalidInput`, without sending anything, when `approver_email` is
    /// missing.
    pub fn build_submit_legacy_certificate(
        &self,
        domain: &str,
        certificate_id: u64,
        attributes: &LegacyCertificateSubmitAttributes,
    ) -> Result<HttpRequest, ApiError> {
        attributes.validate()?;
        let domain = identifier(domain, "domain")?;
        let certificate = certificate_id.to_string();
        self.put(
            &["v1", "domains", domain, "certificates", &certificate, "submit"],
            &Wrapped { certificate: attributes },
        )
    }

    pub fn parse_submit_legacy_certificate(
        &self,
        response: HttpResponse,
    ) -> Result<Response<LegacyCertificate>, ApiError> {
        parse_wrapped(&response, &[200])
    }
}

#[derive(Serialize)]
struct Wrapped<'a, B> {
    certificate: &'a B,
}

fn legacy_checked(response: &HttpResponse, expected: &[u16]) -> Result<(Body, RateLimit), ApiError> {
    let rate_limit = RateLimit::from_response(response);
    let body = decode_body(response)?;
    classify(response, &body, expected)?;
    Ok((body, rate_limit))
}

fn unwrap_certificate(item: &Value) -> Result<LegacyCertificate, ApiError> {
    match item.get("certificate") {
        Some(certificate) => map_resource(certificate),
        None => Err(ApiError::Decode("certificate wrapper is missing".to_string())),
    }
}

fn parse_wrapped(response: &HttpResponse, expected: &[u16]) -> Result<Response<LegacyCertificate>, ApiError> {
    let (body, rate_limit) = legacy_checked(response, expected)?;
    let Body::Json(value) = body else {
        return Err(ApiError::Decode("response has no certificate".to_string()));
    };
    Ok(Response {
        data: unwrap_certificate(&value)?,
        rate_limit,
    })
}

impl<T: Transport> Dnsimple<T> {
    pub fn list_certificates(
        &self,
        account_id: u64,
        domain: &str,
        options: &ListOptions,
    ) -> Result<CollectionResponse<Certificate>, ApiError> {
        let request = self.core.build_list_certificates(account_id, domain, options)?;
        self.core.parse_list_certificates(self.send(&request)?)
    }

    pub fn get_certificate(
        &self,
        account_id: u64,
        domain: &str,
        certificate_id: u64,
    ) -> Result<Response<Certificate>, ApiError> {
        let request = self.core.build_get_certificate(account_id, domain, certificate_id)?;
        self.core.parse_get_certificate(self.send(&request)?)
    }

    pub fn list_legacy_certificates(&self, domain: &str) -> Result<Response<Vec<LegacyCertificate>>, ApiError> {
        let request = self.core.build_list_legacy_certificates(domain)?;
        self.core.parse_list_legacy_certificates(self.send(&request)?)
    }

    pub fn get_legacy_certificate(
        &self,
        domain: &str,
        certificate_id: u64,
    ) -> Result<Response<LegacyCertificate>, ApiError> {
        let request = self.core.build_get_legacy_certificate(domain, certificate_id)?;
        self.core.parse_get_legacy_certificate(self.send(&request)?)
    }

    pub fn purchase_legacy_certificate(
        &self,
        domain: &str,
        attributes: &LegacyCertificatePurchaseAttributes,
    ) -> Result<Response<LegacyCertificate>, ApiError> {
        let request = self.core.build_purchase_legacy_certificate(domain, attributes)?;
        self.core.parse_purchase_legacy_certificate(self.send(&request)?)
    }

    pub fn submit_legacy_certificate(
        &self,
        domain: &str,
        certificate_id: u64,
        attributes: &LegacyCertificateSubmitAttributes,
    ) -> Result<Response<LegacyCertificate>, ApiError> {
        let request = self.core.build_submit_legacy_certificate(domain, certificate_id, attributes)?;
        self.core.parse_submit_legacy_certificate(self.send(&request)?)
    }
}
