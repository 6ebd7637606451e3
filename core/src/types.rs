//! Resource records returned by the DNSimple API, and the resource mapper.
//!
//! # Design
//! Each record is a flat, typed projection of one JSON object. Fields the
//! server may omit or send as `null` are `Option`; nothing is defaulted to a
//! sentinel. Unknown members are ignored so newer server payloads still map.
//! Timestamps stay in their ISO-8601 wire form.
//!
//! Records hold no reference to the client that fetched them.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ApiError;

/// Map one decoded JSON value into a typed record.
///
/// Pure: no I/O, no dependence on any other mapping. A required member that
/// is missing or has the wrong type is a `Decode` error.
pub fn map_resource<T: DeserializeOwned>(value: &Value) -> Result<T, ApiError> {
    T::deserialize(value).map_err(|e| ApiError::Decode(e.to_string()))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: u64,
    pub email: String,
    #[serde(default)]
    pub plan_identifier: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub email: String,
    pub created_at: String,
    pub updated_at: String,
}

/// The authenticated context: an account token carries `account`, a user
/// token carries `user`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Whoami {
    #[serde(default)]
    pub account: Option<Account>,
    #[serde(default)]
    pub user: Option<User>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Domain {
    pub id: u64,
    pub account_id: u64,
    #[serde(default)]
    pub registrant_id: Option<u64>,
    pub name: String,
    pub unicode_name: String,
    pub state: String,
    pub auto_renew: bool,
    pub private_whois: bool,
    #[serde(default)]
    pub expires_on: Option<String>,
    #[serde(default)]
    pub expires_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Lifecycle state of a certificate order. Values the client does not know
/// are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CertificateState {
    New,
    Purchased,
    Configured,
    Submitted,
    Requesting,
    Issued,
    Rejected,
    Refunded,
    Cancelled,
    Failed,
    Expired,
    Other(String),
}

impl CertificateState {
    pub fn as_str(&self) -> &str {
        match self {
            CertificateState::New => "new",
            CertificateState::Purchased => "purchased",
            CertificateState::Configured => "configured",
            CertificateState::Submitted => "submitted",
            CertificateState::Requesting => "requesting",
            CertificateState::Issued => "issued",
            CertificateState::Rejected => "rejected",
            CertificateState::Refunded => "refunded",
            CertificateState::Cancelled => "cancelled",
            CertificateState::Failed => "failed",
            CertificateState::Expired => "expired",
            CertificateState::Other(state) => state,
        }
    }

    /// Whether the certificate authority has produced a signed certificate.
    pub fn is_issued(&self) -> bool {
        matches!(self, CertificateState::Issued)
    }
}

impl From<String> for CertificateState {
    fn from(state: String) -> Self {
        match state.as_str() {
            "new" => CertificateState::New,
            "purchased" => CertificateState::Purchased,
            "configured" => CertificateState::Configured,
            "submitted" => CertificateState::Submitted,
            "requesting" => CertificateState::Requesting,
            "issued" => CertificateState::Issued,
            "rejected" => CertificateState::Rejected,
            "refunded" => CertificateState::Refunded,
            "cancelled" => CertificateState::Cancelled,
            "failed" => CertificateState::Failed,
            "expired" => CertificateState::Expired,
            _ => CertificateState::Other(state),
        }
    }
}

impl From<CertificateState> for String {
    fn from(state: CertificateState) -> Self {
        match state {
            CertificateState::Other(state) => state,
            known => known.as_str().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Certificate {
    pub id: u64,
    pub domain_id: u64,
    #[serde(default)]
    pub contact_id: Option<u64>,
    /// Subdomain part; empty for the apex.
    pub name: String,
    pub common_name: String,
    #[serde(default)]
    pub years: Option<u32>,
    #[serde(default)]
    pub csr: Option<String>,
    pub state: CertificateState,
    #[serde(default)]
    pub auto_renew: bool,
    #[serde(default)]
    pub alternate_names: Vec<String>,
    #[serde(default)]
    pub authority_identifier: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    /// Absent until the certificate is issued.
    #[serde(default)]
    pub expires_at: Option<String>,
    #[serde(default)]
    pub expires_on: Option<String>,
}

impl Certificate {
    /// Fully-qualified name covered by the certificate: `name` joined to
    /// `domain_name`, skipping blank parts.
    pub fn fqdn(&self, domain_name: &str) -> String {
        fqdn(&self.name, domain_name)
    }
}

/// A certificate as returned by the legacy `/v1` API, unwrapped from its
/// `{"certificate": {...}}` container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyCertificate {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub state: Option<CertificateState>,
    #[serde(default)]
    pub csr: Option<String>,
    /// Present once the certificate authority has issued it.
    #[serde(default)]
    pub ssl_certificate: Option<String>,
    /// Present only when the service generated the CSR.
    #[serde(default)]
    pub private_key: Option<String>,
    #[serde(default)]
    pub approver_email: Option<String>,
    /// Addresses that may approve the order. Sent either as an array or as
    /// one comma-separated string.
    #[serde(default, deserialize_with = "email_list")]
    pub available_approver_emails: Vec<String>,
    #[serde(default)]
    pub certificate_status: Option<String>,
    #[serde(default)]
    pub order_date: Option<String>,
    #[serde(default)]
    pub expires_on: Option<String>,
    #[serde(default)]
    pub configured_at: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl LegacyCertificate {
    pub fn fqdn(&self, domain_name: &str) -> String {
        fqdn(self.name.as_deref().unwrap_or_default(), domain_name)
    }
}

fn email_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Emails {
        List(Vec<String>),
        Joined(String),
    }

    let emails = match Option::<Emails>::deserialize(deserializer)? {
        Some(Emails::List(list)) => list,
        Some(Emails::Joined(joined)) => joined.split(',').map(str::to_string).collect(),
        None => Vec::new(),
    };
    Ok(emails
        .into_iter()
        .map(|email| email.trim().to_string())
        .filter(|email| !email.is_empty())
        .collect())
}

fn fqdn(name: &str, domain_name: &str) -> String {
    [name, domain_name]
        .iter()
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(".")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    pub id: u64,
    pub account_id: u64,
    pub name: String,
    /// Short identifier, usable in place of the numeric id.
    #[serde(alias = "short_name")]
    pub sid: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainCheck {
    pub domain: String,
    pub available: bool,
    pub premium: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainPremiumPrice {
    /// Decimal price as sent by the server, e.g. `"109.00"`.
    pub premium_price: String,
    pub action: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainRegistration {
    pub id: u64,
    pub domain_id: u64,
    pub registrant_id: u64,
    pub period: u32,
    pub state: String,
    pub auto_renew: bool,
    pub whois_privacy: bool,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainRenewal {
    pub id: u64,
    pub domain_id: u64,
    pub period: u32,
    pub state: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainTransfer {
    pub id: u64,
    pub domain_id: u64,
    pub registrant_id: u64,
    pub state: String,
    pub auto_renew: bool,
    pub whois_privacy: bool,
    #[serde(default)]
    pub status_description: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}
