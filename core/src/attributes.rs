//! Request payloads and query options.
//!
//! # Design
//! Each mutating operation takes its own attributes struct naming exactly the
//! keys the server recognises, so an unknown key cannot be sent. Optional keys
//! left as `None` are omitted from the JSON body. Keys the server requires
//! are still `Option` so that `validate` can reject an incomplete payload
//! locally, before any request is built.

use serde::Serialize;

use crate::error::ApiError;

fn require<T>(value: &Option<T>, key: &str) -> Result<(), ApiError> {
    match value {
        Some(_) => Ok(()),
        None => Err(ApiError::InvalidInput(format!("missing required attribute `{key}`"))),
    }
}

fn require_text(value: &Option<String>, key: &str) -> Result<(), ApiError> {
    match value.as_deref().map(str::trim) {
        Some(text) if !text.is_empty() => Ok(()),
        _ => Err(ApiError::InvalidInput(format!("missing required attribute `{key}`"))),
    }
}

/// Pagination, sorting and filtering for list operations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListOptions {
    /// 1-based page number.
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    /// Sort expression, e.g. `"expiration:asc"`.
    pub sort: Option<String>,
    /// Filter pairs sent verbatim as query parameters, e.g. `("name_like", "example")`.
    pub filters: Vec<(String, String)>,
}

impl ListOptions {
    pub fn page(page: u32) -> Self {
        Self {
            page: Some(page),
            ..Self::default()
        }
    }

    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = Some(per_page);
        self
    }

    pub fn with_sort(mut self, sort: &str) -> Self {
        self.sort = Some(sort.to_string());
        self
    }

    pub fn with_filter(mut self, key: &str, value: &str) -> Self {
        self.filters.push((key.to_string(), value.to_string()));
        self
    }

    pub(crate) fn to_query(&self) -> Result<Vec<(String, String)>, ApiError> {
        let mut query = Vec::new();
        if let Some(page) = self.page {
            if page == 0 {
                return Err(ApiError::InvalidInput("page numbers start at 1".to_string()));
            }
            query.push(("page".to_string(), page.to_string()));
        }
        if let Some(per_page) = self.per_page {
            query.push(("per_page".to_string(), per_page.to_string()));
        }
        if let Some(sort) = &self.sort {
            query.push(("sort".to_string(), sort.clone()));
        }
        query.extend(self.filters.iter().cloned());
        Ok(query)
    }
}

/// Which price `domain_premium_price` asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PremiumPriceAction {
    Registration,
    Renewal,
    Transfer,
}

impl PremiumPriceAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            PremiumPriceAction::Registration => "registration",
            PremiumPriceAction::Renewal => "renewal",
            PremiumPriceAction::Transfer => "transfer",
        }
    }
}

/// Body of `create_domain`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DomainAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl DomainAttributes {
    pub fn named(name: &str) -> Self {
        Self {
            name: Some(name.to_string()),
        }
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        require_text(&self.name, "name")
    }
}

/// Body of `create_template` and `update_template`. Creation requires
/// `name` and `sid`; an update sends only what is set.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TemplateAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl TemplateAttributes {
    pub fn validate_for_create(&self) -> Result<(), ApiError> {
        require_text(&self.name, "name")?;
        require_text(&self.sid, "sid")
    }
}

/// Body of `register_domain`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DomainRegistrationAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registrant_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub whois_privacy: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_renew: Option<bool>,
    /// TLD-specific extended attributes, name to value.
    #[serde(skip_serializing_if = "Vec::is_empty", serialize_with = "serialize_pairs")]
    pub extended_attributes: Vec<(String, String)>,
    /// Required by the server for premium domains; must match the quoted price.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub premium_price: Option<String>,
}

impl DomainRegistrationAttributes {
    pub fn for_registrant(registrant_id: u64) -> Self {
        Self {
            registrant_id: Some(registrant_id),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        require(&self.registrant_id, "registrant_id")
    }
}

/// Body of `renew_domain`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DomainRenewalAttributes {
    /// Renewal length in years.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub premium_price: Option<String>,
}

impl DomainRenewalAttributes {
    pub fn validate(&self) -> Result<(), ApiError> {
        match self.period {
            Some(0) => Err(ApiError::InvalidInput("renewal period must be at least 1 year".to_string())),
            _ => Ok(()),
        }
    }
}

/// Body of `transfer_domain`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DomainTransferAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registrant_id: Option<u64>,
    /// Required by most TLDs; the server rejects the transfer without it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub whois_privacy: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_renew: Option<bool>,
    #[serde(skip_serializing_if = "Vec::is_empty", serialize_with = "serialize_pairs")]
    pub extended_attributes: Vec<(String, String)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub premium_price: Option<String>,
}

impl DomainTransferAttributes {
    pub fn validate(&self) -> Result<(), ApiError> {
        require(&self.registrant_id, "registrant_id")
    }
}

/// Body of `purchase_legacy_certificate`.
///
/// `name` is the subdomain part only: empty for the bare domain, `*` for a
/// wildcard certificate.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LegacyCertificatePurchaseAttributes {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_id: Option<u64>,
}

impl LegacyCertificatePurchaseAttributes {
    pub fn new(name: &str, contact_id: u64) -> Self {
        Self {
            name: name.trim().to_string(),
            contact_id: Some(contact_id),
        }
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        require(&self.contact_id, "contact_id")
    }
}

/// Body of `submit_legacy_certificate`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LegacyCertificateSubmitAttributes {
    /// Must be one of the certificate's `available_approver_emails`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approver_email: Option<String>,
}

impl LegacyCertificateSubmitAttributes {
    pub fn approved_by(approver_email: &str) -> Self {
        Self {
            approver_email: Some(approver_email.to_string()),
        }
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        require_text(&self.approver_email, "approver_email")
    }
}

fn serialize_pairs<S>(pairs: &[(String, String)], serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    use serde::ser::SerializeMap;

    let mut map = serializer.serialize_map(Some(pairs.len()))?;
    for (key, value) in pairs {
        map.serialize_entry(key, value)?;
    }
    map.end()
}
