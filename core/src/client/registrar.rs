//! Registrar: availability, pricing, registration, renewal and transfers.
//!
//! The server reports business refusals (already registered, too early to
//! renew, missing auth code) as 400 with a message; they surface as
//! `ApiError::BadRequest` with that message.

use super::{identifier, Dnsimple, DnsimpleClient};
use crate::attributes::{
    DomainRegistrationAttributes, DomainRenewalAttributes, DomainTransferAttributes, PremiumPriceAction,
};
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport};
use crate::response::{parse_data, parse_empty, Response};
use crate::types::{DomainCheck, DomainPremiumPrice, DomainRegistration, DomainRenewal, DomainTransfer};

impl DnsimpleClient {
    pub fn build_check_domain(&self, account_id: u64, domain: &str) -> Result<HttpRequest, ApiError> {
        let account = account_id.to_string();
        let domain = identifier(domain, "domain name")?;
        self.get(&["v2", &account, "registrar", "domains", domain, "check"], &[])
    }

    pub fn parse_check_domain(&self, response: HttpResponse) -> Result<Response<DomainCheck>, ApiError> {
        parse_data(&response, &[200])
    }

    pub fn build_domain_premium_price(
        &self,
        account_id: u64,
        domain: &str,
        action: Option<PremiumPriceAction>,
    ) -> Result<HttpRequest, ApiError> {
        let account = account_id.to_string();
        let domain = identifier(domain, "domain name")?;
        let query: Vec<(String, String)> = action
            .map(|action| ("action".to_string(), action.as_str().to_string()))
            .into_iter()
            .collect();
        self.get(&["v2", &account, "registrar", "domains", domain, "premium_price"], &query)
    }

    /// A domain that is not premium is answered with 400 and a message such
    /// as "`example.com` is not a premium domain for registration".
    pub fn parse_domain_premium_price(
        &self,
        response: HttpResponse,
    ) -> Result<Response<DomainPremiumPrice>, ApiError> {
        parse_data(&response, &[200])
    }

    pub fn build_register_domain(
        &self,
        account_id: u64,
        domain: &str,
        attributes: &DomainRegistrationAttributes,
    ) -> Result<HttpRequest, ApiError> {
        attributes.validate()?;
        let account = account_id.to_string();
        let domain = identifier(domain, "domain name")?;
        self.post(&["v2", &account, "registrar", "domains", domain, "registrations"], Some(attributes))
    }

    pub fn parse_register_domain(&self, response: HttpResponse) -> Result<Response<DomainRegistration>, ApiError> {
        parse_data(&response, &[201])
    }

    pub fn build_renew_domain(
        &self,
        account_id: u64,
        domain: &str,
        attributes: &DomainRenewalAttributes,
    ) -> Result<HttpRequest, ApiError> {
        attributes.validate()?;
        let account = account_id.to_string();
        let domain = identifier(domain, "domain name")?;
        self.post(&["v2", &account, "registrar", "domains", domain, "renewals"], Some(attributes))
    }

    pub fn parse_renew_domain(&self, response: HttpResponse) -> Result<Response<DomainRenewal>, ApiError> {
        parse_data(&response, &[201])
    }

    pub fn build_transfer_domain(
        &self,
        account_id: u64,
        domain: &str,
        attributes: &DomainTransferAttributes,
    ) -> Result<HttpRequest, ApiError> {
        attributes.validate()?;
        let account = account_id.to_string();
        let domain = identifier(domain, "domain name")?;
        self.post(&["v2", &account, "registrar", "domains", domain, "transfers"], Some(attributes))
    }

    pub fn parse_transfer_domain(&self, response: HttpResponse) -> Result<Response<DomainTransfer>, ApiError> {
        parse_data(&response, &[201])
    }

    pub fn build_get_domain_transfer(
        &self,
        account_id: u64,
        domain: &str,
        transfer_id: u64,
    ) -> Result<HttpRequest, ApiError> {
        let account = account_id.to_string();
        let domain = identifier(domain, "domain name")?;
        let transfer = transfer_id.to_string();
        self.get(&["v2", &account, "registrar", "domains", domain, "transfers", &transfer], &[])
    }

    pub fn parse_get_domain_transfer(&self, response: HttpResponse) -> Result<Response<DomainTransfer>, ApiError> {
        parse_data(&response, &[200])
    }

    pub fn build_cancel_domain_transfer(
        &self,
        account_id: u64,
        domain: &str,
        transfer_id: u64,
    ) -> Result<HttpRequest, ApiError> {
        let account = account_id.to_string();
        let domain = identifier(domain, "domain name")?;
        let transfer = transfer_id.to_string();
        self.delete(&["v2", &account, "registrar", "domains", domain, "transfers", &transfer])
    }

    /// Cancellation is asynchronous: 202 with the transfer as it stood.
    pub fn parse_cancel_domain_transfer(
        &self,
        response: HttpResponse,
    ) -> Result<Response<DomainTransfer>, ApiError> {
        parse_data(&response, &[202])
    }

    pub fn build_transfer_domain_out(&self, account_id: u64, domain: &str) -> Result<HttpRequest, ApiError> {
        let account = account_id.to_string();
        let domain = identifier(domain, "domain name")?;
        self.request(
            HttpMethod::Post,
            &["v2", &account, "registrar", "domains", domain, "authorize_transfer_out"],
            &[],
            None,
        )
    }

    pub fn parse_transfer_domain_out(&self, response: HttpResponse) -> Result<Response<()>, ApiError> {
        parse_empty(&response, &[204])
    }
}

impl<T: Transport> Dnsimple<T> {
    pub fn check_domain(&self, account_id: u64, domain: &str) -> Result<Response<DomainCheck>, ApiError> {
        let request = self.core.build_check_domain(account_id, domain)?;
        self.core.parse_check_domain(self.send(&request)?)
    }

    pub fn domain_premium_price(
        &self,
        account_id: u64,
        domain: &str,
        action: Option<PremiumPriceAction>,
    ) -> Result<Response<DomainPremiumPrice>, ApiError> {
        let request = self.core.build_domain_premium_price(account_id, domain, action)?;
        self.core.parse_domain_premium_price(self.send(&request)?)
    }

    /// Register a domain. Fails with `InvalidInput`, without sending
    /// anything, when `registrant_id` is missing.
    pub fn register_domain(
        &self,
        account_id: u64,
        domain: &str,
        attributes: &DomainRegistrationAttributes,
    ) -> Result<Response<DomainRegistration>, ApiError> {
        let request = self.core.build_register_domain(account_id, domain, attributes)?;
        self.core.parse_register_domain(self.send(&request)?)
    }

    pub fn renew_domain(
        &self,
        account_id: u64,
        domain: &str,
        attributes: &DomainRenewalAttributes,
    ) -> Result<Response<DomainRenewal>, ApiError> {
        let request = self.core.build_renew_domain(account_id, domain, attributes)?;
        self.core.parse_renew_domain(self.send(&request)?)
    }

    /// Start an inbound transfer. Fails with `InvalidInput`, without sending
    /// anything, when `registrant_id` is missing.
    pub fn transfer_domain(
        &self,
        account_id: u64,
        domain: &str,
        attributes: &DomainTransferAttributes,
    ) -> Result<Response<DomainTransfer>, ApiError> {
        let request = self.core.build_transfer_domain(account_id, domain, attributes)?;
        self.core.parse_transfer_domain(self.send(&request)?)
    }

    pub fn get_domain_transfer(
        &self,
        account_id: u64,
        domain: &str,
        transfer_id: u64,
    ) -> Result<Response<DomainTransfer>, ApiError> {
        let request = self.core.build_get_domain_transfer(account_id, domain, transfer_id)?;
        self.core.parse_get_domain_transfer(self.send(&request)?)
    }

    pub fn cancel_domain_transfer(
        &self,
        account_id: u64,
        domain: &str,
        transfer_id: u64,
    ) -> Result<Response<DomainTransfer>, ApiError> {
        let request = self.core.build_cancel_domain_transfer(account_id, domain, transfer_id)?;
        self.core.parse_cancel_domain_transfer(self.send(&request)?)
    }

    /// Authorize an outbound transfer. Success carries no data.
    pub fn transfer_domain_out(&self, account_id: u64, domain: &str) -> Result<Response<()>, ApiError> {
        let request = self.core.build_transfer_domain_out(account_id, domain)?;
        self.core.parse_transfer_domain_out(self.send(&request)?)
    }
}
