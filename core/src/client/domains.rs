//! Domains in an account.

use super::{identifier, Dnsimple, DnsimpleClient};
use crate::attributes::{DomainAttributes, ListOptions};
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse, Transport};
use crate::response::{parse_collection, parse_data, parse_empty, CollectionResponse, Response};
use crate::types::Domain;

impl DnsimpleClient {
    pub fn build_list_domains(&self, account_id: u64, options: &ListOptions) -> Result<HttpRequest, ApiError> {
        let account = account_id.to_string();
        self.get(&["v2", &account, "domains"], &options.to_query()?)
    }

    pub fn parse_list_domains(&self, response: HttpResponse) -> Result<CollectionResponse<Domain>, ApiError> {
        parse_collection(&response, &[200])
    }

    /// `domain` is a domain name or numeric id.
    pub fn build_get_domain(&self, account_id: u64, domain: &str) -> Result<HttpRequest, ApiError> {
        let account = account_id.to_string();
        let domain = identifier(domain, "domain")?;
        self.get(&["v2", &account, "domains", domain], &[])
    }

    pub fn parse_get_domain(&self, response: HttpResponse) -> Result<Response<Domain>, ApiError> {
        parse_data(&response, &[200])
    }

    pub fn build_create_domain(
        &self,
        account_id: u64,
        attributes: &DomainAttributes,
    ) -> Result<HttpRequest, ApiError> {
        attributes.validate()?;
        let account = account_id.to_string();
        self.post(&["v2", &account, "domains"], Some(attributes))
    }

    pub fn parse_create_domain(&self, response: HttpResponse) -> Result<Response<Domain>, ApiError> {
        parse_data(&response, &[201])
    }

    pub fn build_delete_domain(&self, account_id: u64, domain: &str) -> Result<HttpRequest, ApiError> {
        let account = account_id.to_string();
        let domain = identifier(domain, "domain")?;
        self.delete(&["v2", &account, "domains", domain])
    }

    pub fn parse_delete_domain(&self, response: HttpResponse) -> Result<Response<()>, ApiError> {
        parse_empty(&response, &[204])
    }
}

impl<T: Transport> Dnsimple<T> {
    pub fn list_domains(&self, account_id: u64, options: &ListOptions) -> Result<CollectionResponse<Domain>, ApiError> {
        let request = self.core.build_list_domains(account_id, options)?;
        self.core.parse_list_domains(self.send(&request)?)
    }

    pub fn get_domain(&self, account_id: u64, domain: &str) -> Result<Response<Domain>, ApiError> {
        let request = self.core.build_get_domain(account_id, domain)?;
        self.core.parse_get_domain(self.send(&request)?)
    }

    /// Add a domain to the account. Adding a domain does not register it.
    pub fn create_domain(&self, account_id: u64, attributes: &DomainAttributes) -> Result<Response<Domain>, ApiError> {
        let request = self.core.build_create_domain(account_id, attributes)?;
        self.core.parse_create_domain(self.send(&request)?)
    }

    pub fn delete_domain(&self, account_id: u64, domain: &str) -> Result<Response<()>, ApiError> {
        let request = self.core.build_delete_domain(account_id, domain)?;
        self.core.parse_delete_domain(self.send(&request)?)
    }
}
