//! Templates: named sets of records applied to domains.
//!
//! A template is addressed either by numeric id or by its `sid`.

use super::{identifier, Dnsimple, DnsimpleClient};
use crate::attributes::{ListOptions, TemplateAttributes};
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse, Transport};
use crate::response::{parse_collection, parse_data, parse_empty, CollectionResponse, Response};
use crate::types::Template;

impl DnsimpleClient {
    pub fn build_list_templates(&self, account_id: u64, options: &ListOptions) -> Result<HttpRequest, ApiError> {
        let account = account_id.to_string();
        self.get(&["v2", &account, "templates"], &options.to_query()?)
    }

    pub fn parse_list_templates(&self, response: HttpResponse) -> Result<CollectionResponse<Template>, ApiError> {
        parse_collection(&response, &[200])
    }

    pub fn build_get_template(&self, account_id: u64, template: &str) -> Result<HttpRequest, ApiError> {
        let account = account_id.to_string();
        let template = identifier(template, "template")?;
        self.get(&["v2", &account, "templates", template], &[])
    }

    pub fn parse_get_template(&self, response: HttpResponse) -> Result<Response<Template>, ApiError> {
        parse_data(&response, &[200])
    }

    pub fn build_create_template(
        &self,
        account_id: u64,
        attributes: &TemplateAttributes,
    ) -> Result<HttpRequest, ApiError> {
        attributes.validate_for_create()?;
        let account = account_id.to_string();
        self.post(&["v2", &account, "templates"], Some(attributes))
    }

    pub fn parse_create_template(&self, response: HttpResponse) -> Result<Response<Template>, ApiError> {
        parse_data(&response, &[201])
    }

    pub fn build_update_template(
        &self,
        account_id: u64,
        template: &str,
        attributes: &TemplateAttributes,
    ) -> Result<HttpRequest, ApiError> {
        let account = account_id.to_string();
        let template = identifier(template, "template")?;
        self.patch(&["v2", &account, "templates", template], attributes)
    }

    pub fn parse_update_template(&self, response: HttpResponse) -> Result<Response<Template>, ApiError> {
        parse_data(&response, &[200])
    }

    pub fn build_delete_template(&self, account_id: u64, template: &str) -> Result<HttpRequest, ApiError> {
        let account = account_id.to_string();
        let template = identifier(template, "template")?;
        self.delete(&["v2", &account, "templates", template])
    }

    pub fn parse_delete_template(&self, response: HttpResponse) -> Result<Response<()>, ApiError> {
        parse_empty(&response, &[204])
    }
}

impl<T: Transport> Dnsimple<T> {
    pub fn list_templates(
        &self,
        account_id: u64,
        options: &ListOptions,
    ) -> Result<CollectionResponse<Template>, ApiError> {
        let request = self.core.build_list_templates(account_id, options)?;
        self.core.parse_list_templates(self.send(&request)?)
    }

    pub fn get_template(&self, account_id: u64, template: &str) -> Result<Response<Template>, ApiError> {
        let request = self.core.build_get_template(account_id, template)?;
        self.core.parse_get_template(self.send(&request)?)
    }

    pub fn create_template(
        &self,
        account_id: u64,
        attributes: &TemplateAttributes,
    ) -> Result<Response<Template>, ApiError> {
        let request = self.core.build_create_template(account_id, attributes)?;
        self.core.parse_create_template(self.send(&request)?)
    }

    pub fn update_template(
        &self,
        account_id: u64,
        template: &str,
        attributes: &TemplateAttributes,
    ) -> Result<Response<Template>, ApiError> {
        let request = self.core.build_update_template(account_id, template, attributes)?;
        self.core.parse_update_template(self.send(&request)?)
    }

    pub fn delete_template(&self, account_id: u64, template: &str) -> Result<Response<()>, ApiError> {
        let request = self.core.build_delete_template(account_id, template)?;
        self.core.parse_delete_template(self.send(&request)?)
    }
}
