//! Identity and accounts.

use super::{Dnsimple, DnsimpleClient};
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse, Transport};
use crate::response::{parse_data, Response};
use crate::types::{Account, Whoami};

impl DnsimpleClient {
    pub fn build_whoami(&self) -> Result<HttpRequest, ApiError> {
        self.get(&["v2", "whoami"], &[])
    }

    pub fn parse_whoami(&self, response: HttpResponse) -> Result<Response<Whoami>, ApiError> {
        parse_data(&response, &[200])
    }

    pub fn build_list_accounts(&self) -> Result<HttpRequest, ApiError> {
        self.get(&["v2", "accounts"], &[])
    }

    /// Accounts the authenticated user can access. Not paginated.
    pub fn parse_list_accounts(&self, response: HttpResponse) -> Result<Response<Vec<Account>>, ApiError> {
        parse_data(&response, &[200])
    }
}

impl<T: Transport> Dnsimple<T> {
    /// The authenticated context: an account, a user, or both.
    pub fn whoami(&self) -> Result<Response<Whoami>, ApiError> {
        let request = self.core.build_whoami()?;
        self.core.parse_whoami(self.send(&request)?)
    }

    pub fn list_accounts(&self) -> Result<Response<Vec<Account>>, ApiError> {
        let request = self.core.build_list_accounts()?;
        self.core.parse_list_accounts(self.send(&request)?)
    }
}
