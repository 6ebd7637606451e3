//! Synchronous client for the DNSimple v2 API.
//!
//! # Overview
//! `DnsimpleClient` builds `HttpRequest` values and parses `HttpResponse`
//! values without touching the network. `Dnsimple<T>` pairs it with a
//! `Transport` (by default a blocking `ureq` agent) and exposes one method
//! per API operation.
//!
//! # Design
//! - Every operation goes through one pipeline: build the request, send it
//!   once, decode the body, classify the status, map `data` into a record.
//! - The status code alone picks the `ApiError` variant; the server's error
//!   envelope only adds the message and field errors.
//! - Each operation accepts exactly its documented success status. Any other
//!   status, 2xx included, is an error.
//! - Missing required attributes are rejected locally with
//!   `ApiError::InvalidInput` before a request is built.
//! - No retries, no caching, no shared mutable state.

pub mod attributes;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod response;
pub mod types;

pub use attributes::{
    DomainAttributes, DomainRegistrationAttributes, DomainRenewalAttributes, DomainTransferAttributes,
    LegacyCertificatePurchaseAttributes, LegacyCertificateSubmitAttributes, ListOptions, PremiumPriceAction,
    TemplateAttributes,
};
pub use client::{Dnsimple, DnsimpleClient};
pub use config::ClientConfig;
pub use error::{ApiError, FieldErrors};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport, UreqTransport};
pub use response::{CollectionResponse, Pagination, RateLimit, Response};
pub use types::{
    Account, Certificate, CertificateState, Domain, DomainCheck, DomainPremiumPrice, DomainRegistration,
    DomainRenewal, DomainTransfer, LegacyCertificate, Template, User, Whoami,
};
