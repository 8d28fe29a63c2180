//! Assignment service client for AB First.
//!
//! Resolves a visitor's variant assignments for the tests declared on a page
//! and runs the extract, resolve, filter and decorate pipeline.

mod api;
mod client;
mod error;
mod request;
mod transport;

pub use api::GoalPageTests;
pub use client::{AbTestsClient, PageOutcome, Resolution};
pub use error::FetchError;
pub use request::{PREVIEW_PARAM, VisitorRequest, is_preview_query, page_id_of};
pub use transport::{HttpTransport, Transport};

pub use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
