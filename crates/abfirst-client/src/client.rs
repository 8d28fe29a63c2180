//! Assignment resolution and the page pipeline.

use std::sync::Arc;

use reqwest::header::HeaderMap;
use serde_json::{Value, json};
use tracing::{debug, info};

use abfirst_config::{AbTestsSettings, ConfigError, ContentConfig};
use abfirst_core::{
    Assignment, DeclaredTests, Decoration, Exposure, decorate, extract_from_content, filter_content,
};

use crate::api::{AssignmentsResponse, GoalPageResponse, GoalPageTests, decode};
use crate::error::FetchError;
use crate::request::VisitorRequest;
use crate::transport::{HttpTransport, Transport};

/// Goal-page path segment used when the visitor has no cookie.
const NO_COOKIE_SEGMENT: &str = "undefined";

/// Assignments resolved for one page view.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolution {
    /// Direct assignments followed by goal-page assignments.
    ///
    /// Lookups take the first entry for a test, so a direct assignment wins
    /// over a goal-page assignment for the same test.
    pub assignments: Vec<Assignment>,
    /// Cookie hash handed out by the service.
    pub cookie_hash: Option<String>,
    /// Tests that use the current page as their goal.
    pub tests_with_page_as_goal: Vec<Value>,
}

/// Everything [`AbTestsClient::process_page`] did to a page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageOutcome {
    pub declared: DeclaredTests,
    pub resolution: Resolution,
    pub exposures: Vec<Exposure>,
}

/// Client for the A/B test assignment service.
///
/// Holds only immutable settings, so one instance can serve concurrent
/// requests and several instances can point at different services.
pub struct AbTestsClient {
    settings: AbTestsSettings,
    transport: Arc<dyn Transport>,
}

impl AbTestsClient {
    /// Create a client talking HTTP to `settings.host`.
    pub fn new(settings: AbTestsSettings) -> Result<Self, ConfigError> {
        settings.require()?;
        let transport = HttpTransport::new(settings.api_token.trim())?;
        Ok(Self {
            settings,
            transport: Arc::new(transport),
        })
    }

    /// Create a client with a custom transport.
    pub fn with_transport(
        settings: AbTestsSettings,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, ConfigError> {
        settings.require()?;
        Ok(Self { settings, transport })
    }

    pub fn settings(&self) -> &AbTestsSettings {
        &self.settings
    }

    fn assignments_url(&self) -> String {
        format!("{}/api/assignments", self.settings.base_url())
    }

    fn preview_url(&self, raw_query: &str) -> String {
        if raw_query.is_empty() {
            self.assignments_url()
        } else {
            format!("{}?{}", self.assignments_url(), raw_query)
        }
    }

    /// Visitors without a cookie are sent as the literal segment
    /// `undefined`, which is what the service routes on.
    fn goal_page_url(&self, page_id: &str, cookie_hash: Option<&str>) -> String {
        format!(
            "{}/api/assignments/goal-page/{}/{}",
            self.settings.base_url(),
            page_id,
            cookie_hash.unwrap_or(NO_COOKIE_SEGMENT)
        )
    }

    /// Fetch the tests that use `page_id` as their goal, with any
    /// assignments the service bundles for them.
    pub async fn fetch_goal_page_tests(
        &self,
        page_id: &str,
        cookie_hash: Option<&str>,
        headers: &HeaderMap,
    ) -> Result<GoalPageTests, FetchError> {
        let url = self.goal_page_url(page_id, cookie_hash);
        let value = self.transport.get(&url, headers).await?;
        let response: GoalPageResponse = decode(&url, value);
        Ok(response.data)
    }

    /// Resolve the visitor's assignments for the tests declared on a page.
    ///
    /// In preview mode the raw query is forwarded as-is and goal pages are
    /// not looked up. Otherwise assignment creation and the goal-page lookup
    /// run concurrently and both must succeed.
    pub async fn resolve_assignments(
        &self,
        declared: &DeclaredTests,
        request: &VisitorRequest,
    ) -> Result<Resolution, FetchError> {
        if request.preview {
            let url = self.preview_url(&request.raw_query);
            debug!(url = %url, "Resolving preview assignments");
            let value = self
                .transport
                .post(&url, &json!({}), &request.security_headers)
                .await?;
            let response: AssignmentsResponse = decode(&url, value);
            return Ok(Resolution {
                assignments: response.data.test_assignments,
                cookie_hash: response.data.cookie_hash,
                tests_with_page_as_goal: Vec::new(),
            });
        }

        let url = self.assignments_url();
        let mut body = json!({ "abTests": declared });
        if let Some(cookie_hash) = &request.cookie_hash {
            body["cookieHash"] = json!(cookie_hash);
        }

        let (created, goal_page) = futures::try_join!(
            self.transport.post(&url, &body, &request.security_headers),
            self.fetch_goal_page_tests(
                &request.page_id,
                request.cookie_hash.as_deref(),
                &request.security_headers,
            )
        )?;

        let created: AssignmentsResponse = decode(&url, created);
        let mut assignments = created.data.test_assignments;
        assignments.extend(goal_page.assignments);

        debug!(
            page_id = %request.page_id,
            assignments = assignments.len(),
            goal_tests = goal_page.tests_with_page_as_goal.len(),
            "Resolved assignments"
        );

        Ok(Resolution {
            assignments,
            cookie_hash: created.data.cookie_hash,
            tests_with_page_as_goal: goal_page.tests_with_page_as_goal,
        })
    }

    /// Extract, resolve, filter and decorate a page document in place.
    ///
    /// Resolution runs even when the page declares no tests, so a visit to a
    /// goal page is still attributed. On error the page is left untouched.
    pub async fn process_page(
        &self,
        page: &mut Value,
        request: &VisitorRequest,
        content: &ContentConfig,
    ) -> Result<PageOutcome, FetchError> {
        let declared = extract_from_content(page, &content.extra_block_names);
        let resolution = self.resolve_assignments(&declared, request).await?;
        let exposures = filter_content(page, &resolution.assignments);

        decorate(
            page,
            &Decoration {
                cookie_hash: resolution.cookie_hash.as_deref(),
                existing_cookie: request.cookie_hash.as_deref(),
                origin: &content.origin,
                tests_with_page_as_goal: &resolution.tests_with_page_as_goal,
                exposures: &exposures,
            },
        );

        info!(
            page_id = %request.page_id,
            tests = declared.len(),
            exposures = exposures.len(),
            preview = request.preview,
            "Applied A/B test variants"
        );

        Ok(PageOutcome {
            declared,
            resolution,
            exposures,
        })
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
