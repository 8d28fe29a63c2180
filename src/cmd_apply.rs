//! `abfirst apply` command.

use anyhow::{Context, bail};
use tracing::{info, warn};

use abfirst_client::{AbTestsClient, HeaderMap, HeaderName, HeaderValue, VisitorRequest};
use abfirst_config::{Config, ConfigValidator};

use crate::cli::PageArgs;
use crate::{print_json, read_page};

pub(crate) async fn run(
    config: &Config,
    args: &PageArgs,
    cookie: Option<String>,
    query: String,
    headers: &[String],
) -> anyhow::Result<()> {
    let validation = ConfigValidator::validate(config);
    for warning in &validation.warnings {
        warn!(path = %warning.path, "{}", warning.message);
    }
    validation.into_result()?;

    let mut page = read_page(args)?;
    let Some(request) = VisitorRequest::for_page(&page) else {
        bail!("Page has no `id` field");
    };
    let request = request
        .with_cookie_hash(cookie.unwrap_or_default())
        .with_query(query)
        .with_headers(parse_headers(headers)?);

    let client = AbTestsClient::new(config.ab_tests.clone())?;
    let outcome = client
        .process_page(&mut page, &request, &config.content)
        .await
        .map_err(|e| anyhow::anyhow!("{}: {}", e, e.to_json()))?;

    info!(
        tests = outcome.declared.len(),
        assignments = outcome.resolution.assignments.len(),
        exposures = outcome.exposures.len(),
        "Page filtered"
    );

    print_json(&page, args.pretty)
}

/// Parse `NAME=VALUE` pairs into a header map.
fn parse_headers(raw: &[String]) -> anyhow::Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    for pair in raw {
        let Some((name, value)) = pair.split_once('=') else {
            bail!("Header `{}` is not in NAME=VALUE form", pair);
        };
        let name: HeaderName = name
            .trim()
            .parse()
            .with_context(|| format!("Invalid header name `{}`", name))?;
        let value: HeaderValue = value
            .trim()
            .parse()
            .with_context(|| format!("Invalid value for header `{}`", name))?;
        headers.insert(name, value);
    }
    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_headers() {
        let headers = parse_headers(&["x-token = abc".to_string(), "X-Site=1".to_string()]).unwrap();
        assert_eq!(headers["x-token"], "abc");
        assert_eq!(headers["x-site"], "1");
    }

    #[test]
    fn test_parse_headers_rejects_malformed() {
        assert!(parse_headers(&["no-equals".to_string()]).is_err());
        assert!(parse_headers(&["bad name=1".to_string()]).is_err());
    }
}
