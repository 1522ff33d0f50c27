//! `callguard call <target>` – send one request through the dispatcher.

use anyhow::{Context, Result};
use callguard_core::config::CallguardConfig;
use callguard_core::http::{HttpClient, Method};
use callguard_core::{ApiError, Dispatcher};

#[derive(Debug)]
pub struct CallArgs {
    pub target: String,
    pub method: Method,
    pub data: Option<String>,
    pub headers: Vec<String>,
    pub token: String,
}

pub fn run_call(cfg: &CallguardConfig, args: CallArgs) -> Result<()> {
    let url = resolve_url(cfg.base_url.as_deref(), &args.target)?;
    let headers = args
        .headers
        .iter()
        .map(|h| parse_header(h))
        .collect::<Result<Vec<_>>>()?;
    let authorization = authorization_value(&args.token);

    let dispatcher = Dispatcher::from_config(&cfg.dispatch());
    let method = args.method;
    let data = args.data;
    tracing::info!("{} {}", method.as_str(), url);

    let response = dispatcher
        .request(
            move |client: &dyn HttpClient| {
                let mut req = client.request(method, &url);
                for (name, value) in &headers {
                    req.set_header(name, value);
                }
                match &data {
                    Some(body) => req.body(body.as_bytes()),
                    None => req,
                }
            },
            &authorization,
        )
        .map_err(describe)?;

    println!("HTTP {}", response.status());
    if !response.body().is_empty() {
        println!("{}", response.body());
    }
    Ok(())
}

/// Adds a hint about what the caller should do for authorization failures.
fn describe(e: ApiError) -> anyhow::Error {
    let hint = match &e {
        ApiError::TokenExpired(_) => "access token expired; refresh it and retry",
        ApiError::Authorization(_) => "authorization rejected; re-authenticate",
        ApiError::Api { .. } => "web API call failed",
    };
    anyhow::Error::new(e).context(hint)
}

/// Absolute URLs are used as-is; anything else is appended to `base_url`.
pub(crate) fn resolve_url(base_url: Option<&str>, target: &str) -> Result<String> {
    if let Ok(url) = url::Url::parse(target) {
        return Ok(url.to_string());
    }
    let base = base_url
        .with_context(|| format!("{:?} is not a URL and no base_url is configured", target))?;
    let joined = format!(
        "{}/{}",
        base.trim_end_matches('/'),
        target.trim_start_matches('/')
    );
    let url = url::Url::parse(&joined).with_context(|| format!("invalid URL: {}", joined))?;
    Ok(url.to_string())
}

pub(crate) fn parse_header(raw: &str) -> Result<(String, String)> {
    let (name, value) = raw
        .split_once(':')
        .with_context(|| format!("header must look like \"Name: value\": {:?}", raw))?;
    let name = name.trim();
    anyhow::ensure!(!name.is_empty(), "empty header name: {:?}", raw);
    Ok((name.to_string(), value.trim().to_string()))
}

pub(crate) fn authorization_value(token: &str) -> String {
    let token = token.trim();
    if token.contains(' ') {
        token.to_string()
    } else {
        format!("Bearer {}", token)
    }
}
