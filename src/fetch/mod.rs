//! HTTP retrieval for station data, forecast text and the location sheet.

mod basic;
mod client;

pub use basic::BasicClient;
pub use client::HttpClient;

use anyhow::{Context, Result};
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use serde::Serialize;
use tracing::debug;

/// Fetches the body of `url` with a `GET`, failing on non-success statuses.
pub async fn fetch_bytes<C: HttpClient>(client: &C, url: &str) -> Result<Vec<u8>> {
    let req = reqwest::Request::new(reqwest::Method::GET, url.parse()?);

    let resp = client.execute(req).await?.error_for_status()?;
    Ok(resp.bytes().await?.to_vec())
}

/// Sends `form` as an `application/x-www-form-urlencoded` `POST` to `url`.
pub async fn post_form<C: HttpClient, F: Serialize + ?Sized>(
    client: &C,
    url: &str,
    form: &F,
) -> Result<Vec<u8>> {
    let req = form_request(url, form)?;

    let resp = client.execute(req).await?.error_for_status()?;
    Ok(resp.bytes().await?.to_vec())
}

fn form_request<F: Serialize + ?Sized>(url: &str, form: &F) -> Result<reqwest::Request> {
    let body = serde_urlencoded::to_string(form).context("failed to encode form")?;

    let mut req = reqwest::Request::new(reqwest::Method::POST, url.parse()?);
    req.headers_mut().insert(
        CONTENT_TYPE,
        HeaderValue::from_static("application/x-www-form-urlencoded"),
    );
    *req.body_mut() = Some(body.into());
    Ok(req)
}

/// Loads `source` from a local file path or fetches it over HTTP.
#[tracing::instrument(skip(client))]
pub async fn fetch_source<C: HttpClient>(client: &C, source: &str) -> Result<Vec<u8>> {
    let bytes = if source.starts_with("http") {
        fetch_bytes(client, source).await?
    } else {
        std::fs::read(source).with_context(|| format!("failed to read '{source}'"))?
    };
    debug!(bytes = bytes.len(), "Source loaded");
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::io::Write;

    struct Unreachable;

    #[async_trait]
    impl HttpClient for Unreachable {
        async fn execute(&self, _req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
            panic!("local sources must not hit the network");
        }
    }

    #[derive(Serialize)]
    struct Query<'a> {
        sid: &'a str,
        elems: &'a str,
    }

    #[test]
    fn test_form_request() {
        let form = Query {
            sid: "ORDthr",
            elems: "maxt,mint",
        };
        let req = form_request("https://data.example.com/StnData", &form).unwrap();

        assert_eq!(req.method(), &reqwest::Method::POST);
        assert_eq!(req.url().as_str(), "https://data.example.com/StnData");
        assert_eq!(
            req.headers()[CONTENT_TYPE],
            "application/x-www-form-urlencoded"
        );
        let body = req.body().and_then(|b| b.as_bytes()).unwrap();
        assert_eq!(body, b"sid=ORDthr&elems=maxt%2Cmint");
    }

    #[test]
    fn test_form_request_bad_url() {
        let form = Query { sid: "x", elems: "y" };
        assert!(form_request("not a url", &form).is_err());
    }

    #[tokio::test]
    async fn test_fetch_source_reads_local_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"Station,Period,Emails\n").unwrap();

        let path = file.path().to_str().unwrap().to_string();
        let bytes = fetch_source(&Unreachable, &path).await.unwrap();
        assert_eq!(bytes, b"Station,Period,Emails\n");
    }

    #[tokio::test]
    async fn test_fetch_source_missing_file() {
        let result = fetch_source(&Unreachable, "/nonexistent/locations.csv").await;
        assert!(result.is_err());
    }
}
