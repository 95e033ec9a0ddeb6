use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::{
    Client, RequestBuilder,
    header::{CONTENT_TYPE, COOKIE},
};

#[derive(Clone, Debug)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Transport used by providers. A response with an error status is still
/// `Ok`; only connection level failures and timeouts are `Err`.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn get(&self, url: &str, cookies: &str) -> Result<HttpResponse>;

    async fn post_form(
        &self,
        url: &str,
        form: &[(&str, &str)],
        headers: &[(&str, &str)],
        cookies: &str,
    ) -> Result<HttpResponse>;
}

pub struct ReqwestClient {
    client: Client,
}

impl ReqwestClient {
    pub fn new(timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: Client::builder().timeout(timeout).gzip(true).build()?,
        })
    }

    /// `form` sets the content type itself, a caller supplied one is skipped.
    fn form_request(
        &self,
        url: &str,
        form: &[(&str, &str)],
        headers: &[(&str, &str)],
        cookies: &str,
    ) -> RequestBuilder {
        let mut req = self.client.post(url).form(form);
        for (k, v) in headers {
            if k.eq_ignore_ascii_case(CONTENT_TYPE.as_str()) {
                continue;
            }
            req = req.header(*k, *v);
        }
        if !cookies.is_empty() {
            req = req.header(COOKIE, cookies);
        }
        req
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn get(&self, url: &str, cookies: &str) -> Result<HttpResponse> {
        let mut req = self.client.get(url);
        if !cookies.is_empty() {
            req = req.header(COOKIE, cookies);
        }
        let res = req.send().await?;
        let status = res.status().as_u16();
        let body = res.text().await?;
        Ok(HttpResponse { status, body })
    }

    async fn post_form(
        &self,
        url: &str,
        form: &[(&str, &str)],
        headers: &[(&str, &str)],
        cookies: &str,
    ) -> Result<HttpResponse> {
        let res = self
            .form_request(url, form, headers, cookies)
            .send()
            .await?;
        let status = res.status().as_u16();
        let body = res.text().await?;
        Ok(HttpResponse { status, body })
    }
}
