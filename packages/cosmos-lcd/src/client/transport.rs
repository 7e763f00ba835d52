use async_trait::async_trait;
use reqwest::{header::HeaderMap, Url};
use serde_json::Value;

use crate::{error::QueryError, Error, LcdBuilder, Result};

/// Query parameters, in order. Keys may repeat.
pub type Params = [(String, String)];

/// JSON requests against an LCD server.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post(&self, path: &str, body: &Value) -> Result<Value, QueryError>;

    async fn get(&self, path: &str, params: &Params) -> Result<Value, QueryError>;

    /// Like [Transport::get], but error statuses with a JSON body return
    /// that body instead of failing.
    async fn get_raw(&self, path: &str, params: &Params) -> Result<Value, QueryError>;
}

/// [Transport] over HTTP(S) using `reqwest`.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(builder: &LcdBuilder) -> Result<Self> {
        let mut headers = HeaderMap::new();
        if let Some(referer) = builder.referer_header() {
            let value = referer.parse().map_err(|_| {
                Error::validation(format!("Invalid referer header {referer:?}"))
            })?;
            headers.insert(reqwest::header::REFERER, value);
        }
        let client = reqwest::Client::builder()
            .timeout(builder.request_timeout())
            .default_headers(headers)
            .build()
            .map_err(|e| Error::validation(format!("Unable to build HTTP client: {e}")))?;
        Ok(HttpTransport {
            client,
            base_url: builder.url().trim_end_matches('/').to_owned(),
        })
    }

    fn url(&self, path: &str, params: &Params) -> Result<Url, QueryError> {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        let mut parsed = Url::parse(&url).map_err(|e| QueryError::InvalidUrl {
            url: url.clone(),
            message: e.to_string(),
        })?;
        if !params.is_empty() {
            parsed.query_pairs_mut().extend_pairs(params);
        }
        Ok(parsed)
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        url: &Url,
        raw: bool,
    ) -> Result<Value, QueryError> {
        let res = request.send().await.map_err(|source| QueryError::Http {
            url: url.to_string(),
            source,
        })?;
        let status = res.status();
        let body = res.text().await.map_err(|source| QueryError::Http {
            url: url.to_string(),
            source,
        })?;
        if !status.is_success() && !raw {
            return Err(QueryError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                body,
            });
        }
        match serde_json::from_str(&body) {
            Ok(value) => Ok(value),
            Err(_) if !status.is_success() => Err(QueryError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                body,
            }),
            Err(source) => Err(QueryError::Json {
                url: url.to_string(),
                body,
                source,
            }),
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post(&self, path: &str, body: &Value) -> Result<Value, QueryError> {
        let url = self.url(path, &[])?;
        log::debug!("POST {url}");
        self.send(self.client.post(url.clone()).json(body), &url, false)
            .await
    }

    async fn get(&self, path: &str, params: &Params) -> Result<Value, QueryError> {
        let url = self.url(path, params)?;
        log::debug!("GET {url}");
        self.send(self.client.get(url.clone()), &url, false).await
    }

    async fn get_raw(&self, path: &str, params: &Params) -> Result<Value, QueryError> {
        let url = self.url(path, params)?;
        log::debug!("GET {url}");
        self.send(self.client.get(url.clone()), &url, true).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_paths_and_params() {
        let builder = LcdBuilder::new("https://cube-lcd.xpla.dev/", "cube_47-5");
        let transport = HttpTransport::new(&builder).unwrap();
        let url = transport
            .url(
                "cosmos/tx/v1beta1/txs",
                &[
                    ("events".to_owned(), "tx.height=5".to_owned()),
                    ("events".to_owned(), "message.sender='xpla1abc'".to_owned()),
                ],
            )
            .unwrap();
        assert_eq!(url.path(), "/cosmos/tx/v1beta1/txs");
        let pairs: Vec<_> = url.query_pairs().into_owned().collect();
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[1].1, "message.sender='xpla1abc'");

        let url = transport.url("/cosmos/tx/v1beta1/simulate", &[]).unwrap();
        assert_eq!(url.as_str(), "https://cube-lcd.xpla.dev/cosmos/tx/v1beta1/simulate");
    }

    #[test]
    fn rejects_bad_referer() {
        let mut builder = LcdBuilder::new("http://localhost:1317", "localxpla");
        builder.set_referer_header(Some("bad\nvalue".to_owned()));
        assert!(matches!(HttpTransport::new(&builder), Err(Error::Validation { .. })));
    }
}
