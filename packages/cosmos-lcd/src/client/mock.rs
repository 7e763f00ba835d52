use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;

use crate::{error::QueryError, Result};

use super::transport::{Params, Transport};

#[derive(Clone, Debug)]
pub(crate) struct Request {
    pub(crate) method: &'static str,
    pub(crate) path: String,
    pub(crate) params: Vec<(String, String)>,
    pub(crate) body: Option<Value>,
}

impl Request {
    pub(crate) fn param(&self, key: &str) -> Vec<&str> {
        self.params
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }
}

type Handler = Box<dyn Fn(&Request) -> Result<Value, QueryError> + Send + Sync>;

/// Records every request and answers from a handler.
pub(crate) struct MockTransport {
    requests: Mutex<Vec<Request>>,
    handler: Handler,
}

impl MockTransport {
    pub(crate) fn new(
        handler: impl Fn(&Request) -> Result<Value, QueryError> + Send + Sync + 'static,
    ) -> Arc<Self> {
        Arc::new(MockTransport {
            requests: Mutex::new(vec![]),
            handler: Box::new(handler),
        })
    }

    pub(crate) fn requests(&self) -> Vec<Request> {
        self.requests.lock().clone()
    }

    /// Number of requests whose path contains `fragment`.
    pub(crate) fn count(&self, fragment: &str) -> usize {
        self.requests
            .lock()
            .iter()
            .filter(|req| req.path.contains(fragment))
            .count()
    }

    fn handle(&self, req: Request) -> Result<Value, QueryError> {
        let res = (self.handler)(&req);
        self.requests.lock().push(req);
        res
    }
}

/// Stand-in for a failed HTTP request.
pub(crate) fn unavailable(path: &str) -> QueryError {
    QueryError::Status {
        url: path.to_owned(),
        status: 503,
        body: "service unavailable".to_owned(),
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn post(&self, path: &str, body: &Value) -> Result<Value, QueryError> {
        self.handle(Request {
            method: "POST",
            path: path.to_owned(),
            params: vec![],
            body: Some(body.clone()),
        })
    }

    async fn get(&self, path: &str, params: &Params) -> Result<Value, QueryError> {
        self.handle(Request {
            method: "GET",
            path: path.to_owned(),
            params: params.to_vec(),
            body: None,
        })
    }

    async fn get_raw(&self, path: &str, params: &Params) -> Result<Value, QueryError> {
        self.handle(Request {
            method: "GET_RAW",
            path: path.to_owned(),
            params: params.to_vec(),
            body: None,
        })
    }
}
