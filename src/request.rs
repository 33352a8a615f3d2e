use reqwest::Method;
use serde::Serialize;

use crate::{MgcError, Result};

/// Ordered query-string pairs. Repeated keys are allowed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `name`, replacing every earlier value for it.
    pub fn set(&mut self, name: &str, value: impl ToString) -> &mut Self {
        self.pairs.retain(|(key, _)| key != name);
        self.pairs.push((name.to_owned(), value.to_string()));
        self
    }

    /// Sets `name` only when a value is present.
    pub fn set_opt<V: ToString>(&mut self, name: &str, value: Option<V>) -> &mut Self {
        if let Some(value) = value {
            self.set(name, value);
        }
        self
    }

    /// Appends a value, keeping earlier values for the same name.
    pub fn push(&mut self, name: &str, value: impl ToString) -> &mut Self {
        self.pairs.push((name.to_owned(), value.to_string()));
        self
    }

    /// Appends one pair per item (`expand=a&expand=b`).
    pub fn push_each<I, V>(&mut self, name: &str, values: I) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: ToString,
    {
        for value in values {
            self.push(name, value);
        }
        self
    }

    /// Sets a comma-joined list (`expand=a,b`). Empty lists are skipped.
    pub fn set_joined<I, V>(&mut self, name: &str, values: I) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: ToString,
    {
        let joined = values
            .into_iter()
            .map(|value| value.to_string())
            .collect::<Vec<_>>()
            .join(",");
        if !joined.is_empty() {
            self.set(name, joined);
        }
        self
    }

    /// Adds the shared `_limit`, `_offset` and `_sort` paging parameters.
    pub fn paging(
        &mut self,
        limit: Option<usize>,
        offset: Option<usize>,
        sort: Option<&str>,
    ) -> &mut Self {
        self.set_opt("_limit", limit)
            .set_opt("_offset", offset)
            .set_opt("_sort", sort)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }
}

/// A single API call, independent of the client that sends it.
///
/// The body is serialized once when attached, so every retry attempt sends
/// identical bytes.
#[derive(Clone, Debug)]
pub struct ApiRequest {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) query: QueryParams,
    pub(crate) body: Option<Vec<u8>>,
    pub(crate) headers: Vec<(String, String)>,
}

impl ApiRequest {
    /// Creates a request for `path`, relative to the client base URL.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: QueryParams::default(),
            body: None,
            headers: Vec::new(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Replaces the query parameters.
    pub fn query(mut self, query: QueryParams) -> Self {
        self.query = query;
        self
    }

    /// Serializes `body` as JSON.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self> {
        self.body = Some(serde_json::to_vec(body).map_err(MgcError::Encode)?);
        Ok(self)
    }

    /// Adds a header sent only with this request.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub(crate) fn prefixed(mut self, base_path: &str) -> Self {
        self.path = format!("{base_path}{}", self.path);
        self
    }
}
