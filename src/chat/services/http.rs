//! # HTTP Transport
//!
//! The wire seam of the request task. A transport connects and returns a
//! response whose body is read in a separate step, so the task can check
//! for cancellation in between.

use super::error::RequestError;
use crate::config::{CONNECT_TIMEOUT, READ_TIMEOUT};
use anyhow::{Context, Result};
use reqwest::{Method, StatusCode};

/// One request against the board endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct BoardRequest {
    pub method: Method,
    pub url: String,
    pub body: Option<Vec<u8>>,
}

impl BoardRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            body: None,
        }
    }

    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }
}

/// A connected response whose body has not been read yet
pub trait TransportResponse: Send {
    fn status(&self) -> StatusCode;

    /// Read the full body; consumes the response and releases the connection
    fn read_body(self: Box<Self>) -> Result<String, RequestError>;
}

/// Sends board requests
pub trait BoardTransport: Send + Sync {
    fn connect(&self, request: BoardRequest) -> Result<Box<dyn TransportResponse>, RequestError>;
}

/// Blocking reqwest transport with the fixed client timeouts
///
/// Must be created and used outside of an async runtime context.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self> {
        // The blocking builder has no separate read timeout; the read budget
        // is granted on top of the connect budget as a whole-request limit.
        let client = reqwest::blocking::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(CONNECT_TIMEOUT + READ_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;
        tracing::debug!("HTTP client created");
        Ok(Self { client })
    }
}

impl BoardTransport for HttpTransport {
    fn connect(&self, request: BoardRequest) -> Result<Box<dyn TransportResponse>, RequestError> {
        tracing::debug!("{} {}", request.method, request.url);

        let mut builder = self.client.request(request.method, &request.url);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send()?;
        Ok(Box::new(response))
    }
}

impl TransportResponse for reqwest::blocking::Response {
    fn status(&self) -> StatusCode {
        reqwest::blocking::Response::status(self)
    }

    fn read_body(self: Box<Self>) -> Result<String, RequestError> {
        Ok((*self).text()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn board_request_should_carry_optional_body() {
        let get = BoardRequest::new(Method::GET, "http://example.com/board");
        assert!(get.body.is_none());

        let post = BoardRequest::new(Method::POST, "http://example.com/board")
            .with_body(b"{}".to_vec());
        assert_eq!(post.body.as_deref(), Some(&b"{}"[..]));
        assert_eq!(post.method, Method::POST);
    }

    #[test]
    fn http_transport_should_build_outside_runtime() {
        assert!(HttpTransport::new().is_ok());
    }
}
