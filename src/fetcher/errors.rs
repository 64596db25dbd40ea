use reqwest::{StatusCode, header::HeaderMap};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("dns failure: {0}")]
    Dns(String),

    #[error("connect timeout")]
    ConnectTimeout,

    #[error("request timeout")]
    RequestTimeout,

    #[error("too many redirects")]
    RedirectLoop,

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("unsuccessful http status {status}")]
    Http { status: StatusCode, headers: HeaderMap },

    #[error("body too large ({0} bytes)")]
    BodyTooLarge(u64),

    #[error("unable to handle content-type: {0:?}")]
    UnsupportedContentType(String),

    #[error("http client error: {0}")]
    Client(String),

    #[error("io error: {0}")]
    Io(String),

    #[error("unknown: {0}")]
    Unknown(String),
}

impl FetchError {
    pub fn from_reqwest_error(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            if err.is_connect() {
                Self::ConnectTimeout
            } else {
                Self::RequestTimeout
            }
        } else if err.is_redirect() {
            Self::RedirectLoop
        } else if err.is_builder() {
            Self::Client(err.to_string())
        } else if err.is_body() || err.is_decode() {
            Self::InvalidResponse(err.to_string())
        } else if err.is_request() || err.is_connect() {
            // DNS, connection errors
            Self::Dns(err.to_string())
        } else {
            Self::Unknown(err.to_string())
        }
    }

    /// Status code for `Http` errors.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}
