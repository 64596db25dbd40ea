pub mod client;
pub mod errors;
pub mod pipeline;
pub mod types;
pub mod user_agent;

pub use client::{build_client, fetch, prepare_headers, read_body};
pub use errors::FetchError;
pub use types::{FetchOutput, HtmlPage};
pub use user_agent::SiteUserAgent;
