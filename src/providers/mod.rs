pub mod http;

pub use http::HttpFetchClient;
