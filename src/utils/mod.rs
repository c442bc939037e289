pub mod http;
pub mod logger;

pub use http::{fetch, CurlHttp, HttpFetch, HttpRequest, HttpResponse};
pub use logger::{LogLevel, MemoryLogger, ScanLogger, TracingLogger};
