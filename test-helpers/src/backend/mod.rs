//! An in-memory stand-in for the management backend, served over real HTTP
//! so the client and hooks are exercised end to end.

pub mod records;
pub mod routes;
pub mod store;

use actix_web::dev::{Server, Service, ServiceRequest};
use actix_web::http::StatusCode;
use actix_web::{App, HttpResponse, HttpServer, ResponseError, web};
use serde_json::json;
use std::net::TcpListener;

pub use store::{Fault, RecordedRequest, Store};

/// Build the server, but not await it.
///
/// Returns the port that the server has bound to by modifying the config.
pub fn build(
    config: &mut BackendConfig,
    store: web::Data<Store>,
) -> std::io::Result<Server> {
    // OS assigns the port if binding to 0
    let listener = TcpListener::bind(format!("{}:{}", config.ip, config.port))?;
    config.port = listener.local_addr()?.port();
    let server = HttpServer::new(move || {
        let recorder = store.clone();
        App::new()
            .wrap_fn(move |req, srv| {
                recorder.record(record_request(&req));
                srv.call(req)
            })
            .service(routes::api_services())
            .app_data(store.clone())
    })
    .workers(1)
    .listen(listener)?
    .run();
    Ok(server)
}

fn record_request(req: &ServiceRequest) -> RecordedRequest {
    let query = web::Query::<Vec<(String, String)>>::from_query(
        req.query_string(),
    )
    .map(web::Query::into_inner)
    .unwrap_or_default();
    RecordedRequest {
        method: req.method().to_string(),
        path: req.path().to_string(),
        query,
        authorized: req
            .headers()
            .get("authorization")
            .is_some_and(|value| value.as_bytes().starts_with(b"Bearer ")),
    }
}

pub struct BackendConfig {
    /// set to "0.0.0.0" for public access, "127.0.0.1" for local dev
    pub ip: String,
    /// set to 0 to get an os-assigned port
    pub port: u16,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            ip: "127.0.0.1".into(),
            port: 0,
        }
    }
}

/// Where the client looks by default.
pub const DEFAULT_PORT: u16 = 8000;

impl BackendConfig {
    /// Reads `IP_ADDRESS` and `PORT`; unset ones default to 127.0.0.1 and
    /// [`DEFAULT_PORT`].
    pub fn from_env() -> anyhow::Result<Self> {
        use std::env::var;

        let mut config = Self {
            port: DEFAULT_PORT,
            ..Self::default()
        };
        if let Ok(ip) = var("IP_ADDRESS") {
            config.ip = ip;
        }
        if let Ok(port) = var("PORT") {
            config.port = port
                .parse()
                .map_err(|e| anyhow::anyhow!("PORT {port:?}: {e}"))?;
        }
        Ok(config)
    }
}

/// Errors are answered with a JSON `detail`, the way the real backend does.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("Not authenticated")]
    Unauthorized,
    #[error("Incorrect username or password")]
    BadCredentials,
    #[error("{0}")]
    BadRequest(String),
    /// Field validation failures, sent as a list of `{"msg": ..}` objects.
    #[error("{}", .0.join("; "))]
    Validation(Vec<String>),
    #[error("{0}")]
    NotFound(String),
    /// Queued by a test; `None` sends an empty body.
    #[error("Injected failure")]
    Injected(StatusCode, Option<String>),
}

impl ResponseError for BackendError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized | Self::BadCredentials => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Injected(status, _) => *status,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut response = HttpResponse::build(self.status_code());
        match self {
            Self::Validation(errors) => {
                let detail: Vec<_> =
                    errors.iter().map(|msg| json!({ "msg": msg })).collect();
                response.json(json!({ "detail": detail }))
            }
            Self::Injected(_, None) => response.finish(),
            Self::Injected(_, Some(detail)) => {
                response.json(json!({ "detail": detail }))
            }
            _ => response.json(json!({ "detail": self.to_string() })),
        }
    }
}
