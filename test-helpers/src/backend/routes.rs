use actix_web::{
    HttpRequest, HttpResponse, Responder, dev::HttpServiceFactory, get,
    http::StatusCode, post, web,
};
use jiff::civil::Date;
use payloads::requests::LoginCredentials;
use payloads::responses::{LoginToken, UserInfo};
use payloads::{
    Department, LeaveApplication, ListQuery, Payment, PurchaseOrder,
    ResourceAction, UnknownAction,
};
use serde_json::json;

use super::BackendError;
use super::records::Record;
use super::store::{Fault, Store};

pub fn api_services() -> impl HttpServiceFactory {
    web::scope("/api")
        .service(health_check)
        .service(login)
        .service(logout)
        .service(user_info)
        .configure(resource::<Payment>)
        .configure(resource::<Department>)
        .configure(resource::<PurchaseOrder>)
        .configure(resource::<LeaveApplication>)
}

/// `{path}`, `{path}/{id}` and `{path}/{id}/{action}` for one record type.
fn resource<T: Record>(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource(format!("/{}", T::PATH))
            .route(web::get().to(list::<T>))
            .route(web::post().to(create::<T>)),
    )
    .service(
        web::resource(format!("/{}/{{id}}", T::PATH))
            .route(web::put().to(update::<T>))
            .route(web::patch().to(update::<T>))
            .route(web::delete().to(delete::<T>)),
    )
    .service(
        web::resource(format!("/{}/{{id}}/{{action}}", T::PATH))
            .route(web::post().to(action::<T>)),
    );
}

#[get("/health_check")]
pub async fn health_check() -> impl Responder {
    HttpResponse::Ok().body("healthy")
}

fn bearer_token(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get("authorization")?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

fn authenticate(
    req: &HttpRequest,
    store: &Store,
) -> Result<UserInfo, BackendError> {
    let user = bearer_token(req)
        .and_then(|token| store.user_for_token(token))
        .ok_or(BackendError::Unauthorized)?;
    tracing::Span::current()
        .record("user", tracing::field::display(&user.username));
    Ok(user)
}

/// Authenticate, then apply any failure a test has queued.
fn admit(
    req: &HttpRequest,
    store: &Store,
) -> Result<Option<HttpResponse>, BackendError> {
    authenticate(req, store)?;
    match store.take_fault() {
        None => Ok(None),
        Some(Fault::Status(code, detail)) => {
            let status = StatusCode::from_u16(code)
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            Err(BackendError::Injected(status, detail))
        }
        Some(Fault::Reject(message)) => Ok(Some(refusal(&message))),
        Some(Fault::Garbled(page)) => Ok(Some(
            HttpResponse::Ok().content_type("text/html").body(page),
        )),
    }
}

#[tracing::instrument(
    skip(store, details),
    fields(username = %details.username)
)]
#[post("/auth/login")]
pub async fn login(
    details: web::Json<LoginCredentials>,
    store: web::Data<Store>,
) -> Result<HttpResponse, BackendError> {
    let token = store
        .login(&details.username, &details.password)
        .ok_or(BackendError::BadCredentials)?;
    Ok(HttpResponse::Ok().json(LoginToken {
        access_token: token,
        token_type: "bearer".into(),
    }))
}

#[tracing::instrument(skip(req, store))]
#[post("/auth/logout")]
pub async fn logout(
    req: HttpRequest,
    store: web::Data<Store>,
) -> Result<HttpResponse, BackendError> {
    let token = bearer_token(&req).ok_or(BackendError::Unauthorized)?;
    store.logout(token);
    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}

#[tracing::instrument(
    skip(req, store),
    fields(user = tracing::field::Empty)
)]
#[get("/auth/userinfo")]
pub async fn user_info(
    req: HttpRequest,
    store: web::Data<Store>,
) -> Result<HttpResponse, BackendError> {
    let user = authenticate(&req, &store)?;
    Ok(HttpResponse::Ok().json(user))
}

fn refusal(message: &str) -> HttpResponse {
    HttpResponse::Ok().json(json!({ "success": false, "message": message }))
}

/// Whether `record` passes every active filter of `query`.
fn matches<T: Record>(
    record: &T,
    query: &ListQuery,
) -> Result<bool, BackendError> {
    for (key, value) in &query.filters {
        let keep = match key.as_str() {
            "keyword" => {
                let keyword = value.to_lowercase();
                record.keywords().iter().any(|w| w.contains(&keyword))
            }
            "start_date" | "end_date" => {
                let bound: Date = value.parse().map_err(|_| {
                    BackendError::BadRequest(format!("Invalid {key}: {value}"))
                })?;
                match record.date() {
                    Some(date) if key == "start_date" => date >= bound,
                    Some(date) => date <= bound,
                    None => true,
                }
            }
            _ => record.field(key).is_none_or(|field| &field == value),
        };
        if !keep {
            return Ok(false);
        }
    }
    Ok(true)
}

#[tracing::instrument(
    skip(req, store, params),
    fields(resource = T::PATH, user = tracing::field::Empty)
)]
async fn list<T: Record>(
    req: HttpRequest,
    params: web::Query<Vec<(String, String)>>,
    store: web::Data<Store>,
) -> Result<HttpResponse, BackendError> {
    if let Some(rejection) = admit(&req, &store)? {
        return Ok(rejection);
    }
    let query = ListQuery::from_params(params.into_inner());

    let mut tables = store.tables();
    let mut rows = Vec::new();
    for row in T::table(&mut tables).rows.values() {
        if matches(row, &query)? {
            rows.push(row.clone());
        }
    }
    let total = rows.len() as u64;
    let page: Vec<T> = rows
        .into_iter()
        .skip(query.offset())
        .take(query.page_size as usize)
        .collect();
    tracing::debug!(total, returned = page.len(), "listed");
    Ok(HttpResponse::Ok().json(T::envelope(page, total)))
}

#[tracing::instrument(
    skip(req, store, body),
    fields(resource = T::PATH, user = tracing::field::Empty)
)]
async fn create<T: Record>(
    req: HttpRequest,
    body: web::Json<T::Create>,
    store: web::Data<Store>,
) -> Result<HttpResponse, BackendError> {
    if let Some(rejection) = admit(&req, &store)? {
        return Ok(rejection);
    }
    let mut tables = store.tables();
    let table = T::table(&mut tables);
    let id = table.next_id();
    let record = T::create(id, body.into_inner());
    record.validate(table.rows.values())?;
    table.rows.insert(id, record.clone());
    tracing::info!(id, "created");
    Ok(HttpResponse::Created().json(record))
}

fn not_found<T: Record>(id: i64) -> BackendError {
    BackendError::NotFound(format!("{} {id} not found", T::NAME))
}

#[tracing::instrument(
    skip(req, store, body),
    fields(resource = T::PATH, user = tracing::field::Empty)
)]
async fn update<T: Record>(
    req: HttpRequest,
    path: web::Path<i64>,
    body: web::Json<T::Update>,
    store: web::Data<Store>,
) -> Result<HttpResponse, BackendError> {
    if let Some(rejection) = admit(&req, &store)? {
        return Ok(rejection);
    }
    let id = path.into_inner();
    let mut tables = store.tables();
    let table = T::table(&mut tables);
    let mut record = table
        .rows
        .get(&id)
        .cloned()
        .ok_or_else(|| not_found::<T>(id))?;
    record.update(body.into_inner());
    record.validate(
        table
            .rows
            .iter()
            .filter(|(other, _)| **other != id)
            .map(|(_, row)| row),
    )?;
    table.rows.insert(id, record.clone());
    Ok(HttpResponse::Ok().json(record))
}

#[tracing::instrument(
    skip(req, store),
    fields(resource = T::PATH, user = tracing::field::Empty)
)]
async fn delete<T: Record>(
    req: HttpRequest,
    path: web::Path<i64>,
    store: web::Data<Store>,
) -> Result<HttpResponse, BackendError> {
    if let Some(rejection) = admit(&req, &store)? {
        return Ok(rejection);
    }
    let id = path.into_inner();
    T::table(&mut store.tables())
        .rows
        .remove(&id)
        .ok_or_else(|| not_found::<T>(id))?;
    Ok(HttpResponse::NoContent().finish())
}

/// Business-rule violations answer 200 with `success: false`.
#[tracing::instrument(
    skip(req, store),
    fields(resource = T::PATH, user = tracing::field::Empty)
)]
async fn action<T: Record>(
    req: HttpRequest,
    path: web::Path<(i64, String)>,
    store: web::Data<Store>,
) -> Result<HttpResponse, BackendError> {
    if let Some(rejection) = admit(&req, &store)? {
        return Ok(rejection);
    }
    let (id, action) = path.into_inner();
    let action: ResourceAction = action
        .parse()
        .map_err(|e: UnknownAction| BackendError::NotFound(e.to_string()))?;

    let mut tables = store.tables();
    let record = T::table(&mut tables)
        .rows
        .get_mut(&id)
        .ok_or_else(|| not_found::<T>(id))?;
    match record.act(action) {
        Ok(()) => {
            tracing::info!(id, %action, "applied");
            Ok(HttpResponse::Ok()
                .json(json!({ "success": true, "message": "OK" })))
        }
        Err(message) => {
            tracing::info!(id, %action, "refused: {message}");
            Ok(refusal(&message))
        }
    }
}
