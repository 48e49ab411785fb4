use actix_web::{web, HttpRequest, HttpResponse};
use serde_json::{json, Value};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use tracing::info;

use crate::error::AppError;
use crate::models::{Category, CategoryInfo, Principal, Service, ServiceFilter, ServiceStatus};
use crate::state::AppState;
use crate::validation;

const SELECT_SERVICE: &str = "SELECT id, first_name, last_name, address, phone_number1, phone_number2, \
     category, images, description, status, owner_id, created_at FROM services";

fn service_from_row(r: &SqliteRow) -> Result<Service, AppError> {
    Ok(Service {
        id: r.get::<String, _>("id"),
        first_name: r.get::<String, _>("first_name"),
        last_name: r.try_get::<Option<String>, _>("last_name").unwrap_or(None),
        address: r.get::<String, _>("address"),
        phone_number1: r.get::<String, _>("phone_number1"),
        phone_number2: r.try_get::<Option<String>, _>("phone_number2").unwrap_or(None),
        category: serde_json::from_value(Value::String(r.get::<String, _>("category")))?,
        images: serde_json::from_str(&r.get::<String, _>("images"))?,
        description: r.try_get::<Option<String>, _>("description").unwrap_or(None),
        status: serde_json::from_value(Value::String(r.get::<String, _>("status")))?,
        owner_id: r.try_get::<Option<String>, _>("owner_id").unwrap_or(None),
        created_at: r.get::<String, _>("created_at"),
    })
}

async fn find_service(state: &AppState, id: &str) -> Result<Option<Service>, AppError> {
    let row = sqlx::query(&format!("{SELECT_SERVICE} WHERE id = ?"))
        .bind(id)
        .fetch_optional(&state.pool)
        .await?;

    row.as_ref().map(service_from_row).transpose()
}

pub async fn get_categories() -> HttpResponse {
    let categories: Vec<CategoryInfo> = Category::ALL
        .iter()
        .map(|c| CategoryInfo { id: c.as_str(), name: c.display_name() })
        .collect();

    HttpResponse::Ok().json(json!({
        "categories": categories
    }))
}

// POST /api/services
pub async fn create_service(
    req: HttpRequest,
    body: web::Json<Value>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let submission = validation::validate_submission(&body)?;

    let owner_id = super::current_profile(&req, &state)
        .await?
        .as_ref()
        .and_then(Principal::from_profile)
        .map(|p| p.id);

    let service = Service::from_submission(submission, owner_id);

    sqlx::query(
        "INSERT INTO services (id, first_name, last_name, address, phone_number1, phone_number2, \
         category, images, description, status, owner_id, created_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
    )
    .bind(&service.id)
    .bind(&service.first_name)
    .bind(&service.last_name)
    .bind(&service.address)
    .bind(&service.phone_number1)
    .bind(&service.phone_number2)
    .bind(service.category.as_str())
    .bind(serde_json::to_string(&service.images)?)
    .bind(&service.description)
    .bind(service.status.as_str())
    .bind(&service.owner_id)
    .bind(&service.created_at)
    .execute(&state.pool)
    .await?;

    info!(id = %service.id, category = %service.category, "service submitted");

    Ok(HttpResponse::Created().json(service))
}

// GET /api/services
pub async fn list_services(
    query: web::Query<ServiceFilter>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let filter = query.into_inner();

    let category = filter
        .category
        .map(|c| {
            c.parse::<Category>()
                .map_err(|_| AppError::BadRequest(format!("unknown category '{c}'")))
        })
        .transpose()?;
    let status = filter
        .status
        .map(|s| {
            s.parse::<ServiceStatus>()
                .map_err(|_| AppError::BadRequest(format!("unknown status '{s}'")))
        })
        .transpose()?;

    let mut sql = format!("{SELECT_SERVICE} WHERE 1 = 1");
    if category.is_some() {
        sql.push_str(" AND category = ?");
    }
    if status.is_some() {
        sql.push_str(" AND status = ?");
    }
    sql.push_str(" ORDER BY created_at DESC, id");

    let mut q = sqlx::query(&sql);
    if let Some(c) = category {
        q = q.bind(c.as_str());
    }
    if let Some(s) = status {
        q = q.bind(s.as_str());
    }

    let rows = q.fetch_all(&state.pool).await?;
    let items = rows
        .iter()
        .map(service_from_row)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(HttpResponse::Ok().json(items))
}

// GET /api/services/{id}
pub async fn get_service(
    path: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let service = find_service(&state, &id)
        .await?
        .ok_or(AppError::NotFound("service"))?;

    Ok(HttpResponse::Ok().json(service))
}

// PUT /api/services/{id}/status
pub async fn update_status(
    req: HttpRequest,
    path: web::Path<String>,
    body: web::Json<Value>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let moderator = super::current_profile(&req, &state)
        .await?
        .ok_or(AppError::Unauthorized)?;

    let status = validation::validate_status(body.get("status"))?;
    let id = path.into_inner();

    let res = sqlx::query("UPDATE services SET status = ? WHERE id = ?")
        .bind(status.as_str())
        .bind(&id)
        .execute(&state.pool)
        .await?;

    if res.rows_affected() == 0 {
        return Err(AppError::NotFound("service"));
    }

    let moderator_id = Principal::from_profile(&moderator).map(|p| p.id).unwrap_or_default();
    info!(id = %id, status = %status, moderator = %moderator_id, "service status changed");

    let service = find_service(&state, &id)
        .await?
        .ok_or(AppError::NotFound("service"))?;

    Ok(HttpResponse::Ok().json(service))
}
