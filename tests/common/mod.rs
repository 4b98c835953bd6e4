#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::Value as JsonValue;
use tower::ServiceExt;
use uuid::Uuid;

use shiftclock_backend::{
    config::Config,
    database::repository::Repository,
    error::{Error, Result},
    middleware::auth::Claims,
    models::{
        role::Role,
        shift::{NewShift, Shift, ShiftClosure, ShiftWindow, ShiftWithWorker},
        user::{NewUser, User, UserProfilePatch},
        worker_zone::{WorkerType, WorkerZone},
    },
    routes,
    utils::geo::GeoPoint,
    AppState,
};

pub const JWT_SECRET: &str = "test_secret_key";

#[derive(Default)]
struct Store {
    users: Vec<User>,
    zones: HashMap<Role, WorkerZone>,
    shifts: Vec<Shift>,
}

/// Repository held in memory. Every method takes the lock once, so shift
/// creation and closure are atomic like the Postgres statements.
#[derive(Default)]
pub struct InMemoryRepository {
    store: Mutex<Store>,
    offline: bool,
}

impl InMemoryRepository {
    /// A repository whose liveness probe always fails.
    pub fn offline() -> Self {
        Self {
            offline: true,
            ..Self::default()
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Store>> {
        self.store
            .lock()
            .map_err(|_| Error::Internal("store lock poisoned".into()))
    }

    fn with_worker(store: &Store, shift: &Shift) -> Option<ShiftWithWorker> {
        let user = store.users.iter().find(|u| u.id == shift.user_id)?;
        Some(ShiftWithWorker {
            shift: shift.clone(),
            worker_name: user.name.clone(),
            worker_role: user.role,
        })
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn ping(&self) -> Result<()> {
        if self.offline {
            return Err(Error::Internal("database offline".into()));
        }
        Ok(())
    }

    async fn find_user_by_subject(&self, subject: &str) -> Result<Option<User>> {
        let store = self.lock()?;
        Ok(store.users.iter().find(|u| u.auth_subject == subject).cloned())
    }

    async fn insert_user(&self, user: NewUser) -> Result<Option<User>> {
        let mut store = self.lock()?;
        if store.users.iter().any(|u| u.auth_subject == user.auth_subject) {
            return Ok(None);
        }
        let now = Utc::now();
        let created = User {
            id: Uuid::new_v4(),
            auth_subject: user.auth_subject,
            name: user.name,
            email: user.email,
            role: user.role,
            picture: user.picture,
            additional_data: user.additional_data,
            created_at: now,
            updated_at: now,
        };
        store.users.push(created.clone());
        Ok(Some(created))
    }

    async fn update_user_profile(&self, subject: &str, patch: UserProfilePatch) -> Result<Option<User>> {
        let mut store = self.lock()?;
        let Some(user) = store.users.iter_mut().find(|u| u.auth_subject == subject) else {
            return Ok(None);
        };
        if let Some(name) = patch.name {
            user.name = name;
        }
        if let Some(extra) = patch.additional_data {
            user.additional_data = Some(extra);
        }
        user.updated_at = Utc::now();
        Ok(Some(user.clone()))
    }

    async fn count_users(&self) -> Result<i64> {
        Ok(self.lock()?.users.len() as i64)
    }

    async fn find_zone_by_role(&self, role: Role) -> Result<Option<WorkerZone>> {
        Ok(self.lock()?.zones.get(&role).cloned())
    }

    async fn list_worker_types(&self) -> Result<Vec<WorkerType>> {
        let store = self.lock()?;
        Ok(Role::ALL
            .into_iter()
            .map(|role| WorkerType {
                role,
                label: Some(role.as_str().to_string()),
                zone: store.zones.get(&role).cloned(),
            })
            .collect())
    }

    async fn upsert_zone(&self, role: Role, center: GeoPoint, radius_m: f64) -> Result<WorkerZone> {
        let mut store = self.lock()?;
        let now = Utc::now();
        let zone = match store.zones.get(&role) {
            Some(existing) => WorkerZone {
                latitude: center.lat,
                longitude: center.lng,
                radius_m,
                updated_at: now,
                ..existing.clone()
            },
            None => WorkerZone {
                id: Uuid::new_v4(),
                role,
                latitude: center.lat,
                longitude: center.lng,
                radius_m,
                created_at: now,
                updated_at: now,
            },
        };
        store.zones.insert(role, zone.clone());
        Ok(zone)
    }

    async fn find_open_shift(&self, user_id: Uuid) -> Result<Option<Shift>> {
        let store = self.lock()?;
        Ok(store
            .shifts
            .iter()
            .find(|s| s.user_id == user_id && s.is_open())
            .cloned())
    }

    async fn insert_open_shift(&self, shift: NewShift) -> Result<Option<Shift>> {
        let mut store = self.lock()?;
        if store.shifts.iter().any(|s| s.user_id == shift.user_id && s.is_open()) {
            return Ok(None);
        }
        let created = Shift {
            id: Uuid::new_v4(),
            user_id: shift.user_id,
            clock_in: shift.clock_in,
            clock_in_lat: shift.position.lat,
            clock_in_lng: shift.position.lng,
            clock_in_note: shift.note,
            clock_out: None,
            clock_out_lat: None,
            clock_out_lng: None,
            clock_out_note: None,
            created_at: shift.clock_in,
            updated_at: shift.clock_in,
        };
        store.shifts.push(created.clone());
        Ok(Some(created))
    }

    async fn close_open_shift(&self, user_id: Uuid, closure: ShiftClosure) -> Result<Option<Shift>> {
        let mut store = self.lock()?;
        let Some(shift) = store
            .shifts
            .iter_mut()
            .find(|s| s.user_id == user_id && s.is_open())
        else {
            return Ok(None);
        };
        shift.clock_out = Some(closure.clock_out.max(shift.clock_in));
        shift.clock_out_lat = Some(closure.position.lat);
        shift.clock_out_lng = Some(closure.position.lng);
        shift.clock_out_note = closure.note;
        shift.updated_at = Utc::now();
        Ok(Some(shift.clone()))
    }

    async fn list_shifts_for_user(&self, user_id: Uuid, limit: i64) -> Result<Vec<Shift>> {
        let store = self.lock()?;
        let mut shifts: Vec<Shift> = store
            .shifts
            .iter()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect();
        shifts.sort_by(|a, b| b.clock_in.cmp(&a.clock_in));
        shifts.truncate(limit.max(0) as usize);
        Ok(shifts)
    }

    async fn list_open_shifts(&self) -> Result<Vec<ShiftWithWorker>> {
        let store = self.lock()?;
        let mut open: Vec<ShiftWithWorker> = store
            .shifts
            .iter()
            .filter(|s| s.is_open())
            .filter_map(|s| Self::with_worker(&store, s))
            .collect();
        open.sort_by(|a, b| a.shift.clock_in.cmp(&b.shift.clock_in));
        Ok(open)
    }

    async fn list_shifts(&self, window: ShiftWindow) -> Result<Vec<ShiftWithWorker>> {
        let store = self.lock()?;
        let mut rows: Vec<ShiftWithWorker> = store
            .shifts
            .iter()
            .filter(|s| window.from.map_or(true, |from| s.clock_in >= from))
            .filter(|s| window.to.map_or(true, |to| s.clock_in < to))
            .filter_map(|s| Self::with_worker(&store, s))
            .collect();
        rows.sort_by(|a, b| b.shift.clock_in.cmp(&a.shift.clock_in));
        rows.truncate(window.limit.max(0) as usize);
        Ok(rows)
    }
}

pub fn test_config() -> Config {
    Config {
        server_address: "127.0.0.1:0".into(),
        database_url: "postgres://unused".into(),
        db_max_connections: 1,
        jwt_secret: JWT_SECRET.into(),
        jwt_issuer: None,
        jwt_audience: None,
        api_rps: 1000,
        report_utc_offset_minutes: 0,
        enforce_clock_out_perimeter: false,
        cors_allowed_origin: None,
    }
}

pub fn app_with(repo: Arc<InMemoryRepository>, config: &Config) -> Router {
    routes::router(AppState::from_repository(repo, config))
}

pub fn app() -> Router {
    app_with(Arc::new(InMemoryRepository::default()), &test_config())
}

pub fn token_for(subject: &str, name: &str) -> String {
    let claims = Claims {
        sub: subject.to_string(),
        exp: (Utc::now().timestamp() + 3600) as usize,
        name: Some(name.to_string()),
        email: Some(format!("{}@hospital.test", subject.replace('|', "_"))),
        picture: None,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .expect("encode token")
}

pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<JsonValue>,
) -> (StatusCode, JsonValue) {
    let (status, _, bytes) = send_raw(app, method, uri, token, body).await;
    let json = if bytes.is_empty() {
        JsonValue::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, json)
}

pub async fn send_raw(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<JsonValue>,
) -> (StatusCode, Option<String>, Vec<u8>) {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        req = req.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let req = match body {
        Some(body) => req
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => req.body(Body::empty()),
    }
    .expect("request");

    let resp = app.clone().oneshot(req).await.expect("response");
    let status = resp.status();
    let content_type = resp
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.expect("body");
    (status, content_type, bytes.to_vec())
}
