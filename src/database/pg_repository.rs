use async_trait::async_trait;
use sqlx::{postgres::PgRow, PgPool, Row};
use uuid::Uuid;

use crate::database::repository::Repository;
use crate::error::Result;
use crate::models::role::Role;
use crate::models::shift::{NewShift, Shift, ShiftClosure, ShiftWindow, ShiftWithWorker};
use crate::models::user::{NewUser, User, UserProfilePatch};
use crate::models::worker_zone::{WorkerType, WorkerZone};
use crate::utils::geo::GeoPoint;

const SHIFT_WITH_WORKER_SELECT: &str = r#"
    SELECT s.id, s.user_id, s.clock_in, s.clock_in_lat, s.clock_in_lng, s.clock_in_note,
           s.clock_out, s.clock_out_lat, s.clock_out_lng, s.clock_out_note,
           s.created_at, s.updated_at,
           u.name AS worker_name, u.role AS worker_role
    FROM shifts s
    JOIN users u ON u.id = s.user_id
"#;

#[derive(Clone)]
pub struct PgRepository {
    pool: PgPool,
}

impl PgRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn worker_type_from_row(row: &PgRow) -> std::result::Result<WorkerType, sqlx::Error> {
    let role: Role = row.try_get("role")?;
    let zone = match row.try_get::<Option<Uuid>, _>("zone_id")? {
        Some(id) => Some(WorkerZone {
            id,
            role,
            latitude: row.try_get("latitude")?,
            longitude: row.try_get("longitude")?,
            radius_m: row.try_get("radius_m")?,
            created_at: row.try_get("zone_created_at")?,
            updated_at: row.try_get("zone_updated_at")?,
        }),
        None => None,
    };
    Ok(WorkerType {
        role,
        label: row.try_get("label")?,
        zone,
    })
}

#[async_trait]
impl Repository for PgRepository {
    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn find_user_by_subject(&self, subject: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(r#"SELECT * FROM users WHERE auth_subject = $1"#)
            .bind(subject)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn insert_user(&self, user: NewUser) -> Result<Option<User>> {
        let created = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (auth_subject, name, email, role, picture, additional_data)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (auth_subject) DO NOTHING
            RETURNING *
            "#,
        )
        .bind(&user.auth_subject)
        .bind(&user.name)
        .bind(&user.email)
        .bind(user.role)
        .bind(&user.picture)
        .bind(&user.additional_data)
        .fetch_optional(&self.pool)
        .await?;
        Ok(created)
    }

    async fn update_user_profile(&self, subject: &str, patch: UserProfilePatch) -> Result<Option<User>> {
        let updated = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET name = COALESCE($2, name),
                additional_data = COALESCE($3, additional_data),
                updated_at = NOW()
            WHERE auth_subject = $1
            RETURNING *
            "#,
        )
        .bind(subject)
        .bind(patch.name)
        .bind(patch.additional_data)
        .fetch_optional(&self.pool)
        .await?;
        Ok(updated)
    }

    async fn count_users(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM users"#)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn find_zone_by_role(&self, role: Role) -> Result<Option<WorkerZone>> {
        let zone = sqlx::query_as::<_, WorkerZone>(r#"SELECT * FROM worker_zones WHERE role = $1"#)
            .bind(role)
            .fetch_optional(&self.pool)
            .await?;
        Ok(zone)
    }

    async fn list_worker_types(&self) -> Result<Vec<WorkerType>> {
        let rows = sqlx::query(
            r#"
            SELECT wt.role, wt.label,
                   wz.id AS zone_id, wz.latitude, wz.longitude, wz.radius_m,
                   wz.created_at AS zone_created_at, wz.updated_at AS zone_updated_at
            FROM worker_types wt
            LEFT JOIN worker_zones wz ON wz.role = wt.role
            ORDER BY wt.role
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let types = rows
            .iter()
            .map(worker_type_from_row)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(types)
    }

    async fn upsert_zone(&self, role: Role, center: GeoPoint, radius_m: f64) -> Result<WorkerZone> {
        let zone = sqlx::query_as::<_, WorkerZone>(
            r#"
            INSERT INTO worker_zones (role, latitude, longitude, radius_m)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (role) DO UPDATE
            SET latitude = EXCLUDED.latitude,
                longitude = EXCLUDED.longitude,
                radius_m = EXCLUDED.radius_m,
                updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(role)
        .bind(center.lat)
        .bind(center.lng)
        .bind(radius_m)
        .fetch_one(&self.pool)
        .await?;
        Ok(zone)
    }

    async fn find_open_shift(&self, user_id: Uuid) -> Result<Option<Shift>> {
        let shift = sqlx::query_as::<_, Shift>(
            r#"SELECT * FROM shifts WHERE user_id = $1 AND clock_out IS NULL"#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(shift)
    }

    async fn insert_open_shift(&self, shift: NewShift) -> Result<Option<Shift>> {
        // The partial unique index on open shifts settles concurrent clock-ins.
        let created = sqlx::query_as::<_, Shift>(
            r#"
            INSERT INTO shifts (user_id, clock_in, clock_in_lat, clock_in_lng, clock_in_note)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (user_id) WHERE clock_out IS NULL DO NOTHING
            RETURNING *
            "#,
        )
        .bind(shift.user_id)
        .bind(shift.clock_in)
        .bind(shift.position.lat)
        .bind(shift.position.lng)
        .bind(shift.note)
        .fetch_optional(&self.pool)
        .await?;
        Ok(created)
    }

    async fn close_open_shift(&self, user_id: Uuid, closure: ShiftClosure) -> Result<Option<Shift>> {
        let closed = sqlx::query_as::<_, Shift>(
            r#"
            UPDATE shifts
            SET clock_out = GREATEST($2, clock_in),
                clock_out_lat = $3,
                clock_out_lng = $4,
                clock_out_note = $5,
                updated_at = NOW()
            WHERE user_id = $1 AND clock_out IS NULL
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(closure.clock_out)
        .bind(closure.position.lat)
        .bind(closure.position.lng)
        .bind(closure.note)
        .fetch_optional(&self.pool)
        .await?;
        Ok(closed)
    }

    async fn list_shifts_for_user(&self, user_id: Uuid, limit: i64) -> Result<Vec<Shift>> {
        let shifts = sqlx::query_as::<_, Shift>(
            r#"SELECT * FROM shifts WHERE user_id = $1 ORDER BY clock_in DESC LIMIT $2"#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(shifts)
    }

    async fn list_open_shifts(&self) -> Result<Vec<ShiftWithWorker>> {
        let sql = format!(
            "{} WHERE s.clock_out IS NULL ORDER BY s.clock_in ASC",
            SHIFT_WITH_WORKER_SELECT
        );
        let shifts = sqlx::query_as::<_, ShiftWithWorker>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(shifts)
    }

    async fn list_shifts(&self, window: ShiftWindow) -> Result<Vec<ShiftWithWorker>> {
        let sql = format!(
            r#"{}
            WHERE ($1::timestamptz IS NULL OR s.clock_in >= $1)
              AND ($2::timestamptz IS NULL OR s.clock_in < $2)
            ORDER BY s.clock_in DESC
            LIMIT $3"#,
            SHIFT_WITH_WORKER_SELECT
        );
        let shifts = sqlx::query_as::<_, ShiftWithWorker>(&sql)
            .bind(window.from)
            .bind(window.to)
            .bind(window.limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(shifts)
    }
}
