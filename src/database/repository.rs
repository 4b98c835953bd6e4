use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::role::Role;
use crate::models::shift::{NewShift, Shift, ShiftClosure, ShiftWindow, ShiftWithWorker};
use crate::models::user::{NewUser, User, UserProfilePatch};
use crate::models::worker_zone::{WorkerType, WorkerZone};
use crate::utils::geo::GeoPoint;

/// Persistence boundary of the attendance domain.
///
/// `insert_open_shift` and `close_open_shift` must each be a single atomic
/// statement: the first returns `None` when the user already has an open
/// shift, the second returns `None` when there is none to close.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Repository: Send + Sync {
    /// Cheap liveness probe of the backing store.
    async fn ping(&self) -> Result<()>;

    async fn find_user_by_subject(&self, subject: &str) -> Result<Option<User>>;

    /// Returns `None` if the subject is already registered.
    async fn insert_user(&self, user: NewUser) -> Result<Option<User>>;

    async fn update_user_profile(&self, subject: &str, patch: UserProfilePatch) -> Result<Option<User>>;

    async fn count_users(&self) -> Result<i64>;

    async fn find_zone_by_role(&self, role: Role) -> Result<Option<WorkerZone>>;

    async fn list_worker_types(&self) -> Result<Vec<WorkerType>>;

    async fn upsert_zone(&self, role: Role, center: GeoPoint, radius_m: f64) -> Result<WorkerZone>;

    async fn find_open_shift(&self, user_id: Uuid) -> Result<Option<Shift>>;

    async fn insert_open_shift(&self, shift: NewShift) -> Result<Option<Shift>>;

    async fn close_open_shift(&self, user_id: Uuid, closure: ShiftClosure) -> Result<Option<Shift>>;

    async fn list_shifts_for_user(&self, user_id: Uuid, limit: i64) -> Result<Vec<Shift>>;

    async fn list_open_shifts(&self) -> Result<Vec<ShiftWithWorker>>;

    async fn list_shifts(&self, window: ShiftWindow) -> Result<Vec<ShiftWithWorker>>;
}
