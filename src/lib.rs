pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::database::{pg_repository::PgRepository, repository::Repository};
use crate::middleware::{auth::TokenVerifier, rate_limit::RateLimiter};
use crate::services::{
    analytics_service::AnalyticsService,
    attendance_service::{AttendanceService, ClockPolicy},
    user_service::UserService,
    zone_service::ZoneService,
};
use crate::utils::time::report_offset;

#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<dyn Repository>,
    pub users: UserService,
    pub attendance: AttendanceService,
    pub zones: ZoneService,
    pub analytics: AnalyticsService,
    pub verifier: TokenVerifier,
    pub limiter: RateLimiter,
}

impl AppState {
    pub fn new(pool: PgPool, config: &Config) -> Self {
        Self::from_repository(Arc::new(PgRepository::new(pool)), config)
    }

    /// Wires every service onto one shared repository.
    pub fn from_repository(repo: Arc<dyn Repository>, config: &Config) -> Self {
        let offset = report_offset(config.report_utc_offset_minutes);
        let policy = ClockPolicy {
            enforce_clock_out_perimeter: config.enforce_clock_out_perimeter,
            report_offset: offset,
        };

        Self {
            users: UserService::new(repo.clone()),
            attendance: AttendanceService::new(repo.clone(), policy),
            zones: ZoneService::new(repo.clone()),
            analytics: AnalyticsService::new(repo.clone(), offset),
            verifier: TokenVerifier::from_config(config),
            limiter: RateLimiter::new(config.api_rps),
            repo,
        }
    }
}
