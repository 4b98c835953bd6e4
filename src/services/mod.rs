pub mod analytics_service;
pub mod attendance_service;
pub mod export_service;
pub mod user_service;
pub mod zone_service;
