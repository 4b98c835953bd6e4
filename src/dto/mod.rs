pub mod attendance_dto;
pub mod dashboard_dto;
pub mod user_dto;
pub mod zone_dto;
