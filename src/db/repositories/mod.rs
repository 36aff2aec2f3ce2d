pub mod operational_record_repository;
pub mod report_repository;
pub mod settings_repository;
