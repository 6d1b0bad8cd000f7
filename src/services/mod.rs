pub mod csv_import_service;
pub mod dashboard_service;
pub mod dataset_cache;
pub mod export_service;
pub mod generator_service;
pub mod ratio_service;
pub mod sample_data_service;
pub mod spreadsheet_service;
