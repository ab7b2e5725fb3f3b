pub mod barcode;
pub mod upload_log;
