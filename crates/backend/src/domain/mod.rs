pub mod a001_stock_report;
pub mod a002_upload_log;
