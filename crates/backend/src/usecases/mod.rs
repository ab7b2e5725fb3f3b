pub mod u501_extract_stock_report;
