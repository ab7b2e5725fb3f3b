pub mod u501_extract_stock_report;
pub mod u502_print_labels;
