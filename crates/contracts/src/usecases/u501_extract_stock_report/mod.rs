pub mod request;
pub mod response;

pub use request::{FILE_FIELD, PAGE_LIMIT_FIELD};
pub use response::{ErrorResponse, ResultRow, UploadResponse, RESULT_ROWS_STORAGE_KEY};

use crate::usecases::common::UseCaseMetadata;

pub struct ExtractStockReport;

impl UseCaseMetadata for ExtractStockReport {
    fn usecase_index() -> &'static str {
        "u501"
    }

    fn usecase_name() -> &'static str {
        "extract_stock_report"
    }

    fn display_name() -> &'static str {
        "Low stock report"
    }

    fn description() -> &'static str {
        "Upload a PDF/CSV/XLSX inventory report and keep rows where SOH ≤ MPL"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_name() {
        assert_eq!(ExtractStockReport::full_name(), "u501_extract_stock_report");
    }
}
