pub mod label;

pub use label::LabelEntry;

use crate::usecases::common::UseCaseMetadata;

pub struct PrintLabels;

impl UseCaseMetadata for PrintLabels {
    fn usecase_index() -> &'static str {
        "u502"
    }

    fn usecase_name() -> &'static str {
        "print_labels"
    }

    fn display_name() -> &'static str {
        "Barcode labels"
    }
}
