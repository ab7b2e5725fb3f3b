use leptos::prelude::*;

use crate::usecases::u501_extract_stock_report::view::StockReportPage;
use crate::usecases::u502_print_labels::view::LabelsPage;

/// Путь страницы этикеток; открывается в отдельной вкладке
pub const LABELS_PATH: &str = "/labels";

fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_default()
}

#[component]
pub fn App() -> impl IntoView {
    let path = current_path();
    let is_labels = path.trim_end_matches('/').ends_with(LABELS_PATH);

    view! {
        <Show
            when=move || is_labels
            fallback=|| view! { <StockReportPage /> }
        >
            <LabelsPage />
        </Show>
    }
}
