use contracts::usecases::common::UseCaseMetadata;
use contracts::usecases::u501_extract_stock_report::{ExtractStockReport, ResultRow};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use super::api;
use crate::app::LABELS_PATH;
use crate::shared::result_store;

fn parse_page_limit(text: &str) -> Option<u32> {
    text.trim().parse::<u32>().ok().filter(|n| *n > 0)
}

#[component]
fn ResultTable(rows: Vec<ResultRow>) -> impl IntoView {
    if rows.is_empty() {
        return view! {
            <div class="info-box">"No matches: no rows with SOH ≤ MPL were found in this report."</div>
        }
        .into_any();
    }

    let count = rows.len();
    view! {
        <div>
            <Flex justify=FlexJustify::SpaceBetween align=FlexAlign::Center>
                <span class="section-subtitle">{format!("{count} row(s) with SOH ≤ MPL")}</span>
                <a class="button-link" href=LABELS_PATH target="_blank" rel="noopener">
                    "Print labels"
                </a>
            </Flex>
            <table class="table">
                <thead>
                    <tr>
                        <th>"Article"</th>
                        <th>"Description"</th>
                        <th class="table__cell--number">"MPL"</th>
                        <th class="table__cell--number">"SOH"</th>
                    </tr>
                </thead>
                <tbody>
                    {rows
                        .into_iter()
                        .map(|row| {
                            view! {
                                <tr>
                                    <td>{row.article}</td>
                                    <td>{row.description}</td>
                                    <td class="table__cell--number">{row.mpl}</td>
                                    <td class="table__cell--number">{row.soh}</td>
                                </tr>
                            }
                        })
                        .collect_view()}
                </tbody>
            </table>
        </div>
    }
    .into_any()
}

#[component]
pub fn StockReportPage() -> impl IntoView {
    let file_input = NodeRef::<leptos::html::Input>::new();
    let (page_limit, set_page_limit) = signal(String::new());
    let (is_loading, set_is_loading) = signal(false);
    let (error_msg, set_error_msg) = signal(String::new());

    // Последний результат из localStorage; None: загрузок ещё не было
    let stored = result_store::load_rows();
    let (rows, set_rows) = signal((!stored.is_empty()).then_some(stored));

    let on_upload = move |_| {
        let file = file_input
            .get_untracked()
            .and_then(|input| input.files())
            .and_then(|files| files.get(0));
        let Some(file) = file else {
            set_error_msg.set("Choose a report file first".to_string());
            return;
        };

        let limit = parse_page_limit(&page_limit.get_untracked());
        set_is_loading.set(true);
        set_error_msg.set(String::new());

        spawn_local(async move {
            match api::extract(file, limit).await {
                Ok(result) => {
                    log::info!("Extraction returned {} row(s)", result.len());
                    result_store::save_rows(&result);
                    set_rows.set(Some(result));
                }
                Err(e) => {
                    log::warn!("Extraction failed: {e:?}");
                    set_error_msg.set(e.to_string());
                }
            }
            set_is_loading.set(false);
        });
    };

    let upload_disabled = Signal::derive(move || is_loading.get());

    view! {
        <div class="page page--wide">
            <div class="card">
                <div class="card__body">
                    <Flex justify=FlexJustify::SpaceBetween align=FlexAlign::Center>
                        <h2 class="section-title">{ExtractStockReport::display_name()}</h2>
                        <Button
                            appearance=ButtonAppearance::Primary
                            on_click=on_upload
                            disabled=upload_disabled
                        >
                            {move || if is_loading.get() { "Processing..." } else { "Upload" }}
                        </Button>
                    </Flex>

                    <div class="form-section-group">
                        <div class="form__group">
                            <label class="form__label">"Report (PDF, CSV or XLSX):"</label>
                            <input
                                node_ref=file_input
                                class="form__input"
                                type="file"
                                accept=".pdf,.csv,.xlsx,application/pdf,text/csv"
                                prop:disabled=move || is_loading.get()
                            />
                        </div>
                        <div class="form__group">
                            <label class="form__label">"Read only the first N pages (optional):"</label>
                            <input
                                class="form__input"
                                type="number"
                                min="1"
                                placeholder="all pages"
                                prop:value=move || page_limit.get()
                                on:input=move |ev| set_page_limit.set(event_target_value(&ev))
                                prop:disabled=move || is_loading.get()
                            />
                        </div>
                    </div>

                    {move || {
                        let err = error_msg.get();
                        (!err.is_empty()).then(|| view! {
                            <div class="warning-box warning-box--error">
                                <span class="warning-box__icon">"⚠"</span>
                                <span class="warning-box__text">{err}</span>
                            </div>
                        })
                    }}

                    {move || rows.get().map(|rows| view! { <ResultTable rows=rows /> })}
                </div>
            </div>
        </div>
    }
}
