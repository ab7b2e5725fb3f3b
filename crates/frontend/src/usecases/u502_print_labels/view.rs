use contracts::shared::barcode::{
    clamp_columns, FitConfig, LabelGrid, RefitScheduler, RefitTrigger, DEFAULT_COLUMNS,
    MAX_COLUMNS, MIN_COLUMNS,
};
use contracts::usecases::common::UseCaseMetadata;
use contracts::usecases::u502_print_labels::{LabelEntry, PrintLabels};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::shared::result_store;

/// Зазор между колонками сетки, px (совпадает с CSS ниже)
const GRID_GAP: f64 = 12.0;
const BAR_HEIGHT: f64 = 56.0;

#[component]
fn LabelCell(entry: LabelEntry, config: FitConfig) -> impl IntoView {
    let layout = entry.bar_layout(&config);
    let svg = entry.symbol.to_svg(&layout, BAR_HEIGHT);
    let counts = format!("MPL {} · SOH {}", entry.row.mpl, entry.row.soh);

    view! {
        <div class="label-cell">
            <div class="label-cell__barcode" inner_html=svg></div>
            <div class="label-cell__payload">{entry.payload()}</div>
            <div class="label-cell__description">{entry.row.description.clone()}</div>
            <div class="label-cell__counts">{counts}</div>
        </div>
    }
}

#[component]
pub fn LabelsPage() -> impl IntoView {
    let config = FitConfig::default();
    let entries = RwSignal::new(LabelEntry::from_rows(result_store::load_rows()));
    let columns = RwSignal::new(DEFAULT_COLUMNS);
    let container = NodeRef::<leptos::html::Div>::new();
    let scheduler = StoredValue::new(RefitScheduler::new());

    // MEASURE → SCALE → COMMIT для всех этикеток по текущей ширине контейнера
    let refit_now = move |triggers: Vec<RefitTrigger>| {
        let Some(element) = container.get_untracked() else {
            return;
        };
        let width = element.get_bounding_client_rect().width();
        let grid = LabelGrid::new(columns.get_untracked(), width, GRID_GAP);
        let available = grid.available_width(&config);

        let mut overflowing = 0usize;
        entries.update(|list| {
            for entry in list.iter_mut() {
                for trigger in &triggers {
                    entry.invalidate(*trigger);
                }
                entry.refit(&config, available);
                if entry.overflows(&config, available) {
                    overflowing += 1;
                }
            }
        });
        log::debug!("Labels refit: {:?}, available width {:.1}px", triggers, available);
        if overflowing > 0 {
            log::warn!(
                "{} label(s) exceed {:.1}px at minimum size and are compressed to fit",
                overflowing,
                available
            );
        }
    };

    // Все события одного тика склеиваются в один перерасчёт
    let schedule = move |trigger: RefitTrigger| {
        let first = scheduler
            .try_update_value(|s| s.request(trigger))
            .unwrap_or(false);
        if first {
            spawn_local(async move {
                let triggers = scheduler.try_update_value(|s| s.flush()).unwrap_or_default();
                if !triggers.is_empty() {
                    refit_now(triggers);
                }
            });
        }
    };

    Effect::new(move |_| {
        columns.track();
        schedule(RefitTrigger::ColumnsChanged);
    });

    let _ = window_event_listener(leptos::ev::resize, move |_| {
        schedule(RefitTrigger::Resized);
    });

    // Перед печатью пересчёт синхронный: раскладка должна совпасть с отпечатком
    let _ = window_event_listener_untyped("beforeprint", move |_| {
        scheduler.update_value(|s| {
            s.flush();
        });
        refit_now(vec![RefitTrigger::BeforePrint]);
    });

    let on_print = move |_| {
        if let Some(window) = web_sys::window() {
            if let Err(e) = window.print() {
                log::warn!("Print failed: {:?}", e);
            }
        }
    };

    let grid_style = move || {
        format!(
            "display:grid;grid-template-columns:repeat({}, minmax(0, 1fr));gap:{}px;",
            columns.get(),
            GRID_GAP
        )
    };

    view! {
        <div class="page page--wide labels-page">
            <div class="labels-toolbar no-print">
                <Flex justify=FlexJustify::SpaceBetween align=FlexAlign::Center>
                    <h2 class="section-title">{PrintLabels::display_name()}</h2>
                    <Flex align=FlexAlign::Center>
                        <label class="form__label">"Columns:"</label>
                        <select
                            class="form__select"
                            prop:value=move || columns.get().to_string()
                            on:change=move |ev| {
                                if let Ok(n) = event_target_value(&ev).parse::<u8>() {
                                    columns.set(clamp_columns(n));
                                }
                            }
                        >
                            {(MIN_COLUMNS..=MAX_COLUMNS)
                                .map(|n| view! { <option value=n.to_string()>{n}</option> })
                                .collect_view()}
                        </select>
                        <Button appearance=ButtonAppearance::Primary on_click=on_print>
                            "Print"
                        </Button>
                    </Flex>
                </Flex>
            </div>

            <div node_ref=container class="labels-grid" style=grid_style>
                {move || {
                    let list = entries.get();
                    if list.is_empty() {
                        view! {
                            <div class="info-box">
                                "No labels yet. Upload a report on the main page first."
                            </div>
                        }
                        .into_any()
                    } else {
                        list.into_iter()
                            .map(|entry| view! { <LabelCell entry=entry config=config /> })
                            .collect_view()
                            .into_any()
                    }
                }}
            </div>
        </div>
    }
}
