//! Штрихкоды для листа этикеток: кодирование Code 39 и автоподбор размера.

pub mod code39;
pub mod layout;
pub mod scheduler;

pub use code39::{guarded_payload, BarLayout, Code39Symbol};
pub use layout::{
    clamp_columns, FitConfig, LabelGrid, RefitTrigger, SymbolFit, DEFAULT_COLUMNS, MAX_COLUMNS,
    MIN_COLUMNS,
};
pub use scheduler::RefitScheduler;
