//! Автоподбор размера штрихкода под ячейку сетки этикеток.
//!
//! Рендер каждого символа проходит цикл INIT → MEASURE → SCALE → COMMIT.
//! Размер (`size`): ширина модуля в пикселях.

use serde::{Deserialize, Serialize};

use super::code39::Code39Symbol;

/// Допустимый диапазон количества колонок сетки
pub const MIN_COLUMNS: u8 = 1;
pub const MAX_COLUMNS: u8 = 6;
pub const DEFAULT_COLUMNS: u8 = 3;

/// Параметры автоподбора
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitConfig {
    /// Базовый размер, в котором символ измеряется
    pub baseline_size: f64,
    pub min_size: f64,
    pub max_size: f64,
    /// Внутренний отступ ячейки (суммарно слева и справа)
    pub cell_padding: f64,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            baseline_size: 2.0,
            min_size: 1.0,
            max_size: 4.0,
            cell_padding: 16.0,
        }
    }
}

impl FitConfig {
    /// SCALE: new_size = baseline × available / measured, с ограничением [min, max]
    pub fn scale(&self, available_width: f64, measured_width: f64) -> f64 {
        if measured_width <= 0.0 || !measured_width.is_finite() {
            return self.min_size;
        }
        let raw = self.baseline_size * available_width.max(0.0) / measured_width;
        raw.clamp(self.min_size, self.max_size)
    }
}

/// Геометрия сетки этикеток
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabelGrid {
    pub columns: u8,
    pub container_width: f64,
    /// Зазор между колонками
    pub gap: f64,
}

impl LabelGrid {
    pub fn new(columns: u8, container_width: f64, gap: f64) -> Self {
        Self {
            columns: clamp_columns(columns),
            container_width,
            gap,
        }
    }

    pub fn cell_width(&self) -> f64 {
        let columns = self.columns.max(1) as f64;
        ((self.container_width - self.gap * (columns - 1.0)) / columns).max(0.0)
    }

    /// Ширина, доступная символу: ячейка минус отступ
    pub fn available_width(&self, config: &FitConfig) -> f64 {
        (self.cell_width() - config.cell_padding).max(0.0)
    }
}

pub fn clamp_columns(columns: u8) -> u8 {
    columns.clamp(MIN_COLUMNS, MAX_COLUMNS)
}

/// Причина повторного подбора
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RefitTrigger {
    ColumnsChanged,
    Resized,
    BeforePrint,
}

/// Фаза state machine подбора
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum FitPhase {
    Init,
    Measure { available: f64 },
    Scale { available: f64, measured: f64 },
    Commit { available: f64, size: f64 },
}

/// Состояние подбора размера для одного символа
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolFit {
    phase: FitPhase,
}

impl Default for SymbolFit {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolFit {
    pub fn new() -> Self {
        Self {
            phase: FitPhase::Init,
        }
    }

    pub fn phase(&self) -> FitPhase {
        self.phase
    }

    /// Зафиксированный размер, если цикл завершён
    pub fn committed(&self) -> Option<f64> {
        match self.phase {
            FitPhase::Commit { size, .. } => Some(size),
            _ => None,
        }
    }

    /// Сброс в INIT по триггеру (смена колонок, resize, печать)
    pub fn invalidate(&mut self, _trigger: RefitTrigger) {
        self.phase = FitPhase::Init;
    }

    /// INIT → MEASURE
    pub fn begin(&mut self, available_width: f64) {
        self.phase = FitPhase::Measure {
            available: available_width,
        };
    }

    /// MEASURE → SCALE: `measured_width`: натуральная ширина символа в базовом размере
    pub fn measured(&mut self, measured_width: f64) {
        if let FitPhase::Measure { available } = self.phase {
            self.phase = FitPhase::Scale {
                available,
                measured: measured_width,
            };
        }
    }

    /// SCALE → COMMIT
    pub fn commit(&mut self, config: &FitConfig) -> Option<f64> {
        if let FitPhase::Scale {
            available,
            measured,
        } = self.phase
        {
            let size = config.scale(available, measured);
            self.phase = FitPhase::Commit { available, size };
        }
        self.committed()
    }

    /// Полный цикл. `measure` получает базовый размер и возвращает измеренную ширину.
    /// При неизменной доступной ширине повторный вызов возвращает прежний размер.
    pub fn run<F>(&mut self, config: &FitConfig, available_width: f64, measure: F) -> f64
    where
        F: FnOnce(f64) -> f64,
    {
        if let FitPhase::Commit { available, size } = self.phase {
            if available == available_width {
                return size;
            }
        }
        self.begin(available_width);
        self.measured(measure(config.baseline_size));
        self.commit(config).unwrap_or(config.min_size)
    }

    /// Цикл для Code 39: натуральная ширина вычисляется из числа модулей
    pub fn fit_symbol(
        &mut self,
        config: &FitConfig,
        symbol: &Code39Symbol,
        available_width: f64,
    ) -> f64 {
        let units = symbol.total_units() as f64;
        self.run(config, available_width, |baseline| baseline * units)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_is_clamped() {
        let config = FitConfig::default();
        assert_eq!(config.scale(10.0, 1000.0), config.min_size);
        assert_eq!(config.scale(100_000.0, 100.0), config.max_size);
        assert_eq!(config.scale(300.0, 200.0), 3.0);
        assert_eq!(config.scale(300.0, 0.0), config.min_size);
    }

    #[test]
    fn test_cell_width() {
        let grid = LabelGrid::new(4, 830.0, 10.0);
        assert_eq!(grid.cell_width(), 200.0);
        assert_eq!(LabelGrid::new(0, 100.0, 0.0).columns, MIN_COLUMNS);
        assert_eq!(LabelGrid::new(9, 100.0, 0.0).columns, MAX_COLUMNS);
    }

    #[test]
    fn test_phases_advance_in_order() {
        let config = FitConfig::default();
        let mut fit = SymbolFit::new();
        assert_eq!(fit.phase(), FitPhase::Init);

        fit.begin(300.0);
        assert_eq!(fit.phase(), FitPhase::Measure { available: 300.0 });

        fit.measured(200.0);
        assert_eq!(
            fit.phase(),
            FitPhase::Scale {
                available: 300.0,
                measured: 200.0
            }
        );

        assert_eq!(fit.commit(&config), Some(3.0));
        fit.invalidate(RefitTrigger::Resized);
        assert_eq!(fit.committed(), None);
    }

    #[test]
    fn test_commit_is_idempotent() {
        let config = FitConfig::default();
        let symbol = Code39Symbol::new("12345");
        let mut fit = SymbolFit::new();
        let first = fit.fit_symbol(&config, &symbol, 250.0);
        let mut measured_again = false;
        let second = fit.run(&config, 250.0, |b| {
            measured_again = true;
            b
        });
        assert_eq!(first, second);
        assert!(!measured_again);
    }

    #[test]
    fn test_size_is_monotonic_in_cell_width() {
        let config = FitConfig::default();
        let symbol = Code39Symbol::new("123456");
        let mut previous = 0.0;
        for columns in (MIN_COLUMNS..=MAX_COLUMNS).rev() {
            let grid = LabelGrid::new(columns, 1200.0, 8.0);
            let mut fit = SymbolFit::new();
            let size = fit.fit_symbol(&config, &symbol, grid.available_width(&config));
            assert!(size >= previous, "columns={columns} size={size} prev={previous}");
            previous = size;
        }
        // При одной колонке упираемся в максимум
        assert_eq!(previous, config.max_size);
    }

    #[test]
    fn test_four_to_two_columns_never_shrinks() {
        let config = FitConfig::default();
        let symbol = Code39Symbol::new("98765");
        let four = LabelGrid::new(4, 800.0, 8.0).available_width(&config);
        let two = LabelGrid::new(2, 800.0, 8.0).available_width(&config);
        let s4 = SymbolFit::new().fit_symbol(&config, &symbol, four);
        let s2 = SymbolFit::new().fit_symbol(&config, &symbol, two);
        assert!(s2 >= s4);
    }

    #[test]
    fn test_fitted_symbol_does_not_overflow() {
        let config = FitConfig::default();
        let symbol = Code39Symbol::new("12345");
        let available = 400.0;
        let size = SymbolFit::new().fit_symbol(&config, &symbol, available);
        let layout = symbol.layout(size * symbol.total_units() as f64);
        assert!(layout.total_width <= available);
    }
}
