use crate::shared::barcode::{BarLayout, Code39Symbol, FitConfig, RefitTrigger, SymbolFit};
use crate::usecases::u501_extract_stock_report::ResultRow;

/// Этикетка: строка результата + символ Code 39 + состояние автоподбора.
/// Пересчитывается при каждой смене раскладки.
#[derive(Debug, Clone)]
pub struct LabelEntry {
    pub row: ResultRow,
    pub symbol: Code39Symbol,
    fit: SymbolFit,
}

impl LabelEntry {
    pub fn new(row: ResultRow) -> Self {
        let symbol = Code39Symbol::new(&row.article);
        Self {
            row,
            symbol,
            fit: SymbolFit::new(),
        }
    }

    pub fn from_rows(rows: Vec<ResultRow>) -> Vec<Self> {
        rows.into_iter().map(Self::new).collect()
    }

    /// Полезная нагрузка штрихкода: `*ARTICLE*`
    pub fn payload(&self) -> String {
        self.symbol.payload()
    }

    pub fn invalidate(&mut self, trigger: RefitTrigger) {
        self.fit.invalidate(trigger);
    }

    /// Подобрать размер под доступную ширину ячейки
    pub fn refit(&mut self, config: &FitConfig, available_width: f64) -> f64 {
        self.fit.fit_symbol(config, &self.symbol, available_width)
    }

    /// Текущий размер (ширина модуля), если подбор завершён
    pub fn scale(&self) -> Option<f64> {
        self.fit.committed()
    }

    /// Раскладка баров по зафиксированному размеру
    pub fn bar_layout(&self, config: &FitConfig) -> BarLayout {
        let size = self.scale().unwrap_or(config.min_size);
        self.symbol
            .layout(size * self.symbol.total_units() as f64)
    }

    /// Символ не помещается в ячейку даже при минимальном размере
    pub fn overflows(&self, config: &FitConfig, available_width: f64) -> bool {
        self.bar_layout(config).total_width > available_width
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(article: &str) -> ResultRow {
        ResultRow {
            article: article.to_string(),
            description: "Widget".to_string(),
            mpl: 10,
            soh: 4,
        }
    }

    #[test]
    fn test_payload_has_guards() {
        assert_eq!(LabelEntry::new(row("12345")).payload(), "*12345*");
    }

    #[test]
    fn test_refit_after_invalidate() {
        let config = FitConfig::default();
        let mut entry = LabelEntry::new(row("12345"));
        assert_eq!(entry.scale(), None);

        let wide = entry.refit(&config, 600.0);
        entry.invalidate(RefitTrigger::ColumnsChanged);
        assert_eq!(entry.scale(), None);

        let narrow = entry.refit(&config, 200.0);
        assert!(narrow <= wide);
        assert_eq!(entry.scale(), Some(narrow));
        assert!(entry.bar_layout(&config).total_width <= 200.0);
        assert!(!entry.overflows(&config, 200.0));
    }

    #[test]
    fn test_long_article_overflows_narrow_cell() {
        let config = FitConfig::default();
        let mut entry = LabelEntry::new(row("ABCDEFGHIJKLMNOPQRSTUVWXYZ0123"));
        let size = entry.refit(&config, 100.0);
        assert_eq!(size, config.min_size);
        assert!(entry.overflows(&config, 100.0));

        let mut short = LabelEntry::new(row("7"));
        short.refit(&config, 600.0);
        assert!(!short.overflows(&config, 600.0));
    }
}
