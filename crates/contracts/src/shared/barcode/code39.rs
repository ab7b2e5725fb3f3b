//! Code 39 (3 of 9) symbol construction.
//!
//! Каждый символ кодируется 9 элементами (бар/пробел попеременно, начиная с бара),
//! из которых ровно 3 широких. Широкий элемент = 3 модуля, узкий = 1 модуль.
//! Между символами узкий пробел, по краям тихая зона.

use serde::{Deserialize, Serialize};

/// Стартовый/стоповый символ
pub const GUARD: char = '*';

/// Ширина широкого элемента в модулях
pub const WIDE_UNITS: u32 = 3;

/// Ширина узкого элемента в модулях
pub const NARROW_UNITS: u32 = 1;

/// Тихая зона с каждой стороны (в модулях)
pub const QUIET_ZONE_UNITS: u32 = 10;

/// Модулей на один символ: 6 узких + 3 широких
pub const CHAR_UNITS: u32 = 6 * NARROW_UNITS + 3 * WIDE_UNITS;

/// Таблица символов: 'n': узкий элемент, 'w': широкий.
const PATTERNS: [(char, &str); 44] = [
    ('0', "nnnwwnwnn"),
    ('1', "wnnwnnnnw"),
    ('2', "nnwwnnnnw"),
    ('3', "wnwwnnnnn"),
    ('4', "nnnwwnnnw"),
    ('5', "wnnwwnnnn"),
    ('6', "nnwwwnnnn"),
    ('7', "nnnwnnwnw"),
    ('8', "wnnwnnwnn"),
    ('9', "nnwwnnwnn"),
    ('A', "wnnnnwnnw"),
    ('B', "nnwnnwnnw"),
    ('C', "wnwnnwnnn"),
    ('D', "nnnnwwnnw"),
    ('E', "wnnnwwnnn"),
    ('F', "nnwnwwnnn"),
    ('G', "nnnnnwwnw"),
    ('H', "wnnnnwwnn"),
    ('I', "nnwnnwwnn"),
    ('J', "nnnnwwwnn"),
    ('K', "wnnnnnnww"),
    ('L', "nnwnnnnww"),
    ('M', "wnwnnnnwn"),
    ('N', "nnnnwnnww"),
    ('O', "wnnnwnnwn"),
    ('P', "nnwnwnnwn"),
    ('Q', "nnnnnnwww"),
    ('R', "wnnnnnwwn"),
    ('S', "nnwnnnwwn"),
    ('T', "nnnnwnwwn"),
    ('U', "wwnnnnnnw"),
    ('V', "nwwnnnnnw"),
    ('W', "wwwnnnnnn"),
    ('X', "nwnnwnnnw"),
    ('Y', "wwnnwnnnn"),
    ('Z', "nwwnwnnnn"),
    ('-', "nwnnnnwnw"),
    ('.', "wwnnnnwnn"),
    (' ', "nwwnnnwnn"),
    ('$', "nwnwnwnnn"),
    ('/', "nwnwnnnwn"),
    ('+', "nwnnnwnwn"),
    ('%', "nnnwnwnwn"),
    ('*', "nwnnwnwnn"),
];

fn pattern_for(ch: char) -> Option<&'static str> {
    PATTERNS
        .iter()
        .find(|(c, _)| *c == ch)
        .map(|(_, pattern)| *pattern)
}

/// Символ допустим в данных (guard `*` зарезервирован под старт/стоп)
pub fn is_encodable(ch: char) -> bool {
    ch != GUARD && pattern_for(ch).is_some()
}

/// Очистка входной строки: приводим к верхнему регистру, неподдерживаемые символы
/// молча отбрасываем.
pub fn sanitize(input: &str) -> String {
    input
        .chars()
        .flat_map(|c| c.to_uppercase())
        .filter(|c| is_encodable(*c))
        .collect()
}

/// Полезная нагрузка этикетки: `*DATA*`
pub fn guarded_payload(input: &str) -> String {
    format!("{GUARD}{}{GUARD}", sanitize(input))
}

/// Один закрашенный прямоугольник
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub x: f64,
    pub width: f64,
}

/// Результат раскладки символа в пикселях
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarLayout {
    pub module_width: f64,
    pub total_width: f64,
    pub bars: Vec<Bar>,
}

/// Закодированный символ Code 39 (с guard-символами)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Code39Symbol {
    data: String,
}

impl Code39Symbol {
    /// Построить символ из произвольного текста (артикул)
    pub fn new(text: &str) -> Self {
        Self {
            data: sanitize(text),
        }
    }

    /// Данные без guard-символов
    pub fn data(&self) -> &str {
        &self.data
    }

    /// Данные вместе с guard-символами: `*DATA*`
    pub fn payload(&self) -> String {
        format!("{GUARD}{}{GUARD}", self.data)
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Полная ширина символа в модулях, включая тихие зоны
    pub fn total_units(&self) -> u32 {
        let chars = self.data.chars().count() as u32 + 2;
        chars * CHAR_UNITS + (chars - 1) * NARROW_UNITS + 2 * QUIET_ZONE_UNITS
    }

    /// Последовательность элементов (бар?, ширина в модулях) без тихих зон
    fn elements(&self) -> Vec<(bool, u32)> {
        let payload = self.payload();
        let count = payload.chars().count();
        let mut elements = Vec::with_capacity(count * 10);

        for (i, ch) in payload.chars().enumerate() {
            let Some(pattern) = pattern_for(ch) else {
                continue;
            };
            for (j, kind) in pattern.chars().enumerate() {
                let units = if kind == 'w' { WIDE_UNITS } else { NARROW_UNITS };
                elements.push((j % 2 == 0, units));
            }
            if i + 1 < count {
                elements.push((false, NARROW_UNITS));
            }
        }

        elements
    }

    /// Раскладка при заданной ширине модуля (в пикселях)
    pub fn layout_with_module(&self, module_width: f64) -> BarLayout {
        let mut bars = Vec::new();
        let mut x = QUIET_ZONE_UNITS as f64 * module_width;

        for (is_bar, units) in self.elements() {
            let width = units as f64 * module_width;
            if is_bar {
                bars.push(Bar { x, width });
            }
            x += width;
        }

        BarLayout {
            module_width,
            total_width: self.total_units() as f64 * module_width,
            bars,
        }
    }

    /// Раскладка под доступную ширину: ширина модуля = floor(ширина / модули), минимум 1px
    pub fn layout(&self, available_width: f64) -> BarLayout {
        let units = self.total_units() as f64;
        let module_width = (available_width / units).floor().max(1.0);
        self.layout_with_module(module_width)
    }

    /// SVG-представление раскладки.
    /// Шире контейнера не рисуется: сжимается по горизонтали вместе с тихими зонами.
    pub fn to_svg(&self, layout: &BarLayout, height: f64) -> String {
        let mut svg = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" preserveAspectRatio="none" style="max-width:100%" shape-rendering="crispEdges">"#,
            w = layout.total_width,
            h = height
        );
        for bar in &layout.bars {
            svg.push_str(&format!(
                r##"<rect x="{}" y="0" width="{}" height="{}" fill="#000"/>"##,
                bar.x, bar.width, height
            ));
        }
        svg.push_str("</svg>");
        svg
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_pattern_has_three_wide_elements() {
        for (ch, pattern) in PATTERNS.iter() {
            assert_eq!(pattern.len(), 9, "pattern length for {ch:?}");
            let wide = pattern.chars().filter(|c| *c == 'w').count();
            assert_eq!(wide, 3, "wide elements for {ch:?}");
        }
    }

    #[test]
    fn test_patterns_are_unique() {
        for (i, (a, pa)) in PATTERNS.iter().enumerate() {
            for (b, pb) in PATTERNS.iter().skip(i + 1) {
                assert_ne!(pa, pb, "{a:?} and {b:?} share a pattern");
            }
        }
    }

    #[test]
    fn test_sanitize_drops_unsupported() {
        assert_eq!(sanitize("ab-12_3#"), "AB-123");
        assert_eq!(sanitize("*12*"), "12");
        assert_eq!(sanitize("A B/C+%$."), "A B/C+%$.");
    }

    #[test]
    fn test_guarded_payload() {
        assert_eq!(guarded_payload("12345"), "*12345*");
        assert_eq!(Code39Symbol::new("x1").payload(), "*X1*");
    }

    #[test]
    fn test_total_units() {
        // "*1*": 3 символа * 15 + 2 межсимвольных пробела + 2 * 10 тихой зоны
        let symbol = Code39Symbol::new("1");
        assert_eq!(symbol.total_units(), 3 * 15 + 2 + 20);
    }

    #[test]
    fn test_layout_fills_available_width() {
        let symbol = Code39Symbol::new("12345");
        let units = symbol.total_units() as f64;
        let layout = symbol.layout(units * 3.0 + 2.0);
        assert_eq!(layout.module_width, 3.0);
        assert_eq!(layout.total_width, units * 3.0);

        // Последний бар заканчивается ровно перед правой тихой зоной
        let last = layout.bars.last().unwrap();
        assert_eq!(last.x + last.width, (units - QUIET_ZONE_UNITS as f64) * 3.0);
    }

    #[test]
    fn test_layout_minimum_module_is_one_pixel() {
        let symbol = Code39Symbol::new("123456789");
        let layout = symbol.layout(10.0);
        assert_eq!(layout.module_width, 1.0);
    }

    #[test]
    fn test_bar_count() {
        // 5 баров на символ, 3 символа
        let layout = Code39Symbol::new("7").layout_with_module(1.0);
        assert_eq!(layout.bars.len(), 15);
    }

    #[test]
    fn test_svg_contains_rects() {
        let symbol = Code39Symbol::new("7");
        let layout = symbol.layout_with_module(2.0);
        let svg = symbol.to_svg(&layout, 40.0);
        assert!(svg.starts_with("<svg"));
        assert_eq!(svg.matches("<rect").count(), layout.bars.len());
        assert!(svg.contains(r#"viewBox="0 0 134 40""#));
        assert!(svg.contains(r#"preserveAspectRatio="none""#));
        assert!(svg.contains("max-width:100%"));
    }
}
