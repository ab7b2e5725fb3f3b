/// Количество страниц PDF. `None`, если документ не удалось разобрать.
pub fn pdf_page_count(bytes: &[u8]) -> Option<u32> {
    match lopdf::Document::load_mem(bytes) {
        Ok(document) => u32::try_from(document.get_pages().len()).ok(),
        Err(e) => {
            tracing::debug!(error = %e, "Cannot read PDF page count");
            None
        }
    }
}

/// Итоговое ограничение страниц: min(запрошено, страниц в документе, потолок).
/// Отсутствие запроса или 0 означает "без ограничения".
pub fn effective_page_limit(
    requested: Option<u32>,
    page_count: Option<u32>,
    max_page_limit: u32,
) -> Option<u32> {
    let requested = requested.filter(|&n| n > 0)?;
    let mut limit = requested.min(max_page_limit.max(1));
    if let Some(pages) = page_count.filter(|&p| p > 0) {
        limit = limit.min(pages);
    }
    Some(limit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_page_limit() {
        assert_eq!(effective_page_limit(None, Some(10), 50), None);
        assert_eq!(effective_page_limit(Some(0), Some(10), 50), None);
        assert_eq!(effective_page_limit(Some(3), Some(10), 50), Some(3));
        assert_eq!(effective_page_limit(Some(30), Some(10), 50), Some(10));
        assert_eq!(effective_page_limit(Some(80), None, 50), Some(50));
        assert_eq!(effective_page_limit(Some(5), Some(0), 50), Some(5));
    }

    #[test]
    fn test_garbage_is_not_a_pdf() {
        assert_eq!(pdf_page_count(b"%PDF-1.4 truncated"), None);
        assert_eq!(pdf_page_count(b""), None);
    }
}
