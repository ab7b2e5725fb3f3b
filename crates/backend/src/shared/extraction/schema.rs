//! Схема структурированного ответа и текст инструкций для модели.

use serde_json::{json, Value};

/// Имя схемы в запросе structured output
pub const SCHEMA_NAME: &str = "stock_report_rows";

/// Поля строки-кандидата в порядке, в котором их описывает схема
pub const CANDIDATE_FIELDS: [&str; 10] = [
    "article",
    "description",
    "header_mpl",
    "header_soh",
    "header_mpl_label",
    "header_soh_label",
    "tail_soh",
    "tail_mpl",
    "tail_capacity",
    "raw_row",
];

/// Строгая JSON-схема: все поля обязательны, лишние запрещены
pub fn candidate_rows_schema() -> Value {
    let mut properties = serde_json::Map::new();
    for field in CANDIDATE_FIELDS {
        let kind = match field {
            "header_mpl" | "header_soh" | "tail_soh" | "tail_mpl" | "tail_capacity" => "integer",
            _ => "string",
        };
        properties.insert(field.to_string(), json!({ "type": kind }));
    }

    json!({
        "type": "object",
        "additionalProperties": false,
        "required": ["rows"],
        "properties": {
            "rows": {
                "type": "array",
                "items": {
                    "type": "object",
                    "additionalProperties": false,
                    "required": CANDIDATE_FIELDS,
                    "properties": properties,
                }
            }
        }
    })
}

const BASE_INSTRUCTIONS: &str = r#"You are reading a retail inventory report. Return every product row of the stock table as JSON matching the provided schema. Do not skip rows and do not invent rows.

For each row:
- article: the article / item number exactly as printed.
- description: the product description exactly as printed, including any short supplier code at the start.
- header_mpl, header_soh: the values from the columns whose header text is exactly "MPL" and exactly "SOH". Never take these values from a column with any other header (for example "Capacity", "OM", "Min", "Max").
- header_mpl_label, header_soh_label: the exact header text of the columns you used for header_mpl and header_soh.
- tail_soh, tail_mpl, tail_capacity: the three right-most numeric cells of the row, read strictly by position from left to right. Do not relabel or reorder them, even if they look inconsistent with the headers.
- raw_row: the full row text as printed, cells separated by single spaces.

Numbers:
- Return integers only. Remove thousands separators.
- A blank cell is 0. Never return null for a numeric field.

If the document contains no stock table, return {"rows": []}."#;

/// Инструкции для модели; при ограничении страниц добавляется требование
/// смотреть только первые N страниц
pub fn build_instructions(page_limit: Option<u32>) -> String {
    match page_limit {
        Some(pages) if pages > 0 => format!(
            "{BASE_INSTRUCTIONS}\n\nOnly read the first {pages} page(s) of the document and ignore the rest."
        ),
        _ => BASE_INSTRUCTIONS.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_requires_every_candidate_field() {
        let schema = candidate_rows_schema();
        let items = &schema["properties"]["rows"]["items"];
        let required: Vec<&str> = items["required"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        assert_eq!(required, CANDIDATE_FIELDS.to_vec());
        assert_eq!(items["properties"]["tail_capacity"]["type"], "integer");
        assert_eq!(items["properties"]["raw_row"]["type"], "string");
        assert_eq!(items["additionalProperties"], false);
    }

    #[test]
    fn test_page_limit_instruction() {
        assert!(build_instructions(Some(3)).contains("first 3 page(s)"));
        assert!(!build_instructions(None).contains("first"));
        assert!(!build_instructions(Some(0)).contains("page(s)"));
    }
}
