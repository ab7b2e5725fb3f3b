use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Строка-кандидат, как её вернул провайдер извлечения.
///
/// Числовые ячейки хранятся как есть (`Value`): модель может вернуть число,
/// строку с разделителями тысяч или пустое значение. Приведение к целому
/// выполняет реконсилер.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateRow {
    #[serde(default, deserialize_with = "text_or_number")]
    pub article: String,
    #[serde(default, deserialize_with = "text_or_number")]
    pub description: String,

    /// Значения из колонок с заголовками "MPL"/"SOH"
    #[serde(default)]
    pub header_mpl: Value,
    #[serde(default)]
    pub header_soh: Value,
    #[serde(default, deserialize_with = "text_or_number")]
    pub header_mpl_label: String,
    #[serde(default, deserialize_with = "text_or_number")]
    pub header_soh_label: String,

    /// Три крайние правые числовые ячейки строки: SOH, MPL, Capacity
    #[serde(default)]
    pub tail_soh: Value,
    #[serde(default)]
    pub tail_mpl: Value,
    #[serde(default)]
    pub tail_capacity: Value,

    #[serde(default, deserialize_with = "text_or_number")]
    pub raw_row: String,
}

/// Строковое поле, которое модель иногда отдаёт числом или null
fn text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null => String::new(),
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    })
}
