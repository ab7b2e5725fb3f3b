use contracts::shared::upload_log::UploadLogEntry;
use sea_orm::entity::prelude::*;
use sea_orm::Set;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "a002_upload_log")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub created_at: String,
    pub filename: String,
    pub file_size: i64,
    pub document_kind: Option<String>,
    pub provider: Option<String>,
    pub page_count: Option<i64>,
    pub page_limit: Option<i64>,
    pub candidate_rows: i64,
    pub result_rows: i64,
    pub client_ip: Option<String>,
    pub status: String,
    pub error: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&UploadLogEntry> for ActiveModel {
    fn from(entry: &UploadLogEntry) -> Self {
        ActiveModel {
            id: Set(entry.id.to_string()),
            created_at: Set(entry.created_at.format("%Y-%m-%d %H:%M:%S%.3f").to_string()),
            filename: Set(entry.filename.clone()),
            file_size: Set(entry.file_size as i64),
            document_kind: Set(entry.document_kind.clone()),
            provider: Set(entry.provider.clone()),
            page_count: Set(entry.page_count.map(i64::from)),
            page_limit: Set(entry.page_limit.map(i64::from)),
            candidate_rows: Set(i64::from(entry.candidate_rows)),
            result_rows: Set(i64::from(entry.result_rows)),
            client_ip: Set(entry.client_ip.clone()),
            status: Set(entry.status.as_str().to_string()),
            error: Set(entry.error.clone()),
        }
    }
}

pub async fn insert(conn: &DatabaseConnection, entry: &UploadLogEntry) -> anyhow::Result<()> {
    ActiveModel::from(entry).insert(conn).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::shared::upload_log::UploadStatus;

    #[test]
    fn test_entry_maps_to_active_model() {
        let mut entry = UploadLogEntry::new("report.pdf", 2048);
        entry.page_count = Some(12);
        entry.status = UploadStatus::Failed;
        entry.error = Some("timeout".into());

        let active = ActiveModel::from(&entry);
        assert_eq!(active.id, Set(entry.id.to_string()));
        assert_eq!(active.file_size, Set(2048));
        assert_eq!(active.page_count, Set(Some(12)));
        assert_eq!(active.page_limit, Set(None));
        assert_eq!(active.status, Set("failed".to_string()));
    }
}
