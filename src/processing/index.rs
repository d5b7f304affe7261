//! Index lifecycle: schema, recreation, and uploads for [`DocumentRecord`]s.

use crate::{
    processing::types::DocumentRecord,
    search::{
        DeleteOutcome, IndexDefinition, IndexField, SearchError, SearchHit, SearchQuery,
        SearchService, UploadSummary,
    },
};

/// Key field.
pub const FIELD_ID: &str = "Id";
/// Topic tag field.
pub const FIELD_TOPIC: &str = "Topic";
/// Title field.
pub const FIELD_TITLE: &str = "Title";
/// Link field.
pub const FIELD_LINK: &str = "Link";
/// Author field.
pub const FIELD_AUTHOR: &str = "Author";
/// Summary field.
pub const FIELD_SUMMARY: &str = "Summary";
/// Sentiment field.
pub const FIELD_SENTIMENT: &str = "Sentiment";

/// Fixed schema for the record index: a filterable key plus six searchable strings.
pub fn index_schema(name: &str) -> IndexDefinition {
    IndexDefinition {
        name: name.to_string(),
        fields: vec![
            IndexField::key(FIELD_ID),
            IndexField::searchable(FIELD_TOPIC),
            IndexField::searchable(FIELD_TITLE),
            IndexField::searchable(FIELD_LINK),
            IndexField::searchable(FIELD_AUTHOR),
            IndexField::searchable(FIELD_SUMMARY),
            IndexField::searchable(FIELD_SENTIMENT),
        ],
    }
}

/// Owns the search client and the name of the index it manages.
pub struct IndexManager {
    search: SearchService,
    index_name: String,
}

impl IndexManager {
    /// Manage `index_name` through `search`.
    pub fn new(search: SearchService, index_name: impl Into<String>) -> Self {
        Self {
            search,
            index_name: index_name.into(),
        }
    }

    /// Name of the managed index.
    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    /// Drop any existing index and create it afresh with [`index_schema`].
    ///
    /// A missing index is logged and ignored; other deletion failures are returned.
    pub async fn create_index(&self) -> Result<(), SearchError> {
        match self.search.delete_index(&self.index_name).await? {
            DeleteOutcome::Deleted => {
                tracing::debug!(index = %self.index_name, "Removed previous index");
            }
            DeleteOutcome::NotFound => {
                tracing::info!(index = %self.index_name, "Index does not exist; nothing to delete");
            }
        }

        self.search
            .create_index(&index_schema(&self.index_name))
            .await?;
        tracing::info!(index = %self.index_name, "Index created successfully");
        Ok(())
    }

    /// Upload records keyed by `Id`. An empty batch is a no-op.
    pub async fn add_documents(
        &self,
        documents: &[DocumentRecord],
    ) -> Result<UploadSummary, SearchError> {
        if documents.is_empty() {
            tracing::info!(index = %self.index_name, "No documents to upload");
            return Ok(UploadSummary::default());
        }

        let summary = self
            .search
            .upload_documents(&self.index_name, documents)
            .await?;
        if summary.failed > 0 {
            tracing::warn!(
                index = %self.index_name,
                succeeded = summary.succeeded,
                failed = summary.failed,
                "Some documents were not uploaded"
            );
        } else {
            tracing::info!(
                index = %self.index_name,
                documents = summary.succeeded,
                "Documents uploaded successfully to index"
            );
        }
        Ok(summary)
    }

    /// Query the managed index.
    pub async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchHit>, SearchError> {
        self.search.search(&self.index_name, query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::{
        Method::{DELETE, POST},
        MockServer,
    };
    use serde_json::json;

    fn manager_for(server: &MockServer) -> IndexManager {
        let search = SearchService::new(&server.base_url(), "admin-key").expect("search client");
        IndexManager::new(search, "brain")
    }

    #[test]
    fn schema_has_one_filterable_key_and_six_searchable_fields() {
        let schema = index_schema("brain");
        assert_eq!(schema.name, "brain");
        assert_eq!(schema.fields.len(), 7);

        let keys: Vec<_> = schema.fields.iter().filter(|f| f.key).collect();
        assert_eq!(keys.len(), 1);
        assert_eq!(keys[0].name, FIELD_ID);
        assert!(keys[0].filterable);

        assert!(
            schema
                .fields
                .iter()
                .filter(|f| !f.key)
                .all(|f| f.searchable)
        );

        let encoded = serde_json::to_value(&schema).expect("json");
        assert_eq!(encoded["fields"][0]["type"], json!("Edm.String"));
    }

    #[test]
    fn records_serialize_with_schema_field_names() {
        let record = DocumentRecord {
            id: "1".into(),
            topic: "learning".into(),
            ..Default::default()
        };
        let encoded = serde_json::to_value(&record).expect("json");
        let object = encoded.as_object().expect("object");
        for field in index_schema("brain").fields {
            assert!(object.contains_key(&field.name), "missing {}", field.name);
        }
    }

    #[tokio::test]
    async fn recreating_twice_only_logs_missing_index() {
        let server = MockServer::start_async().await;
        let delete = server
            .mock_async(|when, then| {
                when.method(DELETE).path("/indexes/brain");
                then.status(404);
            })
            .await;
        let create = server
            .mock_async(|when, then| {
                when.method(POST).path("/indexes");
                then.status(201).json_body(json!({ "name": "brain" }));
            })
            .await;

        let manager = manager_for(&server);
        manager.create_index().await.expect("first");
        manager.create_index().await.expect("second");

        delete.assert_hits(2);
        create.assert_hits(2);
    }

    #[tokio::test]
    async fn deletion_failure_other_than_missing_propagates() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(DELETE).path("/indexes/brain");
                then.status(503).body("service unavailable");
            })
            .await;
        let create = server
            .mock_async(|when, then| {
                when.method(POST).path("/indexes");
                then.status(201);
            })
            .await;

        let error = manager_for(&server).create_index().await.expect_err("503");
        assert!(matches!(error, SearchError::UnexpectedStatus { .. }));
        create.assert_hits(0);
    }

    #[tokio::test]
    async fn empty_batch_is_not_uploaded() {
        let server = MockServer::start_async().await;
        let upload = server
            .mock_async(|when, then| {
                when.method(POST).path("/indexes/brain/docs/index");
                then.status(200).json_body(json!({ "value": [] }));
            })
            .await;

        let summary = manager_for(&server).add_documents(&[]).await.expect("upload");
        assert_eq!(summary, UploadSummary::default());
        upload.assert_hits(0);
    }
}
