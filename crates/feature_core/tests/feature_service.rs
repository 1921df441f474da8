use feature_core::db::open_db_in_memory;
use feature_core::{
    Feature, FeatureRepository, FeatureService, FeatureUpdate, NewFeature, RepoError, RepoResult,
    SqliteFeatureRepository, STATUS_DELETED,
};
use std::cell::RefCell;

#[test]
fn service_wraps_repository_calls() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteFeatureRepository::try_new(&mut conn).unwrap();
    let mut service = FeatureService::new(repo);

    let saved = service
        .save(&NewFeature::new("doc-1").with_well_id("well-1"))
        .unwrap();
    assert_eq!(
        service.get_by_well_id("well-1").unwrap().unwrap().id,
        saved.id
    );

    let update = FeatureUpdate {
        content: Some(Some("reviewed".to_string())),
        ..FeatureUpdate::default()
    };
    assert_eq!(service.update_by_document_id("doc-1", &update).unwrap(), 1);
    assert_eq!(
        service
            .get_by_document_id("doc-1")
            .unwrap()
            .unwrap()
            .content
            .as_deref(),
        Some("reviewed")
    );

    assert_eq!(
        service
            .delete_by_document_ids(&["doc-1".to_string()])
            .unwrap(),
        1
    );
    let deleted = service.get_by_document_id("doc-1").unwrap().unwrap();
    assert_eq!(deleted.status, STATUS_DELETED);
}

/// Repository double recording which write calls reached storage.
#[derive(Default)]
struct RecordingRepository {
    updates: RefCell<Vec<String>>,
    fail_writes: bool,
}

impl FeatureRepository for RecordingRepository {
    fn get_by_well_id(&self, _well_id: &str) -> RepoResult<Option<Feature>> {
        Ok(None)
    }

    fn get_by_document_id(&self, _document_id: &str) -> RepoResult<Option<Feature>> {
        Ok(None)
    }

    fn insert(&self, _input: &NewFeature) -> RepoResult<Feature> {
        Err(RepoError::InvalidData("insert not supported".to_string()))
    }

    fn soft_delete_by_document_ids(&mut self, document_ids: &[String]) -> RepoResult<usize> {
        if self.fail_writes {
            return Err(RepoError::InvalidData("write failed".to_string()));
        }
        Ok(document_ids.len())
    }

    fn update_by_document_id(
        &mut self,
        document_id: &str,
        _update: &FeatureUpdate,
    ) -> RepoResult<usize> {
        self.updates.borrow_mut().push(document_id.to_string());
        Ok(1)
    }
}

#[test]
fn empty_update_never_reaches_repository() {
    let mut service = FeatureService::new(RecordingRepository::default());

    assert_eq!(
        service
            .update_by_document_id("doc-1", &FeatureUpdate::default())
            .unwrap(),
        0
    );

    let repo = service.into_inner();
    assert!(repo.updates.borrow().is_empty());
}

#[test]
fn repository_errors_are_returned_unchanged() {
    let mut service = FeatureService::new(RecordingRepository {
        fail_writes: true,
        ..RecordingRepository::default()
    });

    let err = service
        .delete_by_document_ids(&["doc-1".to_string()])
        .unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(ref message) if message == "write failed"));

    let save_err = service.save(&NewFeature::new("doc-1")).unwrap_err();
    assert!(matches!(save_err, RepoError::InvalidData(_)));
    assert!(service.get_by_document_id("doc-1").unwrap().is_none());
}
