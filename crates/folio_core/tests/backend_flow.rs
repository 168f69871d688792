use folio_core::{
    DraftField, DraftRecord, FieldValue, FormContext, FormPhase, FormSynchronizer, ImageAsset,
    ListingConfig, ListingContext, LoadOutcome, MemoryBackend, PaginationController,
    PostSummary, SearchCriteria, SubmissionPayload, Tag, TagCollection, TagScope,
};
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

#[test]
fn payload_wraps_project_with_taggings_attributes() {
    let draft = DraftRecord {
        title: "Folio".to_string(),
        source_url: "https://github.com/example/folio".to_string(),
        image: Some(ImageAsset {
            file_name: "cover.png".to_string(),
            source: "https://cdn.example.com/cover.png".to_string(),
        }),
        description: "<p>CMS</p>".to_string(),
        tags: TagCollection::from(vec![Tag::new("rust", 0), Tag::new("cms", 2)]),
        ..DraftRecord::blank()
    };

    let value = serde_json::to_value(SubmissionPayload::from_draft(&draft)).unwrap();
    assert_eq!(
        value,
        json!({
            "project": {
                "title": "Folio",
                "sourceUrl": "https://github.com/example/folio",
                "sampleUrl": "",
                "image": {
                    "fileName": "cover.png",
                    "source": "https://cdn.example.com/cover.png"
                },
                "description": "<p>CMS</p>",
                "taggingsAttributes": [
                    {"label": "rust", "sortRank": 0},
                    {"label": "cms", "sortRank": 2}
                ]
            }
        })
    );
}

#[test]
fn payload_keeps_id_of_existing_records() {
    let id = Uuid::new_v4();
    let draft = DraftRecord {
        id: Some(id),
        title: "Existing".to_string(),
        ..DraftRecord::blank()
    };
    let value = serde_json::to_value(SubmissionPayload::from_draft(&draft)).unwrap();
    assert_eq!(value["project"]["id"], json!(id.to_string()));
}

#[test]
fn persisted_tags_deserialize_in_rank_order() {
    let draft: DraftRecord = serde_json::from_value(json!({
        "title": "Loaded",
        "tags": [
            {"label": "web", "sortRank": 5},
            {"label": "api", "sortRank": 1}
        ]
    }))
    .unwrap();
    assert_eq!(draft.tags.labels(), vec!["api", "web"]);
    assert_eq!(draft.tags.next_rank(), Ok(6));
}

#[tokio::test]
async fn listing_scrolls_and_searches_by_tag() {
    let backend = Arc::new(MemoryBackend::sample(25));
    let mut listing: PaginationController<PostSummary> = PaginationController::new(
        ListingContext::new(backend.clone(), ListingConfig::new(Some(10))),
    );

    listing.bootstrap().await;
    while listing.request_next().await.is_some() {}
    let state = listing.snapshot();
    assert_eq!(state.items.len(), 25);
    assert_eq!(state.page, 3);
    assert!(!listing.can_load_more());

    let outcome = listing
        .request_search(SearchCriteria::by_tag("design"))
        .await;
    assert_eq!(outcome, Some(LoadOutcome::Applied));
    let state = listing.snapshot();
    assert_eq!(state.total, 6);
    assert!(state.items.iter().all(|post| post.has_tag("design")));
}

#[tokio::test]
async fn created_project_can_be_reopened_and_updated() {
    let backend = Arc::new(MemoryBackend::sample(4));
    let context = FormContext::new(backend.clone(), backend.clone());

    let mut form = FormSynchronizer::new(context.clone());
    form.activate(None).await.unwrap();
    assert_eq!(form.tag_suggestions("r"), vec!["rust"]);
    let title = form.binding(DraftField::Title).unwrap();
    form.edit(title.change(FieldValue::Text("Folio".to_string())))
        .unwrap();
    form.add_tag("rust").await.unwrap();
    let id = form.submit().await.unwrap();
    assert_eq!(form.phase(), FormPhase::Closed);

    let mut reopened = FormSynchronizer::new(context);
    reopened.activate(Some(id)).await.unwrap();
    assert_eq!(reopened.phase(), FormPhase::Ready);
    assert_eq!(reopened.draft().title, "Folio");
    assert_eq!(reopened.tags().as_slice(), &[Tag::new("rust", 0)]);
    assert!(reopened.tag_suggestions("r").is_empty());

    reopened.add_tag("cms").await.unwrap();
    reopened.delete_tag(0).await.unwrap();
    assert_eq!(reopened.submit().await.unwrap(), id);

    let stored = backend.project(id).unwrap();
    assert_eq!(stored.tags.as_slice(), &[Tag::new("cms", 1)]);
    assert_eq!(
        backend.remote_tags(TagScope::Record(id)),
        vec![Tag::new("cms", 1)]
    );
}
