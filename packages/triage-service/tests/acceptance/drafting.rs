use super::{TEST_EMBEDDING, insert_ticket, test_service};
use triage_service::ServiceError;

#[tokio::test]
async fn drafting_always_refreshes_the_embedding() {
	let (service, store, stubs) = test_service();
	let id = insert_ticket(&store, "Refund", "Money back please.").await;

	// Seed a sentinel that differs from what the provider will return.
	let sentinel = vec![0.0, 1.0, 0.0, 0.0];

	store.seed_embedding(id, sentinel.clone());
	assert_eq!(store.embedding_of(id), Some(sentinel));

	let draft = service.generate_draft(id).await.expect("Draft should succeed.");

	assert!(!draft.is_empty());
	assert_eq!(store.embedding_of(id).as_deref(), Some(&TEST_EMBEDDING[..]));
	assert!(stubs.embed_calls.load(std::sync::atomic::Ordering::SeqCst) >= 1);

	let ticket = service.get_ticket(id).await.expect("ticket");

	assert_eq!(ticket.status, "AI-Drafted");
	assert_eq!(ticket.ai_response.as_deref(), Some(draft.as_str()));
}

#[tokio::test]
async fn drafting_survives_an_embedding_failure() {
	let (service, store, stubs) = test_service();
	let id = insert_ticket(&store, "Refund", "Money back please.").await;
	let sentinel = vec![0.0, 1.0, 0.0, 0.0];

	store.seed_embedding(id, sentinel.clone());
	stubs.push_embedding_failure("embedding backend down");

	let draft = service.generate_draft(id).await.expect("Draft should still succeed.");

	assert!(!draft.is_empty());
	// The refresh failed, so the sentinel survives untouched.
	assert_eq!(store.embedding_of(id), Some(sentinel));
	assert_eq!(service.get_ticket(id).await.expect("ticket").status, "AI-Drafted");
}

#[tokio::test]
async fn drafting_survives_an_unavailable_similarity_index() {
	let (service, store, _stubs) = test_service();
	let id = insert_ticket(&store, "Refund", "Money back please.").await;

	store.set_similarity_unavailable(true);

	let draft = service.generate_draft(id).await.expect("Draft should still succeed.");

	assert!(!draft.is_empty());
}

#[tokio::test]
async fn a_failed_draft_leaves_the_record_unchanged() {
	let (service, store, stubs) = test_service();
	let id = insert_ticket(&store, "Refund", "Money back please.").await;

	stubs.push_draft_failure("draft backend down");

	let result = service.generate_draft(id).await;

	assert!(matches!(result, Err(ServiceError::Provider { .. })));

	let ticket = service.get_ticket(id).await.expect("ticket");

	assert_eq!(ticket.status, "New");
	assert!(ticket.ai_response.is_none());
}

#[tokio::test]
async fn drafting_a_missing_ticket_is_not_found() {
	let (service, _store, _stubs) = test_service();

	assert!(matches!(service.generate_draft(404).await, Err(ServiceError::NotFound { .. })));
}

#[tokio::test]
async fn manual_draft_edits_overwrite_without_a_status_change() {
	let (service, store, _stubs) = test_service();
	let id = insert_ticket(&store, "Refund", "Money back please.").await;

	service.generate_draft(id).await.expect("Draft should succeed.");

	let empty = service.update_draft(id, "   ").await;

	assert!(matches!(empty, Err(ServiceError::InvalidArgument { .. })));

	service.update_draft(id, "Dear customer, here is a hand-tuned reply.").await
		.expect("Edit should succeed.");

	let ticket = service.get_ticket(id).await.expect("ticket");

	assert_eq!(
		ticket.ai_response.as_deref(),
		Some("Dear customer, here is a hand-tuned reply.")
	);
	// Manual edits never move the status.
	assert_eq!(ticket.status, "AI-Drafted");
}
