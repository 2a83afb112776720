use super::{TEST_EMBEDDING, insert_ticket, test_service, wait_for_status};
use triage_service::CreateTicketRequest;

#[tokio::test]
async fn processing_persists_classification_priority_and_embedding() {
	let (service, store, stubs) = test_service();
	let id = insert_ticket(&store, "Refund Request", "I would like my money back.").await;

	stubs.push_label("Refund");

	let outcome = service.process_ticket(id, "Refund Request", "I would like my money back.").await
		.expect("Processing should succeed.");

	assert_eq!(outcome.category, "Refund");
	assert_eq!(outcome.priority, "medium");

	let ticket = service.get_ticket(id).await.expect("ticket");

	assert_eq!(ticket.status, "Processed");
	assert_eq!(ticket.category.as_deref(), Some("Refund"));
	assert_eq!(ticket.priority, "medium");
	assert_eq!(store.embedding_of(id).as_deref(), Some(&TEST_EMBEDDING[..]));
}

#[tokio::test]
async fn processing_the_same_ticket_twice_converges() {
	let (service, store, _stubs) = test_service();
	let id = insert_ticket(&store, "Login broken", "The login page will not load.").await;

	let first = service.process_ticket(id, "Login broken", "The login page will not load.").await
		.expect("First run should succeed.");
	let after_first = service.get_ticket(id).await.expect("ticket");

	let second = service.process_ticket(id, "Login broken", "The login page will not load.").await
		.expect("Second run should succeed.");
	let after_second = service.get_ticket(id).await.expect("ticket");

	assert_eq!(first.category, second.category);
	assert_eq!(first.priority, second.priority);
	assert_eq!(after_first.category, after_second.category);
	assert_eq!(after_first.priority, after_second.priority);
	assert_eq!(after_first.status, after_second.status);
	assert_eq!(after_second.status, "Processed");
}

#[tokio::test]
async fn urgency_keywords_dominate_the_category_priority() {
	let (service, store, stubs) = test_service();
	let id = insert_ticket(&store, "Invoice copy", "This is urgent, send it today.").await;

	// Invoice alone would score low.
	stubs.push_label("Invoice");

	service.process_ticket(id, "Invoice copy", "This is urgent, send it today.").await
		.expect("Processing should succeed.");

	let ticket = service.get_ticket(id).await.expect("ticket");

	assert_eq!(ticket.category.as_deref(), Some("Invoice"));
	assert_eq!(ticket.priority, "high");
}

#[tokio::test]
async fn classifier_drift_is_normalized() {
	let (service, store, stubs) = test_service();
	let id = insert_ticket(&store, "Hello", "Just a question.").await;

	stubs.push_label("   ");

	service.process_ticket(id, "Hello", "Just a question.").await.expect("run 1");

	assert_eq!(
		service.get_ticket(id).await.expect("ticket").category.as_deref(),
		Some("General")
	);

	stubs.push_label("\"payment failure\"");

	service.process_ticket(id, "Hello", "Just a question.").await.expect("run 2");

	assert_eq!(
		service.get_ticket(id).await.expect("ticket").category.as_deref(),
		Some("Payment Failure")
	);
}

#[tokio::test]
async fn embedding_failure_marks_the_ticket_processing_failed() {
	let (service, store, stubs) = test_service();
	let id = insert_ticket(&store, "Anything", "At all.").await;

	stubs.push_embedding_failure("embedding backend down");

	let result = service.process_ticket(id, "Anything", "At all.").await;

	assert!(result.is_err());

	let ticket = service.get_ticket(id).await.expect("ticket");

	assert_eq!(ticket.status, "Processing Failed");
	// The record never mutates beyond the status marker.
	assert!(ticket.category.is_none());
}

#[tokio::test]
async fn classification_failure_marks_the_ticket_processing_failed() {
	let (service, store, stubs) = test_service();
	let id = insert_ticket(&store, "Anything", "At all.").await;

	stubs.push_label_failure("classifier down");

	assert!(service.process_ticket(id, "Anything", "At all.").await.is_err());
	assert_eq!(service.get_ticket(id).await.expect("ticket").status, "Processing Failed");
}

#[tokio::test]
async fn similarity_outage_does_not_abort_processing() {
	let (service, store, _stubs) = test_service();
	let id = insert_ticket(&store, "Question", "How do I export data?").await;

	store.set_similarity_unavailable(true);

	let outcome = service.process_ticket(id, "Question", "How do I export data?").await
		.expect("Processing should still succeed.");

	assert_eq!(outcome.similar_found, 0);
	assert_eq!(service.get_ticket(id).await.expect("ticket").status, "Processed");
}

#[tokio::test]
async fn creation_returns_new_immediately_and_processes_in_the_background() {
	let (service, _store, stubs) = test_service();

	stubs.push_label("Account");

	let created = service
		.create_ticket(CreateTicketRequest {
			customer_name: "Grace Hopper".to_string(),
			email: "grace@example.com".to_string(),
			subject: "Password reset".to_string(),
			body: "I cannot reset my password.".to_string(),
			category: None,
		})
		.await
		.expect("Creation should succeed.");

	// The creator never waits on the pipeline.
	assert_eq!(created.status, "New");
	assert_eq!(created.priority, "medium");

	assert!(
		wait_for_status(&service, created.id, "Processed").await,
		"The detached pipeline should process the ticket."
	);

	let ticket = service.get_ticket(created.id).await.expect("ticket");

	assert_eq!(ticket.category.as_deref(), Some("Account"));
}

#[tokio::test]
async fn creation_rejects_missing_required_fields() {
	let (service, _store, _stubs) = test_service();
	let result = service
		.create_ticket(CreateTicketRequest {
			customer_name: "Grace".to_string(),
			email: " ".to_string(),
			subject: "s".to_string(),
			body: "b".to_string(),
			category: None,
		})
		.await;

	assert!(matches!(result, Err(triage_service::ServiceError::InvalidArgument { .. })));
}
