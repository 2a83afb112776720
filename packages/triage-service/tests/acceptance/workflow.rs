use super::{insert_ticket, test_service};
use triage_service::ServiceError;
use triage_storage::{TicketPatch, TicketStore};

#[tokio::test]
async fn approval_requires_a_non_empty_draft() {
	let (service, store, _stubs) = test_service();
	let id = insert_ticket(&store, "Refund", "Money back please.").await;
	let result = service.approve_ticket(id).await;

	match result {
		Err(ServiceError::InvalidOperation { message }) => {
			assert_eq!(message, "Cannot approve ticket without AI response.");
		},
		other => panic!("Expected InvalidOperation, got {other:?}"),
	}

	// A whitespace-only draft is as good as none.
	store
		.update(id, TicketPatch { ai_response: Some("  ".to_string()), ..Default::default() })
		.await
		.expect("seed update");

	assert!(matches!(
		service.approve_ticket(id).await,
		Err(ServiceError::InvalidOperation { .. })
	));

	store
		.update(id, TicketPatch { ai_response: Some("x".to_string()), ..Default::default() })
		.await
		.expect("seed update");

	service.approve_ticket(id).await.expect("Approval should succeed.");

	assert_eq!(service.get_ticket(id).await.expect("ticket").status, "Sent");
}

#[tokio::test]
async fn escalation_works_from_any_state() {
	let (service, store, _stubs) = test_service();
	let fresh = insert_ticket(&store, "A", "B").await;

	service.escalate_ticket(fresh, Some("customer called twice")).await.expect("escalate");

	assert_eq!(service.get_ticket(fresh).await.expect("ticket").status, "Escalated");

	let sent = insert_ticket(&store, "C", "D").await;

	store
		.update(sent, TicketPatch { status: Some("Sent".to_string()), ..Default::default() })
		.await
		.expect("seed update");
	service.escalate_ticket(sent, None).await.expect("escalate");

	assert_eq!(service.get_ticket(sent).await.expect("ticket").status, "Escalated");
}

#[tokio::test]
async fn workflow_actions_on_missing_tickets_are_not_found() {
	let (service, _store, _stubs) = test_service();

	assert!(matches!(service.approve_ticket(404).await, Err(ServiceError::NotFound { .. })));
	assert!(matches!(
		service.escalate_ticket(404, None).await,
		Err(ServiceError::NotFound { .. })
	));
	assert!(matches!(service.set_pending_review(404).await, Err(ServiceError::NotFound { .. })));
	assert!(matches!(
		service.set_status(404, "Sent").await,
		Err(ServiceError::NotFound { .. })
	));
}

#[tokio::test]
async fn set_status_validates_the_label() {
	let (service, store, _stubs) = test_service();
	let id = insert_ticket(&store, "A", "B").await;
	let result = service.set_status(id, "Archived").await;

	match result {
		Err(ServiceError::InvalidArgument { message }) => {
			assert!(message.contains("Invalid status: Archived."), "Unexpected: {message}");
			assert!(message.contains("Pending Review"), "Unexpected: {message}");
		},
		other => panic!("Expected InvalidArgument, got {other:?}"),
	}

	service.set_status(id, "Pending Review").await.expect("set_status");

	assert_eq!(service.get_ticket(id).await.expect("ticket").status, "Pending Review");

	service.set_pending_review(id).await.expect("set_pending_review");

	assert_eq!(service.get_ticket(id).await.expect("ticket").status, "Pending Review");
}

#[tokio::test]
async fn stats_count_every_status_and_the_total() {
	let (service, store, _stubs) = test_service();
	let statuses = [
		"New",
		"New",
		"Processed",
		"AI-Drafted",
		"Pending Review",
		"Sent",
		"Sent",
		"Escalated",
		"Processing Failed",
	];

	for (index, status) in statuses.iter().enumerate() {
		let id = insert_ticket(&store, &format!("Ticket {index}"), "body").await;

		if *status != "New" {
			store
				.update(
					id,
					TicketPatch { status: Some(status.to_string()), ..Default::default() },
				)
				.await
				.expect("seed update");
		}
	}

	let stats = service.workflow_stats().await.expect("stats");

	assert_eq!(stats.new, 2);
	assert_eq!(stats.processed, 1);
	assert_eq!(stats.ai_drafted, 1);
	assert_eq!(stats.pending_review, 1);
	assert_eq!(stats.sent, 2);
	assert_eq!(stats.escalated, 1);
	assert_eq!(stats.processing_failed, 1);
	assert_eq!(stats.total, statuses.len() as u64);

	let sum = stats.new
		+ stats.processed
		+ stats.ai_drafted
		+ stats.pending_review
		+ stats.sent
		+ stats.escalated
		+ stats.processing_failed;

	assert_eq!(sum, stats.total);
}
