use super::{test_service, wait_for_status};
use triage_service::CreateTicketRequest;

#[tokio::test]
async fn a_ticket_travels_from_submission_to_sent() {
	let (service, _store, stubs) = test_service();

	stubs.push_label("Refund");

	// Mentions "urgent" so the keyword check dominates the Refund
	// category's medium score.
	let body = "My last order arrived broken and I urgently need my money back before Friday.";
	let created = service
		.create_ticket(CreateTicketRequest {
			customer_name: "Ada Lovelace".to_string(),
			email: "ada@example.com".to_string(),
			subject: "Refund Request".to_string(),
			body: body.to_string(),
			category: None,
		})
		.await
		.expect("Creation should succeed.");

	assert_eq!(created.status, "New");
	assert!(
		wait_for_status(&service, created.id, "Processed").await,
		"The detached pipeline should complete."
	);

	let processed = service.get_ticket(created.id).await.expect("ticket");

	assert_eq!(processed.category.as_deref(), Some("Refund"));
	assert_eq!(processed.priority, "high");

	let draft = service.generate_draft(created.id).await.expect("Draft should succeed.");

	assert!(!draft.is_empty());

	let drafted = service.get_ticket(created.id).await.expect("ticket");

	assert_eq!(drafted.status, "AI-Drafted");
	assert_eq!(drafted.ai_response.as_deref(), Some(draft.as_str()));

	service.approve_ticket(created.id).await.expect("Approval should succeed.");

	assert_eq!(service.get_ticket(created.id).await.expect("ticket").status, "Sent");

	let stats = service.workflow_stats().await.expect("stats");

	assert_eq!(stats.sent, 1);
	assert_eq!(stats.total, 1);
}
