use super::{insert_ticket, test_service};
use triage_service::{ListTicketsRequest, ServiceError};
use triage_storage::{TicketPatch, TicketStore};

#[tokio::test]
async fn enhanced_view_degrades_when_the_index_is_unavailable() {
	let (service, store, _stubs) = test_service();
	let id = insert_ticket(&store, "Refund", "Money back please.").await;

	store.seed_embedding(id, vec![1.0, 0.0, 0.0, 0.0]);
	store.set_similarity_unavailable(true);

	let view = service.enhanced_ticket(id).await.expect("The view must not fail.");

	assert!(view.similar_tickets.is_empty());
	assert!(!view.has_similar_tickets);
	assert_eq!(view.ticket.id, id);
}

#[tokio::test]
async fn enhanced_view_without_an_embedding_skips_similarity() {
	let (service, store, _stubs) = test_service();
	let id = insert_ticket(&store, "Refund", "Money back please.").await;
	let view = service.enhanced_ticket(id).await.expect("view");

	assert!(view.similar_tickets.is_empty());
	assert!(!view.has_similar_tickets);
	// New tickets may still be drafted against.
	assert!(view.can_generate_draft);
	assert_eq!(view.suggested_actions, vec!["Wait for auto-processing".to_string()]);
}

#[tokio::test]
async fn enhanced_view_surfaces_neighbors_and_priority_actions() {
	let (service, store, _stubs) = test_service();
	let a = insert_ticket(&store, "Payment failed", "My card was declined.").await;
	let b = insert_ticket(&store, "Card declined", "Payment keeps failing.").await;

	store.seed_embedding(a, vec![1.0, 0.0, 0.0, 0.0]);
	store.seed_embedding(b, vec![0.9, 0.1, 0.0, 0.0]);
	store
		.update(
			a,
			TicketPatch {
				category: Some("Payment Failure".to_string()),
				priority: Some("high".to_string()),
				status: Some("Processed".to_string()),
				..Default::default()
			},
		)
		.await
		.expect("seed update");

	let view = service.enhanced_ticket(a).await.expect("view");

	assert!(view.has_similar_tickets);
	assert!(view.similar_tickets.iter().any(|similar| similar.id == b));
	assert!(view.can_generate_draft);
	assert_eq!(
		view.suggested_actions,
		vec![
			"Generate AI Draft".to_string(),
			"View Similar Tickets".to_string(),
			"Prioritize Response".to_string(),
		]
	);

	// Neighbors come back most-similar first.
	let similarities: Vec<f32> =
		view.similar_tickets.iter().map(|similar| similar.similarity).collect();
	let mut sorted = similarities.clone();

	sorted.sort_by(|x, y| y.partial_cmp(x).expect("finite"));

	assert_eq!(similarities, sorted);
}

#[tokio::test]
async fn enhanced_view_of_a_missing_ticket_is_not_found() {
	let (service, _store, _stubs) = test_service();

	assert!(matches!(service.enhanced_ticket(404).await, Err(ServiceError::NotFound { .. })));
}

#[tokio::test]
async fn listing_filters_and_paginates() {
	let (service, store, _stubs) = test_service();

	for index in 0..5 {
		let id = insert_ticket(&store, &format!("Ticket {index}"), "body").await;

		if index < 2 {
			store
				.update(
					id,
					TicketPatch { status: Some("Sent".to_string()), ..Default::default() },
				)
				.await
				.expect("seed update");
		}
	}

	let all = service
		.list_tickets(ListTicketsRequest { page: Some(1), limit: Some(2), ..Default::default() })
		.await
		.expect("list");

	assert_eq!(all.tickets.len(), 2);
	assert_eq!(all.pagination.total, 5);
	assert_eq!(all.pagination.total_pages, 3);
	assert_eq!(all.pagination.page, 1);
	assert_eq!(all.pagination.limit, 2);

	let last_page = service
		.list_tickets(ListTicketsRequest { page: Some(3), limit: Some(2), ..Default::default() })
		.await
		.expect("list");

	assert_eq!(last_page.tickets.len(), 1);

	let sent = service
		.list_tickets(ListTicketsRequest {
			status: Some("Sent".to_string()),
			..Default::default()
		})
		.await
		.expect("list");

	assert_eq!(sent.pagination.total, 2);
	assert!(sent.tickets.iter().all(|ticket| ticket.status == "Sent"));

	// Unknown filters match nothing rather than failing.
	let none = service
		.list_tickets(ListTicketsRequest {
			status: Some("Bogus".to_string()),
			..Default::default()
		})
		.await
		.expect("list");

	assert_eq!(none.pagination.total, 0);
	assert_eq!(none.pagination.total_pages, 0);
}

#[tokio::test]
async fn classify_now_refreshes_category_and_embedding() {
	let (service, store, stubs) = test_service();
	let id = insert_ticket(&store, "Invoice please", "Send me an invoice.").await;

	stubs.push_label("Invoice");

	let category = service.classify_ticket(id).await.expect("classification");

	assert_eq!(category, "Invoice");

	let ticket = service.get_ticket(id).await.expect("ticket");

	assert_eq!(ticket.category.as_deref(), Some("Invoice"));
	// Reclassification refreshes the embedding but leaves the status alone.
	assert_eq!(ticket.status, "New");
	assert!(store.embedding_of(id).is_some());
}

#[tokio::test]
async fn classify_now_propagates_provider_failures_without_mutation() {
	let (service, store, stubs) = test_service();
	let id = insert_ticket(&store, "Invoice please", "Send me an invoice.").await;

	stubs.push_label_failure("classifier down");

	assert!(matches!(
		service.classify_ticket(id).await,
		Err(ServiceError::Provider { .. })
	));

	let ticket = service.get_ticket(id).await.expect("ticket");

	assert!(ticket.category.is_none());
	assert_eq!(ticket.status, "New");
}
