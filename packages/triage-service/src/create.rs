use serde::{Deserialize, Serialize};

use crate::{ServiceError, ServiceResult, TicketView, TriageService};
use triage_domain::{Priority, TicketStatus};
use triage_storage::NewTicket;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreateTicketRequest {
	pub customer_name: String,
	pub email: String,
	pub subject: String,
	pub body: String,
	pub category: Option<String>,
}

impl TriageService {
	/// Persists the ticket with `status = New` and returns immediately; the
	/// processing pipeline runs as a detached task that the submitter never
	/// waits on.
	pub async fn create_ticket(&self, req: CreateTicketRequest) -> ServiceResult<TicketView> {
		if req.customer_name.trim().is_empty()
			|| req.email.trim().is_empty()
			|| req.subject.trim().is_empty()
			|| req.body.trim().is_empty()
		{
			return Err(ServiceError::InvalidArgument {
				message: "customer_name, email, subject, and body are required.".to_string(),
			});
		}

		let category = req
			.category
			.as_deref()
			.map(str::trim)
			.filter(|value| !value.is_empty())
			.map(ToString::to_string);
		let ticket = self
			.store
			.create(NewTicket {
				customer_name: req.customer_name,
				email: req.email,
				subject: req.subject,
				body: req.body,
				category,
				priority: Priority::Medium.as_str().to_string(),
				status: TicketStatus::New.as_str().to_string(),
			})
			.await?;

		tracing::info!(ticket_id = ticket.id, "Ticket created. Queueing automated processing.");

		let service = self.clone();
		let id = ticket.id;
		let subject = ticket.subject.clone();
		let body = ticket.body.clone();

		// Fire-and-forget: the task owns its error boundary, and once started
		// it runs to completion independent of the submitting request.
		tokio::spawn(async move {
			if let Err(err) = service.process_ticket(id, &subject, &body).await {
				tracing::error!(error = %err, ticket_id = id, "Detached ticket processing failed.");
			}
		});

		Ok(ticket.into())
	}
}
