//! The connection-request workflow.
//!
//! `pending → accepted | declined | cancelled`, all three terminal. At most
//! one active (pending or accepted) request may exist between a pair at a
//! time, in either direction.

use chrono::Utc;
use kindred_core::{
  request::{
    ConnectionRequest, NewConnectionRequest, RequestDecision, RequestStatus,
  },
  store::ConnectionRequestStore,
};
use uuid::Uuid;

use crate::{Engine, Error, Result};

impl<S> Engine<S>
where
  S: ConnectionRequestStore,
{
  /// Open a pending request between two people.
  ///
  /// Rejected when the endpoints coincide or an active request already
  /// exists between the pair in either direction.
  pub async fn create_request(
    &self,
    input: NewConnectionRequest,
  ) -> Result<ConnectionRequest> {
    if input.from_id == input.to_id {
      return Err(kindred_core::Error::SelfRequest.into());
    }

    if let Some(existing) = self
      .store
      .active_between(input.from_id, input.to_id)
      .await
      .map_err(Error::store)?
    {
      tracing::debug!(
        request = %existing.request_id,
        status = %existing.status,
        "rejecting duplicate connection request"
      );
      return Err(
        kindred_core::Error::DuplicateRequest(input.from_id, input.to_id)
          .into(),
      );
    }

    let request = ConnectionRequest {
      request_id:         Uuid::new_v4(),
      from_id:            input.from_id,
      to_id:              input.to_id,
      shared_ancestor_id: input.shared_ancestor_id,
      status:             RequestStatus::Pending,
      created_at:         Utc::now(),
      responded_at:       None,
    };

    self
      .store
      .insert_request(request.clone())
      .await
      .map_err(Error::store)?;
    Ok(request)
  }

  /// Resolve a pending request. Every transition out of `Pending` stamps
  /// the response time; terminal states reject any further transition.
  pub async fn respond_to_request(
    &self,
    id: Uuid,
    decision: RequestDecision,
  ) -> Result<ConnectionRequest> {
    let mut request = self
      .store
      .get_request(id)
      .await
      .map_err(Error::store)?
      .ok_or(kindred_core::Error::RequestNotFound(id))?;

    if request.status.is_terminal() {
      return Err(
        kindred_core::Error::RequestClosed(id, request.status).into(),
      );
    }

    let status = decision.resulting_status();
    let responded_at = Utc::now();
    self
      .store
      .update_request_status(id, status, responded_at)
      .await
      .map_err(Error::store)?;

    request.status = status;
    request.responded_at = Some(responded_at);
    Ok(request)
  }

  /// Every request naming `person` on either side, newest first.
  pub async fn list_requests(
    &self,
    person: Uuid,
  ) -> Result<Vec<ConnectionRequest>> {
    self
      .store
      .list_requests_for(person)
      .await
      .map_err(Error::store)
  }

  /// Number of pending requests addressed to `person`.
  pub async fn count_pending(&self, person: Uuid) -> Result<usize> {
    self.store.count_pending(person).await.map_err(Error::store)
  }
}
