//! Edit sessions for club and member forms.

use crate::core::client::ApiClient;
use crate::core::resources::{CLUBS_PATH, MEMBERS_PATH};
use crate::domain::model::{ClubDraft, Envelope, MemberDraft};
use crate::domain::ports::Transport;
use crate::utils::error::{AppError, Result};
use crate::utils::validation::{today, ValidateFields};
use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(i64),
}

/// A draft that knows which collection it is posted to.
pub trait Submittable: ValidateFields + Serialize + Send + Sync {
    const COLLECTION: &'static str;
}

impl Submittable for ClubDraft {
    const COLLECTION: &'static str = CLUBS_PATH;
}

impl Submittable for MemberDraft {
    const COLLECTION: &'static str = MEMBERS_PATH;
}

/// POST for a new record, PUT to `<collection>/<id>` for an existing one.
pub(crate) async fn send_draft<D, T>(client: &ApiClient<T>, mode: FormMode, draft: &D) -> Envelope<Value>
where
    D: Submittable,
    T: Transport,
{
    match mode {
        FormMode::Create => client.post(D::COLLECTION, draft).await,
        FormMode::Edit(id) => {
            client
                .put(&format!("{}/{}", D::COLLECTION, id), draft)
                .await
        }
    }
}

/// Holds a draft while it is being edited and guards its submission.
///
/// While a create/update call is outstanding any further `submit` fails with
/// [`AppError::SubmissionInFlight`] without touching the network.
pub struct FormSession<D> {
    draft: D,
    mode: FormMode,
    in_flight: AtomicBool,
}

impl<D: Submittable> FormSession<D> {
    pub fn create(draft: D) -> Self {
        Self::with_mode(draft, FormMode::Create)
    }

    pub fn edit(id: i64, draft: D) -> Self {
        Self::with_mode(draft, FormMode::Edit(id))
    }

    fn with_mode(draft: D, mode: FormMode) -> Self {
        Self {
            draft,
            mode,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn draft(&self) -> &D {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut D {
        &mut self.draft
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub async fn submit<T: Transport>(&self, client: &ApiClient<T>) -> Result<Envelope<Value>> {
        self.submit_at(client, today()).await
    }

    pub async fn submit_at<T: Transport>(
        &self,
        client: &ApiClient<T>,
        today: NaiveDate,
    ) -> Result<Envelope<Value>> {
        let _guard = InFlightGuard::acquire(&self.in_flight).ok_or(AppError::SubmissionInFlight)?;
        self.draft.validate_at(today)?;

        tracing::debug!("Submitting {} ({:?})", D::COLLECTION, self.mode);
        let envelope = send_draft(client, self.mode, &self.draft).await;
        if envelope.ok {
            tracing::info!("{}", envelope.message_or("Saved"));
        } else {
            tracing::warn!("Submission rejected: {}", envelope.message_or("Server error"));
        }
        Ok(envelope)
    }
}

struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
