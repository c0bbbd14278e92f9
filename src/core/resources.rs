//! Typed bindings for the backend endpoints.

use crate::core::client::ApiClient;
use crate::core::form::{send_draft, FormMode};
use crate::domain::model::{
    BirthDateRange, Branch, Club, ClubDraft, ClubMemberCount, Envelope, Member, MemberDraft,
};
use crate::domain::ports::{ApiRequest, HttpMethod, Transport};
use crate::utils::error::{AppError, Result};
use crate::utils::validation::Validate;
use serde_json::Value;

pub const BRANCHES_PATH: &str = "/ramas";
pub const CLUBS_PATH: &str = "/clubs";
pub const MEMBERS_PATH: &str = "/socios";

const DATE_FORMAT: &str = "%Y-%m-%d";

pub struct Branches<'a, T: Transport> {
    client: &'a ApiClient<T>,
}

impl<'a, T: Transport> Branches<'a, T> {
    pub(crate) fn new(client: &'a ApiClient<T>) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Envelope<Vec<Branch>> {
        self.client.get(BRANCHES_PATH).await
    }
}

pub struct Clubs<'a, T: Transport> {
    client: &'a ApiClient<T>,
}

impl<'a, T: Transport> Clubs<'a, T> {
    pub(crate) fn new(client: &'a ApiClient<T>) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Envelope<Vec<Club>> {
        self.client.get(CLUBS_PATH).await
    }

    pub async fn get(&self, id: i64) -> Envelope<Club> {
        self.client.get(&format!("{}/{}", CLUBS_PATH, id)).await
    }

    pub async fn by_branch(&self, branch_id: i64) -> Envelope<Vec<Club>> {
        self.client
            .get(&format!("{}/ramas/{}", CLUBS_PATH, branch_id))
            .await
    }

    /// Members per club, for the chart.
    pub async fn member_counts(&self) -> Envelope<Vec<ClubMemberCount>> {
        self.client.get(&format!("{}/graph", CLUBS_PATH)).await
    }

    /// Rejected drafts are never sent.
    pub async fn create(&self, draft: &ClubDraft) -> Result<Envelope<Value>> {
        draft.validate()?;
        Ok(send_draft(self.client, FormMode::Create, draft).await)
    }

    pub async fn update(&self, id: i64, draft: &ClubDraft) -> Result<Envelope<Value>> {
        draft.validate()?;
        Ok(send_draft(self.client, FormMode::Edit(id), draft).await)
    }

    pub async fn delete(&self, id: i64) -> Envelope<Value> {
        self.client.delete(&format!("{}/{}", CLUBS_PATH, id)).await
    }
}

pub struct Members<'a, T: Transport> {
    client: &'a ApiClient<T>,
}

impl<'a, T: Transport> Members<'a, T> {
    pub(crate) fn new(client: &'a ApiClient<T>) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Envelope<Vec<Member>> {
        self.client.get(MEMBERS_PATH).await
    }

    pub async fn get(&self, id: i64) -> Envelope<Member> {
        self.client.get(&format!("{}/{}", MEMBERS_PATH, id)).await
    }

    pub async fn by_club(&self, club_id: i64) -> Envelope<Vec<Member>> {
        self.client
            .get(&format!("{}/club/{}", MEMBERS_PATH, club_id))
            .await
    }

    pub async fn by_birth_date(&self, range: &BirthDateRange) -> Result<Envelope<Vec<Member>>> {
        range.validate()?;
        let (Some(from), Some(to)) = (range.from, range.to) else {
            return Err(AppError::config("birth date range is incomplete"));
        };

        let request = ApiRequest::new(HttpMethod::Get, format!("{}/rango-fecha", MEMBERS_PATH))
            .with_query("fechaInicio", from.format(DATE_FORMAT).to_string())
            .with_query("fechaFin", to.format(DATE_FORMAT).to_string());
        Ok(self.client.request(request).await)
    }

    pub async fn create(&self, draft: &MemberDraft) -> Result<Envelope<Value>> {
        draft.validate()?;
        Ok(send_draft(self.client, FormMode::Create, draft).await)
    }

    pub async fn update(&self, id: i64, draft: &MemberDraft) -> Result<Envelope<Value>> {
        draft.validate()?;
        Ok(send_draft(self.client, FormMode::Edit(id), draft).await)
    }

    pub async fn delete(&self, id: i64) -> Envelope<Value> {
        self.client.delete(&format!("{}/{}", MEMBERS_PATH, id)).await
    }
}
