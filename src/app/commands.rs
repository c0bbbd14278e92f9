//! Runs one CLI command against the backend and renders its result.

use crate::app::render::{
    branch_table, club_table, member_table, render, render_chart, OutputFormat,
};
use crate::config::cli::{BranchCommand, ClubCommand, Command, ExportCommand, MemberCommand};
use crate::core::client::ApiClient;
use crate::core::form::FormSession;
use crate::domain::model::{BirthDateRange, Branch, Club, ClubDraft, Member, MemberDraft};
use crate::domain::ports::{Storage, Transport};
use crate::utils::error::Result;
use crate::utils::validation::today;
use chrono::NaiveDate;

pub const NO_MEMBERS_IN_RANGE: &str = "No members found in that date range.";

pub struct AdminApp<T: Transport, S: Storage> {
    client: ApiClient<T>,
    storage: S,
    format: OutputFormat,
}

impl<T: Transport, S: Storage> AdminApp<T, S> {
    pub fn new(client: ApiClient<T>, storage: S, format: OutputFormat) -> Self {
        Self {
            client,
            storage,
            format,
        }
    }

    pub fn client(&self) -> &ApiClient<T> {
        &self.client
    }

    pub async fn run(&self, command: &Command) -> Result<String> {
        match command {
            Command::Branches(BranchCommand::List) => self.list_branches().await,
            Command::Clubs(cmd) => self.run_club(cmd).await,
            Command::Members(cmd) => self.run_member(cmd).await,
            Command::Chart => {
                let counts = self.client.clubs().member_counts().await.into_result()?;
                render_chart(self.format, &counts)
            }
            Command::Export(cmd) => self.run_export(cmd).await,
        }
    }

    async fn list_branches(&self) -> Result<String> {
        let branches = self.client.branches().list().await.into_result()?;
        render(self.format, &branch_table(&branches), &branches)
    }

    async fn run_club(&self, command: &ClubCommand) -> Result<String> {
        match command {
            ClubCommand::List => {
                let clubs = self.client.clubs().list().await.into_result()?;
                self.render_clubs(&clubs).await
            }
            ClubCommand::Show { id } => {
                let club = self.client.clubs().get(*id).await.into_result()?;
                self.render_clubs(std::slice::from_ref(&club)).await
            }
            ClubCommand::ByBranch { branch_id } => {
                let clubs = self.client.clubs().by_branch(*branch_id).await.into_result()?;
                self.render_clubs(&clubs).await
            }
            ClubCommand::Create(args) => {
                let mut draft = ClubDraft::default();
                args.apply_to(&mut draft);
                let session = FormSession::create(draft);
                let ack = session.submit(&self.client).await?.into_ack()?;
                Ok(non_empty(ack, "Club created"))
            }
            ClubCommand::Update { id, changes } => {
                let club = self.client.clubs().get(*id).await.into_result()?;
                let mut session = FormSession::edit(*id, ClubDraft::from(&club));
                changes.apply_to(session.draft_mut());
                let ack = session.submit(&self.client).await?.into_ack()?;
                Ok(non_empty(ack, "Club updated"))
            }
            ClubCommand::Delete { id } => {
                let ack = self.client.clubs().delete(*id).await.into_ack()?;
                tracing::info!("Deleted club {}", id);
                Ok(non_empty(ack, "Club deleted"))
            }
        }
    }

    async fn run_member(&self, command: &MemberCommand) -> Result<String> {
        match command {
            MemberCommand::List => {
                let members = self.client.members().list().await.into_result()?;
                self.render_members(&members).await
            }
            MemberCommand::Show { id } => {
                let member = self.client.members().get(*id).await.into_result()?;
                self.render_members(std::slice::from_ref(&member)).await
            }
            MemberCommand::ByClub { club_id } => {
                let members = self.client.members().by_club(*club_id).await.into_result()?;
                self.render_members(&members).await
            }
            MemberCommand::ByBirthDate { from, to } => {
                let range = BirthDateRange {
                    from: *from,
                    to: *to,
                };
                let members = self
                    .client
                    .members()
                    .by_birth_date(&range)
                    .await?
                    .into_result()?;
                if members.is_empty() && self.format == OutputFormat::Table {
                    return Ok(NO_MEMBERS_IN_RANGE.to_string());
                }
                self.render_members(&members).await
            }
            MemberCommand::Create(args) => {
                let mut draft = MemberDraft::default();
                args.apply_to(&mut draft);
                let session = FormSession::create(draft);
                let ack = session.submit(&self.client).await?.into_ack()?;
                Ok(non_empty(ack, "Member created"))
            }
            MemberCommand::Update { id, changes } => {
                let member = self.client.members().get(*id).await.into_result()?;
                let mut session = FormSession::edit(*id, MemberDraft::from(&member));
                changes.apply_to(session.draft_mut());
                let ack = session.submit(&self.client).await?.into_ack()?;
                Ok(non_empty(ack, "Member updated"))
            }
            MemberCommand::Delete { id } => {
                let ack = self.client.members().delete(*id).await.into_ack()?;
                tracing::info!("Deleted member {}", id);
                Ok(non_empty(ack, "Member deleted"))
            }
        }
    }

    async fn run_export(&self, command: &ExportCommand) -> Result<String> {
        match command {
            ExportCommand::Clubs => {
                let clubs = self.client.clubs().list().await.into_result()?;
                let branches = self.lookup_branches().await;
                let csv = club_table(&clubs, &branches).to_csv()?;
                let filename = format!("clubs_{}.csv", today().format("%Y-%m-%d"));
                let path = self.storage.write_file(&filename, csv.as_bytes()).await?;
                Ok(format!("Exported {} clubs to {}", clubs.len(), path))
            }
            ExportCommand::MembersByBirthDate { from, to } => {
                let range = BirthDateRange {
                    from: *from,
                    to: *to,
                };
                let members = self
                    .client
                    .members()
                    .by_birth_date(&range)
                    .await?
                    .into_result()?;
                let clubs = self.lookup_clubs().await;
                let csv = member_table(&members, &clubs).to_csv()?;
                let filename = format!(
                    "members_{}_{}.csv",
                    date_or_blank(range.from),
                    date_or_blank(range.to)
                );
                let path = self.storage.write_file(&filename, csv.as_bytes()).await?;
                Ok(format!("Exported {} members to {}", members.len(), path))
            }
        }
    }

    async fn render_clubs(&self, clubs: &[Club]) -> Result<String> {
        let branches = self.lookup_branches().await;
        render(self.format, &club_table(clubs, &branches), clubs)
    }

    async fn render_members(&self, members: &[Member]) -> Result<String> {
        let clubs = if members.iter().all(|m| m.club.is_some()) {
            Vec::new()
        } else {
            self.lookup_clubs().await
        };
        render(self.format, &member_table(members, &clubs), members)
    }

    /// Reference data for name lookups; a failure only degrades the listing.
    async fn lookup_branches(&self) -> Vec<Branch> {
        self.client
            .branches()
            .list()
            .await
            .into_result()
            .unwrap_or_else(|e| {
                tracing::warn!("Could not load branches: {}", e);
                Vec::new()
            })
    }

    async fn lookup_clubs(&self) -> Vec<Club> {
        self.client
            .clubs()
            .list()
            .await
            .into_result()
            .unwrap_or_else(|e| {
                tracing::warn!("Could not load clubs: {}", e);
                Vec::new()
            })
    }
}

fn non_empty(message: String, fallback: &str) -> String {
    if message.trim().is_empty() {
        fallback.to_string()
    } else {
        message
    }
}

fn date_or_blank(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}
