use crate::app::render::OutputFormat;
use crate::config::{Overrides, API_URL_ENV};
use crate::domain::model::{ClubDraft, MemberDraft};
use chrono::NaiveDate;
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "club-admin")]
#[command(about = "Manage clubs and members of the science-club association")]
pub struct CliConfig {
    /// Backend base URL, e.g. http://localhost:3000/api
    #[arg(long, global = true, env = API_URL_ENV)]
    pub api_url: Option<String>,

    /// TOML config file with [api] and [output] sections
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,

    #[arg(long, global = true, value_enum)]
    pub format: Option<OutputFormat>,

    /// Directory that exports are written to
    #[arg(long, global = true)]
    pub output_dir: Option<String>,

    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl CliConfig {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            api_url: self.api_url.clone(),
            config_path: self.config.clone(),
            timeout_secs: self.timeout_secs,
            output_dir: self.output_dir.clone(),
            format: self.format,
        }
    }
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Scientific branches (ramas)
    #[command(subcommand)]
    Branches(BranchCommand),
    #[command(subcommand)]
    Clubs(ClubCommand),
    /// Members (socios)
    #[command(subcommand)]
    Members(MemberCommand),
    /// Members per club as a bar chart
    Chart,
    /// Write a printable CSV listing to the output directory
    #[command(subcommand)]
    Export(ExportCommand),
}

#[derive(Debug, Clone, Subcommand)]
pub enum BranchCommand {
    List,
}

#[derive(Debug, Clone, Subcommand)]
pub enum ClubCommand {
    List,
    Show {
        id: i64,
    },
    Create(ClubArgs),
    /// Load the club, apply the given fields and save it
    Update {
        id: i64,
        #[command(flatten)]
        changes: ClubArgs,
    },
    Delete {
        id: i64,
    },
    /// Clubs of one branch
    ByBranch {
        branch_id: i64,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum MemberCommand {
    List,
    Show {
        id: i64,
    },
    Create(MemberArgs),
    /// Load the member, apply the given fields and save it
    Update {
        id: i64,
        #[command(flatten)]
        changes: MemberArgs,
    },
    Delete {
        id: i64,
    },
    /// Members of one club
    ByClub {
        club_id: i64,
    },
    /// Members born between two dates (inclusive)
    ByBirthDate {
        #[arg(long)]
        from: Option<NaiveDate>,
        #[arg(long)]
        to: Option<NaiveDate>,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum ExportCommand {
    Clubs,
    MembersByBirthDate {
        #[arg(long)]
        from: Option<NaiveDate>,
        #[arg(long)]
        to: Option<NaiveDate>,
    },
}

#[derive(Debug, Clone, Default, Args)]
pub struct ClubArgs {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub branch: Option<i64>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub address: Option<String>,
    /// Founding date, YYYY-MM-DD
    #[arg(long)]
    pub founded: Option<NaiveDate>,
    #[arg(long, allow_negative_numbers = true)]
    pub budget: Option<f64>,
    #[arg(long, action = ArgAction::Set)]
    pub active: Option<bool>,
}

impl ClubArgs {
    pub fn apply_to(&self, draft: &mut ClubDraft) {
        if let Some(name) = &self.name {
            draft.name = name.clone();
        }
        if let Some(branch) = self.branch {
            draft.branch_id = Some(branch);
        }
        if let Some(description) = &self.description {
            draft.description = description.clone();
        }
        if let Some(address) = &self.address {
            draft.address = address.clone();
        }
        if let Some(founded) = self.founded {
            draft.founded_on = Some(founded);
        }
        if let Some(budget) = self.budget {
            draft.annual_budget = budget;
        }
        if let Some(active) = self.active {
            draft.active = active;
        }
    }
}

#[derive(Debug, Clone, Default, Args)]
pub struct MemberArgs {
    #[arg(long)]
    pub first_name: Option<String>,
    #[arg(long)]
    pub last_name: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub club: Option<i64>,
    /// Birth date, YYYY-MM-DD
    #[arg(long)]
    pub birth_date: Option<NaiveDate>,
    /// Height in meters
    #[arg(long, allow_negative_numbers = true, conflicts_with = "clear_height")]
    pub height: Option<f64>,
    #[arg(long)]
    pub clear_height: bool,
    #[arg(long, action = ArgAction::Set)]
    pub dues_paid: Option<bool>,
}

impl MemberArgs {
    pub fn apply_to(&self, draft: &mut MemberDraft) {
        if let Some(first_name) = &self.first_name {
            draft.first_name = first_name.clone();
        }
        if let Some(last_name) = &self.last_name {
            draft.last_name = last_name.clone();
        }
        if let Some(email) = &self.email {
            draft.email = email.clone();
        }
        if let Some(club) = self.club {
            draft.club_id = Some(club);
        }
        if let Some(birth_date) = self.birth_date {
            draft.birth_date = Some(birth_date);
        }
        if self.clear_height {
            draft.height_m = None;
        } else if let Some(height) = self.height {
            draft.height_m = Some(height);
        }
        if let Some(dues_paid) = self.dues_paid {
            draft.dues_paid = dues_paid;
        }
    }
}
