//! Text, JSON and CSV renderings of listings.

use crate::domain::model::{Branch, Club, ClubMemberCount, Member};
use crate::utils::error::{AppError, Result};
use serde::{Deserialize, Serialize};

const CHART_WIDTH: usize = 40;
pub const EMPTY_CHART: &str = "No data available";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
}

/// Rows of strings under `N` headers, rendered as aligned text or CSV. Every
/// row has exactly `N` cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Table<const N: usize> {
    headers: [&'static str; N],
    rows: Vec<[String; N]>,
}

impl<const N: usize> Table<N> {
    pub fn new(headers: [&'static str; N]) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, row: [String; N]) {
        self.rows.push(row);
    }

    pub fn to_text(&self) -> String {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let line = |cells: [&str; N]| -> String {
            cells
                .iter()
                .zip(&widths)
                .map(|(cell, width)| pad(cell, *width))
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_string()
        };

        let mut out = vec![
            line(self.headers),
            widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>().join("  "),
        ];
        out.extend(
            self.rows
                .iter()
                .map(|row| line(row.each_ref().map(String::as_str))),
        );
        out.join("\n")
    }

    pub fn to_csv(&self) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(&self.headers)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| AppError::IoError(e.into_error()))?;
        // Every cell came from a String, so the bytes are UTF-8.
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

fn pad(cell: &str, width: usize) -> String {
    let len = cell.chars().count();
    format!("{}{}", cell, " ".repeat(width.saturating_sub(len)))
}

fn yes_no(flag: bool) -> String {
    let text = if flag { "yes" } else { "no" };
    text.to_string()
}

pub fn render<const N: usize, S: Serialize + ?Sized>(
    format: OutputFormat,
    table: &Table<N>,
    records: &S,
) -> Result<String> {
    match format {
        OutputFormat::Table => Ok(table.to_text()),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(records)?),
        OutputFormat::Csv => table.to_csv(),
    }
}

pub fn branch_table(branches: &[Branch]) -> Table<2> {
    let mut table = Table::new(["ID", "Branch"]);
    for branch in branches {
        table.push([branch.id.to_string(), branch.name.clone()]);
    }
    table
}

fn branch_name(branches: &[Branch], id: i64) -> String {
    branches
        .iter()
        .find(|b| b.id == id)
        .map(|b| b.name.clone())
        .unwrap_or_else(|| "N/A".to_string())
}

/// Club listing with the branch name resolved from `branches`.
pub fn club_table(clubs: &[Club], branches: &[Branch]) -> Table<8> {
    let mut table = Table::new([
        "ID",
        "Name",
        "Description",
        "Branch",
        "Address",
        "Founded",
        "Annual budget",
        "Active",
    ]);
    for club in clubs {
        table.push([
            club.id.to_string(),
            club.name.clone(),
            club.description.clone(),
            branch_name(branches, club.branch_id),
            club.address.clone(),
            club.founded_on.to_string(),
            format!("{:.2}", club.annual_budget),
            yes_no(club.active),
        ]);
    }
    table
}

/// Club name from the joined record, else from `clubs`, else the raw id.
fn member_club_name(member: &Member, clubs: &[Club]) -> String {
    if let Some(club) = &member.club {
        return club.name.clone();
    }
    clubs
        .iter()
        .find(|c| c.id == member.club_id)
        .map(|c| c.name.clone())
        .unwrap_or_else(|| format!("#{}", member.club_id))
}

pub fn member_table(members: &[Member], clubs: &[Club]) -> Table<8> {
    let mut table = Table::new([
        "ID",
        "First name",
        "Last name",
        "Email",
        "Birth date",
        "Height (m)",
        "Dues paid",
        "Club",
    ]);
    for member in members {
        table.push([
            member.id.to_string(),
            member.first_name.clone(),
            member.last_name.clone(),
            member.email.clone(),
            member.birth_date.to_string(),
            member.height_m.map(|h| format!("{:.2}", h)).unwrap_or_default(),
            yes_no(member.dues_paid),
            member_club_name(member, clubs),
        ]);
    }
    table
}

pub fn member_count_table(counts: &[ClubMemberCount]) -> Table<2> {
    let mut table = Table::new(["Club", "Members"]);
    for row in counts {
        table.push([row.label(), row.total.to_string()]);
    }
    table
}

/// Horizontal bar chart of members per club, longest bar `CHART_WIDTH` wide.
pub fn member_chart(counts: &[ClubMemberCount]) -> String {
    if counts.is_empty() {
        return EMPTY_CHART.to_string();
    }

    let labels: Vec<String> = counts.iter().map(ClubMemberCount::label).collect();
    let label_width = labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let max = counts.iter().map(|c| c.total).max().unwrap_or(0);

    let mut lines = vec!["Members per club".to_string()];
    for (label, row) in labels.iter().zip(counts) {
        let bar = if max == 0 {
            0
        } else {
            // Round up so a non-zero count never renders as an empty bar.
            (row.total as usize * CHART_WIDTH).div_ceil(max as usize)
        };
        lines.push(format!(
            "{}  {} {}",
            pad(label, label_width),
            "█".repeat(bar),
            row.total
        ));
    }
    lines.join("\n")
}

pub fn render_chart(format: OutputFormat, counts: &[ClubMemberCount]) -> Result<String> {
    match format {
        OutputFormat::Table => Ok(member_chart(counts)),
        other => render(other, &member_count_table(counts), counts),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::ClubRef;
    use chrono::NaiveDate;

    fn club(id: i64, name: &str, branch_id: i64) -> Club {
        Club {
            id,
            name: name.to_string(),
            branch_id,
            description: "Un club muy activo".to_string(),
            address: "Plaza Mayor 1, Toledo".to_string(),
            founded_on: NaiveDate::from_ymd_opt(2001, 2, 3).unwrap(),
            annual_budget: 1200.0,
            active: true,
        }
    }

    fn count(name: &str, total: u64) -> ClubMemberCount {
        ClubMemberCount {
            club_id: None,
            total,
            club: Some(ClubRef {
                name: name.to_string(),
            }),
        }
    }

    #[test]
    fn test_club_table_resolves_branch_names() {
        let branches = vec![Branch {
            id: 2,
            name: "Astronomía".to_string(),
        }];
        let table = club_table(&[club(1, "Estrellas", 2), club(2, "Huérfano", 9)], &branches);
        let text = table.to_text();

        assert!(text.lines().nth(2).unwrap().contains("Astronomía"));
        assert!(text.lines().nth(3).unwrap().contains("N/A"));
        assert!(text.contains("1200.00"));
    }

    #[test]
    fn test_text_columns_are_aligned() {
        let mut table = Table::new(["A", "B"]);
        table.push(["ñandú".to_string(), "x".to_string()]);
        table.push(["b".to_string(), "y".to_string()]);

        let text = table.to_text();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "A      B");
        assert_eq!(lines[1], "-----  -");
        assert_eq!(lines[2], "ñandú  x");
        assert_eq!(lines[3], "b      y");
    }

    #[test]
    fn test_csv_quotes_embedded_commas() {
        let mut table = Table::new(["Name", "Address"]);
        table.push(["Física".to_string(), "Calle Sol, 3".to_string()]);

        assert_eq!(table.to_csv().unwrap(), "Name,Address\nFísica,\"Calle Sol, 3\"\n");
    }

    #[test]
    fn test_chart_scales_to_largest_club() {
        let chart = member_chart(&[count("Química", 10), count("Biología", 5), count("Vacío", 0)]);
        let lines: Vec<&str> = chart.lines().collect();

        assert_eq!(lines[0], "Members per club");
        assert_eq!(lines[1].matches('█').count(), CHART_WIDTH);
        assert_eq!(lines[2].matches('█').count(), CHART_WIDTH / 2);
        assert_eq!(lines[3].matches('█').count(), 0);
        assert!(lines[2].ends_with(" 5"));
    }

    #[test]
    fn test_member_csv_rows_have_one_cell_per_header() {
        let member = Member {
            id: 4,
            first_name: "Ana".to_string(),
            last_name: "Ruiz".to_string(),
            email: "ana@example.com".to_string(),
            club_id: 1,
            birth_date: NaiveDate::from_ymd_opt(1990, 1, 2).unwrap(),
            height_m: None,
            dues_paid: false,
            club: None,
        };
        let csv = member_table(&[member], &[club(1, "Estrellas", 2)]).to_csv().unwrap();
        let widths: Vec<usize> = csv.lines().map(|l| l.split(',').count()).collect();

        assert_eq!(widths, vec![8, 8]);
        assert!(csv.lines().nth(1).unwrap().ends_with(",no,Estrellas"));
    }

    #[test]
    fn test_empty_chart() {
        assert_eq!(member_chart(&[]), EMPTY_CHART);
    }

    #[test]
    fn test_json_rendering_uses_backend_field_names() {
        let clubs = vec![club(1, "Estrellas", 2)];
        let json = render(OutputFormat::Json, &club_table(&clubs, &[]), &clubs).unwrap();
        assert!(json.contains("\"nombre\": \"Estrellas\""));
    }
}
