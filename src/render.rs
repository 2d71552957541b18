//! Terminal rendering
//!
//! Plain-text views of the live tally, the constituency list and the grouped
//! constituency table, plus CSV output for the tabular views.

use clap::ValueEnum;
use std::fmt::Write as _;

use crate::grouping::ConstituencyGroup;
use crate::model::Constituency;
use crate::tally::{TallySnapshot, ViewState};

/// Width of the leaderboard progress bar, in cells
pub const BAR_CELLS: usize = 24;

/// Output format for listing commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

/// Vote count with thousands separators (`1234567` -> `1,234,567`)
pub fn format_votes(votes: u64) -> String {
    let digits = votes.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }

    out
}

/// Progress bar for a width percentage; no width renders an empty bar
pub fn progress_bar(width: Option<f64>, cells: usize) -> String {
    let filled = width
        .map(|w| ((w.clamp(0.0, 100.0) / 100.0) * cells as f64).round() as usize)
        .unwrap_or(0);

    let mut bar = "█".repeat(filled);
    bar.push_str(&"░".repeat(cells - filled));
    bar
}

/// Live tally screen for the current view state
pub fn render_live(state: &ViewState) -> String {
    match state {
        ViewState::Loading => "Initializing data stream...\n".to_string(),
        ViewState::Failed { message, cause } => format!("⚠️  {}\n   ({})\n", message, cause),
        ViewState::Waiting => {
            "Waiting for Data Stream\nNo active elections detected in the current region.\n".to_string()
        }
        ViewState::Live(snapshot) => render_snapshot(snapshot),
    }
}

fn render_snapshot(snapshot: &TallySnapshot) -> String {
    let mut out = String::new();

    if let Some(constituency) = snapshot.constituency() {
        let _ = writeln!(out, "CONSTITUENCY ID: {}", constituency.id);
        let _ = writeln!(out, "{}", constituency.name);
        let _ = writeln!(out);
    }

    for standing in snapshot.standings() {
        let percent = standing.bar_width.unwrap_or(0.0);
        let _ = writeln!(
            out,
            "{:>2}. {:<24} {} {:>5.1}% {:>12}{}",
            standing.position,
            standing.party.name,
            progress_bar(standing.bar_width, BAR_CELLS),
            percent,
            format_votes(standing.party.number_of_votes),
            if standing.is_leading { "  👑 LEADING" } else { "" }
        );
    }

    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Total votes: {}  ·  updated {}",
        format_votes(snapshot.total_votes()),
        snapshot.fetched_at().format("%H:%M:%S UTC")
    );

    out
}

/// Constituency list as a table
pub fn render_constituencies(constituencies: &[Constituency]) -> String {
    if constituencies.is_empty() {
        return "No constituencies found.\n".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(out, "{:<6} {:<24} {:<16} {}", "ID", "Name", "State", "Status");
    let _ = writeln!(out, "{}", "-".repeat(56));

    for c in constituencies {
        let _ = writeln!(out, "{:<6} {:<24} {:<16} {}", c.id, c.name, c.state, c.status_label());
    }

    out
}

/// Grouped constituency table
pub fn render_groups(groups: &[ConstituencyGroup]) -> String {
    if groups.is_empty() {
        return "No constituency data available.\n".to_string();
    }

    let mut out = String::new();

    for group in groups {
        let c = &group.constituency;
        let _ = writeln!(out, "{}  [{}]  ID: {}  {}", c.name, c.state, c.id, group.status_badge());
        let _ = writeln!(out, "  {:<24} {:<24} {:>12}", "Candidate", "Party", "Votes");
        let _ = writeln!(out, "  {}", "-".repeat(62));

        for party in &group.parties {
            let _ = writeln!(
                out,
                "  {:<24} {:<24} {:>12}",
                party.candidate_name,
                party.name,
                format_votes(party.number_of_votes)
            );
        }

        let _ = writeln!(out);
    }

    out
}

fn finish_csv(writer: csv::Writer<Vec<u8>>) -> csv::Result<String> {
    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Grouped constituency table as CSV, one row per party
pub fn groups_to_csv(groups: &[ConstituencyGroup]) -> csv::Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([
        "constituency_id",
        "constituency",
        "state",
        "election_active",
        "party_id",
        "party",
        "candidate",
        "votes",
    ])?;

    for group in groups {
        let c = &group.constituency;
        for party in &group.parties {
            writer.write_record([
                c.id.to_string(),
                c.name.clone(),
                c.state.clone(),
                c.election_active.to_string(),
                party.id.to_string(),
                party.name.clone(),
                party.candidate_name.clone(),
                party.number_of_votes.to_string(),
            ])?;
        }
    }

    finish_csv(writer)
}

/// Constituency list as CSV
pub fn constituencies_to_csv(constituencies: &[Constituency]) -> csv::Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["id", "name", "state", "election_active"])?;

    for c in constituencies {
        writer.write_record([
            c.id.to_string(),
            c.name.clone(),
            c.state.clone(),
            c.election_active.to_string(),
        ])?;
    }

    finish_csv(writer)
}

/// Ranked tally as CSV
pub fn snapshot_to_csv(snapshot: &TallySnapshot) -> csv::Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["position", "party_id", "party", "candidate", "votes", "leading"])?;

    for s in snapshot.standings() {
        writer.write_record([
            s.position.to_string(),
            s.party.id.to_string(),
            s.party.name.clone(),
            s.party.candidate_name.clone(),
            s.party.number_of_votes.to_string(),
            s.is_leading.to_string(),
        ])?;
    }

    finish_csv(writer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grouping::group_by_constituency;
    use crate::model::PartyTally;

    fn north() -> Constituency {
        Constituency::new(9, "North", "KA", true)
    }

    #[test]
    fn test_format_votes() {
        assert_eq!(format_votes(0), "0");
        assert_eq!(format_votes(999), "999");
        assert_eq!(format_votes(1000), "1,000");
        assert_eq!(format_votes(1234567), "1,234,567");
    }

    #[test]
    fn test_progress_bar() {
        assert_eq!(progress_bar(None, 4), "░░░░");
        assert_eq!(progress_bar(Some(50.0), 4), "██░░");
        assert_eq!(progress_bar(Some(100.0), 4), "████");
    }

    #[test]
    fn test_render_live_states() {
        assert!(render_live(&ViewState::Loading).contains("Initializing"));
        assert!(render_live(&ViewState::Waiting).contains("No active elections"));

        let snapshot = TallySnapshot::from_tallies(vec![
            PartyTally::new(1, "Green", 50, north()),
            PartyTally::new(2, "Blue", 80, north()),
            PartyTally::new(3, "Red", 80, north()),
        ]);
        let text = render_live(&ViewState::Live(snapshot));

        assert!(text.starts_with("CONSTITUENCY ID: 9\nNorth\n"));
        assert_eq!(text.matches("LEADING").count(), 2);
        let blue = text.find("Blue").unwrap();
        let green = text.find("Green").unwrap();
        assert!(blue < green);
    }

    #[test]
    fn test_zero_votes_render_empty_bars() {
        let snapshot = TallySnapshot::from_tallies(vec![PartyTally::new(1, "Green", 0, north())]);
        let text = render_live(&ViewState::Live(snapshot));

        assert!(text.contains(&progress_bar(None, BAR_CELLS)));
        assert!(text.contains("0.0%"));
    }

    #[test]
    fn test_render_groups_empty() {
        assert_eq!(render_groups(&[]), "No constituency data available.\n");
    }

    #[test]
    fn test_groups_csv() {
        let south = Constituency::new(7, "South", "TN", false);
        let groups = group_by_constituency(&[
            PartyTally::new(1, "Green", 1200, north()).candidate("A. Rao"),
            PartyTally::new(2, "Blue", 5, south),
        ]);

        let csv = groups_to_csv(&groups).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "9,North,KA,true,1,Green,A. Rao,1200");
        assert_eq!(lines[2], "7,South,TN,false,2,Blue,,5");
    }
}
