use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Track bingo tickets against the numbers drawn so far
#[derive(Parser, Debug)]
#[command(name = "bingo-tickets")]
#[command(about = "Track bingo tickets against the numbers drawn so far", long_about = None)]
pub struct CliArgs {
    /// Directory holding the saved tickets and draw
    #[arg(
        long = "data-dir",
        value_name = "DIR",
        default_value = ".bingo",
        help = "Directory where tickets and drawn numbers are saved"
    )]
    pub data_dir: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

/// Operations offered by the command-line host
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Import tickets from a CSV file (lot,position,n1..n7 per line)
    Import {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Export all tickets to a CSV file
    Export {
        #[arg(long, short, value_name = "FILE", help = "Output path (default: boletos_bingo.csv)")]
        output: Option<PathBuf>,
    },

    /// Add a ticket, or overwrite the numbers of the ticket at that position
    Add {
        #[arg(long)]
        lot: u32,
        #[arg(long)]
        position: u32,
        #[arg(value_name = "NUMBER", required = true, num_args = 1..)]
        numbers: Vec<u32>,
    },

    /// Remove a single ticket by id
    RemoveTicket {
        #[arg(value_name = "TICKET_ID")]
        id: String,
    },

    /// Remove a lot with all its tickets
    RemoveLot {
        #[arg(value_name = "LOT")]
        lot: u32,
    },

    /// Record drawn numbers, in draw order
    Draw {
        #[arg(value_name = "NUMBER", required = true, num_args = 1..)]
        numbers: Vec<u32>,
    },

    /// Take a number back out of the draw
    Undraw {
        #[arg(value_name = "NUMBER")]
        number: u32,
    },

    /// Clear the drawn numbers, keeping tickets
    ResetDraw,

    /// Delete all tickets and drawn numbers
    Reset,

    /// Show tickets ranked by matched numbers
    Results {
        #[arg(long, help = "Include tickets with no matches")]
        all: bool,
        #[arg(long, value_name = "LOT", help = "Only show this lot")]
        lot: Option<u32>,
    },

    /// List tickets by lot and position
    List {
        #[arg(long, value_name = "LOT", help = "Only show this lot")]
        lot: Option<u32>,
    },

    /// Show one ticket with its matched and missing numbers
    Show {
        #[arg(value_name = "TICKET_ID")]
        id: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::import(&["prog", "import", "tickets.csv"], Command::Import { file: PathBuf::from("tickets.csv") })]
    #[case::export_default(&["prog", "export"], Command::Export { output: None })]
    #[case::export_path(&["prog", "export", "-o", "out.csv"], Command::Export { output: Some(PathBuf::from("out.csv")) })]
    #[case::add(
        &["prog", "add", "--lot", "2", "--position", "1", "1", "2", "3", "4", "5", "6", "7"],
        Command::Add { lot: 2, position: 1, numbers: vec![1, 2, 3, 4, 5, 6, 7] }
    )]
    #[case::draw_many(&["prog", "draw", "5", "12", "27"], Command::Draw { numbers: vec![5, 12, 27] })]
    #[case::undraw(&["prog", "undraw", "12"], Command::Undraw { number: 12 })]
    #[case::remove_ticket(&["prog", "remove-ticket", "abc"], Command::RemoveTicket { id: "abc".to_string() })]
    #[case::remove_lot(&["prog", "remove-lot", "3"], Command::RemoveLot { lot: 3 })]
    #[case::reset_draw(&["prog", "reset-draw"], Command::ResetDraw)]
    #[case::reset(&["prog", "reset"], Command::Reset)]
    #[case::results_all(&["prog", "results", "--all", "--lot", "4"], Command::Results { all: true, lot: Some(4) })]
    #[case::list(&["prog", "list"], Command::List { lot: None })]
    #[case::show(&["prog", "show", "t-1"], Command::Show { id: "t-1".to_string() })]
    fn test_command_parsing(#[case] args: &[&str], #[case] expected: Command) {
        let parsed = CliArgs::try_parse_from(args).unwrap();
        assert_eq!(parsed.command, expected);
    }

    #[rstest]
    #[case::default_dir(&["prog", "reset"], ".bingo")]
    #[case::custom_dir(&["prog", "--data-dir", "/tmp/game", "reset"], "/tmp/game")]
    fn test_data_dir(#[case] args: &[&str], #[case] expected: &str) {
        let parsed = CliArgs::try_parse_from(args).unwrap();
        assert_eq!(parsed.data_dir, PathBuf::from(expected));
    }

    #[rstest]
    #[case::missing_command(&["prog"])]
    #[case::draw_without_numbers(&["prog", "draw"])]
    #[case::add_without_lot(&["prog", "add", "--position", "1", "1", "2", "3", "4", "5", "6", "7"])]
    #[case::non_numeric_draw(&["prog", "draw", "five"])]
    #[case::unknown_command(&["prog", "shuffle"])]
    fn test_parsing_errors(#[case] args: &[&str]) {
        assert!(CliArgs::try_parse_from(args).is_err());
    }
}
