// agriquota/src/cli.rs
//
// Single source of truth for all CLI definitions (Clap structs).

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "agriquota")]
#[command(about = "Survey quota evaluation and monitoring for field surveys", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 🎯 Picks the quota a respondent should be counted against
    Select {
        /// Project directory
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,

        /// Questionnaire the interview belongs to
        #[arg(long, short)]
        questionnaire: String,

        /// JSON file holding the respondent record
        #[arg(long)]
        record: Option<PathBuf>,

        /// Respondent attribute as name=value (repeatable, overrides --record)
        #[arg(long = "set", value_name = "NAME=VALUE")]
        values: Vec<String>,
    },

    /// 🔎 Lists matching quotas for a batch of respondent records
    Check {
        /// Project directory
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,

        #[arg(long, short)]
        questionnaire: String,

        /// JSON file with one record or an array of records
        #[arg(long)]
        records: PathBuf,
    },

    /// 📊 Shows quota progress (the monitoring dashboard view)
    Progress {
        /// Project directory
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,

        /// Restrict to one questionnaire (default: all)
        #[arg(long, short)]
        questionnaire: Option<String>,

        /// Output format: table | json
        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,

        /// Also write the JSON report to the configured report path
        #[arg(long)]
        save: bool,
    },

    /// ✅ Validates variable and quota definitions
    Validate {
        /// Project directory
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,

        /// Exit with error if any error-level issue is found
        #[arg(long)]
        strict: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Result, bail};
    use clap::Parser;

    #[test]
    fn test_cli_parse_select_with_values() -> Result<()> {
        let args = Cli::parse_from([
            "agriquota",
            "select",
            "-q",
            "crops_2024",
            "--set",
            "region=Πάφος",
            "--set",
            "farm_size=12",
        ]);
        match args.command {
            Commands::Select {
                project_dir,
                questionnaire,
                record,
                values,
            } => {
                assert_eq!(project_dir.to_string_lossy(), ".");
                assert_eq!(questionnaire, "crops_2024");
                assert_eq!(record, None);
                assert_eq!(values, vec!["region=Πάφος", "farm_size=12"]);
                Ok(())
            }
            _ => bail!("Expected Select command"),
        }
    }

    #[test]
    fn test_cli_parse_progress_defaults() -> Result<()> {
        let args = Cli::parse_from(["agriquota", "progress"]);
        match args.command {
            Commands::Progress {
                questionnaire,
                format,
                save,
                ..
            } => {
                assert_eq!(questionnaire, None);
                assert_eq!(format, OutputFormat::Table);
                assert!(!save);
                Ok(())
            }
            _ => bail!("Expected Progress command"),
        }
    }

    #[test]
    fn test_cli_parse_progress_json() -> Result<()> {
        let args = Cli::parse_from(["agriquota", "progress", "--format", "json", "--save"]);
        match args.command {
            Commands::Progress { format, save, .. } => {
                assert_eq!(format, OutputFormat::Json);
                assert!(save);
                Ok(())
            }
            _ => bail!("Expected Progress command"),
        }
    }

    #[test]
    fn test_cli_parse_validate_strict() -> Result<()> {
        let args = Cli::parse_from(["agriquota", "validate", "--strict", "--project-dir", "/tmp"]);
        match args.command {
            Commands::Validate {
                project_dir,
                strict,
            } => {
                assert_eq!(project_dir.to_string_lossy(), "/tmp");
                assert!(strict);
                Ok(())
            }
            _ => bail!("Expected Validate command"),
        }
    }

    #[test]
    fn test_cli_check_requires_records() {
        let res = Cli::try_parse_from(["agriquota", "check", "-q", "crops_2024"]);
        assert!(res.is_err());
    }
}
