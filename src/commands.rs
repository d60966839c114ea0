//! Command-line surface over [`AppController`].

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use nh_app::usecases::{Deletion, ReportDraft, UserChanges, UserDraft, UserRemoval};
use nh_app::AppController;
use nh_core::branch::branch_or_head_office;
use nh_core::{Backup, BranchId, Lead, LeadId, UserId, UserRole, WriteOutcome};
use serde::Deserialize;
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Parser)]
#[command(name = "nazorat-hub")]
#[command(about = "Operator reports, lead distribution and staff management", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Path to the TOML configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Answer yes to every confirmation prompt
    #[arg(short = 'y', long, global = true)]
    pub yes: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show connection mode and record counts
    Status,

    /// Check a name and password against the stored accounts
    Login {
        #[arg(value_name = "NAME")]
        name: String,

        /// Read from stdin when omitted
        #[arg(long)]
        password: Option<String>,
    },

    /// List branch offices
    Branches,

    /// Manage staff accounts
    Users {
        #[command(subcommand)]
        command: UserCommand,
    },

    /// Manage leads
    Leads {
        #[command(subcommand)]
        command: LeadCommand,
    },

    /// Submit and review visit reports
    Reports {
        #[command(subcommand)]
        command: ReportCommand,
    },

    /// Export every record to a dated JSON file
    Backup {
        /// Directory to write into (defaults to current directory)
        #[arg(value_name = "DIRECTORY")]
        directory: Option<PathBuf>,
    },

    /// Upsert every record of a backup file
    Restore {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Point the application at another hosted backend
    Configure {
        #[arg(long)]
        url: String,

        #[arg(long)]
        api_key: String,
    },
}

#[derive(Subcommand)]
pub enum UserCommand {
    List,

    Add(UserAddArgs),

    /// Allow a registered account to log in
    Approve {
        #[arg(value_name = "USER_ID")]
        id: String,
    },

    Update {
        #[arg(value_name = "USER_ID")]
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        role: Option<UserRole>,

        #[arg(long)]
        branch: Option<String>,

        #[arg(long)]
        password: Option<String>,
    },

    /// Remove an account; its leads return to the general pool
    Delete {
        #[arg(value_name = "USER_ID")]
        id: String,
    },
}

#[derive(Args)]
pub struct UserAddArgs {
    #[arg(long)]
    name: String,

    /// operator, manager or admin
    #[arg(long, default_value = "operator")]
    role: UserRole,

    #[arg(long)]
    branch: Option<String>,

    #[arg(long)]
    password: String,

    /// Explicit id (generated when omitted)
    #[arg(long)]
    id: Option<String>,

    /// Skip the approval step
    #[arg(long)]
    approved: bool,
}

#[derive(Subcommand)]
pub enum LeadCommand {
    /// List leads, optionally only one operator's or only the general pool
    List {
        #[arg(long, conflicts_with = "pool")]
        operator: Option<String>,

        #[arg(long)]
        pool: bool,
    },

    /// Import leads from a JSON array of `{name, phone, address?, note?}`
    Import {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Assign every imported lead to this operator
        #[arg(long)]
        operator: Option<String>,
    },

    /// Give pool leads to an operator
    Distribute {
        #[arg(long)]
        operator: String,

        #[arg(long)]
        count: usize,
    },

    /// Delete one operator's leads, or the general pool when no operator is given
    Clear {
        #[arg(long)]
        operator: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum ReportCommand {
    Add {
        #[arg(long)]
        operator: String,

        #[arg(long)]
        status: String,

        #[arg(long)]
        tasks: String,

        /// Lead the visit was about; it is marked as called
        #[arg(long)]
        lead: Option<String>,
    },

    List {
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },

    /// Ask the AI endpoint for a summary of all reports
    Analyze,
}

/// One row of a lead import file.
#[derive(Debug, Deserialize)]
struct LeadImport {
    name: String,
    phone: String,
    #[serde(default)]
    address: Option<String>,
    #[serde(default)]
    note: Option<String>,
}

impl From<LeadImport> for Lead {
    fn from(row: LeadImport) -> Self {
        Lead {
            address: row.address.filter(|s| !s.trim().is_empty()),
            note: row.note.filter(|s| !s.trim().is_empty()),
            ..Lead::new(row.name, row.phone)
        }
    }
}

fn parse_lead_import(content: &str) -> Result<Vec<Lead>> {
    let rows: Vec<LeadImport> =
        serde_json::from_str(content).context("lead file must be a JSON array of leads")?;
    Ok(rows.into_iter().map(Lead::from).collect())
}

fn print_outcome(outcome: &WriteOutcome) {
    if let WriteOutcome::LocalOnly { reason } = outcome {
        eprintln!("warning: saved to the local mirror only ({reason})");
    }
}

async fn read_password_line() -> Result<String> {
    let mut line = String::new();
    BufReader::new(tokio::io::stdin())
        .read_line(&mut line)
        .await
        .context("failed to read password from stdin")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn write_backup(backup: &Backup, directory: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(directory)
        .with_context(|| format!("failed to create {}", directory.display()))?;
    let path = directory.join(backup.file_name());
    let json = backup.to_json_pretty().context("failed to encode backup")?;
    std::fs::write(&path, json).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(path)
}

/// Runs one command against a loaded controller.
pub async fn run(command: Command, controller: &mut AppController) -> Result<()> {
    match command {
        Command::Status => {
            let state = controller.state();
            println!("mode:    {}", if state.is_cloud { "cloud" } else { "local" });
            println!("users:   {}", state.users.len());
            println!("reports: {}", state.reports.len());
            println!("leads:   {} ({} in pool)", state.leads.len(), state.pool_size());
        }

        Command::Login { name, password } => {
            let password = match password {
                Some(p) => p,
                None => read_password_line().await?,
            };
            let user = controller.authenticate(&name, &password)?;
            let branch = branch_or_head_office(&controller.state().branches, user.branch_id.as_ref())
                .map(|b| b.name.as_str())
                .unwrap_or("-");
            println!("{} | {} | {}", user.role, user.name, branch);
        }

        Command::Branches => {
            for branch in &controller.state().branches {
                println!("{:<8} {:<28} {}", branch.id, branch.name, branch.location);
            }
        }

        Command::Users { command } => run_users(command, controller).await?,
        Command::Leads { command } => run_leads(command, controller).await?,
        Command::Reports { command } => run_reports(command, controller).await?,

        Command::Backup { directory } => {
            let backup = controller.export_backup().await?;
            let path = write_backup(&backup, &directory.unwrap_or_else(|| PathBuf::from(".")))?;
            println!("{}", path.display());
        }

        Command::Restore { file } => {
            let content = std::fs::read_to_string(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            let backup = Backup::from_json(&content).context("file is not a backup document")?;
            let outcome = controller.restore_backup(&backup).await?;
            print_outcome(&outcome);
            println!(
                "restored {} users, {} reports, {} leads",
                backup.users.len(),
                backup.reports.len(),
                backup.leads.len()
            );
        }

        Command::Configure { url, api_key } => {
            controller.reconfigure_remote(&url, &api_key).await?;
            println!(
                "remote backend updated ({})",
                if controller.state().is_cloud { "cloud" } else { "local" }
            );
        }
    }
    Ok(())
}

async fn run_users(command: UserCommand, controller: &mut AppController) -> Result<()> {
    match command {
        UserCommand::List => {
            for user in &controller.state().users {
                println!(
                    "{:<38} {:<20} {:<9} {}",
                    user.id,
                    user.name,
                    user.role,
                    if user.is_approved { "approved" } else { "pending" }
                );
            }
        }

        UserCommand::Add(args) => {
            let (user, outcome) = controller
                .add_user(UserDraft {
                    id: args.id.map(UserId::from),
                    name: args.name,
                    role: args.role,
                    branch_id: args.branch.map(BranchId::from),
                    password: args.password,
                    is_approved: args.approved,
                })
                .await?;
            print_outcome(&outcome);
            println!("{}", user.id);
        }

        UserCommand::Approve { id } => {
            let (_, outcome) = controller
                .update_user(&UserId::from(id), UserChanges::approve())
                .await?;
            print_outcome(&outcome);
        }

        UserCommand::Update {
            id,
            name,
            role,
            branch,
            password,
        } => {
            let changes = UserChanges {
                name,
                role,
                branch_id: branch.map(|b| Some(BranchId::from(b)).filter(|b| !b.as_str().is_empty())),
                password,
                is_approved: None,
            };
            let (_, outcome) = controller.update_user(&UserId::from(id), changes).await?;
            print_outcome(&outcome);
        }

        UserCommand::Delete { id } => match controller.delete_user(&UserId::from(id)).await? {
            UserRemoval::Cancelled => println!("cancelled"),
            UserRemoval::Removed { outcome } => print_outcome(&outcome),
        },
    }
    Ok(())
}

async fn run_leads(command: LeadCommand, controller: &mut AppController) -> Result<()> {
    match command {
        LeadCommand::List { operator, pool } => {
            let operator = operator.map(UserId::from);
            let state = controller.state();
            let leads = state.leads.iter().filter(|l| match (&operator, pool) {
                (Some(op), _) => l.is_assigned_to(op),
                (None, true) => l.is_in_pool(),
                (None, false) => true,
            });
            for lead in leads {
                println!(
                    "{:<38} {:<24} {:<16} {:<7} {}",
                    lead.id,
                    lead.name,
                    lead.phone,
                    lead.status.as_str(),
                    lead.assigned_to.as_ref().map(UserId::as_str).unwrap_or("-")
                );
            }
        }

        LeadCommand::Import { file, operator } => {
            let content = std::fs::read_to_string(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            let leads = parse_lead_import(&content)?;
            let count = leads.len();
            let outcome = controller
                .upload_leads(leads, operator.map(UserId::from))
                .await?;
            print_outcome(&outcome);
            println!("imported {count} leads");
        }

        LeadCommand::Distribute { operator, count } => {
            let outcome = controller
                .distribute_leads(&UserId::from(operator), count)
                .await?;
            print_outcome(&outcome);
            println!("{} leads left in pool", controller.state().pool_size());
        }

        LeadCommand::Clear { operator } => {
            let deletion = match operator {
                Some(op) => controller.delete_leads_for_operator(&UserId::from(op)).await?,
                None => controller.delete_general_pool().await?,
            };
            match deletion {
                Deletion::Cancelled => println!("cancelled"),
                Deletion::Completed { removed, outcome } => {
                    print_outcome(&outcome);
                    println!("deleted {} leads", removed.len());
                }
            }
        }
    }
    Ok(())
}

async fn run_reports(command: ReportCommand, controller: &mut AppController) -> Result<()> {
    match command {
        ReportCommand::Add {
            operator,
            status,
            tasks,
            lead,
        } => {
            if operator.trim().is_empty() {
                bail!("operator name must not be empty");
            }
            let (report, outcome) = controller
                .add_report(ReportDraft {
                    operator_name: operator,
                    visit_status: status,
                    tasks_completed: tasks,
                    lead_id: lead.map(LeadId::from),
                })
                .await?;
            print_outcome(&outcome);
            println!("{}", report.id);
        }

        ReportCommand::List { limit } => {
            for report in controller.state().reports.iter().take(limit) {
                println!(
                    "{} {:<20} {:<12} {}",
                    report.timestamp.format("%Y-%m-%d %H:%M"),
                    report.operator_name,
                    report.visit_status,
                    report.tasks_completed
                );
            }
        }

        ReportCommand::Analyze => println!("{}", controller.analyze_reports().await),
    }
    Ok(())
}
