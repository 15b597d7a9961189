use std::io;
use std::path::{Path, PathBuf};

use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use crate::api::{FootageUpload, HttpBackend, Mutation};
use crate::commands::{
    ListOptions, PostAction, backend_from_config, cmd_config_get, cmd_config_set,
    cmd_config_show, cmd_download, cmd_list, cmd_mutate, cmd_posts, cmd_posts_list, cmd_search,
    cmd_show,
};
use crate::config::Config;
use crate::error::{FloranetError, Result};
use crate::types::{
    CctvRequest, CctvStatus, CollectionBatch, CollectionStatus, Complaint, ComplaintStatus,
    Priority, RecordId,
};

#[derive(Parser)]
#[command(name = "floranet")]
#[command(about = "Admin client for the Floranet community backend")]
#[command(version)]
pub struct Cli {
    /// Log verbosity (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resident complaints
    #[command(visible_alias = "c")]
    Complaints {
        #[command(subcommand)]
        action: ComplaintAction,
    },

    /// CCTV footage requests
    Cctv {
        #[command(subcommand)]
        action: CctvAction,
    },

    /// Billing collection batches
    Collections {
        #[command(subcommand)]
        action: CollectionAction,
    },

    /// Community posts
    Posts {
        #[command(subcommand)]
        action: PostsAction,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for [possible values: bash, zsh, fish, powershell, elvish]
        shell: Shell,
    },
}

/// Query options shared by list and search commands
#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    /// Page number (1-based)
    #[arg(short, long, default_value = "1")]
    pub page: u32,

    /// Search text
    #[arg(short, long)]
    pub search: Option<String>,

    /// Column filter as name=value (repeatable)
    #[arg(short, long = "filter", value_parser = parse_filter)]
    pub filters: Vec<(String, String)>,

    /// Show the detail section of a record (repeatable)
    #[arg(short, long, value_parser = parse_record_id)]
    pub expand: Vec<RecordId>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl From<ListArgs> for ListOptions {
    fn from(args: ListArgs) -> Self {
        ListOptions {
            page: args.page,
            search: args.search,
            filters: args.filters,
            expand: args.expand,
            json: args.json,
        }
    }
}

#[derive(Subcommand)]
pub enum ComplaintAction {
    /// List complaints
    #[command(visible_alias = "ls")]
    List(ListArgs),

    /// Search interactively, one query per input line
    Search(ListArgs),

    /// Show one complaint with its follow-ups
    Show {
        #[arg(value_parser = parse_record_id)]
        id: RecordId,
        #[arg(long)]
        json: bool,
    },

    /// Set status (pending, in_progress, resolved, rejected)
    Status {
        #[arg(value_parser = parse_record_id)]
        id: RecordId,
        #[arg(value_parser = parse_complaint_status)]
        status: ComplaintStatus,
        #[arg(long)]
        json: bool,
    },

    /// Set priority (low, medium, high, urgent)
    Priority {
        #[arg(value_parser = parse_record_id)]
        id: RecordId,
        #[arg(value_parser = parse_priority)]
        priority: Priority,
        #[arg(long)]
        json: bool,
    },

    /// Replace the admin remarks
    Remarks {
        #[arg(value_parser = parse_record_id)]
        id: RecordId,
        /// Remarks text; empty clears them
        #[arg(trailing_var_arg = true)]
        text: Vec<String>,
        #[arg(long)]
        json: bool,
    },

    /// Append a follow-up
    Followup {
        #[arg(value_parser = parse_record_id)]
        id: RecordId,
        #[arg(trailing_var_arg = true)]
        text: Vec<String>,
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum CctvAction {
    /// List CCTV footage requests
    #[command(visible_alias = "ls")]
    List(ListArgs),

    /// Search interactively, one query per input line
    Search(ListArgs),

    /// Show one request with its footage
    Show {
        #[arg(value_parser = parse_record_id)]
        id: RecordId,
        #[arg(long)]
        json: bool,
    },

    /// Set status (pending, approved, rejected, completed)
    Status {
        #[arg(value_parser = parse_record_id)]
        id: RecordId,
        #[arg(value_parser = parse_cctv_status)]
        status: CctvStatus,
        #[arg(long)]
        json: bool,
    },

    /// Replace the admin remarks
    Remarks {
        #[arg(value_parser = parse_record_id)]
        id: RecordId,
        #[arg(trailing_var_arg = true)]
        text: Vec<String>,
        #[arg(long)]
        json: bool,
    },

    /// Attach a footage file
    Upload {
        #[arg(value_parser = parse_record_id)]
        id: RecordId,
        /// File to upload
        file: PathBuf,
        /// Footage description
        #[arg(short, long)]
        description: Option<String>,
        #[arg(long)]
        json: bool,
    },

    /// Remove a footage file
    DeleteFootage {
        #[arg(value_parser = parse_record_id)]
        id: RecordId,
        #[arg(value_parser = parse_record_id)]
        footage_id: RecordId,
        #[arg(long)]
        json: bool,
    },

    /// Print the download URL of a stored footage path
    Download {
        path: String,
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum CollectionAction {
    /// List collection batches
    #[command(visible_alias = "ls")]
    List(ListArgs),

    /// Search interactively, one query per input line
    Search(ListArgs),

    /// Show one batch
    Show {
        #[arg(value_parser = parse_record_id)]
        id: RecordId,
        #[arg(long)]
        json: bool,
    },

    /// Set status (draft, open, closed)
    Status {
        #[arg(value_parser = parse_record_id)]
        id: RecordId,
        #[arg(value_parser = parse_collection_status)]
        status: CollectionStatus,
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum PostsAction {
    /// List active (or archived) posts
    #[command(visible_alias = "ls")]
    List {
        #[arg(long)]
        archived: bool,
        /// Show the comments of a post (repeatable)
        #[arg(short, long, value_parser = parse_record_id)]
        expand: Vec<RecordId>,
        #[arg(long)]
        json: bool,
    },

    /// Publish a post
    Create {
        #[arg(trailing_var_arg = true)]
        content: Vec<String>,
        #[arg(long)]
        json: bool,
    },

    /// Delete a post
    Delete {
        #[arg(value_parser = parse_record_id)]
        id: RecordId,
        #[arg(long)]
        json: bool,
    },

    /// Like or unlike a post
    Like {
        #[arg(value_parser = parse_record_id)]
        id: RecordId,
        #[arg(long)]
        json: bool,
    },

    /// Comment on a post
    Comment {
        #[arg(value_parser = parse_record_id)]
        id: RecordId,
        #[arg(trailing_var_arg = true)]
        text: Vec<String>,
        #[arg(long)]
        json: bool,
    },

    /// Move a post to the archive
    Archive {
        #[arg(value_parser = parse_record_id)]
        id: RecordId,
        #[arg(long)]
        json: bool,
    },

    /// Restore an archived post
    Unarchive {
        #[arg(value_parser = parse_record_id)]
        id: RecordId,
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Set a configuration value
    Set {
        /// Configuration key (api_base_url, auth.token, search_debounce_ms, request_timeout)
        key: String,
        /// Value to set
        value: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Get a configuration value
    Get {
        /// Configuration key (api_base_url, auth.token, search_debounce_ms, request_timeout)
        key: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Commands {
    /// Execute the command, dispatching to the appropriate handler.
    pub async fn run(self) -> Result<()> {
        match self {
            Commands::Complaints { action } => run_complaints(action).await,
            Commands::Cctv { action } => run_cctv(action).await,
            Commands::Collections { action } => run_collections(action).await,
            Commands::Posts { action } => run_posts(action).await,

            Commands::Config { action } => match action {
                ConfigAction::Show { json } => cmd_config_show(json),
                ConfigAction::Set { key, value, json } => cmd_config_set(&key, &value, json),
                ConfigAction::Get { key, json } => cmd_config_get(&key, json),
            },

            Commands::Completions { shell } => {
                generate_completions(shell);
                Ok(())
            }
        }
    }
}

/// Backend plus the configured debounce delay, for interactive search
fn search_setup() -> Result<(HttpBackend, std::time::Duration)> {
    let config = Config::load()?;
    Ok((HttpBackend::from_config(&config)?, config.search_debounce()))
}

async fn run_complaints(action: ComplaintAction) -> Result<()> {
    match action {
        ComplaintAction::List(args) => cmd_list::<Complaint>(backend_from_config()?, args.into()).await,
        ComplaintAction::Search(args) => {
            let (backend, delay) = search_setup()?;
            cmd_search::<Complaint>(backend, args.into(), delay).await
        }
        ComplaintAction::Show { id, json } => {
            cmd_show::<Complaint>(backend_from_config()?, id, json).await
        }
        ComplaintAction::Status { id, status, json } => {
            cmd_mutate::<Complaint>(backend_from_config()?, id, Mutation::Status(status), json).await
        }
        ComplaintAction::Priority { id, priority, json } => {
            cmd_mutate::<Complaint>(backend_from_config()?, id, Mutation::Priority(priority), json)
                .await
        }
        ComplaintAction::Remarks { id, text, json } => {
            let mutation = Mutation::Remarks(text.join(" "));
            cmd_mutate::<Complaint>(backend_from_config()?, id, mutation, json).await
        }
        ComplaintAction::Followup { id, text, json } => {
            let mutation = Mutation::AppendFollowup(text.join(" "));
            cmd_mutate::<Complaint>(backend_from_config()?, id, mutation, json).await
        }
    }
}

async fn run_cctv(action: CctvAction) -> Result<()> {
    match action {
        CctvAction::List(args) => cmd_list::<CctvRequest>(backend_from_config()?, args.into()).await,
        CctvAction::Search(args) => {
            let (backend, delay) = search_setup()?;
            cmd_search::<CctvRequest>(backend, args.into(), delay).await
        }
        CctvAction::Show { id, json } => {
            cmd_show::<CctvRequest>(backend_from_config()?, id, json).await
        }
        CctvAction::Status { id, status, json } => {
            cmd_mutate::<CctvRequest>(backend_from_config()?, id, Mutation::Status(status), json)
                .await
        }
        CctvAction::Remarks { id, text, json } => {
            let mutation = Mutation::Remarks(text.join(" "));
            cmd_mutate::<CctvRequest>(backend_from_config()?, id, mutation, json).await
        }
        CctvAction::Upload {
            id,
            file,
            description,
            json,
        } => {
            let upload = read_upload(&file, description).await?;
            cmd_mutate::<CctvRequest>(
                backend_from_config()?,
                id,
                Mutation::UploadFootage(upload),
                json,
            )
            .await
        }
        CctvAction::DeleteFootage {
            id,
            footage_id,
            json,
        } => {
            cmd_mutate::<CctvRequest>(
                backend_from_config()?,
                id,
                Mutation::DeleteFootage(footage_id),
                json,
            )
            .await
        }
        CctvAction::Download { path, json } => cmd_download(&backend_from_config()?, &path, json),
    }
}

async fn run_collections(action: CollectionAction) -> Result<()> {
    match action {
        CollectionAction::List(args) => {
            cmd_list::<CollectionBatch>(backend_from_config()?, args.into()).await
        }
        CollectionAction::Search(args) => {
            let (backend, delay) = search_setup()?;
            cmd_search::<CollectionBatch>(backend, args.into(), delay).await
        }
        CollectionAction::Show { id, json } => {
            cmd_show::<CollectionBatch>(backend_from_config()?, id, json).await
        }
        CollectionAction::Status { id, status, json } => {
            cmd_mutate::<CollectionBatch>(
                backend_from_config()?,
                id,
                Mutation::Status(status),
                json,
            )
            .await
        }
    }
}

async fn run_posts(action: PostsAction) -> Result<()> {
    let backend = backend_from_config()?;
    match action {
        PostsAction::List {
            archived,
            expand,
            json,
        } => cmd_posts_list(backend, archived, &expand, json).await,
        PostsAction::Create { content, json } => {
            cmd_posts(backend, PostAction::Create(content.join(" ")), json).await
        }
        PostsAction::Delete { id, json } => cmd_posts(backend, PostAction::Delete(id), json).await,
        PostsAction::Like { id, json } => cmd_posts(backend, PostAction::Like(id), json).await,
        PostsAction::Comment { id, text, json } => {
            cmd_posts(backend, PostAction::Comment(id, text.join(" ")), json).await
        }
        PostsAction::Archive { id, json } => {
            cmd_posts(backend, PostAction::Archive(id), json).await
        }
        PostsAction::Unarchive { id, json } => {
            cmd_posts(backend, PostAction::Unarchive(id), json).await
        }
    }
}

/// Read a footage file. An empty file is passed through so validation can
/// reject it with the usual feedback.
async fn read_upload(path: &Path, description: Option<String>) -> Result<FootageUpload> {
    let bytes = tokio::fs::read(path).await.map_err(|e| {
        FloranetError::Io(io::Error::new(
            e.kind(),
            format!("Failed to read {}: {}", path.display(), e),
        ))
    })?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(FootageUpload {
        file_name,
        bytes,
        description: description.filter(|d| !d.trim().is_empty()),
    })
}

/// Generic validation helper for parsing values with a standard error message format.
fn parse_with_validation<T, F>(
    s: &str,
    parser: F,
    field_name: &str,
    valid_values: &[&str],
) -> std::result::Result<T, String>
where
    F: FnOnce(&str) -> std::result::Result<T, String>,
{
    parser(s).map_err(|_| {
        format!(
            "Invalid {}. Must be one of: {}",
            field_name,
            valid_values.join(", ")
        )
    })
}

fn parse_complaint_status(s: &str) -> std::result::Result<ComplaintStatus, String> {
    parse_with_validation(
        s,
        |v| v.parse().map_err(|_| String::new()),
        "status",
        ComplaintStatus::VALUES,
    )
}

fn parse_cctv_status(s: &str) -> std::result::Result<CctvStatus, String> {
    parse_with_validation(
        s,
        |v| v.parse().map_err(|_| String::new()),
        "status",
        CctvStatus::VALUES,
    )
}

fn parse_collection_status(s: &str) -> std::result::Result<CollectionStatus, String> {
    parse_with_validation(
        s,
        |v| v.parse().map_err(|_| String::new()),
        "status",
        CollectionStatus::VALUES,
    )
}

fn parse_priority(s: &str) -> std::result::Result<Priority, String> {
    parse_with_validation(
        s,
        |v| v.parse().map_err(|_| String::new()),
        "priority",
        Priority::VALUES,
    )
}

fn parse_record_id(s: &str) -> std::result::Result<RecordId, String> {
    s.parse::<RecordId>().map_err(|e| e.to_string())
}

fn parse_filter(s: &str) -> std::result::Result<(String, String), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("Invalid filter '{s}'. Expected name=value"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err("Filter name cannot be empty".to_string());
    }
    Ok((name.to_string(), value.trim().to_string()))
}

pub fn generate_completions(shell: Shell) {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "floranet", &mut io::stdout());
}
