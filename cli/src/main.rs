//! casechain: closure audit chain CLI
//!
//! Case files are JSON documents on disk.  Each subcommand loads one, acts on
//! it through the casechain engine, and writes it back only on success.
//!
//! Usage:
//!   casechain new --env prod --system vault --out case.json
//!   casechain append --case case.json --event escalate --actor alice \
//!       --role IncidentCommander --reason "risk detected" --bindings bindings.toml
//!   casechain verify --case case.json
//!   casechain show --case case.json
//!   casechain resolve --bindings bindings.toml --user bob --env prod --system vault

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use casechain_authority::{BindingResolver, TomlRolePolicy};
use casechain_contracts::{
    authority::AuthorityRequest,
    case::CaseFile,
    error::{ClosureError, ClosureResult},
    event::CandidateEvent,
    state::ClosureEventType,
};
use casechain_core::{append_event, traits::AuthorityResolver, verify, ClosureEngine};

// ── CLI definition ────────────────────────────────────────────────────────────

/// casechain: tamper-evident closure trail for incident cases.
#[derive(Parser)]
#[command(
    name = "casechain",
    about = "Closure audit chain for incident cases",
    long_about = "Creates incident case files, appends hash-linked lifecycle events\n\
                  (ESCALATE, ACKNOWLEDGE, CLOSE), and verifies chain integrity."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create a new OPEN case file.
    New {
        #[arg(long)]
        env: String,
        #[arg(long)]
        system: String,
        /// Case identifier; a UUID is generated when omitted.
        #[arg(long)]
        case_id: Option<String>,
        #[arg(long)]
        owner: Option<String>,
        #[arg(long)]
        assignee: Option<String>,
        /// Where to write the case file.
        #[arg(long)]
        out: PathBuf,
    },
    /// Append a lifecycle event to a case file.
    Append {
        #[arg(long)]
        case: PathBuf,
        #[arg(long, value_enum)]
        event: EventKind,
        #[arg(long)]
        actor: String,
        #[arg(long)]
        role: String,
        #[arg(long)]
        reason: String,
        /// Authority bindings (TOML, or a JSON binding list).  When given,
        /// the actor's role is checked before appending.
        #[arg(long)]
        bindings: Option<PathBuf>,
        /// Role policy TOML; the built-in policy is used when omitted.
        #[arg(long, requires = "bindings")]
        policy: Option<PathBuf>,
    },
    /// Verify a case file's hash chain.
    Verify {
        #[arg(long)]
        case: PathBuf,
    },
    /// Print a case file's state and event history.
    Show {
        #[arg(long)]
        case: PathBuf,
    },
    /// Resolve a user's roles from a bindings file.
    Resolve {
        #[arg(long)]
        bindings: PathBuf,
        #[arg(long)]
        user: String,
        #[arg(long)]
        env: String,
        #[arg(long)]
        system: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum EventKind {
    Escalate,
    Acknowledge,
    Close,
}

impl From<EventKind> for ClosureEventType {
    fn from(kind: EventKind) -> Self {
        match kind {
            EventKind::Escalate => ClosureEventType::Escalate,
            EventKind::Acknowledge => ClosureEventType::Acknowledge,
            EventKind::Close => ClosureEventType::Close,
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Set RUST_LOG=debug for verbose output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::New {
            env,
            system,
            case_id,
            owner,
            assignee,
            out,
        } => run_new(env, system, case_id, owner, assignee, &out),
        Command::Append {
            case,
            event,
            actor,
            role,
            reason,
            bindings,
            policy,
        } => run_append(
            &case,
            CandidateEvent::new(event.into(), actor, role, reason),
            bindings.as_deref(),
            policy.as_deref(),
        ),
        Command::Verify { case } => run_verify(&case),
        Command::Show { case } => run_show(&case),
        Command::Resolve {
            bindings,
            user,
            env,
            system,
        } => run_resolve(&bindings, AuthorityRequest::new(user, env, system)),
    };

    if let Err(e) = result {
        eprintln!("casechain: {}", e);
        std::process::exit(1);
    }
}

// ── Case file I/O ─────────────────────────────────────────────────────────────

fn load_case(path: &Path) -> ClosureResult<CaseFile> {
    let contents = std::fs::read_to_string(path).map_err(|e| ClosureError::StoreError {
        reason: format!("failed to read case file '{}': {}", path.display(), e),
    })?;
    CaseFile::from_json(&contents)
}

/// Write via a sibling temp file and rename, so a crash never leaves a
/// half-written case file behind.
fn save_case(path: &Path, case: &CaseFile) -> ClosureResult<()> {
    let json = case.to_json_pretty()?;
    let tmp = path.with_extension("json.tmp");
    let io_err = |e: std::io::Error| ClosureError::StoreError {
        reason: format!("failed to write case file '{}': {}", path.display(), e),
    };
    std::fs::write(&tmp, json).map_err(io_err)?;
    std::fs::rename(&tmp, path).map_err(io_err)?;
    debug!(path = %path.display(), case_id = %case.case_id, "case file written");
    Ok(())
}

/// Refuse to overwrite an existing file with a fresh case.
fn ensure_absent(path: &Path) -> ClosureResult<()> {
    if path.exists() {
        return Err(ClosureError::StoreError {
            reason: format!("file already exists: '{}'", path.display()),
        });
    }
    Ok(())
}

// ── Subcommands ───────────────────────────────────────────────────────────────

fn run_new(
    env: String,
    system: String,
    case_id: Option<String>,
    owner: Option<String>,
    assignee: Option<String>,
    out: &Path,
) -> ClosureResult<()> {
    ensure_absent(out)?;

    let mut case = match case_id {
        Some(id) => CaseFile::open(id, env, system),
        None => CaseFile::open_with_generated_id(env, system),
    };
    if let Some(owner) = owner {
        case.assign_owner(owner);
    }
    if let Some(assignee) = assignee {
        case.assign_to(assignee);
    }

    save_case(out, &case)?;
    info!(case_id = %case.case_id, "case opened");
    println!("{}", case.case_id);
    Ok(())
}

fn run_append(
    path: &Path,
    candidate: CandidateEvent,
    bindings: Option<&Path>,
    policy: Option<&Path>,
) -> ClosureResult<()> {
    let mut case = load_case(path)?;
    // Never extend a chain that is already broken.
    verify(&case)?;

    let event = match bindings {
        Some(bindings) => {
            let resolver = BindingResolver::from_file(bindings)?;
            let policy = match policy {
                Some(p) => TomlRolePolicy::from_file(p)?,
                None => TomlRolePolicy::builtin()?,
            };
            let engine = ClosureEngine::new(Box::new(resolver), Box::new(policy));
            engine.append(&mut case, candidate)?.clone()
        }
        None => append_event(&mut case, candidate)?.clone(),
    };

    save_case(path, &case)?;
    println!(
        "{} -> {}  hash {}",
        event.event_type, event.to_state, event.hash
    );
    Ok(())
}

fn run_verify(path: &Path) -> ClosureResult<()> {
    let case = load_case(path)?;
    let report = verify(&case)?;
    println!(
        "OK  case {}  {} events  state {}  head {}",
        case.case_id,
        report.event_count,
        report.final_state,
        if report.head.is_empty() { "-" } else { report.head.as_str() }
    );
    Ok(())
}

fn run_show(path: &Path) -> ClosureResult<()> {
    let case = load_case(path)?;

    println!("case      {}", case.case_id);
    println!("scope     {}/{}", case.env, case.system);
    println!("state     {}", case.current_state);
    println!("owner     {}", case.owner_id.as_deref().unwrap_or("-"));
    println!("assignee  {}", case.assignee_id.as_deref().unwrap_or("-"));
    println!();
    for (i, event) in case.events.iter().enumerate() {
        println!(
            "[{}] {}  {:<11} {:<12} {} ({})",
            i,
            event.timestamp.to_rfc3339(),
            event.event_type.as_str(),
            event.to_state.as_str(),
            event.actor_id,
            event.actor_role
        );
        println!("    reason: {}", event.reason);
        println!("    hash:   {}", event.hash);
    }

    match verify(&case) {
        Ok(_) => println!("\nchain: intact"),
        Err(e) => println!("\nchain: {}", e),
    }
    Ok(())
}

fn run_resolve(bindings: &Path, request: AuthorityRequest) -> ClosureResult<()> {
    let resolver = BindingResolver::from_file(bindings)?;
    let response = resolver.resolve(&request)?;
    let json = serde_json::to_string_pretty(&response).map_err(|e| ClosureError::Serialization {
        reason: format!("failed to encode authority response: {}", e),
    })?;
    println!("{}", json);
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
