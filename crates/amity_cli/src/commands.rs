use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "amity")]
#[command(about = "Allocate offices and living spaces to staff and fellows.")]
pub struct CommandLine {
    /// SQLite file of the facility (defaults to AMITY_DB_PATH, then the temp dir)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Log level: trace, debug, info, warn or error
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Absolute directory for rolling log files
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,

    /// Seed for reproducible room choice
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create one or more rooms of the same kind
    CreateRoom {
        /// office or living_space
        kind: String,
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// Register a person and allocate rooms to them
    AddPerson {
        name: String,
        /// fellow or staff
        role: String,
        /// Fellow asks for a living space
        #[arg(long)]
        wants_accommodation: bool,
    },
    /// Bulk-load people from a text file
    LoadPeople { file: PathBuf },
    /// Move a person into another room of the same kind
    Reallocate { person: String, room: String },
    /// Print every room with its occupants
    PrintAllocations {
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long)]
        json: bool,
    },
    /// Print people still missing a room
    PrintUnallocated {
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long)]
        json: bool,
    },
    /// Print the occupants of one room
    PrintRoom {
        name: String,
        #[arg(long)]
        json: bool,
    },
    /// Retry allocation for everyone still missing a room
    AllocatePending,
}

impl Commands {
    /// Stable label used in log events.
    pub fn label(&self) -> &'static str {
        match self {
            Self::CreateRoom { .. } => "create_room",
            Self::AddPerson { .. } => "add_person",
            Self::LoadPeople { .. } => "load_people",
            Self::Reallocate { .. } => "reallocate",
            Self::PrintAllocations { .. } => "print_allocations",
            Self::PrintUnallocated { .. } => "print_unallocated",
            Self::PrintRoom { .. } => "print_room",
            Self::AllocatePending => "allocate_pending",
        }
    }
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
