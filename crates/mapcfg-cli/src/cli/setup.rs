use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    Layer,
    Tool,
}

impl From<KindArg> for mapcfg::model::ItemKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Layer => mapcfg::model::ItemKind::Layer,
            KindArg::Tool => mapcfg::model::ItemKind::Tool,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "mapcfg",
    bin_name = "mapcfg",
    version,
    disable_help_subcommand = true,
    after_help = "Project settings are read from .mapcfg/mapcfg.toml; MAPCFG_* variables override them."
)]
#[command(about = "Arrange map layers, tools and pickers in a viewer configuration", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration document to edit (defaults to the configured document)
    #[arg(long, global = true, help_heading = "Options")]
    pub document: Option<PathBuf>,

    /// Candidate buckets JSON used for display names and picker rows
    #[arg(long, global = true, help_heading = "Options")]
    pub candidates: Option<PathBuf>,

    /// Save even if the document changed since it was loaded
    #[arg(long, global = true, help_heading = "Options")]
    pub force: bool,

    /// More log output on stderr (repeat for trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count, help_heading = "Options")]
    pub verbose: u8,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text, help_heading = "Options")]
    pub output: OutputFormat,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List items of a zone (or of one group) in display order
    #[command(alias = "ls")]
    Flatten {
        /// Zone to flatten (defaults to the layer menu)
        #[arg(long, short)]
        zone: Option<String>,

        /// Only the subtree of this group
        #[arg(long, short)]
        group: Option<String>,

        /// Only items whose name contains this text
        #[arg(long, short)]
        query: Option<String>,
    },

    /// Add a layer, tool or group
    Insert {
        #[command(subcommand)]
        what: InsertCommands,
    },

    /// Remove items or groups from a zone
    #[command(alias = "rm")]
    Remove {
        /// Zone to remove from (defaults to wherever the id is placed)
        #[arg(long, short)]
        zone: Option<String>,

        /// Ids to remove
        #[arg(required = true, num_args = 1..)]
        ids: Vec<String>,
    },

    /// Move an item or group within or across zones
    #[command(alias = "mv")]
    Move {
        /// Id of the item or group to move
        id: String,

        /// Zone the node is in (defaults to wherever the id is placed)
        #[arg(long)]
        from: Option<String>,

        /// Destination zone (defaults to the source zone)
        #[arg(long)]
        to: Option<String>,

        /// Destination group (defaults to the zone root)
        #[arg(long, short)]
        group: Option<String>,

        /// Position among the current siblings (a new parent always appends)
        #[arg(long, short)]
        index: Option<usize>,
    },

    /// Select or deselect candidates in a picker
    Toggle {
        /// Picker to edit
        #[arg(long, short, default_value = "search")]
        picker: String,

        /// Candidate ids to flip
        #[arg(required = true, num_args = 1..)]
        ids: Vec<String>,
    },

    /// Set the access groups an item is visible for
    Scope(ScopeArgs),

    /// Show a picker checklist, optionally filtered
    List {
        /// Picker to show
        #[arg(long, short, default_value = "search")]
        picker: String,

        /// Filter text (selected rows always stay visible)
        #[arg(default_value = "")]
        query: String,
    },

    /// Resolve ids to display names using the candidate buckets
    Resolve {
        #[arg(required = true, num_args = 1..)]
        ids: Vec<String>,
    },

    /// Show the zones and what they accept
    Zones {
        /// Only zones accepting this kind
        #[arg(long, short, value_enum)]
        kind: Option<KindArg>,
    },

    /// Check the stored document for inconsistencies
    Doctor {
        /// Write back the normalized document
        #[arg(long)]
        fix: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum InsertCommands {
    /// Add a layer to the layer menu
    Layer {
        id: String,

        /// Parent group (defaults to the root)
        #[arg(long, short)]
        parent: Option<String>,

        #[arg(long, short)]
        index: Option<usize>,
    },

    /// Add a tool to a tool slot
    Tool {
        /// Tool type, e.g. search or print
        tool_type: String,

        /// Target slot (defaults to the configured default target)
        #[arg(long, short)]
        target: Option<String>,

        #[arg(long, short)]
        index: Option<usize>,
    },

    /// Add an empty group to the layer menu
    Group {
        /// Group id (generated when omitted)
        #[arg(long)]
        id: Option<String>,

        #[arg(long, short)]
        caption: Option<String>,

        #[arg(long, short)]
        parent: Option<String>,

        #[arg(long, short)]
        index: Option<usize>,
    },
}

#[derive(Args, Debug)]
pub struct ScopeArgs {
    /// Item id
    pub id: String,

    /// Comma separated access groups (empty means everyone)
    pub groups: String,

    /// Scope a picker selection
    #[arg(long, short, conflicts_with = "zone")]
    pub picker: Option<String>,

    /// Scope a placed item in this zone (defaults to wherever the id is placed)
    #[arg(long, short)]
    pub zone: Option<String>,
}

pub fn parse_cli() -> Cli {
    Cli::parse()
}
