use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use waypost_core::DrawingKind;

#[derive(Parser)]
#[command(name = "waypost")]
#[command(about = "Manage map markers and drawings from the command line")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Optional path to the local data directory
    #[arg(long, global = true, value_name = "PATH")]
    pub data_dir: Option<PathBuf>,

    /// Base URL of the remote sync service
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Drop a new marker
    #[command(alias = "new")]
    Add {
        /// Marker name
        name: String,
        /// Latitude in decimal degrees
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        /// Longitude in decimal degrees
        #[arg(long, allow_hyphen_values = true)]
        lng: f64,
        /// Icon key understood by the viewer
        #[arg(long)]
        icon: Option<String>,
        /// Free-form note attached to the marker
        #[arg(long)]
        note: Option<String>,
    },
    /// Save a new drawing
    Draw {
        /// Drawing name
        name: String,
        /// Geometry kind
        #[arg(long, value_enum)]
        kind: DrawingKindArg,
        /// Vertex as "LAT,LNG"; repeat once per point
        #[arg(long = "point", value_name = "LAT,LNG", required = true)]
        points: Vec<String>,
        /// Stroke/fill color (CSS color string)
        #[arg(long)]
        color: Option<String>,
    },
    /// List saved records
    List {
        /// Which collection to list
        #[arg(value_enum, default_value_t = Collection::Markers)]
        collection: Collection,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Rename an existing record
    Rename {
        /// Which collection the record lives in
        #[arg(value_enum)]
        collection: Collection,
        /// Record ID or unique ID prefix
        id: String,
        /// New name
        name: String,
    },
    /// Delete an existing record
    Delete {
        /// Which collection the record lives in
        #[arg(value_enum)]
        collection: Collection,
        /// Record ID or unique ID prefix
        id: String,
    },
    /// Replace local collections with the remote snapshot (remote wins)
    Pull,
    /// Replace remote collections with the local ones (client wins)
    Push,
    /// Show local record counts and remote reachability
    Status,
    /// Export all collections as JSON
    Export {
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: CompletionShell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum Collection {
    Markers,
    Drawings,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum DrawingKindArg {
    Polyline,
    Polygon,
    Rectangle,
    Circle,
}

impl From<DrawingKindArg> for DrawingKind {
    fn from(value: DrawingKindArg) -> Self {
        match value {
            DrawingKindArg::Polyline => Self::Polyline,
            DrawingKindArg::Polygon => Self::Polygon,
            DrawingKindArg::Rectangle => Self::Rectangle,
            DrawingKindArg::Circle => Self::Circle,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}
