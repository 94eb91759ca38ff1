use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "sk", about = concat!("sticky v", env!("CARGO_PKG_VERSION"), " - one day, one list"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Run as if started in this directory
    #[arg(short = 'C', long = "dir", global = true)]
    pub dir: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a .sticky/ data directory here
    Init(InitArgs),
    /// List a day's tasks in display order
    List(ListArgs),
    /// Show the active (first incomplete) task
    Active(ActiveArgs),
    /// Add a task at the end of a day
    Add(AddArgs),
    /// Mark a task done
    Done(IdArg),
    /// Mark a task not done
    Reopen(IdArg),
    /// Flip a task's completion
    Toggle(IdArg),
    /// Change a task's title
    Title(TitleArgs),
    /// Replace a task's notes
    Note(NoteArgs),
    /// Delete a task
    Rm(IdArg),
    /// Move a task to another task's position within its day
    Mv(MvArgs),
    /// Print a month calendar
    Cal(CalArgs),
}

#[derive(Args)]
pub struct InitArgs {
    /// Reinitialize even if .sticky/ already exists
    #[arg(long)]
    pub force: bool,
}

#[derive(Args)]
pub struct ListArgs {
    /// Day to list, YYYY-MM-DD (default: today)
    #[arg(long)]
    pub date: Option<String>,
    /// Show wrapped notes under each task
    #[arg(long)]
    pub notes: bool,
}

#[derive(Args)]
pub struct ActiveArgs {
    /// Day to look at, YYYY-MM-DD (default: today)
    #[arg(long)]
    pub date: Option<String>,
}

#[derive(Args)]
pub struct AddArgs {
    /// Task title
    pub title: String,
    /// Day to add to, YYYY-MM-DD (default: today)
    #[arg(long)]
    pub date: Option<String>,
    /// Initial notes
    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(Args)]
pub struct IdArg {
    /// Task ID
    pub id: String,
}

#[derive(Args)]
pub struct TitleArgs {
    /// Task ID
    pub id: String,
    /// New title
    pub title: String,
}

#[derive(Args)]
pub struct NoteArgs {
    /// Task ID
    pub id: String,
    /// Note text (empty clears)
    pub text: String,
}

#[derive(Args)]
pub struct MvArgs {
    /// Task to move
    pub id: String,
    /// Task whose position it takes
    pub target: String,
    /// Day both tasks belong to (default: the moved task's day)
    #[arg(long)]
    pub date: Option<String>,
}

#[derive(Args)]
pub struct CalArgs {
    /// Month to print, YYYY-MM (default: this month)
    pub month: Option<String>,
}
