mod init;
pub use init::cmd_init;

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Serialize;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::data_dir::{self, Workspace};
use crate::ops::day_nav::{self, MonthRef};
use crate::ops::order::select_active;
use crate::ops::task_ops;
use crate::util::wrap::wrap_to_lines;

type CmdResult = Result<(), Box<dyn std::error::Error>>;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> CmdResult {
    let json = cli.json;
    let start = start_dir(cli.dir.as_deref())?;

    let Some(cmd) = cli.command else {
        // No subcommand → launch TUI
        return crate::tui::run(&start);
    };

    match cmd {
        // Commands that work without a data directory
        Commands::Init(args) => cmd_init(args, &start),
        Commands::Cal(args) => cmd_cal(args, json),

        // Read commands
        Commands::List(args) => cmd_list(&workspace(&start)?, args, json),
        Commands::Active(args) => cmd_active(&workspace(&start)?, args, json),

        // Write commands
        Commands::Add(args) => cmd_add(&workspace(&start)?, args, json),
        Commands::Done(args) => cmd_set_completed(&workspace(&start)?, args, true, json),
        Commands::Reopen(args) => cmd_set_completed(&workspace(&start)?, args, false, json),
        Commands::Toggle(args) => cmd_toggle(&workspace(&start)?, args, json),
        Commands::Title(args) => cmd_title(&workspace(&start)?, args, json),
        Commands::Note(args) => cmd_note(&workspace(&start)?, args, json),
        Commands::Rm(args) => cmd_rm(&workspace(&start)?, args),
        Commands::Mv(args) => cmd_mv(&workspace(&start)?, args, json),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Directory discovery starts from: `-C` if given, else the working directory.
fn start_dir(dir: Option<&str>) -> Result<PathBuf, Box<dyn std::error::Error>> {
    match dir {
        Some(dir) => Ok(std::fs::canonicalize(Path::new(dir))
            .map_err(|e| format!("cannot resolve -C path '{}': {}", dir, e))?),
        None => Ok(std::env::current_dir()?),
    }
}

fn workspace(start: &Path) -> Result<Workspace, data_dir::DataDirError> {
    data_dir::discover_and_open(start)
}

fn date_arg(date: Option<&str>) -> Result<NaiveDate, day_nav::DateError> {
    match date {
        Some(s) => day_nav::parse_date(s),
        None => Ok(day_nav::today()),
    }
}

fn print_json<T: Serialize>(value: &T) -> CmdResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_list(ws: &Workspace, args: ListArgs, json: bool) -> CmdResult {
    let date = date_arg(args.date.as_deref())?;
    let tasks = task_ops::load_day(&ws.store, Some(date))?;
    let active = select_active(&tasks);

    if json {
        return print_json(&day_to_json(date, &tasks, active));
    }
    let notes_width = args.notes.then_some(ws.config.wrap.list_width);
    for line in format_day(date, &tasks, active, notes_width) {
        println!("{}", line);
    }
    Ok(())
}

fn cmd_active(ws: &Workspace, args: ActiveArgs, json: bool) -> CmdResult {
    let date = date_arg(args.date.as_deref())?;
    let tasks = task_ops::load_day(&ws.store, Some(date))?;
    let active = select_active(&tasks);
    let width = ws.config.wrap.focus_width;

    if json {
        return print_json(&ActiveJson {
            date,
            task: active.map(|t| task_to_json(t, true)),
            lines: active.map(|t| wrap_to_lines(&t.notes, width)),
        });
    }
    match active {
        Some(task) => {
            println!("{}", format_task_line(task, true));
            for line in format_note_lines(&task.notes, width) {
                println!("{}", line);
            }
        }
        None => println!("nothing left to do on {}", day_nav::heading(date)),
    }
    Ok(())
}

fn cmd_cal(args: CalArgs, json: bool) -> CmdResult {
    let month = match args.month.as_deref() {
        Some(s) => MonthRef::parse(s)?,
        None => MonthRef::of(day_nav::today()),
    };
    if json {
        return print_json(&month_to_json(month));
    }
    for line in format_month(month) {
        println!("{}", line);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

/// Print a changed task: its line, or its JSON.
fn report_task(task: &crate::model::task::TaskRecord, json: bool) -> CmdResult {
    if json {
        return print_json(&task_to_json(task, false));
    }
    println!("{}", format_task_line(task, false));
    Ok(())
}

fn cmd_add(ws: &Workspace, args: AddArgs, json: bool) -> CmdResult {
    let date = date_arg(args.date.as_deref())?;
    let current = task_ops::load_day(&ws.store, Some(date))?;
    let notes = args.notes.as_deref().unwrap_or_default();
    let task = task_ops::add_task(&ws.store, Some(date), &args.title, notes, &current)?;

    if json {
        return print_json(&task_to_json(&task, false));
    }
    println!("{}", task.id);
    Ok(())
}

fn cmd_set_completed(ws: &Workspace, args: IdArg, completed: bool, json: bool) -> CmdResult {
    let task = task_ops::set_completed(&ws.store, &args.id, completed)?;
    report_task(&task, json)
}

fn cmd_toggle(ws: &Workspace, args: IdArg, json: bool) -> CmdResult {
    let current = ws.store.find(&args.id)?;
    let task = task_ops::toggle_completion(&ws.store, &current)?;
    report_task(&task, json)
}

fn cmd_title(ws: &Workspace, args: TitleArgs, json: bool) -> CmdResult {
    let task = task_ops::edit_title(&ws.store, &args.id, &args.title)?;
    report_task(&task, json)
}

fn cmd_note(ws: &Workspace, args: NoteArgs, json: bool) -> CmdResult {
    let task = task_ops::set_notes(&ws.store, &args.id, &args.text)?;
    if json {
        return print_json(&task_to_json(&task, false));
    }
    println!("{} notes updated", task.id);
    Ok(())
}

fn cmd_rm(ws: &Workspace, args: IdArg) -> CmdResult {
    task_ops::delete_task(&ws.store, &args.id)?;
    println!("{} deleted", args.id);
    Ok(())
}

fn cmd_mv(ws: &Workspace, args: MvArgs, json: bool) -> CmdResult {
    let date = match args.date.as_deref() {
        Some(s) => day_nav::parse_date(s)?,
        None => ws.store.find(&args.id)?.date,
    };
    let tasks = task_ops::load_day(&ws.store, Some(date))?;
    let outcome = task_ops::reorder_and_persist(&ws.store, &tasks, &args.id, &args.target);

    if !outcome.moved {
        return Err(format!(
            "cannot move {} onto {}: both must be distinct tasks on {}",
            args.id, args.target, date
        )
        .into());
    }

    let active = select_active(&outcome.tasks);
    if json {
        print_json(&MoveJson {
            moved: outcome.moved,
            tasks: day_to_json(date, &outcome.tasks, active).tasks,
            failed: outcome.failed.iter().map(|(id, _)| id.clone()).collect(),
        })?;
    } else {
        for line in format_day(date, &outcome.tasks, active, None) {
            println!("{}", line);
        }
    }

    if let Some((id, err)) = outcome.failed.first() {
        return Err(format!(
            "{} priority write(s) failed (first: {}: {}); run the move again to retry",
            outcome.failed.len(),
            id,
            err
        )
        .into());
    }
    Ok(())
}
