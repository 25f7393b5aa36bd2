//! CLI interface for course-flow

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

use crate::app::{Planner, SyncOutcome};
use crate::config::{self, Config};
use crate::schedule::{CourseDraft, CoursePatch, TermCalendar};
use crate::storage::{FileStore, KeyValueStore, MemoryStore, ScheduleStore};
use crate::suggest::{CourseSuggester, OpenRouterSuggester};
use crate::theme::Theme;
use crate::types::{parse_weeks, Day, TimeSlot, TERM_WEEKS};
use crate::view::Renderer;

#[derive(Parser)]
#[command(name = "course-flow")]
#[command(about = "Weekly course timetable with local persistence and AI-assisted planning", long_about = None)]
#[command(version)]
struct Cli {
    /// Keep everything in memory; nothing is read from or written to disk
    #[arg(long, global = true)]
    ephemeral: bool,

    /// Disable colours
    #[arg(long, global = true)]
    plain: bool,

    /// Directory holding the schedule files (overrides config)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the timetable grid for a week (default when no command given)
    Show {
        /// Week of the term
        #[arg(short, long, default_value = "1", value_parser = week_arg)]
        week: u8,
    },
    /// List courses, optionally only those meeting in a week
    List {
        #[arg(short, long, value_parser = week_arg)]
        week: Option<u8>,
    },
    /// Show one course in detail
    Info {
        /// Course id
        id: String,
    },
    /// Add a course
    Add {
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long, default_value = "")]
        instructor: String,
        #[arg(long, default_value = "")]
        room: String,
        #[arg(long, default_value = "Monday", value_parser = day_arg)]
        day: Day,
        #[arg(long, default_value = "1st Period", value_parser = slot_arg)]
        slot: TimeSlot,
        /// Display gradient, e.g. "from-pink-400 to-rose-500"
        #[arg(long)]
        color: Option<String>,
        /// Active weeks, e.g. "1-9,12" (parsed as one value)
        #[arg(long, value_parser = weeks_arg)]
        weeks: Option<::std::vec::Vec<u8>>,
    },
    /// Edit fields of a course
    Edit {
        /// Course id
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        instructor: Option<String>,
        #[arg(long)]
        room: Option<String>,
        #[arg(long, value_parser = day_arg)]
        day: Option<Day>,
        #[arg(long, value_parser = slot_arg)]
        slot: Option<TimeSlot>,
        #[arg(long)]
        color: Option<String>,
        #[arg(long, value_parser = weeks_arg)]
        weeks: Option<::std::vec::Vec<u8>>,
    },
    /// Remove a course
    Remove {
        /// Course id
        id: String,
    },
    /// Replace the schedule with an AI suggestion for a goal
    Suggest {
        /// Career path or study goal
        #[arg(required = true, num_args = 1..)]
        goal: Vec<String>,
    },
    /// Report double-booked slots
    Conflicts {
        /// Only this week (default: whole term)
        #[arg(short, long, value_parser = week_arg)]
        week: Option<u8>,
    },
    /// Show block count and load for a week
    Stats {
        #[arg(short, long, default_value = "1", value_parser = week_arg)]
        week: u8,
    },
    /// Show or change the display theme
    Theme {
        /// toggle, dark, light or show
        #[arg(default_value = "toggle")]
        action: String,
    },
    /// Restore the example schedule
    Reset,
    /// Configure course-flow
    Config {
        /// Store the suggestion service API key
        #[arg(long)]
        set_api_key: Option<String>,
        /// Forget the stored API key
        #[arg(long)]
        delete_api_key: bool,
        /// Set the suggestion model
        #[arg(long)]
        set_model: Option<String>,
        /// Show current configuration
        #[arg(long)]
        show: bool,
        /// Print the default configuration file
        #[arg(long)]
        print_default: bool,
        /// Reset configuration to defaults
        #[arg(long)]
        reset: bool,
    },
}

fn week_arg(s: &str) -> Result<u8, String> {
    let week: u8 = s.parse().map_err(|_| format!("'{}' is not a week number", s))?;
    if !crate::types::is_term_week(week) {
        return Err(format!("week must be between 1 and {}", TERM_WEEKS));
    }
    Ok(week)
}

fn day_arg(s: &str) -> Result<Day, String> {
    Day::parse(s).ok_or_else(|| format!("'{}' is not a weekday (Monday-Friday)", s))
}

fn slot_arg(s: &str) -> Result<TimeSlot, String> {
    TimeSlot::parse(s).ok_or_else(|| format!("'{}' is not a period (1st-4th)", s))
}

fn weeks_arg(s: &str) -> Result<Vec<u8>, String> {
    parse_weeks(s).ok_or_else(|| format!("'{}' is not a week list within 1-{}", s, TERM_WEEKS))
}

fn open_planner(cli: &Cli, config: &Config) -> Result<Planner> {
    let backend: Arc<dyn KeyValueStore> = if cli.ephemeral {
        Arc::new(MemoryStore::new())
    } else {
        let dir = match &cli.data_dir {
            Some(dir) => dir.clone(),
            None => config.resolved_data_dir()?,
        };
        Arc::new(FileStore::new(dir).context("Failed to open schedule storage")?)
    };

    Ok(Planner::open(
        ScheduleStore::new(backend),
        TermCalendar::new(config.term.start_date),
    ))
}

fn renderer(cli: &Cli, planner: &Planner) -> Renderer {
    let styled = !cli.plain && std::io::stdout().is_terminal();
    Renderer::new(planner.theme(), styled)
}

fn print_week(planner: &Planner, renderer: &Renderer) {
    let week = planner.current_week();
    println!("{} Week {} of {}", planner.theme().icon(), week, TERM_WEEKS);
    println!("{}", renderer.week_selector(week));
    println!();
    print!("{}", renderer.grid(planner.registry(), week, planner.calendar()));
    println!();
    println!("{}", renderer.stats(&planner.stats()));
}

/// Run the CLI
pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    // Config commands do not touch the schedule
    if let Some(Commands::Config { set_api_key, delete_api_key, set_model, print_default, reset, .. }) = &cli.command {
        if let Some(key) = set_api_key {
            crate::security::set_api_key(key)?;
            println!("API key stored securely.");
        } else if *delete_api_key {
            crate::security::delete_api_key()?;
            println!("API key removed.");
        } else if let Some(model) = set_model {
            config::set_model(model)?;
        } else if *print_default {
            print!("{}", config::default_config_toml());
        } else if *reset {
            config::reset_config()?;
        } else {
            // --show is the default
            config::show_config()?;
        }
        return Ok(());
    }

    let config = Config::load()?;
    let mut planner = open_planner(&cli, &config)?;

    match &cli.command {
        None => {
            print_week(&planner, &renderer(&cli, &planner));
        }
        Some(Commands::Show { week }) => {
            planner.select_week(*week)?;
            print_week(&planner, &renderer(&cli, &planner));
        }
        Some(Commands::List { week }) => {
            let renderer = renderer(&cli, &planner);
            let listing = match week {
                Some(w) => renderer.course_list(planner.registry().active_in(*w)),
                None => renderer.course_list(planner.registry().courses()),
            };
            if listing.is_empty() {
                println!("No courses.");
            } else {
                print!("{}", listing);
            }
        }
        Some(Commands::Info { id }) => {
            let course = planner
                .registry()
                .get(id)
                .with_context(|| format!("No course with id '{}'", id))?;
            print!("{}", renderer(&cli, &planner).course_detail(course));
        }
        Some(Commands::Add { name, instructor, room, day, slot, color, weeks }) => {
            let mut draft = CourseDraft::new(name.clone(), instructor.clone());
            draft.room = room.clone();
            draft.day = *day;
            draft.time_slot = *slot;
            if let Some(color) = color {
                draft.color = color.clone();
            }
            if let Some(weeks) = weeks {
                draft.weeks = weeks.clone();
            }

            let course = planner.add_course(draft)?;
            println!("Added {} ({}) on {} {}", course.name, course.id, course.day, course.time_slot);
        }
        Some(Commands::Edit { id, name, instructor, room, day, slot, color, weeks }) => {
            let patch = CoursePatch {
                name: name.clone(),
                instructor: instructor.clone(),
                room: room.clone(),
                day: *day,
                time_slot: *slot,
                color: color.clone(),
                weeks: weeks.clone(),
            };
            if patch.is_empty() {
                bail!("Nothing to change. Pass at least one field, e.g. --room \"Hall B\"");
            }

            let course = planner.edit_course(id, patch)?;
            print!("{}", renderer(&cli, &planner).course_detail(&course));
        }
        Some(Commands::Remove { id }) => {
            match planner.remove_course(id)? {
                Some(course) => println!("Removed {} ({})", course.name, course.id),
                None => println!("No course with id '{}'; nothing removed.", id),
            }
        }
        Some(Commands::Suggest { goal }) => {
            let goal = goal.join(" ");
            let suggester = OpenRouterSuggester::from_keyring(&config.ai).map_err(|e| {
                warn!("Cannot create suggestion client: {}", e);
                anyhow::anyhow!("{} Run 'course-flow config --set-api-key YOUR_KEY' first.", e.user_notice())
            })?;
            sync(&mut planner, &suggester, &goal).await?;
            print_week(&planner, &renderer(&cli, &planner));
        }
        Some(Commands::Conflicts { week }) => {
            let weeks: Vec<u8> = match week {
                Some(w) => vec![*w],
                None => (1..=TERM_WEEKS).collect(),
            };
            let conflicts: Vec<_> = weeks
                .into_iter()
                .flat_map(|w| planner.registry().conflicts(w))
                .collect();

            if conflicts.is_empty() {
                println!("No double-booked slots.");
            } else {
                println!("Double-booked slots (the first course listed is shown on the grid):");
                print!("{}", renderer(&cli, &planner).conflicts(planner.registry(), &conflicts));
            }
        }
        Some(Commands::Stats { week }) => {
            planner.select_week(*week)?;
            println!("Week {}", week);
            println!("{}", renderer(&cli, &planner).stats(&planner.stats()));
        }
        Some(Commands::Theme { action }) => {
            let theme = match action.trim().to_lowercase().as_str() {
                "toggle" => planner.toggle_theme()?,
                "show" => planner.theme(),
                other => match Theme::parse(other) {
                    Some(theme) => planner.set_theme(theme)?,
                    None => bail!("Unknown theme action '{}'. Use toggle, dark, light or show", other),
                },
            };
            println!("{} Theme: {}", theme.icon(), theme);
        }
        Some(Commands::Reset) => {
            planner.reset_to_seed()?;
            println!("Schedule reset to the example courses.");
        }
        // Handled before the schedule is opened
        Some(Commands::Config { .. }) => {}
    }

    Ok(())
}

/// Run one sync, with a spinner, cancellable with Ctrl-C
async fn sync<S>(planner: &mut Planner, suggester: &S, goal: &str) -> Result<()>
where
    S: CourseSuggester + ?Sized,
{
    let Some(ticket) = planner.begin_sync(goal).map_err(|e| anyhow::anyhow!(e.user_notice()))? else {
        println!("Enter a goal to sync a schedule.");
        return Ok(());
    };

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("  {spinner:.dim} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(format!("Planning courses for \"{}\"...", goal.trim()));
    spinner.enable_steady_tick(Duration::from_millis(80));

    let result = tokio::select! {
        result = suggester.suggest(goal.trim()) => Some(result),
        _ = tokio::signal::ctrl_c() => None,
    };
    spinner.finish_and_clear();

    let Some(result) = result else {
        planner.cancel_sync();
        println!("Sync cancelled; schedule unchanged.");
        return Ok(());
    };

    match planner.finish_sync(ticket, result) {
        Ok(SyncOutcome::Replaced(count)) => {
            println!("Schedule replaced with {} suggested courses.", count);
            Ok(())
        }
        Ok(SyncOutcome::Skipped) | Ok(SyncOutcome::Discarded) => Ok(()),
        Err(e) => {
            warn!("Sync failed: {}", e);
            bail!("{}", e.user_notice())
        }
    }
}
