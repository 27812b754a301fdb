use chrono::{Local, NaiveDate};

use ticklist::config::{self, TicklistConfig};
use ticklist::core::project::{NewProject, Project, ProjectColor, project_label};
use ticklist::core::recurrence::RecurrenceRule;
use ticklist::core::task::Task;
use ticklist::core::temporal::{self, DateRange, TemporalView};
use ticklist::input::parse_task_input;
use ticklist::lifecycle::{CompletionOutcome, TaskLifecycle};
use ticklist::store::MemoryStore;

const USAGE: &str = "usage: ticklist [--preview TEXT | --add TEXT [--every PHRASE] | --complete ID | --reopen ID \
| --reschedule ID DATE|none | --edit ID TEXT | --describe ID TEXT \
| --set-icon PROJECT_ID EMOJI|none | --today | --upcoming | --inbox | --search QUERY \
| --project NAME [--color COLOR] [--icon EMOJI]]";

/// Route log records to the systemd user journal (`journalctl --user -t ticklist -f`).
/// The ticklist crate logs at info, or debug once enabled; everything else at warn.
fn init_logging() {
    struct FilteredJournal {
        inner: systemd_journal_logger::JournalLog,
    }

    impl log::Log for FilteredJournal {
        fn enabled(&self, metadata: &log::Metadata) -> bool {
            if metadata.target().starts_with("ticklist") {
                let max = if ticklist::debug_logging() { log::LevelFilter::Debug } else { log::LevelFilter::Info };
                metadata.level() <= max
            } else {
                metadata.level() <= log::LevelFilter::Warn
            }
        }
        fn log(&self, record: &log::Record) {
            if self.enabled(record.metadata()) {
                self.inner.log(record);
            }
        }
        fn flush(&self) {
            self.inner.flush();
        }
    }

    let journal = match systemd_journal_logger::JournalLog::new() {
        Ok(journal) => journal.with_syslog_identifier("ticklist".to_string()),
        Err(e) => {
            eprintln!("journal logging unavailable: {}", e);
            return;
        }
    };
    if log::set_boxed_logger(Box::new(FilteredJournal { inner: journal })).is_ok() {
        // Global max must be Debug so ticklist debug logs can pass through when toggled
        log::set_max_level(log::LevelFilter::Debug);
    }
}

/// The value following `flag`, if present.
fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(|s| s.as_str())
}

/// The second value following `flag`, for two-argument flags like `--edit ID TEXT`.
fn second_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 2))
        .map(|s| s.as_str())
}

fn print_task(task: &Task, projects: &[Project]) {
    let check = if task.is_completed { "x" } else { " " };
    let mut line = format!("[{}] {}  {}", check, task.id, task.content);
    if let Some(priority) = task.priority {
        line.push_str(&format!("  p{}", priority.level()));
    }
    if let Some(due) = task.due_date {
        line.push_str(&format!("  due {}", due.format("%a %Y-%m-%d")));
    }
    if let Some(recurrence) = &task.recurrence {
        line.push_str(&format!("  ({})", recurrence));
    }
    line.push_str(&format!("  #{}", project_label(task.project_id.as_deref(), projects)));
    println!("{}", line);
}

fn print_view(title: &str, view: &TemporalView, projects: &[Project]) {
    println!("== {} ==", title);
    if !view.overdue.is_empty() {
        println!("-- Overdue --");
        for task in &view.overdue {
            print_task(task, projects);
        }
    }
    for (day, tasks) in view.group_by_day() {
        println!("-- {} --", day.format("%a %d %b"));
        for task in tasks {
            print_task(task, projects);
        }
    }
}

fn parse_date_arg(s: &str) -> Result<Option<NaiveDate>, Box<dyn std::error::Error>> {
    if s.eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    Ok(Some(NaiveDate::parse_from_str(s, "%Y-%m-%d")?))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Installed before the config is read so its load warnings reach the journal
    init_logging();
    let config = TicklistConfig::load(&config::config_path());
    ticklist::set_debug_logging(config.debug_logging);

    config.ensure_files()?;
    let store = MemoryStore::open(&config.data_directory)?;
    let lifecycle = TaskLifecycle::new(store);

    let args: Vec<String> = std::env::args().skip(1).collect();
    let now = Local::now().naive_local();
    let today = now.date();
    let projects = lifecycle.store().projects()?;

    if let Some(text) = flag_value(&args, "--preview") {
        let parsed = parse_task_input(text, &projects, now);
        println!("content:  {:?}", parsed.content);
        match parsed.date {
            Some(moment) => match moment.time {
                Some(_) => println!("due:      {}", moment.to_datetime().format("%a %Y-%m-%d %H:%M")),
                None => println!("due:      {}", moment.date.format("%a %Y-%m-%d")),
            },
            None => println!("due:      -"),
        }
        match parsed.priority {
            Some(p) => println!("priority: p{}", p.level()),
            None => println!("priority: -"),
        }
        println!("project:  {}", project_label(parsed.project_id.as_deref(), &projects));
    } else if let Some(text) = flag_value(&args, "--add") {
        let recurrence = flag_value(&args, "--every").map(|phrase| {
            let parsed = RecurrenceRule::parse(phrase);
            if parsed.is_fallback() {
                eprintln!("unrecognized recurrence {:?}, repeating weekly", phrase);
            }
            parsed.rule()
        });
        let id = lifecycle.create_from_input(text, &projects, now, recurrence).await?;
        println!("added {}", id);
    } else if let Some(id) = flag_value(&args, "--complete") {
        match lifecycle.set_completion(id, true, today).await? {
            CompletionOutcome::Completed { successor_id: Some(next) } => println!("completed {}; next is {}", id, next),
            CompletionOutcome::Completed { successor_id: None } => println!("completed {}", id),
            _ => println!("{} was already completed", id),
        }
    } else if let Some(id) = flag_value(&args, "--reopen") {
        match lifecycle.set_completion(id, false, today).await? {
            CompletionOutcome::Unchanged => println!("{} was already open", id),
            _ => println!("reopened {}", id),
        }
    } else if let Some(id) = flag_value(&args, "--reschedule") {
        let date = second_value(&args, "--reschedule").ok_or(USAGE)?;
        lifecycle.reschedule(id, parse_date_arg(date)?).await?;
        println!("rescheduled {}", id);
    } else if let Some(id) = flag_value(&args, "--edit") {
        let text = second_value(&args, "--edit").ok_or(USAGE)?;
        lifecycle.edit_content(id, text).await?;
        println!("edited {}", id);
    } else if let Some(id) = flag_value(&args, "--describe") {
        let text = second_value(&args, "--describe").ok_or(USAGE)?;
        lifecycle.edit_description(id, Some(text)).await?;
        println!("described {}", id);
    } else if let Some(id) = flag_value(&args, "--set-icon") {
        let icon = second_value(&args, "--set-icon").ok_or(USAGE)?;
        let icon = (!icon.eq_ignore_ascii_case("none")).then(|| icon.to_string());
        lifecycle.store().update_project_icon(id, icon)?;
        println!("updated project {}", id);
    } else if args.iter().any(|a| a == "--today") {
        let view = TemporalView::build(&lifecycle.store().list_tasks()?, today, DateRange::Today);
        print_view("Today", &view, &projects);
    } else if args.iter().any(|a| a == "--upcoming") {
        let view = TemporalView::build(&lifecycle.store().list_tasks()?, today, DateRange::Upcoming);
        print_view("Upcoming", &view, &projects);
    } else if let Some(query) = flag_value(&args, "--search") {
        for task in temporal::search(&lifecycle.store().list_tasks()?, query) {
            print_task(&task, &projects);
        }
    } else if let Some(name) = flag_value(&args, "--project") {
        let mut project = NewProject::new(name);
        if let Some(color) = flag_value(&args, "--color") {
            project.color = ProjectColor::parse(color).ok_or("unknown project color")?;
        }
        project.icon = flag_value(&args, "--icon").map(str::to_string);
        let id = lifecycle.store().add_project(project)?;
        println!("created project {}", id);
    } else if args.is_empty() || args.iter().any(|a| a == "--inbox") {
        println!("== Inbox ==");
        for task in temporal::inbox(&lifecycle.store().list_tasks()?, &projects) {
            print_task(&task, &projects);
        }
    } else {
        eprintln!("{}", USAGE);
        std::process::exit(2);
    }

    Ok(())
}
