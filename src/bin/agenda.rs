use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use crm_desk::calendar::notify::LogNotifier;
use crm_desk::calendar::TaskFilter;
use crm_desk::projection::SortState;
use crm_desk::storage::FolderStorage;
use crm_desk::utils::{ask_confirmation, print_reminders, print_task};
use crm_desk::{RecordId, ReminderScheduler, TaskStore};

/// Lists the calendar tasks stored in a folder, and their pending reminders
#[derive(Parser)]
#[command(name = "agenda", version)]
struct Cli {
    /// The folder the tasks are stored in (defaults to ~/.config/crm-desk)
    folder: Option<PathBuf>,

    /// Delete a task (after a confirmation)
    #[arg(long, value_name = "ID")]
    delete: Option<String>,
}

#[tokio::main]
async fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let folder = cli.folder.unwrap_or_else(FolderStorage::default_folder);
    let scheduler = match ReminderScheduler::new(Arc::new(LogNotifier)) {
        Ok(scheduler) => scheduler,
        Err(err) => {
            log::error!("{}", err);
            return;
        },
    };
    let mut store = TaskStore::open(FolderStorage::new(&folder), scheduler);

    if let Some(id) = cli.delete {
        let id = RecordId::from(id);
        let result = store.delete(&id, |task| {
            ask_confirmation(&format!("Are you sure you want to delete \"{}\"?", task.title()))
        });
        match result {
            Err(err) => log::error!("{}", err),
            Ok(false) => println!("Nothing deleted"),
            Ok(true) => println!("Task {} deleted", id),
        }
    }

    println!("---- Tasks in {} -----", folder.display());
    let by_start = SortState::ascending("start");
    for task in store.view(&TaskFilter::default(), Some(&by_start)) {
        print_task(task);
    }

    println!("---- Pending reminders -----");
    print_reminders(store.reminders());
}
