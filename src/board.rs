//! A kanban board: cards that move between fixed columns

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::collection::Collection;
use crate::priority::Priority;
use crate::projection::{FieldValue, Fields};
use crate::record::RecordId;
use crate::traits::Record;


/// The columns of the board, left to right
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ColumnId {
    Todo,
    InProgress,
    Review,
    Done,
}

impl ColumnId {
    pub const ALL: [ColumnId; 4] = [ColumnId::Todo, ColumnId::InProgress, ColumnId::Review, ColumnId::Done];

    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnId::Todo => "todo",
            ColumnId::InProgress => "inProgress",
            ColumnId::Review => "review",
            ColumnId::Done => "done",
        }
    }

    /// The heading displayed above the column
    pub fn title(&self) -> &'static str {
        match self {
            ColumnId::Todo => "To Do",
            ColumnId::InProgress => "In Progress",
            ColumnId::Review => "Review",
            ColumnId::Done => "Done",
        }
    }
}

impl Display for ColumnId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ColumnId {
    type Err = Box<dyn Error>;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.iter()
            .find(|c| c.as_str() == s)
            .copied()
            .ok_or_else(|| format!("Unknown board column {:?}", s).into())
    }
}


/// A card of the board
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardTask {
    id: RecordId,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub assignee: String,
    pub due_date: NaiveDate,
    /// The column this card is in. Only the board changes it.
    status: ColumnId,
}

impl BoardTask {
    /// Create a new card, with a new random ID. Its status is set when it is added to a board.
    pub fn new(title: &str, description: &str, priority: Priority, assignee: &str, due_date: NaiveDate) -> Self {
        Self::with_id(RecordId::random(), title, description, priority, assignee, due_date)
    }

    pub fn with_id(id: RecordId, title: &str, description: &str, priority: Priority, assignee: &str, due_date: NaiveDate) -> Self {
        Self {
            id,
            title: title.to_string(),
            description: description.to_string(),
            priority,
            assignee: assignee.to_string(),
            due_date,
            status: ColumnId::Todo,
        }
    }

    pub fn id(&self) -> &RecordId   { &self.id     }
    pub fn status(&self) -> ColumnId { self.status  }
}

impl Record for BoardTask {
    fn id(&self) -> &RecordId {
        &self.id
    }
}

impl Fields for BoardTask {
    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        match name {
            "title" => Some(FieldValue::Text(&self.title)),
            "description" => Some(FieldValue::Text(&self.description)),
            "priority" => Some(FieldValue::Text(self.priority.as_str())),
            "assignee" => Some(FieldValue::Text(&self.assignee)),
            "dueDate" => Some(FieldValue::Date(self.due_date)),
            "status" => Some(FieldValue::Text(self.status.as_str())),
            _ => None,
        }
    }
}


/// A position on the board
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Location {
    pub column: ColumnId,
    pub index: usize,
}

impl Location {
    pub fn new(column: ColumnId, index: usize) -> Self {
        Self { column, index }
    }
}


/// The four columns of the board, each an ordered list of cards
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "StoredBoard")]
pub struct Board {
    todo: Collection<BoardTask>,
    in_progress: Collection<BoardTask>,
    review: Collection<BoardTask>,
    done: Collection<BoardTask>,
}

/// A board as it is stored, before its cards are checked
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredBoard {
    #[serde(default)]
    todo: Vec<BoardTask>,
    #[serde(default)]
    in_progress: Vec<BoardTask>,
    #[serde(default)]
    review: Vec<BoardTask>,
    #[serde(default)]
    done: Vec<BoardTask>,
}

/// Card ids must be unique across the board. Every card gets the status of the column it is stored in.
impl TryFrom<StoredBoard> for Board {
    type Error = String;

    fn try_from(stored: StoredBoard) -> Result<Self, Self::Error> {
        let mut board = Board::new();
        let columns = [
            (ColumnId::Todo, stored.todo),
            (ColumnId::InProgress, stored.in_progress),
            (ColumnId::Review, stored.review),
            (ColumnId::Done, stored.done),
        ];
        for (column, cards) in columns {
            for task in cards {
                if task.status != column {
                    log::warn!("Card {} was stored in {} with status {}", task.id(), column, task.status);
                }
                board.add(column, task).map_err(|err| err.to_string())?;
            }
        }
        Ok(board)
    }
}

impl Board {
    /// An empty board
    pub fn new() -> Self {
        Self::default()
    }

    pub fn column(&self, id: ColumnId) -> &Collection<BoardTask> {
        match id {
            ColumnId::Todo => &self.todo,
            ColumnId::InProgress => &self.in_progress,
            ColumnId::Review => &self.review,
            ColumnId::Done => &self.done,
        }
    }

    fn column_mut(&mut self, id: ColumnId) -> &mut Collection<BoardTask> {
        match id {
            ColumnId::Todo => &mut self.todo,
            ColumnId::InProgress => &mut self.in_progress,
            ColumnId::Review => &mut self.review,
            ColumnId::Done => &mut self.done,
        }
    }

    /// Returns every column, left to right
    pub fn columns(&self) -> impl Iterator<Item = (ColumnId, &Collection<BoardTask>)> {
        ColumnId::ALL.into_iter().map(move |id| (id, self.column(id)))
    }

    /// Returns where a card is
    pub fn locate(&self, id: &RecordId) -> Option<Location> {
        self.columns()
            .find_map(|(column, cards)| cards.position(id).map(|index| Location::new(column, index)))
    }

    /// Append a card at the bottom of a column
    pub fn add(&mut self, column: ColumnId, mut task: BoardTask) -> Result<(), Box<dyn Error>> {
        if let Some(existing) = self.locate(task.id()) {
            return Err(format!("Card {} is already on the board (in {})", task.id(), existing.column).into());
        }
        task.status = column;
        log::info!("Card {} added to {}", task.id(), column.title());
        self.column_mut(column).insert(task)
    }

    /// Move the card at `source` to `destination`, like a drag-and-drop does.
    ///
    /// A `None` destination means the drop has been cancelled, and nothing changes.
    /// The destination index is clamped to the length of the column. The card takes the status of its new column.
    /// On error, the board is left untouched.
    pub fn move_card(&mut self, source: Location, destination: Option<Location>) -> Result<(), Box<dyn Error>> {
        let destination = match destination {
            None => return Ok(()),
            Some(d) => d,
        };

        let id = match self.column(source.column).at(source.index) {
            None => return Err(format!("There is no card at index {} of {}", source.index, source.column).into()),
            Some(task) => task.id().clone(),
        };
        if source.column != destination.column && self.column(destination.column).contains(&id) {
            return Err(format!("Card {} is already in {}", id, destination.column).into());
        }

        let mut task = self.column_mut(source.column).remove_at(source.index)
            .ok_or_else(|| format!("There is no card at index {} of {}", source.index, source.column))?;
        task.status = destination.column;
        if let Err(err) = self.column_mut(destination.column).insert_at(destination.index, task.clone()) {
            task.status = source.column;
            self.column_mut(source.column).insert_at(source.index, task)?;
            return Err(err);
        }

        log::info!("Card {} moved to {}", id, destination.column.title());
        Ok(())
    }

    /// Remove a card, provided `confirm` agrees. Returns whether the card has been removed.
    pub fn remove<F>(&mut self, id: &RecordId, confirm: F) -> Result<bool, Box<dyn Error>>
    where
        F: FnOnce(&BoardTask) -> bool,
    {
        let location = self.locate(id)
            .ok_or_else(|| format!("No card with id {}", id))?;
        Ok(self.column_mut(location.column).remove_confirmed(id, confirm)?.is_some())
    }
}

/// The board a new workspace starts with
pub fn sample_board() -> Board {
    let mut board = Board::new();
    let first = BoardTask::with_id(
        RecordId::from(1),
        "Implement new feature",
        "Add user authentication",
        Priority::High,
        "John Doe",
        NaiveDate::from_ymd_opt(2024, 3, 25).expect("invalid sample date"),
    );
    if let Err(err) = board.add(ColumnId::Todo, first) {
        log::error!("Unable to build the sample board: {}", err);
    }
    board
}
