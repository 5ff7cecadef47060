use crate::changes::StoreEvent;
use crate::models::{ActivityKind, Period, PeriodError, TaskActivity, TaskItem, TaskList};
use crate::tasks::{CompletionEngine, ItemManager, ListManager, TaskError};
use crate::tui::error::TuiError;
use crate::tui::widgets::editor::Editor;
use crate::{Config, Database};
use mockable::{Clock, DefaultClock};
use ratatui::widgets::ListState;
use std::collections::HashMap;
use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::Instant;

/// Which view fills the main pane
#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    Lists,
    Items(TaskList),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Browse,
    Create,
    Help,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemField {
    Title,
    Period,
}

#[derive(Debug, Clone)]
pub struct ItemForm {
    pub current_field: ItemField,
    pub title: Editor,
    pub period: Editor,
}

#[derive(Debug, Clone)]
pub enum CreateForm {
    List { title: Editor },
    Item(ItemForm),
}

#[derive(Debug, Clone)]
pub enum PendingDelete {
    List(TaskList),
    Item(TaskItem),
}

#[derive(Debug, Clone)]
pub struct UiState {
    pub screen: Screen,
    pub mode: Mode,
    pub selected_index: usize,
    pub list_state: ListState,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            screen: Screen::Lists,
            mode: Mode::Browse,
            selected_index: 0,
            list_state: ListState::default(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ModalState {
    pub delete_confirmation: Option<PendingDelete>,
    /// 0 = Delete, 1 = Cancel
    pub delete_modal_selection: usize,
}

#[derive(Debug, Clone, Default)]
pub struct StatusState {
    pub message: Option<String>,
    pub message_time: Option<Instant>,
}

#[derive(Debug, Clone, Default)]
pub struct FormState {
    pub create_form: Option<CreateForm>,
}

pub struct App<C: Clock = DefaultClock> {
    pub config: Config,
    pub database: Database,
    pub clock: C,

    // Snapshots re-read from the store whenever the change feed fires
    pub lists: Vec<TaskList>,
    pub items: Vec<TaskItem>,
    pub histories: HashMap<i64, Vec<TaskActivity>>,

    pub ui: UiState,
    pub modals: ModalState,
    pub status: StatusState,
    pub form: FormState,

    changes: Receiver<StoreEvent>,
}

impl<C: Clock> App<C> {
    pub fn new(config: Config, database: Database, clock: C) -> Result<Self, TuiError> {
        let changes = database.subscribe();
        let mut app = Self {
            config,
            database,
            clock,
            lists: Vec::new(),
            items: Vec::new(),
            histories: HashMap::new(),
            ui: UiState::default(),
            modals: ModalState::default(),
            status: StatusState::default(),
            form: FormState::default(),
            changes,
        };
        app.load_lists()?;
        app.sync_list_state();
        Ok(app)
    }

    fn load_lists(&mut self) -> Result<(), TaskError> {
        self.lists = ListManager::new(&self.database, &self.clock).list_all()?;

        // The open list may have been deleted, possibly by another process
        if let Screen::Items(open) = &self.ui.screen {
            let open_id = open.id;
            match self.lists.iter().find(|list| list.id == open_id) {
                Some(list) => self.ui.screen = Screen::Items(list.clone()),
                None => {
                    self.ui.screen = Screen::Lists;
                    self.items.clear();
                    self.histories.clear();
                }
            }
        }
        self.adjust_selected_index();
        Ok(())
    }

    fn load_items(&mut self) -> Result<(), TaskError> {
        let Screen::Items(list) = &self.ui.screen else {
            return Ok(());
        };
        let manager = ItemManager::new(&self.database, &self.clock);
        let items = manager.list_for(list)?;
        let mut histories = HashMap::new();
        for item in &items {
            if let Some(id) = item.id {
                histories.insert(id, manager.history(item)?);
            }
        }
        self.items = items;
        self.histories = histories;
        self.adjust_selected_index();
        Ok(())
    }

    /// Drain pending store events and refresh the affected snapshots.
    /// Returns true if anything was reloaded.
    pub fn process_changes(&mut self) -> Result<bool, TaskError> {
        let open_list = match &self.ui.screen {
            Screen::Items(list) => list.id,
            Screen::Lists => None,
        };
        let mut lists_stale = false;
        let mut items_stale = false;

        loop {
            match self.changes.try_recv() {
                Ok(StoreEvent::ListsChanged) => lists_stale = true,
                Ok(StoreEvent::ItemsChanged { list_id }) => {
                    items_stale |= open_list == Some(list_id);
                }
                Ok(StoreEvent::HistoryChanged { item_id }) => {
                    items_stale |= self.histories.contains_key(&item_id);
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }

        if lists_stale {
            self.load_lists()?;
        }
        if items_stale || (lists_stale && open_list.is_some()) {
            self.load_items()?;
        }
        if lists_stale || items_stale {
            self.sync_list_state();
        }
        Ok(lists_stale || items_stale)
    }

    /// Number of rows in the current screen's list
    pub fn current_len(&self) -> usize {
        match self.ui.screen {
            Screen::Lists => self.lists.len(),
            Screen::Items(_) => self.items.len(),
        }
    }

    pub fn selected_list(&self) -> Option<&TaskList> {
        match self.ui.screen {
            Screen::Lists => self.lists.get(self.ui.selected_index),
            Screen::Items(_) => None,
        }
    }

    pub fn selected_item(&self) -> Option<&TaskItem> {
        match self.ui.screen {
            Screen::Lists => None,
            Screen::Items(_) => self.items.get(self.ui.selected_index),
        }
    }

    pub fn history_for(&self, item: &TaskItem) -> &[TaskActivity] {
        item.id
            .and_then(|id| self.histories.get(&id))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn adjust_selected_index(&mut self) {
        let len = self.current_len();
        if self.ui.selected_index >= len {
            self.ui.selected_index = len.saturating_sub(1);
        }
    }

    pub fn sync_list_state(&mut self) {
        if self.current_len() == 0 {
            self.ui.list_state.select(None);
        } else {
            self.ui.list_state.select(Some(self.ui.selected_index));
        }
    }

    pub fn move_selection_up(&mut self) {
        if self.ui.selected_index > 0 {
            self.ui.selected_index -= 1;
            self.sync_list_state();
        }
    }

    pub fn move_selection_down(&mut self) {
        if self.ui.selected_index < self.current_len().saturating_sub(1) {
            self.ui.selected_index += 1;
            self.sync_list_state();
        }
    }

    /// Open the highlighted list in the detail view
    pub fn open_selected_list(&mut self) -> Result<(), TaskError> {
        let Some(list) = self.selected_list().cloned() else {
            return Ok(());
        };
        self.ui.screen = Screen::Items(list);
        self.ui.selected_index = 0;
        self.load_items()?;
        self.sync_list_state();
        Ok(())
    }

    /// Return to the list view with the list that was open highlighted
    pub fn back_to_lists(&mut self) {
        if let Screen::Items(open) = &self.ui.screen {
            self.ui.selected_index = self
                .lists
                .iter()
                .position(|list| list.id == open.id)
                .unwrap_or(0);
        }
        self.ui.screen = Screen::Lists;
        self.items.clear();
        self.histories.clear();
        self.adjust_selected_index();
        self.sync_list_state();
    }

    pub fn set_status_message(&mut self, message: String) {
        self.status.message = Some(message);
        self.status.message_time = Some(Instant::now());
    }

    pub fn clear_status_message(&mut self) {
        self.status.message = None;
        self.status.message_time = None;
    }

    /// Check if status message should be auto-cleared (after 3 seconds)
    pub fn check_status_message_timeout(&mut self) {
        const STATUS_MESSAGE_TIMEOUT_SECS: u64 = 3;
        if let Some(time) = self.status.message_time {
            if time.elapsed().as_secs() >= STATUS_MESSAGE_TIMEOUT_SECS {
                self.clear_status_message();
            }
        }
    }

    /// Show a failed operation in the status bar and the log
    pub fn report_error(&mut self, action: &str, error: &TaskError) {
        tracing::warn!(action, error = %error, "operation failed");
        self.set_status_message(format!("Failed to {}: {}", action, error));
    }

    pub fn enter_help_mode(&mut self) {
        self.ui.mode = Mode::Help;
    }

    pub fn exit_help_mode(&mut self) {
        self.ui.mode = Mode::Browse;
    }

    pub fn enter_create_mode(&mut self) {
        let form = match self.ui.screen {
            Screen::Lists => CreateForm::List { title: Editor::new() },
            Screen::Items(_) => CreateForm::Item(ItemForm {
                current_field: ItemField::Title,
                title: Editor::new(),
                period: Editor::from_string(Period::FALLBACK.days().to_string()),
            }),
        };
        self.form.create_form = Some(form);
        self.ui.mode = Mode::Create;
    }

    pub fn exit_create_mode(&mut self) {
        self.form.create_form = None;
        self.ui.mode = Mode::Browse;
    }

    /// Item forms have two fields, so Tab and Shift+Tab both flip between them
    pub fn toggle_form_field(&mut self) {
        if let Some(CreateForm::Item(form)) = &mut self.form.create_form {
            form.current_field = match form.current_field {
                ItemField::Title => ItemField::Period,
                ItemField::Period => ItemField::Title,
            };
        }
    }

    /// True when Enter should save rather than move to the next field
    pub fn is_last_form_field(&self) -> bool {
        match &self.form.create_form {
            Some(CreateForm::List { .. }) => true,
            Some(CreateForm::Item(form)) => form.current_field == ItemField::Period,
            None => false,
        }
    }

    pub fn is_period_field_active(&self) -> bool {
        matches!(
            &self.form.create_form,
            Some(CreateForm::Item(ItemForm { current_field: ItemField::Period, .. }))
        )
    }

    pub fn get_current_form_editor(&mut self) -> Option<&mut Editor> {
        match self.form.create_form.as_mut()? {
            CreateForm::List { title } => Some(title),
            CreateForm::Item(form) => match form.current_field {
                ItemField::Title => Some(&mut form.title),
                ItemField::Period => Some(&mut form.period),
            },
        }
    }

    /// Save the open form. On failure the form stays open so the input can be fixed.
    pub fn save_create_form(&mut self) -> Result<(), TaskError> {
        let Some(form) = self.form.create_form.clone() else {
            return Ok(());
        };

        match form {
            CreateForm::List { title } => {
                let list = ListManager::new(&self.database, &self.clock).create(title.as_str())?;
                self.set_status_message(format!("List created: {}", list.title));
            }
            CreateForm::Item(item_form) => {
                let Screen::Items(list) = &self.ui.screen else {
                    return Ok(());
                };
                let period = parse_period_input(item_form.period.as_str())?;
                let item = ItemManager::new(&self.database, &self.clock)
                    .create(list, item_form.title.as_str(), period)?;
                self.set_status_message(format!("Item created: {}", item.title));
            }
        }

        self.exit_create_mode();
        Ok(())
    }

    /// Ask for confirmation before deleting the highlighted row
    pub fn request_delete(&mut self) {
        let pending = match self.ui.screen {
            Screen::Lists => self.selected_list().cloned().map(PendingDelete::List),
            Screen::Items(_) => self.selected_item().cloned().map(PendingDelete::Item),
        };
        if pending.is_some() {
            self.modals.delete_confirmation = pending;
            self.modals.delete_modal_selection = 0;
        }
    }

    pub fn cancel_delete(&mut self) {
        self.modals.delete_confirmation = None;
        self.modals.delete_modal_selection = 0;
    }

    /// Delete whatever the confirmation modal is holding
    pub fn confirm_delete(&mut self) -> Result<(), TaskError> {
        let Some(pending) = self.modals.delete_confirmation.take() else {
            return Ok(());
        };
        self.modals.delete_modal_selection = 0;

        match pending {
            PendingDelete::List(list) => {
                let index = position_of(&self.lists, |l| l.id == list.id)?;
                ListManager::new(&self.database, &self.clock).delete(&[index])?;
                self.set_status_message(format!("List deleted: {}", list.title));
            }
            PendingDelete::Item(item) => {
                let Screen::Items(list) = &self.ui.screen else {
                    return Ok(());
                };
                let index = position_of(&self.items, |i| i.id == item.id)?;
                ItemManager::new(&self.database, &self.clock).delete(list, &[index])?;
                self.set_status_message(format!("Item deleted: {}", item.title));
            }
        }
        Ok(())
    }

    /// Mark the highlighted item done or skipped
    pub fn complete_selected(&mut self, kind: ActivityKind) -> Result<(), TaskError> {
        let Some(mut item) = self.selected_item().cloned() else {
            return Ok(());
        };
        CompletionEngine::new(&self.database, &self.clock).complete(&mut item, kind)?;

        // Keep the snapshot current until the change feed reloads it
        if let Some(slot) = self.items.get_mut(self.ui.selected_index) {
            *slot = item.clone();
        }

        let verb = match kind {
            ActivityKind::Done => "Done",
            ActivityKind::Skip => "Skipped",
        };
        self.set_status_message(format!("{}: {}", verb, item.title));
        Ok(())
    }
}

/// Period as typed into the form: a bare day count, blank meaning one day
fn parse_period_input(input: &str) -> Result<Period, TaskError> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(Period::FALLBACK);
    }
    let days = input
        .parse::<u32>()
        .map_err(|_| PeriodError::Unparseable(input.to_string()))?;
    Ok(Period::from_days(days)?)
}

/// Index of the first record matching `pred` in a snapshot
fn position_of<T>(records: &[T], pred: impl Fn(&T) -> bool) -> Result<usize, TaskError> {
    records
        .iter()
        .position(pred)
        .ok_or(TaskError::IndexOutOfRange {
            index: records.len(),
            len: records.len(),
        })
}
