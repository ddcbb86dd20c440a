use crate::client::{ClientError, TodoClient};
use crate::core::Todo;

/// Todo created from the list pane before the user has typed anything.
pub const PLACEHOLDER_TITLE: &str = "New todo";
pub const PLACEHOLDER_DESCRIPTION: &str = "";

/// What a toast would show. Drained by the UI via [`TodoApp::take_notices`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Info(String),
    Error(String),
}

/// Editor pane state for the selected record. `title` and `description`
/// are local buffers; `dirty` tracks unsaved edits.
#[derive(Debug, Clone)]
pub struct Editor {
    pub todo: Todo,
    pub title: String,
    pub description: String,
    pub dirty: bool,
}

impl Editor {
    fn open(todo: Todo) -> Self {
        Self {
            title: todo.title.clone(),
            description: todo.description.clone(),
            todo,
            dirty: false,
        }
    }
}

/// Master/detail application state: a held page of records on the left, an
/// editor for the selected record on the right. Every server failure leaves
/// local state untouched and records a notice instead; nothing is applied
/// optimistically. Mutating methods take `&mut self`, so calls within one
/// app are sequential and stale responses cannot interleave.
pub struct TodoApp {
    client: TodoClient,
    items: Vec<Todo>,
    page: u32,
    limit: u32,
    total_pages: u32,
    search: String,
    editor: Option<Editor>,
    notices: Vec<Notice>,
}

impl TodoApp {
    pub fn new(client: TodoClient) -> Self {
        Self {
            client,
            items: Vec::new(),
            page: 1,
            limit: 10,
            total_pages: 0,
            search: String::new(),
            editor: None,
            notices: Vec::new(),
        }
    }

    pub fn items(&self) -> &[Todo] {
        &self.items
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn editor(&self) -> Option<&Editor> {
        self.editor.as_ref()
    }

    pub fn is_dirty(&self) -> bool {
        self.editor.as_ref().is_some_and(|e| e.dirty)
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Replaces the held page. A selection whose record fell off the new
    /// page is cleared.
    pub async fn load_page(&mut self, page: u32) {
        match self.client.list(page, self.limit).await {
            Ok(fetched) => {
                self.items = fetched.items;
                self.total_pages = fetched.total_pages;
                self.page = page;
                if let Some(editor) = &self.editor {
                    let still_listed = self.items.iter().any(|t| t.id == editor.todo.id);
                    if !still_listed {
                        self.editor = None;
                    }
                }
            }
            Err(e) => self.notify_error("Failed to load todos", e),
        }
    }

    pub fn set_search(&mut self, query: impl Into<String>) {
        self.search = query.into();
    }

    /// The held page filtered by the search box: case-insensitive substring
    /// match on title. Local only, never re-queries the server.
    pub fn visible_items(&self) -> Vec<&Todo> {
        let needle = self.search.to_lowercase();
        self.items
            .iter()
            .filter(|t| t.title.to_lowercase().contains(&needle))
            .collect()
    }

    /// Loads a record from the held page into the editor. Returns false if
    /// the id is not on this page.
    pub fn select(&mut self, id: &str) -> bool {
        match self.items.iter().find(|t| t.id == id) {
            Some(todo) => {
                self.editor = Some(Editor::open(todo.clone()));
                true
            }
            None => false,
        }
    }

    pub fn edit_title(&mut self, title: impl Into<String>) {
        if let Some(editor) = &mut self.editor {
            editor.title = title.into();
            editor.dirty = true;
        }
    }

    pub fn edit_description(&mut self, description: impl Into<String>) {
        if let Some(editor) = &mut self.editor {
            editor.description = description.into();
            editor.dirty = true;
        }
    }

    /// Pushes the editor buffers to the server. On success the selection and
    /// its entry in the held page are replaced in place, without a reload.
    pub async fn save(&mut self) {
        let Some(editor) = &self.editor else {
            return;
        };
        let (id, title, description) = (
            editor.todo.id.clone(),
            editor.title.clone(),
            editor.description.clone(),
        );
        match self
            .client
            .update(&id, Some(&title), Some(&description))
            .await
        {
            Ok(updated) => {
                if let Some(entry) = self.items.iter_mut().find(|t| t.id == updated.id) {
                    *entry = updated.clone();
                }
                self.editor = Some(Editor::open(updated));
                self.notices
                    .push(Notice::Info("Todo updated successfully".to_string()));
            }
            Err(e) => self.notify_error("Failed to update todo", e),
        }
    }

    /// Deletes the selected record, clears the selection, and reloads the
    /// current page.
    pub async fn delete_selected(&mut self) {
        let Some(editor) = &self.editor else {
            return;
        };
        let id = editor.todo.id.clone();
        match self.client.delete(&id).await {
            Ok(_) => {
                self.editor = None;
                self.notices
                    .push(Notice::Info("Todo deleted successfully".to_string()));
                self.load_page(self.page).await;
            }
            Err(e) => self.notify_error("Failed to delete todo", e),
        }
    }

    /// Creates a placeholder record, reloads the current page, and selects
    /// the new record. The selection sticks even when the record landed on a
    /// different page than the one held.
    pub async fn create(&mut self) {
        match self
            .client
            .create(PLACEHOLDER_TITLE, PLACEHOLDER_DESCRIPTION)
            .await
        {
            Ok(created) => {
                self.notices
                    .push(Notice::Info("Todo created successfully".to_string()));
                self.load_page(self.page).await;
                self.editor = Some(Editor::open(created));
            }
            Err(e) => self.notify_error("Failed to create todo", e),
        }
    }

    fn notify_error(&mut self, what: &str, e: ClientError) {
        tracing::warn!(error = %e, "{what}");
        self.notices.push(Notice::Error(what.to_string()));
    }
}
