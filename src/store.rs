use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub done: bool,
}

impl Project {
    pub fn new(id: i32, name: impl Into<String>, start_date: NaiveDate) -> Self {
        Self {
            id,
            name: name.into(),
            description: String::new(),
            start_date,
            end_date: None,
            done: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: i32,
    pub project_id: i32,
    pub name: String,
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub done: bool,
}

impl Task {
    pub fn new(id: i32, project_id: i32, name: impl Into<String>, start_date: NaiveDate) -> Self {
        Self {
            id,
            project_id,
            name: name.into(),
            description: String::new(),
            start_date,
            end_date: None,
            done: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    ProjectNotFound(i32),
    TaskNotFound(i32),
    MissingProject(i32),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::ProjectNotFound(id) => write!(f, "project {id} not found"),
            StoreError::TaskNotFound(id) => write!(f, "task {id} not found"),
            StoreError::MissingProject(id) => {
                write!(f, "task references missing project {id}")
            }
        }
    }
}

impl std::error::Error for StoreError {}

/// In-memory catalogue of projects and their tasks. Identifiers are assigned
/// on insert and never reused within the lifetime of the store.
#[derive(Debug)]
pub struct Store {
    projects: Vec<Project>,
    tasks: Vec<Task>,
    next_project_id: i32,
    next_task_id: i32,
}

impl Store {
    pub fn new() -> Self {
        Self {
            projects: Vec::new(),
            tasks: Vec::new(),
            next_project_id: 1,
            next_task_id: 1,
        }
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn find_project(&self, id: i32) -> Option<&Project> {
        self.projects.iter().find(|project| project.id == id)
    }

    pub fn find_task(&self, id: i32) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn tasks_for_project(&self, project_id: i32) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|task| task.project_id == project_id)
            .collect()
    }

    /// Inserts the project under a fresh identifier; the id carried by the
    /// draft is ignored. Returns the assigned id.
    pub fn create_project(&mut self, mut project: Project) -> i32 {
        project.id = self.next_project_id;
        self.next_project_id += 1;
        let id = project.id;
        self.projects.push(project);
        id
    }

    pub fn update_project(&mut self, project: Project) -> Result<(), StoreError> {
        let slot = self
            .projects
            .iter_mut()
            .find(|existing| existing.id == project.id)
            .ok_or(StoreError::ProjectNotFound(project.id))?;
        *slot = project;
        Ok(())
    }

    /// Removes the project and every task that belongs to it. Returns false
    /// when no project carried the id.
    pub fn delete_project(&mut self, id: i32) -> bool {
        let before = self.projects.len();
        self.projects.retain(|project| project.id != id);
        if self.projects.len() == before {
            return false;
        }
        self.tasks.retain(|task| task.project_id != id);
        true
    }

    pub fn create_task(&mut self, mut task: Task) -> Result<i32, StoreError> {
        if self.find_project(task.project_id).is_none() {
            return Err(StoreError::MissingProject(task.project_id));
        }
        task.id = self.next_task_id;
        self.next_task_id += 1;
        let id = task.id;
        let project_id = task.project_id;
        self.tasks.push(task);
        self.sync_project_status(project_id);
        Ok(id)
    }

    pub fn update_task(&mut self, task: Task) -> Result<(), StoreError> {
        if self.find_project(task.project_id).is_none() {
            return Err(StoreError::MissingProject(task.project_id));
        }
        let slot = self
            .tasks
            .iter_mut()
            .find(|existing| existing.id == task.id)
            .ok_or(StoreError::TaskNotFound(task.id))?;
        let previous_project = slot.project_id;
        let current_project = task.project_id;
        *slot = task;
        self.sync_project_status(previous_project);
        if current_project != previous_project {
            self.sync_project_status(current_project);
        }
        Ok(())
    }

    pub fn delete_task(&mut self, id: i32) -> bool {
        let Some(task) = self.find_task(id) else {
            return false;
        };
        let project_id = task.project_id;
        self.tasks.retain(|task| task.id != id);
        self.sync_project_status(project_id);
        true
    }

    // Mirrors the upstream behavior: a project is promoted to done once no
    // unfinished task remains under it, and is never demoted here.
    fn sync_project_status(&mut self, project_id: i32) {
        let unfinished = self
            .tasks
            .iter()
            .any(|task| task.project_id == project_id && !task.done);
        if unfinished {
            return;
        }
        if let Some(project) = self
            .projects
            .iter_mut()
            .find(|project| project.id == project_id)
        {
            project.done = true;
        }
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}
