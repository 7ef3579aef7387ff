use serde::{Deserialize, Serialize};
use std::fmt;

use crate::shared::errors::ValidationError;

/// Stable task identifier, assigned once at creation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Placeholder for records stored before ids existed.
    pub fn unassigned() -> Self {
        Self(String::new())
    }

    pub fn is_unassigned(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TaskId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// The fixed palette a task color is picked from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TaskColor {
    Red,
    Green,
    Blue,
    Yellow,
    Purple,
}

impl TaskColor {
    pub const PALETTE: [TaskColor; 5] = [
        TaskColor::Red,
        TaskColor::Green,
        TaskColor::Blue,
        TaskColor::Yellow,
        TaskColor::Purple,
    ];

    pub fn hex(self) -> &'static str {
        match self {
            TaskColor::Red => "#B84D33",
            TaskColor::Green => "#79AF5E",
            TaskColor::Blue => "#3067AB",
            TaskColor::Yellow => "#CBB945",
            TaskColor::Purple => "#773DB9",
        }
    }

    pub fn from_hex(hex: &str) -> Option<Self> {
        Self::PALETTE
            .into_iter()
            .find(|color| color.hex().eq_ignore_ascii_case(hex.trim()))
    }
}

impl fmt::Display for TaskColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.hex())
    }
}

impl From<TaskColor> for String {
    fn from(color: TaskColor) -> Self {
        color.hex().to_string()
    }
}

impl TryFrom<String> for TaskColor {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        TaskColor::from_hex(&value).ok_or_else(|| format!("Unknown task color: {}", value))
    }
}

/// A point picked on the map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Older records were stored without an id; the store assigns one on load.
    #[serde(default = "TaskId::unassigned")]
    pub id: TaskId,
    pub text: String,
    #[serde(default)]
    pub tag: String,
    pub color: TaskColor,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub location: Option<Location>,
}

impl Task {
    pub fn new(text: impl Into<String>, tag: impl Into<String>, color: TaskColor) -> Self {
        Self {
            id: TaskId::new(),
            text: text.into(),
            tag: tag.into(),
            color,
            completed: false,
            location: None,
        }
    }

    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }
}

/// What the add-task form submits.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTask {
    pub text: String,
    pub tag: String,
    pub color: TaskColor,
    pub location: Option<Location>,
}

impl NewTask {
    /// Both text and tag must contain something other than whitespace.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.text.trim().is_empty() {
            return Err(ValidationError::EmptyText);
        }
        if self.tag.trim().is_empty() {
            return Err(ValidationError::EmptyTag);
        }
        Ok(())
    }

    pub fn into_task(self) -> Task {
        Task {
            id: TaskId::new(),
            text: self.text,
            tag: self.tag,
            color: self.color,
            completed: false,
            location: self.location,
        }
    }
}

/// Addresses a task either by its stable id or by its display position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskRef {
    Id(TaskId),
    Index(usize),
}

impl From<TaskId> for TaskRef {
    fn from(id: TaskId) -> Self {
        TaskRef::Id(id)
    }
}

impl From<&TaskId> for TaskRef {
    fn from(id: &TaskId) -> Self {
        TaskRef::Id(id.clone())
    }
}

impl From<usize> for TaskRef {
    fn from(index: usize) -> Self {
        TaskRef::Index(index)
    }
}

/// List screen filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskFilter {
    #[default]
    All,
    Pending,
    Completed,
}

impl TaskFilter {
    pub fn matches(self, task: &Task) -> bool {
        match self {
            TaskFilter::All => true,
            TaskFilter::Pending => !task.completed,
            TaskFilter::Completed => task.completed,
        }
    }
}

/// Unknown names fall back to `All`.
impl From<&str> for TaskFilter {
    fn from(value: &str) -> Self {
        match value {
            "pending" => TaskFilter::Pending,
            "completed" => TaskFilter::Completed,
            _ => TaskFilter::All,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskCounts {
    pub total: usize,
    pub pending: usize,
    pub completed: usize,
}

impl TaskCounts {
    pub fn of(tasks: &[Task]) -> Self {
        let completed = tasks.iter().filter(|t| t.completed).count();
        Self {
            total: tasks.len(),
            pending: tasks.len() - completed,
            completed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_serializes_with_hex_color() {
        let task = Task::new("Buy milk", "errand", TaskColor::Red)
            .with_location(Location::new(-23.5, -46.6));
        let json: serde_json::Value = serde_json::to_value(&task).unwrap();

        assert_eq!(json["text"], "Buy milk");
        assert_eq!(json["tag"], "errand");
        assert_eq!(json["color"], "#B84D33");
        assert_eq!(json["completed"], false);
        assert_eq!(json["location"]["latitude"], -23.5);
        assert_eq!(json["location"]["longitude"], -46.6);
        assert_eq!(json["id"], task.id.as_str());
    }

    #[test]
    fn test_legacy_record_without_id_or_location() {
        let raw = r##"[{"text":"Old","tag":"home","color":"#79af5e","completed":true}]"##;
        let tasks: Vec<Task> = serde_json::from_str(raw).unwrap();

        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].color, TaskColor::Green);
        assert!(tasks[0].completed);
        assert!(tasks[0].location.is_none());
        assert!(tasks[0].id.is_unassigned());
    }

    #[test]
    fn test_null_location_decodes_as_absent() {
        let raw = r##"{"text":"x","tag":"","color":"#3067AB","completed":false,"location":null}"##;
        let task: Task = serde_json::from_str(raw).unwrap();
        assert!(task.location.is_none());
    }

    #[test]
    fn test_color_outside_palette_is_rejected() {
        let raw = r##"{"text":"x","tag":"t","color":"#FFFFFF","completed":false}"##;
        assert!(serde_json::from_str::<Task>(raw).is_err());
        assert_eq!(TaskColor::from_hex(" #cbb945 "), Some(TaskColor::Yellow));
        assert_eq!(TaskColor::PALETTE.len(), 5);
    }

    #[test]
    fn test_new_task_validation() {
        let mut form = NewTask {
            text: "  ".to_string(),
            tag: "work".to_string(),
            color: TaskColor::Blue,
            location: None,
        };
        assert_eq!(form.validate(), Err(ValidationError::EmptyText));

        form.text = "Write report".to_string();
        form.tag = String::new();
        assert_eq!(form.validate(), Err(ValidationError::EmptyTag));

        form.tag = "work".to_string();
        assert!(form.validate().is_ok());

        let task = form.into_task();
        assert!(!task.completed);
        assert_eq!(task.text, "Write report");
    }

    #[test]
    fn test_filter_and_counts() {
        let mut done = Task::new("a", "", TaskColor::Red);
        done.completed = true;
        let open = Task::new("b", "", TaskColor::Red);
        let tasks = vec![done.clone(), open.clone()];

        assert!(TaskFilter::Completed.matches(&done));
        assert!(!TaskFilter::Completed.matches(&open));
        assert!(TaskFilter::Pending.matches(&open));
        assert!(TaskFilter::All.matches(&done));

        assert_eq!(TaskFilter::from("pending"), TaskFilter::Pending);
        assert_eq!(TaskFilter::from("completed"), TaskFilter::Completed);
        assert_eq!(TaskFilter::from("whatever"), TaskFilter::All);

        assert_eq!(
            TaskCounts::of(&tasks),
            TaskCounts {
                total: 2,
                pending: 1,
                completed: 1
            }
        );
    }
}
