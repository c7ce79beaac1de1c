use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(TodoId);
id_newtype!(OwnerId);

impl TodoId {
    /// Identifier carried by a todo that the server has not confirmed yet.
    pub const UNSAVED: TodoId = TodoId(0);

    pub fn is_unsaved(self) -> bool {
        self == Self::UNSAVED
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: TodoId,
    #[serde(rename = "userId")]
    pub user_id: OwnerId,
    pub title: String,
    pub completed: bool,
}

impl Todo {
    /// Local stand-in shown while a create request is in flight.
    pub fn placeholder(user_id: OwnerId, title: impl Into<String>) -> Self {
        Self {
            id: TodoId::UNSAVED,
            user_id,
            title: title.into(),
            completed: false,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Filter {
    #[default]
    All,
    Active,
    Completed,
}

impl Filter {
    pub const ALL: [Filter; 3] = [Filter::All, Filter::Active, Filter::Completed];

    pub fn matches(self, todo: &Todo) -> bool {
        match self {
            Filter::All => true,
            Filter::Active => !todo.completed,
            Filter::Completed => todo.completed,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Filter::All => "All",
            Filter::Active => "Active",
            Filter::Completed => "Completed",
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown filter '{0}', expected one of: all, active, completed")]
pub struct ParseFilterError(String);

impl FromStr for Filter {
    type Err = ParseFilterError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Filter::All),
            "active" => Ok(Filter::Active),
            "completed" => Ok(Filter::Completed),
            _ => Err(ParseFilterError(raw.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn todo(id: i64, completed: bool) -> Todo {
        Todo {
            id: TodoId(id),
            user_id: OwnerId(42),
            title: format!("todo {id}"),
            completed,
        }
    }

    #[test]
    fn filters_partition_items_by_completion() {
        let items = vec![todo(1, false), todo(2, true), todo(3, false), todo(4, true)];

        let pick = |filter: Filter| {
            items
                .iter()
                .filter(|t| filter.matches(t))
                .map(|t| t.id.0)
                .collect::<Vec<_>>()
        };

        assert_eq!(pick(Filter::All), vec![1, 2, 3, 4]);
        assert_eq!(pick(Filter::Active), vec![1, 3]);
        assert_eq!(pick(Filter::Completed), vec![2, 4]);
    }

    #[test]
    fn parses_filter_names_case_insensitively() {
        assert_eq!("Active".parse::<Filter>(), Ok(Filter::Active));
        assert_eq!(" completed ".parse::<Filter>(), Ok(Filter::Completed));
        assert_eq!("ALL".parse::<Filter>(), Ok(Filter::All));
        assert!("done".parse::<Filter>().is_err());
    }

    #[test]
    fn todo_uses_camel_case_owner_field_on_the_wire() {
        let value = serde_json::to_value(todo(5, true)).expect("serialize");
        assert_eq!(
            value,
            serde_json::json!({"id": 5, "userId": 42, "title": "todo 5", "completed": true})
        );
    }

    #[test]
    fn placeholder_is_unsaved_and_active() {
        let temp = Todo::placeholder(OwnerId(42), "buy milk");
        assert!(temp.id.is_unsaved());
        assert!(!temp.completed);
    }
}
