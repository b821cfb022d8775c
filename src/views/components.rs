use serde::Serialize;
use tera::Context;

use super::{Page, COMPONENTS_TEMPLATE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RowStatus {
    Active,
    Inactive,
}

/// Row of the users data table
#[derive(Debug, Clone, Serialize)]
pub struct TableRow {
    pub id: u32,
    pub name: &'static str,
    pub email: &'static str,
    pub status: RowStatus,
}

/// `key` names a `TableRow` field
#[derive(Debug, Clone, Serialize)]
pub struct Column {
    pub key: &'static str,
    pub label: &'static str,
}

const fn row(id: u32, name: &'static str, email: &'static str, status: RowStatus) -> TableRow {
    TableRow {
        id,
        name,
        email,
        status,
    }
}

const fn column(key: &'static str, label: &'static str) -> Column {
    Column { key, label }
}

pub fn components_example() -> Page {
    let users = [
        row(1, "Alice", "alice@example.com", RowStatus::Active),
        row(2, "Bob", "bob@example.com", RowStatus::Inactive),
        row(3, "Charlie", "charlie@example.com", RowStatus::Active),
    ];
    let columns = [
        column("id", "ID"),
        column("name", "Name"),
        column("email", "Email"),
        column("status", "Status"),
    ];

    let mut context = Context::new();
    context.insert("users", &users);
    context.insert("columns", &columns);
    Page::new(COMPONENTS_TEMPLATE, context)
}
