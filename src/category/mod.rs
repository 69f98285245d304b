//! Categories group transactions, e.g. "Groceries" or "Salary".

mod core;
mod endpoints;

pub use core::{
    Category, CategoryFields, NewCategory, create_category, create_category_table,
    delete_category, get_categories_by_user, get_category, update_category,
};
pub use endpoints::{
    CategoryForm, create_category_endpoint, delete_category_endpoint, get_categories_endpoint,
    update_category_endpoint,
};

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use rusqlite::Connection;

use crate::AppState;

/// The state needed by the category endpoints.
#[derive(Debug, Clone)]
pub struct CategoryState {
    /// The database connection for managing categories.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CategoryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}
