//! Savings goals: a target amount to save by a deadline.

mod core;
mod endpoints;

pub use core::{
    Goal, GoalChanges, NewGoal, add_goal_progress, create_goal, create_goal_table, delete_goal,
    get_goal, get_goals_by_user, update_goal,
};
pub use endpoints::{
    CreateGoalForm, GoalProgressForm, UpdateGoalForm, add_goal_progress_endpoint,
    create_goal_endpoint, delete_goal_endpoint, get_goals_endpoint, update_goal_endpoint,
};

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use rusqlite::Connection;

use crate::AppState;

/// The state needed by the goal endpoints.
#[derive(Debug, Clone)]
pub struct GoalState {
    /// The database connection for managing goals.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for GoalState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}
