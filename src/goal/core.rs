//! The goal model and its database queries.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{Error, database_id::GoalId, db::is_foreign_key_violation, user::UserId};

/// An amount of money a user wants to have saved by a deadline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    /// The ID of the goal.
    pub id: GoalId,
    /// The user saving towards the goal.
    pub user_id: UserId,
    /// What the user is saving for, e.g. "Holiday".
    pub name: String,
    /// How much the user wants to save.
    pub target_amount: f64,
    /// How much has been saved so far.
    pub current_amount: f64,
    /// When the target should be reached.
    pub deadline: Date,
}

/// The data for creating a goal. New goals start with nothing saved.
#[derive(Debug, Clone, PartialEq)]
pub struct NewGoal {
    /// The user saving towards the goal.
    pub user_id: UserId,
    /// What the user is saving for.
    pub name: String,
    /// How much the user wants to save.
    pub target_amount: f64,
    /// When the target should be reached.
    pub deadline: Date,
}

/// A partial edit of a goal, `None` fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GoalChanges {
    /// The new name.
    pub name: Option<String>,
    /// The new target.
    pub target_amount: Option<f64>,
    /// The new amount saved.
    pub current_amount: Option<f64>,
    /// The new deadline.
    pub deadline: Option<Date>,
}

const GOAL_COLUMNS: &str = "id, user_id, name, target_amount, current_amount, deadline";

/// Create a goal with nothing saved towards it.
///
/// # Errors
/// Returns [Error::InvalidUser] if the user does not exist.
pub fn create_goal(new_goal: NewGoal, connection: &Connection) -> Result<Goal, Error> {
    connection
        .prepare(&format!(
            "INSERT INTO goal (user_id, name, target_amount, current_amount, deadline)
             VALUES (?1, ?2, ?3, 0, ?4)
             RETURNING {GOAL_COLUMNS}"
        ))?
        .query_row(
            (
                new_goal.user_id,
                &new_goal.name,
                new_goal.target_amount,
                new_goal.deadline,
            ),
            map_goal_row,
        )
        .map_err(|error| {
            if is_foreign_key_violation(&error) {
                Error::InvalidUser(new_goal.user_id.as_i64())
            } else {
                error.into()
            }
        })
}

/// Retrieve a goal by its ID.
///
/// # Errors
/// Returns [Error::NotFound] if there is no goal with `goal_id`.
pub fn get_goal(goal_id: GoalId, connection: &Connection) -> Result<Goal, Error> {
    connection
        .prepare(&format!("SELECT {GOAL_COLUMNS} FROM goal WHERE id = :id"))?
        .query_row(&[(":id", &goal_id)], map_goal_row)
        .map_err(|error| error.into())
}

/// Retrieve a user's goals, soonest deadline first.
pub fn get_goals_by_user(user_id: UserId, connection: &Connection) -> Result<Vec<Goal>, Error> {
    connection
        .prepare(&format!(
            "SELECT {GOAL_COLUMNS} FROM goal WHERE user_id = :user_id ORDER BY deadline ASC, id ASC"
        ))?
        .query_map(&[(":user_id", &user_id)], map_goal_row)?
        .map(|maybe_goal| maybe_goal.map_err(|error| error.into()))
        .collect()
}

/// Apply `changes` to the goal `goal_id`, keeping the fields that are not given.
///
/// # Errors
/// Returns [Error::UpdateMissingGoal] if the goal does not exist.
pub fn update_goal(
    goal_id: GoalId,
    changes: GoalChanges,
    connection: &Connection,
) -> Result<Goal, Error> {
    let goal = match get_goal(goal_id, connection) {
        Ok(goal) => goal,
        Err(Error::NotFound) => return Err(Error::UpdateMissingGoal),
        Err(error) => return Err(error),
    };

    connection.execute(
        "UPDATE goal SET name = ?1, target_amount = ?2, current_amount = ?3, deadline = ?4
         WHERE id = ?5",
        (
            changes.name.unwrap_or(goal.name),
            changes.target_amount.unwrap_or(goal.target_amount),
            changes.current_amount.unwrap_or(goal.current_amount),
            changes.deadline.unwrap_or(goal.deadline),
            goal_id,
        ),
    )?;

    get_goal(goal_id, connection)
}

/// Add `amount` to what has been saved towards the goal `goal_id`.
///
/// # Errors
/// Returns [Error::UpdateMissingGoal] if the goal does not exist.
pub fn add_goal_progress(
    goal_id: GoalId,
    amount: f64,
    connection: &Connection,
) -> Result<Goal, Error> {
    let rows_affected = connection.execute(
        "UPDATE goal SET current_amount = current_amount + ?1 WHERE id = ?2",
        (amount, goal_id),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingGoal);
    }

    get_goal(goal_id, connection)
}

/// Delete the goal `goal_id`, returning the number of rows deleted.
pub fn delete_goal(goal_id: GoalId, connection: &Connection) -> Result<usize, Error> {
    connection
        .execute("DELETE FROM goal WHERE id = ?1", [goal_id])
        .map_err(|error| error.into())
}

/// Create the goal table.
pub fn create_goal_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS goal (
                id INTEGER PRIMARY KEY,
                user_id INTEGER NOT NULL,
                name TEXT NOT NULL,
                target_amount REAL NOT NULL,
                current_amount REAL NOT NULL DEFAULT 0,
                deadline TEXT NOT NULL,
                FOREIGN KEY(user_id) REFERENCES user(id) ON DELETE CASCADE
                )",
        (),
    )?;

    Ok(())
}

fn map_goal_row(row: &Row) -> Result<Goal, rusqlite::Error> {
    Ok(Goal {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        target_amount: row.get(3)?,
        current_amount: row.get(4)?,
        deadline: row.get(5)?,
    })
}
