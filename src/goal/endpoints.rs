//! Route handlers for savings goals.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use time::Date;

use crate::{
    Error,
    app_state::lock_connection,
    database_id::GoalId,
    extract::{JsonBody, QueryParams, UserQuery, require, require_text, validate_amount},
    goal::{
        Goal, GoalChanges, GoalState, NewGoal, add_goal_progress, create_goal, delete_goal,
        get_goals_by_user, update_goal,
    },
    user::UserId,
};

/// A route handler for listing the goals of the user given by the `userId`
/// query parameter, soonest deadline first.
pub async fn get_goals_endpoint(
    State(state): State<GoalState>,
    QueryParams(query): QueryParams<UserQuery>,
) -> Result<Json<Vec<Goal>>, Error> {
    let user_id = query.user_id()?;

    let connection = lock_connection(&state.db_connection)?;
    let goals = get_goals_by_user(user_id, &connection)?;

    Ok(Json(goals))
}

/// The request body for creating a goal.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGoalForm {
    /// The user saving towards the goal.
    pub user_id: Option<UserId>,
    /// What the user is saving for.
    pub name: Option<String>,
    /// How much the user wants to save.
    pub target_amount: Option<f64>,
    /// When the target should be reached.
    pub deadline: Option<Date>,
}

/// A route handler for creating a goal, responds with the goal and status 201.
pub async fn create_goal_endpoint(
    State(state): State<GoalState>,
    JsonBody(form): JsonBody<CreateGoalForm>,
) -> Result<(StatusCode, Json<Goal>), Error> {
    const REQUIRED: &str = "All fields are required";
    let new_goal = NewGoal {
        user_id: require(form.user_id, REQUIRED)?,
        name: require_text(form.name, REQUIRED)?,
        target_amount: validate_amount(require(form.target_amount, REQUIRED)?)?,
        deadline: require(form.deadline, REQUIRED)?,
    };

    let connection = lock_connection(&state.db_connection)?;
    let goal = create_goal(new_goal, &connection)?;

    Ok((StatusCode::CREATED, Json(goal)))
}

/// The request body for editing a goal. Missing fields are left unchanged.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGoalForm {
    /// The new name.
    pub name: Option<String>,
    /// The new target.
    pub target_amount: Option<f64>,
    /// The new amount saved.
    pub current_amount: Option<f64>,
    /// The new deadline.
    pub deadline: Option<Date>,
}

impl UpdateGoalForm {
    fn validate(self) -> Result<GoalChanges, Error> {
        let name = match self.name {
            Some(name) if name.trim().is_empty() => return Err(Error::EmptyName("Goal name")),
            Some(name) => Some(name.trim().to_owned()),
            None => None,
        };

        let current_amount = match self.current_amount {
            Some(amount) if !amount.is_finite() || amount < 0.0 => {
                return Err(Error::InvalidAmount);
            }
            amount => amount,
        };

        Ok(GoalChanges {
            name,
            target_amount: self.target_amount.map(validate_amount).transpose()?,
            current_amount,
            deadline: self.deadline,
        })
    }
}

/// A route handler for editing some or all fields of a goal.
pub async fn update_goal_endpoint(
    State(state): State<GoalState>,
    Path(goal_id): Path<GoalId>,
    JsonBody(form): JsonBody<UpdateGoalForm>,
) -> Result<Json<Goal>, Error> {
    let changes = form.validate()?;

    let connection = lock_connection(&state.db_connection)?;
    let goal = update_goal(goal_id, changes, &connection)?;

    Ok(Json(goal))
}

/// The request body for adding to the amount saved towards a goal.
#[derive(Debug, Default, Deserialize)]
pub struct GoalProgressForm {
    /// The amount to add, must be positive.
    pub amount: Option<f64>,
}

/// A route handler for adding money to a goal.
pub async fn add_goal_progress_endpoint(
    State(state): State<GoalState>,
    Path(goal_id): Path<GoalId>,
    JsonBody(form): JsonBody<GoalProgressForm>,
) -> Result<Json<Goal>, Error> {
    let amount = validate_amount(require(form.amount, "Amount is required")?)?;

    let connection = lock_connection(&state.db_connection)?;
    let goal = add_goal_progress(goal_id, amount, &connection)?;

    Ok(Json(goal))
}

/// A route handler for deleting a goal, responds with status 204.
pub async fn delete_goal_endpoint(
    State(state): State<GoalState>,
    Path(goal_id): Path<GoalId>,
) -> Result<StatusCode, Error> {
    let connection = lock_connection(&state.db_connection)?;
    let rows_affected = delete_goal(goal_id, &connection)?;

    if rows_affected == 0 {
        tracing::debug!("goal {goal_id} was already deleted");
    }

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::json;

    use crate::{
        goal::Goal,
        test_utils::{create_test_server, register_and_log_in},
        user::UserId,
    };

    async fn create_holiday_goal(server: &TestServer, user_id: UserId) -> Goal {
        let response = server
            .post("/api/goals")
            .json(&json!({
                "userId": user_id,
                "name": "Holiday",
                "targetAmount": 8000,
                "deadline": "2026-07-01",
            }))
            .await;
        response.assert_status(StatusCode::CREATED);

        response.json::<Goal>()
    }

    #[tokio::test]
    async fn creates_and_lists_goals() {
        let server = create_test_server();
        let user = register_and_log_in(&server, "test@example.com").await;
        let goal = create_holiday_goal(&server, user.id).await;

        let response = server.get("/api/goals").add_query_param("userId", user.id).await;

        response.assert_status_ok();
        assert_eq!(response.json::<Vec<Goal>>(), vec![goal]);
    }

    #[tokio::test]
    async fn create_requires_all_fields() {
        let server = create_test_server();
        let user = register_and_log_in(&server, "test@example.com").await;

        let response = server
            .post("/api/goals")
            .json(&json!({ "userId": user.id, "name": "Holiday" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        response.assert_json(&json!({ "message": "All fields are required" }));
    }

    #[tokio::test]
    async fn partial_update_keeps_unspecified_fields() {
        let server = create_test_server();
        let user = register_and_log_in(&server, "test@example.com").await;
        let goal = create_holiday_goal(&server, user.id).await;

        let response = server
            .put(&format!("/api/goals/{}", goal.id))
            .json(&json!({ "currentAmount": 2500 }))
            .await;

        response.assert_status_ok();
        let updated = response.json::<Goal>();
        assert_eq!(updated.current_amount, 2500.0);
        assert_eq!(updated.name, "Holiday");
        assert_eq!(updated.target_amount, 8000.0);
        assert_eq!(updated.deadline, goal.deadline);
    }

    #[tokio::test]
    async fn update_missing_goal_is_not_found() {
        let server = create_test_server();

        let response = server
            .put("/api/goals/999")
            .json(&json!({ "name": "Anything" }))
            .await;

        response.assert_status(StatusCode::NOT_FOUND);
        response.assert_json(&json!({ "message": "Goal not found." }));
    }

    #[tokio::test]
    async fn adds_progress() {
        let server = create_test_server();
        let user = register_and_log_in(&server, "test@example.com").await;
        let goal = create_holiday_goal(&server, user.id).await;

        let response = server
            .post(&format!("/api/goals/{}/progress", goal.id))
            .json(&json!({ "amount": 300 }))
            .await;

        response.assert_status_ok();
        assert_eq!(response.json::<Goal>().current_amount, 300.0);
    }

    #[tokio::test]
    async fn progress_must_be_positive() {
        let server = create_test_server();
        let user = register_and_log_in(&server, "test@example.com").await;
        let goal = create_holiday_goal(&server, user.id).await;

        server
            .post(&format!("/api/goals/{}/progress", goal.id))
            .json(&json!({ "amount": 0 }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn deletes_goal() {
        let server = create_test_server();
        let user = register_and_log_in(&server, "test@example.com").await;
        let goal = create_holiday_goal(&server, user.id).await;

        server
            .delete(&format!("/api/goals/{}", goal.id))
            .await
            .assert_status(StatusCode::NO_CONTENT);

        let response = server.get("/api/goals").add_query_param("userId", user.id).await;
        response.assert_json(&json!([]));
    }
}
