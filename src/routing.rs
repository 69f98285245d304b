//! Application router configuration.

use axum::{
    Router,
    response::{IntoResponse, Response},
    routing::{get, post, put},
};

use crate::{
    AppState, Error,
    category::{
        create_category_endpoint, delete_category_endpoint, get_categories_endpoint,
        update_category_endpoint,
    },
    dashboard::get_dashboard_endpoint,
    debt::{
        create_debt_endpoint, delete_debt_endpoint, get_debt_alerts_endpoint, get_debts_endpoint,
        pay_installment_endpoint, update_debt_endpoint,
    },
    endpoints,
    goal::{
        add_goal_progress_endpoint, create_goal_endpoint, delete_goal_endpoint,
        get_goals_endpoint, update_goal_endpoint,
    },
    insight::get_insights_endpoint,
    report::{
        get_annual_report_endpoint, get_category_report_endpoint, get_monthly_report_endpoint,
    },
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, edit_transaction_endpoint,
        get_transactions_endpoint,
    },
    user::{
        log_in_endpoint, register_endpoint, update_password_endpoint, update_profile_endpoint,
        update_profile_picture_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let user_routes = Router::new()
        .route(endpoints::REGISTER, post(register_endpoint))
        .route(endpoints::LOG_IN, post(log_in_endpoint))
        .route(endpoints::USER_PROFILE, put(update_profile_endpoint))
        .route(endpoints::USER_PASSWORD, put(update_password_endpoint))
        .route(endpoints::USER_PICTURE, put(update_profile_picture_endpoint));

    let record_routes = Router::new()
        .route(
            endpoints::CATEGORIES,
            get(get_categories_endpoint).post(create_category_endpoint),
        )
        .route(
            endpoints::CATEGORY,
            put(update_category_endpoint).delete(delete_category_endpoint),
        )
        .route(
            endpoints::TRANSACTIONS,
            get(get_transactions_endpoint).post(create_transaction_endpoint),
        )
        .route(
            endpoints::TRANSACTION,
            put(edit_transaction_endpoint).delete(delete_transaction_endpoint),
        )
        .route(
            endpoints::GOALS,
            get(get_goals_endpoint).post(create_goal_endpoint),
        )
        .route(
            endpoints::GOAL,
            put(update_goal_endpoint).delete(delete_goal_endpoint),
        )
        .route(endpoints::GOAL_PROGRESS, post(add_goal_progress_endpoint))
        .route(
            endpoints::DEBTS,
            get(get_debts_endpoint).post(create_debt_endpoint),
        )
        .route(endpoints::DEBT_ALERTS, get(get_debt_alerts_endpoint))
        .route(
            endpoints::DEBT,
            put(update_debt_endpoint).delete(delete_debt_endpoint),
        )
        .route(endpoints::DEBT_PAYMENTS, post(pay_installment_endpoint));

    let summary_routes = Router::new()
        .route(endpoints::MONTHLY_REPORT, get(get_monthly_report_endpoint))
        .route(endpoints::ANNUAL_REPORT, get(get_annual_report_endpoint))
        .route(endpoints::CATEGORY_REPORT, get(get_category_report_endpoint))
        .route(endpoints::INSIGHTS, get(get_insights_endpoint))
        .route(endpoints::DASHBOARD, get(get_dashboard_endpoint));

    user_routes
        .merge(record_routes)
        .merge(summary_routes)
        .fallback(get_404_not_found)
        .with_state(state)
}

/// Respond to requests for routes that do not exist.
async fn get_404_not_found() -> Response {
    Error::NotFound.into_response()
}
