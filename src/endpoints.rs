//! The API endpoints URIs.
//!
//! Paths with a parameter use the axum syntax, e.g. '/api/goals/{goal_id}'.

/// The route for registering a new user.
pub const REGISTER: &str = "/api/auth/register";
/// The route for logging in a user.
pub const LOG_IN: &str = "/api/auth/login";
/// The route for updating a user's name and email.
pub const USER_PROFILE: &str = "/api/users/{user_id}/profile";
/// The route for changing a user's password.
pub const USER_PASSWORD: &str = "/api/users/{user_id}/password";
/// The route for changing a user's avatar.
pub const USER_PICTURE: &str = "/api/users/{user_id}/picture";

/// The route to list and create categories.
pub const CATEGORIES: &str = "/api/categories";
/// The route to update or delete a category.
pub const CATEGORY: &str = "/api/categories/{category_id}";

/// The route to list and create transactions.
pub const TRANSACTIONS: &str = "/api/transactions";
/// The route to update or delete a transaction.
pub const TRANSACTION: &str = "/api/transactions/{transaction_id}";

/// The route to list and create goals.
pub const GOALS: &str = "/api/goals";
/// The route to update or delete a goal.
pub const GOAL: &str = "/api/goals/{goal_id}";
/// The route to add money saved towards a goal.
pub const GOAL_PROGRESS: &str = "/api/goals/{goal_id}/progress";

/// The route to list and create debts.
pub const DEBTS: &str = "/api/debts";
/// The route to list debts with a payment due soon.
pub const DEBT_ALERTS: &str = "/api/debts/alerts";
/// The route to update or delete a debt.
pub const DEBT: &str = "/api/debts/{debt_id}";
/// The route to pay the next installment of a debt.
pub const DEBT_PAYMENTS: &str = "/api/debts/{debt_id}/payments";

/// The route for the totals of one month.
pub const MONTHLY_REPORT: &str = "/api/reports/monthly";
/// The route for the totals of one year.
pub const ANNUAL_REPORT: &str = "/api/reports/annual";
/// The route for the expenses of one month by category.
pub const CATEGORY_REPORT: &str = "/api/reports/categories";

/// The route for month-over-month advice.
pub const INSIGHTS: &str = "/api/insights";
/// The route for the overview of a user's finances.
pub const DASHBOARD: &str = "/api/dashboard";
