//! Splitting a purchase into monthly installments.

use rusqlite::Connection;
use uuid::Uuid;

use crate::{
    Error,
    calendar::add_months,
    transaction::{Transaction, TransactionBuilder, core::create_transaction},
};

/// The largest number of installments a purchase can be split into.
pub const MAX_INSTALLMENTS: u32 = 600;

/// Turn a transaction template into the transactions to store.
///
/// If `template` is flagged as an installment purchase and `installments` is
/// more than one, one transaction per installment is produced. Installment `i`
/// (counting from zero) is dated `i` months after the template's date, its
/// description ends with "(i+1/installments)" and every installment shares a
/// newly generated parent ID. The template's amount is the value of one
/// installment and is not divided.
///
/// Otherwise a single, unlinked transaction that is not flagged as an
/// installment is produced.
///
/// # Errors
/// Returns [Error::InvalidInstallmentCount] if `installments` is more than
/// [MAX_INSTALLMENTS] and [Error::InvalidDate] if a date would fall outside the
/// supported calendar.
pub fn expand_installments(
    template: TransactionBuilder,
    installments: u32,
) -> Result<Vec<TransactionBuilder>, Error> {
    if installments > MAX_INSTALLMENTS {
        return Err(Error::InvalidInstallmentCount);
    }

    if !template.is_installment || installments <= 1 {
        return Ok(vec![
            template.is_installment(false).installment_parent_id(None),
        ]);
    }

    let parent_id = Uuid::new_v4().to_string();

    (0..installments)
        .map(|i| {
            let date = add_months(template.date, i).ok_or(Error::InvalidDate)?;

            Ok(TransactionBuilder {
                description: format!("{} ({}/{})", template.description, i + 1, installments),
                date,
                installment_parent_id: Some(parent_id.clone()),
                ..template.clone()
            })
        })
        .collect()
}

/// Expand `template` with [expand_installments] and insert every resulting transaction.
///
/// The inserts happen in one SQL transaction: either every installment is
/// stored or, if any insert fails, none are.
///
/// Returns the created transactions in installment order.
///
/// A missing user or category rolls the batch back and is reported as
/// [Error::InvalidUser] or [Error::InvalidCategory] rather than a server error.
pub fn create_transactions(
    template: TransactionBuilder,
    installments: u32,
    connection: &mut Connection,
) -> Result<Vec<Transaction>, Error> {
    let builders = expand_installments(template, installments)?;

    let sql_transaction = connection.transaction()?;

    let created = builders
        .into_iter()
        .map(|builder| create_transaction(builder, &sql_transaction))
        .collect::<Result<Vec<_>, _>>()?;

    sql_transaction.commit()?;

    Ok(created)
}
