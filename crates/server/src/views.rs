//! Conversions between engine values and the wire types.

use api_types::{
    analytics as wire_analytics,
    batch::{BatchStatus as WireStatus, BatchView},
    earning::{EarningFields, EarningView},
    expense::{ExpenseFields, ExpenseView},
    user::{Role, UserView},
};
use engine::{
    Batch, BatchStatus, BatchSummary, CategoryTotal, Earning, EarningInput, Expense, ExpenseInput,
    Totals, User, UserRole,
};

pub(crate) fn user_view(user: User) -> UserView {
    UserView {
        id: user.id,
        email: user.email,
        name: user.name,
        role: match user.role {
            UserRole::Admin => Role::Admin,
            UserRole::Standard => Role::User,
        },
    }
}

pub(crate) fn status_view(status: BatchStatus) -> WireStatus {
    match status {
        BatchStatus::InProgress => WireStatus::InProgress,
        BatchStatus::Sold => WireStatus::Sold,
        BatchStatus::Completed => WireStatus::Completed,
        BatchStatus::Cancelled => WireStatus::Cancelled,
    }
}

pub(crate) fn status_from_wire(status: WireStatus) -> BatchStatus {
    match status {
        WireStatus::InProgress => BatchStatus::InProgress,
        WireStatus::Sold => BatchStatus::Sold,
        WireStatus::Completed => BatchStatus::Completed,
        WireStatus::Cancelled => BatchStatus::Cancelled,
    }
}

pub(crate) fn batch_view(batch: Batch) -> BatchView {
    BatchView {
        id: batch.id,
        user_id: batch.user_id,
        name: batch.name,
        status: status_view(batch.status),
        start_date: batch.start_date,
        end_date: batch.end_date,
        notes: batch.notes,
        created_at: batch.created_at,
    }
}

pub(crate) fn expense_view(expense: Expense) -> ExpenseView {
    ExpenseView {
        id: expense.id,
        batch_id: expense.batch_id,
        item_name: expense.item_name,
        quantity: expense.quantity,
        cost_per_unit: expense.cost_per_unit,
        total: expense.total,
        category: expense.category,
        is_recurring: expense.is_recurring,
        transaction_date: expense.transaction_date,
        week_of_giving: expense.week_of_giving,
        unit_label: expense.unit_label,
        attachment: expense.attachment,
        attachment_name: expense.attachment_name,
        created_at: expense.created_at,
    }
}

pub(crate) fn earning_view(earning: Earning) -> EarningView {
    EarningView {
        id: earning.id,
        batch_id: earning.batch_id,
        item_name: earning.item_name,
        quantity: earning.quantity,
        amount_per_unit: earning.amount_per_unit,
        total: earning.total,
        category: earning.category,
        transaction_date: earning.transaction_date,
        created_at: earning.created_at,
    }
}

pub(crate) fn expense_input(fields: ExpenseFields) -> ExpenseInput {
    ExpenseInput {
        item_name: fields.item_name,
        quantity: fields.quantity,
        cost_per_unit: fields.cost_per_unit,
        category: fields.category,
        custom_category: fields.custom_category,
        is_recurring: fields.is_recurring,
        transaction_date: fields.transaction_date,
        week_of_giving: fields.week_of_giving,
        unit_label: fields.unit_label,
        attachment: fields.attachment,
        attachment_name: fields.attachment_name,
    }
}

pub(crate) fn earning_input(fields: EarningFields) -> EarningInput {
    EarningInput {
        item_name: fields.item_name,
        quantity: fields.quantity,
        amount_per_unit: fields.amount_per_unit,
        category: fields.category,
        custom_category: fields.custom_category,
        transaction_date: fields.transaction_date,
    }
}

pub(crate) fn totals_view(totals: &Totals) -> wire_analytics::Totals {
    wire_analytics::Totals {
        total_expenses: totals.total_expenses,
        total_earnings: totals.total_earnings,
        profit_loss: totals.profit_loss,
        roi: totals.roi,
    }
}

pub(crate) fn breakdown_view(breakdown: Vec<CategoryTotal>) -> Vec<wire_analytics::CategoryTotal> {
    breakdown
        .into_iter()
        .map(|entry| wire_analytics::CategoryTotal {
            category: entry.category,
            total: entry.total,
        })
        .collect()
}

pub(crate) fn summary_view(summary: BatchSummary) -> wire_analytics::BatchSummary {
    wire_analytics::BatchSummary {
        totals: totals_view(&summary.totals),
        batch: batch_view(summary.batch),
        expenses_by_category: breakdown_view(summary.expenses_by_category),
        earnings_by_category: breakdown_view(summary.earnings_by_category),
    }
}
