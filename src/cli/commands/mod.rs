pub mod budgets;
pub mod categories;
pub mod goals;
pub mod settings;
pub mod transactions;
