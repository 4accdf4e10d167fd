use chrono::{DateTime, Utc};

use super::ResourceContext;
use crate::models::{SortOrder, Transaction, TransactionType};

/// Filter setters for the transaction list. Each one re-keys the cached view.
impl ResourceContext<Transaction> {
    pub async fn set_search(&self, term: impl Into<String>) {
        let term = term.into();
        self.update_query(|q| q.search = term).await;
    }

    pub async fn set_date(&self, date: Option<DateTime<Utc>>) {
        self.update_query(|q| q.date = date).await;
    }

    pub async fn set_sort(&self, sort: SortOrder) {
        self.update_query(|q| q.sort = sort).await;
    }

    pub async fn set_type(&self, kind: Option<TransactionType>) {
        self.update_query(|q| q.kind = kind).await;
    }

    pub async fn set_page(&self, page: u32) {
        self.update_query(|q| q.page = page.max(1)).await;
    }

    pub async fn set_per_page(&self, per_page: u32) {
        self.update_query(|q| q.per_page = per_page.max(1)).await;
    }
}
