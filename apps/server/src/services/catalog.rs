//! Clinic-level collections with no owning patient: expenses and the
//! disease catalog.

use crate::{
    db::{Collection, DocumentQuery, DocumentStore, Filter, Sort, SortKind, TypedCollection},
    models::requests::{NewDisease, NewExpense},
    Error, Result,
};
use chrono::Utc;
use molar_models::{Disease, Expense, UserRef};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

#[derive(Clone)]
pub struct CatalogService {
    store: Arc<dyn DocumentStore>,
    expenses: TypedCollection<Expense>,
    diseases: TypedCollection<Disease>,
}

impl CatalogService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            expenses: TypedCollection::new(Arc::clone(&store), Collection::Expenses),
            diseases: TypedCollection::new(Arc::clone(&store), Collection::Diseases),
            store,
        }
    }

    pub async fn add_expense(
        &self,
        request: NewExpense,
        actor: Option<UserRef>,
    ) -> Result<Expense> {
        request.validate()?;

        let now = Utc::now();
        let expense = Expense {
            id: Uuid::new_v4(),
            amount: request.amount,
            description: request.description,
            created_by: actor,
            created_at: now,
            updated_at: now,
        };

        self.expenses.insert(expense.id, &expense).await?;
        Ok(expense)
    }

    pub async fn list_expenses(&self) -> Result<Vec<Expense>> {
        self.expenses
            .find(&DocumentQuery::sorted(
                Filter::All,
                Sort::descending("createdAt", SortKind::Timestamp),
            ))
            .await
    }

    pub async fn delete_expense(&self, id: Uuid) -> Result<()> {
        if !self.expenses.delete(id).await? {
            return Err(Error::not_found("Expense", id));
        }
        Ok(())
    }

    pub async fn add_disease(&self, request: NewDisease) -> Result<Disease> {
        request.validate()?;

        let name = request.name.trim().to_string();
        let existing = self
            .store
            .count(Collection::Diseases, &Filter::eq("name", name.clone()))
            .await?;
        if existing > 0 {
            return Err(Error::Conflict(format!(
                "Disease '{name}' is already in the catalog"
            )));
        }

        let now = Utc::now();
        let disease = Disease {
            id: Uuid::new_v4(),
            name,
            created_at: now,
            updated_at: now,
        };

        self.diseases.insert(disease.id, &disease).await?;
        Ok(disease)
    }

    pub async fn list_diseases(&self) -> Result<Vec<Disease>> {
        self.diseases
            .find(&DocumentQuery::sorted(
                Filter::All,
                Sort::ascending("name", SortKind::Text),
            ))
            .await
    }

    pub async fn delete_disease(&self, id: Uuid) -> Result<()> {
        if !self.diseases.delete(id).await? {
            return Err(Error::not_found("Disease", id));
        }
        Ok(())
    }
}
