use async_trait::async_trait;
use deadpool_postgres::Pool;
use symptom_core::{Direction, ListQuery, NewPatient, Page, Patient, Sort, SortField};
use tokio_postgres::Row;

use super::PatientStore;
use crate::error::AppError;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS patients (
    id          BIGSERIAL PRIMARY KEY,
    given_name  TEXT NOT NULL,
    family_name TEXT NOT NULL,
    birth_date  DATE,
    email       TEXT
)";

const COLUMNS: &str = "id, given_name, family_name, birth_date, email";

/// PostgreSQL-backed patient store
#[derive(Clone)]
pub struct PatientRepository {
    pool: Pool,
}

impl PatientRepository {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    /// Create the patients table if it does not exist yet
    pub async fn migrate(&self) -> Result<(), AppError> {
        let client = self.pool.get().await?;
        client.batch_execute(SCHEMA).await?;
        Ok(())
    }
}

fn row_to_patient(row: &Row) -> Patient {
    Patient {
        id: row.get("id"),
        given_name: row.get("given_name"),
        family_name: row.get("family_name"),
        birth_date: row.get("birth_date"),
        email: row.get("email"),
    }
}

/// ORDER BY clause matching the in-memory ordering: byte-wise text
/// comparison, NULLs first when ascending, ties broken by id.
fn order_by(sort: Option<Sort>) -> String {
    let Some(sort) = sort else {
        return "id ASC".to_string();
    };

    let column = match sort.field {
        SortField::GivenName | SortField::FamilyName | SortField::Email => {
            format!("{} COLLATE \"C\"", sort.field.column())
        }
        SortField::Id | SortField::BirthDate => sort.field.column().to_string(),
    };
    let direction = match sort.direction {
        Direction::Asc => "ASC NULLS FIRST",
        Direction::Desc => "DESC NULLS LAST",
    };
    format!("{} {}, id ASC", column, direction)
}

#[async_trait]
impl PatientStore for PatientRepository {
    async fn get(&self, id: i64) -> Result<Option<Patient>, AppError> {
        let client = self.pool.get().await?;
        let sql = format!("SELECT {} FROM patients WHERE id = $1", COLUMNS);
        let row = client.query_opt(sql.as_str(), &[&id]).await?;

        Ok(row.as_ref().map(row_to_patient))
    }

    async fn list(&self, query: &ListQuery) -> Result<Page<Patient>, AppError> {
        let client = self.pool.get().await?;
        let order = order_by(query.sort);

        let Some(request) = query.page else {
            let sql = format!("SELECT {} FROM patients ORDER BY {}", COLUMNS, order);
            let rows = client.query(sql.as_str(), &[]).await?;
            return Ok(Page::unpaged(rows.iter().map(row_to_patient).collect()));
        };

        let total: i64 = client
            .query_one("SELECT COUNT(*) FROM patients", &[])
            .await?
            .get(0);

        let limit = i64::from(request.size);
        let offset = i64::try_from(request.offset()).unwrap_or(i64::MAX);
        let sql = format!(
            "SELECT {} FROM patients ORDER BY {} LIMIT $1 OFFSET $2",
            COLUMNS, order
        );
        let rows = client.query(sql.as_str(), &[&limit, &offset]).await?;

        Ok(Page {
            items: rows.iter().map(row_to_patient).collect(),
            total_elements: u64::try_from(total).unwrap_or_default(),
            page: request.page,
            size: request.size,
        })
    }

    async fn create(&self, data: NewPatient) -> Result<Patient, AppError> {
        let client = self.pool.get().await?;
        let row = client
            .query_one(
                "INSERT INTO patients (given_name, family_name, birth_date, email) \
                 VALUES ($1, $2, $3, $4) RETURNING id",
                &[
                    &data.given_name,
                    &data.family_name,
                    &data.birth_date,
                    &data.email,
                ],
            )
            .await?;

        Ok(Patient::new(row.get(0), data))
    }

    async fn update(&self, id: i64, data: NewPatient) -> Result<Option<Patient>, AppError> {
        let client = self.pool.get().await?;
        let row = client
            .query_opt(
                "UPDATE patients \
                 SET given_name = $2, family_name = $3, birth_date = $4, email = $5 \
                 WHERE id = $1 RETURNING id",
                &[
                    &id,
                    &data.given_name,
                    &data.family_name,
                    &data.birth_date,
                    &data.email,
                ],
            )
            .await?;

        Ok(row.map(|_| Patient::new(id, data)))
    }

    async fn ping(&self) -> Result<(), AppError> {
        let client = self.pool.get().await?;
        client.query_one("SELECT 1", &[]).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_order_is_by_id() {
        assert_eq!(order_by(None), "id ASC");
    }

    #[test]
    fn text_columns_sort_bytewise() {
        let sort = Sort::new(SortField::FamilyName, Direction::Desc);
        assert_eq!(
            order_by(Some(sort)),
            "family_name COLLATE \"C\" DESC NULLS LAST, id ASC"
        );
    }

    #[test]
    fn date_column_has_no_collation() {
        let sort = Sort::new(SortField::BirthDate, Direction::Asc);
        assert_eq!(order_by(Some(sort)), "birth_date ASC NULLS FIRST, id ASC");
    }
}
