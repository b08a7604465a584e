use std::collections::BTreeMap;

use async_trait::async_trait;
use symptom_core::{ListQuery, NewPatient, Page, Patient};
use tokio::sync::RwLock;

use super::PatientStore;
use crate::error::AppError;

/// In-process patient store, used when no database is configured
pub struct MemoryPatientStore {
    state: RwLock<State>,
}

struct State {
    next_id: i64,
    patients: BTreeMap<i64, Patient>,
}

impl State {
    fn insert(&mut self, data: NewPatient) -> Patient {
        let patient = Patient::new(self.next_id, data);
        self.patients.insert(patient.id, patient.clone());
        self.next_id += 1;
        patient
    }
}

impl MemoryPatientStore {
    pub fn new() -> Self {
        Self::with_patients(Vec::new())
    }

    /// Create a store pre-filled with `patients`, assigning ids from 1
    pub fn with_patients(patients: impl IntoIterator<Item = NewPatient>) -> Self {
        let mut state = State {
            next_id: 1,
            patients: BTreeMap::new(),
        };
        for data in patients {
            state.insert(data);
        }
        Self {
            state: RwLock::new(state),
        }
    }
}

impl Default for MemoryPatientStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PatientStore for MemoryPatientStore {
    async fn get(&self, id: i64) -> Result<Option<Patient>, AppError> {
        Ok(self.state.read().await.patients.get(&id).cloned())
    }

    async fn list(&self, query: &ListQuery) -> Result<Page<Patient>, AppError> {
        // BTreeMap iteration is id order, the default listing order
        let mut all: Vec<Patient> = self.state.read().await.patients.values().cloned().collect();
        if let Some(sort) = query.sort {
            sort.apply(&mut all);
        }
        Ok(Page::window(all, query.page))
    }

    async fn create(&self, data: NewPatient) -> Result<Patient, AppError> {
        Ok(self.state.write().await.insert(data))
    }

    async fn update(&self, id: i64, data: NewPatient) -> Result<Option<Patient>, AppError> {
        let mut state = self.state.write().await;
        match state.patients.get_mut(&id) {
            Some(existing) => {
                *existing = Patient::new(id, data);
                Ok(Some(existing.clone()))
            }
            None => Ok(None),
        }
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use symptom_core::{Direction, PageRequest, Sort, SortField, demo_patients};

    fn families(page: &Page<Patient>) -> Vec<&str> {
        page.items.iter().map(|p| p.family_name.as_str()).collect()
    }

    #[tokio::test]
    async fn create_assigns_increasing_ids() {
        let store = MemoryPatientStore::new();
        let first = store.create(NewPatient::new("A", "One")).await.unwrap();
        let second = store.create(NewPatient::new("B", "Two")).await.unwrap();
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(store.get(2).await.unwrap(), Some(second));
    }

    #[tokio::test]
    async fn update_replaces_fields_and_keeps_id() {
        let store = MemoryPatientStore::with_patients(demo_patients());
        let updated = store
            .update(2, NewPatient::new("Carla", "Changed"))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.id, 2);
        assert_eq!(updated.family_name, "Changed");
        assert_eq!(updated.birth_date, None);
        assert_eq!(store.get(2).await.unwrap(), Some(updated));
    }

    #[tokio::test]
    async fn update_unknown_id_is_none() {
        let store = MemoryPatientStore::new();
        let result = store.update(5, NewPatient::new("A", "B")).await.unwrap();
        assert!(result.is_none());
        assert!(store.get(5).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn list_sorts_before_paging() {
        let store = MemoryPatientStore::with_patients(demo_patients());
        let query = ListQuery {
            page: Some(PageRequest::new(0, 2).unwrap()),
            sort: Some(Sort::new(SortField::FamilyName, Direction::Desc)),
        };
        let page = store.list(&query).await.unwrap();

        assert_eq!(families(&page), vec!["Spec", "Neubus"]);
        assert_eq!(page.total_elements, 3);
        assert_eq!(page.total_pages(), 2);
    }

    #[tokio::test]
    async fn unpaged_list_is_id_ordered() {
        let store = MemoryPatientStore::with_patients(demo_patients());
        let page = store.list(&ListQuery::default()).await.unwrap();
        assert_eq!(families(&page), vec!["Spec", "Certify", "Neubus"]);
    }
}
