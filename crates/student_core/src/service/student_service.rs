//! Student use-case service.
//!
//! # Responsibility
//! - Provide the CRUD entry points callers depend on.
//! - Delegate every call unchanged to a repository implementation.
//!
//! # Invariants
//! - The service holds no state of its own and adds no validation; field
//!   rules belong to `Student`, constraint checks to the repository.
//! - Repository errors are returned unchanged.

use crate::model::student::Student;
use crate::repo::student_repo::{StoreResult, StudentRepository};

/// Storage-agnostic facade over a `StudentRepository`.
pub struct StudentService<R: StudentRepository> {
    repo: R,
}

impl<R: StudentRepository> StudentService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Returns the wrapped repository.
    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn create(&self, student: &Student) -> StoreResult<()> {
        self.repo.create(student)
    }

    pub fn update(&self, student: &Student) -> StoreResult<()> {
        self.repo.update(student)
    }

    pub fn delete(&self, id: &str) -> StoreResult<()> {
        self.repo.delete(id)
    }

    /// Returns `Ok(None)` when no student has this id.
    pub fn get(&self, id: &str) -> StoreResult<Option<Student>> {
        self.repo.get(id)
    }

    /// Lists all students ordered by id.
    pub fn list(&self) -> StoreResult<Vec<Student>> {
        self.repo.list()
    }
}

#[cfg(test)]
mod tests {
    use super::StudentService;
    use crate::model::student::Student;
    use crate::repo::student_repo::{StoreError, StoreResult, StudentRepository};
    use std::cell::RefCell;
    use std::collections::BTreeMap;

    /// In-memory backend proving the service is backend-agnostic.
    #[derive(Default)]
    struct MapRepository {
        rows: RefCell<BTreeMap<String, Student>>,
    }

    impl StudentRepository for MapRepository {
        fn create(&self, student: &Student) -> StoreResult<()> {
            let mut rows = self.rows.borrow_mut();
            if rows.contains_key(student.id()) {
                return Err(StoreError::DuplicateKey(student.id().to_string()));
            }
            rows.insert(student.id().to_string(), student.clone());
            Ok(())
        }

        fn update(&self, student: &Student) -> StoreResult<()> {
            match self.rows.borrow_mut().get_mut(student.id()) {
                Some(row) => {
                    *row = student.clone();
                    Ok(())
                }
                None => Err(StoreError::NotFound(student.id().to_string())),
            }
        }

        fn delete(&self, id: &str) -> StoreResult<()> {
            self.rows
                .borrow_mut()
                .remove(id)
                .map(|_| ())
                .ok_or_else(|| StoreError::NotFound(id.to_string()))
        }

        fn get(&self, id: &str) -> StoreResult<Option<Student>> {
            Ok(self.rows.borrow().get(id).cloned())
        }

        fn list(&self) -> StoreResult<Vec<Student>> {
            Ok(self.rows.borrow().values().cloned().collect())
        }
    }

    #[test]
    fn service_forwards_to_substituted_backend() {
        let service = StudentService::new(MapRepository::default());
        let student = Student::new("12345", "Ayse", "Yilmaz", 20, 85.5).unwrap();

        service.create(&student).unwrap();
        assert_eq!(service.get("12345").unwrap(), Some(student.clone()));
        assert_eq!(service.list().unwrap(), vec![student.clone()]);
        assert_eq!(service.repository().rows.borrow().len(), 1);

        let duplicate = service.create(&student).unwrap_err();
        assert!(matches!(duplicate, StoreError::DuplicateKey(id) if id == "12345"));

        service.delete("12345").unwrap();
        let missing = service.delete("12345").unwrap_err();
        assert!(matches!(missing, StoreError::NotFound(id) if id == "12345"));
    }
}
