use crate::{
    data::student::{Student, ValidatedStudent},
    error::{CollegeResult, IdsExhaustedSnafu, MissingStudentSnafu},
};
use snafu::OptionExt;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Every student the process knows about, in insertion order.
///
/// Reads share the lock and every mutation takes it exclusively for its whole duration, so each
/// operation sees and leaves a consistent list.
#[derive(Clone, Debug, Default)]
pub struct StudentStore(Arc<RwLock<Vec<Student>>>);

impl StudentStore {
    pub fn new(students: Vec<Student>) -> Self {
        Self(Arc::new(RwLock::new(students)))
    }

    pub fn seeded() -> Self {
        Self::new(Student::seeded())
    }

    pub async fn get_all(&self) -> Vec<Student> {
        self.0.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.0.read().await.len()
    }

    pub async fn get_by_id(&self, id: i32) -> Option<Student> {
        self.0
            .read()
            .await
            .iter()
            .find(|student| student.id == id)
            .cloned()
    }

    pub async fn get_by_name(&self, name: &str) -> Option<Student> {
        self.0
            .read()
            .await
            .iter()
            .find(|student| student.student_name == name)
            .cloned()
    }

    ///assigns the next id (one past the largest in use) and appends
    pub async fn insert(&self, to_be_added: ValidatedStudent) -> CollegeResult<Student> {
        let mut students = self.0.write().await;

        let last = students.iter().map(|student| student.id).max().unwrap_or(0);
        let id = last.checked_add(1).context(IdsExhaustedSnafu { last })?;

        let student = Student::from_validated(id, to_be_added);
        students.push(student.clone());
        Ok(student)
    }

    pub async fn remove(&self, id: i32) -> Option<Student> {
        let mut students = self.0.write().await;
        let index = students.iter().position(|student| student.id == id)?;
        Some(students.remove(index))
    }

    /// Runs `replace` on a copy of the student with `id`, and swaps the result in only if it
    /// succeeds. The stored id is kept whatever `replace` returns.
    pub async fn modify(
        &self,
        id: i32,
        replace: impl FnOnce(&Student) -> CollegeResult<Student>,
    ) -> CollegeResult<()> {
        let mut students = self.0.write().await;
        let existing = students
            .iter_mut()
            .find(|student| student.id == id)
            .context(MissingStudentSnafu { id })?;

        let mut replacement = replace(existing)?;
        replacement.id = id;
        *existing = replacement;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CollegeError, EmptyNameSnafu};

    fn new_student(name: &str) -> ValidatedStudent {
        ValidatedStudent {
            student_name: name.to_string(),
            address: "X".to_string(),
            email: None,
        }
    }

    #[tokio::test]
    async fn insert_assigns_one_past_the_largest_id() {
        let store = StudentStore::seeded();
        let created = store.insert(new_student("Student 3")).await.unwrap();
        assert_eq!(created.id, 3);

        store.remove(1).await.unwrap();
        let created = store.insert(new_student("Student 4")).await.unwrap();
        assert_eq!(created.id, 4);
    }

    #[tokio::test]
    async fn insert_into_empty_store_starts_at_one() {
        let store = StudentStore::default();
        let created = store.insert(new_student("First")).await.unwrap();
        assert_eq!(created.id, 1);
        assert_eq!(store.get_all().await, vec![created]);
    }

    #[tokio::test]
    async fn insert_reports_exhausted_ids() {
        let store = StudentStore::new(vec![Student::from_validated(
            i32::MAX,
            new_student("Last"),
        )]);
        let err = store.insert(new_student("Overflow")).await.unwrap_err();
        assert!(matches!(err, CollegeError::IdsExhausted { last: i32::MAX }));
    }

    #[tokio::test]
    async fn lookups_find_exact_matches() {
        let store = StudentStore::seeded();
        assert_eq!(store.get_by_id(2).await.unwrap().student_name, "Student 2");
        assert!(store.get_by_id(3).await.is_none());
        assert_eq!(store.get_by_name("Student 1").await.unwrap().id, 1);
        assert!(store.get_by_name("student 1").await.is_none());
    }

    #[tokio::test]
    async fn remove_returns_the_removed_student() {
        let store = StudentStore::seeded();
        assert_eq!(store.remove(1).await.unwrap().student_name, "Student 1");
        assert!(store.remove(1).await.is_none());
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn failed_modify_leaves_store_unchanged() {
        let store = StudentStore::seeded();
        let before = store.get_all().await;

        let err = store
            .modify(1, |_| EmptyNameSnafu.fail())
            .await
            .unwrap_err();
        assert!(matches!(err, CollegeError::EmptyName));

        let err = store
            .modify(9, |existing| Ok(existing.clone()))
            .await
            .unwrap_err();
        assert!(matches!(err, CollegeError::MissingStudent { id: 9 }));

        assert_eq!(store.get_all().await, before);
    }

    #[tokio::test]
    async fn modify_keeps_the_stored_id() {
        let store = StudentStore::seeded();
        store
            .modify(2, |existing| {
                Ok(Student {
                    id: 99,
                    student_name: "Renamed".to_string(),
                    ..existing.clone()
                })
            })
            .await
            .unwrap();

        let renamed = store.get_by_id(2).await.unwrap();
        assert_eq!(renamed.student_name, "Renamed");
        assert!(store.get_by_id(99).await.is_none());
    }
}
