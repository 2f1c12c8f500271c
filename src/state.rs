use crate::{config::RuntimeConfiguration, data::store::StudentStore};
use jiff::{Zoned, civil::Date};
use std::ops::Deref;

#[derive(Clone, Debug)]
pub struct CollegeState {
    students: StudentStore,
    config: RuntimeConfiguration,
}

impl CollegeState {
    pub fn new(students: StudentStore, config: RuntimeConfiguration) -> Self {
        Self { students, config }
    }

    pub fn config(&self) -> &RuntimeConfiguration {
        &self.config
    }

    ///the current date wherever the college is
    pub fn today(&self) -> Date {
        Zoned::now()
            .with_time_zone(self.config.timezone().clone())
            .date()
    }

    pub async fn sensible_shutdown(&self) {
        let remaining = self.students.len().await;
        info!(remaining, "Dropping in-memory students");
    }
}

impl Deref for CollegeState {
    type Target = StudentStore;

    fn deref(&self) -> &Self::Target {
        &self.students
    }
}
