use crate::workout::{Workout, WorkoutId};

/// Append-only, insertion-ordered list of the session's workouts.
#[derive(Debug, Default, Clone)]
pub struct WorkoutCollection {
    workouts: Vec<Workout>,
}

impl WorkoutCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(workouts: Vec<Workout>) -> Self {
        Self { workouts }
    }

    pub fn add(&mut self, workout: Workout) {
        self.workouts.push(workout);
    }

    /// First workout with a matching id.
    pub fn find_by_id(&self, id: &WorkoutId) -> Option<&Workout> {
        self.workouts.iter().find(|w| w.id() == id)
    }

    pub fn find_by_id_mut(&mut self, id: &WorkoutId) -> Option<&mut Workout> {
        self.workouts.iter_mut().find(|w| w.id() == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Workout> {
        self.workouts.iter()
    }

    pub fn len(&self) -> usize {
        self.workouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workouts.is_empty()
    }

    pub(crate) fn clear(&mut self) {
        self.workouts.clear();
    }
}

impl<'a> IntoIterator for &'a WorkoutCollection {
    type Item = &'a Workout;
    type IntoIter = std::slice::Iter<'a, Workout>;

    fn into_iter(self) -> Self::IntoIter {
        self.workouts.iter()
    }
}
