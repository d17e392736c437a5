use std::sync::Arc;

use crate::db::store::{QuizStore, SurveyStore};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn SurveyStore>,
    pub quizzes: Arc<dyn QuizStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn SurveyStore>, quizzes: Arc<dyn QuizStore>) -> Self {
        Self { store, quizzes }
    }

    /// One backend serving both the survey and the quiz tables.
    pub fn shared<S>(store: S) -> Self
    where
        S: SurveyStore + QuizStore + 'static,
    {
        let store = Arc::new(store);
        Self {
            store: store.clone(),
            quizzes: store,
        }
    }
}
