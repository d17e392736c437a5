use futures::future::BoxFuture;

use super::MemoryStore;
use crate::db::store::{QuizStore, StoreError, StoreResult};
use crate::models::quiz_models::{
    Quiz, QuizAttempt, QuizQuestion, QuizResponse, SpecialSurvey, WhitelistEntry,
};

#[derive(Default)]
pub(super) struct QuizTables {
    quizzes: Vec<Quiz>,
    questions: Vec<QuizQuestion>,
    attempts: Vec<QuizAttempt>,
    responses: Vec<QuizResponse>,
    whitelist: Vec<WhitelistEntry>,
    special_surveys: Vec<SpecialSurvey>,
}

fn missing(table: &str, id: &str) -> StoreError {
    StoreError::Rejected {
        status: 404,
        message: format!("No {table} row with id {id}"),
    }
}

fn duplicate(table: &str, id: &str) -> StoreError {
    StoreError::Rejected {
        status: 409,
        message: format!("{table} row with id {id} already exists"),
    }
}

impl QuizStore for MemoryStore {
    fn create_quiz(&self, quiz: Quiz) -> BoxFuture<'_, StoreResult<Quiz>> {
        Box::pin(async move {
            let mut tables = self.quiz.write().await;
            if tables.quizzes.iter().any(|q| q.id == quiz.id) {
                return Err(duplicate("quizzes", &quiz.id));
            }
            tables.quizzes.push(quiz.clone());
            Ok(quiz)
        })
    }

    fn get_quiz<'a>(&'a self, id: &'a str) -> BoxFuture<'a, StoreResult<Option<Quiz>>> {
        Box::pin(async move {
            let tables = self.quiz.read().await;
            Ok(tables
                .quizzes
                .iter()
                .find(|q| q.id == id && q.is_active)
                .cloned())
        })
    }

    fn delete_quiz<'a>(&'a self, id: &'a str) -> BoxFuture<'a, StoreResult<bool>> {
        Box::pin(async move {
            let mut tables = self.quiz.write().await;
            let attempt_ids: Vec<String> = tables
                .attempts
                .iter()
                .filter(|a| a.quiz_id == id)
                .map(|a| a.id.clone())
                .collect();

            tables.responses.retain(|r| !attempt_ids.contains(&r.attempt_id));
            tables.attempts.retain(|a| a.quiz_id != id);
            tables.questions.retain(|q| q.quiz_id != id);
            tables.whitelist.retain(|w| w.quiz_id != id);
            tables.special_surveys.retain(|s| s.quiz_id != id);

            let before = tables.quizzes.len();
            tables.quizzes.retain(|q| q.id != id);
            Ok(tables.quizzes.len() < before)
        })
    }

    fn add_quiz_question(&self, question: QuizQuestion) -> BoxFuture<'_, StoreResult<QuizQuestion>> {
        Box::pin(async move {
            self.quiz.write().await.questions.push(question.clone());
            Ok(question)
        })
    }

    fn list_quiz_questions<'a>(
        &'a self,
        quiz_id: &'a str,
    ) -> BoxFuture<'a, StoreResult<Vec<QuizQuestion>>> {
        Box::pin(async move {
            let mut questions: Vec<QuizQuestion> = self
                .quiz
                .read()
                .await
                .questions
                .iter()
                .filter(|q| q.quiz_id == quiz_id)
                .cloned()
                .collect();
            questions.sort_by_key(|q| q.position);
            Ok(questions)
        })
    }

    fn create_attempt(&self, attempt: QuizAttempt) -> BoxFuture<'_, StoreResult<QuizAttempt>> {
        Box::pin(async move {
            let mut tables = self.quiz.write().await;
            if tables.attempts.iter().any(|a| a.id == attempt.id) {
                return Err(duplicate("quiz_attempts", &attempt.id));
            }
            tables.attempts.push(attempt.clone());
            Ok(attempt)
        })
    }

    fn get_attempt<'a>(&'a self, id: &'a str) -> BoxFuture<'a, StoreResult<Option<QuizAttempt>>> {
        Box::pin(async move {
            let tables = self.quiz.read().await;
            Ok(tables.attempts.iter().find(|a| a.id == id).cloned())
        })
    }

    fn list_attempts<'a>(
        &'a self,
        quiz_id: &'a str,
        participant_wallet: Option<&'a str>,
    ) -> BoxFuture<'a, StoreResult<Vec<QuizAttempt>>> {
        Box::pin(async move {
            let mut attempts: Vec<QuizAttempt> = self
                .quiz
                .read()
                .await
                .attempts
                .iter()
                .filter(|a| a.quiz_id == quiz_id)
                .filter(|a| participant_wallet.map_or(true, |w| a.participant_wallet == w))
                .cloned()
                .collect();
            attempts.sort_by(|a, b| b.total_score.total_cmp(&a.total_score));
            Ok(attempts)
        })
    }

    fn update_attempt(&self, attempt: QuizAttempt) -> BoxFuture<'_, StoreResult<QuizAttempt>> {
        Box::pin(async move {
            let mut tables = self.quiz.write().await;
            let slot = tables
                .attempts
                .iter_mut()
                .find(|a| a.id == attempt.id)
                .ok_or_else(|| missing("quiz_attempts", &attempt.id))?;
            *slot = attempt.clone();
            Ok(attempt)
        })
    }

    fn insert_quiz_response(
        &self,
        response: QuizResponse,
    ) -> BoxFuture<'_, StoreResult<QuizResponse>> {
        Box::pin(async move {
            self.quiz.write().await.responses.push(response.clone());
            Ok(response)
        })
    }

    fn get_quiz_response<'a>(
        &'a self,
        id: &'a str,
    ) -> BoxFuture<'a, StoreResult<Option<QuizResponse>>> {
        Box::pin(async move {
            let tables = self.quiz.read().await;
            Ok(tables.responses.iter().find(|r| r.id == id).cloned())
        })
    }

    fn list_quiz_responses<'a>(
        &'a self,
        attempt_id: &'a str,
    ) -> BoxFuture<'a, StoreResult<Vec<QuizResponse>>> {
        Box::pin(async move {
            let mut responses: Vec<QuizResponse> = self
                .quiz
                .read()
                .await
                .responses
                .iter()
                .filter(|r| r.attempt_id == attempt_id)
                .cloned()
                .collect();
            responses.sort_by_key(|r| r.created_at);
            Ok(responses)
        })
    }

    fn update_quiz_response(
        &self,
        response: QuizResponse,
    ) -> BoxFuture<'_, StoreResult<QuizResponse>> {
        Box::pin(async move {
            let mut tables = self.quiz.write().await;
            let slot = tables
                .responses
                .iter_mut()
                .find(|r| r.id == response.id)
                .ok_or_else(|| missing("quiz_responses", &response.id))?;
            *slot = response.clone();
            Ok(response)
        })
    }

    fn get_whitelist_entry<'a>(
        &'a self,
        quiz_id: &'a str,
        wallet_address: &'a str,
    ) -> BoxFuture<'a, StoreResult<Option<WhitelistEntry>>> {
        Box::pin(async move {
            let tables = self.quiz.read().await;
            Ok(tables
                .whitelist
                .iter()
                .find(|w| w.quiz_id == quiz_id && w.wallet_address == wallet_address && w.is_active)
                .cloned())
        })
    }

    fn list_whitelist<'a>(
        &'a self,
        quiz_id: &'a str,
    ) -> BoxFuture<'a, StoreResult<Vec<WhitelistEntry>>> {
        Box::pin(async move {
            let mut entries: Vec<WhitelistEntry> = self
                .quiz
                .read()
                .await
                .whitelist
                .iter()
                .filter(|w| w.quiz_id == quiz_id && w.is_active)
                .cloned()
                .collect();
            entries.sort_by(|a, b| b.whitelisted_at.cmp(&a.whitelisted_at));
            Ok(entries)
        })
    }

    fn add_to_whitelist(&self, entry: WhitelistEntry) -> BoxFuture<'_, StoreResult<WhitelistEntry>> {
        Box::pin(async move {
            self.quiz.write().await.whitelist.push(entry.clone());
            Ok(entry)
        })
    }

    fn remove_from_whitelist<'a>(
        &'a self,
        quiz_id: &'a str,
        wallet_address: &'a str,
    ) -> BoxFuture<'a, StoreResult<bool>> {
        Box::pin(async move {
            let mut tables = self.quiz.write().await;
            let mut removed = false;
            for entry in tables
                .whitelist
                .iter_mut()
                .filter(|w| w.quiz_id == quiz_id && w.wallet_address == wallet_address && w.is_active)
            {
                entry.is_active = false;
                removed = true;
            }
            Ok(removed)
        })
    }

    fn create_special_survey(
        &self,
        survey: SpecialSurvey,
    ) -> BoxFuture<'_, StoreResult<SpecialSurvey>> {
        Box::pin(async move {
            let mut tables = self.quiz.write().await;
            if tables.special_surveys.iter().any(|s| s.id == survey.id) {
                return Err(duplicate("special_surveys", &survey.id));
            }
            tables.special_surveys.push(survey.clone());
            Ok(survey)
        })
    }

    fn get_special_survey<'a>(
        &'a self,
        id: &'a str,
    ) -> BoxFuture<'a, StoreResult<Option<SpecialSurvey>>> {
        Box::pin(async move {
            let tables = self.quiz.read().await;
            Ok(tables.special_surveys.iter().find(|s| s.id == id).cloned())
        })
    }

    fn list_special_surveys<'a>(
        &'a self,
        quiz_id: &'a str,
    ) -> BoxFuture<'a, StoreResult<Vec<SpecialSurvey>>> {
        Box::pin(async move {
            let mut surveys: Vec<SpecialSurvey> = self
                .quiz
                .read()
                .await
                .special_surveys
                .iter()
                .filter(|s| s.quiz_id == quiz_id && s.is_active)
                .cloned()
                .collect();
            surveys.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            Ok(surveys)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::quiz_models::{
        fixtures::{answer, attempt, entry, question, quiz, special_survey},
        AttemptStatus,
    };

    #[tokio::test]
    async fn inactive_quizzes_are_hidden() {
        let store = MemoryStore::new();
        let mut hidden = quiz("hidden");
        hidden.is_active = false;
        store.create_quiz(quiz("quiz")).await.unwrap();
        store.create_quiz(hidden).await.unwrap();

        assert!(store.get_quiz("quiz").await.unwrap().is_some());
        assert!(store.get_quiz("hidden").await.unwrap().is_none());
        assert!(store.create_quiz(quiz("quiz")).await.is_err());
    }

    #[tokio::test]
    async fn questions_follow_position() {
        let store = MemoryStore::new();
        store.add_quiz_question(question("second", 1)).await.unwrap();
        store.add_quiz_question(question("first", 0)).await.unwrap();

        let ids: Vec<String> = store
            .list_quiz_questions("quiz")
            .await
            .unwrap()
            .into_iter()
            .map(|q| q.id)
            .collect();
        assert_eq!(ids, vec!["first", "second"]);
    }

    #[tokio::test]
    async fn attempts_rank_by_score_and_filter_by_wallet() {
        let store = MemoryStore::new();
        store.create_attempt(attempt("a1", "alice", 1.0)).await.unwrap();
        store.create_attempt(attempt("a2", "bob", 2.0)).await.unwrap();
        store.create_attempt(attempt("a3", "alice", 0.5)).await.unwrap();

        let all = store.list_attempts("quiz", None).await.unwrap();
        let ids: Vec<&str> = all.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["a2", "a1", "a3"]);

        let alice = store.list_attempts("quiz", Some("alice")).await.unwrap();
        assert_eq!(alice.len(), 2);

        let mut updated = attempt("a1", "alice", 2.0);
        updated.status = AttemptStatus::Graded;
        store.update_attempt(updated).await.unwrap();
        let fetched = store.get_attempt("a1").await.unwrap().unwrap();
        assert_eq!(fetched.status, AttemptStatus::Graded);

        assert!(store.update_attempt(attempt("nope", "x", 0.0)).await.is_err());
    }

    #[tokio::test]
    async fn answers_list_oldest_first_and_update_in_place() {
        let store = MemoryStore::new();
        store.insert_quiz_response(answer("r2", "a1", 5)).await.unwrap();
        store.insert_quiz_response(answer("r1", "a1", 0)).await.unwrap();
        store.insert_quiz_response(answer("r3", "a2", 0)).await.unwrap();

        let ids: Vec<String> = store
            .list_quiz_responses("a1")
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec!["r1", "r2"]);

        let mut graded = answer("r2", "a1", 5);
        graded.points_awarded = 1.0;
        graded.is_graded = true;
        store.update_quiz_response(graded).await.unwrap();
        let fetched = store.get_quiz_response("r2").await.unwrap().unwrap();
        assert!(fetched.is_graded);
    }

    #[tokio::test]
    async fn whitelist_removal_deactivates_entries() {
        let store = MemoryStore::new();
        store.add_to_whitelist(entry("alice", 0)).await.unwrap();
        store.add_to_whitelist(entry("bob", 5)).await.unwrap();

        let listed = store.list_whitelist("quiz").await.unwrap();
        assert_eq!(listed[0].wallet_address, "bob");

        assert!(store.remove_from_whitelist("quiz", "alice").await.unwrap());
        assert!(!store.remove_from_whitelist("quiz", "alice").await.unwrap());
        assert!(store.get_whitelist_entry("quiz", "alice").await.unwrap().is_none());
        assert_eq!(store.list_whitelist("quiz").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn deleting_a_quiz_removes_its_rows() {
        let store = MemoryStore::new();
        store.create_quiz(quiz("quiz")).await.unwrap();
        store.add_quiz_question(question("q1", 0)).await.unwrap();
        store.create_attempt(attempt("a1", "alice", 1.0)).await.unwrap();
        store.insert_quiz_response(answer("r1", "a1", 0)).await.unwrap();
        store.add_to_whitelist(entry("alice", 0)).await.unwrap();
        store.create_special_survey(special_survey("sp1", 0)).await.unwrap();

        assert!(store.delete_quiz("quiz").await.unwrap());
        assert!(!store.delete_quiz("quiz").await.unwrap());
        assert!(store.list_quiz_questions("quiz").await.unwrap().is_empty());
        assert!(store.get_attempt("a1").await.unwrap().is_none());
        assert!(store.get_quiz_response("r1").await.unwrap().is_none());
        assert!(store.list_whitelist("quiz").await.unwrap().is_empty());
        assert!(store.get_special_survey("sp1").await.unwrap().is_none());
    }
}
