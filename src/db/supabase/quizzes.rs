use futures::future::BoxFuture;
use serde_json::json;

use super::{eq, one_of, SupabaseStore};
use crate::db::store::{QuizStore, StoreResult};
use crate::models::quiz_models::{
    Quiz, QuizAttempt, QuizQuestion, QuizResponse, SpecialSurvey, WhitelistEntry,
};

const QUIZZES: &str = "quizzes";
const QUESTIONS: &str = "quiz_questions";
const ATTEMPTS: &str = "quiz_attempts";
const ANSWERS: &str = "quiz_responses";
const WHITELIST: &str = "whitelist";
const SPECIAL_SURVEYS: &str = "special_surveys";

fn active() -> String {
    eq("true")
}

impl QuizStore for SupabaseStore {
    fn create_quiz(&self, quiz: Quiz) -> BoxFuture<'_, StoreResult<Quiz>> {
        Box::pin(async move { self.insert(QUIZZES, &quiz).await })
    }

    fn get_quiz<'a>(&'a self, id: &'a str) -> BoxFuture<'a, StoreResult<Option<Quiz>>> {
        Box::pin(async move {
            self.select_one(QUIZZES, &[("id", eq(id)), ("is_active", active())])
                .await
        })
    }

    fn delete_quiz<'a>(&'a self, id: &'a str) -> BoxFuture<'a, StoreResult<bool>> {
        Box::pin(async move {
            let attempts: Vec<QuizAttempt> = self.select(ATTEMPTS, &[("quiz_id", eq(id))]).await?;
            if !attempts.is_empty() {
                let attempt_ids: Vec<String> = attempts.into_iter().map(|a| a.id).collect();
                self.delete_where(ANSWERS, &[("attempt_id", one_of(&attempt_ids))])
                    .await?;
            }

            for table in [ATTEMPTS, QUESTIONS, WHITELIST, SPECIAL_SURVEYS] {
                self.delete_where(table, &[("quiz_id", eq(id))]).await?;
            }

            Ok(self.delete_where(QUIZZES, &[("id", eq(id))]).await? > 0)
        })
    }

    fn add_quiz_question(&self, question: QuizQuestion) -> BoxFuture<'_, StoreResult<QuizQuestion>> {
        Box::pin(async move { self.insert(QUESTIONS, &question).await })
    }

    fn list_quiz_questions<'a>(
        &'a self,
        quiz_id: &'a str,
    ) -> BoxFuture<'a, StoreResult<Vec<QuizQuestion>>> {
        Box::pin(async move {
            self.select(
                QUESTIONS,
                &[("quiz_id", eq(quiz_id)), ("order", "position.asc".to_string())],
            )
            .await
        })
    }

    fn create_attempt(&self, attempt: QuizAttempt) -> BoxFuture<'_, StoreResult<QuizAttempt>> {
        Box::pin(async move { self.insert(ATTEMPTS, &attempt).await })
    }

    fn get_attempt<'a>(&'a self, id: &'a str) -> BoxFuture<'a, StoreResult<Option<QuizAttempt>>> {
        Box::pin(async move { self.select_one(ATTEMPTS, &[("id", eq(id))]).await })
    }

    fn list_attempts<'a>(
        &'a self,
        quiz_id: &'a str,
        participant_wallet: Option<&'a str>,
    ) -> BoxFuture<'a, StoreResult<Vec<QuizAttempt>>> {
        Box::pin(async move {
            let mut query = vec![
                ("quiz_id", eq(quiz_id)),
                ("order", "total_score.desc".to_string()),
            ];
            if let Some(wallet) = participant_wallet {
                query.push(("participant_wallet", eq(wallet)));
            }

            self.select(ATTEMPTS, &query).await
        })
    }

    fn update_attempt(&self, attempt: QuizAttempt) -> BoxFuture<'_, StoreResult<QuizAttempt>> {
        Box::pin(async move { self.replace(ATTEMPTS, &attempt.id, &attempt).await })
    }

    fn insert_quiz_response(
        &self,
        response: QuizResponse,
    ) -> BoxFuture<'_, StoreResult<QuizResponse>> {
        Box::pin(async move { self.insert(ANSWERS, &response).await })
    }

    fn get_quiz_response<'a>(
        &'a self,
        id: &'a str,
    ) -> BoxFuture<'a, StoreResult<Option<QuizResponse>>> {
        Box::pin(async move { self.select_one(ANSWERS, &[("id", eq(id))]).await })
    }

    fn list_quiz_responses<'a>(
        &'a self,
        attempt_id: &'a str,
    ) -> BoxFuture<'a, StoreResult<Vec<QuizResponse>>> {
        Box::pin(async move {
            self.select(
                ANSWERS,
                &[
                    ("attempt_id", eq(attempt_id)),
                    ("order", "created_at.asc".to_string()),
                ],
            )
            .await
        })
    }

    fn update_quiz_response(
        &self,
        response: QuizResponse,
    ) -> BoxFuture<'_, StoreResult<QuizResponse>> {
        Box::pin(async move { self.replace(ANSWERS, &response.id, &response).await })
    }

    fn get_whitelist_entry<'a>(
        &'a self,
        quiz_id: &'a str,
        wallet_address: &'a str,
    ) -> BoxFuture<'a, StoreResult<Option<WhitelistEntry>>> {
        Box::pin(async move {
            self.select_one(
                WHITELIST,
                &[
                    ("quiz_id", eq(quiz_id)),
                    ("wallet_address", eq(wallet_address)),
                    ("is_active", active()),
                ],
            )
            .await
        })
    }

    fn list_whitelist<'a>(
        &'a self,
        quiz_id: &'a str,
    ) -> BoxFuture<'a, StoreResult<Vec<WhitelistEntry>>> {
        Box::pin(async move {
            self.select(
                WHITELIST,
                &[
                    ("quiz_id", eq(quiz_id)),
                    ("is_active", active()),
                    ("order", "whitelisted_at.desc".to_string()),
                ],
            )
            .await
        })
    }

    fn add_to_whitelist(&self, entry: WhitelistEntry) -> BoxFuture<'_, StoreResult<WhitelistEntry>> {
        Box::pin(async move { self.insert(WHITELIST, &entry).await })
    }

    fn remove_from_whitelist<'a>(
        &'a self,
        quiz_id: &'a str,
        wallet_address: &'a str,
    ) -> BoxFuture<'a, StoreResult<bool>> {
        Box::pin(async move {
            let deactivated: Vec<WhitelistEntry> = self
                .update(
                    WHITELIST,
                    &[
                        ("quiz_id", eq(quiz_id)),
                        ("wallet_address", eq(wallet_address)),
                        ("is_active", active()),
                    ],
                    &json!({ "is_active": false }),
                )
                .await?;
            Ok(!deactivated.is_empty())
        })
    }

    fn create_special_survey(
        &self,
        survey: SpecialSurvey,
    ) -> BoxFuture<'_, StoreResult<SpecialSurvey>> {
        Box::pin(async move { self.insert(SPECIAL_SURVEYS, &survey).await })
    }

    fn get_special_survey<'a>(
        &'a self,
        id: &'a str,
    ) -> BoxFuture<'a, StoreResult<Option<SpecialSurvey>>> {
        Box::pin(async move { self.select_one(SPECIAL_SURVEYS, &[("id", eq(id))]).await })
    }

    fn list_special_surveys<'a>(
        &'a self,
        quiz_id: &'a str,
    ) -> BoxFuture<'a, StoreResult<Vec<SpecialSurvey>>> {
        Box::pin(async move {
            self.select(
                SPECIAL_SURVEYS,
                &[
                    ("quiz_id", eq(quiz_id)),
                    ("is_active", active()),
                    ("order", "created_at.desc".to_string()),
                ],
            )
            .await
        })
    }
}
