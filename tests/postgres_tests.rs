// tests/postgres_tests.rs

//! `PgStore` against a live Postgres. Runs only when `DATABASE_URL` is set.

use intelliq_api::{
    models::{answer::NewAnswer, questionnaire::Questionnaire},
    store::{AnswerStore, QuestionnaireStore, postgres::PgStore},
};
use serde_json::json;
use sqlx::postgres::PgPoolOptions;
use tokio::sync::{Mutex, MutexGuard};

// The reset tests wipe whole tables, so tests in this file take turns.
static DB_LOCK: Mutex<()> = Mutex::const_new(());

/// Connects, migrates and returns the store, or `None` without a database.
async fn connect() -> Option<(PgStore, MutexGuard<'static, ()>)> {
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set, skipping Postgres test");
        return None;
    };
    let guard = DB_LOCK.lock().await;

    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&database_url)
        .await
        .expect("Failed to connect to Postgres for testing. Make sure DATABASE_URL is set.");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to migrate database");

    Some((PgStore::new(pool), guard))
}

fn unique_id(prefix: &str) -> String {
    format!("{}-{}", prefix, uuid::Uuid::new_v4().simple())
}

/// Q01 branches to Q02 or Q03; both lead to Q04. Q05 is unreachable.
fn questionnaire(id: &str, title: &str) -> Questionnaire {
    serde_json::from_value(json!({
        "questionnaireID": id,
        "questionnaireTitle": title,
        "keywords": ["postgres"],
        "questions": [
            {
                "qID": "Q01", "qtext": "Start?", "required": "TRUE", "type": "question",
                "options": [
                    { "optID": "Q01A1", "opttxt": "Left", "nextqID": "Q02" },
                    { "optID": "Q01A2", "opttxt": "Right", "nextqID": "Q03" }
                ]
            },
            {
                "qID": "Q03", "qtext": "Right?", "required": "FALSE", "type": "question",
                "options": [{ "optID": "Q03A1", "opttxt": "Yes", "nextqID": "Q04" }]
            },
            {
                "qID": "Q02", "qtext": "Left?", "required": "FALSE", "type": "question",
                "options": [{ "optID": "Q02A1", "opttxt": "Yes", "nextqID": "Q04" }]
            },
            {
                "qID": "Q04", "qtext": "End?", "required": "FALSE", "type": "question",
                "options": [{ "optID": "Q04A1", "opttxt": "Yes", "nextqID": "-" }]
            },
            {
                "qID": "Q05", "qtext": "Orphan?", "required": "FALSE", "type": "question",
                "options": [{ "optID": "Q05A1", "opttxt": "Yes", "nextqID": "-" }]
            }
        ]
    }))
    .expect("Invalid test questionnaire")
}

fn new_answer(questionnaire_id: &str, question_id: &str, option_id: &str, session: &str) -> NewAnswer {
    NewAnswer {
        questionnaire_id: questionnaire_id.to_string(),
        question_id: question_id.to_string(),
        option_id: option_id.to_string(),
        session: session.to_string(),
    }
}

#[tokio::test]
async fn latest_import_shadows_earlier_ones() {
    let Some((store, _guard)) = connect().await else {
        return;
    };
    let id = unique_id("QQ");

    let count = store
        .insert_questionnaires(vec![
            questionnaire(&id, "First import"),
            questionnaire(&id, "Second import"),
        ])
        .await
        .unwrap();
    assert_eq!(count, 2);

    let found = store.find_questionnaire(&id).await.unwrap().unwrap();
    assert_eq!(found.title, "Second import");
    assert_eq!(found.keywords, ["postgres"]);
    assert!(found.questions[0].required);
    assert!(!found.questions[1].required);

    store
        .insert_questionnaires(vec![questionnaire(&id, "Third import")])
        .await
        .unwrap();
    let found = store.find_questionnaire(&id).await.unwrap().unwrap();
    assert_eq!(found.title, "Third import");

    assert!(store.find_questionnaire(&unique_id("QQ")).await.unwrap().is_none());
}

#[tokio::test]
async fn predecessors_come_in_questionnaire_order() {
    let Some((store, _guard)) = connect().await else {
        return;
    };
    let id = unique_id("QQ");
    store
        .insert_questionnaires(vec![questionnaire(&id, "Graph")])
        .await
        .unwrap();

    let ids = |questions: Vec<intelliq_api::models::questionnaire::Question>| {
        questions.into_iter().map(|q| q.id).collect::<Vec<_>>()
    };

    // Q03 is listed before Q02 in the document.
    assert_eq!(ids(store.find_predecessors(&id, "Q04").await.unwrap()), ["Q03", "Q02"]);
    assert_eq!(ids(store.find_predecessors(&id, "Q02").await.unwrap()), ["Q01"]);
    assert!(store.find_predecessors(&id, "Q05").await.unwrap().is_empty());
    assert!(store.find_predecessors(&id, "Q01").await.unwrap().is_empty());
    assert!(
        store
            .find_predecessors(&unique_id("QQ"), "Q04")
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn answers_round_trip_in_insertion_order() {
    let Some((store, _guard)) = connect().await else {
        return;
    };
    let id = unique_id("QQ");
    let session = unique_id("S");

    let first = store
        .insert_answer(new_answer(&id, "Q01", "Q01A2", &session))
        .await
        .unwrap();
    assert_eq!(first.questionnaire_id, id);
    assert_eq!(first.question_id, "Q01");
    assert_eq!(first.option_id, "Q01A2");
    assert_eq!(first.session, session);

    store
        .insert_answer(new_answer(&id, "Q03", "Q03A1", &session))
        .await
        .unwrap();
    store
        .insert_answer(new_answer(&id, "Q01", "Q01A1", "OTHER"))
        .await
        .unwrap();
    let last = store
        .insert_answer(new_answer(&id, "Q01", "Q01A1", &session))
        .await
        .unwrap();
    assert!(last.id > first.id);

    let path: Vec<_> = store
        .find_answers(&id, &session)
        .await
        .unwrap()
        .into_iter()
        .map(|a| (a.question_id, a.option_id))
        .collect();
    assert_eq!(
        path,
        [
            ("Q01".to_string(), "Q01A2".to_string()),
            ("Q03".to_string(), "Q03A1".to_string()),
            ("Q01".to_string(), "Q01A1".to_string()),
        ]
    );

    let q01: Vec<_> = store
        .find_question_answers(&id, "Q01")
        .await
        .unwrap()
        .into_iter()
        .map(|a| a.session)
        .collect();
    assert_eq!(q01, [session.clone(), "OTHER".to_string(), session.clone()]);

    let all = store.find_questionnaire_answers(&id).await.unwrap();
    assert_eq!(all.len(), 4);
    assert!(all.windows(2).all(|w| w[0].id < w[1].id));
}

#[tokio::test]
async fn resets_delete_answers_and_questionnaires() {
    let Some((store, _guard)) = connect().await else {
        return;
    };
    let (kept, reset) = (unique_id("QQ"), unique_id("QQ"));
    store
        .insert_questionnaires(vec![questionnaire(&kept, "Kept"), questionnaire(&reset, "Reset")])
        .await
        .unwrap();
    store
        .insert_answer(new_answer(&kept, "Q01", "Q01A1", "AAAA"))
        .await
        .unwrap();
    store
        .insert_answer(new_answer(&reset, "Q01", "Q01A1", "AAAA"))
        .await
        .unwrap();
    store
        .insert_answer(new_answer(&reset, "Q01", "Q01A2", "BBBB"))
        .await
        .unwrap();

    assert_eq!(store.delete_answers(&reset).await.unwrap(), 2);
    assert!(store.find_questionnaire_answers(&reset).await.unwrap().is_empty());
    assert_eq!(store.find_questionnaire_answers(&kept).await.unwrap().len(), 1);
    assert!(store.find_questionnaire(&reset).await.unwrap().is_some());

    assert!(store.delete_all_answers().await.unwrap() >= 1);
    assert!(store.delete_all_questionnaires().await.unwrap() >= 2);
    assert!(store.find_questionnaire_answers(&kept).await.unwrap().is_empty());
    assert!(store.find_questionnaire(&kept).await.unwrap().is_none());

    store.ping().await.unwrap();
}
