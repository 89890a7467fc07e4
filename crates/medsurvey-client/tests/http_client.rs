//! Exercises `ApiClient` against an in-process axum stub of the backend.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use medsurvey_client::{ApiClient, ClientError};
use medsurvey_core::models::appointment::{Appointment, NewAppointment, Recurrence};
use medsurvey_core::models::attempt::{
    AnswerEntry, Attempt, AttemptReceipt, SubmissionBatch, SurveyProgress,
};
use medsurvey_core::models::question::{NewQuestion, Question, QuestionType};
use medsurvey_core::models::survey::{AssignedSurvey, Survey};
use medsurvey_core::models::user::{AuthSession, Credentials, Role, UserProfile};
use medsurvey_session::{ProviderError, SessionController, SessionError, SessionStatus};
use serde_json::{Value, json};
use uuid::Uuid;

const TOKEN: &str = "test-token";
const RESET_CODE: &str = "123456";

#[derive(Clone)]
struct Stub {
    survey_id: Uuid,
    user_id: Uuid,
    questions: Vec<Question>,
    progress: Option<SurveyProgress>,
    fail_submit: bool,
    garbled_questions: bool,
    attempt_id: Uuid,
    care_team_doctor: Uuid,
    submissions: Arc<Mutex<Vec<SubmissionBatch>>>,
    reset_emails: Arc<Mutex<Vec<String>>>,
    question_posts: Arc<AtomicUsize>,
    appointments: Arc<Mutex<Vec<Appointment>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl Stub {
    fn new(prompts: &[&str]) -> Self {
        let survey_id = Uuid::new_v4();
        let questions = prompts
            .iter()
            .enumerate()
            .map(|(i, prompt)| Question {
                id: Uuid::new_v4(),
                survey_id,
                prompt: prompt.to_string(),
                question_type: QuestionType::FreeText,
                options: Vec::new(),
                position: i as u32,
            })
            .collect();
        Self {
            survey_id,
            user_id: Uuid::new_v4(),
            questions,
            progress: None,
            fail_submit: false,
            garbled_questions: false,
            attempt_id: Uuid::new_v4(),
            care_team_doctor: Uuid::new_v4(),
            submissions: Arc::default(),
            reset_emails: Arc::default(),
            question_posts: Arc::default(),
            appointments: Arc::default(),
            calls: Arc::default(),
        }
    }

    fn attempt(&self) -> Attempt {
        Attempt {
            id: self.attempt_id,
            survey_id: self.survey_id,
            patient_id: self.user_id,
            submitted_at: jiff::Timestamp::UNIX_EPOCH,
            answers: self
                .questions
                .iter()
                .take(1)
                .map(|q| AnswerEntry {
                    question_id: q.id,
                    answer: "tired".to_string(),
                })
                .collect(),
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {TOKEN}"))
}

fn survey(id: Uuid, title: &str) -> Survey {
    Survey {
        id,
        title: title.to_string(),
        description: String::new(),
        doctor_id: Uuid::new_v4(),
        created_at: jiff::Timestamp::UNIX_EPOCH,
        updated_at: jiff::Timestamp::UNIX_EPOCH,
    }
}

async fn login(State(stub): State<Stub>, Json(creds): Json<Credentials>) -> Response {
    if creds.password != "secret" {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "error": "bad credentials" })))
            .into_response();
    }
    Json(AuthSession {
        token: TOKEN.to_string(),
        user_id: stub.user_id,
        role: Role::Patient,
    })
    .into_response()
}

async fn me(State(stub): State<Stub>, headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    Json(UserProfile {
        id: stub.user_id,
        email: "pat@example.com".to_string(),
        first_name: "Pat".to_string(),
        last_name: "Doe".to_string(),
        role: Role::Patient,
    })
    .into_response()
}

async fn questions(
    State(stub): State<Stub>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    if id != stub.survey_id {
        return StatusCode::NOT_FOUND.into_response();
    }
    if stub.garbled_questions {
        return (StatusCode::OK, "not json").into_response();
    }
    Json(stub.questions.clone()).into_response()
}

async fn add_question(
    State(stub): State<Stub>,
    Path(id): Path<Uuid>,
    Json(question): Json<NewQuestion>,
) -> Response {
    stub.question_posts.fetch_add(1, Ordering::SeqCst);
    Json(Question {
        id: Uuid::new_v4(),
        survey_id: id,
        prompt: question.prompt,
        question_type: question.question_type,
        options: question.options,
        position: 0,
    })
    .into_response()
}

async fn progress(State(stub): State<Stub>, Path(id): Path<Uuid>) -> Response {
    match &stub.progress {
        Some(p) if p.survey_id == id => Json(p.clone()).into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn attempts(
    State(stub): State<Stub>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
    Json(batch): Json<SubmissionBatch>,
) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    if stub.fail_submit {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "database unavailable" })),
        )
            .into_response();
    }
    assert_eq!(batch.survey_id, id);
    stub.submissions.lock().unwrap().push(batch);
    Json(AttemptReceipt {
        attempt_id: Uuid::new_v4(),
    })
    .into_response()
}

async fn list_attempts(State(stub): State<Stub>, Path(id): Path<Uuid>) -> Response {
    if id != stub.survey_id {
        return StatusCode::NOT_FOUND.into_response();
    }
    Json(vec![stub.attempt()]).into_response()
}

async fn get_attempt(State(stub): State<Stub>, Path(id): Path<Uuid>) -> Response {
    if id != stub.attempt_id {
        return StatusCode::NOT_FOUND.into_response();
    }
    Json(stub.attempt()).into_response()
}

async fn create_appointment(
    State(stub): State<Stub>,
    Json(new): Json<NewAppointment>,
) -> Json<Appointment> {
    let created = Appointment {
        id: Uuid::new_v4(),
        survey_id: new.survey_id,
        patient_id: new.patient_id,
        doctor_id: stub.user_id,
        starts_on: new.starts_on,
        recurrence: new.recurrence,
        occurrences: new.occurrences,
        created_at: jiff::Timestamp::UNIX_EPOCH,
    };
    stub.appointments.lock().unwrap().push(created.clone());
    Json(created)
}

async fn list_appointments(State(stub): State<Stub>) -> Json<Vec<Appointment>> {
    Json(stub.appointments.lock().unwrap().clone())
}

async fn deleted(State(stub): State<Stub>, uri: Uri) -> StatusCode {
    stub.calls.lock().unwrap().push(format!("DELETE {}", uri.path()));
    StatusCode::NO_CONTENT
}

async fn add_doctor(State(stub): State<Stub>, Path(id): Path<Uuid>, body: Bytes) -> StatusCode {
    stub.calls
        .lock()
        .unwrap()
        .push(format!("ADD {id} body={}", body.len()));
    StatusCode::CREATED
}

async fn remove_doctor(State(stub): State<Stub>, Path(id): Path<Uuid>, uri: Uri) -> StatusCode {
    if id != stub.care_team_doctor {
        return StatusCode::NOT_FOUND;
    }
    deleted(State(stub), uri).await
}

async fn assigned(State(stub): State<Stub>) -> Json<Vec<AssignedSurvey>> {
    let entry = |title: &str, due_on| AssignedSurvey {
        survey: survey(Uuid::new_v4(), title),
        appointment_id: None,
        due_on,
        answered_count: 0,
        question_count: stub.questions.len() as u32,
    };
    Json(vec![
        entry("undated", None),
        entry("later", Some(jiff::civil::date(2024, 5, 2))),
        entry("sooner", Some(jiff::civil::date(2024, 5, 1))),
    ])
}

async fn forgot(State(stub): State<Stub>, Json(body): Json<Value>) -> StatusCode {
    stub.reset_emails
        .lock()
        .unwrap()
        .push(body["email"].as_str().unwrap_or_default().to_string());
    StatusCode::NO_CONTENT
}

async fn verify(State(stub): State<Stub>, Json(body): Json<Value>) -> Response {
    stub.reset_emails
        .lock()
        .unwrap()
        .push(body["email"].as_str().unwrap_or_default().to_string());
    if body["code"] != RESET_CODE {
        return (StatusCode::BAD_REQUEST, Json(json!({ "message": "invalid code" })))
            .into_response();
    }
    StatusCode::OK.into_response()
}

async fn reset(State(stub): State<Stub>, Json(body): Json<Value>) -> StatusCode {
    assert_eq!(body["code"], RESET_CODE);
    stub.reset_emails
        .lock()
        .unwrap()
        .push(body["email"].as_str().unwrap_or_default().to_string());
    StatusCode::NO_CONTENT
}

async fn spawn(stub: Stub) -> String {
    let app = Router::new()
        .route("/auth/login", post(login))
        .route("/auth/password/forgot", post(forgot))
        .route("/auth/password/verify", post(verify))
        .route("/auth/password/reset", post(reset))
        .route("/me", get(me))
        .route("/surveys/{id}/questions", get(questions).post(add_question))
        .route("/surveys/{id}/progress", get(progress))
        .route("/surveys/{id}/attempts", get(list_attempts).post(attempts))
        .route("/surveys/{id}", delete(deleted))
        .route("/questions/{id}", delete(deleted))
        .route("/attempts/{id}", get(get_attempt))
        .route("/appointments", get(list_appointments).post(create_appointment))
        .route("/appointments/{id}", delete(deleted))
        .route("/patients/me/surveys", get(assigned))
        .route("/patients/me/doctors/{id}", post(add_doctor).delete(remove_doctor))
        .with_state(stub);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

async fn signed_in(base_url: &str) -> ApiClient {
    let mut client = ApiClient::new(base_url, 5).unwrap();
    client.login("pat@example.com", "secret").await.unwrap();
    client
}

#[tokio::test]
async fn takes_and_submits_a_survey_over_http() {
    let stub = Stub::new(&["Sleep quality?", "Pain level?"]);
    let (survey_id, q1, q2) = (stub.survey_id, stub.questions[0].id, stub.questions[1].id);
    let submissions = stub.submissions.clone();
    let client = signed_in(&spawn(stub).await).await;

    let mut session = SessionController::open(&client, survey_id).await.unwrap();
    session.on_answer_entered("poor");
    assert!(session.on_next());
    session.on_answer_entered("  ");
    assert!(session.can_submit());

    let receipt = session.on_submit(&client).await.unwrap();
    assert_eq!(
        session.status(),
        SessionStatus::Submitted {
            attempt_id: receipt.attempt_id
        }
    );

    let submitted = submissions.lock().unwrap().clone();
    assert_eq!(submitted.len(), 1);
    assert_eq!(submitted[0].answer_for(q1), Some("poor"));
    assert_eq!(submitted[0].answer_for(q2), None);
}

#[tokio::test]
async fn resumes_from_server_progress() {
    let mut stub = Stub::new(&["Q1", "Q2"]);
    stub.progress = Some(SurveyProgress {
        survey_id: stub.survey_id,
        answers: vec![AnswerEntry {
            question_id: stub.questions[0].id,
            answer: "saved".to_string(),
        }],
    });
    let survey_id = stub.survey_id;
    let client = signed_in(&spawn(stub).await).await;

    let session = SessionController::open(&client, survey_id).await.unwrap();
    assert_eq!(session.current_answer(), Some("saved"));
}

#[tokio::test]
async fn missing_progress_is_a_fresh_start() {
    let stub = Stub::new(&["Q1"]);
    let survey_id = stub.survey_id;
    let client = signed_in(&spawn(stub).await).await;

    let session = SessionController::open(&client, survey_id).await.unwrap();
    assert!(session.answers().is_empty());
}

#[tokio::test]
async fn server_failure_is_forwarded_and_session_stays_open() {
    let mut stub = Stub::new(&["Only"]);
    stub.fail_submit = true;
    let survey_id = stub.survey_id;
    let client = signed_in(&spawn(stub).await).await;

    let mut session = SessionController::open(&client, survey_id).await.unwrap();
    session.on_answer_entered("fine");
    let err = session.on_submit(&client).await.unwrap_err();

    match &err {
        SessionError::Provider(ProviderError::Server { status, message }) => {
            assert_eq!(*status, 500);
            assert_eq!(message, "database unavailable");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.user_message(), "database unavailable");
    assert_eq!(session.status(), SessionStatus::Open);
}

#[tokio::test]
async fn unknown_survey_maps_to_not_found() {
    let stub = Stub::new(&["Q1"]);
    let client = signed_in(&spawn(stub).await).await;

    let err = SessionController::open(&client, Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        SessionError::Provider(ProviderError::Server { status: 404, .. })
    ));
}

#[tokio::test]
async fn requests_without_token_are_unauthorized() {
    let base_url = spawn(Stub::new(&["Q1"])).await;
    let client = ApiClient::new(&base_url, 5).unwrap();
    assert!(matches!(client.me().await, Err(ClientError::Unauthorized)));

    let mut client = client;
    assert!(matches!(
        client.login("pat@example.com", "wrong").await,
        Err(ClientError::Unauthorized)
    ));
    assert!(client.session().is_none());

    let session = client.login("pat@example.com", "secret").await.unwrap();
    assert_eq!(session.token, TOKEN);
    let profile = client.me().await.unwrap();
    assert_eq!(profile.display_name(), "Pat Doe");
}

#[tokio::test]
async fn password_reset_carries_email_between_steps() {
    let stub = Stub::new(&[]);
    let emails = stub.reset_emails.clone();
    let client = ApiClient::new(&spawn(stub).await, 5).unwrap();

    let ticket = client.forgot_password("pat@example.com").await.unwrap();
    assert_eq!(ticket.email(), "pat@example.com");

    let err = client.verify_reset_code(&ticket, "000000").await.unwrap_err();
    assert!(matches!(
        err,
        ClientError::Server { status: 400, ref message } if message == "invalid code"
    ));

    let verified = client.verify_reset_code(&ticket, " 123456 ").await.unwrap();
    client.reset_password(verified, "n3w-pass").await.unwrap();

    let seen = emails.lock().unwrap().clone();
    assert_eq!(seen.len(), 4);
    assert!(seen.iter().all(|e| e == "pat@example.com"));
}

#[tokio::test]
async fn invalid_question_is_rejected_before_sending() {
    let stub = Stub::new(&[]);
    let (survey_id, posts) = (stub.survey_id, stub.question_posts.clone());
    let client = signed_in(&spawn(stub).await).await;

    let invalid = NewQuestion {
        prompt: "Pick one".to_string(),
        question_type: QuestionType::OptionSelection,
        options: vec!["Only option".to_string()],
    };
    assert!(matches!(
        client.add_question(survey_id, &invalid).await,
        Err(ClientError::Invalid(_))
    ));
    assert_eq!(posts.load(Ordering::SeqCst), 0);

    let valid = NewQuestion {
        options: vec!["Yes".to_string(), "No".to_string()],
        ..invalid
    };
    let created = client.add_question(survey_id, &valid).await.unwrap();
    assert_eq!(created.survey_id, survey_id);
    assert_eq!(posts.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn assigned_surveys_sorted_by_due_date() {
    let client = signed_in(&spawn(Stub::new(&["Q1"])).await).await;
    let titles: Vec<String> = client
        .assigned_surveys()
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.survey.title)
        .collect();
    assert_eq!(titles, vec!["sooner", "later", "undated"]);
}

#[tokio::test]
async fn unreachable_server_is_a_network_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = ApiClient::new(&format!("http://{addr}"), 5).unwrap();
    let err = client.list_doctors().await.unwrap_err();
    assert!(matches!(err, ClientError::Network(_)));
    assert!(matches!(
        ProviderError::from(err),
        ProviderError::Network(_)
    ));
}

#[tokio::test]
async fn garbled_body_is_a_server_problem_not_a_network_one() {
    let mut stub = Stub::new(&["Q1"]);
    stub.garbled_questions = true;
    let survey_id = stub.survey_id;
    let client = signed_in(&spawn(stub).await).await;

    assert!(matches!(
        client.list_questions(survey_id).await,
        Err(ClientError::Decode { status: 200, .. })
    ));

    let err = SessionController::open(&client, survey_id)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        SessionError::Provider(ProviderError::Server { status: 200, .. })
    ));
    assert!(!err.user_message().starts_with("Could not reach the server"));
}

#[tokio::test]
async fn deletes_hit_their_resources() {
    let stub = Stub::new(&[]);
    let recorder = stub.clone();
    let doctor_id = stub.care_team_doctor;
    let client = signed_in(&spawn(stub).await).await;

    let (survey_id, question_id, appointment_id) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
    client.delete_survey(survey_id).await.unwrap();
    client.delete_question(question_id).await.unwrap();
    client.cancel_appointment(appointment_id).await.unwrap();
    client.remove_doctor(doctor_id).await.unwrap();

    assert_eq!(
        recorder.calls(),
        vec![
            format!("DELETE /surveys/{survey_id}"),
            format!("DELETE /questions/{question_id}"),
            format!("DELETE /appointments/{appointment_id}"),
            format!("DELETE /patients/me/doctors/{doctor_id}"),
        ]
    );

    assert!(matches!(
        client.remove_doctor(Uuid::new_v4()).await,
        Err(ClientError::NotFound(_))
    ));
}

#[tokio::test]
async fn add_doctor_posts_an_empty_body() {
    let stub = Stub::new(&[]);
    let recorder = stub.clone();
    let client = signed_in(&spawn(stub).await).await;

    let doctor_id = Uuid::new_v4();
    client.add_doctor(doctor_id).await.unwrap();
    assert_eq!(recorder.calls(), vec![format!("ADD {doctor_id} body=0")]);
}

#[tokio::test]
async fn invalid_appointment_is_rejected_before_sending() {
    let stub = Stub::new(&[]);
    let stored = stub.appointments.clone();
    let client = signed_in(&spawn(stub).await).await;

    let invalid = NewAppointment {
        survey_id: Uuid::new_v4(),
        patient_id: Uuid::new_v4(),
        starts_on: jiff::civil::date(2024, 5, 1),
        recurrence: Recurrence::Once,
        occurrences: 2,
    };
    assert!(matches!(
        client.schedule_appointment(&invalid).await,
        Err(ClientError::Invalid(_))
    ));
    assert!(stored.lock().unwrap().is_empty());

    let weekly = NewAppointment {
        recurrence: Recurrence::Weekly,
        occurrences: 3,
        ..invalid
    };
    let created = client.schedule_appointment(&weekly).await.unwrap();
    assert_eq!(
        created.due_dates(),
        vec![
            jiff::civil::date(2024, 5, 1),
            jiff::civil::date(2024, 5, 8),
            jiff::civil::date(2024, 5, 15),
        ]
    );

    let listed = client.list_appointments().await.unwrap();
    assert_eq!(listed, vec![created]);
}

#[tokio::test]
async fn attempts_can_be_listed_and_fetched() {
    let stub = Stub::new(&["How did you sleep?"]);
    let (survey_id, attempt_id, question_id) = (stub.survey_id, stub.attempt_id, stub.questions[0].id);
    let client = signed_in(&spawn(stub).await).await;

    let attempts = client.list_attempts(survey_id).await.unwrap();
    assert_eq!(attempts.len(), 1);
    assert_eq!(attempts[0].id, attempt_id);

    let attempt = client.get_attempt(attempt_id).await.unwrap();
    assert_eq!(attempt, attempts[0]);
    assert_eq!(attempt.answers[0].question_id, question_id);

    assert!(matches!(
        client.get_attempt(Uuid::new_v4()).await,
        Err(ClientError::NotFound(_))
    ));
}
