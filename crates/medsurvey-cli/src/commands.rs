use std::collections::HashMap;

use eyre::{Result, WrapErr};
use medsurvey_client::{ApiClient, ClientError};
use medsurvey_core::models::appointment::NewAppointment;
use medsurvey_core::models::question::NewQuestion;
use medsurvey_core::models::survey::NewSurvey;
use medsurvey_core::models::user::{DoctorSummary, Role};
use uuid::Uuid;

use crate::config::{self, CliConfig, StoredSession};
use crate::{AppointmentAction, AuthorAction, Command, DoctorAction, prompt, take};

fn build_client(config: &CliConfig, api_override: Option<&str>) -> Result<ApiClient> {
    let url = api_override.unwrap_or(&config.api_url);
    let client = ApiClient::new(url, config.timeout_secs)?;
    Ok(match &config.session {
        Some(stored) => client.with_session(stored.auth.clone()),
        None => client,
    })
}

fn signed_in_role(config: &CliConfig) -> Result<Role> {
    config
        .session
        .as_ref()
        .map(|s| s.auth.role)
        .ok_or_else(|| eyre::eyre!("not signed in; run `medsurvey login` first"))
}

fn require_role(config: &CliConfig, role: Role) -> Result<()> {
    let actual = signed_in_role(config)?;
    if actual != role {
        return Err(eyre::eyre!("this command is for {role:?} accounts"));
    }
    Ok(())
}

fn print_doctors(doctors: &[DoctorSummary]) {
    if doctors.is_empty() {
        println!("No doctors.");
    }
    for d in doctors {
        match &d.speciality {
            Some(speciality) => {
                println!("{}  Dr. {} {} ({speciality})", d.id, d.first_name, d.last_name)
            }
            None => println!("{}  Dr. {} {}", d.id, d.first_name, d.last_name),
        }
    }
}

pub async fn dispatch(command: Command, mut config: CliConfig, api_override: Option<String>) -> Result<()> {
    let mut client = build_client(&config, api_override.as_deref())?;

    match command {
        Command::Login { email, password } => {
            let password = match password {
                Some(p) => p,
                None => prompt::password("Password").await?,
            };
            let session = client
                .login(&email, &password)
                .await
                .wrap_err("sign-in failed")?;
            println!("Signed in as {email} ({:?}).", session.role);
            config.session = Some(StoredSession {
                email,
                auth: session,
                signed_in_at: jiff::Timestamp::now(),
            });
            config::save_config(&config)?;
        }
        Command::Logout => {
            client.logout();
            config.session = None;
            config::save_config(&config)?;
            println!("Signed out.");
        }
        Command::Whoami => {
            let profile = client.me().await?;
            println!("{} <{}> ({:?})", profile.display_name(), profile.email, profile.role);
        }
        Command::ResetPassword { email } => {
            let ticket = client.forgot_password(&email).await?;
            println!("A reset code was sent to {}.", ticket.email());
            let code = prompt::text("Code").await?;
            let verified = client.verify_reset_code(&ticket, &code).await?;
            let new_password = prompt::new_password("New password").await?;
            client.reset_password(verified, &new_password).await?;
            println!("Password updated. You can now sign in.");
        }
        Command::Surveys => match signed_in_role(&config)? {
            Role::Patient => {
                let surveys = client.assigned_surveys().await?;
                if surveys.is_empty() {
                    println!("No surveys assigned.");
                }
                for s in surveys {
                    let due = s
                        .due_on
                        .map(|d| d.to_string())
                        .unwrap_or_else(|| "-".to_string());
                    println!(
                        "{}  {}  due {due}  {}/{} answered",
                        s.survey.id, s.survey.title, s.answered_count, s.question_count
                    );
                }
            }
            Role::Doctor => {
                for s in client.list_surveys().await? {
                    println!("{}  {}", s.id, s.title);
                }
            }
        },
        Command::Take { survey_id } => {
            signed_in_role(&config)?;
            take::run(&client, survey_id).await?;
        }
        Command::Review { survey_id } => {
            require_role(&config, Role::Doctor)?;
            review(&client, survey_id).await?;
        }
        Command::Author { action } => {
            require_role(&config, Role::Doctor)?;
            author(&client, action).await?;
        }
        Command::Doctors { action } => doctors(&client, &config, action).await?,
        Command::Appointments { action } => {
            require_role(&config, Role::Doctor)?;
            appointments(&client, action).await?;
        }
    }

    Ok(())
}

async fn review(client: &ApiClient, survey_id: Uuid) -> Result<()> {
    let prompts: HashMap<Uuid, String> = client
        .list_questions(survey_id)
        .await?
        .into_iter()
        .map(|q| (q.id, q.prompt))
        .collect();
    let attempts = client.list_attempts(survey_id).await?;
    if attempts.is_empty() {
        println!("No responses yet.");
    }
    for attempt in attempts {
        println!(
            "attempt {}  patient {}  submitted {}",
            attempt.id, attempt.patient_id, attempt.submitted_at
        );
        for entry in &attempt.answers {
            let label = prompts
                .get(&entry.question_id)
                .map(String::as_str)
                .unwrap_or("(deleted question)");
            println!("  {label}: {}", entry.answer);
        }
    }
    Ok(())
}

async fn author(client: &ApiClient, action: AuthorAction) -> Result<()> {
    match action {
        AuthorAction::Create { title, description } => {
            let survey = client.create_survey(&NewSurvey { title, description }).await?;
            println!("Created survey {}.", survey.id);
        }
        AuthorAction::AddQuestion {
            survey_id,
            prompt,
            question_type,
            options,
        } => {
            let question = NewQuestion {
                prompt,
                question_type: question_type.into(),
                options,
            };
            let created = client.add_question(survey_id, &question).await?;
            println!("Added question {}.", created.id);
        }
        AuthorAction::Questions { survey_id } => {
            for (i, q) in client.list_questions(survey_id).await?.iter().enumerate() {
                println!("{}. [{:?}] {}  ({})", i + 1, q.question_type, q.prompt, q.id);
                for option in &q.options {
                    println!("     - {option}");
                }
            }
        }
        AuthorAction::DeleteQuestion { question_id } => {
            client.delete_question(question_id).await?;
            println!("Deleted question {question_id}.");
        }
        AuthorAction::DeleteSurvey { survey_id } => {
            client.delete_survey(survey_id).await?;
            println!("Deleted survey {survey_id}.");
        }
    }
    Ok(())
}

async fn doctors(client: &ApiClient, config: &CliConfig, action: DoctorAction) -> Result<()> {
    match action {
        DoctorAction::List => print_doctors(&client.list_doctors().await?),
        DoctorAction::Mine => {
            require_role(config, Role::Patient)?;
            print_doctors(&client.my_doctors().await?);
        }
        DoctorAction::Add { doctor_id } => {
            require_role(config, Role::Patient)?;
            client.add_doctor(doctor_id).await?;
            println!("Doctor added.");
        }
        DoctorAction::Remove { doctor_id } => {
            require_role(config, Role::Patient)?;
            match client.remove_doctor(doctor_id).await {
                Ok(()) => println!("Doctor removed."),
                Err(ClientError::NotFound(_)) => println!("That doctor is not in your care team."),
                Err(e) => return Err(e.into()),
            }
        }
    }
    Ok(())
}

async fn appointments(client: &ApiClient, action: AppointmentAction) -> Result<()> {
    match action {
        AppointmentAction::List => {
            let today = jiff::Zoned::now().date();
            for a in client.list_appointments().await? {
                let next = a
                    .next_due(today)
                    .map(|d| d.to_string())
                    .unwrap_or_else(|| "finished".to_string());
                println!(
                    "{}  survey {}  patient {}  {:?} x{}  next {next}",
                    a.id, a.survey_id, a.patient_id, a.recurrence, a.occurrences
                );
            }
        }
        AppointmentAction::Schedule {
            survey,
            patient,
            starts_on,
            recurrence,
            occurrences,
        } => {
            let appointment = NewAppointment {
                survey_id: survey,
                patient_id: patient,
                starts_on,
                recurrence: recurrence.into(),
                occurrences,
            };
            let created = client.schedule_appointment(&appointment).await?;
            let dates: Vec<String> = created.due_dates().iter().map(|d| d.to_string()).collect();
            println!("Scheduled {}: {}", created.id, dates.join(", "));
        }
        AppointmentAction::Cancel { appointment_id } => {
            client.cancel_appointment(appointment_id).await?;
            println!("Cancelled {appointment_id}.");
        }
    }
    Ok(())
}
