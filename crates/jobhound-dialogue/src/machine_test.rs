use jobhound_core::AreaId;

use super::*;

fn machine() -> DialogueStateMachine {
    DialogueStateMachine::new(Arc::new(SessionStore::new()))
}

async fn state_of(machine: &DialogueStateMachine, id: &SessionId) -> Option<DialogueState> {
    let slot = machine.store().get(id)?;
    let session = slot.lock().await;
    Some(session.state())
}

async fn answer(machine: &DialogueStateMachine, id: &SessionId, text: &str) -> Step {
    machine.advance(id, text).await.expect("session should be active")
}

// -----------------------------------------------------------------------
// happy path
// -----------------------------------------------------------------------

#[tokio::test]
async fn full_dialogue_produces_criteria_once() {
    let machine = machine();
    let id = SessionId::from(42_i64);

    let greeting = machine.start(id.clone());
    assert_eq!(greeting.prompt, prompts::GREETING);
    assert!(!greeting.done);

    let step = answer(&machine, &id, "Python developer").await;
    assert_eq!(step.reply.prompt, prompts::ASK_SALARY);
    assert!(step.reply.choices.is_none());

    let step = answer(&machine, &id, "120000").await;
    assert_eq!(step.reply.prompt, prompts::ASK_EMPLOYMENT);
    assert_eq!(step.reply.choices.as_ref().map(Vec::len), Some(5));

    let step = answer(&machine, &id, "Полная занятость").await;
    assert_eq!(step.reply.prompt, prompts::ASK_SCHEDULE);

    let step = answer(&machine, &id, "Удалённая работа").await;
    assert_eq!(step.reply.prompt, prompts::ASK_CITY);
    let cities = step.reply.choices.unwrap();
    assert_eq!(cities.first().map(String::as_str), Some("Москва"));

    let step = answer(&machine, &id, "Москва").await;
    assert!(step.reply.done);
    assert!(step.reply.prompt.contains("Python developer"));
    let criteria = step.criteria.expect("criteria on final step");
    assert_eq!(criteria.keyword(), "Python developer");
    assert_eq!(criteria.salary_from(), Some(120_000));
    assert_eq!(criteria.employment(), Some(Employment::Full));
    assert_eq!(criteria.schedule(), Some(Schedule::Remote));
    assert_eq!(criteria.area(), AreaId(1));

    assert!(!machine.store().contains(&id));
    assert_eq!(
        machine.advance(&id, "Москва").await,
        Err(DialogueError::NoActiveSession(id.clone()))
    );
}

#[tokio::test]
async fn keyword_is_trimmed_but_kept_verbatim() {
    let machine = machine();
    let id = SessionId::from("u");
    machine.start(id.clone());
    answer(&machine, &id, "  C++ / Qt  ").await;

    let slot = machine.store().get(&id).unwrap();
    assert_eq!(slot.lock().await.partial().current_keyword(), Some("C++ / Qt"));
}

#[tokio::test]
async fn vocabulary_answers_are_case_insensitive() {
    let machine = machine();
    let id = SessionId::from("u");
    machine.start(id.clone());
    answer(&machine, &id, "rust").await;
    answer(&machine, &id, "0").await;
    answer(&machine, &id, "  частичная ЗАНЯТОСТЬ ").await;
    answer(&machine, &id, "удаленная работа").await;
    let step = answer(&machine, &id, "санкт-петербург").await;

    let criteria = step.criteria.unwrap();
    assert_eq!(criteria.salary_from(), Some(0));
    assert_eq!(criteria.employment(), Some(Employment::Part));
    assert_eq!(criteria.schedule(), Some(Schedule::Remote));
    assert_eq!(criteria.area(), AreaId(2));
}

// -----------------------------------------------------------------------
// re-prompts
// -----------------------------------------------------------------------

#[tokio::test]
async fn blank_keyword_reprompts() {
    let machine = machine();
    let id = SessionId::from("u");
    machine.start(id.clone());

    let step = answer(&machine, &id, "   ").await;
    assert_eq!(step.reply.prompt, prompts::KEYWORD_RETRY);
    assert_eq!(state_of(&machine, &id).await, Some(DialogueState::AwaitingKeyword));
}

#[tokio::test]
async fn invalid_salary_reprompts_and_keeps_state() {
    let machine = machine();
    let id = SessionId::from("u");
    machine.start(id.clone());
    answer(&machine, &id, "rust").await;

    for bad in ["abc", "-5", "100 000", "12.5", ""] {
        let step = answer(&machine, &id, bad).await;
        assert_eq!(step.reply.prompt, prompts::SALARY_RETRY, "input {bad:?}");
        assert!(step.criteria.is_none());
        assert_eq!(state_of(&machine, &id).await, Some(DialogueState::AwaitingSalary));
    }

    let step = answer(&machine, &id, " 90000 ").await;
    assert_eq!(step.reply.prompt, prompts::ASK_EMPLOYMENT);
}

#[tokio::test]
async fn unknown_employment_reprompts_with_same_choices() {
    let machine = machine();
    let id = SessionId::from("u");
    machine.start(id.clone());
    answer(&machine, &id, "rust").await;
    let asked = answer(&machine, &id, "100000").await;

    let step = answer(&machine, &id, "фриланс").await;
    assert_eq!(step.reply.prompt, prompts::EMPLOYMENT_RETRY);
    assert_eq!(step.reply.choices, asked.reply.choices);
    assert_eq!(state_of(&machine, &id).await, Some(DialogueState::AwaitingEmployment));
}

#[tokio::test]
async fn unknown_schedule_reprompts() {
    let machine = machine();
    let id = SessionId::from("u");
    machine.start(id.clone());
    answer(&machine, &id, "rust").await;
    answer(&machine, &id, "100000").await;
    answer(&machine, &id, "Стажировка").await;

    // Aliases are for free text only; the dialogue wants a label.
    let step = answer(&machine, &id, "удаленка").await;
    assert_eq!(step.reply.prompt, prompts::SCHEDULE_RETRY);
    assert_eq!(state_of(&machine, &id).await, Some(DialogueState::AwaitingSchedule));
}

#[tokio::test]
async fn unknown_city_falls_back_to_nationwide() {
    let machine = machine();
    let id = SessionId::from("u");
    machine.start(id.clone());
    answer(&machine, &id, "rust").await;
    answer(&machine, &id, "100000").await;
    answer(&machine, &id, "Проектная занятость").await;
    answer(&machine, &id, "Гибкий график").await;

    let step = answer(&machine, &id, "Тверь").await;
    assert_eq!(step.criteria.unwrap().area(), AreaId::NATIONWIDE);
}

// -----------------------------------------------------------------------
// session lifecycle
// -----------------------------------------------------------------------

#[tokio::test]
async fn advance_without_start_fails() {
    let machine = machine();
    let id = SessionId::from("ghost");
    assert_eq!(
        machine.advance(&id, "rust").await,
        Err(DialogueError::NoActiveSession(id.clone()))
    );
}

#[tokio::test]
async fn cancel_discards_session() {
    let machine = machine();
    let id = SessionId::from("u");
    machine.start(id.clone());
    answer(&machine, &id, "rust").await;
    assert_eq!(state_of(&machine, &id).await, Some(DialogueState::AwaitingSalary));

    let cancelled = machine.cancel(&id).await;
    assert!(cancelled.existed);
    assert!(cancelled.reply.done);
    assert_eq!(cancelled.reply.prompt, prompts::CANCELLED);
    assert!(!machine.store().contains(&id));

    assert!(machine.advance(&id, "100000").await.is_err());
}

#[tokio::test]
async fn cancel_without_session_reports_absence() {
    let machine = machine();
    let cancelled = machine.cancel(&SessionId::from("u")).await;
    assert!(!cancelled.existed);
    assert_eq!(cancelled.reply.prompt, prompts::CANCELLED);
}

#[tokio::test]
async fn restart_overwrites_progress() {
    let machine = machine();
    let id = SessionId::from("u");
    machine.start(id.clone());
    answer(&machine, &id, "rust").await;
    answer(&machine, &id, "100000").await;

    machine.start(id.clone());
    assert_eq!(state_of(&machine, &id).await, Some(DialogueState::AwaitingKeyword));
    assert_eq!(machine.store().len(), 1);
}

#[tokio::test]
async fn sessions_are_independent() {
    let machine = machine();
    let a = SessionId::from(1_i64);
    let b = SessionId::from(2_i64);
    machine.start(a.clone());
    machine.start(b.clone());

    answer(&machine, &a, "rust").await;
    assert_eq!(state_of(&machine, &a).await, Some(DialogueState::AwaitingSalary));
    assert_eq!(state_of(&machine, &b).await, Some(DialogueState::AwaitingKeyword));

    machine.cancel(&a).await;
    assert!(machine.store().contains(&b));
}

#[tokio::test]
async fn concurrent_final_answers_complete_once() {
    let machine = machine();
    let id = SessionId::from("u");
    machine.start(id.clone());
    answer(&machine, &id, "rust").await;
    answer(&machine, &id, "100000").await;
    answer(&machine, &id, "Полная занятость").await;
    answer(&machine, &id, "Полный день").await;

    let mut tasks = Vec::new();
    for _ in 0..8 {
        let machine = machine.clone();
        let id = id.clone();
        tasks.push(tokio::spawn(async move { machine.advance(&id, "Москва").await }));
    }

    let mut completed = 0;
    for task in tasks {
        match task.await.unwrap() {
            Ok(step) => {
                assert!(step.criteria.is_some());
                completed += 1;
            }
            Err(err) => assert_eq!(err, DialogueError::NoActiveSession(id.clone())),
        }
    }
    assert_eq!(completed, 1);
}

#[tokio::test]
async fn stale_handle_after_cancel_is_closed() {
    let machine = machine();
    let id = SessionId::from("u");
    machine.start(id.clone());
    let stale = machine.store().get(&id).unwrap();

    machine.cancel(&id).await;
    assert!(stale.is_closed());
}

#[tokio::test]
async fn stale_handle_after_completion_sees_no_session() {
    let machine = machine();
    let id = SessionId::from("u");
    machine.start(id.clone());
    answer(&machine, &id, "rust").await;
    answer(&machine, &id, "100000").await;
    answer(&machine, &id, "Полная занятость").await;
    answer(&machine, &id, "Полный день").await;
    let stale = machine.store().get(&id).unwrap();

    let step = answer(&machine, &id, "Москва").await;
    assert!(step.criteria.is_some());
    assert!(stale.is_closed());
    assert_eq!(stale.lock().await.state(), DialogueState::Done);
    assert_eq!(
        machine.advance(&id, "Москва").await,
        Err(DialogueError::NoActiveSession(id.clone()))
    );
}
