//! Integration tests for filling in a multi-step form

use form_schema::validation::{EMAIL_VALIDATION_MESSAGE, NUMBER_VALIDATION_MESSAGE};
use form_schema::{
    EditorConfig, FormProgress, Progress, ProgressError, Question, QuestionType, Section,
    ValidationError,
};
use serde_json::{Value, json};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn question(id: u64, ty: QuestionType, text: &str, name: Option<&str>) -> Question {
    let mut question = Question::new(id);
    question.set_type(ty);
    question.question = text.to_string();
    question.set_name(name);
    question
}

fn signup_sections() -> Vec<Section> {
    let mut email = question(11, QuestionType::ShortAnswer, "Email", Some("account.email"));
    email.required = true;
    let has_company = question(12, QuestionType::Switch, "Has company", Some("has_company"));
    let mut company = question(13, QuestionType::ShortAnswer, "Company name", Some("company.name"));
    company.required = true;
    company.set_depend(Some("has_company"));

    let terms = question(21, QuestionType::TermCondition, "Terms", None);
    let age = question(22, QuestionType::Number, "Age", Some("age"));

    vec![
        Section::new(1, "Account").with_questions(vec![email, has_company, company]),
        Section::new(2, "Confirm").with_questions(vec![terms, age]),
    ]
}

fn messages(err: ProgressError) -> Vec<ValidationError> {
    match err {
        ProgressError::Invalid(errors) => errors,
        other => panic!("expected validation errors, got {:?}", other),
    }
}

#[test]
fn test_signup_flow() {
    init_logging();
    let mut progress = FormProgress::new(signup_sections(), &EditorConfig::default()).unwrap();
    let persisted = Value::Null;

    // company is not required while the switch is off
    let errors = messages(progress.next(&json!({}), &persisted).unwrap_err());
    assert_eq!(
        errors,
        vec![ValidationError::new("account.email", "Email is required")]
    );

    assert!(progress.record("has_company", json!(true)));
    assert!(!progress.record("age", json!(3)));

    let answers = json!({ "account": { "email": "nope" }, "has_company": true });
    let errors = messages(progress.next(&answers, &persisted).unwrap_err());
    assert_eq!(
        errors,
        vec![
            ValidationError::new("account.email", EMAIL_VALIDATION_MESSAGE),
            ValidationError::new("company.name", "Company name is required"),
        ]
    );

    let answers = json!({
        "account": { "email": "ana@example.com" },
        "has_company": true,
        "company": { "name": "Acme" }
    });
    assert_eq!(progress.next(&answers, &persisted).unwrap(), Progress::Advanced(1));
    assert!(progress.section().with_condition());

    // terms gate the last step
    assert!(!progress.can_advance());
    assert_eq!(
        progress.next(&json!({ "age": "42" }), &persisted),
        Err(ProgressError::TermsNotAccepted)
    );
    progress.accept_terms(true);

    let errors = messages(progress.next(&json!({ "age": "4x" }), &persisted).unwrap_err());
    assert_eq!(errors, vec![ValidationError::new("age", NUMBER_VALIDATION_MESSAGE)]);

    match progress.next(&json!({ "age": "42" }), &persisted).unwrap() {
        Progress::Completed(sections) => {
            let names: Vec<&str> = sections.iter().map(|s| s.name.as_str()).collect();
            assert_eq!(names, vec!["Account", "Confirm"]);
            assert_eq!(sections[0].data["company"]["name"], "Acme");
        }
        other => panic!("expected completion, got {:?}", other),
    }

    assert_eq!(progress.prev(), 0);
    assert_eq!(
        progress.answers_for(0).unwrap()["account"]["email"],
        "ana@example.com"
    );
}

#[test]
fn test_persisted_switch_enables_dependent_field() {
    let mut progress = FormProgress::new(signup_sections(), &EditorConfig::default()).unwrap();
    let persisted = json!({ "has_company": true });
    let answers = json!({ "account": { "email": "ana@example.com" } });

    let errors = messages(progress.next(&answers, &persisted).unwrap_err());
    assert_eq!(errors[0].field, "company.name");

    // a live change takes precedence over what was saved
    progress.record("has_company", json!(false));
    assert_eq!(progress.next(&answers, &persisted).unwrap(), Progress::Advanced(1));
}

#[test]
fn test_read_only_review() {
    let mut progress = FormProgress::new(signup_sections(), &EditorConfig::default())
        .unwrap()
        .read_only();

    assert!(progress.can_advance());
    assert_eq!(
        progress.next(&Value::Null, &Value::Null).unwrap(),
        Progress::Advanced(1)
    );
    assert!(!progress.can_advance());
    assert_eq!(
        progress.next(&Value::Null, &Value::Null),
        Err(ProgressError::ReadOnlyEnd)
    );

    progress.jump_to(0).unwrap();
    assert_eq!(progress.current(), 0);
    assert!(matches!(
        progress.jump_to(5),
        Err(ProgressError::NoSuchStep { index: 5, len: 2 })
    ));
}
