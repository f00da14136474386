//! Onboarding quiz state machine.
//!
//! A `QuizSession` walks the ten question steps in order, collecting typed
//! answers into a partial `UserProfile`. The session is a plain value owned by
//! whoever drives it: handlers replay a fresh session per request, nothing is
//! shared across users.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::profile::{
    compute_bmi, ActivityLevel, Gender, Goal, Hydration, Protein, Restriction, Routine,
    SleepQuality, StressLevel, UserProfile,
};

/// Number of question steps. The result screen is step `TOTAL_STEPS + 1`.
pub const TOTAL_STEPS: u8 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuizStep {
    Goal,
    PhysicalData,
    ActivityLevel,
    StressLevel,
    SleepQuality,
    Hydration,
    CurrentHabits,
    Proteins,
    Restrictions,
    Routine,
}

/// How a step's inputs are read from the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    SingleChoice,
    MultipleChoice,
    Composite,
}

impl QuizStep {
    pub const ORDER: [QuizStep; TOTAL_STEPS as usize] = [
        QuizStep::Goal,
        QuizStep::PhysicalData,
        QuizStep::ActivityLevel,
        QuizStep::StressLevel,
        QuizStep::SleepQuality,
        QuizStep::Hydration,
        QuizStep::CurrentHabits,
        QuizStep::Proteins,
        QuizStep::Restrictions,
        QuizStep::Routine,
    ];

    /// 1-based position in the quiz.
    pub fn number(&self) -> u8 {
        match self {
            QuizStep::Goal => 1,
            QuizStep::PhysicalData => 2,
            QuizStep::ActivityLevel => 3,
            QuizStep::StressLevel => 4,
            QuizStep::SleepQuality => 5,
            QuizStep::Hydration => 6,
            QuizStep::CurrentHabits => 7,
            QuizStep::Proteins => 8,
            QuizStep::Restrictions => 9,
            QuizStep::Routine => 10,
        }
    }

    pub fn from_number(number: u8) -> Option<Self> {
        number
            .checked_sub(1)
            .and_then(|i| QuizStep::ORDER.get(i as usize))
            .copied()
    }

    pub fn kind(&self) -> StepKind {
        match self {
            QuizStep::PhysicalData => StepKind::Composite,
            QuizStep::CurrentHabits | QuizStep::Proteins | QuizStep::Restrictions => {
                StepKind::MultipleChoice
            }
            _ => StepKind::SingleChoice,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            QuizStep::Goal => "Qual é o seu objetivo principal?",
            QuizStep::PhysicalData => "Seus dados físicos",
            QuizStep::ActivityLevel => "Qual é o seu nível de atividade física?",
            QuizStep::StressLevel => "Como está o seu nível de estresse?",
            QuizStep::SleepQuality => "Como é a qualidade do seu sono?",
            QuizStep::Hydration => "Quanta água você bebe por dia?",
            QuizStep::CurrentHabits => "Quais são seus hábitos alimentares atuais?",
            QuizStep::Proteins => "Quais proteínas você prefere?",
            QuizStep::Restrictions => "Você tem alguma restrição alimentar?",
            QuizStep::Routine => "Como é a sua rotina de refeições?",
        }
    }

    /// Noun used in "please select your ..." messages.
    fn subject(&self) -> &'static str {
        match self {
            QuizStep::Goal => "goal",
            QuizStep::PhysicalData => "physical data",
            QuizStep::ActivityLevel => "activity level",
            QuizStep::StressLevel => "stress level",
            QuizStep::SleepQuality => "sleep quality",
            QuizStep::Hydration => "hydration",
            QuizStep::CurrentHabits => "current habits",
            QuizStep::Proteins => "favorite proteins",
            QuizStep::Restrictions => "dietary restrictions",
            QuizStep::Routine => "meal routine",
        }
    }
}

impl std::fmt::Display for QuizStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.subject())
    }
}

/// A raw form value: browsers post numbers as text, JSON clients as numbers.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FormValue {
    Number(f64),
    Text(String),
}

impl FormValue {
    /// Trimmed text, `None` when blank.
    fn text(&self) -> Option<String> {
        match self {
            FormValue::Number(n) => Some(n.to_string()),
            FormValue::Text(s) => {
                let s = s.trim();
                (!s.is_empty()).then(|| s.to_string())
            }
        }
    }

    fn number(&self) -> Option<f64> {
        match self {
            FormValue::Number(n) => Some(*n),
            FormValue::Text(s) => s.trim().replace(',', ".").parse::<f64>().ok(),
        }
        .filter(|n| n.is_finite())
    }
}

/// The inputs of one quiz step as the form submits them.
///
/// Single-choice steps read `selected`, multiple-choice steps read `checked`,
/// the physical-data step reads the named fields.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormInputs {
    #[serde(default)]
    pub selected: Option<String>,
    #[serde(default)]
    pub checked: Vec<String>,
    #[serde(default)]
    pub age: Option<FormValue>,
    #[serde(default)]
    pub gender: Option<FormValue>,
    #[serde(default)]
    pub weight: Option<FormValue>,
    #[serde(default)]
    pub height: Option<FormValue>,
    #[serde(default)]
    pub goal_weight: Option<FormValue>,
}

impl FormInputs {
    pub fn select(value: &str) -> Self {
        FormInputs {
            selected: Some(value.to_string()),
            ..Default::default()
        }
    }

    pub fn check<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FormInputs {
            checked: values.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }
}

/// A user-correctable problem with one step's inputs. The quiz stays on the step.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Please select your {0}")]
    NoSelection(QuizStep),

    #[error("'{value}' is not a valid option for {step}")]
    InvalidOption { step: QuizStep, value: String },

    #[error("Please fill in all physical data: missing {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("{0} must be a number")]
    NotNumeric(&'static str),

    #[error("{0} must be greater than zero")]
    OutOfRange(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FinalizeError {
    #[error("the quiz has not reached the result step")]
    NotAtResult,

    #[error("the quiz has already been finalized")]
    AlreadyFinalized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "step", rename_all = "snake_case")]
pub enum QuizState {
    Question(QuizStep),
    Result,
}

/// Outcome of a successful `advance`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    Next(QuizStep),
    /// The last question was answered; the session is now on the result step.
    Completed,
    /// The session was already on the result step; nothing changed.
    AlreadyAtResult,
}

#[derive(Debug, Clone)]
pub struct QuizSession {
    state: QuizState,
    answers: UserProfile,
    finalized: bool,
}

impl Default for QuizSession {
    fn default() -> Self {
        Self::start()
    }
}

impl QuizSession {
    /// A fresh session on step 1 with no answers. Re-opening the quiz always starts here.
    pub fn start() -> Self {
        QuizSession {
            state: QuizState::Question(QuizStep::Goal),
            answers: UserProfile::default(),
            finalized: false,
        }
    }

    pub fn state(&self) -> QuizState {
        self.state
    }

    /// 1..=N for questions, N + 1 for the result step.
    pub fn current_step(&self) -> u8 {
        match self.state {
            QuizState::Question(step) => step.number(),
            QuizState::Result => TOTAL_STEPS + 1,
        }
    }

    pub fn answers(&self) -> &UserProfile {
        &self.answers
    }

    /// Progress bar value in percent.
    pub fn progress(&self) -> f64 {
        f64::from(self.current_step().min(TOTAL_STEPS)) / f64::from(TOTAL_STEPS) * 100.0
    }

    /// Validates `inputs` for `step` and records the answer on success.
    /// On failure the answers are left untouched.
    pub fn validate_and_collect(
        &mut self,
        step: QuizStep,
        inputs: &FormInputs,
    ) -> Result<(), ValidationError> {
        let answers = &mut self.answers;
        match step {
            QuizStep::Goal => answers.goal = Some(single(step, inputs, Goal::from_key)?),
            QuizStep::PhysicalData => collect_physical_data(answers, inputs)?,
            QuizStep::ActivityLevel => {
                answers.activity_level = Some(single(step, inputs, ActivityLevel::from_key)?)
            }
            QuizStep::StressLevel => {
                answers.stress_level = Some(single(step, inputs, StressLevel::from_key)?)
            }
            QuizStep::SleepQuality => {
                answers.sleep_quality = Some(single(step, inputs, SleepQuality::from_key)?)
            }
            QuizStep::Hydration => {
                answers.hydration = Some(single(step, inputs, Hydration::from_key)?)
            }
            QuizStep::CurrentHabits => answers.current_habits = free_tags(&inputs.checked),
            QuizStep::Proteins => {
                answers.favorite_proteins = multiple(step, inputs, Protein::from_key)?
            }
            QuizStep::Restrictions => {
                answers.restrictions = multiple(step, inputs, Restriction::from_key)?
            }
            QuizStep::Routine => answers.routine = Some(single(step, inputs, Routine::from_key)?),
        }
        Ok(())
    }

    /// Validates the current step and moves forward by one.
    pub fn advance(&mut self, inputs: &FormInputs) -> Result<Advance, ValidationError> {
        let step = match self.state {
            QuizState::Question(step) => step,
            QuizState::Result => return Ok(Advance::AlreadyAtResult),
        };

        self.validate_and_collect(step, inputs)?;

        match QuizStep::from_number(step.number() + 1) {
            Some(next) => {
                self.state = QuizState::Question(next);
                Ok(Advance::Next(next))
            }
            None => {
                self.state = QuizState::Result;
                Ok(Advance::Completed)
            }
        }
    }

    /// Moves back one question. No-op on step 1 and on the result step.
    ///
    /// For callers that drive a session interactively, one step at a time.
    /// The HTTP routes replay a full answer set and never step back.
    pub fn retreat(&mut self) {
        if let QuizState::Question(step) = self.state {
            if let Some(previous) = QuizStep::from_number(step.number() - 1) {
                self.state = QuizState::Question(previous);
            }
        }
    }

    /// Produces the completed profile. Allowed once, and only on the result step.
    pub fn finalize(&mut self, now: DateTime<Utc>) -> Result<UserProfile, FinalizeError> {
        if self.state != QuizState::Result {
            return Err(FinalizeError::NotAtResult);
        }
        if self.finalized {
            return Err(FinalizeError::AlreadyFinalized);
        }
        self.finalized = true;

        Ok(UserProfile {
            quiz_completed: true,
            completed_at: Some(now),
            ..self.answers.clone()
        })
    }
}

fn single<T>(
    step: QuizStep,
    inputs: &FormInputs,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<T, ValidationError> {
    let value = inputs
        .selected
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(ValidationError::NoSelection(step))?;
    parse(value).ok_or_else(|| ValidationError::InvalidOption {
        step,
        value: value.to_string(),
    })
}

fn multiple<T: PartialEq>(
    step: QuizStep,
    inputs: &FormInputs,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<Vec<T>, ValidationError> {
    let mut selected = Vec::with_capacity(inputs.checked.len());
    for raw in inputs.checked.iter().map(|v| v.trim()).filter(|v| !v.is_empty()) {
        let value = parse(raw).ok_or_else(|| ValidationError::InvalidOption {
            step,
            value: raw.to_string(),
        })?;
        if !selected.contains(&value) {
            selected.push(value);
        }
    }
    Ok(selected)
}

fn free_tags(values: &[String]) -> Vec<String> {
    let mut tags: Vec<String> = Vec::with_capacity(values.len());
    for tag in values.iter().map(|v| v.trim()).filter(|v| !v.is_empty()) {
        if !tags.iter().any(|t| t == tag) {
            tags.push(tag.to_string());
        }
    }
    tags
}

fn collect_physical_data(
    answers: &mut UserProfile,
    inputs: &FormInputs,
) -> Result<(), ValidationError> {
    let present = |v: &Option<FormValue>| v.as_ref().and_then(FormValue::text).is_some();

    let missing: Vec<&'static str> = [
        ("age", present(&inputs.age)),
        ("gender", present(&inputs.gender)),
        ("weight", present(&inputs.weight)),
        ("height", present(&inputs.height)),
    ]
    .into_iter()
    .filter_map(|(name, ok)| (!ok).then_some(name))
    .collect();
    if !missing.is_empty() {
        return Err(ValidationError::MissingFields(missing));
    }

    let age = positive_number(&inputs.age, "age")?;
    let weight = positive_number(&inputs.weight, "weight")?;
    let height = positive_number(&inputs.height, "height")?;

    let gender_text = inputs
        .gender
        .as_ref()
        .and_then(FormValue::text)
        .unwrap_or_default();
    let gender = Gender::from_key(&gender_text).ok_or(ValidationError::InvalidOption {
        step: QuizStep::PhysicalData,
        value: gender_text,
    })?;

    // A blank goal weight means "keep the current weight".
    let goal_weight = match inputs.goal_weight.as_ref().and_then(FormValue::text) {
        None => weight,
        Some(_) => positive_number(&inputs.goal_weight, "goalWeight")?,
    };

    // Age and height are whole numbers; fractional input is truncated like the form does.
    let age = age.trunc() as u32;
    let height = height.trunc() as u32;
    if age == 0 {
        return Err(ValidationError::OutOfRange("age"));
    }
    if height == 0 {
        return Err(ValidationError::OutOfRange("height"));
    }

    answers.age = Some(age);
    answers.gender = Some(gender);
    answers.weight = Some(weight);
    answers.height = Some(height);
    answers.goal_weight = Some(goal_weight);
    answers.bmi = compute_bmi(weight, height);
    Ok(())
}

fn positive_number(value: &Option<FormValue>, field: &'static str) -> Result<f64, ValidationError> {
    let number = value
        .as_ref()
        .and_then(FormValue::number)
        .ok_or(ValidationError::NotNumeric(field))?;
    if number <= 0.0 {
        return Err(ValidationError::OutOfRange(field));
    }
    Ok(number)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::TimeZone;

    pub(crate) fn physical(age: &str, gender: &str, weight: &str, height: &str) -> FormInputs {
        FormInputs {
            age: Some(FormValue::Text(age.to_string())),
            gender: Some(FormValue::Text(gender.to_string())),
            weight: Some(FormValue::Text(weight.to_string())),
            height: Some(FormValue::Text(height.to_string())),
            ..Default::default()
        }
    }

    /// A valid answer for every step, in order.
    pub(crate) fn valid_answers() -> Vec<FormInputs> {
        vec![
            FormInputs::select("lose_weight"),
            physical("34", "male", "80", "178"),
            FormInputs::select("active"),
            FormInputs::select("high"),
            FormInputs::select("poor"),
            FormInputs::select("moderate"),
            FormInputs::check(["snacks", "soda"]),
            FormInputs::check(["beef", "eggs"]),
            FormInputs::check(["lactose"]),
            FormInputs::select("intermittent"),
        ]
    }

    fn completed_session() -> QuizSession {
        let mut session = QuizSession::start();
        for inputs in valid_answers() {
            session.advance(&inputs).unwrap();
        }
        session
    }

    #[test]
    fn test_start_is_step_one_with_empty_answers() {
        let session = QuizSession::start();
        assert_eq!(session.current_step(), 1);
        assert_eq!(session.state(), QuizState::Question(QuizStep::Goal));
        assert_eq!(session.answers(), &UserProfile::default());
    }

    #[test]
    fn test_advancing_n_times_reaches_result_exactly_once() {
        let mut session = QuizSession::start();
        let mut completions = 0;
        for (i, inputs) in valid_answers().iter().enumerate() {
            assert_eq!(session.current_step(), i as u8 + 1, "no step may be skipped");
            match session.advance(inputs).unwrap() {
                Advance::Next(step) => assert_eq!(step.number(), i as u8 + 2),
                Advance::Completed => completions += 1,
                Advance::AlreadyAtResult => panic!("result reached too early"),
            }
        }
        assert_eq!(completions, 1);
        assert_eq!(session.state(), QuizState::Result);
        assert_eq!(session.current_step(), TOTAL_STEPS + 1);
        assert_eq!(
            session.advance(&FormInputs::default()).unwrap(),
            Advance::AlreadyAtResult
        );
    }

    #[test]
    fn test_retreat_at_step_one_is_noop() {
        let mut session = QuizSession::start();
        session.retreat();
        assert_eq!(session.current_step(), 1);
    }

    #[test]
    fn test_retreat_goes_back_one_step_and_keeps_answers() {
        let mut session = QuizSession::start();
        session.advance(&FormInputs::select("energy")).unwrap();
        session
            .advance(&physical("40", "female", "70", "165"))
            .unwrap();
        assert_eq!(session.current_step(), 3);
        session.retreat();
        assert_eq!(session.current_step(), 2);
        assert_eq!(session.answers().goal, Some(Goal::Energy));
    }

    #[test]
    fn test_retreat_on_result_is_noop() {
        let mut session = completed_session();
        session.retreat();
        assert_eq!(session.state(), QuizState::Result);
    }

    #[test]
    fn test_single_choice_without_selection_fails_and_stays() {
        let mut session = QuizSession::start();
        let err = session.advance(&FormInputs::default()).unwrap_err();
        assert_eq!(err, ValidationError::NoSelection(QuizStep::Goal));
        assert_eq!(session.current_step(), 1);
        assert_eq!(err.to_string(), "Please select your goal");
    }

    #[test]
    fn test_single_choice_rejects_unknown_option() {
        let mut session = QuizSession::start();
        let err = session.advance(&FormInputs::select("get_rich")).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidOption { .. }));
        assert_eq!(session.current_step(), 1);
    }

    #[test]
    fn test_physical_data_lists_every_missing_field() {
        let mut session = QuizSession::start();
        session.advance(&FormInputs::select("health")).unwrap();
        let inputs = FormInputs {
            age: Some(FormValue::Text("30".into())),
            weight: Some(FormValue::Text("  ".into())),
            ..Default::default()
        };
        let err = session.advance(&inputs).unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingFields(vec!["gender", "weight", "height"])
        );
        assert_eq!(session.current_step(), 2);
        assert_eq!(session.answers().age, None, "failed step records nothing");
    }

    #[test]
    fn test_physical_data_rejects_non_numeric_weight() {
        let mut session = QuizSession::start();
        let err = session
            .validate_and_collect(QuizStep::PhysicalData, &physical("30", "male", "heavy", "180"))
            .unwrap_err();
        assert_eq!(err, ValidationError::NotNumeric("weight"));
    }

    #[test]
    fn test_physical_data_rejects_zero_height() {
        let mut session = QuizSession::start();
        let err = session
            .validate_and_collect(QuizStep::PhysicalData, &physical("30", "male", "80", "0"))
            .unwrap_err();
        assert_eq!(err, ValidationError::OutOfRange("height"));
    }

    #[test]
    fn test_physical_data_computes_bmi_and_defaults_goal_weight() {
        let mut session = QuizSession::start();
        session
            .validate_and_collect(QuizStep::PhysicalData, &physical("34", "male", "80", "178"))
            .unwrap();
        let answers = session.answers();
        assert_eq!(answers.height, Some(178));
        assert_eq!(answers.goal_weight, Some(80.0));
        let bmi = answers.bmi.unwrap();
        assert!((bmi - 25.2).abs() < 0.05);
    }

    #[test]
    fn test_physical_data_accepts_json_numbers_and_goal_weight() {
        let inputs: FormInputs = serde_json::from_str(
            r#"{"age": 28, "gender": "female", "weight": 65.5, "height": 162.7, "goalWeight": "60"}"#,
        )
        .unwrap();
        let mut session = QuizSession::start();
        session
            .validate_and_collect(QuizStep::PhysicalData, &inputs)
            .unwrap();
        assert_eq!(session.answers().height, Some(162));
        assert_eq!(session.answers().goal_weight, Some(60.0));
        assert_eq!(session.answers().gender, Some(Gender::Female));
    }

    #[test]
    fn test_multiple_choice_accepts_empty_set() {
        let mut session = QuizSession::start();
        session
            .validate_and_collect(QuizStep::Proteins, &FormInputs::default())
            .unwrap();
        assert!(session.answers().favorite_proteins.is_empty());
    }

    #[test]
    fn test_multiple_choice_dedups_and_rejects_unknown() {
        let mut session = QuizSession::start();
        session
            .validate_and_collect(QuizStep::Proteins, &FormInputs::check(["fish", "fish", "eggs"]))
            .unwrap();
        assert_eq!(
            session.answers().favorite_proteins,
            vec![Protein::Fish, Protein::Eggs]
        );
        let err = session
            .validate_and_collect(QuizStep::Restrictions, &FormInputs::check(["tofu"]))
            .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidOption { .. }));
    }

    #[test]
    fn test_habits_are_free_form() {
        let mut session = QuizSession::start();
        session
            .validate_and_collect(
                QuizStep::CurrentHabits,
                &FormInputs::check(["fast food", " ", "sweets", "fast food"]),
            )
            .unwrap();
        assert_eq!(session.answers().current_habits, vec!["fast food", "sweets"]);
    }

    #[test]
    fn test_finalize_stamps_completion_once() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let mut session = completed_session();
        let profile = session.finalize(now).unwrap();
        assert!(profile.quiz_completed);
        assert_eq!(profile.completed_at, Some(now));
        assert_eq!(profile.goal, Some(Goal::LoseWeight));
        assert_eq!(profile.routine, Some(Routine::Intermittent));
        assert_eq!(profile.restrictions, vec![Restriction::Lactose]);
        assert_eq!(session.finalize(now), Err(FinalizeError::AlreadyFinalized));
    }

    #[test]
    fn test_finalize_before_result_fails() {
        let mut session = QuizSession::start();
        assert_eq!(session.finalize(Utc::now()), Err(FinalizeError::NotAtResult));
    }

    #[test]
    fn test_step_numbers_round_trip() {
        for step in QuizStep::ORDER {
            assert_eq!(QuizStep::from_number(step.number()), Some(step));
        }
        assert_eq!(QuizStep::from_number(0), None);
        assert_eq!(QuizStep::from_number(TOTAL_STEPS + 1), None);
    }

    #[test]
    fn test_progress_percentage() {
        let mut session = QuizSession::start();
        assert!((session.progress() - 10.0).abs() < f64::EPSILON);
        session.advance(&FormInputs::select("goal_x")).ok();
        assert!((session.progress() - 10.0).abs() < f64::EPSILON);
        let session = completed_session();
        assert!((session.progress() - 100.0).abs() < f64::EPSILON);
    }
}
