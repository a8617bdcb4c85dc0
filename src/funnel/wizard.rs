//! Three-step registration wizard.
//!
//! Step 1 collects contact details, step 2 course preferences and step 3 is
//! the review/payment page. Moving forward always runs the validation rules
//! of the step being left; moving back never validates.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use thiserror::Error;
use yew::Callback;

use crate::funnel::subscribers::{SubscriptionId, Subscribers};

static EMAIL_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\S+@\S+\.\S+").expect("email pattern is valid"));

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    FullName,
    Email,
    Phone,
    Company,
    AutomationExperience,
    CourseGoal,
}

impl Field {
    pub fn key(self) -> &'static str {
        match self {
            Field::FullName => "full_name",
            Field::Email => "email",
            Field::Phone => "phone",
            Field::Company => "company",
            Field::AutomationExperience => "automation_experience",
            Field::CourseGoal => "course_goal",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExperienceLevel {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl ExperienceLevel {
    pub const ALL: [ExperienceLevel; 4] = [
        ExperienceLevel::Beginner,
        ExperienceLevel::Intermediate,
        ExperienceLevel::Advanced,
        ExperienceLevel::Expert,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ExperienceLevel::Beginner => "beginner",
            ExperienceLevel::Intermediate => "intermediate",
            ExperienceLevel::Advanced => "advanced",
            ExperienceLevel::Expert => "expert",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ExperienceLevel::Beginner => "Beginner - New to automation",
            ExperienceLevel::Intermediate => "Intermediate - Some automation experience",
            ExperienceLevel::Advanced => "Advanced - Experienced with automation tools",
            ExperienceLevel::Expert => "Expert - Building complex automation systems",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|level| level.as_str() == value)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CourseGoal {
    LearnN8n,
    ImproveWorkflows,
    BuildAgents,
    BusinessAutomation,
    CareerDevelopment,
}

impl CourseGoal {
    pub const ALL: [CourseGoal; 5] = [
        CourseGoal::LearnN8n,
        CourseGoal::ImproveWorkflows,
        CourseGoal::BuildAgents,
        CourseGoal::BusinessAutomation,
        CourseGoal::CareerDevelopment,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CourseGoal::LearnN8n => "learn-n8n",
            CourseGoal::ImproveWorkflows => "improve-workflows",
            CourseGoal::BuildAgents => "build-agents",
            CourseGoal::BusinessAutomation => "business-automation",
            CourseGoal::CareerDevelopment => "career-development",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CourseGoal::LearnN8n => "Learn N8N from scratch",
            CourseGoal::ImproveWorkflows => "Improve existing workflows",
            CourseGoal::BuildAgents => "Build AI agents and advanced automations",
            CourseGoal::BusinessAutomation => "Automate business processes",
            CourseGoal::CareerDevelopment => "Career development and new skills",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|goal| goal.as_str() == value)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct FormData {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    pub automation_experience: String,
    pub course_goal: String,
}

impl FormData {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::FullName => &self.full_name,
            Field::Email => &self.email,
            Field::Phone => &self.phone,
            Field::Company => &self.company,
            Field::AutomationExperience => &self.automation_experience,
            Field::CourseGoal => &self.course_goal,
        }
    }

    pub fn set(&mut self, field: Field, value: String) {
        let slot = match field {
            Field::FullName => &mut self.full_name,
            Field::Email => &mut self.email,
            Field::Phone => &mut self.phone,
            Field::Company => &mut self.company,
            Field::AutomationExperience => &mut self.automation_experience,
            Field::CourseGoal => &mut self.course_goal,
        };
        *slot = value;
    }
}

pub type ValidationErrors = BTreeMap<Field, String>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum WizardStep {
    Basics,
    Preferences,
    Review,
}

impl WizardStep {
    pub const COUNT: u8 = 3;

    pub fn number(self) -> u8 {
        match self {
            WizardStep::Basics => 1,
            WizardStep::Preferences => 2,
            WizardStep::Review => 3,
        }
    }

    fn forward(self) -> Self {
        match self {
            WizardStep::Basics => WizardStep::Preferences,
            WizardStep::Preferences | WizardStep::Review => WizardStep::Review,
        }
    }

    fn back(self) -> Self {
        match self {
            WizardStep::Basics | WizardStep::Preferences => WizardStep::Basics,
            WizardStep::Review => WizardStep::Preferences,
        }
    }
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_SHAPE.is_match(email)
}

/// Validation rules for a single step, independent of wizard state.
pub fn validate(step: WizardStep, data: &FormData) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    match step {
        WizardStep::Basics => {
            if data.full_name.trim().is_empty() {
                errors.insert(Field::FullName, "Full name is required".to_string());
            }
            if data.email.trim().is_empty() {
                errors.insert(Field::Email, "Email is required".to_string());
            } else if !is_valid_email(&data.email) {
                errors.insert(Field::Email, "Please enter a valid email address".to_string());
            }
            if data.phone.trim().is_empty() {
                errors.insert(Field::Phone, "Phone number is required".to_string());
            }
        }
        WizardStep::Preferences => {
            if ExperienceLevel::parse(&data.automation_experience).is_none() {
                errors.insert(
                    Field::AutomationExperience,
                    "Please select your experience level".to_string(),
                );
            }
            if CourseGoal::parse(&data.course_goal).is_none() {
                errors.insert(Field::CourseGoal, "Please select your primary goal".to_string());
            }
        }
        WizardStep::Review => {}
    }

    errors
}

#[derive(Clone, Debug, PartialEq)]
pub enum WizardEvent {
    Next,
    Previous,
    UpdateField(Field, String),
    SetTermsAccepted(bool),
}

/// What renderers get on every change.
#[derive(Clone, Debug, PartialEq)]
pub struct WizardSnapshot {
    pub step: WizardStep,
    pub data: FormData,
    pub errors: ValidationErrors,
    pub terms_accepted: bool,
}

impl WizardSnapshot {
    pub fn progress_percent(&self) -> u8 {
        ((self.step.number() as f32 / WizardStep::COUNT as f32) * 100.0).round() as u8
    }

    pub fn error(&self, field: Field) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubmitError {
    #[error("Complete the previous steps before paying")]
    NotOnReviewStep,
    #[error("Please accept the terms and conditions")]
    TermsNotAccepted,
}

pub struct RegistrationWizard {
    step: WizardStep,
    data: FormData,
    errors: ValidationErrors,
    terms_accepted: bool,
    subscribers: Subscribers<WizardSnapshot>,
}

impl RegistrationWizard {
    pub fn new() -> Self {
        Self {
            step: WizardStep::Basics,
            data: FormData::default(),
            errors: ValidationErrors::new(),
            terms_accepted: false,
            subscribers: Subscribers::new(),
        }
    }

    pub fn current_state(&self) -> WizardSnapshot {
        WizardSnapshot {
            step: self.step,
            data: self.data.clone(),
            errors: self.errors.clone(),
            terms_accepted: self.terms_accepted,
        }
    }

    pub fn subscribe(&mut self, listener: Callback<WizardSnapshot>) -> SubscriptionId {
        self.subscribers.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) {
        self.subscribers.unsubscribe(id);
    }

    /// Applies one event and notifies subscribers. Returns false only when a
    /// `Next` was rejected by validation.
    pub fn dispatch(&mut self, event: WizardEvent) -> bool {
        let accepted = match event {
            WizardEvent::Next => {
                let valid = self.validate_step(self.step);
                if valid {
                    self.step = self.step.forward();
                }
                valid
            }
            WizardEvent::Previous => {
                self.step = self.step.back();
                true
            }
            WizardEvent::UpdateField(field, value) => {
                self.data.set(field, value);
                self.errors.remove(&field);
                true
            }
            WizardEvent::SetTermsAccepted(accepted) => {
                self.terms_accepted = accepted;
                true
            }
        };

        self.subscribers.notify(&self.current_state());
        accepted
    }

    pub fn next_step(&mut self) -> bool {
        self.dispatch(WizardEvent::Next)
    }

    pub fn prev_step(&mut self) {
        self.dispatch(WizardEvent::Previous);
    }

    pub fn update_field(&mut self, field: Field, value: impl Into<String>) {
        self.dispatch(WizardEvent::UpdateField(field, value.into()));
    }

    pub fn set_terms_accepted(&mut self, accepted: bool) {
        self.dispatch(WizardEvent::SetTermsAccepted(accepted));
    }

    /// Replaces the error map with the failures of `step`.
    pub fn validate_step(&mut self, step: WizardStep) -> bool {
        self.errors = validate(step, &self.data);
        self.errors.is_empty()
    }

    pub fn submit(&self) -> Result<FormData, SubmitError> {
        if self.step != WizardStep::Review {
            return Err(SubmitError::NotOnReviewStep);
        }
        if !self.terms_accepted {
            return Err(SubmitError::TermsNotAccepted);
        }
        Ok(self.data.clone())
    }
}

impl Default for RegistrationWizard {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn filled_basics(wizard: &mut RegistrationWizard) {
        wizard.update_field(Field::FullName, "Ada Lovelace");
        wizard.update_field(Field::Email, "ada@example.com");
        wizard.update_field(Field::Phone, "+1 555 0100");
    }

    fn filled_preferences(wizard: &mut RegistrationWizard) {
        wizard.update_field(Field::AutomationExperience, "advanced");
        wizard.update_field(Field::CourseGoal, "build-agents");
    }

    #[test]
    fn empty_full_name_blocks_step_one() {
        let mut wizard = RegistrationWizard::new();
        wizard.update_field(Field::Email, "a@b.co");
        wizard.update_field(Field::Phone, "555");

        assert!(!wizard.next_step());
        assert_eq!(wizard.current_state().step.number(), 1);
        assert_eq!(
            wizard.current_state().errors.get(&Field::FullName).map(String::as_str),
            Some("Full name is required")
        );
        assert_eq!(wizard.current_state().errors.len(), 1);
    }

    #[test]
    fn whitespace_only_values_count_as_missing() {
        let mut wizard = RegistrationWizard::new();
        wizard.update_field(Field::FullName, "   ");
        wizard.update_field(Field::Email, " \t");
        wizard.update_field(Field::Phone, "  ");

        assert!(!wizard.next_step());
        assert_eq!(wizard.current_state().errors[&Field::FullName], "Full name is required");
        assert_eq!(wizard.current_state().errors[&Field::Email], "Email is required");
        assert_eq!(wizard.current_state().errors[&Field::Phone], "Phone number is required");
    }

    #[test]
    fn email_shape() {
        assert!(is_valid_email("a@b.co"));
        assert!(is_valid_email("foo@bar.com"));
        assert!(!is_valid_email("foo@bar"));
        assert!(!is_valid_email("foobar.com"));
        assert!(!is_valid_email("foo@.com"));
        assert!(!is_valid_email("foo@bar."));
        assert!(!is_valid_email("@bar.com"));
    }

    #[test]
    fn valid_email_clears_previous_error_on_next_pass() {
        let mut wizard = RegistrationWizard::new();
        wizard.update_field(Field::FullName, "Ada");
        wizard.update_field(Field::Phone, "555");
        wizard.update_field(Field::Email, "foo@bar");

        assert!(!wizard.next_step());
        assert_eq!(wizard.current_state().errors[&Field::Email], "Please enter a valid email address");

        // Editing clears the error immediately; the next pass keeps it clear.
        wizard.update_field(Field::Email, "a@b.co");
        assert!(wizard.current_state().errors.is_empty());
        assert!(wizard.next_step());
        assert!(wizard.current_state().errors.is_empty());
        assert_eq!(wizard.current_state().step, WizardStep::Preferences);
    }

    #[test]
    fn editing_a_field_clears_only_its_own_error() {
        let mut wizard = RegistrationWizard::new();
        wizard.update_field(Field::FullName, "Ada");
        assert!(!wizard.next_step());
        assert!(wizard.current_state().errors.contains_key(&Field::Email));
        assert!(wizard.current_state().errors.contains_key(&Field::Phone));

        wizard.update_field(Field::Email, "x");

        let remaining: Vec<Field> = wizard.current_state().errors.keys().copied().collect();
        assert_eq!(remaining, vec![Field::Phone]);
        assert_eq!(wizard.current_state().data.email, "x");
    }

    #[test]
    fn step_two_requires_known_choices() {
        let mut wizard = RegistrationWizard::new();
        filled_basics(&mut wizard);
        assert!(wizard.next_step());

        wizard.update_field(Field::AutomationExperience, "guru");
        assert!(!wizard.next_step());
        assert_eq!(wizard.current_state().step, WizardStep::Preferences);
        assert_eq!(
            wizard.current_state().errors[&Field::AutomationExperience],
            "Please select your experience level"
        );
        assert_eq!(wizard.current_state().errors[&Field::CourseGoal], "Please select your primary goal");

        filled_preferences(&mut wizard);
        assert!(wizard.next_step());
        assert_eq!(wizard.current_state().step, WizardStep::Review);
    }

    #[test]
    fn every_enumerated_choice_is_accepted() {
        for level in ExperienceLevel::ALL {
            for goal in CourseGoal::ALL {
                let data = FormData {
                    automation_experience: level.as_str().to_string(),
                    course_goal: goal.as_str().to_string(),
                    ..FormData::default()
                };
                assert!(validate(WizardStep::Preferences, &data).is_empty());
            }
        }
    }

    #[test]
    fn steps_are_clamped_at_both_ends() {
        let mut wizard = RegistrationWizard::new();
        wizard.prev_step();
        assert_eq!(wizard.current_state().step.number(), 1);

        filled_basics(&mut wizard);
        filled_preferences(&mut wizard);
        assert!(wizard.next_step());
        assert!(wizard.next_step());
        assert!(wizard.next_step());
        assert_eq!(wizard.current_state().step.number(), 3);
    }

    #[test]
    fn going_back_keeps_existing_errors() {
        let mut wizard = RegistrationWizard::new();
        filled_basics(&mut wizard);
        assert!(wizard.next_step());
        assert!(!wizard.next_step());
        let errors = wizard.current_state().errors;

        wizard.prev_step();
        assert_eq!(wizard.current_state().step, WizardStep::Basics);
        assert_eq!(wizard.current_state().errors, errors);

        // A fresh pass of step one replaces the stale step-two errors.
        assert!(wizard.next_step());
        assert!(wizard.current_state().errors.is_empty());
    }

    #[test]
    fn submit_requires_review_step_and_terms() {
        let mut wizard = RegistrationWizard::new();
        assert_eq!(wizard.submit(), Err(SubmitError::NotOnReviewStep));

        filled_basics(&mut wizard);
        filled_preferences(&mut wizard);
        wizard.update_field(Field::Company, "Analytical Engines Ltd");
        wizard.next_step();
        wizard.next_step();
        assert_eq!(wizard.submit(), Err(SubmitError::TermsNotAccepted));

        wizard.set_terms_accepted(true);
        let data = wizard.submit().unwrap();
        assert_eq!(data.full_name, "Ada Lovelace");
        assert_eq!(data.company, "Analytical Engines Ltd");
        assert_eq!(data.course_goal, "build-agents");
    }

    #[test]
    fn subscribers_receive_snapshots_in_dispatch_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut wizard = RegistrationWizard::new();
        {
            let seen = seen.clone();
            wizard.subscribe(Callback::from(move |snapshot: WizardSnapshot| {
                seen.borrow_mut().push((snapshot.step.number(), snapshot.errors.len()))
            }));
        }

        wizard.dispatch(WizardEvent::Next);
        filled_basics(&mut wizard);
        wizard.dispatch(WizardEvent::Next);

        let seen = seen.borrow();
        assert_eq!(seen.first(), Some(&(1, 3)));
        assert_eq!(seen.last(), Some(&(2, 0)));
        assert_eq!(seen.len(), 5);
    }

    #[test]
    fn progress_tracks_the_step() {
        let mut wizard = RegistrationWizard::new();
        assert_eq!(wizard.current_state().progress_percent(), 33);
        filled_basics(&mut wizard);
        wizard.next_step();
        assert_eq!(wizard.current_state().progress_percent(), 67);
        filled_preferences(&mut wizard);
        wizard.next_step();
        assert_eq!(wizard.current_state().progress_percent(), 100);
    }
}
