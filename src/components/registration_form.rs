use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

use crate::funnel::pricing::{PriceTier, EARLY_BIRD_SAVINGS, STANDARD_PRICE};
use crate::funnel::wizard::{
    CourseGoal, ExperienceLevel, Field, FormData, RegistrationWizard, WizardEvent, WizardStep,
};

#[derive(Properties, PartialEq)]
pub struct RegistrationFormProps {
    pub on_submit: Callback<FormData>,
    pub tier: PriceTier,
    #[prop_or_default]
    pub is_loading: bool,
}

fn field_class(has_error: bool) -> &'static str {
    if has_error {
        "form-input input-error"
    } else {
        "form-input"
    }
}

#[function_component]
pub fn RegistrationForm(props: &RegistrationFormProps) -> Html {
    let wizard = use_mut_ref(RegistrationWizard::new);
    let snapshot = {
        let wizard = wizard.clone();
        use_state(move || wizard.borrow().current_state())
    };

    {
        let wizard = wizard.clone();
        let snapshot = snapshot.clone();
        use_effect_with_deps(
            move |_| {
                let id = wizard
                    .borrow_mut()
                    .subscribe(Callback::from(move |state| snapshot.set(state)));
                move || wizard.borrow_mut().unsubscribe(id)
            },
            (),
        );
    }

    let dispatch = {
        let wizard = wizard.clone();
        Callback::from(move |event: WizardEvent| {
            wizard.borrow_mut().dispatch(event);
        })
    };

    let text_input = |field: Field| {
        let dispatch = dispatch.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            dispatch.emit(WizardEvent::UpdateField(field, input.value()));
        })
    };

    let on_experience = {
        let dispatch = dispatch.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            dispatch.emit(WizardEvent::UpdateField(Field::AutomationExperience, select.value()));
        })
    };

    let on_goal = {
        let dispatch = dispatch.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            dispatch.emit(WizardEvent::UpdateField(Field::CourseGoal, input.value()));
        })
    };

    let on_terms = {
        let dispatch = dispatch.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            dispatch.emit(WizardEvent::SetTermsAccepted(input.checked()));
        })
    };

    let on_next = {
        let dispatch = dispatch.clone();
        Callback::from(move |_: MouseEvent| dispatch.emit(WizardEvent::Next))
    };

    let on_previous = {
        let dispatch = dispatch.clone();
        Callback::from(move |_: MouseEvent| dispatch.emit(WizardEvent::Previous))
    };

    let on_pay = {
        let wizard = wizard.clone();
        let on_submit = props.on_submit.clone();
        Callback::from(move |_: MouseEvent| {
            let submitted = wizard.borrow().submit();
            match submitted {
                Ok(data) => on_submit.emit(data),
                Err(e) => log::warn!("Registration not submitted: {}", e),
            }
        })
    };

    let state = &*snapshot;
    let data = &state.data;
    let error_line = |field: Field| match state.error(field) {
        Some(message) => html! { <p class="field-error">{message.to_string()}</p> },
        None => html! {},
    };

    let step_view = match state.step {
        WizardStep::Basics => html! {
            <div class="wizard-step">
                <div class="wizard-heading">
                    <h2>{"Let's Get Started"}</h2>
                    <p>{"Tell us a bit about yourself to personalize your experience"}</p>
                </div>
                <label for="full_name">{"Full Name *"}</label>
                <input id="full_name"
                    class={field_class(state.error(Field::FullName).is_some())}
                    value={data.full_name.clone()}
                    oninput={text_input(Field::FullName)}
                    placeholder="Enter your full name" />
                { error_line(Field::FullName) }

                <label for="email">{"Email Address *"}</label>
                <input id="email" type="email"
                    class={field_class(state.error(Field::Email).is_some())}
                    value={data.email.clone()}
                    oninput={text_input(Field::Email)}
                    placeholder="Enter your email address" />
                { error_line(Field::Email) }

                <label for="phone">{"Phone Number *"}</label>
                <input id="phone" type="tel"
                    class={field_class(state.error(Field::Phone).is_some())}
                    value={data.phone.clone()}
                    oninput={text_input(Field::Phone)}
                    placeholder="Enter your phone number" />
                { error_line(Field::Phone) }

                <label for="company">{"Company Name (Optional)"}</label>
                <input id="company" class="form-input"
                    value={data.company.clone()}
                    oninput={text_input(Field::Company)}
                    placeholder="Enter your company name" />

                <div class="wizard-actions end">
                    <button class="primary-button" onclick={on_next.clone()}>{"Next Step →"}</button>
                </div>
            </div>
        },
        WizardStep::Preferences => html! {
            <div class="wizard-step">
                <div class="wizard-heading">
                    <h2>{"Course Preferences"}</h2>
                    <p>{"Help us tailor the content to your needs"}</p>
                </div>
                <label for="automation_experience">{"What's your current automation experience level? *"}</label>
                <select id="automation_experience"
                    class={field_class(state.error(Field::AutomationExperience).is_some())}
                    onchange={on_experience}>
                    <option value="" selected={data.automation_experience.is_empty()} disabled=true>
                        {"Select your experience level"}
                    </option>
                    { for ExperienceLevel::ALL.iter().map(|level| html! {
                        <option value={level.as_str()} selected={data.automation_experience == level.as_str()}>
                            {level.label()}
                        </option>
                    }) }
                </select>
                { error_line(Field::AutomationExperience) }

                <fieldset class="goal-group">
                    <legend>{"What's your primary goal for taking this course? *"}</legend>
                    { for CourseGoal::ALL.iter().map(|goal| html! {
                        <label class="goal-option" for={goal.as_str()}>
                            <input type="radio" name="course_goal"
                                id={goal.as_str()}
                                value={goal.as_str()}
                                checked={data.course_goal == goal.as_str()}
                                onchange={on_goal.clone()} />
                            {goal.label()}
                        </label>
                    }) }
                </fieldset>
                { error_line(Field::CourseGoal) }

                <div class="wizard-actions">
                    <button class="outline-button" onclick={on_previous.clone()}>{"← Previous"}</button>
                    <button class="primary-button" onclick={on_next}>{"Next Step →"}</button>
                </div>
            </div>
        },
        WizardStep::Review => {
            let experience = ExperienceLevel::parse(&data.automation_experience)
                .map(|level| level.label().to_string())
                .unwrap_or_else(|| data.automation_experience.clone());
            html! {
                <div class="wizard-step">
                    <div class="wizard-heading">
                        <h2>{"Complete Your Registration"}</h2>
                        <p>{"Review your information and complete payment"}</p>
                    </div>

                    <div class="summary-box">
                        <h3>{"Course Summary"}</h3>
                        <p><strong>{"Course: "}</strong>{"N8N Automations: From Beginner to Advanced + Agent Creation"}</p>
                        <p><strong>{"Date: "}</strong>{"July 24, 2025"}</p>
                        <p><strong>{"Time: "}</strong>{"3:00 PM - 6:00 PM EDT"}</p>
                        <p><strong>{"Format: "}</strong>{"Live Online Workshop (Zoom)"}</p>
                        <p><strong>{"Includes: "}</strong>{"3-hour intensive training, course materials, recording access"}</p>
                    </div>

                    <div class="summary-box">
                        <h3>{"Your Information"}</h3>
                        <p><strong>{"Name: "}</strong>{data.full_name.clone()}</p>
                        <p><strong>{"Email: "}</strong>{data.email.clone()}</p>
                        <p><strong>{"Phone: "}</strong>{data.phone.clone()}</p>
                        if !data.company.trim().is_empty() {
                            <p><strong>{"Company: "}</strong>{data.company.clone()}</p>
                        }
                        <p><strong>{"Experience: "}</strong>{experience}</p>
                    </div>

                    <div class="price-box">
                        <div>
                            <p class="price-label">{props.tier.label()}</p>
                            if props.tier == PriceTier::EarlyBird {
                                <p class="price-note">{format!("Save ${} off regular price", EARLY_BIRD_SAVINGS)}</p>
                            }
                        </div>
                        <div class="price-amount">
                            <p class="price-now">{format!("${}", props.tier.amount())}</p>
                            if props.tier == PriceTier::EarlyBird {
                                <p class="price-was">{format!("${}", STANDARD_PRICE)}</p>
                            }
                        </div>
                    </div>

                    <label class="terms-option" for="terms">
                        <input type="checkbox" id="terms" checked={state.terms_accepted} onchange={on_terms} />
                        {"I agree to the terms and conditions and refund policy *"}
                    </label>

                    <div class="wizard-actions">
                        <button class="outline-button" onclick={on_previous}>{"← Previous"}</button>
                        <button class="pay-button"
                            onclick={on_pay}
                            disabled={!state.terms_accepted || props.is_loading}>
                            if props.is_loading {
                                {"Processing..."}
                            } else {
                                {format!("Pay Now - ${}", props.tier.amount())}
                            }
                        </button>
                    </div>
                </div>
            }
        }
    };

    html! {
        <div class="registration-form">
            <div class="wizard-progress">
                <div class="wizard-progress-labels">
                    <span>{format!("Step {} of {}", state.step.number(), WizardStep::COUNT)}</span>
                    <span>{format!("{}% Complete", state.progress_percent())}</span>
                </div>
                <div class="wizard-progress-track">
                    <div class="wizard-progress-bar" style={format!("width: {}%", state.progress_percent())}></div>
                </div>
            </div>
            { step_view }
        </div>
    }
}
