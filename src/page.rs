use askama::Template as _;

use crate::catalog::Catalog;
use crate::html;
use crate::templates;

pub const PAGE_TITLE: &str = "Extracurricular Activities";
pub const PLACEHOLDER_OPTION: &str = "-- Select an activity --";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListRegion {
    Loading,
    Cards(Vec<ActivityCard>),
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityCard {
    pub name: String,
    pub description: String,
    pub schedule: String,
    pub spots_left: i64,
    pub participants: Vec<ParticipantRow>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantRow {
    pub email: String,
    pub activity: String,
    pub initials: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignupForm {
    pub email: String,
    pub activity: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Success,
    Error,
}

impl MessageKind {
    pub fn as_class(self) -> &'static str {
        match self {
            MessageKind::Success => "success",
            MessageKind::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub kind: Option<MessageKind>,
    pub hidden: bool,
}

impl Default for StatusMessage {
    fn default() -> Self {
        Self {
            text: String::new(),
            kind: None,
            hidden: true,
        }
    }
}

impl StatusMessage {
    pub fn class_name(&self) -> String {
        match (self.kind, self.hidden) {
            (Some(kind), true) => format!("{} hidden", kind.as_class()),
            (Some(kind), false) => kind.as_class().to_string(),
            (None, true) => "hidden".to_string(),
            (None, false) => String::new(),
        }
    }
}

/// Handle for a rendered delete button, carrying the data it was drawn with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteControl {
    pub email: String,
    pub activity: String,
}

/// Everything the person using the board can see or edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub list: ListRegion,
    pub activity_options: Vec<SelectOption>,
    pub signup_form: SignupForm,
    pub message: StatusMessage,
    pub delete_controls: Vec<DeleteControl>,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            list: ListRegion::Loading,
            activity_options: Vec::new(),
            signup_form: SignupForm::default(),
            message: StatusMessage::default(),
            delete_controls: Vec::new(),
        }
    }
}

impl Page {
    /// Replace the list and the select options with a freshly fetched catalog.
    ///
    /// Rebuilding the select drops its selection back to the placeholder.
    /// Controls bound to the old cards are gone afterwards; call
    /// [`Page::bind_delete_controls`] to attach the new ones.
    pub fn draw_catalog(&mut self, catalog: &Catalog) {
        let cards = catalog
            .iter()
            .map(|(name, activity)| ActivityCard {
                name: name.to_string(),
                description: activity.description.clone(),
                schedule: activity.schedule.clone(),
                spots_left: activity.spots_left(),
                participants: activity
                    .participants
                    .iter()
                    .map(|email| ParticipantRow {
                        email: email.clone(),
                        activity: name.to_string(),
                        initials: html::initials(email),
                    })
                    .collect(),
            })
            .collect();
        self.list = ListRegion::Cards(cards);
        self.delete_controls.clear();

        self.activity_options = std::iter::once(SelectOption {
            value: String::new(),
            label: PLACEHOLDER_OPTION.to_string(),
        })
        .chain(catalog.iter().map(|(name, _)| SelectOption {
            value: name.to_string(),
            label: name.to_string(),
        }))
        .collect();
        self.signup_form.activity.clear();
    }

    /// Show the load failure in the list region. The select control keeps
    /// whatever options it had.
    pub fn draw_load_failure(&mut self) {
        self.list = ListRegion::Failed;
        self.delete_controls.clear();
    }

    pub fn bind_delete_controls(&mut self) {
        self.delete_controls = self
            .cards()
            .iter()
            .flat_map(|card| card.participants.iter())
            .map(|row| DeleteControl {
                email: row.email.clone(),
                activity: row.activity.clone(),
            })
            .collect();
    }

    pub fn delete_control(&self, activity: &str, email: &str) -> Option<&DeleteControl> {
        self.delete_controls
            .iter()
            .find(|control| control.activity == activity && control.email == email)
    }

    pub fn cards(&self) -> &[ActivityCard] {
        match &self.list {
            ListRegion::Cards(cards) => cards.as_slice(),
            ListRegion::Loading | ListRegion::Failed => &[],
        }
    }

    pub fn show_message(&mut self, text: impl Into<String>, kind: MessageKind) {
        self.message = StatusMessage {
            text: text.into(),
            kind: Some(kind),
            hidden: false,
        };
    }

    pub fn hide_message(&mut self) {
        self.message.hidden = true;
    }

    pub fn reset_signup_form(&mut self) {
        self.signup_form = SignupForm::default();
    }

    /// Markup of the activity list region.
    pub fn list_html(&self) -> askama::Result<String> {
        templates::ActivityListTemplate {
            loading: matches!(self.list, ListRegion::Loading),
            failed: matches!(self.list, ListRegion::Failed),
            cards: self.cards(),
        }
        .render()
    }

    /// The whole document: list region, signup form and status message.
    pub fn to_html(&self) -> askama::Result<String> {
        let options = self
            .activity_options
            .iter()
            .map(|option| templates::OptionView {
                value: &option.value,
                label: &option.label,
                selected: !option.value.is_empty() && option.value == self.signup_form.activity,
            })
            .collect();
        templates::IndexTemplate {
            title: PAGE_TITLE,
            loading: matches!(self.list, ListRegion::Loading),
            failed: matches!(self.list, ListRegion::Failed),
            cards: self.cards(),
            options,
            email: &self.signup_form.email,
            message: &self.message.text,
            message_class: self.message.class_name(),
        }
        .render()
    }
}
