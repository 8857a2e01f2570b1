use askama::Template;

use crate::page::ActivityCard;

#[derive(Template)]
#[template(path = "activities_list.html", escape = "none")]
pub(crate) struct ActivityListTemplate<'a> {
    pub(crate) loading: bool,
    pub(crate) failed: bool,
    pub(crate) cards: &'a [ActivityCard],
}

#[derive(Template)]
#[template(path = "index.html", escape = "none")]
pub(crate) struct IndexTemplate<'a> {
    pub(crate) title: &'a str,
    pub(crate) loading: bool,
    pub(crate) failed: bool,
    pub(crate) cards: &'a [ActivityCard],
    pub(crate) options: Vec<OptionView<'a>>,
    pub(crate) email: &'a str,
    pub(crate) message: &'a str,
    pub(crate) message_class: String,
}

pub(crate) struct OptionView<'a> {
    pub(crate) value: &'a str,
    pub(crate) label: &'a str,
    pub(crate) selected: bool,
}

// Templates opt out of askama's escaper; every interpolated server string goes
// through this filter instead.
mod filters {
    pub fn escape_html<T: std::fmt::Display>(
        value: T,
        _values: &dyn askama::Values,
    ) -> askama::Result<String> {
        Ok(crate::html::escape_html(&value.to_string()))
    }
}
