//! HTML form parsing and submission data
//!
//! The login and team-selection steps both work by filling in a form the
//! portal served and posting it back with all of its hidden controls intact.

use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::errors::{AuthError, AuthResult};

/// How a form is submitted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMethod {
    Get,
    Post,
}

/// A `<select>` control and the option values it offers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectField {
    pub name: String,
    pub options: Vec<String>,
    pub selected: Option<String>,
}

/// A named form parsed out of a page
#[derive(Debug, Clone)]
pub struct HtmlForm {
    name: String,
    action: Option<String>,
    method: FormMethod,
    fields: Vec<(String, String)>,
    selects: Vec<SelectField>,
    buttons: Vec<(String, String)>,
    clicked: Option<(String, String)>,
}

impl HtmlForm {
    /// Find the form with the given `name` attribute
    pub fn find(document: &Html, name: &str) -> Option<Self> {
        let selector = Selector::parse(&format!("form[name='{}']", name)).ok()?;
        let form = document.select(&selector).next()?;
        Self::from_element(name, form)
    }

    fn from_element(name: &str, form: ElementRef<'_>) -> Option<Self> {
        let action = form
            .value()
            .attr("action")
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .map(str::to_string);
        let method = match form.value().attr("method") {
            Some(m) if m.eq_ignore_ascii_case("get") => FormMethod::Get,
            _ => FormMethod::Post,
        };

        let mut fields = Vec::new();
        let mut buttons = Vec::new();
        let mut selects = Vec::new();

        let input_selector = Selector::parse("input[name], button[name]").ok()?;
        let select_selector = Selector::parse("select[name]").ok()?;
        let option_selector = Selector::parse("option").ok()?;

        for control in form.select(&input_selector) {
            let element = control.value();
            let Some(control_name) = element.attr("name") else {
                continue;
            };
            let value = element.attr("value").unwrap_or_default().to_string();
            let kind = element
                .attr("type")
                .unwrap_or(if element.name() == "button" { "submit" } else { "text" })
                .to_ascii_lowercase();

            match kind.as_str() {
                "submit" | "image" => buttons.push((control_name.to_string(), value)),
                "button" | "reset" | "file" => {}
                "checkbox" | "radio" => {
                    if element.attr("checked").is_some() {
                        let value = if value.is_empty() { "on".to_string() } else { value };
                        fields.push((control_name.to_string(), value));
                    }
                }
                _ => fields.push((control_name.to_string(), value)),
            }
        }

        for select in form.select(&select_selector) {
            let Some(select_name) = select.value().attr("name") else {
                continue;
            };
            let mut options = Vec::new();
            let mut selected = None;
            for option in select.select(&option_selector) {
                let value = option
                    .value()
                    .attr("value")
                    .map(str::to_string)
                    .unwrap_or_else(|| option.text().collect::<String>().trim().to_string());
                if option.value().attr("selected").is_some() && selected.is_none() {
                    selected = Some(value.clone());
                }
                options.push(value);
            }
            if selected.is_none() {
                selected = options.first().cloned();
            }
            selects.push(SelectField {
                name: select_name.to_string(),
                options,
                selected,
            });
        }

        Some(Self {
            name: name.to_string(),
            action,
            method,
            fields,
            selects,
            buttons,
            clicked: None,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn method(&self) -> FormMethod {
        self.method
    }

    pub fn selects(&self) -> &[SelectField] {
        &self.selects
    }

    /// Current value of a text-like control
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Set a text-like control, adding it when the markup lacked a value
    pub fn set_field(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.fields.iter_mut().find(|(n, _)| n == name) {
            Some(entry) => entry.1 = value,
            None => self.fields.push((name.to_string(), value)),
        }
    }

    /// Choose an option of a `<select>`
    ///
    /// # Errors
    ///
    /// `MissingFormControl` if there is no such select, `TeamNotFound` if the
    /// value is not among its options.
    pub fn select_option(&mut self, select_name: &str, value: &str) -> AuthResult<()> {
        let form = self.name.clone();
        let select = self
            .selects
            .iter_mut()
            .find(|s| s.name == select_name)
            .ok_or_else(|| AuthError::MissingFormControl {
                form,
                control: select_name.to_string(),
            })?;
        if !select.options.iter().any(|o| o == value) {
            return Err(AuthError::TeamNotFound {
                team_id: value.to_string(),
            });
        }
        select.selected = Some(value.to_string());
        Ok(())
    }

    /// Mark a submit button as the one used to submit the form
    pub fn click_button(&mut self, button_name: &str) -> AuthResult<()> {
        let button = self
            .buttons
            .iter()
            .find(|(n, _)| n == button_name)
            .cloned()
            .ok_or_else(|| AuthError::MissingFormControl {
                form: self.name.clone(),
                control: button_name.to_string(),
            })?;
        self.clicked = Some(button);
        Ok(())
    }

    /// Absolute submission URL; a missing action submits to the page itself
    pub fn action_url(&self, base: &Url) -> Option<Url> {
        match &self.action {
            Some(action) => base.join(action).ok(),
            None => Some(base.clone()),
        }
    }

    /// Name/value pairs in submission order
    pub fn into_pairs(self) -> Vec<(String, String)> {
        let mut pairs = self.fields;
        pairs.extend(
            self.selects
                .into_iter()
                .filter_map(|s| s.selected.map(|value| (s.name, value))),
        );
        if let Some(button) = self.clicked {
            pairs.push(button);
        }
        pairs
    }
}
