use std::borrow::Cow;
use std::collections::BTreeMap;

use crate::model::SectionKind;

/// User-visible captions. English defaults, any key overridable by the input document.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Labels {
    overrides: BTreeMap<String, String>,
}

fn default_label(key: &str) -> Option<&'static str> {
    let label = match key {
        "work" => "Work Experience",
        "education" => "Education",
        "skills" => "Skills",
        "languages" => "Languages",
        "hobbies" => "Hobbies",
        "courses" => "Courses",
        "internships" => "Internships",
        "traits" => "Traits",
        "certifications" => "Certifications",
        "current" => "Present",
        "details" => "Personal details",
        "birthDate" => "Date of birth",
        "birthplace" => "Place of birth",
        "license" => "Driver's license",
        "gender" => "Gender",
        "nationality" => "Nationality",
        "maritalStatus" => "Marital status",
        "yes" => "Yes",
        "no" => "No",
        "male" => "Male",
        "female" => "Female",
        "single" => "Single",
        "married" => "Married",
        "cohabiting" => "Cohabiting",
        "divorced" => "Divorced",
        "widowed" => "Widowed",
        _ => return None,
    };
    Some(label)
}

impl Labels {
    pub fn with_overrides(overrides: BTreeMap<String, String>) -> Self {
        Self { overrides }
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.overrides.insert(key.into(), value.into());
    }

    pub fn lookup(&self, key: &str) -> Option<&str> {
        self.overrides
            .get(key)
            .map(String::as_str)
            .or_else(|| default_label(key))
    }

    /// Caption for `key`, or the key itself.
    pub fn get<'a>(&'a self, key: &'a str) -> &'a str {
        self.lookup(key).unwrap_or(key)
    }

    pub fn section_title(&self, kind: SectionKind) -> &str {
        self.get(kind.key())
    }

    /// Known values are translated; anything else is shown capitalised.
    pub fn display_value<'a>(&'a self, value: &'a str) -> Cow<'a, str> {
        match self.lookup(value) {
            Some(label) => Cow::Borrowed(label),
            None => capitalize(value),
        }
    }
}

pub fn capitalize(s: &str) -> Cow<'_, str> {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) if !first.is_uppercase() => {
            let mut out: String = first.to_uppercase().collect();
            out.push_str(chars.as_str());
            Cow::Owned(out)
        }
        _ => Cow::Borrowed(s),
    }
}
