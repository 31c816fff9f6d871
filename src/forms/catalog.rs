use std::sync::Arc;

use super::schema::{ChoiceOption, FieldSpec, FormSchema};

/// The set of forms this deployment serves.
///
/// Schemas are plain data: the standard catalog below mirrors the three
/// forms published on the brochure site, and callers may build their own
/// catalog for other deployments.
#[derive(Debug, Clone)]
pub struct FormCatalog {
    forms: Vec<Arc<FormSchema>>,
}

impl FormCatalog {
    pub fn new(forms: Vec<FormSchema>) -> Self {
        Self {
            forms: forms.into_iter().map(Arc::new).collect(),
        }
    }

    /// Contact, course application, and careers forms as published on the
    /// site, all submitting through the given access key.
    pub fn standard(access_key: &str) -> Self {
        Self::new(vec![
            contact_form(access_key),
            application_form(access_key),
            careers_form(access_key),
        ])
    }

    pub fn get(&self, slug: &str) -> Option<&Arc<FormSchema>> {
        self.forms.iter().find(|schema| schema.slug == slug)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<FormSchema>> {
        self.forms.iter()
    }

    pub fn len(&self) -> usize {
        self.forms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forms.is_empty()
    }
}

fn contact_form(access_key: &str) -> FormSchema {
    let departments = vec![
        ChoiceOption::new("general", "General Inquiry"),
        ChoiceOption::new("admissions", "Admissions"),
        ChoiceOption::new("courses", "Course Information"),
        ChoiceOption::new("support", "Student Support"),
        ChoiceOption::new("careers", "Careers"),
        ChoiceOption::new("partnerships", "Partnerships"),
    ];

    FormSchema {
        slug: "contact".to_string(),
        subject: "New Contact Form Submission".to_string(),
        access_key: access_key.to_string(),
        success_message: "Thank you! Your message has been sent successfully. \
                          We'll get back to you within 24 hours."
            .to_string(),
        fields: vec![
            FieldSpec::text("firstName", "First Name").required(),
            FieldSpec::text("lastName", "Last Name").required(),
            FieldSpec::email("email", "Email Address").required(),
            FieldSpec::phone("phone", "Phone Number"),
            FieldSpec::choice("department", "Department", departments),
            FieldSpec::text("subjectField", "Subject").required(),
            FieldSpec::multi_line("message", "Message").required(),
        ],
    }
}

fn application_form(access_key: &str) -> FormSchema {
    let course_levels = vec![
        ChoiceOption::new("level2", "Level 2 Diploma"),
        ChoiceOption::new("level3", "Level 3 Diploma"),
        ChoiceOption::new("level4", "Level 4 Diploma"),
        ChoiceOption::new("level5", "Level 5 Diploma"),
    ];

    let courses = vec![
        ChoiceOption::new("health-social-care-l2", "Health and Social Care Level 2"),
        ChoiceOption::new("health-social-care-l3", "Health and Social Care Level 3"),
        ChoiceOption::new("health-social-care-l4", "Health and Social Care Level 4"),
        ChoiceOption::new("health-social-care-l5", "Health and Social Care Level 5"),
        ChoiceOption::new("adult-care-l2", "Diploma in Adult Care Level 2"),
        ChoiceOption::new("adult-care-l3", "Diploma in Adult Care Level 3"),
    ];

    FormSchema {
        slug: "application".to_string(),
        subject: "New Application Form Submission".to_string(),
        access_key: access_key.to_string(),
        success_message: "Thank you! Your application has been submitted successfully. \
                          We'll review it and contact you within 3 working days."
            .to_string(),
        fields: vec![
            FieldSpec::text("firstName", "First Name").required(),
            FieldSpec::text("lastName", "Last Name").required(),
            FieldSpec::email("email", "Email Address").required(),
            FieldSpec::phone("phone", "Phone Number").required(),
            FieldSpec::multi_line("address", "Full Address").required(),
            FieldSpec::date("dateOfBirth", "Date of Birth").required(),
            FieldSpec::text("nationality", "Nationality").required(),
            FieldSpec::choice("courseLevel", "Course Level", course_levels).required(),
            FieldSpec::choice("specificCourse", "Specific Course", courses).required(),
            FieldSpec::date("startDate", "Preferred Start Date").required(),
            FieldSpec::multi_line("education", "Educational Background").required(),
            FieldSpec::multi_line("workExperience", "Work Experience"),
            FieldSpec::multi_line("motivation", "Why do you want to study this course?")
                .required(),
            FieldSpec::multi_line("support", "Do you require any additional support?")
                .required(),
            FieldSpec::multi_line("funding", "How will you fund your studies?").required(),
            FieldSpec::checkbox("terms", "Terms and Conditions").required(),
            FieldSpec::checkbox("marketing", "Marketing Communications"),
        ],
    }
}

fn careers_form(access_key: &str) -> FormSchema {
    let positions = vec![
        ChoiceOption::new("tutor-health-social-care", "Tutor - Health and Social Care"),
        ChoiceOption::new("speculative", "Speculative Application"),
    ];

    FormSchema {
        slug: "careers".to_string(),
        subject: "New Careers Application Form Submission".to_string(),
        access_key: access_key.to_string(),
        success_message: "Thank you! Your application has been submitted successfully. \
                          We'll review it and contact you within 5 working days."
            .to_string(),
        fields: vec![
            FieldSpec::text("firstName", "First Name").required(),
            FieldSpec::text("lastName", "Last Name").required(),
            FieldSpec::email("email", "Email Address").required(),
            FieldSpec::phone("phone", "Phone Number").required(),
            FieldSpec::choice("position", "Position Applied For", positions).required(),
            FieldSpec::multi_line("experience", "Relevant Experience").required(),
            FieldSpec::multi_line("motivation", "Why do you want to work at LCAS?").required(),
            FieldSpec::multi_line("availability", "Availability"),
        ],
    }
}
