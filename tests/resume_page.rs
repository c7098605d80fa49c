use resume_particles::error::DataError;
use resume_particles::page::{self, Page, CONTACT_ID, EXPERIENCE_ID, SKILLS_ID, TOOLS_ID};
use resume_particles::resume::ResumeData;

fn page_for(text: &str) -> Page {
    match ResumeData::from_yaml(text) {
        Ok(data) => page::build(&data),
        Err(_) => Page::default(),
    }
}

#[test]
fn unusable_data_leaves_the_page_untouched() {
    for text in ["", "~", "null", "- just\n- a list\n", "name: [broken", "42"] {
        let page = page_for(text);
        assert!(page.is_empty(), "{text:?} produced {page:?}");
    }
}

#[test]
fn partial_data_fills_only_present_regions() {
    let page = page_for("name: Ada\nskills: [Rust, Zig]\n");

    assert_eq!(page.text, vec![("name", "Ada".to_string())]);
    assert_eq!(page.sections.len(), 1);
    assert_eq!(page.section(SKILLS_ID).unwrap().items.len(), 2);
    assert!(page.section(EXPERIENCE_ID).is_none());
    assert!(page.section(CONTACT_ID).is_none());
}

#[test]
fn malformed_items_are_dropped_individually() {
    let text = r#"
experience:
  - role: Engineer
    company: Acme
    duration: 2020 - 2023
  - 17
  - role: Lead
    details: [Hired the team]
tools:
  - []
  - Docker
"#;
    let data = ResumeData::from_yaml(text).unwrap();
    assert_eq!(data.experience.len(), 2);
    assert_eq!(data.tools.len(), 1);

    let page = page::build(&data);
    let items = &page.section(EXPERIENCE_ID).unwrap().items;
    assert_eq!(items[0].class, Some("timeline-item no-details"));
    assert_eq!(items[1].class, Some("timeline-item"));
    assert!(items[1].find_class("item-subtitle").is_none());
    assert_eq!(page.section(TOOLS_ID).unwrap().items.len(), 1);
}

#[test]
fn parse_errors_keep_their_cause() {
    let err = ResumeData::from_yaml("contact: {email: a@b.c").unwrap_err();
    assert!(matches!(err, DataError::Parse(_)));
    assert!(err.to_string().starts_with("failed to parse YAML"));
}
