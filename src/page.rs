//! Pure view of the resume: element trees keyed by the id of the page
//! element they fill. Nothing here touches the DOM.

use crate::resume::{ContactEntry, Education, Experience, ResumeData, Tool};

pub const NAME_ID: &str = "name";
pub const TITLE_ID: &str = "title";
pub const TAGLINE_ID: &str = "tagline";
pub const CONTACT_ID: &str = "contact";
pub const EXPERIENCE_ID: &str = "experience-list";
pub const EDUCATION_ID: &str = "education-list";
pub const SKILLS_ID: &str = "skills-list";
pub const TOOLS_ID: &str = "tools-list";

const META_SEPARATOR: &str = " · ";

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ViewNode {
    pub tag: &'static str,
    pub class: Option<&'static str>,
    pub text: Option<String>,
    pub attributes: Vec<(&'static str, String)>,
    pub children: Vec<ViewNode>,
    /// Clicking this node toggles `expanded` on its next sibling.
    pub toggles_next_sibling: bool,
}

impl ViewNode {
    fn div(class: &'static str) -> ViewNode {
        ViewNode {
            tag: "div",
            class: Some(class),
            ..ViewNode::default()
        }
    }

    fn text_div(class: &'static str, text: Option<&String>) -> Option<ViewNode> {
        text.map(|t| ViewNode::div(class).with_text(t.clone()))
    }

    fn with_text(mut self, text: String) -> ViewNode {
        self.text = Some(text);
        self
    }

    fn with_children(mut self, children: Vec<ViewNode>) -> ViewNode {
        self.children = children;
        self
    }

    pub fn find_class(&self, class: &str) -> Option<&ViewNode> {
        if self.class == Some(class) {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find_class(class))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Section {
    pub target: &'static str,
    pub items: Vec<ViewNode>,
}

/// Text assignments for header fields and item lists for the rest. Fields
/// absent from the data are absent here, leaving the page's placeholders.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Page {
    pub text: Vec<(&'static str, String)>,
    pub sections: Vec<Section>,
}

impl Page {
    pub fn section(&self, target: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.target == target)
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.sections.is_empty()
    }
}

pub fn build(data: &ResumeData) -> Page {
    let mut page = Page::default();

    for (target, value) in [
        (NAME_ID, &data.name),
        (TITLE_ID, &data.title),
        (TAGLINE_ID, &data.tagline),
    ] {
        if let Some(value) = value {
            page.text.push((target, value.clone()));
        }
    }

    let sections = [
        (CONTACT_ID, data.contact.iter().map(contact_link).collect::<Vec<_>>()),
        (EXPERIENCE_ID, data.experience.iter().map(timeline_item).collect()),
        (EDUCATION_ID, data.education.iter().map(education_item).collect()),
        (SKILLS_ID, data.skills.iter().map(|s| skill_item(s)).collect()),
        (TOOLS_ID, data.tools.iter().map(tool_item).collect()),
    ];
    for (target, items) in sections {
        if !items.is_empty() {
            page.sections.push(Section { target, items });
        }
    }
    page
}

fn contact_link(entry: &ContactEntry) -> ViewNode {
    let href = if entry.kind == "email" {
        format!("mailto:{}", entry.value)
    } else {
        format!("https://{}", entry.value)
    };
    ViewNode {
        tag: "a",
        text: Some(entry.value.clone()),
        attributes: vec![("href", href), ("target", "_blank".to_string())],
        ..ViewNode::default()
    }
}

fn timeline_item(exp: &Experience) -> ViewNode {
    let has_details = !exp.details.is_empty();

    let meta: Vec<&str> = [&exp.kind, &exp.duration, &exp.location]
        .into_iter()
        .filter_map(|part| part.as_deref())
        .collect();
    let meta = (!meta.is_empty()).then(|| meta.join(META_SEPARATOR));

    let main = ViewNode::div("item-main").with_children(
        [
            ViewNode::text_div("item-title", exp.role.as_ref()),
            ViewNode::text_div("item-subtitle", exp.company.as_ref()),
            ViewNode::text_div("item-meta", meta.as_ref()),
        ]
        .into_iter()
        .flatten()
        .collect(),
    );

    let mut header = ViewNode::div("item-header").with_children(vec![main]);
    let mut children = Vec::with_capacity(2);

    if has_details {
        header.toggles_next_sibling = true;
        children.push(header);

        let list = ViewNode {
            tag: "ul",
            children: exp
                .details
                .iter()
                .map(|detail| ViewNode {
                    tag: "li",
                    text: Some(detail.clone()),
                    ..ViewNode::default()
                })
                .collect(),
            ..ViewNode::default()
        };
        children.push(ViewNode::div("item-details").with_children(vec![list]));
        ViewNode::div("timeline-item").with_children(children)
    } else {
        children.push(header);
        ViewNode::div("timeline-item no-details").with_children(children)
    }
}

fn education_item(edu: &Education) -> ViewNode {
    let main = ViewNode::div("item-main").with_children(
        [
            ViewNode::text_div("item-title", edu.school.as_ref()),
            ViewNode::text_div("item-subtitle", edu.degree.as_ref()),
            ViewNode::text_div("item-meta", edu.duration.as_ref()),
        ]
        .into_iter()
        .flatten()
        .collect(),
    );
    ViewNode::div("card-item").with_children(vec![main])
}

fn skill_item(skill: &str) -> ViewNode {
    ViewNode::div("skill-item").with_text(skill.to_string())
}

fn tool_item(tool: &Tool) -> ViewNode {
    let children = match tool {
        Tool::Plain(name) => vec![ViewNode::div("tool-list").with_text(name.clone())],
        Tool::Group { category, items } => vec![
            ViewNode::div("tool-category").with_text(category.clone()),
            ViewNode::div("tool-list").with_text(items.join(", ")),
        ],
    };
    ViewNode::div("tool-item").with_children(children)
}
