use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Document, Element, Response};

use crate::error::WebError;
use crate::page::{self, Page, ViewNode};
use crate::resume::ResumeData;

const EXPANDED_CLASS: &str = "expanded";

/// The slice of a document that mounting needs.
pub trait PageHost {
    type Element: Clone;

    fn find(&self, id: &str) -> Option<Self::Element>;
    fn create(&self, tag: &str) -> Result<Self::Element, WebError>;
    fn set_class(&self, element: &Self::Element, class: &str);
    fn set_text(&self, element: &Self::Element, text: &str);
    fn set_attribute(&self, element: &Self::Element, name: &str, value: &str) -> Result<(), WebError>;
    fn append(&self, parent: &Self::Element, child: &Self::Element) -> Result<(), WebError>;
    /// Clicking `trigger` toggles the `expanded` class on `target`.
    fn toggle_on_click(&self, trigger: &Self::Element, target: Self::Element) -> Result<(), WebError>;
}

impl PageHost for Document {
    type Element = Element;

    fn find(&self, id: &str) -> Option<Element> {
        self.get_element_by_id(id)
    }

    fn create(&self, tag: &str) -> Result<Element, WebError> {
        self.create_element(tag).map_err(WebError::js)
    }

    fn set_class(&self, element: &Element, class: &str) {
        element.set_class_name(class);
    }

    fn set_text(&self, element: &Element, text: &str) {
        element.set_text_content(Some(text));
    }

    fn set_attribute(&self, element: &Element, name: &str, value: &str) -> Result<(), WebError> {
        element.set_attribute(name, value).map_err(WebError::js)
    }

    fn append(&self, parent: &Element, child: &Element) -> Result<(), WebError> {
        parent.append_child(child).map(drop).map_err(WebError::js)
    }

    fn toggle_on_click(&self, trigger: &Element, target: Element) -> Result<(), WebError> {
        let handler = Closure::wrap(Box::new(move || {
            if let Err(err) = target.class_list().toggle(EXPANDED_CLASS) {
                log::warn!("could not toggle details: {:?}", err);
            }
        }) as Box<dyn FnMut()>);
        trigger
            .add_event_listener_with_callback("click", handler.as_ref().unchecked_ref())
            .map_err(WebError::js)?;
        // Lives as long as the element it is attached to.
        handler.forget();
        Ok(())
    }
}

/// Writes `page` into `host`. Targets missing from the host are skipped;
/// returns how many targets were filled.
pub fn mount<H: PageHost>(page: &Page, host: &H) -> Result<usize, WebError> {
    let mut filled = 0;

    for (id, text) in &page.text {
        match host.find(id) {
            Some(target) => {
                host.set_text(&target, text);
                filled += 1;
            }
            None => log::warn!("no element `#{id}` for text, skipping"),
        }
    }

    for section in &page.sections {
        let Some(target) = host.find(section.target) else {
            log::warn!("no element `#{}` for section, skipping", section.target);
            continue;
        };
        for item in create_all(host, &section.items)? {
            host.append(&target, &item)?;
        }
        filled += 1;
    }
    Ok(filled)
}

fn create_all<H: PageHost>(host: &H, nodes: &[ViewNode]) -> Result<Vec<H::Element>, WebError> {
    let elements = nodes
        .iter()
        .map(|node| create(host, node))
        .collect::<Result<Vec<_>, _>>()?;

    for (index, node) in nodes.iter().enumerate() {
        if !node.toggles_next_sibling {
            continue;
        }
        if let Some(next) = elements.get(index + 1) {
            host.toggle_on_click(&elements[index], next.clone())?;
        }
    }
    Ok(elements)
}

fn create<H: PageHost>(host: &H, node: &ViewNode) -> Result<H::Element, WebError> {
    let element = host.create(node.tag)?;
    if let Some(class) = node.class {
        host.set_class(&element, class);
    }
    if let Some(text) = &node.text {
        host.set_text(&element, text);
    }
    for (name, value) in &node.attributes {
        host.set_attribute(&element, name, value)?;
    }
    for child in create_all(host, &node.children)? {
        host.append(&element, &child)?;
    }
    Ok(element)
}

pub async fn fetch_text(url: &str) -> Result<String, WebError> {
    let window = web_sys::window().ok_or(WebError::NoWindow)?;
    let response: Response = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(WebError::js)?
        .dyn_into()
        .map_err(|_| WebError::Js("fetch did not resolve to a Response".to_string()))?;

    if !response.ok() {
        return Err(WebError::Http {
            url: url.to_string(),
            status: response.status(),
        });
    }

    let body = JsFuture::from(response.text().map_err(WebError::js)?)
        .await
        .map_err(WebError::js)?;
    body.as_string()
        .ok_or_else(|| WebError::Js("response body is not text".to_string()))
}

/// Fetch, decode and mount the resume. Every failure is logged and leaves the
/// affected regions as they were.
pub async fn load_resume(url: &str) {
    let text = match fetch_text(url).await {
        Ok(text) => text,
        Err(err) => {
            log::warn!("resume data unavailable: {err}");
            return;
        }
    };

    let data = match ResumeData::from_yaml(&text) {
        Ok(data) => data,
        Err(err) => {
            log::warn!("resume data not usable: {err}");
            return;
        }
    };

    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        log::warn!("{}", WebError::NoDocument);
        return;
    };

    match mount(&page::build(&data), &document) {
        Ok(filled) => log::info!("resume mounted into {filled} page regions"),
        Err(err) => log::warn!("resume only partly mounted: {err}"),
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::HashMap;

    use super::*;
    use crate::page::{EXPERIENCE_ID, NAME_ID, SKILLS_ID, TAGLINE_ID, TOOLS_ID};
    use crate::resume::{Experience, Tool};

    #[derive(Default)]
    struct FakeElement {
        tag: String,
        class: Option<String>,
        text: Option<String>,
        children: Vec<usize>,
    }

    /// In-memory document; elements are arena indices.
    #[derive(Default)]
    struct FakeDocument {
        ids: HashMap<String, usize>,
        elements: RefCell<Vec<FakeElement>>,
        toggles: RefCell<Vec<(usize, usize)>>,
    }

    impl FakeDocument {
        fn with_ids(ids: &[&str]) -> FakeDocument {
            let doc = FakeDocument::default();
            let mut map = HashMap::new();
            for id in ids {
                let index = doc.create("div").unwrap();
                map.insert(id.to_string(), index);
            }
            FakeDocument { ids: map, ..doc }
        }

        fn by_id(&self, id: &str) -> usize {
            self.ids[id]
        }

        fn text(&self, index: usize) -> Option<String> {
            self.elements.borrow()[index].text.clone()
        }

        fn children(&self, index: usize) -> Vec<usize> {
            self.elements.borrow()[index].children.clone()
        }

        fn class(&self, index: usize) -> Option<String> {
            self.elements.borrow()[index].class.clone()
        }
    }

    impl PageHost for FakeDocument {
        type Element = usize;

        fn find(&self, id: &str) -> Option<usize> {
            self.ids.get(id).copied()
        }

        fn create(&self, tag: &str) -> Result<usize, WebError> {
            let mut elements = self.elements.borrow_mut();
            elements.push(FakeElement {
                tag: tag.to_string(),
                ..FakeElement::default()
            });
            Ok(elements.len() - 1)
        }

        fn set_class(&self, element: &usize, class: &str) {
            self.elements.borrow_mut()[*element].class = Some(class.to_string());
        }

        fn set_text(&self, element: &usize, text: &str) {
            self.elements.borrow_mut()[*element].text = Some(text.to_string());
        }

        fn set_attribute(&self, _element: &usize, _name: &str, _value: &str) -> Result<(), WebError> {
            Ok(())
        }

        fn append(&self, parent: &usize, child: &usize) -> Result<(), WebError> {
            self.elements.borrow_mut()[*parent].children.push(*child);
            Ok(())
        }

        fn toggle_on_click(&self, trigger: &usize, target: usize) -> Result<(), WebError> {
            self.toggles.borrow_mut().push((*trigger, target));
            Ok(())
        }
    }

    fn sample() -> Page {
        page::build(&ResumeData {
            name: Some("Ada".into()),
            tagline: Some("Ships it".into()),
            skills: vec!["Rust".into(), "Go".into()],
            tools: vec![Tool::Plain("Git".into())],
            experience: vec![Experience {
                role: Some("Engineer".into()),
                details: vec!["Built things".into()],
                ..Experience::default()
            }],
            ..ResumeData::default()
        })
    }

    const ALL_IDS: [&str; 5] = [NAME_ID, TAGLINE_ID, SKILLS_ID, TOOLS_ID, EXPERIENCE_ID];

    #[test]
    fn fills_every_present_target() {
        let doc = FakeDocument::with_ids(&ALL_IDS);
        assert_eq!(mount(&sample(), &doc).unwrap(), 5);

        assert_eq!(doc.text(doc.by_id(NAME_ID)).as_deref(), Some("Ada"));
        let skills = doc.children(doc.by_id(SKILLS_ID));
        assert_eq!(skills.len(), 2);
        assert_eq!(doc.class(skills[0]).as_deref(), Some("skill-item"));
        assert_eq!(doc.text(skills[1]).as_deref(), Some("Go"));
    }

    #[test]
    fn missing_target_skips_only_that_region() {
        let ids: Vec<&str> = ALL_IDS.iter().copied().filter(|id| *id != TOOLS_ID).collect();
        let doc = FakeDocument::with_ids(&ids);

        assert_eq!(mount(&sample(), &doc).unwrap(), 4);
        assert_eq!(doc.text(doc.by_id(TAGLINE_ID)).as_deref(), Some("Ships it"));
        assert_eq!(doc.children(doc.by_id(SKILLS_ID)).len(), 2);
        assert_eq!(doc.children(doc.by_id(EXPERIENCE_ID)).len(), 1);
    }

    #[test]
    fn missing_scalar_target_is_skipped() {
        let doc = FakeDocument::with_ids(&[SKILLS_ID]);
        assert_eq!(mount(&sample(), &doc).unwrap(), 1);
    }

    #[test]
    fn header_toggles_its_details_sibling() {
        let doc = FakeDocument::with_ids(&ALL_IDS);
        mount(&sample(), &doc).unwrap();

        let toggles = doc.toggles.borrow();
        assert_eq!(toggles.len(), 1);
        let (trigger, target) = toggles[0];
        assert_eq!(doc.class(trigger).as_deref(), Some("item-header"));
        assert_eq!(doc.class(target).as_deref(), Some("item-details"));

        let item = doc.children(doc.by_id(EXPERIENCE_ID))[0];
        assert_eq!(doc.children(item), vec![trigger, target]);
        assert_eq!(doc.elements.borrow()[target].tag, "div");
    }
}
