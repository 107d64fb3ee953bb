//! DOM view
//!
//! Each section of the page is described as a [`Node`] tree every frame and
//! only rebuilt when the tree differs from what is already on screen.

use web_sys::{Document, Element, HtmlElement};

use crate::error::UiError;
use crate::settings::Settings;
use crate::sim::GameState;
use crate::ui::{Node, city_class, view};

/// Element ids the page must provide
pub const HEADER_ID: &str = "header";
pub const BOARD_ID: &str = "board";
pub const STATUS_ID: &str = "city-status";
pub const OVERLAY_ID: &str = "modal-overlay";
pub const MODAL_ID: &str = "modal";
pub const SETTINGS_ID: &str = "settings-bar";

/// The current document
pub fn document() -> Result<Document, UiError> {
    web_sys::window()
        .ok_or(UiError::NoWindow)?
        .document()
        .ok_or(UiError::NoDocument)
}

fn element(document: &Document, id: &str) -> Result<Element, UiError> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| UiError::MissingElement(id.to_string()))
}

/// Create the DOM for `node` and its subtree
fn build(document: &Document, node: &Node) -> Result<Element, UiError> {
    let el = document.create_element(node.tag)?;
    for (name, value) in &node.attrs {
        el.set_attribute(name, value)?;
    }
    if let Some(text) = &node.text {
        el.set_text_content(Some(text));
    }
    for child in &node.children {
        el.append_child(&build(document, child)?)?;
    }
    Ok(el)
}

/// A page region plus the tree last built into it
struct Section {
    element: Element,
    nodes: Option<Vec<Node>>,
}

impl Section {
    fn new(document: &Document, id: &str) -> Result<Self, UiError> {
        Ok(Self {
            element: element(document, id)?,
            nodes: None,
        })
    }

    fn update(&mut self, document: &Document, nodes: Vec<Node>) -> Result<(), UiError> {
        if self.nodes.as_ref() == Some(&nodes) {
            return Ok(());
        }
        self.element.set_text_content(None);
        for node in &nodes {
            self.element.append_child(&build(document, node)?)?;
        }
        self.nodes = Some(nodes);
        Ok(())
    }
}

pub struct DomView {
    document: Document,
    body: HtmlElement,
    header: Section,
    board: Section,
    status: Section,
    modal: Section,
    settings: Section,
    overlay: Element,
    overlay_open: Option<bool>,
    body_class: &'static str,
}

impl DomView {
    pub fn new(document: &Document) -> Result<Self, UiError> {
        Ok(Self {
            document: document.clone(),
            body: document.body().ok_or_else(|| UiError::MissingElement("body".into()))?,
            header: Section::new(document, HEADER_ID)?,
            board: Section::new(document, BOARD_ID)?,
            status: Section::new(document, STATUS_ID)?,
            modal: Section::new(document, MODAL_ID)?,
            settings: Section::new(document, SETTINGS_ID)?,
            overlay: element(document, OVERLAY_ID)?,
            overlay_open: None,
            body_class: "",
        })
    }

    /// Bring the page in line with the game state
    pub fn render(&mut self, state: &GameState, settings: &Settings) -> Result<(), UiError> {
        let city = state.city_state();

        let class = city_class(city);
        if class != self.body_class {
            self.body.set_class_name(class);
            self.body_class = class;
        }

        let doc = &self.document;
        self.header.update(doc, view::header(city))?;
        self.board.update(doc, view::board(&state.board))?;
        self.status.update(doc, view::city_status(&state.hearts, settings))?;
        self.modal.update(doc, view::modal(state.session.as_ref()))?;
        self.settings.update(doc, view::settings_bar(settings))?;

        let open = state.session.is_some();
        if self.overlay_open != Some(open) {
            let classes = self.overlay.class_list();
            if open {
                classes.remove_1("hidden")?;
            } else {
                classes.add_1("hidden")?;
            }
            self.overlay_open = Some(open);
        }
        Ok(())
    }
}
