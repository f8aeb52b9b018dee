//! Browser entry point: binds the workflow to the host page.

mod network;
mod page;

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tracing::{error, info, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, DomParser, Element, Event, HtmlInputElement, HtmlSelectElement, SupportedType};

use crate::dom::Dropdown;
use crate::loader::{
    pick_content_root, ContentRoot, ExternalResources, SCRIPT_SELECTOR, STYLESHEET_SELECTOR,
};
use crate::personalize::{apply_personalized, complete, prepare, WorkflowError, SUCCESS_MESSAGE};
use crate::picker::populate;
use crate::selection::SelectionOverlay;

use page::WebPage;

const REGION_SELECTOR: &str = ".right-column";

fn alert(message: &str) {
    if let Some(window) = web_sys::window() {
        if let Err(e) = window.alert_with_message(message) {
            warn!("alert failed: {e:?}");
        }
    }
}

fn by_id<T: JsCast>(document: &Document, id: &str) -> Result<T, JsValue> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("#{id} is missing")))?
        .dyn_into::<T>()
        .map_err(|_| JsValue::from_str(&format!("#{id} has an unexpected element type")))
}

fn attribute_values(document: &Document, selector: &str, attribute: &str) -> Vec<String> {
    let Ok(nodes) = document.query_selector_all(selector) else {
        return Vec::new();
    };
    (0..nodes.length())
        .filter_map(|i| nodes.get(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .filter_map(|element| element.get_attribute(attribute))
        .collect()
}

fn resources_in(document: &Document) -> ExternalResources {
    ExternalResources {
        stylesheets: attribute_values(document, STYLESHEET_SELECTOR, "href"),
        scripts: attribute_values(document, SCRIPT_SELECTOR, "src"),
    }
}

/// Page-wide state: the controls and the overlay for the loaded document.
pub(crate) struct Composer {
    this: Weak<Composer>,
    document: Document,
    url_input: HtmlInputElement,
    targets: HtmlSelectElement,
    region: Element,
    overlay: RefCell<Option<SelectionOverlay<WebPage>>>,
}

impl Composer {
    fn mount() -> Result<Rc<Self>, JsValue> {
        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or_else(|| JsValue::from_str("document is unavailable"))?;
        let url_input = by_id::<HtmlInputElement>(&document, "urlInput")?;
        let targets = by_id::<HtmlSelectElement>(&document, "targetsDropdown")?;
        let region = document
            .query_selector(REGION_SELECTOR)?
            .ok_or_else(|| JsValue::from_str("display region is missing"))?;

        Ok(Rc::new_cyclic(|this| Composer {
            this: this.clone(),
            document,
            url_input,
            targets,
            region,
            overlay: RefCell::new(None),
        }))
    }

    fn on_click<F, Fut>(self: &Rc<Self>, id: &str, action: F) -> Result<(), JsValue>
    where
        F: Fn(Rc<Self>) -> Fut + 'static,
        Fut: std::future::Future<Output = ()> + 'static,
    {
        let button = by_id::<Element>(&self.document, id)?;
        let composer = Rc::clone(self);
        let callback = Closure::<dyn FnMut(Event)>::wrap(Box::new(move |_event: Event| {
            spawn_local(action(Rc::clone(&composer)));
        }));
        button.add_event_listener_with_callback("click", callback.as_ref().unchecked_ref())?;
        // Buttons live as long as the page.
        callback.forget();
        Ok(())
    }

    async fn load_targets(self: Rc<Self>) {
        match network::account_names().await {
            Ok(names) => populate(&self.targets, &names),
            Err(e) => error!("Failed to fetch targets: {e}"),
        }
    }

    async fn load_url(self: Rc<Self>) {
        let url = self.url_input.value();
        match network::fetch_page(&url).await {
            Ok(html) => {
                if let Err(e) = self.show_document(&html) {
                    error!("Showing {url} failed: {e:?}");
                    alert(&WorkflowError::LoadFailed(format!("{e:?}")).to_string());
                }
            }
            Err(e) => {
                error!("Loading {url} failed: {e}");
                alert(&WorkflowError::LoadFailed(e.to_string()).to_string());
            }
        }
    }

    fn show_document(&self, html: &str) -> Result<(), JsValue> {
        let fetched = DomParser::new()?.parse_from_string(html, SupportedType::TextHtml)?;

        let previous = self.overlay.borrow_mut().take();
        if let Some(mut previous) = previous {
            previous.disable();
        }

        match pick_content_root(|selector| fetched.query_selector(selector).ok().flatten()) {
            Some(ContentRoot::Element(root)) => {
                let adopted = self.document.import_node_with_deep(&root, true)?;
                self.region.set_inner_html("");
                self.region.append_child(&adopted)?;
            }
            Some(ContentRoot::Children(body)) => self.region.set_inner_html(&body.inner_html()),
            None => self.region.set_inner_html(html),
        }

        let mut overlay = SelectionOverlay::new(WebPage::new(
            self.document.clone(),
            self.region.clone(),
            self.this.clone(),
        ));
        overlay.enable();
        *self.overlay.borrow_mut() = Some(overlay);

        self.inject_resources(resources_in(&fetched))
    }

    fn inject_resources(&self, found: ExternalResources) -> Result<(), JsValue> {
        let present = resources_in(&self.document);
        let mut present_urls = present.stylesheets;
        present_urls.extend(present.scripts);

        let missing = found.without_present(&present_urls);
        if missing.is_empty() {
            return Ok(());
        }
        let head = self
            .document
            .head()
            .ok_or_else(|| JsValue::from_str("document head is missing"))?;

        for href in &missing.stylesheets {
            let link = self.document.create_element("link")?;
            link.set_attribute("rel", "stylesheet")?;
            link.set_attribute("href", href)?;
            head.append_child(&link)?;
        }
        for src in &missing.scripts {
            let script = self.document.create_element("script")?;
            script.set_attribute("src", src)?;
            head.append_child(&script)?;
        }
        info!(
            "Injected {} stylesheets and {} scripts",
            missing.stylesheets.len(),
            missing.scripts.len()
        );
        Ok(())
    }

    async fn personalize(self: Rc<Self>) {
        let target = Dropdown::value(&self.targets);
        let elements = self
            .overlay
            .borrow()
            .as_ref()
            .map(|overlay| overlay.selected_elements())
            .unwrap_or_default();

        let prepared = match prepare(&target, elements) {
            Ok(prepared) => prepared,
            Err(e) => {
                alert(&e.to_string());
                return;
            }
        };

        match network::personalize(&prepared.request).await {
            Ok(response) => {
                {
                    let mut overlay = self.overlay.borrow_mut();
                    match overlay.as_mut() {
                        Some(overlay) => {
                            complete(overlay, &prepared, &response);
                        }
                        None => {
                            apply_personalized(&prepared.elements, &response);
                        }
                    }
                }
                alert(SUCCESS_MESSAGE);
            }
            Err(e) => {
                error!("Personalization request failed: {e}");
                alert(&WorkflowError::PersonalizeFailed(e.to_string()).to_string());
            }
        }
    }

    fn hover(&self, element: &Element, entering: bool) {
        let Ok(overlay) = self.overlay.try_borrow() else {
            return;
        };
        if let Some(overlay) = overlay.as_ref() {
            if entering {
                overlay.hover_in(element);
            } else {
                overlay.hover_out(element);
            }
        }
    }

    fn toggle(&self, element: &Element) {
        let Ok(mut overlay) = self.overlay.try_borrow_mut() else {
            warn!("Selection busy; click ignored");
            return;
        };
        if let Some(overlay) = overlay.as_mut() {
            overlay.click(element);
        }
    }

    fn remove_selection(&self, id: &str) {
        let Ok(mut overlay) = self.overlay.try_borrow_mut() else {
            warn!("Selection busy; removal of {id} ignored");
            return;
        };
        if let Some(overlay) = overlay.as_mut() {
            overlay.remove(id);
        }
    }
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default();

    let composer = Composer::mount()?;
    composer.on_click("loadButton", Composer::load_url)?;
    composer.on_click("personalizeButton", Composer::personalize)?;
    spawn_local(Rc::clone(&composer).load_targets());
    info!("Composer ready");
    Ok(())
}
