//! Fetched-document loading: which part of the page to show and which
//! remote stylesheets and scripts to bring along.

const BODY_SELECTOR: &str = "body";

/// Candidates for the displayed content, most specific first.
pub const CONTENT_ROOT_SELECTORS: [&str; 3] = ["main", ".body-container", BODY_SELECTOR];

pub const STYLESHEET_SELECTOR: &str = r#"link[rel="stylesheet"]"#;
pub const SCRIPT_SELECTOR: &str = "script[src]";

/// What to place into the display region.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentRoot<E> {
    /// `main` or `.body-container`: the element itself, wrapper and attributes kept.
    Element(E),
    /// `body`: only its children.
    Children(E),
}

/// First selector in [`CONTENT_ROOT_SELECTORS`] for which `query` finds an element.
pub fn pick_content_root<E>(mut query: impl FnMut(&str) -> Option<E>) -> Option<ContentRoot<E>> {
    CONTENT_ROOT_SELECTORS.iter().find_map(|&selector| {
        let found = query(selector)?;
        Some(if selector == BODY_SELECTOR {
            ContentRoot::Children(found)
        } else {
            ContentRoot::Element(found)
        })
    })
}

/// Stylesheet and script URLs referenced by a fetched document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExternalResources {
    pub stylesheets: Vec<String>,
    pub scripts: Vec<String>,
}

impl ExternalResources {
    /// Drops blanks, repeats, and anything the host page already loads.
    pub fn without_present(self, present: &[String]) -> Self {
        let keep = |urls: Vec<String>| {
            let mut kept: Vec<String> = Vec::new();
            for url in urls {
                let url = url.trim().to_string();
                if !url.is_empty() && !present.contains(&url) && !kept.contains(&url) {
                    kept.push(url);
                }
            }
            kept
        };

        Self {
            stylesheets: keep(self.stylesheets),
            scripts: keep(self.scripts),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.stylesheets.is_empty() && self.scripts.is_empty()
    }
}
