use crate::{
    config::{ScrambleConfig, MARKER_ATTRIBUTE},
    effects::DecryptedText,
    random::RandomSource,
    scheduler::Scheduler,
};
use serde::Deserialize;
use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
    sync::Arc,
};
use tracing::{debug, warn};

/// A page made of text elements, some of which may be marked for scrambling.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Page {
    #[serde(default)]
    pub elements: Vec<PageElement>,
}

/// A single text element in a page.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PageElement {
    /// An optional identifier used in diagnostics.
    #[serde(default)]
    pub id: Option<String>,

    /// The element's text content.
    #[serde(default)]
    pub text: String,

    /// The element's attributes, all of them as strings.
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

impl PageElement {
    pub fn is_marked(&self) -> bool {
        self.attributes.contains_key(MARKER_ATTRIBUTE)
    }

    fn label(&self) -> &str {
        self.id.as_deref().unwrap_or("<anonymous>")
    }
}

/// Errors that can occur when loading a page
#[derive(thiserror::Error, Debug)]
pub enum BindError {
    #[error("failed to read page '{0}': {1}")]
    Io(PathBuf, io::Error),

    #[error("invalid page: {0}")]
    Parse(#[from] serde_yaml::Error),
}

impl Page {
    pub fn from_yaml(contents: &str) -> Result<Self, BindError> {
        Ok(serde_yaml::from_str(contents)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, BindError> {
        let contents = fs::read_to_string(path).map_err(|e| BindError::Io(path.to_path_buf(), e))?;
        Self::from_yaml(&contents)
    }
}

/// A text element that was bound to a scramble animation.
#[derive(Debug)]
pub struct BoundElement {
    pub id: Option<String>,
    pub text: DecryptedText,
}

/// Bind every marked element in a page to its own animation.
///
/// `make_rng` is called once per bound element with the element's position in the page. Elements
/// that are marked but have no text are skipped.
pub fn auto_bind<F>(page: &Page, scheduler: Arc<dyn Scheduler>, mut make_rng: F) -> Vec<BoundElement>
where
    F: FnMut(usize) -> Box<dyn RandomSource>,
{
    let mut bound = Vec::new();
    for (index, element) in page.elements.iter().enumerate() {
        if !element.is_marked() {
            continue;
        }
        if element.text.is_empty() {
            warn!(element = element.label(), "skipping scrambled element with no text");
            continue;
        }
        let config = ScrambleConfig::from_attributes(&element.attributes);
        debug!(element = element.label(), ?config, "binding element");
        let text = DecryptedText::new(&element.text, config, scheduler.clone(), make_rng(index));
        bound.push(BoundElement { id: element.id.clone(), text });
    }
    bound
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        effects::{AnimateTrigger, RevealDirection},
        random::FastRandom,
        scheduler::ManualScheduler,
    };
    use std::io::Write;

    const PAGE: &str = r#"
elements:
  - id: title
    text: "HELLO WORLD"
    attributes:
      decrypted: ""
      sequential: "true"
      reveal-direction: center
      animate-on: view
  - id: plain
    text: "nothing to see"
  - id: empty
    text: ""
    attributes:
      decrypted: ""
  - text: "footer"
    attributes:
      decrypted: ""
      speed: "oops"
"#;

    fn bind(page: &Page) -> Vec<BoundElement> {
        let scheduler = Arc::new(ManualScheduler::new());
        auto_bind(page, scheduler, |index| Box::new(FastRandom::with_seed(index as u64)))
    }

    #[test]
    fn binds_marked_elements() {
        let page = Page::from_yaml(PAGE).expect("invalid page");
        assert_eq!(page.elements.len(), 4);

        let bound = bind(&page);
        assert_eq!(bound.len(), 2);

        assert_eq!(bound[0].id.as_deref(), Some("title"));
        let config = bound[0].text.config();
        assert!(config.sequential);
        assert_eq!(config.reveal_direction, RevealDirection::Center);
        assert_eq!(config.animate_on, AnimateTrigger::View);

        assert_eq!(bound[1].id, None);
        assert_eq!(bound[1].text.original_text(), "footer");
        assert_eq!(bound[1].text.config().tick_interval_ms, 50);
    }

    #[test]
    fn bound_elements_are_independent() {
        let page = Page::from_yaml(PAGE).expect("invalid page");
        let bound = bind(&page);
        bound[0].text.report_visibility(1.0);
        assert!(bound[0].text.is_running());
        assert!(!bound[1].text.is_running());
    }

    #[test]
    fn empty_page() {
        let page = Page::from_yaml("{}").expect("invalid page");
        assert!(bind(&page).is_empty());
    }

    #[test]
    fn unknown_fields_rejected() {
        let result = Page::from_yaml("elements:\n  - text: hi\n    colour: red\n");
        assert!(matches!(result, Err(BindError::Parse(_))));
    }

    #[test]
    fn load_from_path() {
        let mut file = tempfile::NamedTempFile::new().expect("failed to create file");
        file.write_all(PAGE.as_bytes()).expect("write failed");
        let page = Page::from_path(file.path()).expect("load failed");
        assert_eq!(page.elements.len(), 4);
    }

    #[test]
    fn missing_file() {
        let result = Page::from_path(Path::new("/definitely/not/here.yaml"));
        assert!(matches!(result, Err(BindError::Io(..))));
    }
}
