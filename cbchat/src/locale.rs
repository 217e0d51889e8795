//! User-visible progress lines shown while the service searches the web.

pub trait Localizer: Send + Sync {
    fn searching(&self) -> String;

    fn found_results(&self, count: u64, title: &str, url: &str) -> String;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct EnglishLocalizer;

impl Localizer for EnglishLocalizer {
    fn searching(&self) -> String {
        "Searching the web...".to_string()
    }

    fn found_results(&self, count: u64, title: &str, url: &str) -> String {
        format!("Found {count} results: [{title}]({url})")
    }
}
