use crate::{models::UploadedFile, utils::escape};

/// The `file-info` panel below the drop zone. Holds at most one file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionPanel {
    current: Option<UploadedFile>,
}

impl SelectionPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shows `file`, replacing whatever was shown before.
    pub fn display(&mut self, file: &UploadedFile) {
        if let Some(previous) = self.current.replace(file.clone()) {
            log::debug!("Replacing file info for {}", previous.name);
        }
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    pub fn current(&self) -> Option<&UploadedFile> {
        self.current.as_ref()
    }

    pub fn to_html(&self) -> Option<String> {
        let file = self.current.as_ref()?;

        Some(format!(
            r#"<div class="alert alert-info mt-3 file-info" role="alert"><i class="fas fa-file-image me-2"></i><strong>{}</strong> ({:.2} MB)<div class="progress mt-2" style="height: 4px;"><div class="progress-bar bg-success" role="progressbar" style="width: 100%"></div></div></div>"#,
            escape(&file.name),
            file.size_mib()
        ))
    }
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};

    use super::*;

    #[test]
    fn test_empty_panel() {
        assert_eq!(SelectionPanel::new().to_html(), None);
    }

    #[test]
    fn test_display_shows_name_and_size() {
        let mut panel = SelectionPanel::new();
        panel.display(&UploadedFile::new("eiffel <1>.jpg", 2_621_440, "image/jpeg"));

        let html = panel.to_html().unwrap();
        let fragment = Html::parse_fragment(&html);
        let strong = fragment
            .select(&Selector::parse(".file-info strong").unwrap())
            .next()
            .unwrap();

        assert_eq!(strong.text().collect::<String>(), "eiffel <1>.jpg");
        assert!(html.contains("(2.50 MB)"));
    }

    #[test]
    fn test_display_replaces_previous() {
        let mut panel = SelectionPanel::new();
        panel.display(&UploadedFile::new("first.png", 1, "image/png"));
        panel.display(&UploadedFile::new("second.png", 1, "image/png"));

        let html = panel.to_html().unwrap();
        assert_eq!(html.matches("file-info").count(), 1);
        assert!(html.contains("second.png"));
        assert!(!html.contains("first.png"));
    }
}
