use crate::models::UploadedFile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    DragOver,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DragEvent {
    Enter,
    Over,
    /// `to_inside` is set when the pointer moved onto a child of the zone
    Leave { to_inside: bool },
    Drop(Vec<UploadedFile>),
}

#[derive(Debug, Clone, Default)]
pub struct DropZone {
    state: DragState,
    assigned: Option<UploadedFile>,
}

impl DropZone {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    /// The file currently assigned to the file input.
    pub fn assigned(&self) -> Option<&UploadedFile> {
        self.assigned.as_ref()
    }

    pub fn assign(&mut self, file: UploadedFile) {
        self.assigned = Some(file);
    }

    /// CSS classes of the zone element for its current state.
    pub fn css_class(&self) -> &'static str {
        match self.state {
            DragState::Idle => "drop-zone",
            DragState::DragOver => "drop-zone drag-over",
        }
    }

    /// Advances the state machine. Returns the newly assigned file when a
    /// drop carried at least one file.
    pub fn handle(&mut self, event: DragEvent) -> Option<&UploadedFile> {
        match event {
            DragEvent::Enter | DragEvent::Over => {
                self.state = DragState::DragOver;
                None
            }
            DragEvent::Leave { to_inside: true } => None,
            DragEvent::Leave { to_inside: false } => {
                self.state = DragState::Idle;
                None
            }
            DragEvent::Drop(files) => {
                self.state = DragState::Idle;
                let file = files.into_iter().next()?;
                log::info!("Dropped {}", file.name);
                self.assigned = Some(file);
                self.assigned.as_ref()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png(name: &str) -> UploadedFile {
        UploadedFile::new(name, 10, "image/png")
    }

    #[test]
    fn test_enter_and_leave() {
        let mut zone = DropZone::new();
        zone.handle(DragEvent::Enter);
        assert_eq!(zone.state(), DragState::DragOver);
        assert_eq!(zone.css_class(), "drop-zone drag-over");

        zone.handle(DragEvent::Over);
        assert_eq!(zone.state(), DragState::DragOver);

        zone.handle(DragEvent::Leave { to_inside: true });
        assert_eq!(zone.state(), DragState::DragOver);

        zone.handle(DragEvent::Leave { to_inside: false });
        assert_eq!(zone.state(), DragState::Idle);
    }

    #[test]
    fn test_drop_assigns_first_file() {
        let mut zone = DropZone::new();
        zone.handle(DragEvent::Over);

        let dropped = zone
            .handle(DragEvent::Drop(vec![png("a.png"), png("b.png")]))
            .cloned();

        assert_eq!(dropped, Some(png("a.png")));
        assert_eq!(zone.assigned(), Some(&png("a.png")));
        assert_eq!(zone.state(), DragState::Idle);
    }

    #[test]
    fn test_empty_drop_keeps_assignment() {
        let mut zone = DropZone::new();
        zone.assign(png("kept.png"));
        zone.handle(DragEvent::Enter);

        assert_eq!(zone.handle(DragEvent::Drop(vec![])), None);
        assert_eq!(zone.assigned(), Some(&png("kept.png")));
        assert_eq!(zone.state(), DragState::Idle);
    }
}
