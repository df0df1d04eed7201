use crate::{
    config::Config,
    error::{LocationError, PortsError, UploadError},
    models::{UploadedFile, UserLocation},
    notice::{Notifier, Severity},
    ports::{PageKind, Ports},
    upload::{
        drop_zone::{DragEvent, DropZone},
        form::{FieldError, UploadForm, UploadSubmission},
        location::{LocationProvider, PositionOptions, TriggerControl, request_location},
        panel::SelectionPanel,
        validation::{UploadRules, validate_file},
    },
};

/// State of the upload page, wired to its host markup.
pub struct UploadPage {
    ports: Ports,
    rules: UploadRules,
    options: PositionOptions,
    notices: Notifier,
    drop_zone: DropZone,
    panel: SelectionPanel,
    form: UploadForm,
    locate_button: TriggerControl,
}

impl UploadPage {
    /// Fails when the host markup lacks any of the upload page slots.
    pub fn new(markup: &str, config: &Config, notices: Notifier) -> Result<Self, PortsError> {
        let ports = Ports::check(markup, PageKind::Upload, &config.map.container)?;
        log::info!("Upload page initialized");

        Ok(Self {
            ports,
            rules: UploadRules::from_config(&config.upload),
            options: PositionOptions::from_config(&config.geolocation),
            notices,
            drop_zone: DropZone::new(),
            panel: SelectionPanel::new(),
            form: UploadForm::new(),
            locate_button: TriggerControl::new("Use Current Location"),
        })
    }

    pub fn ports(&self) -> &Ports {
        &self.ports
    }

    pub fn drop_zone(&self) -> &DropZone {
        &self.drop_zone
    }

    pub fn panel(&self) -> &SelectionPanel {
        &self.panel
    }

    pub fn form(&self) -> &UploadForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut UploadForm {
        &mut self.form
    }

    pub fn locate_button(&self) -> &TriggerControl {
        &self.locate_button
    }

    /// A file chosen through the file input. The input keeps the file even
    /// when it is rejected; the submit check catches it again.
    pub fn select_file(&mut self, file: UploadedFile) -> Result<(), UploadError> {
        self.drop_zone.assign(file.clone());
        self.form.file = Some(file.clone());
        self.check_selection(&file)
    }

    pub fn drag(&mut self, event: DragEvent) -> Option<Result<(), UploadError>> {
        let file = self.drop_zone.handle(event)?.clone();
        self.form.file = Some(file.clone());
        Some(self.check_selection(&file))
    }

    fn check_selection(&mut self, file: &UploadedFile) -> Result<(), UploadError> {
        match validate_file(file, &self.rules) {
            Ok(()) => {
                self.panel.display(file);
                Ok(())
            }
            Err(err) => {
                self.panel.clear();
                self.notices.alert(&err.user_message(), Severity::Danger);
                Err(err)
            }
        }
    }

    pub async fn locate<P>(&mut self, provider: &P) -> Result<UserLocation, LocationError>
    where
        P: LocationProvider + Sync + ?Sized,
    {
        request_location(
            provider,
            &self.options,
            &mut self.form.coordinates,
            &mut self.locate_button,
            &self.notices,
        )
        .await
    }

    pub fn submit(&mut self) -> Result<UploadSubmission, Vec<FieldError>> {
        self.form.submit(&self.rules)
    }
}
