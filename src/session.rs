//! One user's capture and analysis state, plus what the interface shows for it.

use tokio::sync::watch;

use crate::capture::picker::FilePicker;
use crate::capture::validator::{validate, ValidatedImage};
use crate::capture::{CaptureController, ImageBlob};
use crate::error::{FoodLensError, Result};
use crate::food::analysis::AnalysisPipeline;
use crate::food::FoodItem;
use crate::render::{render, ResultCard};

pub const ANALYZE_LABEL: &str = "Analyze Food";
pub const ANALYZING_LABEL: &str = "Analyzing...";
pub const CAMERA_ERROR_MESSAGE: &str = "Failed to access camera. Please enable permissions.";

#[derive(Debug, Clone, PartialEq)]
pub enum ResultsArea {
    Empty,
    Error(String),
    Cards(Vec<ResultCard>),
}

/// Everything a front end needs to draw the current screen.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    /// Data URL of the accepted image, if one is shown.
    pub image_preview: Option<String>,
    pub camera_preview_visible: bool,
    pub capture_visible: bool,
    pub analyze_enabled: bool,
    pub analyze_label: String,
    pub spinner_visible: bool,
    pub results: ResultsArea,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            image_preview: None,
            camera_preview_visible: false,
            capture_visible: false,
            analyze_enabled: false,
            analyze_label: ANALYZE_LABEL.to_string(),
            spinner_visible: false,
            results: ResultsArea::Empty,
        }
    }
}

pub struct Session {
    capture: CaptureController,
    pipeline: AnalysisPipeline,
    active: Option<ValidatedImage>,
    items: Vec<FoodItem>,
    in_flight: bool,
    view: ViewState,
    view_tx: watch::Sender<ViewState>,
}

impl Session {
    pub fn new(capture: CaptureController, pipeline: AnalysisPipeline) -> Self {
        let (view_tx, _) = watch::channel(ViewState::default());
        Self {
            capture,
            pipeline,
            active: None,
            items: Vec::new(),
            in_flight: false,
            view: ViewState::default(),
            view_tx,
        }
    }

    /// Receives every view change, including the in-progress state of `analyze`.
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.view_tx.subscribe()
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn active_image(&self) -> Option<&ImageBlob> {
        self.active.as_ref().map(|image| image.blob())
    }

    pub fn items(&self) -> &[FoodItem] {
        &self.items
    }

    pub fn is_camera_open(&self) -> bool {
        self.capture.is_camera_open()
    }

    pub async fn start_upload(&mut self) -> Result<()> {
        let picked = self.capture.start_upload().await;
        self.after_pick(picked)
    }

    pub async fn start_upload_with(&mut self, picker: &dyn FilePicker) -> Result<()> {
        let picked = self.capture.start_upload_with(picker).await;
        self.after_pick(picked)
    }

    fn after_pick(&mut self, picked: Result<Option<ImageBlob>>) -> Result<()> {
        self.hide_camera();
        match picked {
            Ok(Some(blob)) => self.handle_image(blob),
            Ok(None) => {
                self.publish();
                Ok(())
            }
            Err(e) => {
                log::error!("Reading the selected file failed: {}", e);
                self.view.results = ResultsArea::Error(format!("Failed to read image: {}", e));
                self.publish();
                Err(e)
            }
        }
    }

    pub async fn start_camera(&mut self) -> Result<()> {
        self.hide_camera();
        match self.capture.start_camera().await {
            Ok(()) => {
                self.active = None;
                self.view.camera_preview_visible = true;
                self.view.capture_visible = true;
                self.view.image_preview = None;
                self.view.analyze_enabled = false;
                self.view.results = ResultsArea::Empty;
                self.publish();
                Ok(())
            }
            Err(e) => {
                self.view.results = ResultsArea::Error(CAMERA_ERROR_MESSAGE.to_string());
                self.publish();
                Err(e)
            }
        }
    }

    pub fn capture(&mut self) -> Result<()> {
        let blob = match self.capture.capture() {
            Ok(blob) => blob,
            Err(e) => {
                log::error!("Capture failed: {}", e);
                self.view.results = ResultsArea::Error(format!("Failed to capture image: {}", e));
                self.publish();
                return Err(e);
            }
        };
        let outcome = self.handle_image(blob);
        self.stop_camera();
        outcome
    }

    pub fn stop_camera(&mut self) {
        self.capture.stop_camera();
        self.hide_camera();
        self.publish();
    }

    /// Validates a new image and makes it the active one.
    pub fn handle_image(&mut self, blob: ImageBlob) -> Result<()> {
        match validate(blob) {
            Ok(image) => {
                log::info!("Accepted {} ({} bytes)", image.blob().name, image.blob().size());
                self.view.image_preview = Some(image.blob().to_data_url());
                self.active = Some(image);
                self.hide_camera();
                self.view.analyze_enabled = !self.in_flight;
                self.publish();
                Ok(())
            }
            Err(reason) => {
                log::warn!("Rejected image: {}", reason);
                self.active = None;
                self.view.analyze_enabled = false;
                self.view.image_preview = None;
                self.view.results = ResultsArea::Error(reason.to_string());
                self.publish();
                Err(reason.into())
            }
        }
    }

    /// Runs the pipeline on the active image and shows its cards.
    ///
    /// Upload failures are shown as an error message and also returned.
    pub async fn analyze(&mut self) -> Result<()> {
        if self.in_flight {
            return Err(FoodLensError::AnalysisInFlight);
        }
        let image = self.active.clone().ok_or(FoodLensError::NoActiveImage)?;

        self.in_flight = true;
        self.items.clear();
        self.view.analyze_enabled = false;
        self.view.analyze_label = ANALYZING_LABEL.to_string();
        self.view.spinner_visible = true;
        self.view.results = ResultsArea::Empty;
        self.publish();

        let outcome = self.pipeline.analyze(&image).await;

        let result = match outcome {
            Ok(items) => {
                self.view.results = ResultsArea::Cards(render(&items));
                self.items = items;
                Ok(())
            }
            Err(e) => {
                log::error!("Analysis failed: {}", e);
                self.view.results = ResultsArea::Error(format!("Error analyzing food: {}", e));
                Err(e)
            }
        };

        self.in_flight = false;
        self.view.analyze_enabled = self.active.is_some();
        self.view.analyze_label = ANALYZE_LABEL.to_string();
        self.view.spinner_visible = false;
        self.publish();
        result
    }

    fn hide_camera(&mut self) {
        self.view.camera_preview_visible = false;
        self.view.capture_visible = false;
    }

    fn publish(&self) {
        self.view_tx.send_replace(self.view.clone());
    }
}
