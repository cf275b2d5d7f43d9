use crate::config::CameraMode;
use crate::Message;
use iced::widget::{column, image, row, text, Container};
use iced::{Element, Length};
use navcore::feed::ChangeGate;
use navcore::model::StreamLocator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraStatus {
    Offline,
    Live,
}

/// Camera panel state machine. The status badge tracks locator receipt,
/// not render success: a frame failure hides the frame and nothing else.
pub struct CameraPanel {
    mode: CameraMode,
    status: CameraStatus,
    locator_gate: ChangeGate<StreamLocator>,
    frame: Option<image::Handle>,
    frame_hidden: bool,
    refresh_serial: u64,
    pub expanded: bool,
}

impl CameraPanel {
    pub fn new(mode: CameraMode) -> Self {
        Self {
            mode,
            status: CameraStatus::Offline,
            locator_gate: ChangeGate::new(),
            frame: None,
            frame_hidden: false,
            refresh_serial: 0,
            expanded: false,
        }
    }

    pub fn is_live(&self) -> bool {
        self.status == CameraStatus::Live
    }

    /// Feeds a locator snapshot through the change gate. Returns the URL to
    /// fetch immediately when a new non-empty locator arrives. An absent
    /// locator never reverts an earlier LIVE status.
    pub fn handle_locator(&mut self, locator: StreamLocator) -> Option<String> {
        if !locator.is_configured() {
            return None;
        }
        if !self.locator_gate.observe(locator) {
            return None;
        }
        self.status = CameraStatus::Live;
        self.frame = None;
        self.frame_hidden = false;
        self.next_frame_url()
    }

    /// Refresh tick. Embedded mode holds its acquired frame, so only the
    /// polled strategy produces a new request.
    pub fn refresh_url(&mut self) -> Option<String> {
        if self.mode != CameraMode::Polled || self.status != CameraStatus::Live {
            return None;
        }
        self.next_frame_url()
    }

    pub fn wants_refresh(&self) -> bool {
        self.mode == CameraMode::Polled && self.status == CameraStatus::Live
    }

    fn next_frame_url(&mut self) -> Option<String> {
        let locator = self.locator_gate.last()?;
        let url = locator.as_str();
        match self.mode {
            CameraMode::Embedded => Some(url.to_string()),
            CameraMode::Polled => {
                self.refresh_serial += 1;
                let separator = if url.contains('?') { '&' } else { '?' };
                Some(format!("{url}{separator}t={}", self.refresh_serial))
            }
        }
    }

    pub fn handle_frame(&mut self, result: Result<Vec<u8>, String>) {
        match result {
            Ok(bytes) => {
                self.frame = Some(image::Handle::from_bytes(bytes));
                self.frame_hidden = false;
            }
            Err(err) => {
                log::warn!("camera frame failed: {err}");
                self.frame_hidden = true;
            }
        }
    }

    pub fn view(&self) -> Element<'_, Message> {
        let live = self.is_live();

        let feed_area: Element<'_, Message> = match (&self.frame, self.frame_hidden) {
            (Some(handle), false) => image(handle.clone())
                .width(Length::Fill)
                .height(Length::Fill)
                .into(),
            _ => {
                let caption = if live {
                    "NO SIGNAL"
                } else {
                    "WAITING FOR CAMERA..."
                };
                Container::new(text(caption).size(13))
                    .width(Length::Fill)
                    .height(Length::Fill)
                    .center_x(Length::Fill)
                    .center_y(Length::Fill)
                    .into()
            }
        };

        let hud = row![
            text(format!("SOURCE: {}", if live { "LIVE" } else { "OFFLINE" })).size(11),
            text(format!("STATUS: {}", if live { "REC" } else { "STANDBY" })).size(11),
            text("MODE: EXT_FEED").size(11),
        ]
        .spacing(24);

        column![
            Container::new(feed_area)
                .width(Length::Fill)
                .height(Length::Fill),
            Container::new(hud).padding(4),
        ]
        .spacing(4)
        .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn locator() -> StreamLocator {
        StreamLocator::new("https://example.com/feed")
    }

    #[test]
    fn status_flips_live_on_first_locator() {
        let mut panel = CameraPanel::new(CameraMode::Polled);
        assert!(!panel.is_live());

        let url = panel.handle_locator(locator()).unwrap();
        assert!(panel.is_live());
        assert_eq!(url, "https://example.com/feed?t=1");
    }

    #[test]
    fn unchanged_locator_is_delivered_once() {
        let mut panel = CameraPanel::new(CameraMode::Polled);
        assert!(panel.handle_locator(locator()).is_some());
        assert!(panel.handle_locator(locator()).is_none());
        assert!(panel
            .handle_locator(StreamLocator::new("https://example.com/other"))
            .is_some());
    }

    #[test]
    fn empty_locator_never_reverts_live() {
        let mut panel = CameraPanel::new(CameraMode::Polled);
        panel.handle_locator(locator());
        assert!(panel.handle_locator(StreamLocator::default()).is_none());
        assert!(panel.is_live());
    }

    #[test]
    fn polled_refresh_busts_caches_with_a_growing_serial() {
        let mut panel = CameraPanel::new(CameraMode::Polled);
        panel.handle_locator(locator());
        assert_eq!(
            panel.refresh_url().unwrap(),
            "https://example.com/feed?t=2"
        );
        assert_eq!(
            panel.refresh_url().unwrap(),
            "https://example.com/feed?t=3"
        );
    }

    #[test]
    fn cache_buster_appends_to_existing_query() {
        let mut panel = CameraPanel::new(CameraMode::Polled);
        let url = panel
            .handle_locator(StreamLocator::new("https://example.com/feed?res=720"))
            .unwrap();
        assert_eq!(url, "https://example.com/feed?res=720&t=1");
    }

    #[test]
    fn embedded_mode_fetches_once_per_locator_change() {
        let mut panel = CameraPanel::new(CameraMode::Embedded);
        assert_eq!(
            panel.handle_locator(locator()).unwrap(),
            "https://example.com/feed"
        );
        assert!(!panel.wants_refresh());
        assert!(panel.refresh_url().is_none());
    }

    #[test]
    fn frame_failure_hides_frame_but_keeps_live() {
        let mut panel = CameraPanel::new(CameraMode::Polled);
        panel.handle_locator(locator());
        panel.handle_frame(Ok(vec![0xff, 0xd8]));
        assert!(panel.frame.is_some());

        panel.handle_frame(Err("503".into()));
        assert!(panel.frame_hidden);
        assert!(panel.is_live());
    }

    #[test]
    fn offline_panel_requests_nothing() {
        let mut panel = CameraPanel::new(CameraMode::Polled);
        assert!(panel.refresh_url().is_none());
        assert!(!panel.wants_refresh());
    }
}
