use config::DashboardConfig;
use iced::{
    time,
    widget::{button, column, row, scrollable, space::horizontal as horizontal_space, text, Column, Container},
    Alignment, Element, Length, Subscription, Task, Theme,
};
use log::warn;
use navcore::feed::FeedClient;
use navcore::model::{GpsSnapshot, StreamLocator};
use navcore::telemetry::FeedMetrics;
use panels::camera::CameraPanel;
use panels::map_panel::MapPanel;
use panels::radar::RadarPanel;
use std::sync::Arc;
use std::time::Instant;
use tiles::{TileId, TileLibrary};

mod config;
mod panels;
mod tiles;

fn main() -> iced::Result {
    env_logger::init();
    iced::application(Dashboard::boot, Dashboard::update, Dashboard::view)
        .title(application_title)
        .subscription(application_subscription)
        .theme(application_theme)
        .run()
}

fn application_title(_: &Dashboard) -> String {
    "AI Blind Stick Dashboard".into()
}

fn application_theme(_: &Dashboard) -> Theme {
    Theme::Dark
}

fn application_subscription(state: &Dashboard) -> Subscription<Message> {
    // Timers run from boot onward: snapshots that arrive during the splash
    // are processed, not dropped.
    let mut subscriptions = vec![
        time::every(state.config.feed_interval).map(|_| Message::FeedTick),
        time::every(state.map.poll_interval()).map(|_| Message::PollTick),
        time::every(panels::radar::SPAWN_INTERVAL).map(|_| Message::RadarSpawn),
    ];
    if state.camera.wants_refresh() {
        subscriptions.push(time::every(state.config.camera_refresh).map(|_| Message::CameraRefresh));
    }
    Subscription::batch(subscriptions)
}

#[derive(Debug, Clone)]
enum Message {
    BootFinished,
    TileLibraryLoaded(Result<TileLibrary, String>),
    FeedTick,
    GpsFetched(Result<GpsSnapshot, String>),
    CameraLinkFetched(Result<StreamLocator, String>),
    CameraFrameFetched(Result<Vec<u8>, String>),
    CameraRefresh,
    PollTick,
    RadarSpawn,
    TileFetched(TileId, Result<Vec<u8>, String>),
    ToggleFullscreen,
    SosPressed,
}

struct Dashboard {
    config: DashboardConfig,
    feed: FeedClient,
    http: reqwest::Client,
    metrics: Arc<FeedMetrics>,
    booted: bool,
    net_degraded: bool,
    first_fix_seen: bool,
    gps: GpsSnapshot,
    camera: CameraPanel,
    radar: RadarPanel,
    map: MapPanel,
    status: String,
    activity: Vec<String>,
}

impl Dashboard {
    fn boot() -> (Self, Task<Message>) {
        let config = DashboardConfig::from_env();
        let metrics = Arc::new(FeedMetrics::new());
        let boot_delay = config.boot_delay;
        let tile_template = config.tile_url_template.clone();

        let dashboard = Dashboard {
            feed: FeedClient::new(config.feed_config()),
            http: reqwest::Client::new(),
            camera: CameraPanel::new(config.camera_mode),
            radar: RadarPanel::new(),
            map: MapPanel::new(metrics.clone()),
            metrics,
            booted: false,
            net_degraded: false,
            first_fix_seen: false,
            gps: GpsSnapshot::default(),
            status: "SYSTEM READY | AWAITING COMMAND".into(),
            activity: Vec::new(),
            config,
        };

        (
            dashboard,
            Task::batch(vec![
                Task::perform(tokio::time::sleep(boot_delay), |_| Message::BootFinished),
                Task::perform(tiles::load_library(tile_template), Message::TileLibraryLoaded),
            ]),
        )
    }

    fn update(state: &mut Self, message: Message) -> Task<Message> {
        match message {
            Message::BootFinished => {
                state.booted = true;
                state.map.set_mounted(true);
                state.push_activity("Assistive modules loaded".into());
                Task::none()
            }
            Message::TileLibraryLoaded(Ok(library)) => {
                state.map.library_loaded(library);
                state.push_activity("Map library ready".into());
                Task::none()
            }
            Message::TileLibraryLoaded(Err(err)) => {
                warn!("tile library failed to load: {err}");
                state.push_activity(format!("Map library failed: {err}"));
                Task::none()
            }
            Message::FeedTick => {
                let gps_client = state.feed.clone();
                let camera_client = state.feed.clone();
                Task::batch(vec![
                    Task::perform(
                        async move { gps_client.fetch_gps().await.map_err(|e| e.to_string()) },
                        Message::GpsFetched,
                    ),
                    Task::perform(
                        async move {
                            camera_client
                                .fetch_camera_link()
                                .await
                                .map_err(|e| e.to_string())
                        },
                        Message::CameraLinkFetched,
                    ),
                ])
            }
            Message::GpsFetched(Ok(snapshot)) => {
                if state.net_degraded {
                    state.net_degraded = false;
                    state.push_activity("Feed restored".into());
                }
                let applied = state.map.handle_snapshot(&snapshot);
                if applied && !state.first_fix_seen {
                    state.first_fix_seen = true;
                    state.push_activity("GPS fix acquired".into());
                }
                state.gps = snapshot;
                Task::none()
            }
            Message::GpsFetched(Err(err)) => {
                state.metrics.record_feed_error();
                if !state.net_degraded {
                    state.net_degraded = true;
                    state.push_activity(format!("Feed degraded: {err}"));
                }
                Task::none()
            }
            Message::CameraLinkFetched(Ok(locator)) => {
                let was_live = state.camera.is_live();
                match state.camera.handle_locator(locator) {
                    Some(url) => {
                        if !was_live {
                            state.push_activity("Camera feed live".into());
                        }
                        fetch_frame(state.http.clone(), url)
                    }
                    None => Task::none(),
                }
            }
            Message::CameraLinkFetched(Err(err)) => {
                state.metrics.record_feed_error();
                warn!("camera link fetch failed: {err}");
                Task::none()
            }
            Message::CameraRefresh => match state.camera.refresh_url() {
                Some(url) => fetch_frame(state.http.clone(), url),
                None => Task::none(),
            },
            Message::CameraFrameFetched(result) => {
                state.camera.handle_frame(result);
                Task::none()
            }
            Message::PollTick => {
                state.radar.tick(Instant::now());
                let fetches = state.map.poll();
                match state.map.library() {
                    Some(library) if !fetches.is_empty() => Task::batch(
                        fetches
                            .into_iter()
                            .map(|tile| {
                                let library = library.clone();
                                Task::perform(tiles::fetch_tile(library, tile), move |result| {
                                    Message::TileFetched(tile, result)
                                })
                            })
                            .collect::<Vec<_>>(),
                    ),
                    _ => Task::none(),
                }
            }
            Message::RadarSpawn => {
                state.radar.spawn(&mut rand::thread_rng(), Instant::now());
                Task::none()
            }
            Message::TileFetched(tile, Ok(bytes)) => {
                state.map.tile_loaded(tile, bytes);
                Task::none()
            }
            Message::TileFetched(tile, Err(err)) => {
                warn!("tile {tile:?} fetch failed: {err}");
                state.map.tile_failed(tile);
                Task::none()
            }
            Message::ToggleFullscreen => {
                state.camera.expanded = !state.camera.expanded;
                Task::none()
            }
            Message::SosPressed => {
                warn!("SOS pressed: emergency beacon requested");
                state.status = "EMERGENCY BEACON ACTIVATED".into();
                state.push_activity("EMERGENCY BEACON ACTIVATED".into());
                Task::none()
            }
        }
    }

    fn view(state: &Self) -> Element<'_, Message> {
        if !state.booted {
            return splash_view();
        }

        let content: Element<'_, Message> = if state.camera.expanded {
            camera_section(state)
        } else {
            let radar_column = column![
                text("RADAR").size(12),
                state.radar.view(),
                row![text("S: OBSTACLE").size(10), text("CLR").size(10)].spacing(12),
                text("ACTIVITY").size(12),
                Container::new(scrollable(activity_list(state)).height(Length::Fixed(90.0)))
                    .padding(4),
            ]
            .spacing(8)
            .width(Length::Fixed(280.0));

            let map_tag = if state.map.has_fix() {
                "GPS_LOCK"
            } else {
                "ACQUIRING"
            };
            let map_column = column![
                row![text("MAP").size(12), horizontal_space(), text(map_tag).size(10)],
                state.map.view(),
            ]
            .spacing(4)
            .width(Length::Fill);

            let lower = row![radar_column, map_column]
                .spacing(16)
                .height(Length::Fixed(320.0));

            column![camera_section(state), lower].spacing(12).into()
        };

        let counters = state.metrics.snapshot();
        let footer = Container::new(
            text(format!(
                "A.I BLIND STICK | FIX {} / DROP {} | {}",
                counters.applied, counters.rejected, state.status
            ))
            .size(11),
        )
        .center_x(Length::Fill)
        .padding(4);

        Container::new(
            column![header_view(state), content, footer]
                .spacing(10)
                .padding(12),
        )
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
    }

    fn push_activity(&mut self, entry: String) {
        self.activity.push(entry);
        if self.activity.len() > 20 {
            self.activity.remove(0);
        }
    }
}

fn fetch_frame(http: reqwest::Client, url: String) -> Task<Message> {
    Task::perform(
        async move {
            let response = http
                .get(&url)
                .send()
                .await
                .map_err(|e| e.to_string())?
                .error_for_status()
                .map_err(|e| e.to_string())?;
            let bytes = response.bytes().await.map_err(|e| e.to_string())?;
            Ok::<_, String>(bytes.to_vec())
        },
        Message::CameraFrameFetched,
    )
}

fn splash_view() -> Element<'static, Message> {
    Container::new(
        column![
            text("INITIALIZING").size(24),
            text("AI BLIND STICK").size(30),
            text("LOADING ASSISTIVE MODULES...").size(12),
        ]
        .spacing(12)
        .align_x(Alignment::Center),
    )
    .width(Length::Fill)
    .height(Length::Fill)
    .center_x(Length::Fill)
    .center_y(Length::Fill)
    .into()
}

fn header_view(state: &Dashboard) -> Element<'_, Message> {
    let branding = column![
        text("AI BLIND STICK").size(22),
        text("Smart Assistive Nav").size(10),
    ]
    .spacing(2);

    let network = if state.net_degraded { "DEGRADED" } else { "ONLINE" };
    let badges = row![
        stat_badge("NET", network.to_string()),
        stat_badge(
            "SPD",
            format!("{:.1}km", state.gps.speed_kmph.unwrap_or(0.0))
        ),
        stat_badge("SAT", state.gps.satellites.unwrap_or(0).to_string()),
        stat_badge("PWR", "88%".to_string()),
    ]
    .spacing(8);

    row![branding, horizontal_space(), badges]
        .align_y(Alignment::Center)
        .padding(8)
        .into()
}

fn stat_badge(label: &'static str, value: String) -> Element<'static, Message> {
    Container::new(
        column![text(label).size(9), text(value).size(13)]
            .spacing(2)
            .align_x(Alignment::Center),
    )
    .padding(6)
    .into()
}

fn camera_section(state: &Dashboard) -> Element<'_, Message> {
    let controls = row![
        button(
            text(if state.camera.expanded {
                "WINDOWED"
            } else {
                "FULLSCREEN"
            })
            .size(11)
        )
        .on_press(Message::ToggleFullscreen)
        .padding(6),
        horizontal_space(),
        button(text("SOS").size(12))
            .on_press(Message::SosPressed)
            .padding(6),
    ];

    Container::new(column![controls, state.camera.view()].spacing(4).padding(8))
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

fn activity_list(state: &Dashboard) -> Column<'_, Message> {
    if state.activity.is_empty() {
        Column::new().push(text("No activity yet").size(11))
    } else {
        state
            .activity
            .iter()
            .rev()
            .fold(Column::new().spacing(3), |col, entry| {
                col.push(text(entry.clone()).size(11))
            })
    }
}
