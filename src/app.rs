//! Core application state and Iced Application implementation
//!
//! `Folio` is the composition root: it owns the fetch controller, the theme
//! service and the toast queue, and turns their requests into `Task`s.

use std::time::Duration;

use iced::keyboard::{self, Key};
use iced::widget::{button, column, container, row, scrollable, stack, text, text_input, Column, Space};
use iced::{Alignment, Background, Border, Element, Event, Length, Padding, Subscription, Task, Theme};

use crate::backend::{BackendClient, BackendError, ItemId, Recommendation, SearchItem};
use crate::config::Config;
use crate::controller::{Controller, Tab, Ticket, DEFAULT_ACTION};
use crate::native;
use crate::theme::{appearance, ColorPreset, ThemeMode, ThemeService, ThemeStore};
use crate::ui::theme::{color, iced_theme, Colors};
use crate::ui::toast::{feedback_message, ToastId, Toaster};
use crate::ui::{cards, search_bar};

const COLUMNS: usize = 3;
const SKELETONS: usize = 6;

// ============================================================================
// Application State
// ============================================================================

pub struct Folio {
    controller: Controller,
    backend: BackendClient,
    themes: ThemeService,
    toaster: Toaster,
    toast_duration: Duration,
    poll_interval: Duration,
    settings_open: bool,
}

#[derive(Debug, Clone)]
pub enum Message {
    UidChanged(String),
    QueryChanged(String),
    QueryCleared,
    Search,
    Recommend,
    SearchFinished(Ticket, Result<Vec<SearchItem>, BackendError>),
    RecommendFinished(Ticket, Result<Vec<Recommendation>, BackendError>),
    TabSelected(Tab),
    Like(ItemId),
    FeedbackSent(Result<(), BackendError>),
    ToastExpired(ToastId),
    ToggleTheme,
    OpenSettings,
    CloseSettings,
    ThemeModePicked(ThemeMode),
    ThemeColorPicked(ColorPreset),
    ThemeReset,
    AppearanceTick,
    AppearanceChecked(bool),
    OpenDocs,
    IcedEvent(Event),
}

impl Folio {
    /// Build the app and the initial recommendation fetch
    pub fn new(config: &Config, store: Box<dyn ThemeStore>, os_prefers_dark: bool) -> (Self, Task<Message>) {
        let mut themes = ThemeService::new(store, os_prefers_dark);
        themes.subscribe(|applied| {
            tracing::debug!(
                "Theme applied: {} ({}), color {}",
                applied.resolved.label(),
                applied.settings.mode,
                applied.settings.color
            );
        });

        let backend = BackendClient::new(&config.api_url);
        tracing::info!("Using backend at {}", backend.base_url());

        let mut app = Self {
            controller: Controller::new(config),
            backend,
            themes,
            toaster: Toaster::new(),
            toast_duration: config.toast_duration(),
            poll_interval: config.appearance_poll_interval(),
            settings_open: false,
        };
        let task = app.recommend();
        (app, task)
    }

    pub fn title(&self) -> String {
        String::from("Folio")
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    pub fn toaster(&self) -> &Toaster {
        &self.toaster
    }

    pub fn themes(&self) -> &ThemeService {
        &self.themes
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::UidChanged(uid) => {
                self.controller.set_uid(uid);
                Task::none()
            }

            Message::QueryChanged(query) => {
                self.controller.set_query(query);
                Task::none()
            }

            Message::QueryCleared => {
                self.controller.clear_query();
                Task::none()
            }

            Message::Search => self.search(),

            Message::Recommend => self.recommend(),

            Message::SearchFinished(ticket, result) => {
                if let Err(e) = &result {
                    tracing::warn!("Search failed: {}", e);
                }
                if self.controller.finish_search(ticket, result) {
                    tracing::info!("Search returned {} items", self.controller.search_flow().items().len());
                }
                Task::none()
            }

            Message::RecommendFinished(ticket, result) => {
                if let Err(e) = &result {
                    tracing::warn!("Recommend failed: {}", e);
                }
                if self.controller.finish_recommend(ticket, result) {
                    tracing::info!(
                        "Recommend returned {} items",
                        self.controller.recommend_flow().items().len()
                    );
                }
                Task::none()
            }

            Message::TabSelected(tab) => {
                self.controller.select_tab(tab);
                Task::none()
            }

            Message::Like(item_id) => {
                let event = self.controller.feedback(item_id, DEFAULT_ACTION);
                tracing::info!("Sending feedback: item {} action {}", event.item_id, event.action);
                let backend = self.backend.clone();
                Task::perform(
                    async move { backend.send_feedback(&event).await },
                    Message::FeedbackSent,
                )
            }

            Message::FeedbackSent(result) => {
                if let Err(e) = &result {
                    tracing::warn!("Feedback failed: {}", e);
                }
                self.show_toast(feedback_message(result.is_ok()))
            }

            Message::ToastExpired(id) => {
                self.toaster.expire(id);
                Task::none()
            }

            Message::ToggleTheme => {
                self.themes.toggle();
                Task::none()
            }

            Message::OpenSettings => {
                self.settings_open = true;
                Task::none()
            }

            Message::CloseSettings => {
                self.settings_open = false;
                Task::none()
            }

            Message::ThemeModePicked(mode) => {
                self.themes.set_mode(mode);
                Task::none()
            }

            Message::ThemeColorPicked(color) => {
                self.themes.set_color(color);
                Task::none()
            }

            Message::ThemeReset => {
                self.themes.reset();
                Task::none()
            }

            Message::AppearanceTick => Task::perform(appearance::detect(), Message::AppearanceChecked),

            Message::AppearanceChecked(dark) => {
                self.themes.set_os_dark(dark);
                Task::none()
            }

            Message::OpenDocs => match native::open::open_url(&self.backend.docs_url()) {
                Ok(()) => Task::none(),
                Err(e) => {
                    tracing::warn!("{}", e);
                    self.show_toast(e)
                }
            },

            Message::IcedEvent(event) => {
                if let Event::Keyboard(keyboard::Event::KeyPressed {
                    key: Key::Named(keyboard::key::Named::Escape),
                    ..
                }) = event
                {
                    if self.settings_open {
                        return self.update(Message::CloseSettings);
                    }
                }
                Task::none()
            }
        }
    }

    pub fn subscription(&self) -> Subscription<Message> {
        let mut subscriptions = vec![iced::event::listen().map(Message::IcedEvent)];
        if self.themes.get().settings.mode == ThemeMode::Auto {
            subscriptions.push(iced::time::every(self.poll_interval).map(|_| Message::AppearanceTick));
        }
        Subscription::batch(subscriptions)
    }

    pub fn theme(&self) -> Theme {
        iced_theme(&self.themes.get())
    }

    // ========================================================================
    // Requests
    // ========================================================================

    fn search(&mut self) -> Task<Message> {
        let request = self.controller.begin_search();
        let ticket = request.ticket;
        tracing::info!("Searching for {:?}", request.query);

        let backend = self.backend.clone();
        Task::perform(
            async move { backend.search(&request.query, request.limit).await },
            move |result| Message::SearchFinished(ticket, result),
        )
    }

    fn recommend(&mut self) -> Task<Message> {
        let request = self.controller.begin_recommend();
        let ticket = request.ticket;
        tracing::info!("Fetching recommendations for {:?}", request.uid);

        let backend = self.backend.clone();
        Task::perform(
            async move { backend.recommend(&request.uid, &request.query, request.k).await },
            move |result| Message::RecommendFinished(ticket, result),
        )
    }

    fn show_toast(&mut self, message: impl Into<String>) -> Task<Message> {
        let expiry = self.toaster.show(message, self.toast_duration).expiry();
        Task::perform(expiry, Message::ToastExpired)
    }

    // ========================================================================
    // View
    // ========================================================================

    pub fn view(&self) -> Element<'_, Message> {
        let colors = Colors::of(&self.themes.get());

        let body: Element<'_, Message> = if self.settings_open {
            self.view_settings(colors)
        } else {
            self.view_results(colors)
        };

        let page = column![
            self.view_header(colors),
            self.view_hero(colors),
            body,
            container(text("Built with iced + reqwest").size(12).color(colors.text_muted))
                .width(Length::Fill)
                .center_x(Length::Fill),
        ]
        .spacing(20)
        .padding(24)
        .max_width(1100.0);

        let main = container(scrollable(container(page).center_x(Length::Fill)))
            .width(Length::Fill)
            .height(Length::Fill)
            .style(move |_theme| container::Style {
                background: Some(Background::Color(colors.background)),
                ..Default::default()
            });

        match self.toaster.message() {
            Some(message) => stack![main, self.view_toast(message, colors)].into(),
            None => main.into(),
        }
    }

    fn view_header(&self, colors: Colors) -> Element<'_, Message> {
        let resolved = self.themes.resolved();
        let toggle_icon = if resolved.is_dark() { "☀" } else { "☾" };

        let bar = row![
            text("Digital Library").size(20).color(iced::Color::WHITE),
            Space::with_width(Length::Fill),
            header_button(toggle_icon, Message::ToggleTheme),
            header_button("🎨 Theme", Message::OpenSettings),
            header_button("API docs", Message::OpenDocs),
        ]
        .spacing(8)
        .align_y(Alignment::Center);

        container(bar)
            .padding(Padding::from([12.0, 20.0]))
            .width(Length::Fill)
            .style(move |_theme| container::Style {
                background: Some(Background::Color(colors.primary)),
                border: Border::default().rounded(12),
                ..Default::default()
            })
            .into()
    }

    fn view_hero(&self, colors: Colors) -> Element<'_, Message> {
        let search_loading = self.controller.search_flow().is_loading();
        let recommend_loading = self.controller.recommend_flow().is_loading();

        let intro = row![
            column![
                text("Book recommendation demo").size(26).color(colors.text),
                text("Search by title, author or subject, or get recommendations from a user profile.")
                    .size(14)
                    .color(colors.text_muted),
            ]
            .spacing(6)
            .width(Length::Fill),
            column![
                text("User UID").size(12).color(colors.text_muted),
                text_input("e.g. u123", self.controller.uid())
                    .on_input(Message::UidChanged)
                    .padding(8)
                    .width(220),
            ]
            .spacing(4),
        ]
        .spacing(16)
        .align_y(Alignment::End);

        let actions = row![
            search_bar::view(
                self.controller.query(),
                colors,
                Message::QueryChanged,
                Message::Search,
                Message::QueryCleared,
            ),
            button(text(if search_loading { "Searching…" } else { "Search" }))
                .on_press_maybe((!search_loading).then_some(Message::Search))
                .padding(Padding::from([10.0, 18.0]))
                .style(button::primary),
            button(text(if recommend_loading { "Loading…" } else { "Recommend" }))
                .on_press_maybe((!recommend_loading).then_some(Message::Recommend))
                .padding(Padding::from([10.0, 18.0]))
                .style(button::secondary),
        ]
        .spacing(10)
        .align_y(Alignment::Center);

        let tab = self.controller.tab();
        let tabs = row![
            tab_button(Tab::Recommend, tab),
            tab_button(Tab::Search, tab),
            Space::with_width(Length::Fill),
            text(format!("{} items", self.controller.active_count()))
                .size(13)
                .color(colors.text_muted),
        ]
        .spacing(6)
        .align_y(Alignment::Center);

        panel(column![intro, actions, tabs].spacing(18).into(), colors)
    }

    fn view_results(&self, colors: Colors) -> Element<'_, Message> {
        let mut section = Column::new().spacing(16);

        if let Some(error) = self.controller.error_message() {
            section = section.push(alert(error, colors.danger, colors));
        }

        if self.controller.is_loading() {
            let skeletons = (0..SKELETONS).map(|_| cards::skeleton(colors)).collect();
            return section.push(grid(skeletons)).into();
        }

        if let Some(empty) = self.controller.empty_state() {
            return section.push(alert(empty, colors.border, colors)).into();
        }

        let items: Vec<Element<'_, Message>> = match self.controller.tab() {
            Tab::Search => self
                .controller
                .search_flow()
                .items()
                .iter()
                .map(|item| cards::book(item, colors, Message::Like(item.id.clone())))
                .collect(),
            Tab::Recommend => self
                .controller
                .recommend_flow()
                .items()
                .iter()
                .map(|rec| cards::recommendation(rec, colors, Message::Like(rec.item_id.clone())))
                .collect(),
        };

        section.push(grid(items)).into()
    }

    fn view_settings(&self, colors: Colors) -> Element<'_, Message> {
        let applied = self.themes.get();

        let modes = ThemeMode::ALL.into_iter().fold(row![].spacing(8), |row, mode| {
            let style = if applied.settings.mode == mode {
                button::primary
            } else {
                button::secondary
            };
            row.push(
                button(text(mode.label()))
                    .on_press(Message::ThemeModePicked(mode))
                    .style(style),
            )
        });

        let follows = if applied.settings.mode == ThemeMode::Auto {
            " (follows system)"
        } else {
            ""
        };

        let swatches = ColorPreset::ALL.into_iter().fold(row![].spacing(10), |row, preset| {
            let selected = applied.settings.color == preset;
            let fill = color(preset.primary());
            let ring = if selected { colors.text } else { colors.border };
            row.push(
                button(Space::new(Length::Fixed(28.0), Length::Fixed(28.0)))
                    .on_press(Message::ThemeColorPicked(preset))
                    .padding(0)
                    .style(move |_theme, _status| button::Style {
                        background: Some(Background::Color(fill)),
                        border: Border {
                            color: ring,
                            width: if selected { 3.0 } else { 1.0 },
                            radius: 14.0.into(),
                        },
                        ..button::Style::default()
                    }),
            )
        });

        let content = column![
            row![
                text("Theme settings").size(20).color(colors.text),
                Space::with_width(Length::Fill),
                button(text("✕")).on_press(Message::CloseSettings).style(button::text),
            ]
            .align_y(Alignment::Center),
            text("Display mode").size(15).color(colors.text),
            modes,
            text(format!("Active: {}{}", applied.resolved.label(), follows))
                .size(12)
                .color(colors.text_muted),
            text("Theme color").size(15).color(colors.text),
            swatches,
            row![
                Space::with_width(Length::Fill),
                button(text("Reset defaults")).on_press(Message::ThemeReset).style(button::text),
                button(text("Done")).on_press(Message::CloseSettings).style(button::primary),
            ]
            .spacing(8),
        ]
        .spacing(12);

        panel(content.into(), colors)
    }

    fn view_toast<'a>(&self, message: &'a str, colors: Colors) -> Element<'a, Message> {
        let toast = container(text(message).size(15).color(colors.text))
            .padding(Padding::from([12.0, 20.0]))
            .max_width(360.0)
            .style(move |_theme| container::Style {
                background: Some(Background::Color(colors.surface)),
                border: Border {
                    color: colors.primary,
                    width: 1.0,
                    radius: 12.0.into(),
                },
                ..Default::default()
            });

        container(toast).center(Length::Fill).into()
    }
}

// ============================================================================
// View helpers
// ============================================================================

fn header_button(label: &str, message: Message) -> Element<'_, Message> {
    button(text(label).size(14).color(iced::Color::WHITE))
        .on_press(message)
        .style(button::text)
        .into()
}

fn tab_button(tab: Tab, active: Tab) -> Element<'static, Message> {
    let style = if tab == active {
        button::primary
    } else {
        button::text
    };
    button(text(tab.label()).size(14))
        .on_press(Message::TabSelected(tab))
        .style(style)
        .into()
}

fn panel<'a>(content: Element<'a, Message>, colors: Colors) -> Element<'a, Message> {
    container(content)
        .padding(20)
        .width(Length::Fill)
        .style(move |_theme| container::Style {
            background: Some(Background::Color(colors.surface)),
            border: Border {
                color: colors.border,
                width: 1.0,
                radius: 16.0.into(),
            },
            ..Default::default()
        })
        .into()
}

fn alert<'a>(message: &'a str, edge: iced::Color, colors: Colors) -> Element<'a, Message> {
    container(text(message).size(14).color(colors.text))
        .padding(14)
        .width(Length::Fill)
        .style(move |_theme| container::Style {
            background: Some(Background::Color(colors.surface)),
            border: Border {
                color: edge,
                width: 1.0,
                radius: 10.0.into(),
            },
            ..Default::default()
        })
        .into()
}

fn grid(cells: Vec<Element<'_, Message>>) -> Element<'_, Message> {
    let mut rows = Column::new().spacing(16);
    let mut cells = cells.into_iter().peekable();

    while cells.peek().is_some() {
        let mut line = row![].spacing(16);
        let mut filled = 0;
        for cell in cells.by_ref().take(COLUMNS) {
            line = line.push(container(cell).width(Length::FillPortion(1)));
            filled += 1;
        }
        for _ in filled..COLUMNS {
            line = line.push(Space::with_width(Length::FillPortion(1)));
        }
        rows = rows.push(line);
    }

    rows.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::{MemoryThemeStore, Resolved, ThemeSettings};
    use crate::ui::toast::{FEEDBACK_FAILED, FEEDBACK_OK};

    fn app_with(store: MemoryThemeStore, os_dark: bool) -> Folio {
        let (app, _initial) = Folio::new(&Config::default(), Box::new(store), os_dark);
        app
    }

    fn app() -> Folio {
        app_with(MemoryThemeStore::default(), false)
    }

    fn book(id: i64) -> SearchItem {
        serde_json::from_value(serde_json::json!({"id": id, "title": format!("Book {}", id)})).unwrap()
    }

    fn rec(id: i64) -> Recommendation {
        serde_json::from_value(serde_json::json!({"item_id": id, "title": "Rec", "score": 0.9})).unwrap()
    }

    #[test]
    fn test_initial_recommend_in_flight() {
        let app = app();
        assert_eq!(app.controller().tab(), Tab::Recommend);
        assert!(app.controller().recommend_flow().is_loading());
    }

    #[test]
    fn test_search_round_trip_through_messages() {
        let mut app = app();
        let _ = app.update(Message::QueryChanged("dune".to_string()));
        let _ = app.update(Message::Search);
        assert_eq!(app.controller().tab(), Tab::Search);

        let ticket = app.controller.begin_search().ticket;
        let _ = app.update(Message::SearchFinished(ticket, Ok(vec![book(1), book(2)])));

        assert_eq!(app.controller().active_count(), 2);
        assert!(!app.controller().is_loading());
    }

    #[test]
    fn test_tab_switch_keeps_results() {
        let mut app = app();
        let r = app.controller.begin_recommend().ticket;
        let _ = app.update(Message::RecommendFinished(r, Ok(vec![rec(9)])));
        let s = app.controller.begin_search().ticket;
        let _ = app.update(Message::SearchFinished(s, Ok(vec![book(1), book(2), book(3)])));

        let _ = app.update(Message::TabSelected(Tab::Recommend));
        assert_eq!(app.controller().active_count(), 1);
        let _ = app.update(Message::TabSelected(Tab::Search));
        assert_eq!(app.controller().active_count(), 3);
    }

    async fn wait_out_toast(app: &mut Folio) {
        let expiry = app.toaster().current().map(|t| t.expiry()).unwrap();
        let started = tokio::time::Instant::now();
        let id = expiry.await;
        assert!(started.elapsed() >= Duration::from_millis(1800));
        let _ = app.update(Message::ToastExpired(id));
    }

    #[tokio::test(start_paused = true)]
    async fn test_feedback_failure_toast_expires() {
        let mut app = app();
        let _ = app.update(Message::FeedbackSent(Err(BackendError::Transport("refused".to_string()))));
        assert_eq!(app.toaster().message(), Some(FEEDBACK_FAILED));

        wait_out_toast(&mut app).await;
        assert!(app.toaster().message().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_feedback_success_toast_expires() {
        let mut app = app();
        let _ = app.update(Message::FeedbackSent(Ok(())));
        assert_eq!(app.toaster().message(), Some(FEEDBACK_OK));

        wait_out_toast(&mut app).await;
        assert!(app.toaster().message().is_none());
    }

    #[test]
    fn test_feedback_toast_outside_runtime() {
        let mut app = app();
        let _task = app.update(Message::FeedbackSent(Ok(())));
        assert_eq!(app.toaster().message(), Some(FEEDBACK_OK));
    }

    #[tokio::test(start_paused = true)]
    async fn test_newer_toast_outlives_older_timer() {
        let mut app = app();
        let _ = app.update(Message::FeedbackSent(Err(BackendError::Transport("refused".to_string()))));
        let stale = app.toaster().current().map(|t| t.expiry()).unwrap();
        let _ = app.update(Message::FeedbackSent(Ok(())));

        let _ = app.update(Message::ToastExpired(stale.await));
        assert_eq!(app.toaster().message(), Some(FEEDBACK_OK));
    }

    #[test]
    fn test_theme_messages_persist() {
        let store = MemoryThemeStore::default();
        let mut app = app_with(store.clone(), false);

        let _ = app.update(Message::OpenSettings);
        let _ = app.update(Message::ThemeModePicked(ThemeMode::Auto));
        let _ = app.update(Message::ThemeColorPicked(ColorPreset::Green));
        let _ = app.update(Message::CloseSettings);

        assert_eq!(store.saved(), Some(ThemeSettings::new(ThemeMode::Auto, ColorPreset::Green)));
        assert_eq!(app.themes().resolved(), Resolved::Light);

        let _ = app.update(Message::AppearanceChecked(true));
        assert_eq!(app.themes().resolved(), Resolved::Dark);
    }

    #[test]
    fn test_toggle_flips_resolved_theme() {
        let mut app = app();
        let _ = app.update(Message::ToggleTheme);
        assert_eq!(app.themes().resolved(), Resolved::Dark);
        let _ = app.update(Message::ToggleTheme);
        assert_eq!(app.themes().resolved(), Resolved::Light);
    }
}
